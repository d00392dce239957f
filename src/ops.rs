use std::iter::Sum;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::interp;

/// Method for defuzzifcating the resulting membership function.
///
/// Every method returns `None` when the membership is zero everywhere, which is where the
/// plain formulas would divide by zero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of Gravity
    #[default]
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    pub fn call<F: Float + Sum>(self, universe: &[F], membership: &[F]) -> Option<F> {
        debug_assert_eq!(universe.len(), membership.len());

        if universe.len() < 2 || membership.iter().all(|m| *m == F::zero()) {
            return None;
        }

        match self {
            Self::Cog => {
                // The membership is linear between samples, so each segment splits into a
                // rectangle and a right triangle with known centroids
                let n_areas = universe.len() - 1;
                let mut areas = Vec::with_capacity(n_areas);
                let mut centroids = Vec::with_capacity(n_areas);
                let two = F::one() + F::one();
                let three = two + F::one();

                for i in 0..n_areas {
                    let base = universe[i + 1] - universe[i];
                    let area_rect = F::min(membership[i], membership[i + 1]) * base;
                    let center_rect = universe[i] + base / two;
                    let (area_tria, center_tri) = if membership[i + 1] == membership[i] {
                        (F::zero(), F::zero())
                    } else if membership[i + 1] > membership[i] {
                        (
                            base * F::abs(membership[i + 1] - membership[i]) / two,
                            universe[i] + two / three * base,
                        )
                    } else {
                        (
                            base * F::abs(membership[i + 1] - membership[i]) / two,
                            universe[i] + F::one() / three * base,
                        )
                    };
                    let area = area_rect + area_tria;
                    let center = if area == F::zero() {
                        F::zero()
                    } else {
                        (area_rect * center_rect + area_tria * center_tri) / area
                    };

                    areas.push(area);
                    centroids.push(center);
                }

                let den = areas.iter().copied().sum::<F>();
                let num = areas
                    .into_iter()
                    .zip(centroids)
                    .map(|(area, cent)| area * cent)
                    .sum::<F>();

                if den == F::zero() {
                    None
                } else {
                    Some(num / den)
                }
            },
            Self::Boa => {
                let two = F::one() + F::one();
                let areas: Vec<F> = universe
                    .windows(2)
                    .zip(membership.windows(2))
                    .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
                    .collect();
                let target = areas.iter().copied().sum::<F>() / two;

                if target == F::zero() {
                    return None;
                }

                let mut cum_area = F::zero();

                for (i, area) in areas.iter().copied().enumerate() {
                    cum_area = cum_area + area;

                    if cum_area >= target {
                        let coords = [(cum_area - area, universe[i]), (cum_area, universe[i + 1])];

                        return Some(interp(target, &coords));
                    }
                }

                universe.last().copied()
            },
            Self::Mom | Self::Lom | Self::Som => {
                let maximum = membership.iter().copied().fold(F::zero(), F::max);
                let at_max = universe
                    .iter()
                    .copied()
                    .zip(membership.iter().copied())
                    .filter_map(|(u, m)| if m == maximum { Some(u) } else { None });

                match self {
                    Self::Lom => at_max.reduce(F::max),
                    Self::Som => at_max.reduce(F::min),
                    _ => {
                        let (len, sum) = at_max.fold((0usize, F::zero()), |(len, sum), u| (len + 1, sum + u));

                        F::from(len).map(|len| sum / len)
                    },
                }
            },
        }
    }
}

#[cfg(test)]
fn universe() -> Vec<f64> {
    (0..=100).map(f64::from).collect()
}

#[cfg(test)]
fn triangle(a: f64, b: f64, c: f64) -> Vec<f64> {
    let mf = crate::membership::MembershipFunction::triangular(a, b, c).unwrap();

    universe().into_iter().map(|x| mf.degree(x)).collect()
}

#[test]
fn test_cog_matches_continuous_centroid() {
    let cog = DefuzzificationOp::Cog.call(&universe(), &triangle(60., 100., 100.)).unwrap();

    assert!((cog - 260. / 3.).abs() < 1e-9, "{cog}");

    let cog = DefuzzificationOp::Cog.call(&universe(), &triangle(30., 50., 70.)).unwrap();

    assert!((cog - 50.).abs() < 1e-9, "{cog}");
}

#[test]
fn test_all_zero_is_undefined() {
    let zeros = vec![0.; 101];

    for op in [
        DefuzzificationOp::Cog,
        DefuzzificationOp::Boa,
        DefuzzificationOp::Mom,
        DefuzzificationOp::Lom,
        DefuzzificationOp::Som,
    ] {
        assert_eq!(op.call(&universe(), &zeros), None, "{op:?}");
    }
}

#[test]
fn test_maximum_methods() {
    // Trapezoid clipped at 0.5 is flat from 30 to 70
    let clipped: Vec<f64> = triangle(10., 50., 90.).into_iter().map(|m| m.min(0.5)).collect();

    assert_eq!(DefuzzificationOp::Som.call(&universe(), &clipped), Some(30.));
    assert_eq!(DefuzzificationOp::Lom.call(&universe(), &clipped), Some(70.));
    assert_eq!(DefuzzificationOp::Mom.call(&universe(), &clipped), Some(50.));
}

#[test]
fn test_bisector_of_symmetric_set() {
    let boa = DefuzzificationOp::Boa.call(&universe(), &triangle(20., 40., 60.)).unwrap();

    assert!((boa - 40.).abs() < 1e-9, "{boa}");
}

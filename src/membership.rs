use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, FuzzyResult};
use crate::math::interp;

/// Shape of a linguistic term.
///
/// Deserialized shapes are not checked until they are attached to a variable, which calls
/// [`MembershipFunction::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Triangle with feet at `a` and `c` and its peak at `b`
    Triangular(f64, f64, f64),
    /// Linear interpolation between `(x, degree)` coordinates sorted by x
    Piecewise(Vec<(f64, f64)>),
}

impl MembershipFunction {
    pub fn triangular(a: f64, b: f64, c: f64) -> FuzzyResult<Self> {
        let mf = MembershipFunction::Triangular(a, b, c);

        mf.validate()?;

        Ok(mf)
    }

    pub fn piecewise(points: impl Into<Vec<(f64, f64)>>) -> FuzzyResult<Self> {
        let mf = MembershipFunction::Piecewise(points.into());

        mf.validate()?;

        Ok(mf)
    }

    pub fn validate(&self) -> FuzzyResult<()> {
        match self {
            Self::Triangular(a, b, c) => {
                if ![a, b, c].iter().all(|v| v.is_finite()) {
                    return Err(FuzzyError::InvalidShape(format!(
                        "triangle ({a}, {b}, {c}) has a non-finite breakpoint"
                    )));
                }
                if !(a <= b && b <= c) {
                    return Err(FuzzyError::InvalidShape(format!(
                        "triangle ({a}, {b}, {c}) needs a <= b <= c"
                    )));
                }
            },
            Self::Piecewise(points) => {
                if points.is_empty() {
                    return Err(FuzzyError::InvalidShape("piecewise shape has no points".into()));
                }
                for (x, y) in points {
                    if !x.is_finite() || !(0. ..=1.).contains(y) {
                        return Err(FuzzyError::InvalidShape(format!(
                            "point ({x}, {y}) needs a finite x and a degree in [0, 1]"
                        )));
                    }
                }
                if points.windows(2).any(|w| w[0].0 >= w[1].0) {
                    return Err(FuzzyError::InvalidShape(
                        "piecewise x coordinates must be strictly increasing".into(),
                    ));
                }
            },
        }

        Ok(())
    }

    /// Degree of membership of `x`, always within [0, 1]. NaN maps to 0.
    pub fn degree(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.;
        }

        let degree = match *self {
            Self::Triangular(a, b, c) => {
                if x < a || x > c {
                    0.
                } else if x == b {
                    1.
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            },
            Self::Piecewise(ref points) => interp(x, points),
        };

        degree.clamp(0., 1.)
    }

    /// Closed interval outside of which the degree is zero. Piecewise shapes hold their end degrees
    /// beyond their outermost points, so a non-zero end makes that side unbounded.
    pub fn support(&self) -> (f64, f64) {
        match self {
            Self::Triangular(a, _, c) => (*a, *c),
            Self::Piecewise(points) => {
                let lo = match points.first() {
                    Some(&(_, y)) if y > 0. => f64::NEG_INFINITY,
                    Some(&(x, _)) => x,
                    None => 0.,
                };
                let hi = match points.last() {
                    Some(&(_, y)) if y > 0. => f64::INFINITY,
                    Some(&(x, _)) => x,
                    None => 0.,
                };

                (lo, hi)
            },
        }
    }
}

#[test]
fn test_triangular_breakpoints() {
    let mf = MembershipFunction::triangular(3., 5., 7.).unwrap();

    assert_eq!(mf.degree(3.), 0.);
    assert_eq!(mf.degree(4.), 0.5);
    assert_eq!(mf.degree(5.), 1.);
    assert_eq!(mf.degree(6.5), 0.25);
    assert_eq!(mf.degree(7.), 0.);
    assert_eq!(mf.degree(-100.), 0.);
    assert_eq!(mf.degree(f64::INFINITY), 0.);
    assert_eq!(mf.degree(f64::NAN), 0.);
}

#[test]
fn test_triangular_shoulders() {
    let left = MembershipFunction::triangular(0., 0., 5.).unwrap();
    let right = MembershipFunction::triangular(5., 10., 10.).unwrap();

    assert_eq!(left.degree(0.), 1.);
    assert_eq!(left.degree(2.), 0.6);
    assert_eq!(left.degree(-0.1), 0.);
    assert_eq!(right.degree(10.), 1.);
    assert_eq!(right.degree(8.), 0.6);
    assert_eq!(right.degree(10.1), 0.);

    let spike = MembershipFunction::triangular(4., 4., 4.).unwrap();

    assert_eq!(spike.degree(4.), 1.);
    assert_eq!(spike.degree(4.001), 0.);
}

#[test]
fn test_invalid_shapes() {
    assert!(matches!(
        MembershipFunction::triangular(5., 3., 7.),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(
        MembershipFunction::triangular(0., f64::NAN, 7.),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(
        MembershipFunction::piecewise(vec![(1., 0.), (1., 1.)]),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(
        MembershipFunction::piecewise(vec![(1., 1.5)]),
        Err(FuzzyError::InvalidShape(_))
    ));
    assert!(matches!(
        MembershipFunction::piecewise(Vec::new()),
        Err(FuzzyError::InvalidShape(_))
    ));
}

#[test]
fn test_piecewise() {
    let mf = MembershipFunction::piecewise(vec![(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]).unwrap();

    assert_eq!(mf.degree(1.), 1.);
    assert_eq!(mf.degree(3.), 0.7);
    assert!((mf.degree(3.5) - 0.5).abs() < 1e-12);
    assert_eq!(mf.degree(9.), 0.);
    assert_eq!(mf.support(), (f64::NEG_INFINITY, 5.));
}

#[test]
fn test_piecewise_support_follows_end_degrees() {
    let ramp = MembershipFunction::piecewise(vec![(2., 0.), (4., 1.), (6., 0.)]).unwrap();
    let always = MembershipFunction::piecewise(vec![(-10., 0.), (-5., 1.)]).unwrap();
    let flat = MembershipFunction::piecewise(vec![(3., 0.5)]).unwrap();

    assert_eq!(ramp.support(), (2., 6.));
    assert_eq!(always.support(), (-10., f64::INFINITY));
    assert_eq!(always.degree(5.), 1.);
    assert_eq!(flat.support(), (f64::NEG_INFINITY, f64::INFINITY));
}

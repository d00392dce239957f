use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::{FuzzyError, FuzzyResult};
use crate::linspace::Linspace;
use crate::membership::MembershipFunction;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Whether a variable is read by rule premises or produced by rule consequences.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Antecedent,
    Consequent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Antecedent => f.write_str("antecedent"),
            Self::Consequent => f.write_str("consequent"),
        }
    }
}

/// Evenly spaced sample points over `[min, max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    points: Vec<f64>,
}

impl Universe {
    /// Most sample points a universe may hold
    pub const MAX_POINTS: usize = 1_000_000;

    pub fn new(min: f64, max: f64, step: f64) -> FuzzyResult<Self> {
        let invalid = || FuzzyError::InvalidUniverse { min, max, step };

        if !(min.is_finite() && max.is_finite() && step.is_finite()) || min >= max || step <= 0. {
            return Err(invalid());
        }

        let points: Vec<f64> = Linspace::arange(min, max, step, Self::MAX_POINTS)
            .ok_or_else(invalid)?
            .collect();

        if points.len() < 2 {
            return Err(invalid());
        }

        Ok(Self { min, max, step, points })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Clamps to the sampled range, which ends short of `max` when the step does not divide it.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.last())
    }

    fn last(&self) -> f64 {
        self.points.last().copied().unwrap_or(self.max)
    }
}

/// A named universe with its linguistic terms.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    terms: BTreeMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, role: Role, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: BTreeMap::new(),
        }
    }

    pub fn antecedent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, Role::Antecedent, universe)
    }

    pub fn consequent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, Role::Consequent, universe)
    }

    pub fn add_term(&mut self, name: impl Into<String>, membership: MembershipFunction) -> FuzzyResult<()> {
        let name = name.into();

        if self.terms.contains_key(&name) {
            return Err(FuzzyError::DuplicateTerm {
                variable: self.name.clone(),
                term: name,
            });
        }

        membership.validate()?;

        let (lo, hi) = membership.support();

        if hi < self.universe.min || lo > self.universe.max {
            return Err(FuzzyError::DomainMismatch {
                variable: self.name.clone(),
                term: name,
            });
        }

        self.terms.insert(name, membership);

        Ok(())
    }

    /// Builder form of [`add_term`](Self::add_term)
    pub fn with_term(mut self, name: impl Into<String>, membership: MembershipFunction) -> FuzzyResult<Self> {
        self.add_term(name, membership)?;

        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term(&self, term: &str) -> FuzzyResult<&MembershipFunction> {
        self.terms.get(term).ok_or_else(|| FuzzyError::UnknownTerm {
            variable: self.name.clone(),
            term: term.to_owned(),
        })
    }

    /// The term's stored name alongside its shape
    pub(crate) fn term_entry(&self, term: &str) -> FuzzyResult<(&str, &MembershipFunction)> {
        self.terms
            .get_key_value(term)
            .map(|(name, mf)| (name.as_str(), mf))
            .ok_or_else(|| FuzzyError::UnknownTerm {
                variable: self.name.clone(),
                term: term.to_owned(),
            })
    }

    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn degree_of(&self, term: &str, x: f64) -> FuzzyResult<f64> {
        Ok(self.term(term)?.degree(x))
    }

    /// The term sampled at every point of the universe
    pub fn membership(&self, term: &str) -> FuzzyResult<Vec<f64>> {
        let mf = self.term(term)?;

        Ok(self.universe.points.iter().map(|x| mf.degree(*x)).collect())
    }
}

/// Variable storage with a name index on top.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    slots: SlotMap<VariableKey, LinguisticVariable>,
    names: HashMap<String, VariableKey>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, var: LinguisticVariable) -> FuzzyResult<VariableKey> {
        if self.names.contains_key(var.name()) {
            return Err(FuzzyError::DuplicateVariable(var.name.clone()));
        }

        let name = var.name.clone();
        let key = self.slots.insert(var);

        self.names.insert(name, key);

        Ok(key)
    }

    pub fn key(&self, name: &str) -> FuzzyResult<VariableKey> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))
    }

    pub fn get(&self, key: VariableKey) -> Option<&LinguisticVariable> {
        self.slots.get(key)
    }

    pub fn by_name(&self, name: &str) -> FuzzyResult<&LinguisticVariable> {
        let key = self.key(name)?;

        Ok(&self.slots[key])
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableKey, &LinguisticVariable)> {
        self.slots.iter()
    }
}

impl Index<VariableKey> for Variables {
    type Output = LinguisticVariable;

    fn index(&self, key: VariableKey) -> &LinguisticVariable {
        &self.slots[key]
    }
}

#[cfg(test)]
fn status() -> LinguisticVariable {
    LinguisticVariable::antecedent("status", Universe::new(0., 10., 1.).unwrap())
        .with_term("rendah", MembershipFunction::triangular(0., 0., 5.).unwrap())
        .unwrap()
        .with_term("sedang", MembershipFunction::triangular(3., 5., 7.).unwrap())
        .unwrap()
        .with_term("tinggi", MembershipFunction::triangular(5., 10., 10.).unwrap())
        .unwrap()
}

#[test]
fn test_universe() {
    let universe = Universe::new(0., 100., 1.).unwrap();

    assert_eq!(universe.points().len(), 101);
    assert_eq!(universe.points()[0], 0.);
    assert_eq!(universe.points()[100], 100.);
    assert!(universe.points().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(universe.clamp(150.), 100.);

    assert!(matches!(Universe::new(0., 10., 0.), Err(FuzzyError::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(10., 0., 1.), Err(FuzzyError::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(0., 1., 5.), Err(FuzzyError::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(0., f64::INFINITY, 1.), Err(FuzzyError::InvalidUniverse { .. })));
}

#[test]
fn test_universe_size_is_bounded() {
    assert!(matches!(
        Universe::new(0., f64::MAX, f64::MIN_POSITIVE),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert!(matches!(Universe::new(0., 1e9, 1e-6), Err(FuzzyError::InvalidUniverse { .. })));

    let max = (Universe::MAX_POINTS - 1) as f64;

    assert_eq!(Universe::new(0., max, 1.).map(|u| u.points().len()), Ok(Universe::MAX_POINTS));
    assert!(Universe::new(0., max + 1., 1.).is_err());
}

#[test]
fn test_clamp_to_last_sample() {
    let universe = Universe::new(0., 10., 3.).unwrap();

    assert_eq!(universe.clamp(10.), 9.);
    assert_eq!(universe.clamp(-1.), 0.);
    assert_eq!(universe.clamp(4.5), 4.5);
}

#[test]
fn test_degree_of() {
    let status = status();

    assert_eq!(status.degree_of("rendah", 2.), Ok(0.6));
    assert_eq!(status.degree_of("sedang", 4.), Ok(0.5));
    assert_eq!(
        status.degree_of("ekstrem", 4.),
        Err(FuzzyError::UnknownTerm {
            variable: "status".into(),
            term: "ekstrem".into()
        })
    );
    assert_eq!(status.term_names().collect::<Vec<_>>(), vec!["rendah", "sedang", "tinggi"]);
}

#[test]
fn test_add_term_errors() {
    let mut status = status();

    assert_eq!(
        status.add_term("rendah", MembershipFunction::triangular(0., 1., 2.).unwrap()),
        Err(FuzzyError::DuplicateTerm {
            variable: "status".into(),
            term: "rendah".into()
        })
    );
    assert_eq!(
        status.add_term("jauh", MembershipFunction::triangular(11., 15., 20.).unwrap()),
        Err(FuzzyError::DomainMismatch {
            variable: "status".into(),
            term: "jauh".into()
        })
    );
    assert!(matches!(
        status.add_term("rusak", MembershipFunction::Triangular(3., 2., 1.)),
        Err(FuzzyError::InvalidShape(_))
    ));
    // Partial overlap with the universe is fine
    assert!(status.add_term("lebih", MembershipFunction::triangular(8., 12., 14.).unwrap()).is_ok());
    // A piecewise end degree carries on past its last point
    let selalu = MembershipFunction::piecewise(vec![(-10., 0.), (-5., 1.)]).unwrap();

    assert!(status.add_term("selalu", selalu).is_ok());
    assert_eq!(status.degree_of("selalu", 5.), Ok(1.));
    assert!(matches!(
        status.add_term("minus", MembershipFunction::piecewise(vec![(-10., 0.), (-5., 1.), (-1., 0.)]).unwrap()),
        Err(FuzzyError::DomainMismatch { .. })
    ));
}

#[test]
fn test_membership_sampling() {
    let status = status();
    let tinggi = status.membership("tinggi").unwrap();

    assert_eq!(tinggi.len(), 11);
    assert_eq!(tinggi[5], 0.);
    assert_eq!(tinggi[8], 0.6);
    assert_eq!(tinggi[10], 1.);
}

#[test]
fn test_variables_index() {
    let mut vars = Variables::new();
    let key = vars.insert(status()).unwrap();

    assert_eq!(vars.key("status"), Ok(key));
    assert_eq!(vars.get(key).map(|v| v.role()), Some(Role::Antecedent));
    assert_eq!(vars.insert(status()).unwrap_err(), FuzzyError::DuplicateVariable("status".into()));
    assert_eq!(vars.key("lama"), Err(FuzzyError::UnknownVariable("lama".into())));
    assert_eq!(vars.len(), 1);
}

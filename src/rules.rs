use serde::{Deserialize, Serialize};

use crate::dsl::Condition;
use crate::error::{FuzzyError, FuzzyResult};

fn full_weight() -> f64 {
    1.
}

/// `variable is term`, scaled by `weight`, on the output side of a rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consequence {
    pub variable: String,
    pub term: String,
    #[serde(default = "full_weight")]
    pub weight: f64,
}

impl Consequence {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
            weight: full_weight(),
        }
    }

    pub fn weighted(mut self, weight: f64) -> FuzzyResult<Self> {
        self.weight = weight;
        self.validate()?;

        Ok(self)
    }

    pub(crate) fn validate(&self) -> FuzzyResult<()> {
        if self.weight > 0. && self.weight <= 1. {
            Ok(())
        } else {
            Err(FuzzyError::InvalidWeight(self.weight))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub premise: Condition,
    pub consequences: Vec<Consequence>,
}

impl Rule {
    pub fn new(premise: Condition, consequence: Consequence) -> Self {
        Self {
            label: None,
            premise,
            consequences: vec![consequence],
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds another output term fired by the same premise
    pub fn also(mut self, consequence: Consequence) -> Self {
        self.consequences.push(consequence);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn push(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }
}

#[test]
fn test_weights() {
    assert_eq!(Consequence::new("kelayakan", "layak").weight, 1.);
    assert_eq!(Consequence::new("kelayakan", "layak").weighted(0.5).map(|c| c.weight), Ok(0.5));
    assert_eq!(
        Consequence::new("kelayakan", "layak").weighted(0.),
        Err(FuzzyError::InvalidWeight(0.))
    );
    assert_eq!(
        Consequence::new("kelayakan", "layak").weighted(1.5),
        Err(FuzzyError::InvalidWeight(1.5))
    );
    assert!(Consequence::new("kelayakan", "layak").weighted(f64::NAN).is_err());
}

#[test]
fn test_rule_serde_defaults() {
    let rule: Rule = serde_json::from_str(
        r#"{
            "premise": { "is": { "variable": "dbr", "term": "tinggi" } },
            "consequences": [{ "variable": "kelayakan", "term": "tidak_layak" }]
        }"#,
    )
    .unwrap();

    assert_eq!(
        rule,
        Rule::new(
            Condition::is("dbr", "tinggi"),
            Consequence::new("kelayakan", "tidak_layak")
        )
    );
}

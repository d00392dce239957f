use serde::{Deserialize, Serialize};

use crate::error::FuzzyResult;
use crate::facts::Facts;

/// Premise of a rule: term lookups combined with Zadeh min/max logic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Is { variable: String, term: String },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Condition::Is {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn and(self, rhs: Condition) -> Self {
        Condition::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Condition) -> Self {
        Condition::Or(Box::new(self), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Condition::Not(Box::new(self))
    }

    /// Every `(variable, term)` leaf, left to right
    pub fn propositions(&self) -> Vec<(&str, &str)> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Condition, out: &mut Vec<(&'p str, &'p str)>) {
            match expr {
                Condition::Is { variable, term } => out.push((variable.as_str(), term.as_str())),
                Condition::And(lhs, rhs) | Condition::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
                Condition::Not(expr) => parse(expr, out),
            }
        }

        parse(self, &mut props);

        props
    }

    pub(crate) fn evaluate(&self, facts: &mut Facts<'_>) -> FuzzyResult<f64> {
        match self {
            Condition::Is { variable, term } => facts.membership(variable, term),
            Condition::And(lhs, rhs) => {
                let left = lhs.evaluate(facts)?;
                let right = rhs.evaluate(facts)?;

                Ok(f64::min(left, right))
            },
            Condition::Or(lhs, rhs) => {
                let left = lhs.evaluate(facts)?;
                let right = rhs.evaluate(facts)?;

                Ok(f64::max(left, right))
            },
            Condition::Not(expr) => Ok(1. - expr.evaluate(facts)?),
        }
    }
}

#[test]
fn test_propositions() {
    let premise = Condition::is("status", "tinggi")
        .and(Condition::is("lama", "tinggi"))
        .or(Condition::is("dbr", "rendah").not());

    assert_eq!(
        premise.propositions(),
        vec![("status", "tinggi"), ("lama", "tinggi"), ("dbr", "rendah")]
    );
}

#[test]
fn test_serde_shape() {
    let premise = Condition::is("dbr", "sedang").and(Condition::is("gaji", "sedang"));
    let json = serde_json::to_value(&premise).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "and": [
                { "is": { "variable": "dbr", "term": "sedang" } },
                { "is": { "variable": "gaji", "term": "sedang" } }
            ]
        })
    );
    assert_eq!(serde_json::from_value::<Condition>(json).unwrap(), premise);
}

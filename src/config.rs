//! Declarative model descriptions.
//!
//! A [`ModelConfig`] is plain data, so alternative rule sets are alternative files rather than
//! alternative code. JSON and TOML are both accepted:
//!
//! ```json
//! {
//!   "antecedents": [{
//!     "name": "status", "min": 0, "max": 10, "step": 1,
//!     "terms": [{ "name": "tinggi", "shape": { "triangular": [5, 10, 10] } }]
//!   }],
//!   "consequent": {
//!     "name": "score", "min": 0, "max": 100, "step": 1,
//!     "terms": [{ "name": "layak", "shape": { "triangular": [60, 100, 100] } }]
//!   },
//!   "rules": [{
//!     "premise": { "is": { "variable": "status", "term": "tinggi" } },
//!     "consequences": [{ "variable": "score", "term": "layak", "weight": 1.0 }]
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FuzzyResult;
use crate::inference::Engine;
use crate::membership::MembershipFunction;
use crate::ops::DefuzzificationOp;
use crate::rules::Rule;
use crate::variable::{LinguisticVariable, Role, Universe};

fn default_clip_inputs() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub name: String,
    pub shape: MembershipFunction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub terms: Vec<TermConfig>,
}

impl VariableConfig {
    pub fn build(&self, role: Role) -> FuzzyResult<LinguisticVariable> {
        let universe = Universe::new(self.min, self.max, self.step)?;
        let mut var = LinguisticVariable::new(&self.name, role, universe);

        for term in &self.terms {
            var.add_term(&term.name, term.shape.clone())?;
        }

        Ok(var)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub antecedents: Vec<VariableConfig>,
    pub consequent: VariableConfig,
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub defuzzification: DefuzzificationOp,
    #[serde(default = "default_clip_inputs")]
    pub clip_inputs: bool,
}

impl ModelConfig {
    pub fn from_json_str(s: &str) -> FuzzyResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_toml_str(s: &str) -> FuzzyResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_json_string(&self) -> FuzzyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build(&self) -> FuzzyResult<Engine> {
        let mut builder = Engine::builder()
            .defuzzification(self.defuzzification)
            .clip_inputs(self.clip_inputs);

        for var in &self.antecedents {
            builder = builder.variable(var.build(Role::Antecedent)?);
        }

        builder
            .variable(self.consequent.build(Role::Consequent)?)
            .rules(self.rules.iter().cloned())
            .build()
    }
}

impl Engine {
    pub fn from_config(config: &ModelConfig) -> FuzzyResult<Engine> {
        config.build()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::FuzzyError;

    const STATUS_TOML: &str = r#"
clip_inputs = false

[[antecedents]]
name = "status"
min = 0.0
max = 10.0
step = 1.0
terms = [
    { name = "rendah", shape = { triangular = [0.0, 0.0, 5.0] } },
    { name = "tinggi", shape = { triangular = [5.0, 10.0, 10.0] } },
]

[consequent]
name = "score"
min = 0.0
max = 100.0
step = 1.0
terms = [
    { name = "layak", shape = { triangular = [60.0, 100.0, 100.0] } },
    { name = "tidak_layak", shape = { piecewise = [[0.0, 1.0], [50.0, 0.0]] } },
]

[[rules]]
label = "tinggi"
premise = { is = { variable = "status", term = "tinggi" } }
consequences = [{ variable = "score", term = "layak" }]

[[rules]]
premise = { or = [{ is = { variable = "status", term = "rendah" } }, { not = { is = { variable = "status", term = "tinggi" } } }] }
consequences = [{ variable = "score", term = "tidak_layak", weight = 0.5 }]
"#;

    #[test]
    fn toml_model() {
        let config = ModelConfig::from_toml_str(STATUS_TOML).unwrap();

        assert!(!config.clip_inputs);
        assert_eq!(config.defuzzification, DefuzzificationOp::Cog);
        assert_eq!(config.rules[0].label.as_deref(), Some("tinggi"));
        assert_eq!(config.rules[1].consequences[0].weight, 0.5);
        assert_eq!(config.rules[0].consequences[0].weight, 1.);

        let engine = Engine::from_config(&config).unwrap();
        let inputs: HashMap<String, f64> = [("status".to_string(), 10.)].into();
        let crisp = engine.evaluate(&inputs).unwrap();

        assert!((crisp - 86.67).abs() < 0.01, "{crisp}");
    }

    #[test]
    fn json_round_trip() {
        let config = ModelConfig::from_toml_str(STATUS_TOML).unwrap();
        let json = config.to_json_string().unwrap();

        assert_eq!(ModelConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn parse_errors_are_config_errors() {
        assert!(matches!(ModelConfig::from_json_str("{"), Err(FuzzyError::Config(_))));
        assert!(matches!(
            ModelConfig::from_toml_str("antecedents = 3"),
            Err(FuzzyError::Config(_))
        ));
    }

    #[test]
    fn invalid_shapes_fail_at_build() {
        let mut config = ModelConfig::from_toml_str(STATUS_TOML).unwrap();

        config.antecedents[0].terms[0].shape = MembershipFunction::Triangular(5., 0., 0.);

        assert!(matches!(config.build(), Err(FuzzyError::InvalidShape(_))));

        let mut config = ModelConfig::from_toml_str(STATUS_TOML).unwrap();

        let duplicate = config.antecedents[0].terms[0].clone();

        config.antecedents[0].terms.push(duplicate);

        assert!(matches!(config.build(), Err(FuzzyError::DuplicateTerm { .. })));
    }
}

use std::collections::HashMap;

use serde::Serialize;

/// Firing strength of one rule in a compute call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleActivation {
    pub rule: usize,
    pub label: Option<String>,
    pub strength: f64,
}

/// Diagnostic trace of a compute call, for the caller to render or log.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub activations: Vec<RuleActivation>,
    /// Sample points of the consequent universe
    pub universe: Vec<f64>,
    /// Aggregated output membership at each sample point
    pub aggregated: Vec<f64>,
}

impl Report {
    /// Rules that contributed to the output
    pub fn fired(&self) -> impl Iterator<Item = &RuleActivation> {
        self.activations.iter().filter(|a| a.strength > 0.)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outputs {
    defuzzificated: HashMap<String, f64>,
    report: Report,
}

impl Outputs {
    pub(crate) fn new(defuzzificated: HashMap<String, f64>, report: Report) -> Self {
        Self { defuzzificated, report }
    }

    pub fn get(&self, var: &str) -> Option<f64> {
        self.defuzzificated.get(var).copied()
    }

    pub fn report(&self) -> &Report {
        &self.report
    }
}

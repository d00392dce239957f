use std::collections::HashMap;

/// Crisp values for antecedent variables, by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) HashMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, var: impl Into<String>, val: f64) {
        self.0.insert(var.into(), val);
    }

    pub fn with(mut self, var: impl Into<String>, val: f64) -> Self {
        self.add(var, val);
        self
    }

    pub fn get(&self, var: &str) -> Option<f64> {
        self.0.get(var).copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, f64>> for Inputs {
    fn from(map: HashMap<String, f64>) -> Self {
        Inputs(map)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Inputs(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

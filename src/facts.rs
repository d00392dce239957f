use std::collections::HashMap;

use crate::error::{FuzzyError, FuzzyResult};
use crate::variable::{VariableKey, Variables};

/// Crisp facts bound for one compute call, with the term degrees fuzzified so far.
///
/// Lives for a single call so nothing cached here can outlast the bindings it came from.
pub(crate) struct Facts<'a> {
    variables: &'a Variables,
    values: HashMap<VariableKey, f64>,
    degrees: HashMap<(VariableKey, &'a str), f64>,
}

impl<'a> Facts<'a> {
    pub(crate) fn new(variables: &'a Variables, values: HashMap<VariableKey, f64>) -> Self {
        Self {
            variables,
            values,
            degrees: HashMap::new(),
        }
    }

    /// Degree of `variable is term`. The cache is keyed on names owned by the variables, so the
    /// callers' strings only need to live for the lookup.
    pub(crate) fn membership(&mut self, variable: &str, term: &str) -> FuzzyResult<f64> {
        let variables = self.variables;
        let key = variables.key(variable)?;
        let (term, mf) = variables
            .get(key)
            .ok_or_else(|| FuzzyError::UnknownVariable(variable.to_owned()))?
            .term_entry(term)?;

        if let Some(degree) = self.degrees.get(&(key, term)) {
            return Ok(*degree);
        }

        let value = *self
            .values
            .get(&key)
            .ok_or_else(|| FuzzyError::MissingInput(variable.to_owned()))?;
        let degree = mf.degree(value);

        self.degrees.insert((key, term), degree);

        Ok(degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::Condition;
    use crate::membership::MembershipFunction;
    use crate::variable::{LinguisticVariable, Universe};

    fn variables() -> Variables {
        let mut vars = Variables::new();
        let universe = Universe::new(0., 10., 1.).unwrap();

        for name in ["x", "y"] {
            let var = LinguisticVariable::antecedent(name, universe.clone())
                .with_term("low", MembershipFunction::triangular(0., 0., 10.).unwrap())
                .unwrap()
                .with_term("high", MembershipFunction::triangular(0., 10., 10.).unwrap())
                .unwrap();

            vars.insert(var).unwrap();
        }

        vars
    }

    fn facts(vars: &Variables, x: f64, y: Option<f64>) -> Facts<'_> {
        let mut values = HashMap::new();

        values.insert(vars.key("x").unwrap(), x);
        if let Some(y) = y {
            values.insert(vars.key("y").unwrap(), y);
        }

        Facts::new(vars, values)
    }

    #[test]
    fn and_is_min_or_is_max() {
        let vars = variables();
        let and = Condition::is("x", "high").and(Condition::is("y", "high"));
        let or = Condition::is("x", "high").or(Condition::is("y", "high"));

        for (x, y) in [(3., 7.), (7., 3.), (0., 10.), (5., 5.)] {
            let mut facts = facts(&vars, x, Some(y));
            let (dx, dy) = (x / 10., y / 10.);

            assert_eq!(and.evaluate(&mut facts), Ok(f64::min(dx, dy)));
            assert_eq!(or.evaluate(&mut facts), Ok(f64::max(dx, dy)));
        }
    }

    #[test]
    fn not_is_complement() {
        let vars = variables();
        let mut facts = facts(&vars, 2., Some(0.));

        assert_eq!(Condition::is("x", "low").not().evaluate(&mut facts), Ok(1. - 0.8));
    }

    #[test]
    fn missing_input_is_an_error() {
        let vars = variables();
        let mut facts = facts(&vars, 2., None);
        let premise = Condition::is("x", "low").and(Condition::is("y", "low"));

        assert_eq!(premise.evaluate(&mut facts), Err(FuzzyError::MissingInput("y".into())));
    }

    #[test]
    fn unknown_references_are_errors() {
        let vars = variables();
        let mut facts = facts(&vars, 2., Some(3.));

        assert_eq!(
            Condition::is("z", "low").evaluate(&mut facts),
            Err(FuzzyError::UnknownVariable("z".into()))
        );
        assert!(matches!(
            Condition::is("x", "medium").evaluate(&mut facts),
            Err(FuzzyError::UnknownTerm { .. })
        ));
    }

    #[test]
    fn temporary_conditions_share_facts() {
        let vars = variables();
        let mut facts = facts(&vars, 4., Some(3.));

        assert_eq!(Condition::is("x", "high").evaluate(&mut facts), Ok(0.4));
        assert_eq!(Condition::is("y", "low").evaluate(&mut facts), Ok(0.7));
        assert_eq!(Condition::is("x", "high").not().evaluate(&mut facts), Ok(0.6));
        assert_eq!(facts.degrees.len(), 2);
    }

    #[test]
    fn degrees_are_cached_per_term() {
        let vars = variables();
        let mut facts = facts(&vars, 4., Some(3.));

        assert_eq!(facts.membership("x", "high"), Ok(0.4));
        assert_eq!(facts.membership("x", "low"), Ok(0.6));
        assert_eq!(facts.degrees.len(), 2);
        assert_eq!(facts.membership("x", "high"), Ok(0.4));
        assert_eq!(facts.degrees.len(), 2);
    }
}

use crate::error::{FuzzyError, FuzzyResult};
use crate::inference::Engine;
use crate::inputs::Inputs;
use crate::outputs::{Outputs, Report};
use crate::variable::Role;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Inputs may be set; nothing computed for the current bindings yet
    Bound,
    Computed(Outputs),
    Failed(FuzzyError),
}

/// Bindings for one request against a shared [`Engine`].
///
/// Changing any binding drops the previous result, so a recompute never sees stale outputs.
#[derive(Debug)]
pub struct Simulation<'e> {
    engine: &'e Engine,
    inputs: Inputs,
    state: SessionState,
}

impl<'e> Simulation<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            inputs: Inputs::new(),
            state: SessionState::Bound,
        }
    }

    /// Binds an antecedent. Consequents and unknown names are rejected.
    pub fn input(&mut self, name: &str, value: f64) -> FuzzyResult<&mut Self> {
        if self.engine.variable(name)?.role() != Role::Antecedent {
            return Err(FuzzyError::RoleMismatch {
                variable: name.to_owned(),
                expected: Role::Antecedent,
            });
        }

        self.inputs.add(name, value);
        self.state = SessionState::Bound;

        Ok(self)
    }

    pub fn inputs<'n>(&mut self, values: impl IntoIterator<Item = (&'n str, f64)>) -> FuzzyResult<&mut Self> {
        for (name, value) in values {
            self.input(name, value)?;
        }

        Ok(self)
    }

    pub fn compute(&mut self) -> FuzzyResult<&Outputs> {
        self.state = match self.engine.compute(&self.inputs) {
            Ok(outputs) => SessionState::Computed(outputs),
            Err(err) => SessionState::Failed(err),
        };

        match &self.state {
            SessionState::Computed(outputs) => Ok(outputs),
            SessionState::Failed(err) => Err(err.clone()),
            SessionState::Bound => unreachable!("state was just set"),
        }
    }

    pub fn output(&self, name: &str) -> Option<f64> {
        match &self.state {
            SessionState::Computed(outputs) => outputs.get(name),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&Report> {
        match &self.state {
            SessionState::Computed(outputs) => Some(outputs.report()),
            _ => None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn bound(&self) -> &Inputs {
        &self.inputs
    }

    /// Forgets every binding and result
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.state = SessionState::Bound;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::Condition;
    use crate::membership::MembershipFunction;
    use crate::rules::{Consequence, Rule};
    use crate::variable::{LinguisticVariable, Universe};

    fn engine() -> Engine {
        let x = LinguisticVariable::antecedent("x", Universe::new(0., 10., 0.5).unwrap())
            .with_term("high", MembershipFunction::triangular(0., 10., 10.).unwrap())
            .unwrap();
        let y = LinguisticVariable::consequent("y", Universe::new(0., 10., 0.5).unwrap())
            .with_term("high", MembershipFunction::triangular(5., 10., 10.).unwrap())
            .unwrap();

        Engine::builder()
            .variable(x)
            .variable(y)
            .rule(Rule::new(Condition::is("x", "high"), Consequence::new("y", "high")))
            .build()
            .unwrap()
    }

    #[test]
    fn bound_computed_failed() {
        let engine = engine();
        let mut sim = Simulation::new(&engine);

        assert_eq!(sim.state(), &SessionState::Bound);
        assert_eq!(sim.compute().unwrap_err(), FuzzyError::MissingInput("x".into()));
        assert!(matches!(sim.state(), SessionState::Failed(FuzzyError::MissingInput(_))));
        assert_eq!(sim.output("y"), None);

        sim.input("x", 8.).unwrap();

        assert_eq!(sim.state(), &SessionState::Bound);

        let y = sim.compute().unwrap().get("y").unwrap();

        assert!(matches!(sim.state(), SessionState::Computed(_)));
        assert_eq!(sim.output("y"), Some(y));
        assert!(sim.report().is_some());
    }

    #[test]
    fn recompute_is_idempotent_and_rebinding_drops_results() {
        let engine = engine();
        let mut sim = Simulation::new(&engine);

        sim.input("x", 4.).unwrap();

        let first = sim.compute().unwrap().get("y");
        let second = sim.compute().unwrap().get("y");

        assert_eq!(first, second);

        sim.input("x", 9.).unwrap();

        assert_eq!(sim.output("y"), None);

        let rebound = sim.compute().unwrap().get("y");
        let fresh = Simulation::new(&engine).input("x", 9.).unwrap().compute().unwrap().get("y");

        assert_eq!(rebound, fresh);
        assert!(rebound > first);

        sim.input("x", 0.).unwrap();

        assert_eq!(sim.compute().unwrap_err(), FuzzyError::NoRuleFired("y".into()));
    }

    #[test]
    fn rejects_unknown_and_output_bindings() {
        let engine = engine();
        let mut sim = Simulation::new(&engine);

        assert_eq!(
            sim.input("z", 1.).unwrap_err(),
            FuzzyError::UnknownVariable("z".into())
        );
        assert!(matches!(sim.input("y", 1.), Err(FuzzyError::RoleMismatch { .. })));

        sim.inputs([("x", 3.)]).unwrap();
        sim.reset();

        assert!(sim.bound().is_empty());
    }
}

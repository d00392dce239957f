use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{FuzzyError, FuzzyResult};
use crate::facts::Facts;
use crate::inputs::Inputs;
use crate::ops::DefuzzificationOp;
use crate::outputs::{Outputs, Report, RuleActivation};
use crate::rules::{Rule, Rules};
use crate::variable::{LinguisticVariable, Role, VariableKey, Variables};

/// Collects variables and rules; [`build`](Self::build) checks every reference before an
/// [`Engine`] exists.
#[derive(Debug)]
pub struct EngineBuilder {
    variables: Vec<LinguisticVariable>,
    rules: Rules,
    defuzz_op: DefuzzificationOp,
    clip_inputs: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            variables: Vec::new(),
            rules: Rules::new(),
            defuzz_op: DefuzzificationOp::default(),
            clip_inputs: true,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(mut self, var: LinguisticVariable) -> Self {
        self.variables.push(var);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        for rule in rules {
            self.rules.push(rule);
        }
        self
    }

    pub fn defuzzification(mut self, op: DefuzzificationOp) -> Self {
        self.defuzz_op = op;
        self
    }

    /// Clamp crisp inputs into their variable's universe before fuzzification. On by default.
    pub fn clip_inputs(mut self, clip: bool) -> Self {
        self.clip_inputs = clip;
        self
    }

    pub fn build(self) -> FuzzyResult<Engine> {
        let mut variables = Variables::new();

        for var in self.variables {
            variables.insert(var)?;
        }

        let consequents: Vec<VariableKey> = variables
            .iter()
            .filter(|(_, var)| var.role() == Role::Consequent)
            .map(|(key, _)| key)
            .collect();
        let consequent = match consequents[..] {
            [key] => key,
            [] => return Err(FuzzyError::InvalidModel("no consequent variable".into())),
            _ => {
                return Err(FuzzyError::InvalidModel(format!(
                    "exactly one consequent variable is supported, found {}",
                    consequents.len()
                )))
            },
        };

        if self.rules.is_empty() {
            return Err(FuzzyError::InvalidModel("no rules".into()));
        }

        let mut required = Vec::new();

        for (i, rule) in self.rules.iter().enumerate() {
            for (name, term) in rule.premise.propositions() {
                let key = resolve(&variables, name, term, Role::Antecedent)?;

                if !required.contains(&key) {
                    required.push(key);
                }
            }

            if rule.consequences.is_empty() {
                return Err(FuzzyError::InvalidModel(format!("rule {i} has no consequences")));
            }

            for consequence in &rule.consequences {
                consequence.validate()?;
                resolve(&variables, &consequence.variable, &consequence.term, Role::Consequent)?;
            }
        }

        let output = &variables[consequent];
        let mut consequent_terms = HashMap::new();

        for term in output.term_names() {
            consequent_terms.insert(term.to_owned(), output.membership(term)?);
        }

        debug!(
            variables = variables.len(),
            rules = self.rules.len(),
            consequent = output.name(),
            "built fuzzy engine"
        );

        Ok(Engine {
            variables,
            rules: self.rules,
            consequent,
            consequent_terms,
            required,
            defuzz_op: self.defuzz_op,
            clip_inputs: self.clip_inputs,
        })
    }
}

fn resolve(variables: &Variables, name: &str, term: &str, expected: Role) -> FuzzyResult<VariableKey> {
    let key = variables.key(name)?;
    let var = &variables[key];

    if var.role() != expected {
        return Err(FuzzyError::RoleMismatch {
            variable: name.to_owned(),
            expected,
        });
    }

    var.term(term)?;

    Ok(key)
}

/// Immutable Mamdani model: min/max premise logic, clip implication, max aggregation.
///
/// An engine holds configuration only. Every call to [`compute`](Self::compute) works on its
/// own bindings, so one engine can serve any number of threads through `&Engine` or `Arc`.
#[derive(Debug)]
pub struct Engine {
    variables: Variables,
    rules: Rules,
    consequent: VariableKey,
    consequent_terms: HashMap<String, Vec<f64>>,
    required: Vec<VariableKey>,
    defuzz_op: DefuzzificationOp,
    clip_inputs: bool,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Crisp output of the consequent for `inputs`. Entries not used by any rule are ignored.
    pub fn evaluate(&self, inputs: &HashMap<String, f64>) -> FuzzyResult<f64> {
        let outputs = self.run(inputs)?;
        let name = self.consequent_name();

        outputs.get(name).ok_or_else(|| FuzzyError::NoRuleFired(name.to_owned()))
    }

    pub fn compute(&self, inputs: &Inputs) -> FuzzyResult<Outputs> {
        self.run(&inputs.0)
    }

    /// Firing strength of every rule, in rule order
    pub fn firing_strengths(&self, inputs: &Inputs) -> FuzzyResult<Vec<f64>> {
        let mut facts = self.facts(&inputs.0)?;

        self.strengths(&mut facts)
    }

    fn run(&self, values: &HashMap<String, f64>) -> FuzzyResult<Outputs> {
        let mut facts = self.facts(values)?;
        let strengths = self.strengths(&mut facts)?;
        let output = &self.variables[self.consequent];
        let universe = output.universe().points();
        let mut aggregated = vec![0.; universe.len()];

        for (rule, strength) in self.rules.iter().zip(strengths.iter().copied()) {
            if strength <= 0. {
                continue;
            }

            for consequence in &rule.consequences {
                let level = strength * consequence.weight;
                let membership = self
                    .consequent_terms
                    .get(&consequence.term)
                    .ok_or_else(|| FuzzyError::UnknownTerm {
                        variable: consequence.variable.clone(),
                        term: consequence.term.clone(),
                    })?;

                for (agg, m) in aggregated.iter_mut().zip(membership.iter().copied()) {
                    *agg = f64::max(*agg, f64::min(level, m));
                }
            }
        }

        let crisp = self
            .defuzz_op
            .call(universe, &aggregated)
            .ok_or_else(|| FuzzyError::NoRuleFired(output.name().to_owned()))?;

        debug!(output = output.name(), crisp, method = ?self.defuzz_op, "defuzzificated");

        let activations = self
            .rules
            .iter()
            .zip(strengths)
            .enumerate()
            .map(|(i, (rule, strength))| RuleActivation {
                rule: i,
                label: rule.label.clone(),
                strength,
            })
            .collect();
        let report = Report {
            activations,
            universe: universe.to_vec(),
            aggregated,
        };
        let mut defuzzificated = HashMap::with_capacity(1);

        defuzzificated.insert(output.name().to_owned(), crisp);

        Ok(Outputs::new(defuzzificated, report))
    }

    fn facts(&self, values: &HashMap<String, f64>) -> FuzzyResult<Facts<'_>> {
        let mut bound = HashMap::with_capacity(self.required.len());

        for key in &self.required {
            let var = &self.variables[*key];
            let value = values
                .get(var.name())
                .copied()
                .ok_or_else(|| FuzzyError::MissingInput(var.name().to_owned()))?;

            if !value.is_finite() {
                return Err(FuzzyError::InvalidInput {
                    variable: var.name().to_owned(),
                    value,
                });
            }

            let value = if self.clip_inputs {
                let clipped = var.universe().clamp(value);

                if clipped != value {
                    debug!(input = var.name(), value, clipped, "input clipped to universe");
                }

                clipped
            } else {
                value
            };

            bound.insert(*key, value);
        }

        Ok(Facts::new(&self.variables, bound))
    }

    fn strengths(&self, facts: &mut Facts<'_>) -> FuzzyResult<Vec<f64>> {
        let mut strengths = Vec::with_capacity(self.rules.len());

        for (i, rule) in self.rules.iter().enumerate() {
            let strength = rule.premise.evaluate(facts)?;

            trace!(rule = i, label = rule.label.as_deref(), strength, "rule strength");

            strengths.push(strength);
        }

        Ok(strengths)
    }

    pub fn defuzzification(&self) -> DefuzzificationOp {
        self.defuzz_op
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules.0
    }

    pub fn variable(&self, name: &str) -> FuzzyResult<&LinguisticVariable> {
        self.variables.by_name(name)
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(_, var)| var.name())
    }

    pub fn antecedent_names(&self) -> impl Iterator<Item = &str> {
        self.variables
            .iter()
            .filter(|(_, var)| var.role() == Role::Antecedent)
            .map(|(_, var)| var.name())
    }

    pub fn consequent_name(&self) -> &str {
        self.variables[self.consequent].name()
    }

    pub fn term_names(&self, variable: &str) -> FuzzyResult<Vec<&str>> {
        Ok(self.variables.by_name(variable)?.term_names().collect())
    }

    /// Antecedents referenced by at least one rule; each must be bound to compute
    pub fn required_inputs(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(|key| self.variables[*key].name())
    }
}

//! Mamdani fuzzy inference.
//!
//! Build an [`Engine`] once, from an [`EngineBuilder`] or a declarative [`ModelConfig`], then
//! evaluate it for any number of requests:
//!
//! ```
//! use fuzzy_mamdani::{Condition, Consequence, Engine, Inputs, LinguisticVariable, MembershipFunction, Rule, Universe};
//!
//! # fn main() -> fuzzy_mamdani::FuzzyResult<()> {
//! let status = LinguisticVariable::antecedent("status", Universe::new(0., 10., 1.)?)
//!     .with_term("rendah", MembershipFunction::triangular(0., 0., 5.)?)?
//!     .with_term("tinggi", MembershipFunction::triangular(5., 10., 10.)?)?;
//! let score = LinguisticVariable::consequent("score", Universe::new(0., 100., 1.)?)
//!     .with_term("layak", MembershipFunction::triangular(60., 100., 100.)?)?;
//! let engine = Engine::builder()
//!     .variable(status)
//!     .variable(score)
//!     .rule(Rule::new(Condition::is("status", "tinggi"), Consequence::new("score", "layak")))
//!     .build()?;
//!
//! let outputs = engine.compute(&Inputs::new().with("status", 10.))?;
//!
//! assert!((outputs.get("score").unwrap() - 86.67).abs() < 0.01);
//! # Ok(())
//! # }
//! ```

mod config;
pub mod credit;
mod dsl;
mod error;
mod facts;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod session;
mod variable;

pub use config::{ModelConfig, TermConfig, VariableConfig};
pub use dsl::Condition;
pub use error::{FuzzyError, FuzzyResult};
pub use inference::{Engine, EngineBuilder};
pub use inputs::Inputs;
pub use membership::MembershipFunction;
pub use ops::DefuzzificationOp;
pub use outputs::{Outputs, Report, RuleActivation};
pub use rules::{Consequence, Rule, Rules};
pub use session::{SessionState, Simulation};
pub use variable::{LinguisticVariable, Role, Universe, VariableKey, Variables};

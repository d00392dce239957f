//! Credit eligibility on top of the fuzzy engine.
//!
//! Two rule sets share the same variables: [`standard_config`] and [`guarded_config`], which adds
//! a rule sending low employment status to `tidak_layak` and a guard sending low or medium
//! status to `dipertimbangkan`. Both are plain data in `models/`.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{FuzzyError, FuzzyResult};
use crate::inference::Engine;
use crate::inputs::Inputs;
use crate::outputs::Report;

const STANDARD_MODEL: &str = include_str!("../models/credit.json");
const GUARDED_MODEL: &str = include_str!("../models/credit_guarded.json");

pub fn standard_config() -> FuzzyResult<ModelConfig> {
    ModelConfig::from_json_str(STANDARD_MODEL)
}

pub fn guarded_config() -> FuzzyResult<ModelConfig> {
    ModelConfig::from_json_str(GUARDED_MODEL)
}

pub fn standard_engine() -> FuzzyResult<Engine> {
    Engine::from_config(&standard_config()?)
}

pub fn guarded_engine() -> FuzzyResult<Engine> {
    Engine::from_config(&guarded_config()?)
}

/// Debt burden ratio: monthly installments as a percentage of monthly income.
pub fn debt_burden_ratio(installments: f64, income: f64) -> FuzzyResult<f64> {
    if !installments.is_finite() || installments < 0. {
        return Err(FuzzyError::InvalidInput {
            variable: "installments".into(),
            value: installments,
        });
    }
    if !income.is_finite() || income < 0. {
        return Err(FuzzyError::InvalidInput {
            variable: "income".into(),
            value: income,
        });
    }
    if income == 0. {
        return Err(FuzzyError::DivisionByZero("dbr".into()));
    }

    Ok(installments / income * 100.)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum DbrBand {
    /// Below 30%
    Low,
    /// 30% to 50%
    Moderate,
    /// Above 50%
    High,
}

impl DbrBand {
    pub fn from_ratio(dbr: f64) -> Self {
        if dbr < 30. {
            DbrBand::Low
        } else if dbr <= 50. {
            DbrBand::Moderate
        } else {
            DbrBand::High
        }
    }

    /// Largest share of income a new installment may take
    pub fn max_installment_share(self) -> f64 {
        match self {
            DbrBand::Low => 0.5,
            DbrBand::Moderate => 0.4,
            DbrBand::High => 0.3,
        }
    }

    pub fn max_installment(self, income: f64) -> f64 {
        self.max_installment_share() * income
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Verdict {
    Eligible,
    Considered,
    NotEligible,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 60. {
            Verdict::Eligible
        } else if score >= 40. {
            Verdict::Considered
        } else {
            Verdict::NotEligible
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmploymentStatus {
    PartTime,
    Contract,
    Permanent,
}

impl EmploymentStatus {
    pub fn value(self) -> f64 {
        match self {
            EmploymentStatus::PartTime => 2.,
            EmploymentStatus::Contract => 5.,
            EmploymentStatus::Permanent => 8.,
        }
    }
}

/// Installments the applicant is already paying off elsewhere
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CreditHistory {
    TwoInstallments,
    OneInstallment,
    NoInstallments,
}

impl CreditHistory {
    pub fn value(self) -> f64 {
        match self {
            CreditHistory::TwoInstallments => 2.,
            CreditHistory::OneInstallment => 5.,
            CreditHistory::NoInstallments => 8.,
        }
    }
}

/// Income and installments are monthly, in millions of rupiah.
#[derive(Clone, Debug, PartialEq)]
pub struct Applicant {
    pub status: EmploymentStatus,
    pub years_employed: f64,
    pub income: f64,
    pub installments: f64,
    pub history: CreditHistory,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assessment {
    pub dbr: f64,
    pub band: DbrBand,
    pub max_installment: f64,
    pub score: f64,
    pub verdict: Verdict,
    pub report: Report,
}

impl Applicant {
    /// Crisp engine inputs, with the DBR derived from income and installments
    pub fn inputs(&self) -> FuzzyResult<Inputs> {
        let dbr = debt_burden_ratio(self.installments, self.income)?;

        Ok(self.inputs_with_dbr(dbr))
    }

    fn inputs_with_dbr(&self, dbr: f64) -> Inputs {
        Inputs::new()
            .with("status", self.status.value())
            .with("lama", self.years_employed)
            .with("gaji", self.income)
            .with("cicilan", self.installments)
            .with("riwayat", self.history.value())
            .with("dbr", dbr)
    }

    pub fn assess(&self, engine: &Engine) -> FuzzyResult<Assessment> {
        let dbr = debt_burden_ratio(self.installments, self.income)?;
        let inputs = self.inputs_with_dbr(dbr);
        let outputs = engine.compute(&inputs)?;
        let score = outputs
            .get(engine.consequent_name())
            .ok_or_else(|| FuzzyError::NoRuleFired(engine.consequent_name().to_owned()))?;
        let band = DbrBand::from_ratio(dbr);
        let verdict = Verdict::from_score(score);

        debug!(dbr, score, ?band, ?verdict, "assessed applicant");

        Ok(Assessment {
            dbr,
            band,
            max_installment: band.max_installment(self.income),
            score,
            verdict,
            report: outputs.report().clone(),
        })
    }
}

/// Convenience for callers that already hold raw values by variable name
pub fn evaluate(engine: &Engine, inputs: &HashMap<String, f64>) -> FuzzyResult<Verdict> {
    engine.evaluate(inputs).map(Verdict::from_score)
}

#[test]
fn test_debt_burden_ratio() {
    assert_eq!(debt_burden_ratio(1., 5.), Ok(20.));
    assert_eq!(debt_burden_ratio(0., 5.), Ok(0.));
    assert_eq!(debt_burden_ratio(3., 0.), Err(FuzzyError::DivisionByZero("dbr".into())));
    assert!(matches!(
        debt_burden_ratio(f64::NAN, 5.),
        Err(FuzzyError::InvalidInput { .. })
    ));
    assert!(matches!(
        debt_burden_ratio(1., f64::INFINITY),
        Err(FuzzyError::InvalidInput { .. })
    ));
    assert!(matches!(debt_burden_ratio(-1., 5.), Err(FuzzyError::InvalidInput { .. })));
}

#[test]
fn test_bands_and_verdicts() {
    assert_eq!(DbrBand::from_ratio(29.9), DbrBand::Low);
    assert_eq!(DbrBand::from_ratio(30.), DbrBand::Moderate);
    assert_eq!(DbrBand::from_ratio(50.), DbrBand::Moderate);
    assert_eq!(DbrBand::from_ratio(50.1), DbrBand::High);
    assert_eq!(DbrBand::Low.max_installment(10.), 5.);
    assert_eq!(DbrBand::High.max_installment(10.), 3.);

    assert_eq!(Verdict::from_score(60.), Verdict::Eligible);
    assert_eq!(Verdict::from_score(59.99), Verdict::Considered);
    assert_eq!(Verdict::from_score(40.), Verdict::Considered);
    assert_eq!(Verdict::from_score(39.99), Verdict::NotEligible);
}

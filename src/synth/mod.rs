//! Attribute-dependency synthesis pipeline.
//!
//! One record is produced by a single linear pass over five stages. Each stage
//! only sees the outputs of earlier stages:
//!
//! ```text
//! Demographics ──► tenure
//!      │
//!      ├──────────► Financials ──┐
//!      │                         ├──► ScoreInputs ──► credit_score ──► categorizers
//!      ├──────────► CreditProfile┘
//!      └──────────► Stability (also reads Financials.housing)
//! ```
//!
//! The random stream is passed in explicitly; the pipeline owns no randomness.

pub mod categorical;
pub mod categorize;
pub mod demographics;
pub mod employment;
pub mod financial;
pub mod housing;
pub mod score;

use rand::Rng;

use crate::domain::{Applicant, Housing, SynthConfig, SynthRequest};
use crate::error::AppError;

pub use categorize::{payment_history_class, score_bucket};
pub use demographics::{DemographicSampler, Demographics};
pub use employment::TenureModel;
pub use financial::{FinancialSynthesizer, Financials, debt_to_income};
pub use housing::{Stability, StabilityModel};
pub use score::{
    CreditProfile, CreditScoreModel, ScoreBreakdown, ScoreInputs, bankruptcy_penalty, years_since,
};

/// The five stages, built once from a validated config.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: SynthConfig,
    demographics: DemographicSampler,
    tenure: TenureModel,
    financial: FinancialSynthesizer,
    score: CreditScoreModel,
    stability: StabilityModel,
}

impl Synthesizer {
    /// Validate `config` and build the stage distributions.
    pub fn new(config: SynthConfig) -> Result<Self, AppError> {
        config.validate()?;
        let age_min = config.demographics.age_min;
        Ok(Self {
            demographics: DemographicSampler::new(&config.demographics)?,
            tenure: TenureModel::new(&config.tenure, age_min),
            financial: FinancialSynthesizer::new(&config.income, &config.debt)?,
            score: CreditScoreModel::new(&config.score, &config.bankruptcy, age_min)?,
            stability: StabilityModel::new(&config.housing, age_min),
            config,
        })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn score_model(&self) -> &CreditScoreModel {
        &self.score
    }

    /// Produce one applicant. Infallible: every stage clamps instead of rejecting.
    pub fn synthesize<R: Rng + ?Sized>(&self, rng: &mut R, request: &SynthRequest) -> Applicant {
        let demo = self.demographics.sample(rng, &request.overrides);
        let years_with_employer = self.tenure.years_with_employer(rng, &demo);
        let fin = self.financial.synthesize(rng, &demo, &request.overrides);
        let profile = self.score.draw_profile(rng, &demo, request.as_of);

        let inputs = ScoreInputs {
            baseline: profile.score_baseline,
            income: fin.income,
            dti: fin.dti,
            utilization: profile.credit_card_utilization,
            education_level: demo.education_level,
            delinquencies: profile.delinquency_history,
            inquiries: profile.credit_inquiries_last_6_months,
            credit_history_length: profile.credit_history_length,
            years_since_bankruptcy: profile.bankruptcy_date.map(|d| years_since(d, request.as_of)),
        };
        let credit_score = self.score.score(&inputs);

        let stability = self.stability.synthesize(rng, &demo, &fin);

        let bankruptcy_history = profile.bankruptcy_date.is_some();
        let payment_history_class = payment_history_class(
            credit_score,
            profile.delinquency_history,
            bankruptcy_history,
            &self.config.payment_history,
        );
        let credit_score_bucket =
            score_bucket(credit_score, &self.config.buckets, self.config.score.score_min);

        Applicant {
            age: demo.age,
            gender: demo.gender,
            region: demo.region,
            education_level: demo.education_level,
            employment_status: demo.employment_status,
            dependents: demo.dependents,
            years_with_employer,
            income: fin.income,
            housing: fin.housing,
            existing_debt: fin.existing_debt,
            credit_card_debt: fin.credit_card_debt,
            mortgage_debt: fin.mortgage_debt,
            auto_loan_debt: fin.auto_loan_debt,
            total_debt: fin.total_debt,
            dti: fin.dti,
            loan_balance: fin.loan_balance,
            credit_card_utilization: profile.credit_card_utilization,
            credit_inquiries_last_6_months: profile.credit_inquiries_last_6_months,
            delinquency_history: profile.delinquency_history,
            bankruptcy_history,
            bankruptcy_date: profile.bankruptcy_date,
            credit_history_length: profile.credit_history_length,
            account_age: profile.account_age,
            credit_score,
            housing_payment: stability.housing_payment,
            years_at_current_address: stability.years_at_current_address,
            payment_history_class,
            credit_score_bucket,
        }
    }
}

/// Check the record-level invariants of a finished applicant.
///
/// Returns a description of the first violation found.
pub fn check_invariants(a: &Applicant, config: &SynthConfig) -> Result<(), String> {
    let reals = [
        ("income", a.income),
        ("existing_debt", a.existing_debt),
        ("credit_card_debt", a.credit_card_debt),
        ("mortgage_debt", a.mortgage_debt),
        ("auto_loan_debt", a.auto_loan_debt),
        ("total_debt", a.total_debt),
        ("dti", a.dti),
        ("loan_balance", a.loan_balance),
        ("credit_card_utilization", a.credit_card_utilization),
        ("housing_payment", a.housing_payment),
        ("years_at_current_address", a.years_at_current_address),
    ];
    for (name, v) in reals {
        if !(v.is_finite() && v >= 0.0) {
            return Err(format!("{name} must be finite and >= 0 (got {v})"));
        }
    }

    let d = &config.demographics;
    if !(d.age_min..=d.age_max).contains(&a.age) {
        return Err(format!("age {} outside [{}, {}]", a.age, d.age_min, d.age_max));
    }
    if a.income > config.income.cap {
        return Err(format!("income {} above cap {}", a.income, config.income.cap));
    }
    if a.total_debt != a.existing_debt + a.credit_card_debt + a.mortgage_debt + a.auto_loan_debt {
        return Err("total_debt is not the sum of its components".to_string());
    }
    if a.credit_card_debt > a.existing_debt {
        return Err("credit_card_debt exceeds existing_debt".to_string());
    }
    if a.housing == Housing::Rent && a.mortgage_debt != 0.0 {
        return Err("renter carries mortgage debt".to_string());
    }
    if a.credit_card_utilization > 1.0 {
        return Err(format!("utilization {} above 1", a.credit_card_utilization));
    }
    let s = &config.score;
    if !(s.score_min..=s.score_max).contains(&a.credit_score) {
        return Err(format!("credit_score {} outside [{}, {}]", a.credit_score, s.score_min, s.score_max));
    }
    let adult_years = a.age - d.age_min;
    if a.credit_history_length > adult_years {
        return Err(format!(
            "credit_history_length {} exceeds adult years {adult_years}",
            a.credit_history_length
        ));
    }
    if a.account_age + a.credit_history_length != adult_years {
        return Err(format!(
            "account_age {} and credit_history_length {} do not span adult years {adult_years}",
            a.account_age, a.credit_history_length
        ));
    }
    if a.years_with_employer > adult_years {
        return Err(format!(
            "years_with_employer {} exceeds adult years {adult_years}",
            a.years_with_employer
        ));
    }
    if a.years_at_current_address > a.age as f64 {
        return Err("years_at_current_address exceeds age".to_string());
    }
    if a.bankruptcy_history != a.bankruptcy_date.is_some() {
        return Err("bankruptcy_history and bankruptcy_date disagree".to_string());
    }
    if a.credit_score_bucket != score_bucket(a.credit_score, &config.buckets, s.score_min) {
        return Err("credit_score_bucket does not match credit_score".to_string());
    }
    Ok(())
}

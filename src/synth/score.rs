//! Stage 4: credit profile draws and the credit score model.
//!
//! The score is `baseline + Σ adjustments`, rounded and clamped to
//! `[score_min, score_max]`. Each adjustment is a bounded, monotone function of a
//! single input:
//!
//! | factor          | shape                                             | sign |
//! |-----------------|---------------------------------------------------|------|
//! | DTI             | `max * (1 - exp(-dti / scale))`                   | −    |
//! | utilization     | `max * u`                                         | −    |
//! | income          | `max * min(income / reference, 1)`                | +    |
//! | education       | per-tier table                                    | +    |
//! | history length  | `max * (1 - exp(-years / scale))` (saturating)    | +    |
//! | delinquencies   | `weight * count`                                  | −    |
//! | inquiries       | `weight * count`                                  | −    |
//! | bankruptcy      | full, then linear taper to zero at the cutoff     | −    |

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Exp1, Normal, Poisson};

use crate::domain::{BankruptcyParams, EducationLevel, ScoreParams, factor};
use crate::error::AppError;
use crate::synth::demographics::Demographics;

const DAYS_PER_YEAR: f64 = 365.25;

/// Drawn credit behaviour, produced before the score is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditProfile {
    pub credit_card_utilization: f64,
    pub delinquency_history: u32,
    pub credit_inquiries_last_6_months: u32,
    pub bankruptcy_date: Option<NaiveDate>,
    pub credit_history_length: u32,
    /// Years between adulthood and the first extension of credit.
    pub account_age: u32,
    /// Per-applicant starting score (baseline plus jitter).
    pub score_baseline: f64,
}

/// Everything the score depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub baseline: f64,
    pub income: f64,
    pub dti: f64,
    pub utilization: f64,
    pub education_level: EducationLevel,
    pub delinquencies: u32,
    pub inquiries: u32,
    pub credit_history_length: u32,
    /// `None` when there is no bankruptcy on file.
    pub years_since_bankruptcy: Option<f64>,
}

/// Signed contribution of each factor. Penalties are stored as negative values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub baseline: f64,
    pub dti: f64,
    pub utilization: f64,
    pub income: f64,
    pub education: f64,
    pub history: f64,
    pub delinquency: f64,
    pub inquiries: f64,
    pub bankruptcy: f64,
}

impl ScoreBreakdown {
    /// Unclamped sum of baseline and adjustments.
    pub fn raw_total(&self) -> f64 {
        self.baseline
            + self.dti
            + self.utilization
            + self.income
            + self.education
            + self.history
            + self.delinquency
            + self.inquiries
            + self.bankruptcy
    }
}

#[derive(Debug, Clone)]
pub struct CreditScoreModel {
    score: ScoreParams,
    bankruptcy: BankruptcyParams,
    age_min: u32,
    baseline: Normal<f64>,
    delinquencies: Poisson<f64>,
    inquiries: Poisson<f64>,
}

impl CreditScoreModel {
    pub fn new(score: &ScoreParams, bankruptcy: &BankruptcyParams, age_min: u32) -> Result<Self, AppError> {
        let baseline = Normal::new(score.baseline, score.baseline_jitter)
            .map_err(|e| AppError::invalid(format!("Score baseline distribution error: {e}")))?;
        let delinquencies = Poisson::new(score.delinquency_mean)
            .map_err(|e| AppError::invalid(format!("Delinquency distribution error: {e}")))?;
        let inquiries = Poisson::new(score.inquiries_mean)
            .map_err(|e| AppError::invalid(format!("Inquiry distribution error: {e}")))?;
        Ok(Self {
            score: score.clone(),
            bankruptcy: bankruptcy.clone(),
            age_min,
            baseline,
            delinquencies,
            inquiries,
        })
    }

    pub fn draw_profile<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        demo: &Demographics,
        as_of: NaiveDate,
    ) -> CreditProfile {
        let s = &self.score;

        let scale = 10f64.powi(s.utilization_decimals as i32);
        let credit_card_utilization = (rng.gen_range(0.0..=1.0_f64) * scale).round() / scale;

        let delinquency_history = (self.delinquencies.sample(rng) as u32).min(s.delinquency_max);
        let credit_inquiries_last_6_months = (self.inquiries.sample(rng) as u32).min(s.inquiries_max);

        let bankrupt = rng.gen_bool(self.bankruptcy.probability);
        let lookback_days = i64::from(self.bankruptcy.lookback_years) * 365;
        let days_ago = rng.gen_range(0..lookback_days);
        let bankruptcy_date = bankrupt.then(|| {
            as_of
                .checked_sub_signed(Duration::days(days_ago))
                .unwrap_or(as_of)
        });

        // First extension of credit happens no earlier than legal adulthood and
        // no later than today. The cap is applied before the cast.
        let adult_years = demo.age.saturating_sub(self.age_min);
        let draw: f64 = rng.sample(Exp1);
        let account_age = (s.first_credit_delay_mean * draw).floor().min(adult_years as f64) as u32;
        let credit_history_length = adult_years - account_age;

        let score_baseline = self.baseline.sample(rng);

        CreditProfile {
            credit_card_utilization,
            delinquency_history,
            credit_inquiries_last_6_months,
            bankruptcy_date,
            credit_history_length,
            account_age,
            score_baseline,
        }
    }

    pub fn breakdown(&self, inputs: &ScoreInputs) -> ScoreBreakdown {
        let s = &self.score;
        let dti = inputs.dti.max(0.0);
        let utilization = inputs.utilization.clamp(0.0, 1.0);
        let income_share = (inputs.income.max(0.0) / s.income_reference).min(1.0);
        let history = inputs.credit_history_length as f64;

        ScoreBreakdown {
            baseline: inputs.baseline,
            dti: -s.dti_max_penalty * (1.0 - (-dti / s.dti_scale).exp()),
            utilization: -s.utilization_max_penalty * utilization,
            income: s.income_max_bonus * income_share,
            education: factor(&s.education_bonus, &inputs.education_level, 0.0),
            history: s.history_max_bonus * (1.0 - (-history / s.history_scale_years).exp()),
            delinquency: -s.delinquency_penalty * inputs.delinquencies as f64,
            inquiries: -s.inquiry_penalty * inputs.inquiries as f64,
            bankruptcy: -inputs
                .years_since_bankruptcy
                .map_or(0.0, |years| bankruptcy_penalty(years, &self.bankruptcy)),
        }
    }

    /// Final score: rounded sum, clamped into `[score_min, score_max]`.
    pub fn score(&self, inputs: &ScoreInputs) -> i32 {
        clamp_score(self.breakdown(inputs).raw_total(), self.score.score_min, self.score.score_max)
    }
}

/// Round then clamp. Non-finite sums fall to the floor.
pub fn clamp_score(raw: f64, score_min: i32, score_max: i32) -> i32 {
    if !raw.is_finite() {
        return if raw == f64::INFINITY { score_max } else { score_min };
    }
    (raw.round() as i64).clamp(i64::from(score_min), i64::from(score_max)) as i32
}

/// Magnitude of the bankruptcy penalty for a bankruptcy `years` old.
///
/// Full penalty up to `full_penalty_years`, linear taper to zero at
/// `cutoff_years`, zero afterwards. Non-increasing in `years`.
pub fn bankruptcy_penalty(years: f64, params: &BankruptcyParams) -> f64 {
    let years = years.max(0.0);
    if years <= params.full_penalty_years {
        params.full_penalty
    } else if years >= params.cutoff_years {
        0.0
    } else {
        let remaining = (params.cutoff_years - years) / (params.cutoff_years - params.full_penalty_years);
        params.full_penalty * remaining
    }
}

/// Whole-day age of a bankruptcy in years at `as_of`.
pub fn years_since(date: NaiveDate, as_of: NaiveDate) -> f64 {
    (as_of - date).num_days().max(0) as f64 / DAYS_PER_YEAR
}

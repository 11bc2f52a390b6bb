//! Named parameter set for the synthesis pipeline.
//!
//! Every weight, cap, label weight table and threshold the stages use lives here,
//! so a run is fully described by `(SynthConfig, seed, as-of date)`.
//!
//! All structs use `#[serde(default)]`: a config file only needs the keys it
//! wants to change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{EducationLevel, EmploymentStatus, Region, ScoreBucket};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SynthConfig {
    pub demographics: DemographicParams,
    pub tenure: TenureParams,
    pub income: IncomeParams,
    pub debt: DebtParams,
    pub score: ScoreParams,
    pub bankruptcy: BankruptcyParams,
    pub housing: HousingParams,
    pub payment_history: PaymentHistoryParams,
    pub buckets: BucketThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicParams {
    pub age_mean: f64,
    pub age_std_dev: f64,
    /// Legal adult minimum. Also the floor for the first extension of credit.
    pub age_min: u32,
    pub age_max: u32,
    pub education_weights: BTreeMap<EducationLevel, f64>,
    pub employment_weights: BTreeMap<EmploymentStatus, f64>,
    pub dependents_mean: f64,
    pub dependents_max: u32,
}

impl Default for DemographicParams {
    fn default() -> Self {
        Self {
            age_mean: 40.0,
            age_std_dev: 12.0,
            age_min: 18,
            age_max: 70,
            education_weights: BTreeMap::from([
                (EducationLevel::LessThanHighSchool, 0.09),
                (EducationLevel::HighSchool, 0.27),
                (EducationLevel::Associate, 0.11),
                (EducationLevel::Bachelor, 0.30),
                (EducationLevel::Master, 0.17),
                (EducationLevel::Doctorate, 0.06),
            ]),
            employment_weights: BTreeMap::from([
                (EmploymentStatus::FullTime, 0.62),
                (EmploymentStatus::PartTime, 0.12),
                (EmploymentStatus::SelfEmployed, 0.10),
                (EmploymentStatus::Unemployed, 0.05),
                (EmploymentStatus::Retired, 0.11),
            ]),
            dependents_mean: 1.0,
            dependents_max: 6,
        }
    }
}

/// Years-with-employer model.
///
/// Working applicants draw from a gamma(2) distribution with mean
/// `working_base_years + working_years_per_adult_year * (age - age_min)`;
/// unemployed/retired applicants draw from an exponential with mean
/// `idle_mean_years` (mostly zero after flooring).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenureParams {
    pub working_base_years: f64,
    pub working_years_per_adult_year: f64,
    pub idle_mean_years: f64,
}

impl Default for TenureParams {
    fn default() -> Self {
        Self {
            working_base_years: 1.0,
            working_years_per_adult_year: 0.3,
            idle_mean_years: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeParams {
    /// Median of the log-normal base draw, before multipliers.
    pub median: f64,
    /// Log-space standard deviation of the base draw.
    pub log_sigma: f64,
    pub floor: f64,
    pub cap: f64,
    pub region_multiplier: BTreeMap<Region, f64>,
    pub education_multiplier: BTreeMap<EducationLevel, f64>,
    pub employment_multiplier: BTreeMap<EmploymentStatus, f64>,
    /// Probability that a draw is pushed into the heavy tail.
    pub outlier_probability: f64,
    /// Outlier multipliers, picked uniformly.
    pub outlier_multipliers: Vec<f64>,
}

impl Default for IncomeParams {
    fn default() -> Self {
        Self {
            median: 68_000.0,
            log_sigma: 0.45,
            floor: 0.0,
            cap: 400_000.0,
            region_multiplier: BTreeMap::from([
                (Region::Northeast, 1.1),
                (Region::Midwest, 0.9),
                (Region::South, 0.8),
                (Region::West, 1.0),
            ]),
            education_multiplier: BTreeMap::from([
                (EducationLevel::LessThanHighSchool, 0.6),
                (EducationLevel::HighSchool, 0.8),
                (EducationLevel::Associate, 1.0),
                (EducationLevel::Bachelor, 1.2),
                (EducationLevel::Master, 1.4),
                (EducationLevel::Doctorate, 1.6),
            ]),
            employment_multiplier: BTreeMap::from([
                (EmploymentStatus::FullTime, 1.0),
                (EmploymentStatus::PartTime, 0.6),
                (EmploymentStatus::SelfEmployed, 0.9),
                (EmploymentStatus::Unemployed, 0.2),
                (EmploymentStatus::Retired, 0.7),
            ]),
            outlier_probability: 0.01,
            outlier_multipliers: vec![2.0, 3.0],
        }
    }
}

/// Debt components, each a uniformly drawn ratio `[min, max]`.
///
/// Ownership probability is `logistic(own_intercept + own_age_coef * (age - 40)
/// + own_income_coef * ln(income / income.median))`, clamped to `own_probability_bounds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtParams {
    pub own_intercept: f64,
    pub own_age_coef: f64,
    pub own_income_coef: f64,
    pub own_probability_bounds: (f64, f64),
    /// Existing (non-specific) debt as a share of income.
    pub existing_to_income: (f64, f64),
    /// Credit-card debt as a share of existing debt.
    pub card_to_existing: (f64, f64),
    /// Mortgage principal as a multiple of income (owners only).
    pub mortgage_to_income: (f64, f64),
    pub auto_to_income: (f64, f64),
    pub loan_balance_mean: f64,
    pub loan_balance_std_dev: f64,
    /// Smallest income used as a DTI denominator.
    pub dti_epsilon: f64,
}

impl Default for DebtParams {
    fn default() -> Self {
        Self {
            own_intercept: 0.2,
            own_age_coef: 0.05,
            own_income_coef: 0.8,
            own_probability_bounds: (0.02, 0.98),
            existing_to_income: (0.0, 0.4),
            card_to_existing: (0.1, 0.6),
            mortgage_to_income: (1.0, 3.0),
            auto_to_income: (0.1, 0.5),
            loan_balance_mean: 10_000.0,
            loan_balance_std_dev: 5_000.0,
            dti_epsilon: 1.0,
        }
    }
}

/// Credit score weights.
///
/// Each adjustment is bounded by its `*_max_*` weight, so no single factor can
/// move the score by more than that amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    pub baseline: f64,
    /// Std dev of the per-applicant baseline jitter.
    pub baseline_jitter: f64,
    pub score_min: i32,
    pub score_max: i32,
    /// `penalty = dti_max_penalty * (1 - exp(-dti / dti_scale))`
    pub dti_max_penalty: f64,
    pub dti_scale: f64,
    /// `penalty = utilization_max_penalty * utilization`
    pub utilization_max_penalty: f64,
    /// `bonus = income_max_bonus * min(income / income_reference, 1)`
    pub income_max_bonus: f64,
    pub income_reference: f64,
    pub education_bonus: BTreeMap<EducationLevel, f64>,
    /// `bonus = history_max_bonus * (1 - exp(-years / history_scale_years))`
    pub history_max_bonus: f64,
    pub history_scale_years: f64,
    pub delinquency_penalty: f64,
    pub inquiry_penalty: f64,
    pub utilization_decimals: u32,
    /// Mean delay between legal adulthood and the first extension of credit.
    pub first_credit_delay_mean: f64,
    pub delinquency_mean: f64,
    pub delinquency_max: u32,
    pub inquiries_mean: f64,
    pub inquiries_max: u32,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            baseline: 700.0,
            baseline_jitter: 45.0,
            score_min: 300,
            score_max: 850,
            dti_max_penalty: 100.0,
            dti_scale: 3.0,
            utilization_max_penalty: 70.0,
            income_max_bonus: 40.0,
            income_reference: 150_000.0,
            education_bonus: BTreeMap::from([
                (EducationLevel::LessThanHighSchool, 0.0),
                (EducationLevel::HighSchool, 5.0),
                (EducationLevel::Associate, 10.0),
                (EducationLevel::Bachelor, 15.0),
                (EducationLevel::Master, 20.0),
                (EducationLevel::Doctorate, 25.0),
            ]),
            history_max_bonus: 60.0,
            history_scale_years: 8.0,
            delinquency_penalty: 25.0,
            inquiry_penalty: 4.0,
            utilization_decimals: 2,
            first_credit_delay_mean: 4.0,
            delinquency_mean: 0.8,
            delinquency_max: 10,
            inquiries_mean: 1.5,
            inquiries_max: 9,
        }
    }
}

/// Bankruptcy incidence and recency decay.
///
/// The penalty is `full_penalty` up to `full_penalty_years`, tapers linearly, and
/// is zero from `cutoff_years` on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankruptcyParams {
    pub probability: f64,
    pub lookback_years: u32,
    pub full_penalty: f64,
    pub full_penalty_years: f64,
    pub cutoff_years: f64,
}

impl Default for BankruptcyParams {
    fn default() -> Self {
        Self {
            probability: 0.1,
            lookback_years: 20,
            full_penalty: 150.0,
            full_penalty_years: 2.0,
            cutoff_years: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingParams {
    /// Monthly rent range before adjustments.
    pub rent_range: (f64, f64),
    /// Monthly mortgage payment range before adjustments.
    pub own_range: (f64, f64),
    pub cost_of_living: BTreeMap<Region, f64>,
    /// Payment uplift per dependent (`1 + n * dependent_uplift`).
    pub dependent_uplift: f64,
    /// Years-at-address mean is `address_base_years + address_years_per_adult_year * (age - age_min)`.
    pub address_base_years: f64,
    pub address_years_per_adult_year: f64,
}

impl Default for HousingParams {
    fn default() -> Self {
        Self {
            rent_range: (500.0, 3_500.0),
            own_range: (900.0, 4_500.0),
            cost_of_living: BTreeMap::from([
                (Region::Northeast, 1.2),
                (Region::Midwest, 0.8),
                (Region::South, 0.9),
                (Region::West, 1.1),
            ]),
            dependent_uplift: 0.1,
            address_base_years: 1.5,
            address_years_per_adult_year: 0.2,
        }
    }
}

/// Payment-history thresholds.
///
/// The class is the worse of the score class and the delinquency class;
/// any bankruptcy forces `Poor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentHistoryParams {
    pub excellent_min_score: i32,
    pub good_min_score: i32,
    pub average_min_score: i32,
    pub excellent_max_delinquencies: u32,
    pub good_max_delinquencies: u32,
    pub average_max_delinquencies: u32,
}

impl Default for PaymentHistoryParams {
    fn default() -> Self {
        Self {
            excellent_min_score: 750,
            good_min_score: 650,
            average_min_score: 580,
            excellent_max_delinquencies: 0,
            good_max_delinquencies: 1,
            average_max_delinquencies: 3,
        }
    }
}

/// Lower bounds (inclusive) of the buckets above `VeryPoor`.
///
/// `VeryPoor` covers `[score_min, fair)`, `Excellent` covers `[excellent, score_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    pub fair: i32,
    pub good: i32,
    pub very_good: i32,
    pub excellent: i32,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            fair: 580,
            good: 670,
            very_good: 740,
            excellent: 800,
        }
    }
}

impl BucketThresholds {
    /// Inclusive lower bound of `bucket`, given the score floor.
    pub fn lower_bound(&self, bucket: ScoreBucket, score_min: i32) -> i32 {
        match bucket {
            ScoreBucket::VeryPoor => score_min,
            ScoreBucket::Fair => self.fair,
            ScoreBucket::Good => self.good,
            ScoreBucket::VeryGood => self.very_good,
            ScoreBucket::Excellent => self.excellent,
        }
    }
}

impl SynthConfig {
    /// Check every parameter for domain validity.
    ///
    /// The stages assume a validated config; this is where bad user input is caught.
    pub fn validate(&self) -> Result<(), AppError> {
        let d = &self.demographics;
        check_finite_positive("demographics.age_std_dev", d.age_std_dev)?;
        check_finite("demographics.age_mean", d.age_mean)?;
        if d.age_min > d.age_max {
            return Err(AppError::invalid(format!(
                "demographics.age_min ({}) must be <= age_max ({}).",
                d.age_min, d.age_max
            )));
        }
        check_weights("demographics.education_weights", &d.education_weights)?;
        check_weights("demographics.employment_weights", &d.employment_weights)?;
        check_finite_positive("demographics.dependents_mean", d.dependents_mean)?;

        let t = &self.tenure;
        check_non_negative("tenure.working_base_years", t.working_base_years)?;
        check_non_negative("tenure.working_years_per_adult_year", t.working_years_per_adult_year)?;
        check_non_negative("tenure.idle_mean_years", t.idle_mean_years)?;

        let i = &self.income;
        check_finite_positive("income.median", i.median)?;
        check_non_negative("income.log_sigma", i.log_sigma)?;
        check_non_negative("income.floor", i.floor)?;
        check_finite_positive("income.cap", i.cap)?;
        if i.floor > i.cap {
            return Err(AppError::invalid("income.floor must be <= income.cap."));
        }
        check_multipliers("income.region_multiplier", &i.region_multiplier)?;
        check_multipliers("income.education_multiplier", &i.education_multiplier)?;
        check_multipliers("income.employment_multiplier", &i.employment_multiplier)?;
        check_probability("income.outlier_probability", i.outlier_probability)?;
        if i.outlier_probability > 0.0 && i.outlier_multipliers.is_empty() {
            return Err(AppError::invalid(
                "income.outlier_multipliers must not be empty when outliers are enabled.",
            ));
        }
        for &m in &i.outlier_multipliers {
            check_non_negative("income.outlier_multipliers", m)?;
        }

        let b = &self.debt;
        check_finite("debt.own_intercept", b.own_intercept)?;
        check_finite("debt.own_age_coef", b.own_age_coef)?;
        check_finite("debt.own_income_coef", b.own_income_coef)?;
        check_probability("debt.own_probability_bounds.0", b.own_probability_bounds.0)?;
        check_probability("debt.own_probability_bounds.1", b.own_probability_bounds.1)?;
        check_range("debt.own_probability_bounds", b.own_probability_bounds)?;
        check_range("debt.existing_to_income", b.existing_to_income)?;
        check_range("debt.card_to_existing", b.card_to_existing)?;
        if b.card_to_existing.1 > 1.0 {
            return Err(AppError::invalid(
                "debt.card_to_existing must not exceed 1 (card debt is part of existing debt).",
            ));
        }
        check_range("debt.mortgage_to_income", b.mortgage_to_income)?;
        if b.mortgage_to_income.0 <= 0.0 {
            return Err(AppError::invalid(
                "debt.mortgage_to_income lower bound must be > 0 (owners always carry a mortgage).",
            ));
        }
        check_range("debt.auto_to_income", b.auto_to_income)?;
        check_finite("debt.loan_balance_mean", b.loan_balance_mean)?;
        check_non_negative("debt.loan_balance_std_dev", b.loan_balance_std_dev)?;
        check_finite_positive("debt.dti_epsilon", b.dti_epsilon)?;

        let s = &self.score;
        check_finite("score.baseline", s.baseline)?;
        check_non_negative("score.baseline_jitter", s.baseline_jitter)?;
        if s.score_min >= s.score_max {
            return Err(AppError::invalid("score.score_min must be < score.score_max."));
        }
        check_non_negative("score.dti_max_penalty", s.dti_max_penalty)?;
        check_finite_positive("score.dti_scale", s.dti_scale)?;
        check_non_negative("score.utilization_max_penalty", s.utilization_max_penalty)?;
        check_non_negative("score.income_max_bonus", s.income_max_bonus)?;
        check_finite_positive("score.income_reference", s.income_reference)?;
        for (&level, &bonus) in &s.education_bonus {
            check_non_negative(&format!("score.education_bonus[{}]", level.label()), bonus)?;
        }
        check_non_negative("score.history_max_bonus", s.history_max_bonus)?;
        check_finite_positive("score.history_scale_years", s.history_scale_years)?;
        check_non_negative("score.delinquency_penalty", s.delinquency_penalty)?;
        check_non_negative("score.inquiry_penalty", s.inquiry_penalty)?;
        check_non_negative("score.first_credit_delay_mean", s.first_credit_delay_mean)?;
        check_finite_positive("score.delinquency_mean", s.delinquency_mean)?;
        check_finite_positive("score.inquiries_mean", s.inquiries_mean)?;
        if s.utilization_decimals > 6 {
            return Err(AppError::invalid("score.utilization_decimals must be <= 6."));
        }

        let k = &self.bankruptcy;
        check_probability("bankruptcy.probability", k.probability)?;
        if k.lookback_years == 0 {
            return Err(AppError::invalid("bankruptcy.lookback_years must be > 0."));
        }
        check_non_negative("bankruptcy.full_penalty", k.full_penalty)?;
        check_non_negative("bankruptcy.full_penalty_years", k.full_penalty_years)?;
        check_finite("bankruptcy.cutoff_years", k.cutoff_years)?;
        if k.cutoff_years <= k.full_penalty_years {
            return Err(AppError::invalid(
                "bankruptcy.cutoff_years must be > bankruptcy.full_penalty_years.",
            ));
        }

        let h = &self.housing;
        check_range("housing.rent_range", h.rent_range)?;
        check_range("housing.own_range", h.own_range)?;
        check_multipliers("housing.cost_of_living", &h.cost_of_living)?;
        check_non_negative("housing.dependent_uplift", h.dependent_uplift)?;
        check_non_negative("housing.address_base_years", h.address_base_years)?;
        check_non_negative("housing.address_years_per_adult_year", h.address_years_per_adult_year)?;

        let p = &self.payment_history;
        if !(p.excellent_min_score >= p.good_min_score && p.good_min_score >= p.average_min_score) {
            return Err(AppError::invalid(
                "payment_history score thresholds must satisfy excellent >= good >= average.",
            ));
        }
        if !(p.excellent_max_delinquencies <= p.good_max_delinquencies
            && p.good_max_delinquencies <= p.average_max_delinquencies)
        {
            return Err(AppError::invalid(
                "payment_history delinquency limits must satisfy excellent <= good <= average.",
            ));
        }

        let q = &self.buckets;
        let bounds = [s.score_min, q.fair, q.good, q.very_good, q.excellent];
        if bounds.windows(2).any(|w| w[0] >= w[1]) || q.excellent > s.score_max {
            return Err(AppError::invalid(format!(
                "buckets must be strictly increasing inside [{}, {}] (got fair={}, good={}, very_good={}, excellent={}).",
                s.score_min, s.score_max, q.fair, q.good, q.very_good, q.excellent
            )));
        }

        Ok(())
    }
}

fn check_finite(name: &str, v: f64) -> Result<(), AppError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(AppError::invalid(format!("{name} must be finite (got {v}).")))
    }
}

fn check_non_negative(name: &str, v: f64) -> Result<(), AppError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(AppError::invalid(format!("{name} must be finite and >= 0 (got {v}).")))
    }
}

fn check_finite_positive(name: &str, v: f64) -> Result<(), AppError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(AppError::invalid(format!("{name} must be finite and > 0 (got {v}).")))
    }
}

fn check_probability(name: &str, v: f64) -> Result<(), AppError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(AppError::invalid(format!("{name} must be in [0, 1] (got {v}).")))
    }
}

fn check_range(name: &str, (lo, hi): (f64, f64)) -> Result<(), AppError> {
    if lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi {
        Ok(())
    } else {
        Err(AppError::invalid(format!(
            "{name} must be a finite non-negative range with min <= max (got [{lo}, {hi}])."
        )))
    }
}

fn check_weights<K: std::fmt::Debug>(name: &str, table: &BTreeMap<K, f64>) -> Result<(), AppError> {
    for (k, &w) in table {
        check_non_negative(&format!("{name}[{k:?}]"), w)?;
    }
    if table.values().sum::<f64>() <= 0.0 {
        return Err(AppError::invalid(format!("{name} must contain a positive weight.")));
    }
    Ok(())
}

fn check_multipliers<K: std::fmt::Debug>(name: &str, table: &BTreeMap<K, f64>) -> Result<(), AppError> {
    for (k, &m) in table {
        check_non_negative(&format!("{name}[{k:?}]"), m)?;
    }
    Ok(())
}

/// Look up a per-category factor, falling back to `default` for missing keys.
pub fn factor<K: Ord>(table: &BTreeMap<K, f64>, key: &K, default: f64) -> f64 {
    table.get(key).copied().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SynthConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_unordered_buckets() {
        let mut config = SynthConfig::default();
        config.buckets.good = 560;
        let err = config.validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("buckets"));
    }

    #[test]
    fn rejects_excellent_bucket_above_score_max() {
        let mut config = SynthConfig::default();
        config.buckets.excellent = 851;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_all_zero_weights() {
        let mut config = SynthConfig::default();
        for w in config.demographics.employment_weights.values_mut() {
            *w = 0.0;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_card_share_above_existing_debt() {
        let mut config = SynthConfig::default();
        config.debt.card_to_existing = (0.5, 1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_cutoff_before_full_penalty_window() {
        let mut config = SynthConfig::default();
        config.bankruptcy.cutoff_years = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_education_bonus() {
        let mut config = SynthConfig::default();
        config.score.education_bonus.insert(EducationLevel::LessThanHighSchool, -10.0);
        let err = config.validate().unwrap_err();
        assert!(err.message().contains("education_bonus"));
    }

    #[test]
    fn rejects_nan_parameters() {
        let mut config = SynthConfig::default();
        config.income.median = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn factor_falls_back_for_missing_keys() {
        let mut table = SynthConfig::default().income.region_multiplier;
        table.remove(&Region::South);
        assert_eq!(factor(&table, &Region::South, 1.0), 1.0);
        assert_eq!(factor(&table, &Region::Northeast, 1.0), 1.1);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{ "score": { "baseline": 650.0 }, "buckets": { "fair": 600 } }"#;
        let config: SynthConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.score.baseline, 650.0);
        assert_eq!(config.score.score_max, 850);
        assert_eq!(config.buckets.fair, 600);
        assert_eq!(config.buckets.good, 670);
        assert_eq!(config.income, IncomeParams::default());
    }
}

//! Shared domain types.
//!
//! These types are intentionally kept small and `Copy` where possible so they can be:
//!
//! - threaded through the synthesis stages by value
//! - used as keys in the config weight tables
//! - rendered to CSV and terminal reports with stable labels

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Northeast,
    Midwest,
    South,
    West,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Northeast, Region::Midwest, Region::South, Region::West];

    pub fn label(self) -> &'static str {
        match self {
            Region::Northeast => "Northeast",
            Region::Midwest => "Midwest",
            Region::South => "South",
            Region::West => "West",
        }
    }
}

/// Highest completed education, ordered from lowest to highest tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "Less than High School")]
    LessThanHighSchool,
    #[serde(rename = "High School")]
    HighSchool,
    #[serde(rename = "Associate's Degree")]
    Associate,
    #[serde(rename = "Bachelor's Degree")]
    Bachelor,
    #[serde(rename = "Master's Degree")]
    Master,
    Doctorate,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 6] = [
        EducationLevel::LessThanHighSchool,
        EducationLevel::HighSchool,
        EducationLevel::Associate,
        EducationLevel::Bachelor,
        EducationLevel::Master,
        EducationLevel::Doctorate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::LessThanHighSchool => "Less than High School",
            EducationLevel::HighSchool => "High School",
            EducationLevel::Associate => "Associate's Degree",
            EducationLevel::Bachelor => "Bachelor's Degree",
            EducationLevel::Master => "Master's Degree",
            EducationLevel::Doctorate => "Doctorate",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum EmploymentStatus {
    #[serde(rename = "Full-Time")]
    #[value(name = "full-time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    #[value(name = "part-time")]
    PartTime,
    #[serde(rename = "Self-Employed")]
    #[value(name = "self-employed")]
    SelfEmployed,
    Unemployed,
    Retired,
}

impl EmploymentStatus {
    pub const ALL: [EmploymentStatus; 5] = [
        EmploymentStatus::FullTime,
        EmploymentStatus::PartTime,
        EmploymentStatus::SelfEmployed,
        EmploymentStatus::Unemployed,
        EmploymentStatus::Retired,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EmploymentStatus::FullTime => "Full-Time",
            EmploymentStatus::PartTime => "Part-Time",
            EmploymentStatus::SelfEmployed => "Self-Employed",
            EmploymentStatus::Unemployed => "Unemployed",
            EmploymentStatus::Retired => "Retired",
        }
    }

    /// Whether the applicant currently has an employer (or runs their own business).
    pub fn is_working(self) -> bool {
        !matches!(self, EmploymentStatus::Unemployed | EmploymentStatus::Retired)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Housing {
    #[value(alias = "rents")]
    Rent,
    #[value(alias = "owns")]
    Own,
}

impl Housing {
    pub fn label(self) -> &'static str {
        match self {
            Housing::Rent => "Rent",
            Housing::Own => "Own",
        }
    }
}

/// Payment-history class. Variants are declared worst-first so `Ord` ranks quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentHistoryClass {
    Poor,
    Average,
    Good,
    Excellent,
}

impl PaymentHistoryClass {
    pub fn label(self) -> &'static str {
        match self {
            PaymentHistoryClass::Poor => "Poor",
            PaymentHistoryClass::Average => "Average",
            PaymentHistoryClass::Good => "Good",
            PaymentHistoryClass::Excellent => "Excellent",
        }
    }
}

/// Named credit score range, declared in ascending score order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreBucket {
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Excellent,
}

impl ScoreBucket {
    pub const ALL: [ScoreBucket; 5] = [
        ScoreBucket::VeryPoor,
        ScoreBucket::Fair,
        ScoreBucket::Good,
        ScoreBucket::VeryGood,
        ScoreBucket::Excellent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScoreBucket::VeryPoor => "Very Poor",
            ScoreBucket::Fair => "Fair",
            ScoreBucket::Good => "Good",
            ScoreBucket::VeryGood => "Very Good",
            ScoreBucket::Excellent => "Excellent",
        }
    }
}

/// One synthesized credit applicant.
///
/// Built in a single pass by [`crate::synth::Synthesizer::synthesize`] and never
/// mutated afterwards. Invariants (enforced by construction):
///
/// - `total_debt == existing_debt + credit_card_debt + mortgage_debt + auto_loan_debt`
/// - `mortgage_debt == 0` unless `housing == Own`
/// - `credit_card_debt <= existing_debt`
/// - `300 <= credit_score <= 850` (or the configured score range)
/// - `credit_history_length <= age - 18`
/// - `account_age + credit_history_length == age - 18`
/// - `bankruptcy_date.is_some() == bankruptcy_history`
#[derive(Debug, Clone, PartialEq)]
pub struct Applicant {
    pub age: u32,
    pub gender: Gender,
    pub region: Region,
    pub education_level: EducationLevel,
    pub employment_status: EmploymentStatus,
    pub dependents: u32,
    pub years_with_employer: u32,

    pub income: f64,
    pub housing: Housing,
    pub existing_debt: f64,
    pub credit_card_debt: f64,
    pub mortgage_debt: f64,
    pub auto_loan_debt: f64,
    pub total_debt: f64,
    pub dti: f64,
    /// Outstanding balance on the applicant's current loan (not part of `total_debt`).
    pub loan_balance: f64,

    pub credit_card_utilization: f64,
    pub credit_inquiries_last_6_months: u32,
    pub delinquency_history: u32,
    pub bankruptcy_history: bool,
    pub bankruptcy_date: Option<NaiveDate>,
    pub credit_history_length: u32,
    /// Years between adulthood and the first extension of credit.
    pub account_age: u32,
    pub credit_score: i32,

    pub housing_payment: f64,
    pub years_at_current_address: f64,

    pub payment_history_class: PaymentHistoryClass,
    pub credit_score_bucket: ScoreBucket,
}

/// An applicant plus the identity fields assigned by the population driver.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub name: String,
    pub applicant: Applicant,
}

/// Inputs forced by the caller instead of drawn.
///
/// A forced field still consumes its random draw so every other field sees the
/// same random sequence as an unforced run with the same seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub age: Option<u32>,
    pub employment_status: Option<EmploymentStatus>,
    pub housing: Option<Housing>,
}

/// Per-record context for one call to `synthesize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthRequest {
    /// Reference date for bankruptcy recency.
    pub as_of: NaiveDate,
    pub overrides: Overrides,
}

/// A full population run as understood by the driver.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationRequest {
    pub count: usize,
    pub seed: u64,
    pub as_of: NaiveDate,
    pub overrides: Overrides,
}

impl PopulationRequest {
    pub fn synth_request(&self) -> SynthRequest {
        SynthRequest {
            as_of: self.as_of,
            overrides: self.overrides,
        }
    }
}

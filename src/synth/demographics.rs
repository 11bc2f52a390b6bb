//! Stage 1: demographic draws.

use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};

use crate::domain::{
    DemographicParams, EducationLevel, EmploymentStatus, Gender, Overrides, Region,
};
use crate::error::AppError;
use crate::synth::categorical::{Categorical, uniform};

/// Output of the demographic stage; input to every later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demographics {
    pub age: u32,
    pub gender: Gender,
    pub region: Region,
    pub education_level: EducationLevel,
    pub employment_status: EmploymentStatus,
    pub dependents: u32,
}

#[derive(Debug, Clone)]
pub struct DemographicSampler {
    age_min: u32,
    age_max: u32,
    dependents_max: u32,
    age: Normal<f64>,
    education: Categorical<EducationLevel>,
    employment: Categorical<EmploymentStatus>,
    dependents: Poisson<f64>,
}

impl DemographicSampler {
    pub fn new(params: &DemographicParams) -> Result<Self, AppError> {
        let age = Normal::new(params.age_mean, params.age_std_dev)
            .map_err(|e| AppError::invalid(format!("Age distribution error: {e}")))?;
        let dependents = Poisson::new(params.dependents_mean)
            .map_err(|e| AppError::invalid(format!("Dependents distribution error: {e}")))?;
        Ok(Self {
            age_min: params.age_min,
            age_max: params.age_max,
            dependents_max: params.dependents_max,
            age,
            education: Categorical::from_table(
                "education_weights",
                &EducationLevel::ALL,
                &params.education_weights,
            )?,
            employment: Categorical::from_table(
                "employment_weights",
                &EmploymentStatus::ALL,
                &params.employment_weights,
            )?,
            dependents,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, overrides: &Overrides) -> Demographics {
        let drawn_age = self.age.sample(rng).round();
        let age = match overrides.age {
            Some(forced) => forced.clamp(self.age_min, self.age_max),
            None => drawn_age.clamp(self.age_min as f64, self.age_max as f64) as u32,
        };

        let gender = uniform(rng, &Gender::ALL);
        let region = uniform(rng, &Region::ALL);
        let education_level = self.education.sample(rng);

        let drawn_status = self.employment.sample(rng);
        let employment_status = overrides.employment_status.unwrap_or(drawn_status);

        let dependents = (self.dependents.sample(rng) as u32).min(self.dependents_max);

        Demographics {
            age,
            gender,
            region,
            education_level,
            employment_status,
            dependents,
        }
    }
}

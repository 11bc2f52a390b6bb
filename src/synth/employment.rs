//! Stage 2: years with current employer.

use rand::Rng;
use rand_distr::Exp1;

use crate::domain::TenureParams;
use crate::synth::demographics::Demographics;

#[derive(Debug, Clone)]
pub struct TenureModel {
    params: TenureParams,
    age_min: u32,
}

impl TenureModel {
    pub fn new(params: &TenureParams, age_min: u32) -> Self {
        Self {
            params: params.clone(),
            age_min,
        }
    }

    /// Draw `0 <= years_with_employer <= age - age_min`.
    ///
    /// Working applicants: gamma(shape 2) with a mean that grows with adult years.
    /// Unemployed/retired: exponential with a small mean, so most floor to zero.
    pub fn years_with_employer<R: Rng + ?Sized>(&self, rng: &mut R, demo: &Demographics) -> u32 {
        let working_years = demo.age.saturating_sub(self.age_min);
        let years = if demo.employment_status.is_working() {
            let mean = self.params.working_base_years
                + self.params.working_years_per_adult_year * working_years as f64;
            gamma2(rng, mean)
        } else {
            let e: f64 = rng.sample(Exp1);
            self.params.idle_mean_years * e
        };
        (years.floor() as u32).min(working_years)
    }
}

/// Gamma(shape = 2) draw with the given mean, as the sum of two unit exponentials.
pub(crate) fn gamma2<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> f64 {
    let a: f64 = rng.sample(Exp1);
    let b: f64 = rng.sample(Exp1);
    0.5 * mean * (a + b)
}

//! Stage 5a: housing payment and residential stability.

use rand::Rng;

use crate::domain::{Housing, HousingParams, factor};
use crate::synth::demographics::Demographics;
use crate::synth::employment::gamma2;
use crate::synth::financial::Financials;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stability {
    /// Monthly rent or mortgage payment.
    pub housing_payment: f64,
    pub years_at_current_address: f64,
}

#[derive(Debug, Clone)]
pub struct StabilityModel {
    params: HousingParams,
    age_min: u32,
}

impl StabilityModel {
    pub fn new(params: &HousingParams, age_min: u32) -> Self {
        Self {
            params: params.clone(),
            age_min,
        }
    }

    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        demo: &Demographics,
        fin: &Financials,
    ) -> Stability {
        let p = &self.params;

        let (lo, hi) = match fin.housing {
            Housing::Rent => p.rent_range,
            Housing::Own => p.own_range,
        };
        let base = rng.gen_range(lo..=hi);
        let housing_payment = base
            * factor(&p.cost_of_living, &demo.region, 1.0)
            * (1.0 + demo.dependents as f64 * p.dependent_uplift);

        let adult_years = demo.age.saturating_sub(self.age_min) as f64;
        let mean = p.address_base_years + p.address_years_per_adult_year * adult_years;
        let years = gamma2(rng, mean).min(demo.age as f64);
        let years_at_current_address = (years * 10.0).round() / 10.0;

        Stability {
            housing_payment,
            years_at_current_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::domain::{EducationLevel, EmploymentStatus, Gender, Region};

    fn demo(age: u32, region: Region, dependents: u32) -> Demographics {
        Demographics {
            age,
            gender: Gender::Male,
            region,
            education_level: EducationLevel::Associate,
            employment_status: EmploymentStatus::FullTime,
            dependents,
        }
    }

    fn financials(housing: Housing) -> Financials {
        Financials {
            income: 60_000.0,
            housing,
            existing_debt: 10_000.0,
            credit_card_debt: 2_000.0,
            mortgage_debt: if housing == Housing::Own { 120_000.0 } else { 0.0 },
            auto_loan_debt: 9_000.0,
            total_debt: 0.0,
            dti: 0.0,
            loan_balance: 0.0,
        }
    }

    #[test]
    fn payments_scale_with_region_and_dependents() {
        let model = StabilityModel::new(&HousingParams::default(), 18);
        let pay = |region, deps| {
            model
                .synthesize(&mut StdRng::seed_from_u64(41), &demo(40, region, deps), &financials(Housing::Rent))
                .housing_payment
        };
        assert!(pay(Region::Northeast, 0) > pay(Region::Midwest, 0));
        assert!(pay(Region::West, 3) > pay(Region::West, 0));
        assert!((pay(Region::West, 2) / pay(Region::West, 0) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn payment_ranges_follow_housing() {
        let model = StabilityModel::new(&HousingParams::default(), 18);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let rent = model.synthesize(&mut rng, &demo(30, Region::Midwest, 0), &financials(Housing::Rent));
            assert!((400.0..=2_800.0).contains(&rent.housing_payment));
            let own = model.synthesize(&mut rng, &demo(30, Region::Midwest, 0), &financials(Housing::Own));
            assert!((720.0..=3_600.0).contains(&own.housing_payment));
        }
    }

    #[test]
    fn residency_is_bounded_by_age_and_grows_with_it() {
        let model = StabilityModel::new(&HousingParams::default(), 18);
        let mut rng = StdRng::seed_from_u64(43);
        let mut mean_at = |age| {
            let mut total = 0.0;
            for _ in 0..2_000 {
                let s = model.synthesize(&mut rng, &demo(age, Region::South, 1), &financials(Housing::Rent));
                assert!(s.years_at_current_address >= 0.0);
                assert!(s.years_at_current_address <= age as f64);
                total += s.years_at_current_address;
            }
            total / 2_000.0
        };
        let young = mean_at(20);
        let old = mean_at(65);
        assert!(old > young * 3.0, "young={young:.2} old={old:.2}");
    }
}

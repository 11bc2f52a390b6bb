//! Stage 3: income, housing tenure and debt components.
//!
//! Every quantity is a non-negative draw times a non-negative base, so no
//! intermediate value can go negative. `total_debt` and `dti` are recomputed
//! from the components, never drawn.

use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};

use crate::domain::{DebtParams, Housing, IncomeParams, Overrides, factor};
use crate::error::AppError;
use crate::synth::demographics::Demographics;

/// Output of the financial stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Financials {
    pub income: f64,
    pub housing: Housing,
    pub existing_debt: f64,
    pub credit_card_debt: f64,
    pub mortgage_debt: f64,
    pub auto_loan_debt: f64,
    pub total_debt: f64,
    pub dti: f64,
    pub loan_balance: f64,
}

#[derive(Debug, Clone)]
pub struct FinancialSynthesizer {
    income: IncomeParams,
    debt: DebtParams,
    income_base: LogNormal<f64>,
    loan_balance: Normal<f64>,
}

impl FinancialSynthesizer {
    pub fn new(income: &IncomeParams, debt: &DebtParams) -> Result<Self, AppError> {
        let income_base = LogNormal::new(income.median.ln(), income.log_sigma)
            .map_err(|e| AppError::invalid(format!("Income distribution error: {e}")))?;
        let loan_balance = Normal::new(debt.loan_balance_mean, debt.loan_balance_std_dev)
            .map_err(|e| AppError::invalid(format!("Loan balance distribution error: {e}")))?;
        Ok(Self {
            income: income.clone(),
            debt: debt.clone(),
            income_base,
            loan_balance,
        })
    }

    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        demo: &Demographics,
        overrides: &Overrides,
    ) -> Financials {
        let income = self.draw_income(rng, demo);

        let own_roll = rng.gen_bool(self.own_probability(demo.age, income));
        let housing = overrides.housing.unwrap_or(if own_roll { Housing::Own } else { Housing::Rent });

        let d = &self.debt;
        let existing_debt = income * ratio(rng, d.existing_to_income);
        let credit_card_debt = existing_debt * ratio(rng, d.card_to_existing);
        // Drawn for renters too so forcing `housing` does not shift later draws.
        let mortgage_ratio = ratio(rng, d.mortgage_to_income);
        let mortgage_debt = match housing {
            Housing::Own => income * mortgage_ratio,
            Housing::Rent => 0.0,
        };
        let auto_loan_debt = income * ratio(rng, d.auto_to_income);

        let total_debt = existing_debt + credit_card_debt + mortgage_debt + auto_loan_debt;
        let dti = debt_to_income(total_debt, income, d.dti_epsilon);

        let loan_balance = self.loan_balance.sample(rng).max(0.0);

        Financials {
            income,
            housing,
            existing_debt,
            credit_card_debt,
            mortgage_debt,
            auto_loan_debt,
            total_debt,
            dti,
            loan_balance,
        }
    }

    /// Log-normal base, scaled per region/education/employment, with rare heavy-tail
    /// outliers, rounded to whole dollars and clamped to `[floor, cap]`.
    fn draw_income<R: Rng + ?Sized>(&self, rng: &mut R, demo: &Demographics) -> f64 {
        let p = &self.income;
        let mut income = self.income_base.sample(rng)
            * factor(&p.region_multiplier, &demo.region, 1.0)
            * factor(&p.education_multiplier, &demo.education_level, 1.0)
            * factor(&p.employment_multiplier, &demo.employment_status, 1.0);

        if p.outlier_probability > 0.0 && rng.gen_bool(p.outlier_probability) {
            income *= p.outlier_multipliers[rng.gen_range(0..p.outlier_multipliers.len())];
        }

        income.round().clamp(p.floor, p.cap)
    }

    /// Probability of owning, rising with age and income.
    pub fn own_probability(&self, age: u32, income: f64) -> f64 {
        let d = &self.debt;
        let income_ratio = income.max(1.0) / self.income.median;
        let logit =
            d.own_intercept + d.own_age_coef * (age as f64 - 40.0) + d.own_income_coef * income_ratio.ln();
        let p = 1.0 / (1.0 + (-logit).exp());
        p.clamp(d.own_probability_bounds.0, d.own_probability_bounds.1)
    }
}

/// `total_debt / max(income, epsilon)`; never divides by zero.
pub fn debt_to_income(total_debt: f64, income: f64, epsilon: f64) -> f64 {
    total_debt / income.max(epsilon)
}

fn ratio<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    rng.gen_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::domain::{EducationLevel, EmploymentStatus, Gender, Region};

    fn demo(status: EmploymentStatus) -> Demographics {
        Demographics {
            age: 45,
            gender: Gender::Male,
            region: Region::Northeast,
            education_level: EducationLevel::Doctorate,
            employment_status: status,
            dependents: 2,
        }
    }

    fn synthesizer() -> FinancialSynthesizer {
        FinancialSynthesizer::new(&IncomeParams::default(), &DebtParams::default()).unwrap()
    }

    #[test]
    fn debt_components_are_consistent() {
        let fin = synthesizer();
        let mut rng = StdRng::seed_from_u64(21);
        for status in EmploymentStatus::ALL {
            for _ in 0..500 {
                let f = fin.synthesize(&mut rng, &demo(status), &Overrides::default());
                assert!((0.0..=400_000.0).contains(&f.income));
                assert!(f.existing_debt >= 0.0 && f.auto_loan_debt >= 0.0);
                assert!(f.credit_card_debt <= f.existing_debt);
                assert_eq!(
                    f.total_debt,
                    f.existing_debt + f.credit_card_debt + f.mortgage_debt + f.auto_loan_debt
                );
                if f.housing == Housing::Rent {
                    assert_eq!(f.mortgage_debt, 0.0);
                }
                assert!(f.dti.is_finite() && f.dti >= 0.0);
                assert!(f.loan_balance >= 0.0);
            }
        }
    }

    #[test]
    fn forced_owner_carries_mortgage() {
        let fin = synthesizer();
        let mut rng = StdRng::seed_from_u64(22);
        let overrides = Overrides {
            housing: Some(Housing::Own),
            ..Overrides::default()
        };
        let f = fin.synthesize(&mut rng, &demo(EmploymentStatus::FullTime), &overrides);
        assert_eq!(f.housing, Housing::Own);
        assert!(f.mortgage_debt > 0.0);
    }

    #[test]
    fn forced_renter_keeps_other_debts_identical() {
        let fin = synthesizer();
        let own = Overrides {
            housing: Some(Housing::Own),
            ..Overrides::default()
        };
        let rent = Overrides {
            housing: Some(Housing::Rent),
            ..Overrides::default()
        };
        let a = fin.synthesize(&mut StdRng::seed_from_u64(23), &demo(EmploymentStatus::FullTime), &own);
        let b = fin.synthesize(&mut StdRng::seed_from_u64(23), &demo(EmploymentStatus::FullTime), &rent);
        assert_eq!(a.income, b.income);
        assert_eq!(a.auto_loan_debt, b.auto_loan_debt);
        assert_eq!(a.loan_balance, b.loan_balance);
        assert_eq!(b.mortgage_debt, 0.0);
        assert!(a.total_debt > b.total_debt);
    }

    #[test]
    fn income_is_capped() {
        let income = IncomeParams {
            median: 1_000_000.0,
            ..IncomeParams::default()
        };
        let fin = FinancialSynthesizer::new(&income, &DebtParams::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(24);
        for _ in 0..200 {
            let f = fin.synthesize(&mut rng, &demo(EmploymentStatus::FullTime), &Overrides::default());
            assert!(f.income <= 400_000.0);
        }
    }

    #[test]
    fn education_raises_income() {
        let fin = synthesizer();
        let mut low = demo(EmploymentStatus::FullTime);
        low.education_level = EducationLevel::LessThanHighSchool;
        let high = demo(EmploymentStatus::FullTime);
        let mean = |d: &Demographics| {
            let mut rng = StdRng::seed_from_u64(25);
            (0..2_000)
                .map(|_| fin.synthesize(&mut rng, d, &Overrides::default()).income)
                .sum::<f64>()
                / 2_000.0
        };
        assert!(mean(&high) > mean(&low) * 2.0);
    }

    #[test]
    fn dti_guards_zero_income() {
        assert_eq!(debt_to_income(500.0, 0.0, 1.0), 500.0);
        assert_eq!(debt_to_income(0.0, 0.0, 1.0), 0.0);
        assert_eq!(debt_to_income(50_000.0, 100_000.0, 1.0), 0.5);
    }

    #[test]
    fn ownership_rises_with_age_and_income() {
        let fin = synthesizer();
        assert!(fin.own_probability(60, 68_000.0) > fin.own_probability(25, 68_000.0));
        assert!(fin.own_probability(40, 200_000.0) > fin.own_probability(40, 30_000.0));
        assert!(fin.own_probability(40, 0.0) >= 0.02);
    }
}

//! Export the population to CSV.
//!
//! Column order and labels follow the classic credit-risk dataset layout so the
//! file drops into existing notebooks. Reals are written with two decimals.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::domain::CustomerRecord;
use crate::error::AppError;

pub const CSV_HEADER: [&str; 30] = [
    "Customer_ID",
    "Name",
    "Age",
    "Gender",
    "Region",
    "Education_Level",
    "Employment_Status",
    "Income",
    "Credit_Score",
    "Existing_Debt",
    "Credit_Card_Debt",
    "Mortgage_Debt",
    "Auto_Loan_Debt",
    "Total_Debt",
    "DTI",
    "Loan_Balance",
    "Credit_Inquiries_Last_6_Months",
    "Bankruptcy_History",
    "Bankruptcy_Date",
    "Delinquency_History",
    "Credit_Card_Utilization",
    "Years_At_Current_Address",
    "Dependents",
    "Payment_History",
    "Account_Age",
    "Credit_History_Length",
    "Years_With_Employer",
    "Housing",
    "Housing_Payment",
    "Credit_Score_Category",
];

/// Write all records to a CSV file at `path`.
pub fn write_population_csv(path: &Path, records: &[CustomerRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_population(file, records)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write all records as CSV to any writer.
pub fn write_population<W: Write>(out: W, records: &[CustomerRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::invalid(format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        writer
            .write_record(csv_row(r))
            .map_err(|e| AppError::invalid(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::invalid(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

fn csv_row(r: &CustomerRecord) -> [String; 30] {
    let a = &r.applicant;
    [
        r.customer_id.clone(),
        r.name.clone(),
        a.age.to_string(),
        a.gender.label().to_string(),
        a.region.label().to_string(),
        a.education_level.label().to_string(),
        a.employment_status.label().to_string(),
        money(a.income),
        a.credit_score.to_string(),
        money(a.existing_debt),
        money(a.credit_card_debt),
        money(a.mortgage_debt),
        money(a.auto_loan_debt),
        money(a.total_debt),
        money(a.dti),
        money(a.loan_balance),
        a.credit_inquiries_last_6_months.to_string(),
        if a.bankruptcy_history { "Yes" } else { "No" }.to_string(),
        a.bankruptcy_date.map(|d| d.to_string()).unwrap_or_default(),
        a.delinquency_history.to_string(),
        money(a.credit_card_utilization),
        money(a.years_at_current_address),
        a.dependents.to_string(),
        a.payment_history_class.label().to_string(),
        a.account_age.to_string(),
        a.credit_history_length.to_string(),
        a.years_with_employer.to_string(),
        a.housing.label().to_string(),
        money(a.housing_payment),
        a.credit_score_bucket.label().to_string(),
    ]
}

fn money(v: f64) -> String {
    format!("{v:.2}")
}

//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the synthesis code stays free of presentation concerns
//! - output changes are localized

use chrono::NaiveDate;

use crate::domain::CustomerRecord;
use crate::report::{BucketShare, PopulationStats};

/// Format the run summary (parameters + population means).
pub fn format_run_summary(stats: &PopulationStats, seed: u64, as_of: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("=== creditgen - Synthetic Credit Applicants ===\n");
    out.push_str(&format!("Records: {} | seed={} | as-of={}\n", stats.n_records, seed, as_of));
    out.push_str(&format!(
        "Mean income: {:.2} | mean score: {:.1} | mean DTI: {:.3}\n",
        stats.mean_income, stats.mean_score, stats.mean_dti
    ));
    out.push_str(&format!(
        "Owners: {:.1}% | with bankruptcy: {:.1}%\n",
        stats.owner_share * 100.0,
        stats.bankruptcy_share * 100.0
    ));
    out
}

/// Format the score distribution table (shares as fractions, bucket order).
pub fn format_distribution(dist: &[BucketShare]) -> String {
    let mut out = String::new();
    out.push_str("Credit Score Distribution:\n");
    for b in dist {
        out.push_str(&format!(
            "{:<10} {:>8.4} ({:>6})\n",
            b.bucket.label(),
            b.share,
            b.count
        ));
    }
    out
}

/// Format the first `n` records as a fixed-width table.
pub fn format_preview(records: &[CustomerRecord], n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} {:<22} {:>3} {:<9} {:<13} {:>10} {:>5} {:<10} {:>12} {:>6} {:<4} {:<9}\n",
        "#", "Name", "Age", "Region", "Employment", "Income", "Score", "Bucket", "Total_Debt", "DTI", "Hsg", "Payment"
    ));
    for (i, r) in records.iter().take(n).enumerate() {
        let a = &r.applicant;
        out.push_str(&format!(
            "{:<4} {:<22} {:>3} {:<9} {:<13} {:>10.2} {:>5} {:<10} {:>12.2} {:>6.2} {:<4} {:<9}\n",
            i,
            truncate(&r.name, 22),
            a.age,
            a.region.label(),
            a.employment_status.label(),
            a.income,
            a.credit_score,
            a.credit_score_bucket.label(),
            a.total_debt,
            a.dti,
            a.housing.label(),
            a.payment_history_class.label(),
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreBucket;

    #[test]
    fn distribution_lists_buckets_in_order() {
        let dist: Vec<BucketShare> = ScoreBucket::ALL
            .iter()
            .map(|&bucket| BucketShare { bucket, count: 1, share: 0.2 })
            .collect();
        let text = format_distribution(&dist);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Credit Score Distribution:");
        assert!(lines[1].starts_with("Very Poor"));
        assert!(lines[5].starts_with("Excellent"));
        assert!(lines[3].contains("0.2000"));
    }

    #[test]
    fn preview_respects_row_limit() {
        assert_eq!(format_preview(&[], 5).lines().count(), 1);
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("Christopher Rodriguez-Hernandez", 10).chars().count(), 10);
        assert_eq!(truncate("Ann Lee", 10), "Ann Lee");
    }

    #[test]
    fn summary_mentions_seed_and_date() {
        let stats = PopulationStats {
            n_records: 10,
            mean_income: 70_000.0,
            mean_score: 690.0,
            mean_dti: 1.1,
            owner_share: 0.5,
            bankruptcy_share: 0.1,
        };
        let text = format_run_summary(&stats, 42, NaiveDate::from_ymd_opt(2024, 9, 4).unwrap());
        assert!(text.contains("seed=42"));
        assert!(text.contains("as-of=2024-09-04"));
        assert!(text.contains("Owners: 50.0%"));
    }
}

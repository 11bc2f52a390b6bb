//! Reporting utilities: score distribution and population statistics.

pub mod format;

pub use format::*;

use crate::domain::{CustomerRecord, ScoreBucket};

/// Count and share of one score bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketShare {
    pub bucket: ScoreBucket,
    pub count: usize,
    pub share: f64,
}

/// Population means used in the run summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    pub n_records: usize,
    pub mean_income: f64,
    pub mean_score: f64,
    pub mean_dti: f64,
    pub owner_share: f64,
    pub bankruptcy_share: f64,
}

/// Share of records per score bucket, in bucket order, empty buckets included.
pub fn score_distribution(records: &[CustomerRecord]) -> Vec<BucketShare> {
    let n = records.len();
    ScoreBucket::ALL
        .iter()
        .map(|&bucket| {
            let count = records
                .iter()
                .filter(|r| r.applicant.credit_score_bucket == bucket)
                .count();
            let share = if n == 0 { 0.0 } else { count as f64 / n as f64 };
            BucketShare { bucket, count, share }
        })
        .collect()
}

pub fn population_stats(records: &[CustomerRecord]) -> Option<PopulationStats> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let mean = |f: fn(&CustomerRecord) -> f64| records.iter().map(f).sum::<f64>() / n;
    Some(PopulationStats {
        n_records: records.len(),
        mean_income: mean(|r| r.applicant.income),
        mean_score: mean(|r| r.applicant.credit_score as f64),
        mean_dti: mean(|r| r.applicant.dti),
        owner_share: mean(|r| (r.applicant.housing == crate::domain::Housing::Own) as u8 as f64),
        bankruptcy_share: mean(|r| r.applicant.bankruptcy_history as u8 as f64),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::app::pipeline::generate_population;
    use crate::domain::{Overrides, PopulationRequest, SynthConfig};

    fn records(count: usize) -> Vec<CustomerRecord> {
        let request = PopulationRequest {
            count,
            seed: 17,
            as_of: NaiveDate::from_ymd_opt(2024, 9, 4).unwrap(),
            overrides: Overrides::default(),
        };
        generate_population(&SynthConfig::default(), &request).unwrap()
    }

    #[test]
    fn distribution_covers_every_bucket_and_sums_to_one() {
        let recs = records(2_000);
        let dist = score_distribution(&recs);
        assert_eq!(dist.len(), 5);
        assert_eq!(dist.iter().map(|b| b.count).sum::<usize>(), 2_000);
        assert!((dist.iter().map(|b| b.share).sum::<f64>() - 1.0).abs() < 1e-9);
        let order: Vec<_> = dist.iter().map(|b| b.bucket).collect();
        assert_eq!(order, ScoreBucket::ALL.to_vec());
    }

    #[test]
    fn empty_population_has_zero_shares() {
        let dist = score_distribution(&[]);
        assert!(dist.iter().all(|b| b.count == 0 && b.share == 0.0));
        assert!(population_stats(&[]).is_none());
    }

    #[test]
    fn stats_are_plausible() {
        let stats = population_stats(&records(2_000)).unwrap();
        assert_eq!(stats.n_records, 2_000);
        assert!((300.0..=850.0).contains(&stats.mean_score));
        assert!(stats.mean_income > 20_000.0 && stats.mean_income < 150_000.0);
        assert!((0.0..=1.0).contains(&stats.owner_share));
        assert!(stats.bankruptcy_share > 0.05 && stats.bankruptcy_share < 0.15);
    }
}

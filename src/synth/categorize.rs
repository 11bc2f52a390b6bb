//! Stage 5b: deterministic categorizers.

use crate::domain::{BucketThresholds, PaymentHistoryClass, PaymentHistoryParams, ScoreBucket};

/// Map score and derogatory marks to a payment-history class.
///
/// The class is the worse of the score-based and delinquency-based classes; a
/// bankruptcy on file forces `Poor`. Raising the score or lowering delinquencies
/// can only keep or improve the class.
pub fn payment_history_class(
    credit_score: i32,
    delinquencies: u32,
    bankruptcy: bool,
    params: &PaymentHistoryParams,
) -> PaymentHistoryClass {
    if bankruptcy {
        return PaymentHistoryClass::Poor;
    }

    let by_score = if credit_score >= params.excellent_min_score {
        PaymentHistoryClass::Excellent
    } else if credit_score >= params.good_min_score {
        PaymentHistoryClass::Good
    } else if credit_score >= params.average_min_score {
        PaymentHistoryClass::Average
    } else {
        PaymentHistoryClass::Poor
    };

    let by_delinquency = if delinquencies <= params.excellent_max_delinquencies {
        PaymentHistoryClass::Excellent
    } else if delinquencies <= params.good_max_delinquencies {
        PaymentHistoryClass::Good
    } else if delinquencies <= params.average_max_delinquencies {
        PaymentHistoryClass::Average
    } else {
        PaymentHistoryClass::Poor
    };

    by_score.min(by_delinquency)
}

/// Bucket for a clamped score. Lower bounds are inclusive: with the default
/// thresholds 579 is `VeryPoor` and 580 is `Fair`.
pub fn score_bucket(credit_score: i32, thresholds: &BucketThresholds, score_min: i32) -> ScoreBucket {
    ScoreBucket::ALL
        .iter()
        .rev()
        .copied()
        .find(|&b| credit_score >= thresholds.lower_bound(b, score_min))
        .unwrap_or(ScoreBucket::VeryPoor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries_are_lower_inclusive() {
        let t = BucketThresholds::default();
        let cases = [
            (300, ScoreBucket::VeryPoor),
            (579, ScoreBucket::VeryPoor),
            (580, ScoreBucket::Fair),
            (669, ScoreBucket::Fair),
            (670, ScoreBucket::Good),
            (739, ScoreBucket::Good),
            (740, ScoreBucket::VeryGood),
            (799, ScoreBucket::VeryGood),
            (800, ScoreBucket::Excellent),
            (850, ScoreBucket::Excellent),
        ];
        for (score, expected) in cases {
            assert_eq!(score_bucket(score, &t, 300), expected, "score {score}");
        }
    }

    #[test]
    fn buckets_partition_the_score_range() {
        let t = BucketThresholds::default();
        let mut prev = ScoreBucket::VeryPoor;
        let mut seen = Vec::new();
        for score in 300..=850 {
            let b = score_bucket(score, &t, 300);
            assert!(b >= prev, "bucket order broke at {score}");
            if seen.last() != Some(&b) {
                seen.push(b);
            }
            prev = b;
        }
        assert_eq!(seen, ScoreBucket::ALL.to_vec());
    }

    #[test]
    fn bankruptcy_forces_poor() {
        let p = PaymentHistoryParams::default();
        assert_eq!(payment_history_class(850, 0, true, &p), PaymentHistoryClass::Poor);
    }

    #[test]
    fn class_examples() {
        let p = PaymentHistoryParams::default();
        assert_eq!(payment_history_class(780, 0, false, &p), PaymentHistoryClass::Excellent);
        assert_eq!(payment_history_class(780, 1, false, &p), PaymentHistoryClass::Good);
        assert_eq!(payment_history_class(700, 0, false, &p), PaymentHistoryClass::Good);
        assert_eq!(payment_history_class(700, 3, false, &p), PaymentHistoryClass::Average);
        assert_eq!(payment_history_class(600, 0, false, &p), PaymentHistoryClass::Average);
        assert_eq!(payment_history_class(820, 4, false, &p), PaymentHistoryClass::Poor);
        assert_eq!(payment_history_class(500, 0, false, &p), PaymentHistoryClass::Poor);
    }

    #[test]
    fn class_is_monotone() {
        let p = PaymentHistoryParams::default();
        for bankrupt in [false, true] {
            for d in 0..8 {
                for score in 300..850 {
                    let here = payment_history_class(score, d, bankrupt, &p);
                    assert!(payment_history_class(score + 1, d, bankrupt, &p) >= here);
                    if d > 0 {
                        assert!(payment_history_class(score, d - 1, bankrupt, &p) >= here);
                    }
                    assert!(payment_history_class(score, d, false, &p) >= payment_history_class(score, d, true, &p));
                }
            }
        }
    }
}

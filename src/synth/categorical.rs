//! Weighted draws over a closed category set.

use std::collections::BTreeMap;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::error::AppError;

/// A categorical distribution over `T`, in the order of the `all` slice it was built from.
#[derive(Debug, Clone)]
pub struct Categorical<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy + Ord> Categorical<T> {
    /// Build from a weight table. Categories missing from the table get weight 0.
    pub fn from_table(name: &str, all: &[T], weights: &BTreeMap<T, f64>) -> Result<Self, AppError> {
        let values = all.to_vec();
        let w: Vec<f64> = values
            .iter()
            .map(|v| weights.get(v).copied().unwrap_or(0.0))
            .collect();
        let index = WeightedIndex::new(&w)
            .map_err(|e| AppError::invalid(format!("Invalid weights for {name}: {e}")))?;
        Ok(Self { values, index })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)]
    }
}

/// Uniform draw over a fixed label set.
pub fn uniform<T: Copy, R: Rng + ?Sized>(rng: &mut R, all: &[T]) -> T {
    all[rng.gen_range(0..all.len())]
}

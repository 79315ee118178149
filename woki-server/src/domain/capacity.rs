//! Capacity Range Value Object

use super::error::{DomainError, DomainResult};

/// Inclusive party-size range `[min, max]` a table (or combo) can seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityRange {
    min: u32,
    max: u32,
}

impl CapacityRange {
    pub fn new(min: u32, max: u32) -> DomainResult<Self> {
        if min == 0 || max == 0 {
            return Err(DomainError::validation("Capacity must be positive"));
        }
        if min > max {
            return Err(DomainError::validation(
                "Min capacity cannot exceed max capacity",
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn accommodates(&self, party_size: u32) -> bool {
        (self.min..=self.max).contains(&party_size)
    }

    /// Combined range of two tables seated together (sums both bounds)
    pub fn merge(&self, other: &CapacityRange) -> CapacityRange {
        CapacityRange {
            min: self.min + other.min,
            max: self.max + other.max,
        }
    }
}

//! Allocator trait and configuration.

use crate::bin::Bin;
use crate::placement::PlacementEvent;
use crate::result::AllocationResult;
use crate::shipment::Shipment;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Run limits for an allocator.
///
/// Limits are checked between unit commits, never during one.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Stop after this many unit commits (None = unlimited).
    pub max_placements: Option<usize>,
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the placement cap.
    pub fn with_max_placements(mut self, max: usize) -> Self {
        self.max_placements = Some(max);
        self
    }

    /// Rejects settings that would stop a run before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.max_placements == Some(0) {
            return Err(Error::ConfigError(
                "max_placements must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

/// Progress information passed to a callback after each unit commit.
#[derive(Debug, Clone, Copy)]
pub struct ProgressInfo<'a> {
    /// The commit that just happened.
    pub event: &'a PlacementEvent,
    /// Every bin, in input order, as of this commit.
    pub bins: &'a [Bin],
    /// Units placed so far.
    pub placed: usize,
    /// Units requested in total.
    pub total_units: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
}

impl ProgressInfo<'_> {
    /// Placed units over requested units (1.0 when nothing was requested).
    pub fn fraction_placed(&self) -> f64 {
        if self.total_units == 0 {
            1.0
        } else {
            self.placed as f64 / self.total_units as f64
        }
    }
}

/// Progress callback. Returning `false` stops the run after the current
/// commit.
pub type ProgressCallback<'a> = &'a mut dyn FnMut(&ProgressInfo<'_>) -> bool;

/// Trait for shipment allocators.
pub trait Allocator {
    /// Allocates the shipments into the bins.
    ///
    /// The inputs are copied; the caller's values are never mutated.
    fn allocate(&self, shipments: &[Shipment], bins: &[Bin]) -> Result<AllocationResult>;

    /// Allocates with a callback invoked after every unit commit.
    fn allocate_with_progress(
        &self,
        shipments: &[Shipment],
        bins: &[Bin],
        callback: ProgressCallback<'_>,
    ) -> Result<AllocationResult>;

    /// Requests that an ongoing run stop at its next commit boundary.
    fn cancel(&self);
}

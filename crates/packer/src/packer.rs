//! Greedy allocator with run limits and progress reporting.

use crate::allocation::Allocation;
use u_binfit_core::solver::{Allocator, Config, ProgressCallback, ProgressInfo};
use u_binfit_core::{AllocationResult, Bin, Result, Shipment};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Why a run ended before its input was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Cancelled,
    TimeLimit,
    PlacementCap,
}

/// Greedy allocator.
///
/// Wraps [`Allocation`] with the limits from [`Config`] and a cancellation
/// flag that can be raised from another thread through [`Allocator::cancel`].
pub struct GreedyPacker {
    config: Config,
    cancelled: Arc<AtomicBool>,
}

impl GreedyPacker {
    /// Creates a new packer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a packer without limits.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a handle that cancels the run when set to `true`.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn limit_reached(&self, allocation: &Allocation, start: &Instant) -> Option<Stop> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(Stop::Cancelled);
        }
        if self.config.time_limit_ms > 0
            && start.elapsed().as_millis() as u64 >= self.config.time_limit_ms
        {
            return Some(Stop::TimeLimit);
        }
        match self.config.max_placements {
            Some(max) if allocation.placements() >= max => Some(Stop::PlacementCap),
            _ => None,
        }
    }

    fn run(
        &self,
        shipments: &[Shipment],
        bins: &[Bin],
        mut callback: Option<ProgressCallback<'_>>,
    ) -> Result<AllocationResult> {
        self.config.validate()?;

        let start = Instant::now();
        let mut allocation = Allocation::new(shipments.to_vec(), bins.to_vec())?;
        let mut stop = None;

        while !allocation.is_finished() {
            if let Some(reason) = self.limit_reached(&allocation, &start) {
                stop = Some(reason);
                break;
            }

            let Some(event) = allocation.step() else {
                break;
            };

            if let Some(callback) = callback.as_deref_mut() {
                let info = ProgressInfo {
                    event: &event,
                    bins: allocation.bins(),
                    placed: allocation.placements(),
                    total_units: allocation.total_units(),
                    elapsed_ms: start.elapsed().as_millis() as u64,
                };
                if !callback(&info) {
                    stop = Some(Stop::Cancelled);
                    break;
                }
            }
        }

        let finished = allocation.is_finished();
        let mut result = allocation.into_result();
        result.computation_time_ms = start.elapsed().as_millis() as u64;
        result.timed_out = !finished && stop == Some(Stop::TimeLimit);

        if !finished {
            log::warn!(
                "Allocation stopped early ({:?}) after {} placements",
                stop.unwrap_or(Stop::Cancelled),
                result.placements
            );
        }
        log::info!(
            "Allocated {} units into {} bins, {} shipment records unfit ({} ms)",
            result.placements,
            result.bins_used(),
            result.unfit_count(),
            result.computation_time_ms
        );

        Ok(result)
    }
}

impl Default for GreedyPacker {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Allocator for GreedyPacker {
    fn allocate(&self, shipments: &[Shipment], bins: &[Bin]) -> Result<AllocationResult> {
        // Reset cancellation flag
        self.cancelled.store(false, Ordering::Relaxed);
        self.run(shipments, bins, None)
    }

    fn allocate_with_progress(
        &self,
        shipments: &[Shipment],
        bins: &[Bin],
        callback: ProgressCallback<'_>,
    ) -> Result<AllocationResult> {
        self.cancelled.store(false, Ordering::Relaxed);
        self.run(shipments, bins, Some(callback))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

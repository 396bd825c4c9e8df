//! # U-BinFit Packer
//!
//! Greedy allocation of unit-quantity shipments into weight- and
//! dimension-limited bins.
//!
//! - [`fits`]: the single-unit admission test
//! - [`Allocation`]: the step-wise sweep, usable as a progressive producer
//! - [`aggregate_unfit`]: residual demand after a sweep
//! - [`GreedyPacker`]: [`Allocator`] implementation with run limits
//!
//! ```
//! use u_binfit_packer::{Allocator, Bin, GreedyPacker, Shipment};
//!
//! let shipments = vec![Shipment::new("Box", 2.0, 2.0, 2.0)
//!     .with_weight(5.0)
//!     .with_quantity(3)];
//! let bins = vec![Bin::new("BinA", 4.0, 4.0, 4.0).with_max_weight(20.0)];
//!
//! let result = GreedyPacker::default_config().allocate(&shipments, &bins)?;
//! assert_eq!(result.placed_count(), 3);
//! assert!(result.all_placed());
//! # Ok::<(), u_binfit_packer::Error>(())
//! ```

pub mod aggregate;
pub mod allocation;
pub mod fit;
pub mod packer;

// Re-exports
pub use aggregate::aggregate_unfit;
pub use allocation::{Allocation, Snapshots};
pub use fit::fits;
pub use packer::GreedyPacker;
pub use u_binfit_core::{
    AllocationResult, Allocator, Bin, Config, Error, PlacedUnit, PlacementEvent, ProgressInfo,
    Result, RotationType, Shipment, Snapshot, UnfitRecord,
};

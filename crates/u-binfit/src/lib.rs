//! # U-BinFit
//!
//! Greedy allocation of shipments into weight- and dimension-limited bins.
//!
//! Shipments are processed largest volume first and committed one unit at a
//! time into the first bin, in input order, whose dimensions (under the
//! shipment's rotation mode) and remaining weight admit it. Whatever cannot be
//! placed is reported as residual demand.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "packer")]
//! # {
//! use u_binfit::packer::GreedyPacker;
//! use u_binfit::{Allocator, Bin, Shipment};
//!
//! let shipments = vec![Shipment::new("Box", 2.0, 2.0, 2.0)
//!     .with_weight(10.0)
//!     .with_quantity(2)];
//! let bins = vec![Bin::new("BinA", 4.0, 4.0, 4.0).with_max_weight(15.0)];
//!
//! let result = GreedyPacker::default_config()
//!     .allocate(&shipments, &bins)
//!     .unwrap();
//! assert_eq!(result.placed_count(), 1);
//! assert_eq!(result.unfit_quantity(), 1);
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `packer` (default): the greedy allocator
//! - `serde`: Serialization support

/// Core types and abstractions.
pub use u_binfit_core as core;

/// Greedy allocation.
#[cfg(feature = "packer")]
pub use u_binfit_packer as packer;

// Re-export commonly used types at root level
pub use u_binfit_core::{
    AllocationResult, AllocationSummary, Allocator, Bin, Config, Error, Result, RotationType,
    Shipment, UnfitRecord,
};

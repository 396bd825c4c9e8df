//! # U-BinFit Core
//!
//! Entities, errors and traits shared by the U-BinFit shipment allocation
//! engine.
//!
//! ## Core Components
//!
//! - **Entities**: [`Shipment`], [`Bin`], [`PlacedUnit`], [`UnfitRecord`]
//! - **Rotation modes**: [`RotationType`]
//! - **Progress records**: [`PlacementEvent`], [`Snapshot`], [`ProgressInfo`]
//! - **Allocator trait**: common interface for allocation algorithms
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod bin;
pub mod error;
pub mod placement;
pub mod result;
pub mod rotation;
pub mod shipment;
pub mod solver;

// Re-exports
pub use bin::{Bin, PlacedUnit};
pub use error::{Error, Result};
pub use placement::{PlacementEvent, Snapshot};
pub use result::{AllocationResult, AllocationSummary, UnfitRecord};
pub use rotation::RotationType;
pub use shipment::Shipment;
pub use solver::{Allocator, Config, ProgressCallback, ProgressInfo};

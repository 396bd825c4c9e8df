//! # U-BinFit FFI
//!
//! JSON interface and C FFI for the U-BinFit shipment allocation engine.
//!
//! Requests describe shipments and bins as JSON; responses carry the final
//! bin states and the residual demand. The C entry points let other languages
//! (C#, Python, etc.) drive an allocation and observe it one commit at a time.

mod api;
mod callback;
mod types;

pub use api::*;
pub use callback::UbinfitProgressCallback;
pub use types::*;

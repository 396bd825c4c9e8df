//! Collection of residual demand after a sweep.

use u_binfit_core::{Shipment, UnfitRecord};

/// Builds one unfit record per shipment with units still outstanding.
///
/// Order follows `shipments`. Shipments with nothing left are skipped, so an
/// empty result means everything was placed.
pub fn aggregate_unfit(shipments: &[Shipment]) -> Vec<UnfitRecord> {
    shipments
        .iter()
        .filter(|s| s.quantity() > 0)
        .map(|s| UnfitRecord::new(s.name(), s.quantity()))
        .collect()
}

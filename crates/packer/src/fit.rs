//! Single-unit admission test.

use u_binfit_core::{Bin, RotationType, Shipment};

/// Decides whether one more unit of `shipment` can go into `bin`.
///
/// Axis pairing depends on the rotation mode:
///
/// | mode | bin length | bin width | bin height |
/// |---|---|---|---|
/// | `vertical` | ≥ length | ≥ width | ≥ height |
/// | `horizontal` | ≥ width | ≥ height | ≥ length |
/// | `any` | same as `horizontal` | | |
///
/// `any` tests a single orientation; it does not search the others.
/// Unrecognized modes never fit.
///
/// A recognized mode additionally needs the bin to be available and to have
/// room for the unit's weight on top of what it already carries. Only one unit
/// is considered; there is no look-ahead.
pub fn fits(bin: &Bin, shipment: &Shipment) -> bool {
    let geometry = match shipment.rotation() {
        RotationType::Vertical => {
            bin.length() >= shipment.length()
                && bin.width() >= shipment.width()
                && bin.height() >= shipment.height()
        }
        RotationType::Horizontal | RotationType::Any => {
            bin.width() >= shipment.height()
                && bin.length() >= shipment.width()
                && bin.height() >= shipment.length()
        }
        RotationType::Unrecognized(_) => return false,
    };

    geometry && has_weight_room(bin, shipment) && bin.is_available()
}

fn has_weight_room(bin: &Bin, shipment: &Shipment) -> bool {
    bin.max_weight() >= bin.current_weight() + shipment.weight()
}

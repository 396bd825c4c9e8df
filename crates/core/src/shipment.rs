//! Shipments: the demand side of an allocation.

use nalgebra::Vector3;

use crate::bin::PlacedUnit;
use crate::rotation::RotationType;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A demand record: `quantity` identical units of one box type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shipment {
    /// Identifier. Not required to be unique across an input list.
    name: String,

    /// Dimensions (length, height, width).
    dimensions: Vector3<f64>,

    /// Weight of a single unit.
    weight: f64,

    /// Units still waiting for a bin.
    quantity: usize,

    /// Declared rotation mode.
    rotation: RotationType,
}

impl Shipment {
    /// Creates a shipment of one weightless unit with the `any` rotation mode.
    pub fn new(name: impl Into<String>, length: f64, height: f64, width: f64) -> Self {
        Self {
            name: name.into(),
            dimensions: Vector3::new(length, height, width),
            weight: 0.0,
            quantity: 1,
            rotation: RotationType::default(),
        }
    }

    /// Sets the per-unit weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the number of units.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the rotation mode.
    pub fn with_rotation(mut self, rotation: impl Into<RotationType>) -> Self {
        self.rotation = rotation.into();
        self
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dimensions (length, height, width).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the length.
    pub fn length(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the width.
    pub fn width(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the per-unit weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the number of units not yet committed to a bin.
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Returns the rotation mode.
    pub fn rotation(&self) -> &RotationType {
        &self.rotation
    }

    /// Volume of a single unit.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Builds the record for one committed unit of this shipment.
    pub fn unit(&self) -> PlacedUnit {
        PlacedUnit::new(
            self.name.clone(),
            self.dimensions,
            self.weight,
            self.rotation.clone(),
        )
    }

    /// Removes one unit from the outstanding quantity.
    ///
    /// Returns `false` and leaves the shipment untouched when nothing is left.
    pub fn take_unit(&mut self) -> bool {
        match self.quantity.checked_sub(1) {
            Some(rest) => {
                self.quantity = rest;
                true
            }
            None => false,
        }
    }

    /// Checks geometry and weight before the shipment enters an allocation.
    pub fn validate(&self) -> Result<()> {
        for (axis, value) in ["length", "height", "width"]
            .iter()
            .zip(self.dimensions.iter())
        {
            if !value.is_finite() || *value <= 0.0 {
                return Err(Error::InvalidShipment(format!(
                    "{} for '{}' must be a positive number, got {}",
                    axis, self.name, value
                )));
            }
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::InvalidShipment(format!(
                "Weight for '{}' cannot be negative, got {}",
                self.name, self.weight
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shipment_volume() {
        let shipment = Shipment::new("Box", 2.0, 3.0, 4.0);
        assert_relative_eq!(shipment.volume(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_axis_accessors() {
        let shipment = Shipment::new("Pole", 5.0, 1.0, 2.0);
        assert_eq!(shipment.length(), 5.0);
        assert_eq!(shipment.height(), 1.0);
        assert_eq!(shipment.width(), 2.0);
    }

    #[test]
    fn test_take_unit_stops_at_zero() {
        let mut shipment = Shipment::new("Box", 1.0, 1.0, 1.0).with_quantity(1);
        assert!(shipment.take_unit());
        assert_eq!(shipment.quantity(), 0);
        assert!(!shipment.take_unit());
        assert_eq!(shipment.quantity(), 0);
    }

    #[test]
    fn test_unit_copies_attributes() {
        let shipment = Shipment::new("Crate", 2.0, 2.0, 2.0)
            .with_weight(7.5)
            .with_quantity(4)
            .with_rotation("vertical");
        let unit = shipment.unit();
        assert_eq!(unit.name(), "Crate");
        assert_eq!(unit.weight(), 7.5);
        assert_eq!(unit.quantity(), 1);
        assert_eq!(unit.rotation(), &RotationType::Vertical);
    }

    #[test]
    fn test_validation() {
        assert!(Shipment::new("ok", 1.0, 1.0, 1.0).validate().is_ok());
        assert!(Shipment::new("zero_qty", 1.0, 1.0, 1.0)
            .with_quantity(0)
            .validate()
            .is_ok());

        assert!(Shipment::new("flat", 1.0, 0.0, 1.0).validate().is_err());
        assert!(Shipment::new("neg", -1.0, 1.0, 1.0).validate().is_err());
        assert!(Shipment::new("nan", f64::NAN, 1.0, 1.0).validate().is_err());
        assert!(Shipment::new("heavy", 1.0, 1.0, 1.0)
            .with_weight(-0.5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_unrecognized_rotation_is_still_valid() {
        let shipment = Shipment::new("Odd", 1.0, 1.0, 1.0).with_rotation("sideways");
        assert!(shipment.validate().is_ok());
        assert!(!shipment.rotation().is_recognized());
    }
}

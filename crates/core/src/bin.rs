//! Bins and the units placed in them.

use std::collections::BTreeMap;

use nalgebra::Vector3;

use crate::rotation::RotationType;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One committed unit of a shipment. Its quantity is always 1.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedUnit {
    name: String,
    dimensions: Vector3<f64>,
    weight: f64,
    rotation: RotationType,
}

impl PlacedUnit {
    /// Creates a unit record. Dimensions are (length, height, width).
    pub fn new(
        name: impl Into<String>,
        dimensions: Vector3<f64>,
        weight: f64,
        rotation: RotationType,
    ) -> Self {
        Self {
            name: name.into(),
            dimensions,
            weight,
            rotation,
        }
    }

    /// Returns the shipment name this unit came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dimensions (length, height, width).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the unit weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Always 1.
    pub fn quantity(&self) -> usize {
        1
    }

    /// Returns the rotation mode inherited from the shipment.
    pub fn rotation(&self) -> &RotationType {
        &self.rotation
    }

    /// Volume of the unit.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }
}

/// A finite-capacity container.
///
/// `quantity` is an availability flag: zero disables the bin, any positive
/// value enables it. Placement never decrements it, so one `Bin` is one
/// container regardless of the flag's value.
///
/// Only aggregate occupancy is tracked (weight and per-name counts). Placed
/// units have no coordinates and the bin does not check that they could be
/// laid out without overlapping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bin {
    name: String,

    /// Dimensions (length, height, width).
    dimensions: Vector3<f64>,

    max_weight: f64,

    quantity: usize,

    current_weight: f64,

    /// Placement order.
    items: Vec<PlacedUnit>,

    /// Units per shipment name.
    placed_by_name: BTreeMap<String, usize>,
}

impl Bin {
    /// Creates an enabled bin with zero weight capacity.
    pub fn new(name: impl Into<String>, length: f64, height: f64, width: f64) -> Self {
        Self {
            name: name.into(),
            dimensions: Vector3::new(length, height, width),
            max_weight: 0.0,
            quantity: 1,
            current_weight: 0.0,
            items: Vec::new(),
            placed_by_name: BTreeMap::new(),
        }
    }

    /// Sets the weight capacity.
    pub fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight = max_weight;
        self
    }

    /// Sets the availability flag. Zero disables the bin.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
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

    /// Returns the weight capacity.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Returns the availability flag.
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Returns true if the bin may receive units.
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Returns the weight committed so far.
    pub fn current_weight(&self) -> f64 {
        self.current_weight
    }

    /// Returns the weight still available.
    pub fn remaining_weight(&self) -> f64 {
        self.max_weight - self.current_weight
    }

    /// Returns the placed units in placement order.
    pub fn items(&self) -> &[PlacedUnit] {
        &self.items
    }

    /// Returns true if nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units of the named shipment placed here.
    pub fn placed_count(&self, name: &str) -> usize {
        self.placed_by_name.get(name).copied().unwrap_or(0)
    }

    /// Returns true if at least one unit with this name is in the bin.
    pub fn holds(&self, name: &str) -> bool {
        self.placed_count(name) > 0
    }

    /// Commits a unit: appends it and adds its weight.
    ///
    /// Admission is the caller's decision; this only keeps the weight total and
    /// name index consistent with `items`.
    pub fn place(&mut self, unit: PlacedUnit) {
        self.current_weight += unit.weight();
        *self.placed_by_name.entry(unit.name().to_string()).or_insert(0) += 1;
        self.items.push(unit);
    }

    /// Interior volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Sum of the volumes of the placed units.
    pub fn filled_volume(&self) -> f64 {
        self.items.iter().map(PlacedUnit::volume).sum()
    }

    /// Filled volume over interior volume. May exceed 1.0 because layout is
    /// not modelled.
    pub fn fill_ratio(&self) -> f64 {
        let volume = self.volume();
        if volume > 0.0 {
            self.filled_volume() / volume
        } else {
            0.0
        }
    }

    /// Checks geometry and capacity before the bin enters an allocation.
    pub fn validate(&self) -> Result<()> {
        for (axis, value) in ["length", "height", "width"]
            .iter()
            .zip(self.dimensions.iter())
        {
            if !value.is_finite() || *value <= 0.0 {
                return Err(Error::InvalidBin(format!(
                    "{} for '{}' must be a positive number, got {}",
                    axis, self.name, value
                )));
            }
        }

        if !self.max_weight.is_finite() || self.max_weight < 0.0 {
            return Err(Error::InvalidBin(format!(
                "Maximum weight for '{}' cannot be negative, got {}",
                self.name, self.max_weight
            )));
        }

        self.check_occupancy()
    }

    /// Rejects a bin whose weight total or name index disagrees with `items`,
    /// which can only happen when the bin was built by deserialization.
    fn check_occupancy(&self) -> Result<()> {
        let item_weight: f64 = self.items.iter().map(PlacedUnit::weight).sum();
        let tolerance = 1e-9 * item_weight.abs().max(1.0);
        if !self.current_weight.is_finite()
            || (self.current_weight - item_weight).abs() > tolerance
        {
            return Err(Error::InvalidBin(format!(
                "Current weight for '{}' is {} but its units weigh {}",
                self.name, self.current_weight, item_weight
            )));
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for unit in &self.items {
            *counts.entry(unit.name().to_string()).or_insert(0) += 1;
        }
        if counts != self.placed_by_name {
            return Err(Error::InvalidBin(format!(
                "Unit index for '{}' does not match its placed units",
                self.name
            )));
        }

        Ok(())
    }
}

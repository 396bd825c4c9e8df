//! Request and response types for the JSON interface.

use serde::{Deserialize, Serialize};
use u_binfit_core::{
    AllocationResult, Bin, Config, Error, PlacedUnit, ProgressInfo, Result, Shipment,
    UnfitRecord,
};

/// API version from Cargo.toml.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Allocation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackRequest {
    /// API version.
    #[serde(default)]
    pub version: Option<String>,

    /// Shipment descriptors.
    #[serde(default)]
    pub shipments: Vec<ShipmentRequest>,

    /// Bin descriptors.
    #[serde(default)]
    pub bins: Vec<BinRequest>,

    /// Run limits.
    #[serde(default)]
    pub config: Option<ConfigRequest>,
}

/// Shipment descriptor.
///
/// Every field except `rotation_type` is required. Fields are optional here
/// only so that a missing one is reported by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub name: Option<String>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub weight: Option<f64>,
    pub quantity: Option<i64>,

    /// `horizontal`, `vertical` or `any` (default). Other values are accepted
    /// and never fit.
    #[serde(default)]
    pub rotation_type: Option<String>,
}

/// Bin descriptor. Every field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BinRequest {
    pub name: Option<String>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub max_weight: Option<f64>,

    /// Availability flag; 0 disables the bin.
    pub quantity: Option<i64>,
}

/// Run limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigRequest {
    /// Time limit in milliseconds (0 = unlimited).
    pub time_limit_ms: Option<u64>,

    /// Stop after this many unit commits.
    pub max_placements: Option<usize>,
}

fn require<T>(value: Option<T>, path: impl FnOnce() -> String) -> Result<T> {
    value.ok_or_else(|| Error::MissingField(path()))
}

fn count(value: i64, what: &str, invalid: impl FnOnce(String) -> Error) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| invalid(format!("{} cannot be negative, got {}", what, value)))
}

impl ShipmentRequest {
    /// Builds and validates the shipment at position `index` of a request.
    pub fn to_shipment(&self, index: usize) -> Result<Shipment> {
        let field = |name: &str| format!("shipments[{}].{}", index, name);

        let name = require(self.name.clone(), || field("name"))?;
        let length = require(self.length, || field("length"))?;
        let height = require(self.height, || field("height"))?;
        let width = require(self.width, || field("width"))?;
        let weight = require(self.weight, || field("weight"))?;
        let quantity = require(self.quantity, || field("quantity"))?;
        let quantity = count(
            quantity,
            &format!("Quantity for '{}'", name),
            Error::InvalidShipment,
        )?;

        let mut shipment = Shipment::new(name, length, height, width)
            .with_weight(weight)
            .with_quantity(quantity);
        if let Some(rotation) = &self.rotation_type {
            shipment = shipment.with_rotation(rotation.as_str());
        }

        shipment.validate()?;
        Ok(shipment)
    }
}

impl BinRequest {
    /// Builds and validates the bin at position `index` of a request.
    pub fn to_bin(&self, index: usize) -> Result<Bin> {
        let field = |name: &str| format!("bins[{}].{}", index, name);

        let name = require(self.name.clone(), || field("name"))?;
        let length = require(self.length, || field("length"))?;
        let height = require(self.height, || field("height"))?;
        let width = require(self.width, || field("width"))?;
        let max_weight = require(self.max_weight, || field("max_weight"))?;
        let quantity = require(self.quantity, || field("quantity"))?;
        let quantity = count(
            quantity,
            &format!("Quantity for '{}'", name),
            Error::InvalidBin,
        )?;

        let bin = Bin::new(name, length, height, width)
            .with_max_weight(max_weight)
            .with_quantity(quantity);

        bin.validate()?;
        Ok(bin)
    }
}

impl ConfigRequest {
    /// Overlays the provided values on the default configuration.
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();
        if let Some(ms) = self.time_limit_ms {
            config.time_limit_ms = ms;
        }
        if let Some(max) = self.max_placements {
            config.max_placements = Some(max);
        }
        config
    }
}

/// Response for allocation requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResponse {
    /// API version.
    pub version: String,

    /// Whether the operation succeeded.
    pub success: bool,

    /// Error message if failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Final bin states, in input order.
    #[serde(default)]
    pub bins: Vec<BinResponse>,

    /// Residual demand; omitted when everything was placed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unfitted_items: Vec<UnfitResponse>,

    /// Number of unit commits.
    #[serde(default)]
    pub placements: usize,

    /// Whether the run stopped before its input was exhausted.
    #[serde(default)]
    pub cancelled: bool,

    /// Whether the stop was caused by the time limit.
    #[serde(default)]
    pub timed_out: bool,

    /// Computation time in milliseconds.
    #[serde(default)]
    pub computation_time_ms: u64,
}

impl PackResponse {
    /// Builds a failure response carrying only an error message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            version: API_VERSION.to_string(),
            success: false,
            error: Some(message.into()),
            bins: Vec::new(),
            unfitted_items: Vec::new(),
            placements: 0,
            cancelled: false,
            timed_out: false,
            computation_time_ms: 0,
        }
    }
}

impl From<AllocationResult> for PackResponse {
    fn from(result: AllocationResult) -> Self {
        Self {
            version: API_VERSION.to_string(),
            success: true,
            error: None,
            bins: result.bins.iter().map(BinResponse::from).collect(),
            unfitted_items: result.unfit.iter().map(UnfitResponse::from).collect(),
            placements: result.placements,
            cancelled: result.cancelled,
            timed_out: result.timed_out,
            computation_time_ms: result.computation_time_ms,
        }
    }
}

/// Bin state in a response or snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinResponse {
    pub name: String,
    pub current_weight: f64,
    pub max_weight: f64,
    pub quantity: usize,
    pub items: Vec<ItemResponse>,
}

impl From<&Bin> for BinResponse {
    fn from(bin: &Bin) -> Self {
        Self {
            name: bin.name().to_string(),
            current_weight: bin.current_weight(),
            max_weight: bin.max_weight(),
            quantity: bin.quantity(),
            items: bin.items().iter().map(ItemResponse::from).collect(),
        }
    }
}

/// A placed unit in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub name: String,
    /// Always 1.
    pub quantity: usize,
    pub rotation_type: String,
}

impl From<&PlacedUnit> for ItemResponse {
    fn from(unit: &PlacedUnit) -> Self {
        Self {
            name: unit.name().to_string(),
            quantity: unit.quantity(),
            rotation_type: unit.rotation().to_string(),
        }
    }
}

/// Residual demand in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfitResponse {
    pub name: String,
    pub quantity: usize,
}

impl From<&UnfitRecord> for UnfitResponse {
    fn from(record: &UnfitRecord) -> Self {
        Self {
            name: record.name.clone(),
            quantity: record.quantity,
        }
    }
}

/// Progress payload sent after every unit commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotJson {
    pub sequence: usize,
    pub bin_index: usize,
    pub bin_name: String,
    pub shipment_name: String,
    pub rotation_type: String,
    pub remaining: usize,
    pub placed: usize,
    pub total_units: usize,
    pub elapsed_ms: u64,
    pub bins: Vec<BinResponse>,
}

impl From<&ProgressInfo<'_>> for SnapshotJson {
    fn from(info: &ProgressInfo<'_>) -> Self {
        Self {
            sequence: info.event.sequence,
            bin_index: info.event.bin_index,
            bin_name: info.event.bin_name.clone(),
            shipment_name: info.event.shipment_name.clone(),
            rotation_type: info.event.rotation.to_string(),
            remaining: info.event.remaining,
            placed: info.placed,
            total_units: info.total_units,
            elapsed_ms: info.elapsed_ms,
            bins: info.bins.iter().map(BinResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_binfit_core::RotationType;

    fn shipment_json(body: &str) -> ShipmentRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_shipment_request_defaults_rotation() {
        let req = shipment_json(
            r#"{"name": "Box", "length": 2, "height": 2, "width": 2, "weight": 5, "quantity": 3}"#,
        );
        let shipment = req.to_shipment(0).unwrap();
        assert_eq!(shipment.rotation(), &RotationType::Any);
        assert_eq!(shipment.quantity(), 3);
    }

    #[test]
    fn test_shipment_request_keeps_unknown_rotation() {
        let req = shipment_json(
            r#"{"name": "Box", "length": 2, "height": 2, "width": 2, "weight": 5,
                "quantity": 1, "rotation_type": "upside_down"}"#,
        );
        let shipment = req.to_shipment(0).unwrap();
        assert_eq!(shipment.rotation().as_str(), "upside_down");
    }

    #[test]
    fn test_missing_field_is_named() {
        let req = shipment_json(r#"{"name": "Box", "length": 2, "height": 2, "width": 2, "quantity": 1}"#);
        match req.to_shipment(4) {
            Err(Error::MissingField(path)) => assert_eq!(path, "shipments[4].weight"),
            other => panic!("unexpected: {:?}", other),
        }

        let bin: BinRequest =
            serde_json::from_str(r#"{"name": "BinA", "length": 4, "height": 4, "width": 4, "quantity": 1}"#)
                .unwrap();
        match bin.to_bin(0) {
            Err(Error::MissingField(path)) => assert_eq!(path, "bins[0].max_weight"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let req = shipment_json(
            r#"{"name": "Box", "length": 2, "height": 2, "width": 2, "weight": 5, "quantity": -1}"#,
        );
        assert!(matches!(req.to_shipment(0), Err(Error::InvalidShipment(_))));

        let bin: BinRequest = serde_json::from_str(
            r#"{"name": "BinA", "length": 4, "height": 4, "width": 4, "max_weight": 1, "quantity": -2}"#,
        )
        .unwrap();
        assert!(matches!(bin.to_bin(0), Err(Error::InvalidBin(_))));
    }

    #[test]
    fn test_non_positive_dimension_rejected() {
        let req = shipment_json(
            r#"{"name": "Box", "length": 0, "height": 2, "width": 2, "weight": 5, "quantity": 1}"#,
        );
        assert!(matches!(req.to_shipment(0), Err(Error::InvalidShipment(_))));
    }

    #[test]
    fn test_response_omits_empty_unfit_list() {
        let result = AllocationResult::new(vec![Bin::new("BinA", 1.0, 1.0, 1.0)], vec![]);
        let json = serde_json::to_value(PackResponse::from(result)).unwrap();
        assert!(json.get("unfitted_items").is_none());
        assert_eq!(json["bins"][0]["name"], "BinA");
        assert_eq!(json["bins"][0]["quantity"], 1);
    }

    #[test]
    fn test_config_request() {
        let config = ConfigRequest {
            time_limit_ms: Some(100),
            max_placements: None,
        }
        .to_config();
        assert_eq!(config.time_limit_ms, 100);
        assert_eq!(config.max_placements, None);
    }
}

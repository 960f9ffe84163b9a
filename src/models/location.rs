//! Physical warehouse vocabulary shared by the routing, slotting and wave
//! planning services.

use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Warehouse zone. `A` is the front, fast-pick face; `D` is overflow and the
/// isolation zone for hazardous stock. Ordering follows the walking route
/// through the building.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum Zone {
    A,
    B,
    C,
    D,
}

/// Temperature regime of a storage slot or a product requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TemperatureRegime {
    Ambient,
    Chilled,
    Frozen,
}

/// Occupancy status of a storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

/// ABC velocity classification of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Velocity {
    Fast,
    Medium,
    Slow,
}

/// A storage slot and its physical properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub id: Uuid,
    pub code: String,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub zone: Zone,
    /// 1 = ground, higher numbers = upper shelves.
    pub level: u8,
    pub aisle: String,
    pub capacity_m3: f64,
    pub current_occupancy_m3: f64,
    pub distance_from_dispatch_m: f64,
    pub is_accessible: bool,
    pub temperature: TemperatureRegime,
    pub status: LocationStatus,
}

/// Outer dimensions of a product unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
}

/// Product characteristics driving slotting decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProfile {
    pub product_id: Uuid,
    pub sku: String,
    pub weight_kg: f64,
    pub volume_m3: f64,
    pub dimensions: Dimensions,
    pub category: String,
    pub velocity: Velocity,
    pub orders_per_day: f64,
    pub units_per_order: f64,
    /// When set, only slots with the matching regime are usable.
    pub required_temperature: Option<TemperatureRegime>,
    pub is_fragile: bool,
    pub is_hazardous: bool,
}

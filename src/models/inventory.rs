//! Inventory snapshot records consumed by every picker.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Lifecycle status of an inventory lot. Only `Available` lots are eligible
/// for picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Available,
    Reserved,
    Quarantine,
    Expired,
}

/// Demand classification. Wholesale prefers single-lot fulfillment (simpler
/// logistics and traceability); retail allows fragmentation across lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Wholesale,
    Retail,
}

/// One physical lot/location combination for a product.
///
/// Read-only input: the engine never mutates a snapshot. Consumed quantities
/// are reported back to the caller, who owns the system of record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLot {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity_on_hand: i32,
    pub quantity_available: i32,
    pub quantity_reserved: i32,
    pub location_id: Uuid,
    pub location_code: String,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    /// Absent for non-perishable stock.
    pub best_before_date: Option<NaiveDate>,
    /// Human-readable batch code, carried through to pick lines for
    /// traceability.
    pub lot_number: Option<String>,
    /// Receipt timestamp; FIFO tie-break for lots without an expiry.
    pub created_at: DateTime<Utc>,
    pub status: LotStatus,
}

impl InventoryLot {
    /// Whether this lot can serve a pick for `product_id`. Re-evaluated on
    /// every call; eligibility is never cached.
    pub fn is_pickable_for(&self, product_id: Uuid) -> bool {
        self.product_id == product_id
            && self.status == LotStatus::Available
            && self.quantity_available > 0
    }
}

//! Demand inputs and pick outputs.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::inventory::OrderType;

/// A single product demand to allocate against a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PickDemand {
    pub product_id: Uuid,
    /// Units requested. Must be positive; a zero or negative demand is a
    /// caller bug and fails loudly.
    #[validate(range(min = 1))]
    pub quantity_needed: i32,
    pub order_type: OrderType,
    /// When set, the picker restricts itself to this warehouse as long as it
    /// holds any eligible stock, falling back to all warehouses otherwise.
    pub preferred_warehouse_id: Option<Uuid>,
}

/// One line of a generated pick list: take `quantity_to_pick` units of the
/// product from this lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickLine {
    pub inventory_lot_id: Uuid,
    pub product_id: Uuid,
    pub quantity_to_pick: i32,
    pub location_code: String,
    pub warehouse_name: String,
    pub lot_number: Option<String>,
    pub best_before_date: Option<NaiveDate>,
    /// 1-based position in the picking walk, contiguous and strictly
    /// increasing.
    pub sequence: u32,
}

/// Outcome of a single-order pick. Advisory until the caller commits the
/// decrements to the system of record; no reservation is taken here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickResult {
    /// True iff the full requested quantity was allocated.
    pub success: bool,
    pub pick_list: Vec<PickLine>,
    pub total_picked: i32,
    /// Requested minus picked; zero on success.
    pub shortfall: i32,
    /// Non-fatal advisories: imminent expiry, warehouse fallback, wholesale
    /// consolidation failure.
    pub warnings: Vec<String>,
}

/// One order line inside a picking wave. Priority 1 is the highest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WaveDemand {
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity_needed: i32,
    pub order_type: OrderType,
    #[validate(range(min = 1))]
    pub priority: u8,
}

/// Share of a wave pick attributed to a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAllocation {
    pub order_id: Uuid,
    pub quantity: i32,
}

/// Consolidated pick for one lot, possibly serving several orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavePickLine {
    pub inventory_lot_id: Uuid,
    pub product_id: Uuid,
    pub location_code: String,
    pub warehouse_name: String,
    pub quantity_to_pick: i32,
    pub orders: Vec<OrderAllocation>,
    pub pick_sequence: u32,
}

/// Outcome of wave batching. The caller's snapshot is never touched;
/// post-allocation availability is reported here instead so the caller can
/// apply it to the system of record explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveAllocation {
    pub picks: Vec<WavePickLine>,
    /// Lot id to quantity still available after the wave.
    pub remaining_quantities: HashMap<Uuid, i32>,
}

/// Result of re-checking a finalized pick list against a fresh snapshot
/// before commit. Discrepancies are reported, never thrown: this is the
/// caller's last line of defense against races between allocation and
/// commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickListValidation {
    pub valid: bool,
    pub discrepancies: Vec<String>,
}

//! Lot eligibility and ordering rules.
//!
//! Every downstream picker sorts candidate lots with the same comparator:
//! perishables before non-perishables, soonest expiry first among the dated
//! lots (FEFO), oldest receipt first among the undated ones (FIFO), larger
//! lots first for wholesale demand, then location code and finally lot id so
//! that the order is total and repeated runs over a frozen snapshot come out
//! identical.

use std::cmp::Ordering;

use uuid::Uuid;

use crate::errors::AllocationError;
use crate::models::{InventoryLot, OrderType};

/// Filters a snapshot down to the lots that can serve `product_id`.
pub fn eligible_lots(lots: &[InventoryLot], product_id: Uuid) -> Vec<&InventoryLot> {
    lots.iter()
        .filter(|lot| lot.is_pickable_for(product_id))
        .collect()
}

/// Total order over lots for one product and demand type.
pub fn compare_lots(a: &InventoryLot, b: &InventoryLot, order_type: OrderType) -> Ordering {
    let freshness = match (a.best_before_date, b.best_before_date) {
        // Perishables are picked before non-perishables.
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        // FEFO among dated lots.
        (Some(date_a), Some(date_b)) => date_a.cmp(&date_b),
        // FIFO among undated lots.
        (None, None) => a.created_at.cmp(&b.created_at),
    };

    freshness
        .then_with(|| match order_type {
            // Wholesale prefers fewer, larger picks: bigger lots first.
            OrderType::Wholesale => b.quantity_available.cmp(&a.quantity_available),
            OrderType::Retail => Ordering::Equal,
        })
        .then_with(|| a.location_code.cmp(&b.location_code))
        // Two lots can share a location; the id keeps the order total.
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts candidates in picking order for the given demand type.
pub fn sort_for_picking(candidates: &mut [&InventoryLot], order_type: OrderType) {
    candidates.sort_by(|a, b| compare_lots(a, b, order_type));
}

/// Rejects snapshots carrying negative quantities. Such a snapshot indicates
/// an upstream bug and must not silently produce a zero-pick result.
pub fn validate_snapshot(lots: &[InventoryLot]) -> Result<(), AllocationError> {
    for lot in lots {
        if lot.quantity_on_hand < 0 || lot.quantity_available < 0 || lot.quantity_reserved < 0 {
            return Err(AllocationError::InvalidInput(format!(
                "lot {} carries a negative quantity",
                lot.id
            )));
        }
    }
    Ok(())
}

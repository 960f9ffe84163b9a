//! Multi-order wave batching.
//!
//! Aggregates demand across many orders for the same products and allocates
//! shared lots strictly by priority: a higher-priority order may exhaust a
//! lot entirely before a lower-priority order sees it, and same-priority
//! ties are served in input order. Wave batching always distributes across
//! lots; the wholesale single-lot shortcut does not apply here because one
//! lot must be able to serve several orders.

use std::collections::HashMap;

use tracing::{debug, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AllocationError;
use crate::models::{
    InventoryLot, OrderAllocation, OrderType, WaveAllocation, WaveDemand, WavePickLine,
};
use crate::services::lot_selector;

/// Allocates a wave of demands against a snapshot.
///
/// The caller's snapshot is never modified: consumed quantities are tracked
/// in a working copy and handed back in
/// [`WaveAllocation::remaining_quantities`] for the caller to apply to the
/// system of record.
#[instrument(skip(lots, demands), fields(lots = lots.len(), demands = demands.len()))]
pub fn generate_wave_pick_list(
    lots: &[InventoryLot],
    demands: &[WaveDemand],
) -> Result<WaveAllocation, AllocationError> {
    for demand in demands {
        demand
            .validate()
            .map_err(|e| AllocationError::ValidationError(e.to_string()))?;
    }
    lot_selector::validate_snapshot(lots)?;

    // Group demands by product in first-appearance order so the allocation
    // walk is deterministic for identical input.
    let mut product_order: Vec<Uuid> = Vec::new();
    let mut by_product: HashMap<Uuid, Vec<&WaveDemand>> = HashMap::new();
    for demand in demands {
        let group = by_product.entry(demand.product_id).or_insert_with(|| {
            product_order.push(demand.product_id);
            Vec::new()
        });
        group.push(demand);
    }

    let mut remaining: HashMap<Uuid, i32> = lots
        .iter()
        .map(|lot| (lot.id, lot.quantity_available))
        .collect();

    let mut picks: Vec<WavePickLine> = Vec::new();
    let mut pick_index: HashMap<Uuid, usize> = HashMap::new();

    for product_id in product_order {
        let mut group = by_product.remove(&product_id).unwrap_or_default();
        group.sort_by_key(|demand| demand.priority);

        let mut sorted_lots = lot_selector::eligible_lots(lots, product_id);
        lot_selector::sort_for_picking(&mut sorted_lots, OrderType::Retail);

        // One cursor per product: lots already drained by a higher-priority
        // demand are not re-scanned from the start.
        let mut cursor = 0usize;
        for demand in group {
            let mut needed = demand.quantity_needed;
            while needed > 0 && cursor < sorted_lots.len() {
                let lot = sorted_lots[cursor];
                let available = remaining.get(&lot.id).copied().unwrap_or(0);
                if available > 0 {
                    let quantity = available.min(needed);
                    let index = *pick_index.entry(lot.id).or_insert_with(|| {
                        picks.push(WavePickLine {
                            inventory_lot_id: lot.id,
                            product_id: lot.product_id,
                            location_code: lot.location_code.clone(),
                            warehouse_name: lot.warehouse_name.clone(),
                            quantity_to_pick: 0,
                            orders: Vec::new(),
                            pick_sequence: 0,
                        });
                        picks.len() - 1
                    });
                    let pick = &mut picks[index];
                    pick.quantity_to_pick += quantity;
                    pick.orders.push(OrderAllocation {
                        order_id: demand.order_id,
                        quantity,
                    });
                    needed -= quantity;
                    remaining.insert(lot.id, available - quantity);
                }
                if remaining.get(&lot.id).copied().unwrap_or(0) == 0 {
                    cursor += 1;
                }
            }
        }
    }

    picks.sort_by(|a, b| {
        a.location_code
            .cmp(&b.location_code)
            .then_with(|| a.inventory_lot_id.cmp(&b.inventory_lot_id))
    });
    for (index, pick) in picks.iter_mut().enumerate() {
        pick.pick_sequence = (index + 1) as u32;
    }

    debug!(picks = picks.len(), "wave allocation complete");
    Ok(WaveAllocation {
        picks,
        remaining_quantities: remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LotStatus;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn lot(id: u128, product: u128, available: i32, location: &str) -> InventoryLot {
        InventoryLot {
            id: Uuid::from_u128(id),
            product_id: Uuid::from_u128(product),
            quantity_on_hand: available,
            quantity_available: available,
            quantity_reserved: 0,
            location_id: Uuid::from_u128(100 + id),
            location_code: location.to_string(),
            warehouse_id: Uuid::from_u128(500),
            warehouse_name: "Main".to_string(),
            best_before_date: None,
            lot_number: None,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, id as u32 % 28 + 1, 8, 0, 0)
                .unwrap(),
            status: LotStatus::Available,
        }
    }

    fn wave_demand(order: u128, product: u128, quantity: i32, priority: u8) -> WaveDemand {
        WaveDemand {
            order_id: Uuid::from_u128(order),
            product_id: Uuid::from_u128(product),
            quantity_needed: quantity,
            order_type: OrderType::Retail,
            priority,
        }
    }

    #[test]
    fn priority_one_exhausts_a_scarce_lot() {
        let lots = vec![lot(1, 1, 10, "A01")];
        let demands = vec![
            wave_demand(21, 1, 10, 2),
            wave_demand(20, 1, 10, 1),
        ];

        let allocation = generate_wave_pick_list(&lots, &demands).unwrap();
        assert_eq!(allocation.picks.len(), 1);
        let pick = &allocation.picks[0];
        assert_eq!(pick.quantity_to_pick, 10);
        assert_eq!(pick.orders.len(), 1);
        assert_eq!(pick.orders[0].order_id, Uuid::from_u128(20));
        assert_eq!(pick.orders[0].quantity, 10);
        assert_eq!(allocation.remaining_quantities[&Uuid::from_u128(1)], 0);
    }

    #[test]
    fn orders_share_a_lot_when_quantity_allows() {
        let lots = vec![lot(1, 1, 10, "A01")];
        let demands = vec![
            wave_demand(20, 1, 4, 1),
            wave_demand(21, 1, 3, 2),
        ];

        let allocation = generate_wave_pick_list(&lots, &demands).unwrap();
        assert_eq!(allocation.picks.len(), 1);
        let pick = &allocation.picks[0];
        assert_eq!(pick.quantity_to_pick, 7);
        assert_eq!(
            pick.orders,
            vec![
                OrderAllocation {
                    order_id: Uuid::from_u128(20),
                    quantity: 4
                },
                OrderAllocation {
                    order_id: Uuid::from_u128(21),
                    quantity: 3
                },
            ]
        );
        assert_eq!(allocation.remaining_quantities[&Uuid::from_u128(1)], 3);
    }

    #[test]
    fn cursor_moves_on_only_when_a_lot_is_drained() {
        let lots = vec![lot(1, 1, 5, "A01"), lot(2, 1, 8, "A02")];
        let demands = vec![
            wave_demand(20, 1, 3, 1),
            wave_demand(21, 1, 4, 2),
            wave_demand(22, 1, 6, 3),
        ];

        let allocation = generate_wave_pick_list(&lots, &demands).unwrap();
        // Order 20 takes 3 from lot 1; order 21 takes the remaining 2 and
        // then 2 from lot 2; order 22 takes 6 from lot 2.
        assert_eq!(allocation.picks.len(), 2);
        assert_eq!(allocation.picks[0].quantity_to_pick, 5);
        assert_eq!(allocation.picks[1].quantity_to_pick, 8);
        assert_eq!(allocation.remaining_quantities[&Uuid::from_u128(1)], 0);
        assert_eq!(allocation.remaining_quantities[&Uuid::from_u128(2)], 0);
    }

    #[test]
    fn snapshot_is_never_mutated() {
        let lots = vec![lot(1, 1, 10, "A01")];
        let before = lots.clone();
        let demands = vec![wave_demand(20, 1, 10, 1)];

        let _ = generate_wave_pick_list(&lots, &demands).unwrap();
        assert_eq!(lots, before);
    }

    #[test]
    fn picks_come_back_in_location_order_with_contiguous_sequences() {
        let lots = vec![
            lot(1, 1, 5, "C03"),
            lot(2, 2, 5, "A01"),
            lot(3, 3, 5, "B02"),
        ];
        let demands = vec![
            wave_demand(20, 1, 5, 1),
            wave_demand(21, 2, 5, 1),
            wave_demand(22, 3, 5, 1),
        ];

        let allocation = generate_wave_pick_list(&lots, &demands).unwrap();
        let codes: Vec<&str> = allocation
            .picks
            .iter()
            .map(|p| p.location_code.as_str())
            .collect();
        assert_eq!(codes, vec!["A01", "B02", "C03"]);
        let sequences: Vec<u32> = allocation.picks.iter().map(|p| p.pick_sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn unfilled_demand_leaves_untouched_products_alone() {
        let lots = vec![lot(1, 1, 2, "A01"), lot(2, 9, 7, "B01")];
        let demands = vec![wave_demand(20, 1, 5, 1)];

        let allocation = generate_wave_pick_list(&lots, &demands).unwrap();
        assert_eq!(allocation.picks.len(), 1);
        assert_eq!(allocation.picks[0].quantity_to_pick, 2);
        // Product 9 had no demand; its lot is reported at full availability.
        assert_eq!(allocation.remaining_quantities[&Uuid::from_u128(2)], 7);
    }

    #[test]
    fn identical_input_allocates_identically() {
        let lots = vec![
            lot(1, 1, 5, "A01"),
            lot(2, 1, 5, "A01"),
            lot(3, 2, 9, "B04"),
        ];
        let demands = vec![
            wave_demand(20, 1, 7, 1),
            wave_demand(21, 2, 4, 1),
            wave_demand(22, 1, 3, 2),
        ];

        let first = generate_wave_pick_list(&lots, &demands).unwrap();
        let second = generate_wave_pick_list(&lots, &demands).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_quantity_demand_is_rejected() {
        let lots = vec![lot(1, 1, 5, "A01")];
        let demands = vec![wave_demand(20, 1, 0, 1)];
        let err = generate_wave_pick_list(&lots, &demands).unwrap_err();
        assert_matches!(err, AllocationError::ValidationError(_));
    }
}

//! End-to-end allocation flows over a realistic snapshot: generate a pick
//! list, re-validate it against the snapshot, and route-optimize the result;
//! plus the wave batching flow across competing orders.

use chrono::NaiveDate;
use uuid::Uuid;
use warehouse_allocation::models::{
    InventoryLot, OrderType, PickDemand, WaveDemand,
};
use warehouse_allocation::services::picking::PickingService;
use warehouse_allocation::services::routing::optimize_pick_route;
use warehouse_allocation::services::wave::generate_wave_pick_list;

fn snapshot() -> Vec<InventoryLot> {
    serde_json::from_str(include_str!("fixtures/inventory_snapshot.json"))
        .expect("fixture parses")
}

fn product(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn retail_pick_follows_fefo_and_skips_quarantined_stock() {
    let lots = snapshot();
    let service = PickingService::new();
    let demand = PickDemand {
        product_id: product(1),
        quantity_needed: 12,
        order_type: OrderType::Retail,
        preferred_warehouse_id: None,
    };

    let result = service
        .generate_pick_list(&lots, &demand, day(2024, 5, 20))
        .unwrap();

    assert!(result.success);
    assert_eq!(result.total_picked, 12);
    assert_eq!(result.shortfall, 0);

    // The quarantined lot has the earliest expiry but must not appear.
    assert!(result
        .pick_list
        .iter()
        .all(|line| line.lot_number.as_deref() != Some("LOT-2401-E")));

    // FEFO: the 2024-06-10 lot drains before the 2024-07-01 lot is touched.
    assert_eq!(result.pick_list.len(), 2);
    assert_eq!(result.pick_list[0].lot_number.as_deref(), Some("LOT-2401-A"));
    assert_eq!(result.pick_list[0].quantity_to_pick, 5);
    assert_eq!(result.pick_list[1].lot_number.as_deref(), Some("LOT-2401-B"));
    assert_eq!(result.pick_list[1].quantity_to_pick, 7);

    // One picked lot is inside the 30-day expiry window on 2024-05-20.
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("1 picked lot(s) expire within 30 days")));

    // The same snapshot validates the proposal cleanly.
    let report = service.validate_pick_list(&result.pick_list, &lots, day(2024, 5, 20));
    assert!(report.valid, "unexpected discrepancies: {:?}", report.discrepancies);
}

#[test]
fn route_optimizer_walks_each_warehouse_in_location_order() {
    let lots = snapshot();
    let service = PickingService::new();

    // Build a combined pick list across two products, then route it.
    let mut combined = Vec::new();
    for (product_id, quantity) in [(product(1), 30), (product(2), 8)] {
        let demand = PickDemand {
            product_id,
            quantity_needed: quantity,
            order_type: OrderType::Retail,
            preferred_warehouse_id: None,
        };
        let result = service
            .generate_pick_list(&lots, &demand, day(2024, 5, 20))
            .unwrap();
        combined.extend(result.pick_list);
    }

    let routed = optimize_pick_route(&combined);

    // North appears first, sorted A01, A02, B02; then South's C03.
    let walk: Vec<(&str, &str)> = routed
        .iter()
        .map(|line| (line.warehouse_name.as_str(), line.location_code.as_str()))
        .collect();
    assert_eq!(
        walk,
        vec![
            ("North", "A01"),
            ("North", "A02"),
            ("North", "B02"),
            ("South", "C03"),
        ]
    );

    let sequences: Vec<u32> = routed.iter().map(|line| line.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4]);

    // Quantities are untouched and a second pass changes nothing.
    let total_combined: i32 = combined.iter().map(|l| l.quantity_to_pick).sum();
    let total_routed: i32 = routed.iter().map(|l| l.quantity_to_pick).sum();
    assert_eq!(total_combined, total_routed);
    assert_eq!(optimize_pick_route(&routed), routed);
}

#[test]
fn preferred_warehouse_keeps_the_pick_local() {
    let lots = snapshot();
    let demand = PickDemand {
        product_id: product(1),
        quantity_needed: 15,
        order_type: OrderType::Retail,
        preferred_warehouse_id: Some(Uuid::from_u128(0x51)),
    };

    let result = PickingService::new()
        .generate_pick_list(&lots, &demand, day(2024, 5, 20))
        .unwrap();

    assert!(result.success);
    assert!(result
        .pick_list
        .iter()
        .all(|line| line.warehouse_name == "North"));
    assert!(result.warnings.iter().any(|w| w.contains("excludes")));
}

#[test]
fn wholesale_demand_consolidates_into_the_covering_lot() {
    let lots = snapshot();
    let demand = PickDemand {
        product_id: product(1),
        quantity_needed: 18,
        order_type: OrderType::Wholesale,
        preferred_warehouse_id: None,
    };

    let result = PickingService::new()
        .generate_pick_list(&lots, &demand, day(2024, 5, 20))
        .unwrap();

    // Only the undated 20-unit lot covers 18; dated lots are all smaller.
    assert!(result.success);
    assert_eq!(result.pick_list.len(), 1);
    assert_eq!(result.pick_list[0].location_code, "C03");
    assert_eq!(result.pick_list[0].quantity_to_pick, 18);
}

#[test]
fn wave_splits_scarce_stock_by_priority_and_reports_remainders() {
    let lots = snapshot();
    let demands = vec![
        WaveDemand {
            order_id: Uuid::from_u128(0xe1),
            product_id: product(1),
            quantity_needed: 10,
            order_type: OrderType::Retail,
            priority: 1,
        },
        WaveDemand {
            order_id: Uuid::from_u128(0xe2),
            product_id: product(1),
            quantity_needed: 10,
            order_type: OrderType::Retail,
            priority: 2,
        },
    ];

    let allocation = generate_wave_pick_list(&lots, &demands).unwrap();

    // Lots drain in FEFO order with a shared cursor: the priority-1 order
    // takes the 5-unit lot plus 5 from the 10-unit lot; priority 2 takes the
    // rest of that lot plus 5 undated units.
    assert_eq!(allocation.picks.len(), 3);
    let by_location: Vec<(&str, i32)> = allocation
        .picks
        .iter()
        .map(|p| (p.location_code.as_str(), p.quantity_to_pick))
        .collect();
    assert_eq!(by_location, vec![("A01", 10), ("B02", 5), ("C03", 5)]);

    let shared = allocation
        .picks
        .iter()
        .find(|p| p.location_code == "A01")
        .unwrap();
    assert_eq!(shared.orders.len(), 2);
    assert_eq!(shared.orders[0].order_id, Uuid::from_u128(0xe1));
    assert_eq!(shared.orders[0].quantity, 5);
    assert_eq!(shared.orders[1].order_id, Uuid::from_u128(0xe2));
    assert_eq!(shared.orders[1].quantity, 5);

    // Sequences follow the location walk.
    let sequences: Vec<u32> = allocation.picks.iter().map(|p| p.pick_sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    // Remaining quantities reflect the allocation without the snapshot
    // having been touched.
    assert_eq!(
        allocation.remaining_quantities[&Uuid::from_u128(0xa1)],
        0
    );
    assert_eq!(
        allocation.remaining_quantities[&Uuid::from_u128(0xa2)],
        0
    );
    assert_eq!(
        allocation.remaining_quantities[&Uuid::from_u128(0xa3)],
        15
    );
    assert_eq!(lots[2].quantity_available, 20);
}

#[test]
fn single_scarce_lot_goes_entirely_to_the_higher_priority_order() {
    let mut lots = snapshot();
    lots.retain(|lot| lot.location_code == "B02");
    assert_eq!(lots.len(), 1);

    let demands = vec![
        WaveDemand {
            order_id: Uuid::from_u128(0xe1),
            product_id: product(1),
            quantity_needed: 5,
            order_type: OrderType::Retail,
            priority: 2,
        },
        WaveDemand {
            order_id: Uuid::from_u128(0xe2),
            product_id: product(1),
            quantity_needed: 5,
            order_type: OrderType::Retail,
            priority: 1,
        },
    ];

    let allocation = generate_wave_pick_list(&lots, &demands).unwrap();
    assert_eq!(allocation.picks.len(), 1);
    let pick = &allocation.picks[0];
    // The priority-1 order wins the whole lot; priority 2 gets nothing.
    assert_eq!(pick.orders.len(), 1);
    assert_eq!(pick.orders[0].order_id, Uuid::from_u128(0xe2));
    assert_eq!(pick.orders[0].quantity, 5);
}

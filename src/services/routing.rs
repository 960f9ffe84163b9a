//! Pick-route ordering and walking-cost estimation.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::models::{PickLine, Zone};

/// Reorders a finalized pick list into an efficient walking route.
///
/// Lines are grouped by warehouse in order of first appearance, sorted by
/// location code within each warehouse, and renumbered 1..N across the whole
/// result. Quantities never change, and the reordering is idempotent: the
/// inner sort is stable, so applying it to its own output is a no-op.
///
/// Location codes are assumed to approximate physical adjacency when
/// compared lexicographically (`A01 < A02 < B01`); code schemes that break
/// this property are the caller's responsibility.
#[instrument(skip(pick_list), fields(lines = pick_list.len()))]
pub fn optimize_pick_route(pick_list: &[PickLine]) -> Vec<PickLine> {
    let mut warehouses: Vec<&str> = Vec::new();
    for line in pick_list {
        if !warehouses.contains(&line.warehouse_name.as_str()) {
            warehouses.push(line.warehouse_name.as_str());
        }
    }

    let mut optimized: Vec<PickLine> = Vec::with_capacity(pick_list.len());
    for warehouse in warehouses {
        let mut group: Vec<&PickLine> = pick_list
            .iter()
            .filter(|line| line.warehouse_name == warehouse)
            .collect();
        group.sort_by(|a, b| a.location_code.cmp(&b.location_code));
        optimized.extend(group.into_iter().cloned());
    }

    for (index, line) in optimized.iter_mut().enumerate() {
        line.sequence = (index + 1) as u32;
    }
    optimized
}

/// A planned stop in a picking walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickStop {
    pub location_code: String,
    pub zone: Zone,
    pub aisle: String,
    pub level: u8,
    pub distance_from_dispatch_m: f64,
}

/// One stop of an estimated route, with the running distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub sequence: u32,
    pub location_code: String,
    pub zone: Zone,
    pub aisle: String,
    pub cumulative_distance_m: f64,
}

/// Walking estimate for a route. Used for reporting and wave planning, not
/// for allocation decisions; no shortest-path guarantee is claimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRoute {
    pub stops: Vec<RouteStop>,
    pub total_distance_m: f64,
    pub estimated_seconds: f64,
}

/// Cost model for a picking walk.
///
/// The default implementation is a zone-adjacency heuristic; a graph-based
/// shortest-path estimator can be substituted here without touching any
/// allocation logic.
pub trait RouteCostEstimator {
    fn estimate(&self, stops: &[PickStop]) -> PickRoute;
}

/// Tunables for [`ZoneWalkEstimator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEstimateConfig {
    /// Metres added between consecutive stops in the same zone.
    pub same_zone_step_m: f64,
    /// Metres added when the walk crosses into another zone.
    pub cross_zone_step_m: f64,
    /// Average picker walking speed in metres per second.
    pub walking_speed_mps: f64,
    /// Fixed handling time per stop.
    pub seconds_per_pick: f64,
}

impl Default for RouteEstimateConfig {
    fn default() -> Self {
        Self {
            same_zone_step_m: 5.0,
            cross_zone_step_m: 15.0,
            walking_speed_mps: 1.4,
            seconds_per_pick: 10.0,
        }
    }
}

/// Zone-adjacency walking estimator: stops are visited zone by zone, aisle
/// by aisle, bottom level first.
#[derive(Debug, Clone, Default)]
pub struct ZoneWalkEstimator {
    config: RouteEstimateConfig,
}

impl ZoneWalkEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RouteEstimateConfig) -> Self {
        Self { config }
    }
}

impl RouteCostEstimator for ZoneWalkEstimator {
    fn estimate(&self, stops: &[PickStop]) -> PickRoute {
        let mut ordered: Vec<&PickStop> = stops.iter().collect();
        ordered.sort_by(|a, b| {
            a.zone
                .cmp(&b.zone)
                .then_with(|| a.aisle.cmp(&b.aisle))
                .then_with(|| a.level.cmp(&b.level))
        });

        let mut cumulative = 0.0;
        let mut route_stops = Vec::with_capacity(ordered.len());
        for (index, stop) in ordered.iter().enumerate() {
            if index == 0 {
                cumulative = stop.distance_from_dispatch_m;
            } else if ordered[index - 1].zone == stop.zone {
                cumulative += self.config.same_zone_step_m;
            } else {
                cumulative += self.config.cross_zone_step_m;
            }
            route_stops.push(RouteStop {
                sequence: (index + 1) as u32,
                location_code: stop.location_code.clone(),
                zone: stop.zone,
                aisle: stop.aisle.clone(),
                cumulative_distance_m: cumulative,
            });
        }

        let walking_seconds = cumulative / self.config.walking_speed_mps;
        let picking_seconds = stops.len() as f64 * self.config.seconds_per_pick;
        PickRoute {
            stops: route_stops,
            total_distance_m: cumulative,
            estimated_seconds: walking_seconds + picking_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn line(id: u128, warehouse: &str, location: &str) -> PickLine {
        PickLine {
            inventory_lot_id: Uuid::from_u128(id),
            product_id: Uuid::from_u128(1),
            quantity_to_pick: 1,
            location_code: location.to_string(),
            warehouse_name: warehouse.to_string(),
            lot_number: None,
            best_before_date: None,
            sequence: 0,
        }
    }

    fn stop(location: &str, zone: Zone, aisle: &str, level: u8, dispatch_m: f64) -> PickStop {
        PickStop {
            location_code: location.to_string(),
            zone,
            aisle: aisle.to_string(),
            level,
            distance_from_dispatch_m: dispatch_m,
        }
    }

    #[test]
    fn reorders_by_location_within_warehouse_groups() {
        let input = vec![
            line(1, "North", "B02"),
            line(2, "South", "A01"),
            line(3, "North", "A05"),
        ];
        let optimized = optimize_pick_route(&input);

        // North appears first in the input, so its lines stay in front.
        let order: Vec<(&str, &str)> = optimized
            .iter()
            .map(|l| (l.warehouse_name.as_str(), l.location_code.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("North", "A05"), ("North", "B02"), ("South", "A01")]
        );
        let sequences: Vec<u32> = optimized.iter().map(|l| l.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn optimization_is_idempotent() {
        let input = vec![
            line(1, "North", "C09"),
            line(2, "North", "A01"),
            line(3, "South", "B04"),
            line(4, "South", "B03"),
        ];
        let once = optimize_pick_route(&input);
        let twice = optimize_pick_route(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn quantities_survive_reordering() {
        let mut input = vec![line(1, "North", "B02"), line(2, "North", "A01")];
        input[0].quantity_to_pick = 7;
        input[1].quantity_to_pick = 3;

        let optimized = optimize_pick_route(&input);
        let total_before: i32 = input.iter().map(|l| l.quantity_to_pick).sum();
        let total_after: i32 = optimized.iter().map(|l| l.quantity_to_pick).sum();
        assert_eq!(total_before, total_after);
    }

    #[test]
    fn estimator_accumulates_zone_steps() {
        let stops = vec![
            stop("B01", Zone::B, "B-1", 1, 40.0),
            stop("A01", Zone::A, "A-1", 1, 10.0),
            stop("A02", Zone::A, "A-1", 2, 12.0),
        ];
        let route = ZoneWalkEstimator::new().estimate(&stops);

        // Sorted A01 (level 1), A02 (level 2), B01; 10 + 5 + 15 metres.
        assert_eq!(route.stops.len(), 3);
        assert_eq!(route.stops[0].location_code, "A01");
        assert_eq!(route.stops[1].location_code, "A02");
        assert_eq!(route.stops[2].location_code, "B01");
        assert!((route.total_distance_m - 30.0).abs() < f64::EPSILON);

        let expected_seconds = 30.0 / 1.4 + 3.0 * 10.0;
        assert!((route.estimated_seconds - expected_seconds).abs() < 1e-9);
    }

    #[test]
    fn empty_walk_costs_nothing() {
        let route = ZoneWalkEstimator::new().estimate(&[]);
        assert!(route.stops.is_empty());
        assert_eq!(route.total_distance_m, 0.0);
        assert_eq!(route.estimated_seconds, 0.0);
    }
}

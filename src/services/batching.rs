//! Wave planning: grouping orders into pick waves, merged batch pick lists,
//! picker-to-zone assignment, and wave efficiency analysis.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::models::{OrderType, Zone};

/// Synthetic walking metres per unique pick location.
const METRES_PER_LOCATION: f64 = 10.0;
/// Synthetic walking metres per zone the wave spans.
const METRES_PER_ZONE: f64 = 50.0;
/// Average picker walking speed in metres per second.
const WALKING_SPEED_MPS: f64 = 1.4;
/// Per-order overhead minutes in a wave time estimate.
const MINUTES_PER_ORDER_OVERHEAD: f64 = 0.5;

/// An order eligible for wave planning. Priority 1 is the highest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub priority: u8,
    pub order_date: NaiveDate,
    pub ship_by_date: NaiveDate,
    pub order_type: OrderType,
    pub total_items: i32,
    pub total_units: i32,
}

/// One line of an order, resolved to its pick location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub location_id: Uuid,
    pub location_code: String,
    pub zone: Zone,
    pub aisle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum WavePriority {
    Critical,
    High,
    Medium,
    Low,
}

/// A planned wave of orders picked in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    pub wave_id: Uuid,
    pub wave_name: String,
    pub orders: Vec<OrderSummary>,
    pub order_count: usize,
    pub total_lines: usize,
    pub total_units: i32,
    pub zones: Vec<Zone>,
    pub estimated_pick_minutes: u32,
    pub priority: WavePriority,
}

/// Share of a batch pick destined for one order's container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerAllocation {
    pub order_id: Uuid,
    pub order_number: String,
    pub quantity: i32,
    pub container_number: u32,
}

/// One consolidated pick serving several orders from a single slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPick {
    pub batch_id: Uuid,
    pub location_code: String,
    pub zone: Zone,
    pub aisle: String,
    pub product_id: Uuid,
    pub total_quantity: i32,
    pub orders: Vec<ContainerAllocation>,
    pub pick_sequence: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PickerSkill {
    Trainee,
    Standard,
    Expert,
}

/// A picker on shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picker {
    pub id: Uuid,
    pub name: String,
    pub assigned_zone: Option<Zone>,
    pub skill_level: PickerSkill,
    pub current_workload_minutes: u32,
    pub max_workload_minutes: u32,
}

/// Picks of one zone handed to one picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAssignment {
    pub zone: Zone,
    pub picker_id: Uuid,
    pub picker_name: String,
    pub picks: Vec<BatchPick>,
    pub estimated_minutes: u32,
}

/// Orders grouped by product overlap, suitable for cluster picking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCluster {
    pub cluster_id: Uuid,
    pub order_ids: Vec<Uuid>,
    pub common_products: Vec<Uuid>,
}

/// Efficiency assessment of a planned wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveEfficiency {
    pub wave_id: Uuid,
    pub lines_per_order: f64,
    pub units_per_line: f64,
    pub unique_locations: usize,
    pub zone_spread: usize,
    pub estimated_distance_m: f64,
    pub estimated_minutes: u32,
    pub efficiency_pct: u32,
    pub recommendation: String,
}

/// Tunables for wave planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WavePlannerConfig {
    /// Maximum orders per wave.
    pub max_wave_size: usize,
    /// Handling seconds per pick line when estimating wave duration.
    pub seconds_per_line: f64,
    /// Fixed seconds of per-order overhead (labelling, container swaps).
    pub seconds_per_order: f64,
    /// Handling seconds per consolidated pick in a zone.
    pub seconds_per_zone_pick: f64,
    /// Seconds per container split when one pick serves several orders.
    pub seconds_per_container_split: f64,
    /// Minimum product overlap for two orders to share a cluster, 0-100.
    pub min_cluster_similarity_pct: f64,
}

impl Default for WavePlannerConfig {
    fn default() -> Self {
        Self {
            max_wave_size: 20,
            seconds_per_line: 15.0,
            seconds_per_order: 30.0,
            seconds_per_zone_pick: 20.0,
            seconds_per_container_split: 5.0,
            min_cluster_similarity_pct: 50.0,
        }
    }
}

/// Plans picking waves and batch pick runs across orders.
#[derive(Debug, Clone, Default)]
pub struct WavePlanner {
    config: WavePlannerConfig,
}

impl WavePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WavePlannerConfig) -> Self {
        Self { config }
    }

    /// Splits orders into Critical / High / Medium bands by priority and
    /// days until ship, keeps wholesale orders together, and cuts waves at
    /// the configured size. `as_of` is the planning date.
    #[instrument(skip(self, orders, order_lines), fields(orders = orders.len()))]
    pub fn create_picking_waves(
        &self,
        orders: &[OrderSummary],
        order_lines: &[OrderLine],
        as_of: NaiveDate,
    ) -> Vec<WaveDefinition> {
        let mut critical = Vec::new();
        let mut high = Vec::new();
        let mut normal = Vec::new();

        for order in orders {
            let days_until_ship = order.ship_by_date.signed_duration_since(as_of).num_days();
            if order.priority == 1 || days_until_ship <= 1 {
                critical.push(order.clone());
            } else if order.priority == 2 || days_until_ship <= 2 {
                high.push(order.clone());
            } else {
                normal.push(order.clone());
            }
        }

        let mut waves = Vec::new();
        waves.extend(self.waves_from_orders(critical, order_lines, WavePriority::Critical));
        waves.extend(self.waves_from_orders(high, order_lines, WavePriority::High));
        waves.extend(self.waves_from_orders(normal, order_lines, WavePriority::Medium));
        debug!(waves = waves.len(), "wave planning complete");
        waves
    }

    fn waves_from_orders(
        &self,
        mut orders: Vec<OrderSummary>,
        order_lines: &[OrderLine],
        priority: WavePriority,
    ) -> Vec<WaveDefinition> {
        if orders.is_empty() {
            return Vec::new();
        }

        // Keep wholesale orders together at the front of the band; stable
        // sort preserves the incoming order within each type.
        orders.sort_by_key(|order| match order.order_type {
            OrderType::Wholesale => 0,
            OrderType::Retail => 1,
        });

        let mut waves = Vec::new();
        let mut current: Vec<OrderSummary> = Vec::new();
        let mut wave_number = 1u32;

        for order in orders {
            let type_changes = current
                .first()
                .map(|first| first.order_type != order.order_type)
                .unwrap_or(false);
            if type_changes || current.len() >= self.config.max_wave_size {
                waves.push(self.build_wave(
                    std::mem::take(&mut current),
                    order_lines,
                    wave_number,
                    priority,
                ));
                wave_number += 1;
            }
            current.push(order);
        }
        if !current.is_empty() {
            waves.push(self.build_wave(current, order_lines, wave_number, priority));
        }
        waves
    }

    fn build_wave(
        &self,
        orders: Vec<OrderSummary>,
        all_lines: &[OrderLine],
        wave_number: u32,
        priority: WavePriority,
    ) -> WaveDefinition {
        let order_ids: HashSet<Uuid> = orders.iter().map(|order| order.id).collect();
        let lines: Vec<&OrderLine> = all_lines
            .iter()
            .filter(|line| order_ids.contains(&line.order_id))
            .collect();

        let mut zones: Vec<Zone> = lines.iter().map(|line| line.zone).collect();
        zones.sort();
        zones.dedup();

        let total_lines = lines.len();
        let total_units: i32 = lines.iter().map(|line| line.quantity).sum();
        let estimated_pick_minutes = ((total_lines as f64 * self.config.seconds_per_line
            + orders.len() as f64 * self.config.seconds_per_order)
            / 60.0)
            .ceil() as u32;

        WaveDefinition {
            wave_id: Uuid::new_v4(),
            wave_name: format!("{} Wave {}", priority, wave_number),
            order_count: orders.len(),
            total_lines,
            total_units,
            zones,
            estimated_pick_minutes,
            priority,
            orders,
        }
    }

    /// Merges a wave's order lines into consolidated picks, one per
    /// (location, product) pair, each order getting its own container, then
    /// sorts the run zone by zone for an efficient walk.
    #[instrument(skip(self, wave, order_lines), fields(wave = %wave.wave_name))]
    pub fn generate_batch_pick_list(
        &self,
        wave: &WaveDefinition,
        order_lines: &[OrderLine],
    ) -> Vec<BatchPick> {
        let order_numbers: HashMap<Uuid, &str> = wave
            .orders
            .iter()
            .map(|order| (order.id, order.order_number.as_str()))
            .collect();

        let mut picks: Vec<BatchPick> = Vec::new();
        let mut index_of: HashMap<(Uuid, Uuid), usize> = HashMap::new();

        for line in order_lines
            .iter()
            .filter(|line| order_numbers.contains_key(&line.order_id))
        {
            let key = (line.location_id, line.product_id);
            let index = *index_of.entry(key).or_insert_with(|| {
                picks.push(BatchPick {
                    batch_id: Uuid::new_v4(),
                    location_code: line.location_code.clone(),
                    zone: line.zone,
                    aisle: line.aisle.clone(),
                    product_id: line.product_id,
                    total_quantity: 0,
                    orders: Vec::new(),
                    pick_sequence: 0,
                });
                picks.len() - 1
            });

            let pick = &mut picks[index];
            pick.total_quantity += line.quantity;
            let container_number = pick.orders.len() as u32 + 1;
            pick.orders.push(ContainerAllocation {
                order_id: line.order_id,
                order_number: order_numbers
                    .get(&line.order_id)
                    .map(|number| number.to_string())
                    .unwrap_or_default(),
                quantity: line.quantity,
                container_number,
            });
        }

        picks.sort_by(|a, b| {
            a.zone
                .cmp(&b.zone)
                .then_with(|| a.aisle.cmp(&b.aisle))
                .then_with(|| a.location_code.cmp(&b.location_code))
        });
        for (index, pick) in picks.iter_mut().enumerate() {
            pick.pick_sequence = (index + 1) as u32;
        }
        picks
    }

    /// Hands each zone's picks to the best available picker: a picker
    /// already assigned to the zone wins, then the least-loaded expert,
    /// then anyone with spare shift capacity. The caller's picker list is
    /// read-only; accumulated workload is tracked per call.
    #[instrument(skip(self, batch_picks, pickers))]
    pub fn assign_pickers_to_zones(
        &self,
        batch_picks: &[BatchPick],
        pickers: &[Picker],
    ) -> Vec<ZoneAssignment> {
        let mut by_zone: Vec<(Zone, Vec<BatchPick>)> = Vec::new();
        for pick in batch_picks {
            match by_zone.iter_mut().find(|(zone, _)| *zone == pick.zone) {
                Some((_, picks)) => picks.push(pick.clone()),
                None => by_zone.push((pick.zone, vec![pick.clone()])),
            }
        }
        by_zone.sort_by_key(|(zone, _)| *zone);

        let mut workloads: HashMap<Uuid, u32> = pickers
            .iter()
            .map(|picker| (picker.id, picker.current_workload_minutes))
            .collect();

        let mut assignments = Vec::new();
        for (zone, picks) in by_zone {
            let estimated_minutes = self.zone_pick_minutes(&picks);
            let Some(picker) = best_picker_for_zone(zone, estimated_minutes, pickers, &workloads)
            else {
                continue;
            };
            if let Some(load) = workloads.get_mut(&picker.id) {
                *load += estimated_minutes;
            }
            assignments.push(ZoneAssignment {
                zone,
                picker_id: picker.id,
                picker_name: picker.name.clone(),
                picks,
                estimated_minutes,
            });
        }
        assignments
    }

    /// Greedy clustering of orders by product overlap: each unclustered
    /// order seeds a cluster and pulls in every later order whose product
    /// set is similar enough.
    #[instrument(skip(self, orders, order_lines), fields(orders = orders.len()))]
    pub fn cluster_similar_orders(
        &self,
        orders: &[OrderSummary],
        order_lines: &[OrderLine],
    ) -> Vec<OrderCluster> {
        let products_by_order: HashMap<Uuid, HashSet<Uuid>> = orders
            .iter()
            .map(|order| {
                (
                    order.id,
                    order_lines
                        .iter()
                        .filter(|line| line.order_id == order.id)
                        .map(|line| line.product_id)
                        .collect(),
                )
            })
            .collect();

        let empty = HashSet::new();
        let mut unassigned: Vec<&OrderSummary> = orders.iter().collect();
        let mut clusters = Vec::new();

        while !unassigned.is_empty() {
            let seed = unassigned.remove(0);
            let seed_products = products_by_order.get(&seed.id).unwrap_or(&empty);

            let mut member_ids = vec![seed.id];
            let mut index = 0;
            while index < unassigned.len() {
                let candidate = unassigned[index];
                let candidate_products = products_by_order.get(&candidate.id).unwrap_or(&empty);
                let overlap = seed_products.intersection(candidate_products).count();
                let denominator = seed_products.len().max(candidate_products.len());
                let similarity_pct = if denominator == 0 {
                    0.0
                } else {
                    overlap as f64 / denominator as f64 * 100.0
                };
                if similarity_pct >= self.config.min_cluster_similarity_pct {
                    member_ids.push(candidate.id);
                    unassigned.remove(index);
                } else {
                    index += 1;
                }
            }

            if member_ids.len() > 1 {
                let mut common_products: Vec<Uuid> = seed_products.iter().copied().collect();
                common_products.sort();
                clusters.push(OrderCluster {
                    cluster_id: Uuid::new_v4(),
                    order_ids: member_ids,
                    common_products,
                });
            }
        }
        clusters
    }

    /// Scores a wave for fragmentation: many lines per order, few zones, and
    /// few distinct locations make a dense, efficient run.
    #[instrument(skip(self, wave, batch_picks), fields(wave = %wave.wave_name))]
    pub fn analyze_wave_efficiency(
        &self,
        wave: &WaveDefinition,
        batch_picks: &[BatchPick],
    ) -> WaveEfficiency {
        let lines_per_order = if wave.order_count == 0 {
            0.0
        } else {
            wave.total_lines as f64 / wave.order_count as f64
        };
        let units_per_line = if wave.total_lines == 0 {
            0.0
        } else {
            wave.total_units as f64 / wave.total_lines as f64
        };
        let unique_locations = batch_picks
            .iter()
            .map(|pick| pick.location_code.as_str())
            .collect::<HashSet<_>>()
            .len();
        let zone_spread = wave.zones.len();

        let estimated_distance_m =
            unique_locations as f64 * METRES_PER_LOCATION + zone_spread as f64 * METRES_PER_ZONE;
        let walking_minutes = estimated_distance_m / WALKING_SPEED_MPS / 60.0;
        let picking_minutes =
            batch_picks.len() as f64 * (self.config.seconds_per_zone_pick / 60.0);
        let estimated_minutes = (walking_minutes
            + picking_minutes
            + wave.order_count as f64 * MINUTES_PER_ORDER_OVERHEAD)
            .ceil() as u32;

        let mut efficiency: i32 = 100;
        if lines_per_order < 5.0 {
            efficiency -= 20;
        }
        if zone_spread > 3 {
            efficiency -= 15;
        }
        if unique_locations > 30 {
            efficiency -= 20;
        }
        if estimated_minutes > 60 {
            efficiency -= 10;
        }
        let efficiency_pct = efficiency.max(0) as u32;

        let recommendation = if efficiency_pct >= 80 {
            "Well optimized wave"
        } else if efficiency_pct >= 60 {
            "Consider reducing zone spread"
        } else {
            "Wave is fragmented; consider splitting"
        };

        WaveEfficiency {
            wave_id: wave.wave_id,
            lines_per_order: round1(lines_per_order),
            units_per_line: round1(units_per_line),
            unique_locations,
            zone_spread,
            estimated_distance_m,
            estimated_minutes,
            efficiency_pct,
            recommendation: recommendation.to_string(),
        }
    }

    fn zone_pick_minutes(&self, picks: &[BatchPick]) -> u32 {
        let pick_seconds = picks.len() as f64 * self.config.seconds_per_zone_pick;
        let split_seconds: f64 = picks
            .iter()
            .map(|pick| pick.orders.len() as f64 * self.config.seconds_per_container_split)
            .sum();
        ((pick_seconds + split_seconds) / 60.0).ceil() as u32
    }
}

fn best_picker_for_zone<'a>(
    zone: Zone,
    estimated_minutes: u32,
    pickers: &'a [Picker],
    workloads: &HashMap<Uuid, u32>,
) -> Option<&'a Picker> {
    let available: Vec<&Picker> = pickers
        .iter()
        .filter(|picker| {
            let load = workloads
                .get(&picker.id)
                .copied()
                .unwrap_or(picker.current_workload_minutes);
            load + estimated_minutes <= picker.max_workload_minutes
        })
        .collect();

    if let Some(picker) = available
        .iter()
        .copied()
        .find(|picker| picker.assigned_zone == Some(zone))
    {
        return Some(picker);
    }

    available
        .iter()
        .copied()
        .filter(|picker| picker.skill_level == PickerSkill::Expert)
        .min_by_key(|picker| workloads.get(&picker.id).copied().unwrap_or(0))
        .or_else(|| available.first().copied())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

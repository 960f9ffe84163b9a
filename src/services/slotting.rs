//! Storage-slot recommendation and slotting analysis.
//!
//! Scores candidate locations against a product's characteristics with an
//! additive point system and recommends where to put stock, which products
//! are mis-slotted, and which slots underperform. All output here is
//! advisory, for a human planner; nothing is moved automatically.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{LocationStatus, ProductProfile, StorageLocation, Velocity, Zone};

/// Walking seconds saved per metre of dispatch distance removed.
const SECONDS_SAVED_PER_METRE: f64 = 0.5;

/// Tunables for location scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlottingConfig {
    /// Items heavier than this stay on the ground level.
    pub heavy_item_kg: f64,
    /// Items lighter than this may go to upper shelves.
    pub light_item_kg: f64,
    /// How many ranked locations to return per product.
    pub max_recommendations: usize,
}

impl Default for SlottingConfig {
    fn default() -> Self {
        Self {
            heavy_item_kg: 20.0,
            light_item_kg: 5.0,
            max_recommendations: 5,
        }
    }
}

/// Ranked storage slot for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredLocation {
    pub location_id: Uuid,
    pub location_code: String,
    pub zone: Zone,
    pub level: u8,
    pub score: f64,
    pub reasons: Vec<String>,
    pub distance_from_dispatch_m: f64,
}

/// Advisory slotting plan for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAssignment {
    pub product_id: Uuid,
    pub sku: String,
    pub recommended_locations: Vec<ScoredLocation>,
    pub primary_location: Option<String>,
    pub overflow_locations: Vec<String>,
}

/// A product's currently observed slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlottingSnapshot {
    pub product_id: Uuid,
    pub sku: String,
    pub current_location_id: Uuid,
    pub velocity: Velocity,
    pub orders_per_day: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SlottingPriority {
    High,
    Medium,
    Low,
}

/// Suggested relocation of a mis-slotted product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlottingRecommendation {
    pub product_id: Uuid,
    pub sku: String,
    pub current_location: String,
    pub recommended_location: String,
    pub reason: String,
    pub estimated_seconds_saved_per_day: f64,
    pub priority: SlottingPriority,
}

/// Observed picking performance for one product/slot pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickingPerformance {
    pub product_id: Uuid,
    pub location_id: Uuid,
    pub average_pick_seconds: f64,
    pub picks_per_day: f64,
    pub error_rate_pct: f64,
}

/// Benchmark assessment of a product's putaway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutawayAssessment {
    pub product_id: Uuid,
    pub current_performance: i32,
    pub benchmark_performance: i32,
    pub improvement_potential: i32,
    pub recommendation: String,
}

/// Recommends storage slots and flags slotting problems.
#[derive(Debug, Clone, Default)]
pub struct SlottingPlanner {
    config: SlottingConfig,
}

impl SlottingPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SlottingConfig) -> Self {
        Self { config }
    }

    /// Scores every accessible, available location against the product and
    /// returns the best matches ranked by score. The first recommendation is
    /// the primary slot, the rest are overflow.
    #[instrument(skip(self, locations), fields(sku = %product.sku))]
    pub fn recommend_storage_location(
        &self,
        product: &ProductProfile,
        locations: &[StorageLocation],
    ) -> LocationAssignment {
        let mut scored: Vec<ScoredLocation> = locations
            .iter()
            .filter(|loc| loc.is_accessible && loc.status == LocationStatus::Available)
            .map(|loc| ScoredLocation {
                location_id: loc.id,
                location_code: loc.code.clone(),
                zone: loc.zone,
                level: loc.level,
                score: round2(self.location_score(product, loc)),
                reasons: self.assignment_reasons(product, loc),
                distance_from_dispatch_m: loc.distance_from_dispatch_m,
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(self.config.max_recommendations);

        LocationAssignment {
            product_id: product.product_id,
            sku: product.sku.clone(),
            primary_location: scored.first().map(|s| s.location_code.clone()),
            overflow_locations: scored
                .iter()
                .skip(1)
                .map(|s| s.location_code.clone())
                .collect(),
            recommended_locations: scored,
        }
    }

    /// Flags fast movers parked away from the front zone and slow movers
    /// wasting prime space, ranked by estimated daily time saved.
    #[instrument(skip(self, slots, locations), fields(products = slots.len()))]
    pub fn optimize_slotting(
        &self,
        slots: &[SlottingSnapshot],
        locations: &[StorageLocation],
    ) -> Vec<SlottingRecommendation> {
        let mut recommendations = Vec::new();

        for slot in slots {
            let Some(current) = locations.iter().find(|l| l.id == slot.current_location_id)
            else {
                continue;
            };

            if slot.velocity == Velocity::Fast && current.zone != Zone::A {
                if let Some(better) = locations
                    .iter()
                    .find(|l| l.zone == Zone::A && usable_for_putaway(l))
                {
                    let seconds_saved = (current.distance_from_dispatch_m
                        - better.distance_from_dispatch_m)
                        * SECONDS_SAVED_PER_METRE;
                    recommendations.push(SlottingRecommendation {
                        product_id: slot.product_id,
                        sku: slot.sku.clone(),
                        current_location: current.code.clone(),
                        recommended_location: better.code.clone(),
                        reason: "Fast-moving product should be in front zone".to_string(),
                        estimated_seconds_saved_per_day: (seconds_saved * slot.orders_per_day)
                            .round(),
                        priority: SlottingPriority::High,
                    });
                }
            }

            if slot.velocity == Velocity::Slow && current.zone == Zone::A {
                if let Some(better) = locations
                    .iter()
                    .find(|l| matches!(l.zone, Zone::C | Zone::D) && usable_for_putaway(l))
                {
                    recommendations.push(SlottingRecommendation {
                        product_id: slot.product_id,
                        sku: slot.sku.clone(),
                        current_location: current.code.clone(),
                        recommended_location: better.code.clone(),
                        reason: "Slow-moving product wasting prime space".to_string(),
                        estimated_seconds_saved_per_day: 0.0,
                        priority: SlottingPriority::Medium,
                    });
                }
            }
        }

        recommendations.sort_by(|a, b| {
            b.estimated_seconds_saved_per_day
                .partial_cmp(&a.estimated_seconds_saved_per_day)
                .unwrap_or(Ordering::Equal)
        });
        recommendations
    }

    /// Scores observed pick times against a velocity-dependent benchmark and
    /// ranks products by improvement potential.
    #[instrument(skip(self, performance))]
    pub fn analyze_putaway_performance(
        &self,
        performance: &[PickingPerformance],
    ) -> Vec<PutawayAssessment> {
        let mut results: Vec<PutawayAssessment> = performance
            .iter()
            .map(|perf| {
                let benchmark_seconds = if perf.picks_per_day > 10.0 { 30.0 } else { 60.0 };
                let current_score = benchmark_seconds / perf.average_pick_seconds * 100.0;
                let improvement = (100.0 - current_score).max(0.0);

                let recommendation = if perf.average_pick_seconds > benchmark_seconds * 1.5 {
                    "Move to faster-access location"
                } else if perf.error_rate_pct > 5.0 {
                    "Improve labeling or consolidate locations"
                } else if current_score > 90.0 {
                    "Well optimized"
                } else {
                    "Monitor performance"
                };

                PutawayAssessment {
                    product_id: perf.product_id,
                    current_performance: current_score.round() as i32,
                    benchmark_performance: 100,
                    improvement_potential: improvement.round() as i32,
                    recommendation: recommendation.to_string(),
                }
            })
            .collect();

        results.sort_by(|a, b| b.improvement_potential.cmp(&a.improvement_potential));
        results
    }

    fn location_score(&self, product: &ProductProfile, location: &StorageLocation) -> f64 {
        let mut score = 100.0;

        // Velocity / zone fit.
        score += match (product.velocity, location.zone) {
            (Velocity::Fast, Zone::A) => 40.0,
            (Velocity::Fast, Zone::B) => 20.0,
            (Velocity::Medium, Zone::B) => 40.0,
            (Velocity::Medium, Zone::A) => 30.0,
            (Velocity::Slow, Zone::C | Zone::D) => 40.0,
            (Velocity::Slow, Zone::B) => 20.0,
            _ => 0.0,
        };

        // Heavy stock stays on the ground; light stock may go up.
        if product.weight_kg > self.config.heavy_item_kg {
            score += if location.level == 1 { 30.0 } else { -20.0 };
        } else if product.weight_kg < self.config.light_item_kg && location.level >= 3 {
            score += 20.0;
        }

        // Proximity to dispatch, scaled by velocity: fast movers are
        // rewarded for being close, slow movers for being far.
        let distance_score = (20.0 - location.distance_from_dispatch_m / 5.0).max(0.0);
        match product.velocity {
            Velocity::Fast => score += distance_score,
            Velocity::Slow => score += 20.0 - distance_score,
            Velocity::Medium => {}
        }

        // Temperature is a hard constraint: a mismatch disqualifies the slot.
        if let Some(required) = product.required_temperature {
            score += if location.temperature == required {
                50.0
            } else {
                -100.0
            };
        }

        // Remaining capacity.
        let available_space = location.capacity_m3 - location.current_occupancy_m3;
        score += if available_space >= product.volume_m3 {
            10.0
        } else {
            -50.0
        };

        if product.is_fragile {
            score += if location.level <= 2 { 15.0 } else { -10.0 };
        }

        if product.is_hazardous {
            score += if location.zone == Zone::D { 30.0 } else { -20.0 };
        }

        score
    }

    fn assignment_reasons(
        &self,
        product: &ProductProfile,
        location: &StorageLocation,
    ) -> Vec<String> {
        let mut reasons = Vec::new();

        match (product.velocity, location.zone) {
            (Velocity::Fast, Zone::A) => {
                reasons.push("Fast-moving product in front zone".to_string());
            }
            (Velocity::Slow, Zone::C | Zone::D) => {
                reasons.push("Slow-moving product in back zone".to_string());
            }
            _ => {}
        }

        if product.weight_kg > self.config.heavy_item_kg && location.level == 1 {
            reasons.push("Heavy item on ground level".to_string());
        } else if product.weight_kg < self.config.light_item_kg && location.level >= 3 {
            reasons.push("Light item on upper shelf".to_string());
        }

        if location.distance_from_dispatch_m < 20.0 && product.velocity == Velocity::Fast {
            reasons.push("Close to dispatch area".to_string());
        }

        if product.required_temperature == Some(location.temperature) {
            reasons.push(format!(
                "Correct temperature zone ({})",
                location.temperature
            ));
        }

        if location.capacity_m3 - location.current_occupancy_m3 >= product.volume_m3 * 2.0 {
            reasons.push("Ample storage space".to_string());
        }

        if product.is_fragile && location.level <= 2 {
            reasons.push("Low level for fragile items".to_string());
        }

        if product.is_hazardous && location.zone == Zone::D {
            reasons.push("Isolated zone for hazardous materials".to_string());
        }

        reasons
    }
}

fn usable_for_putaway(location: &StorageLocation) -> bool {
    location.status == LocationStatus::Available && location.is_accessible
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

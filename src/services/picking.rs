//! Single-order pick-list generation and pre-commit validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use validator::Validate;

use crate::errors::AllocationError;
use crate::models::{
    InventoryLot, LotStatus, OrderType, PickDemand, PickLine, PickListValidation, PickResult,
};
use crate::services::lot_selector;

/// Tunables for pick-list generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickingConfig {
    /// Picked lots expiring within this many days of the pick date are
    /// called out in the result warnings.
    pub expiry_warning_days: i64,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            expiry_warning_days: 30,
        }
    }
}

/// Generates and validates pick lists against caller-supplied snapshots.
#[derive(Debug, Clone, Default)]
pub struct PickingService {
    config: PickingConfig,
}

impl PickingService {
    /// Creates a picking service with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a picking service with custom configuration.
    pub fn with_config(config: PickingConfig) -> Self {
        Self { config }
    }

    /// Decides which lots, from which locations, in what order satisfy
    /// `demand`.
    ///
    /// `as_of` is the pick date used for expiry checks; the engine never
    /// reads a clock of its own. A shortfall is a normal outcome reported in
    /// the result, not an error; errors indicate a malformed demand or
    /// snapshot.
    #[instrument(
        skip(self, lots),
        fields(product_id = %demand.product_id, quantity = demand.quantity_needed)
    )]
    pub fn generate_pick_list(
        &self,
        lots: &[InventoryLot],
        demand: &PickDemand,
        as_of: NaiveDate,
    ) -> Result<PickResult, AllocationError> {
        demand
            .validate()
            .map_err(|e| AllocationError::ValidationError(e.to_string()))?;
        lot_selector::validate_snapshot(lots)?;

        let mut warnings = Vec::new();
        let mut candidates = lot_selector::eligible_lots(lots, demand.product_id);

        if let Some(warehouse_id) = demand.preferred_warehouse_id {
            let in_preferred: Vec<&InventoryLot> = candidates
                .iter()
                .copied()
                .filter(|lot| lot.warehouse_id == warehouse_id)
                .collect();
            if in_preferred.is_empty() {
                warnings.push(format!(
                    "Preferred warehouse {} has no available inventory; using other warehouses",
                    warehouse_id
                ));
            } else {
                let excluded = candidates.len() - in_preferred.len();
                if excluded > 0 {
                    warnings.push(format!(
                        "Restricting to preferred warehouse {} excludes {} eligible lot(s) in other warehouses",
                        warehouse_id, excluded
                    ));
                }
                candidates = in_preferred;
            }
        }

        if candidates.is_empty() {
            debug!("no available inventory");
            return Ok(PickResult {
                success: false,
                pick_list: Vec::new(),
                total_picked: 0,
                shortfall: demand.quantity_needed,
                warnings: vec!["No available inventory for this product".to_string()],
            });
        }

        lot_selector::sort_for_picking(&mut candidates, demand.order_type);

        let mut pick_list: Vec<PickLine> = Vec::new();
        let mut remaining = demand.quantity_needed;

        // Wholesale orders ship cleanest from one lot; fall back to the
        // multi-lot walk only when no single lot can cover the demand.
        let mut consolidated = false;
        if demand.order_type == OrderType::Wholesale {
            if let Some(lot) = candidates
                .iter()
                .find(|lot| lot.quantity_available >= remaining)
            {
                pick_list.push(pick_line(lot, remaining, 1));
                remaining = 0;
                consolidated = true;
            } else {
                warnings.push(
                    "Wholesale order cannot be fulfilled from a single lot; using multiple lots"
                        .to_string(),
                );
            }
        }

        if !consolidated {
            let mut sequence = 1u32;
            for lot in &candidates {
                if remaining == 0 {
                    break;
                }
                let quantity = lot.quantity_available.min(remaining);
                pick_list.push(pick_line(lot, quantity, sequence));
                sequence += 1;
                remaining -= quantity;
            }
        }

        let expiring = pick_list
            .iter()
            .filter(|line| {
                line.best_before_date
                    .map(|date| self.is_expiring(date, as_of))
                    .unwrap_or(false)
            })
            .count();
        if expiring > 0 {
            warnings.push(format!(
                "{} picked lot(s) expire within {} days",
                expiring, self.config.expiry_warning_days
            ));
        }

        let total_picked = demand.quantity_needed - remaining;
        let success = remaining == 0;
        if !success {
            warn!(
                requested = demand.quantity_needed,
                picked = total_picked,
                "pick shortfall"
            );
            warnings.push(format!(
                "Insufficient inventory: need {}, picked {}",
                demand.quantity_needed, total_picked
            ));
        }

        Ok(PickResult {
            success,
            pick_list,
            total_picked,
            shortfall: remaining,
            warnings,
        })
    }

    /// Re-checks a finalized pick list against a fresh snapshot before
    /// commit. Reports discrepancies instead of failing: the caller decides
    /// whether to retry allocation against the new snapshot.
    #[instrument(skip(self, pick_list, lots), fields(lines = pick_list.len()))]
    pub fn validate_pick_list(
        &self,
        pick_list: &[PickLine],
        lots: &[InventoryLot],
        as_of: NaiveDate,
    ) -> PickListValidation {
        let mut discrepancies = Vec::new();

        for line in pick_list {
            let Some(lot) = lots.iter().find(|lot| lot.id == line.inventory_lot_id) else {
                discrepancies.push(format!(
                    "Lot {} no longer exists in the snapshot",
                    line.inventory_lot_id
                ));
                continue;
            };

            if lot.quantity_available < line.quantity_to_pick {
                discrepancies.push(format!(
                    "Insufficient quantity at {}: need {}, available {}",
                    line.location_code, line.quantity_to_pick, lot.quantity_available
                ));
            }
            if lot.status != LotStatus::Available {
                discrepancies.push(format!(
                    "Inventory at {} is {}, not {}",
                    line.location_code,
                    lot.status,
                    LotStatus::Available
                ));
            }
            if let Some(best_before) = lot.best_before_date {
                if best_before < as_of {
                    discrepancies.push(format!(
                        "Lot at {} expired on {}",
                        line.location_code, best_before
                    ));
                }
            }
        }

        PickListValidation {
            valid: discrepancies.is_empty(),
            discrepancies,
        }
    }

    /// Within the warning window, today inclusive; already-expired dates do
    /// not count as "expiring".
    fn is_expiring(&self, best_before: NaiveDate, as_of: NaiveDate) -> bool {
        let days = best_before.signed_duration_since(as_of).num_days();
        (0..=self.config.expiry_warning_days).contains(&days)
    }
}

fn pick_line(lot: &InventoryLot, quantity: i32, sequence: u32) -> PickLine {
    PickLine {
        inventory_lot_id: lot.id,
        product_id: lot.product_id,
        quantity_to_pick: quantity,
        location_code: lot.location_code.clone(),
        warehouse_name: lot.warehouse_name.clone(),
        lot_number: lot.lot_number.clone(),
        best_before_date: lot.best_before_date,
        sequence,
    }
}

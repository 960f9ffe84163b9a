//! Inventory health analytics: ABC classification, reorder advice, demand
//! forecasting, turnover, valuation, and slow-mover detection.
//!
//! Pure reporting over caller-supplied aggregates; nothing here feeds back
//! into allocation decisions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AllocationError;

/// Aggregated sales and stock figures for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    pub product_id: Uuid,
    pub sku: String,
    pub total_quantity: i32,
    pub available_quantity: i32,
    pub reserved_quantity: i32,
    pub average_daily_sales: f64,
    pub lead_time_days: i32,
    pub unit_cost: Decimal,
    pub annual_revenue: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum AbcClass {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ReviewFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum StockingPriority {
    High,
    Medium,
    Low,
}

/// One product's position in the revenue Pareto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcClassification {
    pub product_id: Uuid,
    pub sku: String,
    pub class: AbcClass,
    pub annual_revenue: Decimal,
    pub percentage_of_total: Decimal,
    pub cumulative_percentage: Decimal,
    pub review_frequency: ReviewFrequency,
    pub stocking_priority: StockingPriority,
}

/// Classifies products by revenue contribution (Pareto): the top band
/// producing 80% of revenue is class A, the next 15% is B, the tail is C.
#[instrument(skip(products), fields(products = products.len()))]
pub fn perform_abc_analysis(products: &[ProductStats]) -> Vec<AbcClassification> {
    let mut sorted: Vec<&ProductStats> = products.iter().collect();
    sorted.sort_by(|a, b| b.annual_revenue.cmp(&a.annual_revenue));

    let total: Decimal = sorted.iter().map(|p| p.annual_revenue).sum();

    let mut cumulative = Decimal::ZERO;
    sorted
        .into_iter()
        .map(|product| {
            cumulative += product.annual_revenue;
            let (share, cumulative_share) = if total == Decimal::ZERO {
                (Decimal::ZERO, Decimal::ZERO)
            } else {
                (
                    product.annual_revenue / total * dec!(100),
                    cumulative / total * dec!(100),
                )
            };

            let (class, review_frequency, stocking_priority) = if cumulative_share <= dec!(80) {
                (AbcClass::A, ReviewFrequency::Daily, StockingPriority::High)
            } else if cumulative_share <= dec!(95) {
                (AbcClass::B, ReviewFrequency::Weekly, StockingPriority::Medium)
            } else {
                (AbcClass::C, ReviewFrequency::Monthly, StockingPriority::Low)
            };

            AbcClassification {
                product_id: product.product_id,
                sku: product.sku.clone(),
                class,
                annual_revenue: product.annual_revenue,
                percentage_of_total: share.round_dp(2),
                cumulative_percentage: cumulative_share.round_dp(2),
                review_frequency,
                stocking_priority,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ReorderUrgency {
    Critical,
    High,
    Medium,
    Low,
    Ok,
}

/// When and how much to reorder for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderAdvice {
    pub product_id: Uuid,
    pub sku: String,
    pub current_stock: i32,
    pub reorder_point: i32,
    pub reorder_quantity: i32,
    pub safety_stock: i32,
    pub max_stock: i32,
    pub days_of_stock_remaining: i32,
    pub should_reorder: bool,
    pub urgency: ReorderUrgency,
}

/// Reorder point = lead-time demand plus a 30% safety buffer; the reorder
/// quantity covers 30 days of average sales.
#[instrument(skip(product), fields(sku = %product.sku))]
pub fn calculate_reorder_point(product: &ProductStats) -> ReorderAdvice {
    let lead_time_demand = product.average_daily_sales * product.lead_time_days as f64;
    let safety_stock = (lead_time_demand * 0.3).ceil() as i32;
    let reorder_point = (lead_time_demand + safety_stock as f64).ceil() as i32;
    let reorder_quantity = (product.average_daily_sales * 30.0).ceil() as i32;
    let max_stock = reorder_point + reorder_quantity;

    let days_of_stock_remaining = if product.average_daily_sales > 0.0 {
        (product.total_quantity as f64 / product.average_daily_sales).floor() as i32
    } else {
        999
    };

    let stock = product.total_quantity;
    let urgency = if stock <= safety_stock {
        ReorderUrgency::Critical
    } else if stock <= reorder_point {
        ReorderUrgency::High
    } else if stock as f64 <= reorder_point as f64 * 1.5 {
        ReorderUrgency::Medium
    } else if stock as f64 <= max_stock as f64 * 0.8 {
        ReorderUrgency::Low
    } else {
        ReorderUrgency::Ok
    };

    ReorderAdvice {
        product_id: product.product_id,
        sku: product.sku.clone(),
        current_stock: stock,
        reorder_point,
        reorder_quantity,
        safety_stock,
        max_stock,
        days_of_stock_remaining,
        should_reorder: stock <= reorder_point,
        urgency,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ForecastMethod {
    Sma,
    Ema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum DemandTrend {
    Increasing,
    Stable,
    Decreasing,
}

/// One day of observed sales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub quantity: i32,
}

/// Projected demand for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub product_id: Uuid,
    pub method: ForecastMethod,
    pub next_7_days: i32,
    pub next_30_days: i32,
    pub next_90_days: i32,
    pub confidence_pct: f64,
    pub trend: DemandTrend,
}

/// Projects demand from sales history with a simple or exponential moving
/// average, scaled by the observed first-half / second-half trend. Fewer
/// than seven observations yield a zero forecast.
#[instrument(skip(history), fields(points = history.len()))]
pub fn forecast_demand(
    product_id: Uuid,
    history: &[SalesPoint],
    method: ForecastMethod,
) -> DemandForecast {
    if history.len() < 7 {
        return DemandForecast {
            product_id,
            method,
            next_7_days: 0,
            next_30_days: 0,
            next_90_days: 0,
            confidence_pct: 0.0,
            trend: DemandTrend::Stable,
        };
    }

    let mut sorted: Vec<&SalesPoint> = history.iter().collect();
    sorted.sort_by_key(|point| point.date);

    let daily_average = match method {
        ForecastMethod::Sma => {
            let recent = &sorted[sorted.len().saturating_sub(30)..];
            recent.iter().map(|p| p.quantity as f64).sum::<f64>() / recent.len() as f64
        }
        ForecastMethod::Ema => {
            // More weight on recent observations.
            let alpha = 0.3;
            let mut ema = sorted[0].quantity as f64;
            for point in &sorted[1..] {
                ema = alpha * point.quantity as f64 + (1.0 - alpha) * ema;
            }
            ema
        }
    };

    let half = sorted.len() / 2;
    let first_avg =
        sorted[..half].iter().map(|p| p.quantity as f64).sum::<f64>() / half as f64;
    let second_avg = sorted[half..].iter().map(|p| p.quantity as f64).sum::<f64>()
        / (sorted.len() - half) as f64;

    let trend = if second_avg > first_avg * 1.1 {
        DemandTrend::Increasing
    } else if second_avg < first_avg * 0.9 {
        DemandTrend::Decreasing
    } else {
        DemandTrend::Stable
    };
    let trend_factor = match trend {
        DemandTrend::Increasing => 1.1,
        DemandTrend::Decreasing => 0.9,
        DemandTrend::Stable => 1.0,
    };

    DemandForecast {
        product_id,
        method,
        next_7_days: (daily_average * 7.0 * trend_factor).ceil() as i32,
        next_30_days: (daily_average * 30.0 * trend_factor).ceil() as i32,
        next_90_days: (daily_average * 90.0 * trend_factor).ceil() as i32,
        confidence_pct: (history.len() as f64 / 30.0).min(1.0) * 100.0,
        trend,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TurnoverRating {
    Excellent,
    Good,
    Average,
    Poor,
}

/// How often inventory turns over per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverReport {
    pub turnover_rate: f64,
    pub days_in_inventory: i32,
    pub rating: TurnoverRating,
}

/// Annual sales divided by average inventory; healthy ranges vary by
/// industry, the bands here suit general merchandise.
pub fn calculate_stock_turnover(annual_sales: f64, average_inventory: f64) -> TurnoverReport {
    let rate = if average_inventory > 0.0 {
        annual_sales / average_inventory
    } else {
        0.0
    };
    let days_in_inventory = if rate > 0.0 {
        (365.0 / rate).round() as i32
    } else {
        365
    };
    let rating = if rate >= 8.0 {
        TurnoverRating::Excellent
    } else if rate >= 4.0 {
        TurnoverRating::Good
    } else if rate >= 2.0 {
        TurnoverRating::Average
    } else {
        TurnoverRating::Poor
    };

    TurnoverReport {
        turnover_rate: (rate * 100.0).round() / 100.0,
        days_in_inventory,
        rating,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationMethod {
    Fifo,
    WeightedAverage,
}

/// A costed receipt batch for valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLot {
    pub lot_number: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub received_on: NaiveDate,
}

/// One lot's contribution to the valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotValue {
    pub lot_number: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub value: Decimal,
}

/// Monetary value of a product's stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockValuation {
    pub product_id: Uuid,
    pub sku: String,
    pub method: ValuationMethod,
    pub total_quantity: i32,
    pub average_cost: Decimal,
    pub total_value: Decimal,
    pub lots: Vec<LotValue>,
}

/// Values stock either FIFO (lots listed newest receipt first) or at the
/// weighted average cost. Totals are identical either way; only the lot
/// ordering differs.
#[instrument(skip(sku, lots), fields(sku = %sku, lots = lots.len()))]
pub fn calculate_stock_valuation(
    product_id: Uuid,
    sku: &str,
    lots: &[CostLot],
    method: ValuationMethod,
) -> StockValuation {
    let mut priced: Vec<&CostLot> = lots.iter().collect();
    if method == ValuationMethod::Fifo {
        priced.sort_by(|a, b| b.received_on.cmp(&a.received_on));
    }

    let total_quantity: i32 = priced.iter().map(|lot| lot.quantity).sum();
    let total_value: Decimal = priced
        .iter()
        .map(|lot| Decimal::from(lot.quantity) * lot.unit_cost)
        .sum();
    let average_cost = if total_quantity > 0 {
        (total_value / Decimal::from(total_quantity)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    StockValuation {
        product_id,
        sku: sku.to_string(),
        method,
        total_quantity,
        average_cost,
        total_value: total_value.round_dp(2),
        lots: priced
            .into_iter()
            .map(|lot| LotValue {
                lot_number: lot.lot_number.clone(),
                quantity: lot.quantity,
                unit_cost: lot.unit_cost,
                value: (Decimal::from(lot.quantity) * lot.unit_cost).round_dp(2),
            })
            .collect(),
    }
}

/// A product selling below the slow-mover threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowMovingItem {
    pub product_id: Uuid,
    pub sku: String,
    pub current_stock: i32,
    pub sales_last_90_days: i32,
    pub stock_value: Decimal,
    pub days_of_stock_remaining: i32,
    pub recommendation: String,
}

/// Finds products selling fewer than `monthly_threshold` units per month
/// while still holding stock, ranked by the capital tied up in them.
#[instrument(skip(products), fields(products = products.len()))]
pub fn identify_slow_moving_items(
    products: &[ProductStats],
    monthly_threshold: f64,
) -> Vec<SlowMovingItem> {
    let mut slow_movers: Vec<SlowMovingItem> = products
        .iter()
        .filter_map(|product| {
            let sales_per_month = product.average_daily_sales * 30.0;
            if sales_per_month >= monthly_threshold || product.total_quantity <= 0 {
                return None;
            }

            let days_remaining = if product.average_daily_sales > 0.0 {
                (product.total_quantity as f64 / product.average_daily_sales).floor() as i32
            } else {
                999
            };
            let recommendation = if days_remaining > 365 {
                "Consider clearance sale or discontinue"
            } else if days_remaining > 180 {
                "Reduce reorder quantity"
            } else {
                "Monitor closely"
            };

            Some(SlowMovingItem {
                product_id: product.product_id,
                sku: product.sku.clone(),
                current_stock: product.total_quantity,
                sales_last_90_days: (product.average_daily_sales * 90.0).round() as i32,
                stock_value: (Decimal::from(product.total_quantity) * product.unit_cost)
                    .round_dp(2),
                days_of_stock_remaining: days_remaining,
                recommendation: recommendation.to_string(),
            })
        })
        .collect();

    slow_movers.sort_by(|a, b| b.stock_value.cmp(&a.stock_value));
    slow_movers
}

/// Economic order quantity outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EoqReport {
    pub economic_order_quantity: i32,
    pub orders_per_year: i32,
    pub days_between_orders: i32,
    pub annual_total_cost: f64,
}

/// Classic EOQ: √(2 × annual demand × order cost / holding cost per unit).
pub fn calculate_eoq(
    annual_demand: f64,
    order_cost: f64,
    holding_cost_per_unit: f64,
) -> Result<EoqReport, AllocationError> {
    if annual_demand <= 0.0 || order_cost <= 0.0 || holding_cost_per_unit <= 0.0 {
        return Err(AllocationError::InvalidInput(
            "EOQ inputs must all be positive".to_string(),
        ));
    }

    let eoq = ((2.0 * annual_demand * order_cost) / holding_cost_per_unit)
        .sqrt()
        .ceil();
    let orders_per_year = (annual_demand / eoq).ceil();
    let days_between_orders = (365.0 / orders_per_year).floor() as i32;
    let annual_total_cost =
        (annual_demand / eoq) * order_cost + (eoq / 2.0) * holding_cost_per_unit;

    Ok(EoqReport {
        economic_order_quantity: eoq as i32,
        orders_per_year: orders_per_year as i32,
        days_between_orders,
        annual_total_cost: (annual_total_cost * 100.0).round() / 100.0,
    })
}

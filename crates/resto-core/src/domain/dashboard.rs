//! Per-restaurant dashboard figures

use serde::Serialize;
use uuid::Uuid;

use super::order::OrderStats;
use super::plan::{Plan, PlanLimits};

#[derive(Debug, Clone, Serialize)]
pub struct PlanUsage {
    pub plan: Plan,
    pub limits: PlanLimits,
    pub branches_used: i64,
    pub menu_items_used: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantDashboard {
    pub restaurant_id: Uuid,
    pub branch_count: i64,
    pub menu_count: i64,
    pub item_count: i64,
    pub orders: OrderStats,
    pub plan: PlanUsage,
}

// ============================================================================
// Resto Core - Subscription Plans
// File: crates/resto-core/src/domain/plan.rs
// Description: Plan catalogue, billing cycles and resource limits
// ============================================================================

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Subscription plan enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Basic,
    Pro,
    Enterprise,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Basic, Plan::Pro, Plan::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Basic => "basic",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(Plan::Basic),
            "pro" => Some(Plan::Pro),
            "enterprise" => Some(Plan::Enterprise),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Basic => "Basic",
            Plan::Pro => "Pro",
            Plan::Enterprise => "Enterprise",
        }
    }

    pub fn monthly_price_cents(&self) -> i64 {
        match self {
            Plan::Basic => 1_900,
            Plan::Pro => 4_900,
            Plan::Enterprise => 9_900,
        }
    }

    /// Yearly billing is charged as ten months
    pub fn price_cents(&self, cycle: BillingCycle) -> i64 {
        match cycle {
            BillingCycle::Monthly => self.monthly_price_cents(),
            BillingCycle::Yearly => self.monthly_price_cents() * 10,
        }
    }

    pub fn limits(&self) -> PlanLimits {
        match self {
            Plan::Basic => PlanLimits { max_branches: Some(1), max_menu_items: Some(100) },
            Plan::Pro => PlanLimits { max_branches: Some(5), max_menu_items: Some(1_000) },
            Plan::Enterprise => PlanLimits { max_branches: None, max_menu_items: None },
        }
    }

    pub fn features(&self) -> &'static [&'static str] {
        match self {
            Plan::Basic => &["1 branch", "Up to 100 menu items", "WhatsApp ordering", "Custom theme"],
            Plan::Pro => &["Up to 5 branches", "Up to 1000 menu items", "WhatsApp ordering", "Custom theme", "Order dashboard"],
            Plan::Enterprise => &["Unlimited branches", "Unlimited menu items", "WhatsApp ordering", "Custom theme", "Order dashboard", "Priority support"],
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Plan::Basic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(BillingCycle::Monthly),
            "yearly" => Some(BillingCycle::Yearly),
            _ => None,
        }
    }

    pub fn period(&self) -> Duration {
        match self {
            BillingCycle::Monthly => Duration::days(30),
            BillingCycle::Yearly => Duration::days(365),
        }
    }
}

impl Default for BillingCycle {
    fn default() -> Self {
        BillingCycle::Monthly
    }
}

/// `None` means unlimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanLimits {
    pub max_branches: Option<i64>,
    pub max_menu_items: Option<i64>,
}

impl PlanLimits {
    pub fn allows_branch(&self, current: i64) -> bool {
        self.max_branches.map_or(true, |max| current < max)
    }

    pub fn allows_menu_item(&self, current: i64) -> bool {
        self.max_menu_items.map_or(true, |max| current < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yearly_is_ten_months() {
        assert_eq!(Plan::Pro.price_cents(BillingCycle::Yearly), 49_000);
        assert_eq!(Plan::Basic.price_cents(BillingCycle::Monthly), 1_900);
    }

    #[test]
    fn test_limits() {
        let basic = Plan::Basic.limits();
        assert!(basic.allows_branch(0));
        assert!(!basic.allows_branch(1));
        assert!(basic.allows_menu_item(99));
        assert!(!basic.allows_menu_item(100));

        let enterprise = Plan::Enterprise.limits();
        assert!(enterprise.allows_branch(10_000));
    }

    #[test]
    fn test_round_trip_names() {
        for plan in Plan::ALL {
            assert_eq!(Plan::from_str(plan.as_str()), Some(plan));
        }
        assert_eq!(Plan::from_str("gold"), None);
    }
}

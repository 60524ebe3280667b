// ============================================================================
// Resto Core - Restaurant Entity
// File: crates/resto-core/src/domain/restaurant.rs
// Description: Restaurant tenant with subscription state
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::plan::{BillingCycle, Plan};

/// Restaurant entity (tenant root)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Restaurant {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Restaurant name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 100, message = "Slug must be between 2 and 100 characters"))]
    pub slug: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub phone: Option<String>,

    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,

    #[validate(length(max = 2048, message = "Logo URL too long"))]
    pub logo_url: Option<String>,

    #[validate(length(max = 500, message = "Address too long"))]
    pub address: Option<String>,

    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: String,

    pub plan: Plan,
    pub billing_cycle: BillingCycle,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl Restaurant {
    pub fn new(
        name: String,
        slug: String,
        phone: Option<String>,
        email: Option<String>,
        currency: String,
        plan: Plan,
        billing_cycle: BillingCycle,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let restaurant = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            slug: slug.trim().to_lowercase(),
            description: None,
            phone,
            email: email.map(|e| e.trim().to_lowercase()),
            logo_url: None,
            address: None,
            currency: currency.trim().to_uppercase(),
            plan,
            billing_cycle,
            subscription_expires_at: Some(now + billing_cycle.period()),
            is_active: true,
            created_at: now,
            modified_at: None,
            removed_at: None,
        };

        restaurant.validate()?;
        Ok(restaurant)
    }

    pub fn is_subscription_active(&self) -> bool {
        match self.subscription_expires_at {
            Some(expires_at) => expires_at > Utc::now(),
            None => true,
        }
    }

    /// Open to the public: active, not deleted, subscription current
    pub fn is_open(&self) -> bool {
        self.is_active && !self.is_deleted() && self.is_subscription_active()
    }

    /// Switch plan and restart the billing period from now
    pub fn change_plan(&mut self, plan: Plan, cycle: BillingCycle) {
        let now = Utc::now();
        self.plan = plan;
        self.billing_cycle = cycle;
        self.subscription_expires_at = Some(now + cycle.period());
        self.modified_at = Some(now);
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.modified_at = Some(Utc::now());
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}

/// Partial update of the restaurant profile; slug is immutable
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantProfileUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
    pub address: Option<String>,
    pub currency: Option<String>,
}

impl RestaurantProfileUpdate {
    pub fn apply(self, restaurant: &mut Restaurant) -> Result<(), validator::ValidationErrors> {
        if let Some(name) = self.name {
            restaurant.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            restaurant.description = non_empty(description);
        }
        if let Some(phone) = self.phone {
            restaurant.phone = non_empty(phone);
        }
        if let Some(email) = self.email {
            restaurant.email = non_empty(email.to_lowercase());
        }
        if let Some(logo_url) = self.logo_url {
            restaurant.logo_url = non_empty(logo_url);
        }
        if let Some(address) = self.address {
            restaurant.address = non_empty(address);
        }
        if let Some(currency) = self.currency {
            restaurant.currency = currency.trim().to_uppercase();
        }
        restaurant.modified_at = Some(Utc::now());
        restaurant.validate()
    }
}

/// Trim and map blank strings to `None`
pub(crate) fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Root-admin listing row
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantSummary {
    pub restaurant: Restaurant,
    pub branch_count: i64,
    pub order_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub total_restaurants: i64,
    pub active_restaurants: i64,
    pub orders_today: i64,
    pub delivered_revenue_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Restaurant {
        Restaurant::new(
            "  Warung Sate ".to_string(),
            "warung-sate".to_string(),
            Some("628123456789".to_string()),
            Some("Owner@Example.com".to_string()),
            "idr".to_string(),
            Plan::Basic,
            BillingCycle::Monthly,
        )
        .unwrap()
    }

    #[test]
    fn test_create_restaurant_normalizes() {
        let r = sample();
        assert_eq!(r.name, "Warung Sate");
        assert_eq!(r.currency, "IDR");
        assert_eq!(r.email.as_deref(), Some("owner@example.com"));
        assert!(r.is_open());
    }

    #[test]
    fn test_invalid_currency_rejected() {
        let r = Restaurant::new(
            "Name".to_string(),
            "name".to_string(),
            None,
            None,
            "dollars".to_string(),
            Plan::Basic,
            BillingCycle::Monthly,
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_expired_subscription_closes_restaurant() {
        let mut r = sample();
        r.subscription_expires_at = Some(Utc::now() - chrono::Duration::days(1));
        assert!(!r.is_open());

        r.change_plan(Plan::Pro, BillingCycle::Yearly);
        assert!(r.is_open());
        assert_eq!(r.plan, Plan::Pro);
    }

    #[test]
    fn test_profile_update_blank_clears() {
        let mut r = sample();
        let update = RestaurantProfileUpdate {
            phone: Some("   ".to_string()),
            address: Some("Jl. Sudirman 1".to_string()),
            ..Default::default()
        };
        update.apply(&mut r).unwrap();
        assert_eq!(r.phone, None);
        assert_eq!(r.address.as_deref(), Some("Jl. Sudirman 1"));
    }
}

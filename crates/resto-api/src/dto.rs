// ============================================================================
// Resto API - Request / Response DTOs
// File: crates/resto-api/src/dto.rs
// ============================================================================

use chrono::{DateTime, Utc};
use resto_core::services::RegistrationCompleted;
use resto_core::{
    AdminUser, BillingCycle, OrderFilter, OrderStatus, PaymentReceipt, Plan, Restaurant, RestaurantQuery, UserRole,
};
use resto_security::IssuedToken;
use resto_shared::Pagination;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin account as exposed over HTTP
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub restaurant_id: Option<Uuid>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&AdminUser> for UserDto {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            restaurant_id: user.restaurant_id,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

/// Returned on login and on completed registration; the token is also set as a cookie
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserDto,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionResponse {
    pub fn new(user: &AdminUser, session: &IssuedToken) -> Self {
        Self {
            user: UserDto::from(user),
            token: session.token.clone(),
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct RevokedSessions {
    pub revoked: u64,
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct RegistrationCompletedResponse {
    pub restaurant: Restaurant,
    pub receipt: PaymentReceipt,
    #[serde(flatten)]
    pub session: SessionResponse,
}

impl From<&RegistrationCompleted> for RegistrationCompletedResponse {
    fn from(done: &RegistrationCompleted) -> Self {
        Self {
            restaurant: done.restaurant.clone(),
            receipt: done.receipt.clone(),
            session: SessionResponse::new(&done.user, &done.session),
        }
    }
}

// ---------------------------------------------------------------------------
// Toggles and ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PlanChangeRequest {
    pub plan: Plan,
    pub billing_cycle: BillingCycle,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PublicMenuQuery {
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RestaurantListQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl RestaurantListQuery {
    pub fn split(self) -> (RestaurantQuery, Pagination) {
        let pagination = pagination(self.page, self.per_page);
        (RestaurantQuery { search: self.search, is_active: self.is_active }, pagination)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub branch_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl OrderListQuery {
    pub fn split(self) -> (OrderFilter, Pagination) {
        let pagination = pagination(self.page, self.per_page);
        let filter = OrderFilter {
            branch_id: self.branch_id,
            status: self.status,
            from: self.from,
            to: self.to,
        };
        (filter, pagination)
    }
}

fn pagination(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    let defaults = Pagination::default();
    Pagination {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
    }
    .normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_query_defaults_pagination() {
        let (filter, pagination) = OrderListQuery::default().split();
        assert!(filter.status.is_none());
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, Pagination::default().per_page);
    }

    #[test]
    fn order_query_clamps_page_size() {
        let query = OrderListQuery { page: Some(0), per_page: Some(10_000), ..Default::default() };
        let (_, pagination) = query.split();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, resto_shared::constants::MAX_PAGE_SIZE);
    }

    #[test]
    fn login_remember_defaults_to_false() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"owner","password":"secret"}"#).unwrap();
        assert!(!req.remember);
    }
}

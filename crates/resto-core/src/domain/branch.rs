// ============================================================================
// Resto Core - Branch Entity
// File: crates/resto-core/src/domain/branch.rs
// Description: Physical restaurant location; one main branch per restaurant
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::restaurant::non_empty;

/// Branch entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Branch {
    pub id: Uuid,
    pub restaurant_id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Branch name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Address too long"))]
    pub address: Option<String>,

    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,

    pub is_main: bool,
    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

/// Editable branch fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchInput {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Branch {
    pub fn new(restaurant_id: Uuid, input: BranchInput, is_main: bool) -> Result<Self, validator::ValidationErrors> {
        let mut branch = Self {
            id: Uuid::new_v4(),
            restaurant_id,
            name: String::new(),
            address: None,
            phone: None,
            whatsapp_number: None,
            is_main,
            is_active: true,
            created_at: Utc::now(),
            modified_at: None,
            removed_at: None,
        };
        branch.assign(input);
        // A main branch is always active
        branch.is_active = branch.is_active || is_main;

        branch.validate()?;
        Ok(branch)
    }

    pub fn update(&mut self, input: BranchInput) -> Result<(), validator::ValidationErrors> {
        self.assign(input);
        self.modified_at = Some(Utc::now());
        self.validate()
    }

    fn assign(&mut self, input: BranchInput) {
        self.name = input.name.trim().to_string();
        self.address = input.address.and_then(non_empty);
        self.phone = input.phone.and_then(non_empty);
        self.whatsapp_number = input.whatsapp_number.and_then(non_empty);
        self.is_active = input.is_active;
    }

    /// Number used for WhatsApp hand-off: dedicated WhatsApp number, else phone
    pub fn contact_number(&self) -> Option<&str> {
        self.whatsapp_number.as_deref().or(self.phone.as_deref())
    }

    pub fn soft_delete(&mut self) {
        self.removed_at = Some(Utc::now());
        self.is_active = false;
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> BranchInput {
        BranchInput {
            name: name.to_string(),
            address: Some("  ".to_string()),
            phone: Some("021-555-0101".to_string()),
            whatsapp_number: None,
            is_active: true,
        }
    }

    #[test]
    fn test_create_branch() {
        let b = Branch::new(Uuid::new_v4(), input(" Downtown "), true).unwrap();
        assert_eq!(b.name, "Downtown");
        assert_eq!(b.address, None);
        assert!(b.is_main);
    }

    #[test]
    fn test_main_branch_forced_active() {
        let mut i = input("Main");
        i.is_active = false;
        let b = Branch::new(Uuid::new_v4(), i, true).unwrap();
        assert!(b.is_active);
    }

    #[test]
    fn test_contact_number_prefers_whatsapp() {
        let mut b = Branch::new(Uuid::new_v4(), input("Mall"), false).unwrap();
        assert_eq!(b.contact_number(), Some("021-555-0101"));
        b.whatsapp_number = Some("+62 811 000".to_string());
        assert_eq!(b.contact_number(), Some("+62 811 000"));
    }

    #[test]
    fn test_short_name_rejected() {
        assert!(Branch::new(Uuid::new_v4(), input("X"), false).is_err());
    }
}

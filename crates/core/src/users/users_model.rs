//! User and customer profile domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::access::Role;
use crate::errors::Result;
use crate::validation::Validator;

/// An account that can authenticate. The password hash never leaves the
/// storage and auth layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub organization_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A user together with the stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub organization_id: Option<String>,
}

fn default_role() -> Role {
    Role::Customer
}

pub const MIN_PASSWORD_LENGTH: usize = 8;

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("name", &self.name).max_len("name", &self.name, 255);
        v.required("email", &self.email)
            .email("email", &self.email)
            .max_len("email", &self.email, 255);
        v.check(
            self.password.chars().count() >= MIN_PASSWORD_LENGTH,
            "password",
            "The password must be at least 8 characters.",
        );
        v.finish()
    }
}

/// A validated user ready to be stored.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub organization_id: Option<String>,
}

/// Body of `PUT /users/{id}`; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub organization_id: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.required("name", name).max_len("name", name, 255);
        }
        if let Some(email) = &self.email {
            v.email("email", email);
        }
        if let Some(password) = &self.password {
            v.check(
                password.chars().count() >= MIN_PASSWORD_LENGTH,
                "password",
                "The password must be at least 8 characters.",
            );
        }
        v.finish()
    }

    /// True when the update touches fields only administrators may change.
    pub fn is_privileged(&self) -> bool {
        self.role.is_some() || self.organization_id.is_some()
    }
}

/// Storage form of [`UserUpdate`] with the password already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChangeset {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Individual,
    Company,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Individual => "individual",
            CustomerType::Company => "company",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(CustomerType::Individual),
            "company" => Some(CustomerType::Company),
            _ => None,
        }
    }
}

/// Membership of a user in an organization, carrying gamification points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: String,
    pub user_id: String,
    pub organization_id: String,
    pub customer_type: CustomerType,
    pub supply_point: Option<String>,
    pub municipality_id: Option<String>,
    pub points_total: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomerProfile {
    pub user_id: String,
    pub organization_id: String,
    pub customer_type: CustomerType,
    pub supply_point: Option<String>,
    pub municipality_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// CUPS supply point codes are 20 to 22 alphanumerics starting with "ES".
fn valid_supply_point(code: &str) -> bool {
    let len = code.len();
    code.starts_with("ES") && (20..=22).contains(&len) && code.chars().all(|c| c.is_ascii_alphanumeric())
}

impl NewCustomerProfile {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("user_id", &self.user_id);
        v.required("organization_id", &self.organization_id);
        if let Some(code) = &self.supply_point {
            v.check(
                valid_supply_point(code),
                "supply_point",
                "The supply_point must be a valid CUPS code.",
            );
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerProfileUpdate {
    pub customer_type: Option<CustomerType>,
    pub supply_point: Option<String>,
    pub municipality_id: Option<String>,
    pub is_active: Option<bool>,
}

impl CustomerProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if let Some(code) = &self.supply_point {
            v.check(
                valid_supply_point(code),
                "supply_point",
                "The supply_point must be a valid CUPS code.",
            );
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerProfileFilter {
    pub user_id: Option<String>,
    pub organization_id: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub is_active: Option<bool>,
}

/// Leaderboard row of an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStanding {
    pub profile_id: String,
    pub user_id: String,
    pub points_total: i64,
}

/// Result of `GET /customer-profiles/{id}/rank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRank {
    pub profile_id: String,
    pub organization_id: String,
    pub points_total: i64,
    pub rank: i64,
    pub total_members: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_rules() {
        let user = NewUser {
            name: "Ana".to_string(),
            email: "ana@coop.example".to_string(),
            password: "short".to_string(),
            role: Role::Customer,
            organization_id: None,
        };
        assert!(user.validate().is_err());
        let user = NewUser {
            password: "long-enough".to_string(),
            ..user
        };
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_supply_point_format() {
        assert!(valid_supply_point("ES0021000000000000AB"));
        assert!(!valid_supply_point("FR0021000000000000AB"));
        assert!(!valid_supply_point("ES12"));
    }
}

//! Roles and the authorization policy applied by services.
//!
//! The HTTP layer only authenticates; deciding what an authenticated
//! [`Actor`] may see or change happens here so the rules are unit-testable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

/// User roles, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Customer,
    Agent,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Agent => "agent",
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        }
    }

    pub const ALL: [&'static str; 4] = ["customer", "agent", "admin", "super-admin"];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "customer" => Ok(Role::Customer),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            "super-admin" => Ok(Role::SuperAdmin),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown role '{}'",
                other
            )))),
        }
    }
}

/// Which organizations' records a caller may list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationScope {
    All,
    Only(String),
    Nothing,
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
    pub organization_id: Option<String>,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role, organization_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            organization_id,
        }
    }

    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }

    /// Fails with `PermissionDenied` unless the actor holds at least `minimum`.
    pub fn require(&self, minimum: Role) -> Result<()> {
        if self.has_role(minimum) {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "This action requires the '{}' role",
                minimum
            )))
        }
    }

    /// Admins and above manage content, catalog and geography.
    pub fn is_editor(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Owners always pass; everyone else needs `minimum`.
    pub fn require_owner_or(&self, owner_id: &str, minimum: Role) -> Result<()> {
        if self.user_id == owner_id || self.has_role(minimum) {
            Ok(())
        } else {
            Err(Error::PermissionDenied(
                "You do not have access to this resource".to_string(),
            ))
        }
    }

    pub fn organization_scope(&self) -> OrganizationScope {
        if self.role == Role::SuperAdmin {
            return OrganizationScope::All;
        }
        match &self.organization_id {
            Some(org) => OrganizationScope::Only(org.clone()),
            None => OrganizationScope::Nothing,
        }
    }

    pub fn can_see_organization(&self, organization_id: &str) -> bool {
        match self.organization_scope() {
            OrganizationScope::All => true,
            OrganizationScope::Only(org) => org == organization_id,
            OrganizationScope::Nothing => false,
        }
    }

    /// Fails with `PermissionDenied` unless the organization is visible and the
    /// actor holds at least `minimum`.
    pub fn require_in_organization(&self, organization_id: &str, minimum: Role) -> Result<()> {
        self.require(minimum)?;
        if self.can_see_organization(organization_id) {
            Ok(())
        } else {
            Err(Error::PermissionDenied(
                "The resource belongs to another organization".to_string(),
            ))
        }
    }
}

/// True when an optional caller may see unpublished or inactive records.
pub fn is_editor(actor: Option<&Actor>) -> bool {
    actor.map(Actor::is_editor).unwrap_or(false)
}

/// Unwraps an optional caller or fails with `Unauthenticated`.
pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor> {
    actor.ok_or_else(|| Error::Unauthenticated("A bearer token is required".to_string()))
}

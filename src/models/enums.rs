//! Enumeration types for the HCB API.

use serde::{Deserialize, Serialize};

/// A member's role within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    /// Read-only access
    Reader,
    /// Regular team member
    Member,
    /// Manager with admin rights over the organization
    Manager,
    /// Role not known to this client
    #[serde(other)]
    Unknown,
}

/// Form factor of a Stripe card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// Virtual card, usable immediately
    Virtual,
    /// Physical card, shipped to the holder
    Physical,
    /// Type not known to this client
    #[serde(other)]
    Unknown,
}

/// Lifecycle state of a Stripe card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripeCardStatus {
    /// Card can be used
    Active,
    /// Temporarily blocked by the holder or a manager
    Frozen,
    /// Physical card awaiting activation
    Inactive,
    /// Permanently cancelled
    Canceled,
    /// Status not known to this client
    #[serde(other)]
    Unknown,
}

impl StripeCardStatus {
    /// Returns `true` if the card can currently be spent on.
    pub fn is_active(&self) -> bool {
        matches!(self, StripeCardStatus::Active)
    }
}

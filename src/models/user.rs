//! User models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::OrganizationRole;
use super::resource::resource;
use crate::client::HcbClient;

/// An HCB user account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Unique user id
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Avatar URL
    pub avatar: Option<String>,
    /// HCB admin flag
    pub admin: Option<bool>,
    /// HCB auditor flag
    pub auditor: Option<bool>,
    /// Birthday (visible to the user themselves)
    pub birthday: Option<NaiveDate>,
    /// Mailing address for physical cards
    pub shipping_address: Option<ShippingAddress>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(User, "User");

/// Mailing address for physical card delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Street address line 1
    pub address_line1: Option<String>,
    /// Street address line 2
    pub address_line2: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or province
    pub state: Option<String>,
    /// Country code
    pub country: Option<String>,
    /// Postal/ZIP code
    pub postal_code: Option<String>,
}

/// A user with organization membership info.
///
/// Returned when expanding `users` on an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationUser {
    /// The user
    #[serde(flatten)]
    pub user: User,
    /// When the user joined the organization
    pub joined_at: Option<DateTime<Utc>>,
    /// Role within the organization
    pub role: Option<OrganizationRole>,
}

impl OrganizationUser {
    /// The user id.
    pub fn id(&self) -> &str {
        &self.user.id
    }
}

impl PartialEq for OrganizationUser {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
    }
}

impl Eq for OrganizationUser {}

impl std::hash::Hash for OrganizationUser {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.user.hash(state);
    }
}

impl std::ops::Deref for OrganizationUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.user
    }
}

//! Organization invitation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::OrganizationRole;
use super::organization::Organization;
use super::resource::{resource, Attachable};
use super::user::User;
use crate::client::HcbClient;
use crate::Result;

/// An invitation to join an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique invitation id
    pub id: String,
    /// When it was sent
    pub created_at: Option<DateTime<Utc>>,
    /// Whether it was accepted
    pub accepted: Option<bool>,
    /// Role offered
    pub role: Option<OrganizationRole>,
    /// Who sent it
    pub sender: Option<User>,
    /// Organization being joined
    pub organization: Option<Organization>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(Invitation, "Invitation", nested = attach_nested);

impl Invitation {
    fn attach_nested(&mut self, client: &HcbClient) {
        self.sender = self.sender.take().map(|user| user.attach(client));
        self.organization = self.organization.take().map(|org| org.attach(client));
    }

    /// Fetch a fresh copy of this invitation.
    pub async fn reload(&self) -> Result<Invitation> {
        let client = self.require_attached()?;
        client.invitations().get(&self.id).await
    }

    /// Accept the invitation.
    pub async fn accept(&self) -> Result<Invitation> {
        let client = self.require_attached()?;
        client.invitations().accept(&self.id).await
    }

    /// Decline the invitation.
    pub async fn reject(&self) -> Result<Invitation> {
        let client = self.require_attached()?;
        client.invitations().reject(&self.id).await
    }
}

/// Request for inviting someone to an organization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewInvitation {
    /// Invitee email
    pub email: String,
    /// Role to grant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<OrganizationRole>,
    /// Put the member under spending controls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_spending_controls: Option<bool>,
    /// Starting allowance under spending controls, in cents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_control_allowance_amount: Option<i64>,
}

impl NewInvitation {
    /// Invite `email` with the server's default role.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Set the role.
    pub fn role(mut self, role: OrganizationRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Enable spending controls with a starting allowance.
    pub fn spending_controls(mut self, allowance_cents: i64) -> Self {
        self.enable_spending_controls = Some(true);
        self.initial_control_allowance_amount = Some(allowance_cents);
        self
    }
}

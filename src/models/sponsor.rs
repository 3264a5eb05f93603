//! Sponsor models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::invoice::{Invoice, NewInvoice};
use super::resource::{resource, Attachable};
use crate::client::HcbClient;
use crate::{Error, Result};

/// A sponsor that an organization invoices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sponsor {
    /// Unique sponsor id
    pub id: String,
    /// Sponsor or company name
    pub name: Option<String>,
    /// URL slug
    pub slug: Option<String>,
    /// Billing email
    pub contact_email: Option<String>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Owning organization
    pub event_id: Option<String>,
    /// Stripe customer id
    pub stripe_customer_id: Option<String>,
    /// Street address line 1
    pub address_line1: Option<String>,
    /// Street address line 2
    pub address_line2: Option<String>,
    /// City
    pub address_city: Option<String>,
    /// State or province
    pub address_state: Option<String>,
    /// Postal/ZIP code
    pub address_postal_code: Option<String>,
    /// Country code
    pub address_country: Option<String>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(Sponsor, "Sponsor");

impl Sponsor {
    /// Fetch a fresh copy of this sponsor.
    pub async fn reload(&self) -> Result<Sponsor> {
        let client = self.require_attached()?;
        client.sponsors().get(&self.id).await
    }

    /// Invoice this sponsor on behalf of its organization.
    ///
    /// Fails with [`Error::MissingAssociation`] when the sponsor's
    /// organization is unknown (for example on a stub).
    pub async fn create_invoice(
        &self,
        due_date: NaiveDate,
        item_description: impl Into<String>,
        item_amount: i64,
    ) -> Result<Invoice> {
        let client = self.require_attached()?;
        let event_id = self.event_id.as_deref().ok_or(Error::MissingAssociation {
            entity: "Sponsor",
            field: "event_id",
        })?;
        let request = NewInvoice::new(self.id.clone(), due_date, item_description, item_amount);
        client.invoices().create(event_id, &request).await
    }
}

/// Request for creating a sponsor.
///
/// Sent as `{"organization_id", "sponsor": {...}}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSponsor {
    /// Sponsor or company name
    pub name: String,
    /// Billing email
    pub contact_email: String,
    /// Street address line 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    /// Street address line 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    /// City
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,
    /// State or province
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_state: Option<String>,
    /// Postal/ZIP code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_postal_code: Option<String>,
    /// Country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_country: Option<String>,
}

impl NewSponsor {
    /// Create a sponsor request with the required fields.
    pub fn new(name: impl Into<String>, contact_email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact_email: contact_email.into(),
            ..Default::default()
        }
    }
}

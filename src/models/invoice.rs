//! Invoice models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{resource, Attachable};
use crate::client::HcbClient;
use crate::Result;

/// An invoice sent to a sponsor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique invoice id
    pub id: String,
    /// Invoice status (`open`, `paid`, `void`, ...)
    pub status: Option<String>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Recipient name
    pub to: Option<String>,
    /// Amount still owed, in cents
    pub amount_due: Option<i64>,
    /// Ledger memo
    pub memo: Option<String>,
    /// Payment due date
    pub due_date: Option<NaiveDate>,
    /// Line item amount, in cents
    pub item_amount: Option<i64>,
    /// Line item description
    pub item_description: Option<String>,
    /// Billed sponsor
    pub sponsor_id: Option<String>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(Invoice, "Invoice");

impl Invoice {
    /// Fetch a fresh copy of this invoice.
    pub async fn reload(&self) -> Result<Invoice> {
        let client = self.require_attached()?;
        client.invoices().get(&self.id).await
    }
}

/// Request for invoicing a sponsor.
///
/// Sent as `{"organization_id", "sponsor_id", "invoice": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Sponsor to bill
    pub sponsor_id: String,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Line item description
    pub item_description: String,
    /// Line item amount, in cents
    pub item_amount: i64,
}

impl NewInvoice {
    /// Create an invoice request.
    pub fn new(
        sponsor_id: impl Into<String>,
        due_date: NaiveDate,
        item_description: impl Into<String>,
        item_amount: i64,
    ) -> Self {
        Self {
            sponsor_id: sponsor_id.into(),
            due_date,
            item_description: item_description.into(),
            item_amount,
        }
    }
}

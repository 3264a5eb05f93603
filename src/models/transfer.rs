//! Transfers between organizations and out to bank accounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::details::{transaction_detail, TransactionDetail};
use super::organization::Organization;
use super::resource::{resource, Attachable};
use super::transaction::Transaction;
use super::user::User;
use crate::client::HcbClient;
use crate::{Error, Result};

/// A transfer of funds between two organizations (a disbursement).
///
/// Transfers are not fetched on their own. They arrive nested in a
/// transaction or card grant, or as the result of
/// [`Organization::create_disbursement`]. The enclosing organization is
/// kept as context so the linked ledger entry can be fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transfer {
    /// Transfer id (empty when the server omits it)
    #[serde(default)]
    pub id: String,
    /// Amount in cents
    pub amount_cents: Option<i64>,
    /// Memo
    pub memo: Option<String>,
    /// Status
    pub status: Option<String>,
    /// Ledger entry for this transfer
    pub transaction_id: Option<String>,
    /// Sending organization
    pub from: Option<Organization>,
    /// Receiving organization
    pub to: Option<Organization>,
    /// Who initiated it
    pub sender: Option<User>,
    /// Card grant funded by this transfer
    pub card_grant_id: Option<String>,
    #[serde(skip)]
    pub(crate) organization: Option<Organization>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(Transfer, "Transfer", nested = attach_nested);
transaction_detail!(Transfer, required_id);

impl Transfer {
    fn attach_nested(&mut self, client: &HcbClient) {
        self.from = self.from.take().map(|org| org.attach(client));
        self.to = self.to.take().map(|org| org.attach(client));
        self.sender = self.sender.take().map(|user| user.attach(client));
        self.organization = self.organization.take().map(|org| org.attach(client));
    }

    /// Set the organization the transfer was read through.
    pub(crate) fn with_organization(mut self, organization: Option<Organization>) -> Self {
        self.organization = organization;
        self
    }

    /// The organization this transfer was read through, if known.
    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    fn require_transaction_id(&self) -> Result<&str> {
        self.transaction_id
            .as_deref()
            .ok_or(Error::MissingAssociation {
                entity: "Transfer",
                field: "transaction_id",
            })
    }

    /// Fetch the ledger entry for this transfer.
    ///
    /// The lookup is scoped to the enclosing organization when it is known,
    /// and the returned transaction inherits it if the response omits one.
    pub async fn transaction(&self) -> Result<Transaction> {
        let client = self.require_attached()?;
        let transaction_id = self.require_transaction_id()?;
        let event_id = self.organization.as_ref().map(|org| org.id.as_str());

        let transaction = client
            .transactions()
            .get(transaction_id, event_id, &[])
            .await?;

        if transaction.organization.is_none() {
            let organization = self.organization.clone();
            return Ok(transaction.with_organization(organization));
        }
        Ok(transaction)
    }

    /// An attached stub of the ledger entry, carrying the enclosing
    /// organization. No request is made.
    pub fn transaction_stub(&self) -> Result<Transaction> {
        let client = self.require_attached()?;
        let transaction_id = self.require_transaction_id()?;
        Ok(Transaction::of_id(transaction_id, Some(client.clone()))
            .with_organization(self.organization.clone()))
    }
}

/// Request body for moving funds to another organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDisbursement {
    /// Receiving organization
    pub to_organization_id: String,
    /// Amount in cents
    pub amount_cents: i64,
    /// Description shown on both ledgers
    pub name: String,
}

impl NewDisbursement {
    /// Create a disbursement request.
    pub fn new(
        to_organization_id: impl Into<String>,
        amount_cents: i64,
        name: impl Into<String>,
    ) -> Self {
        Self {
            to_organization_id: to_organization_id.into(),
            amount_cents,
            name: name.into(),
        }
    }
}

/// Request for an ACH transfer to a bank account.
///
/// Sent as `{"ach_transfer": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAchTransfer {
    /// Nine-digit ABA routing number
    pub routing_number: String,
    /// Account number
    pub account_number: String,
    /// Name on the receiving account
    pub recipient_name: String,
    /// Amount in dollars, e.g. `100.00`
    pub amount_money: Decimal,
    /// What the transfer pays for
    pub payment_for: String,
    /// Recipient email for notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    /// Notify the recipient by email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_email_notification: Option<bool>,
}

impl NewAchTransfer {
    /// Create an ACH transfer request.
    pub fn new(
        routing_number: impl Into<String>,
        account_number: impl Into<String>,
        recipient_name: impl Into<String>,
        amount_money: Decimal,
        payment_for: impl Into<String>,
    ) -> Self {
        Self {
            routing_number: routing_number.into(),
            account_number: account_number.into(),
            recipient_name: recipient_name.into(),
            amount_money,
            payment_for: payment_for.into(),
            recipient_email: None,
            send_email_notification: None,
        }
    }

    /// Email the recipient at `email`.
    pub fn notify(mut self, email: impl Into<String>) -> Self {
        self.recipient_email = Some(email.into());
        self.send_email_notification = Some(true);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn transfer_json() -> &'static str {
        r#"{
            "id": "xfr_1",
            "amount_cents": 10000,
            "memo": "Robotics budget",
            "transaction_id": "txn_42",
            "from": {"id": "org_1"},
            "to": {"id": "org_2"}
        }"#
    }

    #[test]
    fn test_decode_is_detached_without_context() {
        let transfer: Transfer = serde_json::from_str(transfer_json()).unwrap();
        assert!(!transfer.is_attached());
        assert!(transfer.organization().is_none());
        assert_eq!(transfer.detail_id(), Some("xfr_1"));
        assert_eq!(transfer.to.as_ref().unwrap().id, "org_2");
    }

    #[test]
    fn test_decode_without_id() {
        let transfer: Transfer =
            serde_json::from_str(r#"{"amount_cents": 100, "transaction_id": "txn_9"}"#).unwrap();
        assert!(transfer.id.is_empty());
        assert!(transfer.detail_id().is_none());

        let transfer = transfer.attach(&HcbClient::new("t").unwrap());
        assert_eq!(transfer.transaction_stub().unwrap().id, "txn_9");
    }

    #[tokio::test]
    async fn test_transaction_requires_client_first() {
        let transfer: Transfer = serde_json::from_str(r#"{"id": "xfr_1"}"#).unwrap();
        let err = transfer.transaction().await.unwrap_err();
        assert!(matches!(err, Error::DetachedEntity { entity: "Transfer" }));
    }

    #[tokio::test]
    async fn test_transaction_requires_transaction_id() {
        let transfer: Transfer = serde_json::from_str(r#"{"id": "xfr_1"}"#).unwrap();
        let transfer = transfer.attach(&HcbClient::new("t").unwrap());

        let err = transfer.transaction().await.unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAssociation { entity: "Transfer", field: "transaction_id" }
        ));
        assert!(transfer.transaction_stub().is_err());
    }

    #[test]
    fn test_transaction_stub_carries_organization() {
        let client = HcbClient::new("t").unwrap();
        let transfer: Transfer = serde_json::from_str(transfer_json()).unwrap();
        let transfer = transfer
            .with_organization(Some(Organization::of_id("org_1", None)))
            .attach(&client);

        let stub = transfer.transaction_stub().unwrap();
        assert_eq!(stub.id, "txn_42");
        assert!(stub.is_attached());
        assert_eq!(stub.organization.as_ref().map(|org| org.id.as_str()), Some("org_1"));
        assert!(stub.amount_cents.is_none());
    }

    #[test]
    fn test_ach_transfer_body() {
        let request = NewAchTransfer::new(
            "021000021",
            "123456789",
            "Venue LLC",
            dec!(100.00),
            "Hall rental",
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["amount_money"], "100.00");
        assert_eq!(body["routing_number"], "021000021");
        assert!(body.get("recipient_email").is_none());
    }
}

//! Ledger transactions and their type discriminator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::comment::{Comment, NewComment};
use super::details::{
    AchTransfer, CardCharge, Check, CheckDeposit, DonationTransaction, ExpensePayout,
    InvoiceTransaction, TransactionDetail,
};
use super::organization::Organization;
use super::receipt::{FileUpload, Receipt};
use super::resource::{resource, Attachable};
use super::transfer::Transfer;
use crate::client::HcbClient;
use crate::{Error, Result};

/// Which detail payload a transaction carries.
///
/// Also accepted as the `type` filter when listing transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Card purchase
    CardCharge,
    /// Donation received
    Donation,
    /// Reimbursement payout
    ExpensePayout,
    /// Invoice payment
    Invoice,
    /// Mailed check
    Check,
    /// Transfer between organizations
    Transfer,
    /// ACH bank transfer
    AchTransfer,
    /// Deposited check
    CheckDeposit,
    /// No known detail payload
    #[serde(other)]
    Unknown,
}

impl TransactionType {
    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CardCharge => "card_charge",
            TransactionType::Donation => "donation",
            TransactionType::ExpensePayout => "expense_payout",
            TransactionType::Invoice => "invoice",
            TransactionType::Check => "check",
            TransactionType::Transfer => "transfer",
            TransactionType::AchTransfer => "ach_transfer",
            TransactionType::CheckDeposit => "check_deposit",
            TransactionType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A borrowed view of a transaction's detail payload.
#[derive(Debug, Clone, Copy)]
pub enum TransactionDetails<'a> {
    /// Card purchase
    CardCharge(&'a CardCharge),
    /// Donation received
    Donation(&'a DonationTransaction),
    /// Reimbursement payout
    ExpensePayout(&'a ExpensePayout),
    /// Invoice payment
    Invoice(&'a InvoiceTransaction),
    /// Mailed check
    Check(&'a Check),
    /// Transfer between organizations
    Transfer(&'a Transfer),
    /// ACH bank transfer
    AchTransfer(&'a AchTransfer),
    /// Deposited check
    CheckDeposit(&'a CheckDeposit),
}

impl<'a> TransactionDetails<'a> {
    /// The matching discriminator.
    pub fn kind(&self) -> TransactionType {
        match self {
            TransactionDetails::CardCharge(_) => TransactionType::CardCharge,
            TransactionDetails::Donation(_) => TransactionType::Donation,
            TransactionDetails::ExpensePayout(_) => TransactionType::ExpensePayout,
            TransactionDetails::Invoice(_) => TransactionType::Invoice,
            TransactionDetails::Check(_) => TransactionType::Check,
            TransactionDetails::Transfer(_) => TransactionType::Transfer,
            TransactionDetails::AchTransfer(_) => TransactionType::AchTransfer,
            TransactionDetails::CheckDeposit(_) => TransactionType::CheckDeposit,
        }
    }

    /// The payload through its shared fields.
    pub fn as_detail(&self) -> &'a dyn TransactionDetail {
        match *self {
            TransactionDetails::CardCharge(d) => d,
            TransactionDetails::Donation(d) => d,
            TransactionDetails::ExpensePayout(d) => d,
            TransactionDetails::Invoice(d) => d,
            TransactionDetails::Check(d) => d,
            TransactionDetails::Transfer(d) => d,
            TransactionDetails::AchTransfer(d) => d,
            TransactionDetails::CheckDeposit(d) => d,
        }
    }
}

/// A tag applied to a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Tag id
    pub id: String,
    /// Label
    pub label: Option<String>,
    /// Display color
    pub color: Option<String>,
    /// Emoji
    pub emoji: Option<String>,
}

/// An entry on an organization's ledger.
///
/// At most one of the detail fields (`card_charge` ... `check_deposit`) is
/// set; use [`kind`](Self::kind) or [`details`](Self::details) rather than
/// probing them one by one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id
    pub id: String,
    /// Posting date
    pub date: Option<NaiveDate>,
    /// Signed amount in cents; negative for spending
    pub amount_cents: Option<i64>,
    /// Memo
    pub memo: Option<String>,
    /// Whether the memo was edited by a user
    pub has_custom_memo: Option<bool>,
    /// Not yet settled
    pub pending: Option<bool>,
    /// Declined card authorization
    pub declined: Option<bool>,
    /// Tags
    pub tags: Option<Vec<Tag>>,
    /// Internal ledger code
    pub code: Option<String>,
    /// Needs a receipt
    pub missing_receipt: Option<bool>,
    /// Receipt marked as lost
    pub lost_receipt: Option<bool>,
    /// Display hint
    pub appearance: Option<String>,
    /// Card purchase details
    pub card_charge: Option<CardCharge>,
    /// Donation details
    pub donation: Option<DonationTransaction>,
    /// Reimbursement payout details
    pub expense_payout: Option<ExpensePayout>,
    /// Invoice payment details
    pub invoice: Option<InvoiceTransaction>,
    /// Mailed check details
    pub check: Option<Check>,
    /// Transfer details
    pub transfer: Option<Transfer>,
    /// ACH transfer details
    pub ach_transfer: Option<AchTransfer>,
    /// Check deposit details
    pub check_deposit: Option<CheckDeposit>,
    /// Owning organization (expand `organization`)
    pub organization: Option<Organization>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(Transaction, "Transaction", nested = attach_nested);

impl Transaction {
    fn attach_nested(&mut self, client: &HcbClient) {
        self.organization = self.organization.take().map(|org| org.attach(client));
        if let Some(charge) = self.card_charge.as_mut() {
            charge.attach_nested(client);
        }
        if let Some(check) = self.check.as_mut() {
            check.attach_nested(client);
        }
        if let Some(ach) = self.ach_transfer.as_mut() {
            ach.attach_nested(client);
        }
        if let Some(deposit) = self.check_deposit.as_mut() {
            deposit.attach_nested(client);
        }
        let organization = self.organization.clone();
        self.transfer = self
            .transfer
            .take()
            .map(|transfer| transfer.with_organization(organization).attach(client));
    }

    /// Set the owning organization, also handing it to a nested transfer.
    pub(crate) fn with_organization(mut self, organization: Option<Organization>) -> Self {
        self.transfer = self
            .transfer
            .take()
            .map(|transfer| transfer.with_organization(organization.clone()));
        self.organization = organization;
        self
    }

    /// The detail type, checked in the order card_charge, donation,
    /// expense_payout, invoice, check, transfer, ach_transfer, check_deposit.
    pub fn kind(&self) -> TransactionType {
        self.details()
            .map_or(TransactionType::Unknown, |details| details.kind())
    }

    /// The detail payload, chosen with the same order as [`kind`](Self::kind).
    pub fn details(&self) -> Option<TransactionDetails<'_>> {
        if let Some(d) = &self.card_charge {
            return Some(TransactionDetails::CardCharge(d));
        }
        if let Some(d) = &self.donation {
            return Some(TransactionDetails::Donation(d));
        }
        if let Some(d) = &self.expense_payout {
            return Some(TransactionDetails::ExpensePayout(d));
        }
        if let Some(d) = &self.invoice {
            return Some(TransactionDetails::Invoice(d));
        }
        if let Some(d) = &self.check {
            return Some(TransactionDetails::Check(d));
        }
        if let Some(d) = &self.transfer {
            return Some(TransactionDetails::Transfer(d));
        }
        if let Some(d) = &self.ach_transfer {
            return Some(TransactionDetails::AchTransfer(d));
        }
        self.check_deposit
            .as_ref()
            .map(TransactionDetails::CheckDeposit)
    }

    fn organization_id(&self) -> Result<&str> {
        self.organization
            .as_ref()
            .map(|org| org.id.as_str())
            .ok_or(Error::MissingAssociation {
                entity: "Transaction",
                field: "organization",
            })
    }

    /// Fetch a fresh copy of this transaction.
    ///
    /// The lookup is scoped to the owning organization when known, and the
    /// result keeps it if the response omits one.
    pub async fn reload(&self) -> Result<Transaction> {
        let client = self.require_attached()?;
        let event_id = self.organization.as_ref().map(|org| org.id.as_str());
        let fresh = client.transactions().get(&self.id, event_id, &[]).await?;
        if fresh.organization.is_none() {
            return Ok(fresh.with_organization(self.organization.clone()));
        }
        Ok(fresh)
    }

    /// Replace the memo.
    pub async fn update_memo(&self, memo: &str) -> Result<Transaction> {
        let client = self.require_attached()?;
        let organization_id = self.organization_id()?;
        client
            .transactions()
            .update_memo(organization_id, &self.id, memo)
            .await
    }

    /// Comments on this transaction.
    pub async fn comments(&self) -> Result<Vec<Comment>> {
        let client = self.require_attached()?;
        let organization_id = self.organization_id()?;
        client.transactions().comments(organization_id, &self.id).await
    }

    /// Post a comment.
    pub async fn add_comment(&self, comment: NewComment) -> Result<Comment> {
        let client = self.require_attached()?;
        let organization_id = self.organization_id()?;
        client
            .transactions()
            .create_comment(organization_id, &self.id, comment)
            .await
    }

    /// Receipts attached to this transaction.
    pub async fn receipts(&self) -> Result<Vec<Receipt>> {
        let client = self.require_attached()?;
        client.receipts().list(Some(&self.id)).await
    }

    /// Upload a receipt for this transaction.
    pub async fn add_receipt(&self, file: FileUpload) -> Result<Receipt> {
        let client = self.require_attached()?;
        client.receipts().create(file, Some(&self.id)).await
    }

    /// Memo suggestions based on past memos.
    pub async fn memo_suggestions(&self) -> Result<Vec<String>> {
        let client = self.require_attached()?;
        let organization_id = self.organization_id()?;
        client
            .transactions()
            .memo_suggestions(organization_id, &self.id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_charge_end_to_end() {
        let json = r#"{"id":"txn_1","amount_cents":-1500,"card_charge":{"merchant":{"name":"Starbucks"}}}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(txn.kind(), TransactionType::CardCharge);
        assert_eq!(txn.amount_cents, Some(-1500));
        match txn.details() {
            Some(TransactionDetails::CardCharge(charge)) => {
                let merchant = charge.merchant.as_ref().unwrap();
                assert_eq!(merchant.name.as_deref(), Some("Starbucks"));
            }
            other => panic!("expected card charge, got {:?}", other),
        }
    }

    #[test]
    fn test_kind_priority_order() {
        let json = r#"{
            "id": "txn_2",
            "transfer": {"id": "xfr_1"},
            "check_deposit": {"id": "cd_1"},
            "donation": {"id": "don_1"},
            "invoice": {"id": "inv_1"}
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.kind(), TransactionType::Donation);
        assert_eq!(txn.details().unwrap().kind(), TransactionType::Donation);

        let json = r#"{"id": "txn_3", "ach_transfer": {"id": "ach_1"}, "transfer": {"id": "xfr_1"}}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.kind(), TransactionType::Transfer);
    }

    #[test]
    fn test_null_details_are_absent() {
        let json = r#"{"id": "txn_4", "card_charge": null, "check": null}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.kind(), TransactionType::Unknown);
        assert!(txn.details().is_none());
    }

    #[test]
    fn test_details_shared_fields() {
        let json = r#"{"id": "txn_5", "expense_payout": {"id": "ep_1", "amount_cents": 900, "memo": "Pizza"}}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        let detail = txn.details().unwrap().as_detail();
        assert_eq!(detail.detail_id(), Some("ep_1"));
        assert_eq!(detail.amount_cents(), Some(900));
        assert_eq!(detail.memo(), Some("Pizza"));
    }

    #[test]
    fn test_attach_gives_transfer_organization() {
        let json = r#"{
            "id": "txn_6",
            "organization": {"id": "org_1"},
            "transfer": {"id": "xfr_1", "transaction_id": "txn_6"},
            "card_charge": {"card": {"id": "card_1"}}
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        let txn = txn.attach(&HcbClient::new("t").unwrap());

        let transfer = txn.transfer.as_ref().unwrap();
        assert!(transfer.is_attached());
        assert_eq!(transfer.organization().unwrap().id, "org_1");
        assert!(txn
            .card_charge
            .as_ref()
            .unwrap()
            .card
            .as_ref()
            .unwrap()
            .is_attached());
    }

    #[test]
    fn test_identity_equality() {
        let a: Transaction =
            serde_json::from_str(r#"{"id": "txn_1", "memo": "Old"}"#).unwrap();
        let b: Transaction =
            serde_json::from_str(r#"{"id": "txn_1", "memo": "New", "pending": true}"#).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Transaction::of_id("txn_2", None));
    }

    #[tokio::test]
    async fn test_org_scoped_actions_need_organization() {
        let txn = Transaction::of_id("txn_1", Some(HcbClient::new("t").unwrap()));

        let err = txn.update_memo("Lunch").await.unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAssociation { entity: "Transaction", field: "organization" }
        ));
        assert!(txn.comments().await.unwrap_err().is_misuse());
        assert!(txn.memo_suggestions().await.unwrap_err().is_misuse());
    }

    #[tokio::test]
    async fn test_detached_check_comes_first() {
        let txn = Transaction::of_id("txn_1", None);
        let err = txn.update_memo("Lunch").await.unwrap_err();
        assert!(matches!(err, Error::DetachedEntity { entity: "Transaction" }));
    }

    #[test]
    fn test_type_wire_names() {
        assert_eq!(TransactionType::AchTransfer.to_string(), "ach_transfer");
        assert_eq!(
            serde_json::to_string(&TransactionType::CheckDeposit).unwrap(),
            r#""check_deposit""#
        );
    }
}

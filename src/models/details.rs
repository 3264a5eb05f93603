//! Type-specific payloads carried by a [`Transaction`](super::Transaction).
//!
//! A transaction carries at most one of these. Most of them share the
//! [`TransactionDetail`] fields; each type implements only the ones its
//! JSON actually has.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::resource::Attachable;
use super::stripe_card::StripeCard;
use super::user::User;
use crate::client::HcbClient;

/// Fields shared by transaction detail payloads.
///
/// A method returning `None` means the field is absent from this payload,
/// either because the type never carries it or the server omitted it.
pub trait TransactionDetail {
    /// Detail record id.
    fn detail_id(&self) -> Option<&str> {
        None
    }

    /// Amount in cents.
    fn amount_cents(&self) -> Option<i64> {
        None
    }

    /// Memo text.
    fn memo(&self) -> Option<&str> {
        None
    }

    /// Server-side status string.
    fn status(&self) -> Option<&str> {
        None
    }

    /// Whether the payload is still pending.
    fn pending(&self) -> Option<bool> {
        None
    }

    /// Whether the payload was declined.
    fn declined(&self) -> Option<bool> {
        None
    }
}

/// Implements [`TransactionDetail`] for a type with `id`, `amount_cents`,
/// `memo` and `status` fields. `id` is either `String` or `Option<String>`.
///
/// With `optional_id` the type also compares and hashes by `id` alone.
/// Resources using `required_id` get that from `resource!`.
macro_rules! transaction_detail {
    ($ty:ident, required_id) => {
        transaction_detail!(@impl $ty, |this| Some(this.id.as_str()).filter(|id| !id.is_empty()));
    };
    ($ty:ident, optional_id) => {
        transaction_detail!(@impl $ty, |this| this.id.as_deref());

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
    };
    (@impl $ty:ident, |$this:ident| $id:expr) => {
        impl TransactionDetail for $ty {
            fn detail_id(&self) -> Option<&str> {
                let $this = self;
                $id
            }

            fn amount_cents(&self) -> Option<i64> {
                self.amount_cents
            }

            fn memo(&self) -> Option<&str> {
                self.memo.as_deref()
            }

            fn status(&self) -> Option<&str> {
                self.status.as_deref()
            }
        }
    };
}

pub(crate) use transaction_detail;

fn attach_user(user: &mut Option<User>, client: &HcbClient) {
    *user = user.take().map(|user| user.attach(client));
}

/// A card purchase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardCharge {
    /// Where the card was used
    pub merchant: Option<Merchant>,
    /// `chip`, `swipe`, `contactless`, `online`, ...
    pub charge_method: Option<String>,
    /// When the purchase happened
    pub spent_at: Option<DateTime<Utc>>,
    /// `apple_pay`, `google_pay`, ...
    pub wallet: Option<String>,
    /// The card used
    pub card: Option<StripeCard>,
}

impl TransactionDetail for CardCharge {}

impl CardCharge {
    pub(crate) fn attach_nested(&mut self, client: &HcbClient) {
        self.card = self.card.take().map(|card| card.attach(client));
    }
}

/// Merchant info for a card purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Raw merchant name from the card network
    pub name: Option<String>,
    /// Cleaned-up merchant name
    pub smart_name: Option<String>,
    /// Two-letter country code
    pub country: Option<String>,
    /// Merchant network id
    pub network_id: Option<String>,
}

impl Merchant {
    /// The cleaned-up name when known, else the raw one.
    pub fn display_name(&self) -> Option<&str> {
        self.smart_name.as_deref().or(self.name.as_deref())
    }
}

/// A donation received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonationTransaction {
    /// Donation id
    pub id: Option<String>,
    /// Amount in cents
    pub amount_cents: Option<i64>,
    /// Memo
    pub memo: Option<String>,
    /// Status
    pub status: Option<String>,
    /// Part of a recurring donation
    pub recurring: Option<bool>,
    /// Donor info
    pub donor: Option<DonationDonor>,
    /// Referral tracking
    pub attribution: Option<DonationAttribution>,
    /// Message left by the donor
    pub message: Option<String>,
    /// When the donation was made
    pub donated_at: Option<DateTime<Utc>>,
    /// Whether it was refunded
    pub refunded: Option<bool>,
}

transaction_detail!(DonationTransaction, optional_id);

/// Donor info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationDonor {
    /// Donor name
    pub name: Option<String>,
    /// Donor email
    pub email: Option<String>,
    /// Recurring donor id
    pub recurring_donor_id: Option<String>,
}

/// UTM attribution for a donation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationAttribution {
    /// HTTP referrer
    pub referrer: Option<String>,
    /// `utm_source`
    pub utm_source: Option<String>,
    /// `utm_medium`
    pub utm_medium: Option<String>,
    /// `utm_campaign`
    pub utm_campaign: Option<String>,
    /// `utm_term`
    pub utm_term: Option<String>,
    /// `utm_content`
    pub utm_content: Option<String>,
}

/// A reimbursement payout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpensePayout {
    /// Payout id
    pub id: Option<String>,
    /// Amount in cents
    pub amount_cents: Option<i64>,
    /// Memo
    pub memo: Option<String>,
    /// Status
    pub status: Option<String>,
    /// Reimbursement report id
    pub report_id: Option<String>,
}

transaction_detail!(ExpensePayout, optional_id);

/// An invoice payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceTransaction {
    /// Invoice id
    pub id: Option<String>,
    /// Amount in cents
    pub amount_cents: Option<i64>,
    /// Memo
    pub memo: Option<String>,
    /// Status
    pub status: Option<String>,
    /// When the invoice was sent
    pub sent_at: Option<DateTime<Utc>>,
    /// When it was paid
    pub paid_at: Option<DateTime<Utc>>,
    /// Line item description
    pub description: Option<String>,
    /// Payment due date
    pub due_date: Option<NaiveDate>,
    /// Billed sponsor
    pub sponsor: Option<InvoiceSponsor>,
}

transaction_detail!(InvoiceTransaction, optional_id);

/// Sponsor info embedded in an invoice payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSponsor {
    /// Sponsor id
    pub id: Option<String>,
    /// Sponsor name
    pub name: Option<String>,
    /// Billing email
    pub email: Option<String>,
}

/// A mailed check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Check {
    /// Check id
    pub id: Option<String>,
    /// Amount in cents
    pub amount_cents: Option<i64>,
    /// Memo
    pub memo: Option<String>,
    /// Status
    pub status: Option<String>,
    /// Recipient city
    pub address_city: Option<String>,
    /// Recipient street line 1
    pub address_line1: Option<String>,
    /// Recipient street line 2
    pub address_line2: Option<String>,
    /// Recipient state
    pub address_state: Option<String>,
    /// Recipient ZIP code
    pub address_zip: Option<String>,
    /// Recipient email
    pub recipient_email: Option<String>,
    /// Check number
    pub check_number: Option<String>,
    /// Payee
    pub recipient_name: Option<String>,
    /// What the check pays for
    pub payment_for: Option<String>,
    /// Who sent it
    pub sender: Option<User>,
}

transaction_detail!(Check, optional_id);

impl Check {
    pub(crate) fn attach_nested(&mut self, client: &HcbClient) {
        attach_user(&mut self.sender, client);
    }
}

/// An ACH bank transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchTransfer {
    /// Transfer id
    pub id: Option<String>,
    /// Amount in cents
    pub amount_cents: Option<i64>,
    /// Memo
    pub memo: Option<String>,
    /// Status
    pub status: Option<String>,
    /// Name on the receiving account
    pub recipient_name: Option<String>,
    /// Recipient email
    pub recipient_email: Option<String>,
    /// Receiving bank
    pub bank_name: Option<String>,
    /// Last four digits of the account number (permission required)
    pub account_number_last4: Option<String>,
    /// Routing number (permission required)
    pub routing_number: Option<String>,
    /// What the transfer pays for
    pub payment_for: Option<String>,
    /// Who initiated it
    pub sender: Option<User>,
}

transaction_detail!(AchTransfer, optional_id);

impl AchTransfer {
    pub(crate) fn attach_nested(&mut self, client: &HcbClient) {
        attach_user(&mut self.sender, client);
    }
}

/// A deposited check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckDeposit {
    /// Deposit id
    pub id: Option<String>,
    /// Amount in cents
    pub amount_cents: Option<i64>,
    /// Memo
    pub memo: Option<String>,
    /// Status
    pub status: Option<String>,
    /// Front image URL
    pub front_url: Option<String>,
    /// Back image URL
    pub back_url: Option<String>,
    /// Who deposited it
    pub submitter: Option<User>,
}

transaction_detail!(CheckDeposit, optional_id);

impl CheckDeposit {
    pub(crate) fn attach_nested(&mut self, client: &HcbClient) {
        attach_user(&mut self.submitter, client);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_charge_has_no_shared_fields() {
        let charge: CardCharge = serde_json::from_str(
            r#"{"merchant": {"name": "SQ *COFFEE", "smart_name": "Coffee"}, "wallet": "apple_pay"}"#,
        )
        .unwrap();
        assert_eq!(charge.merchant.as_ref().unwrap().display_name(), Some("Coffee"));
        assert!(charge.detail_id().is_none());
        assert!(charge.amount_cents().is_none());
    }

    #[test]
    fn test_shared_fields() {
        let check: Check = serde_json::from_str(
            r#"{"id": "chk_1", "amount_cents": -2500, "memo": "Venue", "status": "deposited",
                "check_number": "1042", "sender": {"id": "usr_1"}}"#,
        )
        .unwrap();
        assert_eq!(check.detail_id(), Some("chk_1"));
        assert_eq!(TransactionDetail::amount_cents(&check), Some(-2500));
        assert_eq!(TransactionDetail::memo(&check), Some("Venue"));
        assert_eq!(TransactionDetail::status(&check), Some("deposited"));
        assert!(check.pending().is_none());
    }

    #[test]
    fn test_optional_id_details() {
        let payout: ExpensePayout =
            serde_json::from_str(r#"{"amount_cents": 1200, "report_id": "rep_1"}"#).unwrap();
        assert!(payout.detail_id().is_none());
        assert_eq!(payout.report_id.as_deref(), Some("rep_1"));
    }

    #[test]
    fn test_detail_without_id_decodes() {
        let check: Check =
            serde_json::from_str(r#"{"amount_cents": -500, "status": "mailed"}"#).unwrap();
        assert!(check.detail_id().is_none());
        assert_eq!(TransactionDetail::status(&check), Some("mailed"));

        let ach: AchTransfer = serde_json::from_str(r#"{"bank_name": "Chase"}"#).unwrap();
        assert!(ach.detail_id().is_none());
    }

    #[test]
    fn test_details_compare_by_id() {
        use std::collections::HashSet;

        let a: Check = serde_json::from_str(r#"{"id": "chk_1", "memo": "Venue"}"#).unwrap();
        let b: Check = serde_json::from_str(r#"{"id": "chk_1", "memo": "Catering"}"#).unwrap();
        let c: Check = serde_json::from_str(r#"{"id": "chk_2", "memo": "Venue"}"#).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let deposits: HashSet<CheckDeposit> = [
            serde_json::from_str(r#"{"id": "cd_1"}"#).unwrap(),
            serde_json::from_str(r#"{"id": "cd_1", "memo": "again"}"#).unwrap(),
            serde_json::from_str(r#"{"id": "cd_2"}"#).unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(deposits.len(), 2);
    }

    #[test]
    fn test_donation_nested_records() {
        let json = r#"{
            "id": "don_1",
            "amount_cents": 5000,
            "recurring": true,
            "donor": {"name": "Ada", "email": "ada@example.com"},
            "attribution": {"utm_source": "newsletter"},
            "donated_at": "2024-01-15T12:00:00Z"
        }"#;

        let donation: DonationTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(donation.donor.unwrap().name.as_deref(), Some("Ada"));
        assert_eq!(
            donation.attribution.unwrap().utm_source.as_deref(),
            Some("newsletter")
        );
        assert!(donation.donated_at.is_some());
    }

    #[test]
    fn test_attach_threads_into_users() {
        let mut deposit: CheckDeposit =
            serde_json::from_str(r#"{"id": "cd_1", "submitter": {"id": "usr_1"}}"#).unwrap();
        deposit.attach_nested(&HcbClient::new("t").unwrap());
        assert!(deposit.submitter.unwrap().is_attached());
    }
}

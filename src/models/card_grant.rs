//! Card grant models.

use serde::{Deserialize, Serialize};

use super::organization::Organization;
use super::resource::{resource, Attachable};
use super::transfer::Transfer;
use super::user::User;
use crate::client::HcbClient;
use crate::Result;

/// A card grant: a virtual card with a funded balance and optional
/// spending restrictions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardGrant {
    /// Unique grant id
    pub id: String,
    /// Total amount granted, in cents
    pub amount_cents: Option<i64>,
    /// Remaining balance (expand `balance_cents`)
    pub balance_cents: Option<i64>,
    /// Recipient email
    pub email: Option<String>,
    /// Grant status (`active`, `canceled`, `expired`, ...)
    pub status: Option<String>,
    /// Merchant restriction, as sent by the server
    pub merchant_lock: Option<SpendingLock>,
    /// Merchant category restriction, as sent by the server
    pub category_lock: Option<SpendingLock>,
    /// Keyword restriction on merchant names, as sent by the server
    pub keyword_lock: Option<SpendingLock>,
    /// Merchant ids the grant may be spent at
    pub allowed_merchants: Option<Vec<String>>,
    /// Merchant category codes the grant may be spent on
    pub allowed_categories: Option<Vec<String>>,
    /// What the grant is for
    pub purpose: Option<String>,
    /// Card closes after the first purchase
    pub one_time_use: Option<bool>,
    /// Purchases need a receipt before they clear
    pub pre_authorization_required: Option<bool>,
    /// Underlying Stripe card id
    pub card_id: Option<String>,
    /// Recipient (expand `user`)
    pub user: Option<User>,
    /// Issuing organization (expand `organization`)
    pub organization: Option<Organization>,
    /// Transfers that funded the grant (expand `disbursements`)
    pub disbursements: Option<Vec<Transfer>>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(CardGrant, "CardGrant", nested = attach_nested);

impl CardGrant {
    fn attach_nested(&mut self, client: &HcbClient) {
        self.user = self.user.take().map(|user| user.attach(client));
        self.organization = self.organization.take().map(|org| org.attach(client));

        let organization = self.organization.clone();
        if let Some(disbursements) = self.disbursements.take() {
            self.disbursements = Some(
                disbursements
                    .into_iter()
                    .map(|transfer| {
                        transfer
                            .with_organization(organization.clone())
                            .attach(client)
                    })
                    .collect(),
            );
        }
    }

    /// Whether spending is restricted to specific merchants.
    pub fn is_merchant_locked(&self) -> bool {
        self.merchant_lock.as_ref().is_some_and(SpendingLock::is_locked)
    }

    /// Whether spending is restricted to merchant categories.
    pub fn is_category_locked(&self) -> bool {
        self.category_lock.as_ref().is_some_and(SpendingLock::is_locked)
    }

    /// Whether spending is restricted by a keyword pattern.
    pub fn is_keyword_locked(&self) -> bool {
        self.keyword_lock.as_ref().is_some_and(SpendingLock::is_locked)
    }

    /// Fetch a fresh copy of this grant.
    pub async fn reload(&self) -> Result<CardGrant> {
        let client = self.require_attached()?;
        client.card_grants().get(&self.id, &[]).await
    }

    /// Change the grant's restrictions or purpose.
    pub async fn update(&self, update: &CardGrantUpdate) -> Result<CardGrant> {
        let client = self.require_attached()?;
        client.card_grants().update(&self.id, update).await
    }

    /// Add funds to the grant.
    pub async fn topup(&self, amount_cents: i64) -> Result<CardGrant> {
        let client = self.require_attached()?;
        client.card_grants().topup(&self.id, amount_cents).await
    }

    /// Pull funds back to the organization.
    pub async fn withdraw(&self, amount_cents: i64) -> Result<CardGrant> {
        let client = self.require_attached()?;
        client.card_grants().withdraw(&self.id, amount_cents).await
    }

    /// Cancel the grant, returning the remaining balance.
    pub async fn cancel(&self) -> Result<CardGrant> {
        let client = self.require_attached()?;
        client.card_grants().cancel(&self.id).await
    }

    /// Activate a pending grant.
    pub async fn activate(&self) -> Result<CardGrant> {
        let client = self.require_attached()?;
        client.card_grants().activate(&self.id).await
    }
}

/// A spending restriction on a card grant.
///
/// The server reports locks as a flag, a pattern or comma-separated string,
/// or a list of ids. The payload is kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpendingLock {
    /// `true` / `false`
    Flag(bool),
    /// A keyword pattern or comma-separated ids
    Pattern(String),
    /// A list of merchant or category ids
    List(Vec<String>),
    /// Any other shape
    Other(serde_json::Value),
}

impl SpendingLock {
    /// Whether the lock restricts spending. Empty strings and lists do not.
    pub fn is_locked(&self) -> bool {
        match self {
            SpendingLock::Flag(flag) => *flag,
            SpendingLock::Pattern(text) => !text.trim().is_empty(),
            SpendingLock::List(items) => !items.is_empty(),
            SpendingLock::Other(value) => !value.is_null(),
        }
    }

    /// The pattern text, for string-valued locks.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            SpendingLock::Pattern(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The ids the lock allows: list items, or the parts of a
    /// comma-separated string.
    pub fn values(&self) -> Vec<&str> {
        match self {
            SpendingLock::List(items) => items.iter().map(String::as_str).collect(),
            SpendingLock::Pattern(text) => text
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn join_ids<I, S>(ids: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = ids
        .into_iter()
        .map(|id| id.as_ref().trim().to_string())
        .filter(|id| !id.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    (!joined.is_empty()).then_some(joined)
}

/// Request body for issuing a card grant.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewCardGrant {
    /// Initial funding, in cents
    pub amount_cents: i64,
    /// Recipient email
    pub email: String,
    /// What the grant is for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Comma-separated merchant ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_lock: Option<String>,
    /// Comma-separated merchant category codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_lock: Option<String>,
    /// Pattern merchant names must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_lock: Option<String>,
    /// Close the card after one purchase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_use: Option<bool>,
    /// Require a receipt before purchases clear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_authorization_required: Option<bool>,
    /// Instructions shown to the recipient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl NewCardGrant {
    /// Create a grant request with the required fields.
    pub fn new(amount_cents: i64, email: impl Into<String>) -> Self {
        Self {
            amount_cents,
            email: email.into(),
            ..Default::default()
        }
    }

    /// Set the purpose.
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Restrict spending to these merchant ids.
    pub fn merchant_lock<I, S>(mut self, merchants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.merchant_lock = join_ids(merchants);
        self
    }

    /// Restrict spending to these merchant categories.
    pub fn category_lock<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.category_lock = join_ids(categories);
        self
    }

    /// Restrict spending to merchants whose name matches `pattern`.
    pub fn keyword_lock(mut self, pattern: impl Into<String>) -> Self {
        self.keyword_lock = Some(pattern.into());
        self
    }

    /// Close the card after its first purchase.
    pub fn one_time_use(mut self, enabled: bool) -> Self {
        self.one_time_use = Some(enabled);
        self
    }

    /// Require a receipt before purchases clear.
    pub fn pre_authorization_required(mut self, enabled: bool) -> Self {
        self.pre_authorization_required = Some(enabled);
        self
    }

    /// Set instructions for the recipient.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }
}

/// Request body for updating a card grant. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardGrantUpdate {
    /// New purpose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Comma-separated merchant ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_lock: Option<String>,
    /// Comma-separated merchant category codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_lock: Option<String>,
    /// Pattern merchant names must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_lock: Option<String>,
    /// Close the card after one purchase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_use: Option<bool>,
    /// Require a receipt before purchases clear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_authorization_required: Option<bool>,
    /// Instructions shown to the recipient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl CardGrantUpdate {
    /// Replace the merchant allow-list.
    pub fn merchant_lock<I, S>(mut self, merchants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.merchant_lock = join_ids(merchants);
        self
    }

    /// Replace the category allow-list.
    pub fn category_lock<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.category_lock = join_ids(categories);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_card_grant_locks() {
        let json = r#"{
            "id": "cg_1",
            "amount_cents": 5000,
            "merchant_lock": true,
            "category_lock": false,
            "keyword_lock": "^STARBUCKS",
            "allowed_merchants": ["12345"],
            "allowed_categories": [],
            "one_time_use": false,
            "pre_authorization_required": true
        }"#;

        let grant: CardGrant = serde_json::from_str(json).unwrap();
        assert_eq!(grant.merchant_lock, Some(SpendingLock::Flag(true)));
        assert_eq!(grant.category_lock, Some(SpendingLock::Flag(false)));
        assert!(grant.is_merchant_locked());
        assert!(!grant.is_category_locked());
        assert!(grant.is_keyword_locked());
        assert_eq!(grant.allowed_merchants, Some(vec!["12345".to_string()]));
        assert_eq!(grant.pre_authorization_required, Some(true));
    }

    #[test]
    fn test_missing_and_list_locks() {
        let grant: CardGrant =
            serde_json::from_str(r#"{"id": "cg_1", "merchant_lock": ["a", "b"], "category_lock": null}"#)
                .unwrap();
        assert_eq!(grant.merchant_lock.as_ref().unwrap().values(), ["a", "b"]);
        assert_eq!(grant.category_lock, None);
        assert_eq!(grant.keyword_lock, None);
        assert!(!grant.is_category_locked());
    }

    #[test]
    fn test_lock_payloads_survive_decoding() {
        let grant: CardGrant = serde_json::from_str(
            r#"{"id": "cg_1", "keyword_lock": "^STARBUCKS", "merchant_lock": ["m_1", "m_2"], "category_lock": "5812, 5814"}"#,
        )
        .unwrap();

        let keyword = grant.keyword_lock.as_ref().unwrap();
        assert_eq!(keyword.pattern(), Some("^STARBUCKS"));
        assert_eq!(
            grant.merchant_lock,
            Some(SpendingLock::List(vec!["m_1".to_string(), "m_2".to_string()]))
        );
        assert_eq!(grant.category_lock.as_ref().unwrap().values(), ["5812", "5814"]);

        let body = serde_json::to_value(&grant).unwrap();
        assert_eq!(body["keyword_lock"], "^STARBUCKS");
        assert_eq!(body["merchant_lock"], serde_json::json!(["m_1", "m_2"]));
    }

    #[test]
    fn test_unexpected_lock_shape_still_decodes() {
        let grant: CardGrant =
            serde_json::from_str(r#"{"id": "cg_1", "merchant_lock": [123, 456], "keyword_lock": ""}"#)
                .unwrap();
        assert!(matches!(grant.merchant_lock, Some(SpendingLock::Other(_))));
        assert!(grant.is_merchant_locked());
        assert!(!grant.is_keyword_locked());
    }

    #[test]
    fn test_attach_threads_organization_into_disbursements() {
        let json = r#"{
            "id": "cg_1",
            "organization": {"id": "org_1", "name": "HQ"},
            "user": {"id": "usr_1"},
            "disbursements": [
                {"id": "xfr_1", "amount_cents": 100, "transaction_id": "txn_9"}
            ]
        }"#;

        let grant: CardGrant = serde_json::from_str(json).unwrap();
        let grant = grant.attach(&HcbClient::new("t").unwrap());

        assert!(grant.organization.as_ref().unwrap().is_attached());
        assert!(grant.user.as_ref().unwrap().is_attached());

        let transfer = &grant.disbursements.as_ref().unwrap()[0];
        assert!(transfer.is_attached());
        assert_eq!(transfer.organization().map(|org| org.id.as_str()), Some("org_1"));
    }

    #[test]
    fn test_new_card_grant_body() {
        let request = NewCardGrant::new(5_000, "user@example.com")
            .purpose("Hackathon snacks")
            .merchant_lock(["123", " 456 ", ""])
            .one_time_use(true);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "amount_cents": 5000,
                "email": "user@example.com",
                "purpose": "Hackathon snacks",
                "merchant_lock": "123,456",
                "one_time_use": true
            })
        );
    }

    #[test]
    fn test_empty_lock_list_is_omitted() {
        let update = CardGrantUpdate::default().category_lock(Vec::<String>::new());
        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({}));
    }
}

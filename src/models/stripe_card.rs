//! Stripe Issuing card models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{CardType, StripeCardStatus};
use super::organization::Organization;
use super::resource::{resource, Attachable};
use super::transaction_list::TransactionList;
use super::user::User;
use crate::api::CardTransactionsQuery;
use crate::client::HcbClient;
use crate::Result;

/// A Stripe Issuing card, virtual or physical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StripeCard {
    /// Unique card id
    pub id: String,
    /// Virtual or physical
    #[serde(rename = "type")]
    pub card_type: Option<CardType>,
    /// Current status
    pub status: Option<StripeCardStatus>,
    /// Card nickname
    pub name: Option<String>,
    /// Last four digits of the card number
    pub last4: Option<String>,
    /// Expiry month
    pub exp_month: Option<u32>,
    /// Expiry year
    pub exp_year: Option<i32>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Lifetime spend (expand `total_spent_cents`)
    pub total_spent_cents: Option<i64>,
    /// Spendable balance (expand `balance_available`)
    pub balance_available: Option<i64>,
    /// Issuing organization (expand `organization`)
    pub organization: Option<Organization>,
    /// Card holder (expand `user`)
    pub user: Option<User>,
    /// Physical card personalization
    pub personalization: Option<CardPersonalization>,
    /// Physical card shipping status
    pub shipping: Option<CardShipping>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(StripeCard, "StripeCard", nested = attach_nested);

impl StripeCard {
    fn attach_nested(&mut self, client: &HcbClient) {
        self.user = self.user.take().map(|user| user.attach(client));
        self.organization = self.organization.take().map(|org| org.attach(client));
    }

    /// Returns `true` for virtual cards.
    pub fn is_virtual(&self) -> bool {
        self.card_type == Some(CardType::Virtual)
    }

    /// Returns `true` for physical cards.
    pub fn is_physical(&self) -> bool {
        self.card_type == Some(CardType::Physical)
    }

    /// Fetch a fresh copy of this card.
    pub async fn reload(&self) -> Result<StripeCard> {
        let client = self.require_attached()?;
        client.stripe_cards().get(&self.id, &[]).await
    }

    /// Block new purchases until the card is defrosted.
    pub async fn freeze(&self) -> Result<StripeCard> {
        let client = self.require_attached()?;
        client
            .stripe_cards()
            .update_status(&self.id, StripeCardStatus::Frozen, None)
            .await
    }

    /// Unfreeze a frozen card.
    pub async fn defrost(&self) -> Result<StripeCard> {
        let client = self.require_attached()?;
        client
            .stripe_cards()
            .update_status(&self.id, StripeCardStatus::Active, None)
            .await
    }

    /// Activate a physical card once it arrives, confirming the last four
    /// digits printed on it.
    pub async fn activate(&self, last4: &str) -> Result<StripeCard> {
        let client = self.require_attached()?;
        client
            .stripe_cards()
            .update_status(&self.id, StripeCardStatus::Active, Some(last4))
            .await
    }

    /// Permanently cancel the card. Returns the raw response body.
    pub async fn cancel(&self) -> Result<serde_json::Value> {
        let client = self.require_attached()?;
        client.stripe_cards().cancel(&self.id).await
    }

    /// First page of this card's transactions.
    pub async fn transactions(&self, query: CardTransactionsQuery) -> Result<TransactionList> {
        let client = self.require_attached()?;
        client.stripe_cards().transactions(&self.id, query).await
    }

    /// Stripe ephemeral keys for revealing the full card details.
    pub async fn ephemeral_keys(
        &self,
        nonce: &str,
        stripe_version: Option<&str>,
    ) -> Result<serde_json::Value> {
        let client = self.require_attached()?;
        client
            .stripe_cards()
            .ephemeral_keys(&self.id, nonce, stripe_version)
            .await
    }
}

/// Physical card personalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPersonalization {
    /// Card color
    pub color: Option<String>,
    /// Logo printed on the card
    pub logo_url: Option<String>,
}

/// Shipping status of a physical card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardShipping {
    /// Shipping status
    pub status: Option<String>,
    /// Estimated arrival
    pub eta: Option<String>,
    /// Destination
    pub address: Option<CardShippingAddress>,
}

/// Destination of a physical card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardShippingAddress {
    /// Street address line 1
    pub line1: Option<String>,
    /// Street address line 2
    pub line2: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or province
    pub state: Option<String>,
    /// Country code
    pub country: Option<String>,
    /// Postal/ZIP code
    pub postal_code: Option<String>,
}

/// A design available for physical card personalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDesign {
    /// Design id
    pub id: String,
    /// Design name
    pub name: Option<String>,
    /// Base color
    pub color: Option<String>,
    /// Design status
    pub status: Option<String>,
    /// Hidden from the public picker
    pub unlisted: Option<bool>,
    /// Available to every organization
    pub common: Option<bool>,
    /// Logo URL
    pub logo_url: Option<String>,
}

/// Request body for issuing a Stripe card.
///
/// Sent as `{"card": {"organization_id": ..., ...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStripeCard {
    /// Virtual or physical
    pub card_type: CardType,
    /// Card nickname
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Physical card design
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_id: Option<String>,
    /// Shipping name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_name: Option<String>,
    /// Shipping street address line 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_line1: Option<String>,
    /// Shipping street address line 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_line2: Option<String>,
    /// Shipping city
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_city: Option<String>,
    /// Shipping state or province
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_state: Option<String>,
    /// Shipping postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_postal_code: Option<String>,
    /// Shipping country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_country: Option<String>,
}

impl NewStripeCard {
    /// A virtual card request.
    pub fn virtual_card() -> Self {
        Self::new(CardType::Virtual)
    }

    /// A physical card request; set the shipping address before sending.
    pub fn physical_card() -> Self {
        Self::new(CardType::Physical)
    }

    fn new(card_type: CardType) -> Self {
        Self {
            card_type,
            name: None,
            design_id: None,
            shipping_name: None,
            shipping_address_line1: None,
            shipping_address_line2: None,
            shipping_address_city: None,
            shipping_address_state: None,
            shipping_address_postal_code: None,
            shipping_address_country: None,
        }
    }

    /// Set the nickname.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the physical card design.
    pub fn design(mut self, design_id: impl Into<String>) -> Self {
        self.design_id = Some(design_id.into());
        self
    }

    /// Ship to `address`, addressed to `name`.
    pub fn ship_to(mut self, name: impl Into<String>, address: CardShippingAddress) -> Self {
        self.shipping_name = Some(name.into());
        self.shipping_address_line1 = address.line1;
        self.shipping_address_line2 = address.line2;
        self.shipping_address_city = address.city;
        self.shipping_address_state = address.state;
        self.shipping_address_postal_code = address.postal_code;
        self.shipping_address_country = address.country;
        self
    }
}

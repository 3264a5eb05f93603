//! Stripe cards service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::query::{is_blank, segment, ExpandQuery, StripeCardExpand};
use crate::client::{ClientInner, HcbClient};
use crate::models::resource::attach_all;
use crate::models::transaction_list::PaginationContext;
use crate::models::{
    Attachable, CardDesign, NewStripeCard, StripeCard, StripeCardStatus, TransactionList,
};
use crate::Result;

/// Service for Stripe Issuing cards.
///
/// # Example
///
/// ```no_run
/// use hcb_rs::api::CardTransactionsQuery;
///
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let card = client.stripe_cards().get("card_123", &[]).await?;
/// let card = card.freeze().await?;
///
/// let page = card
///     .transactions(CardTransactionsQuery::default().missing_receipts(true))
///     .await?;
/// println!("{} transactions need receipts", page.len());
/// # Ok(())
/// # }
/// ```
pub struct StripeCardsService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing a card's transactions.
///
/// Kept with the page so later pages reuse the same filters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardTransactionsQuery {
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor: return transactions after this id
    #[serde(skip_serializing_if = "is_blank")]
    pub after: Option<String>,
    /// Only transactions with (or without) a missing receipt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_receipts: Option<bool>,
}

impl CardTransactionsQuery {
    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filter on missing receipts.
    pub fn missing_receipts(mut self, missing: bool) -> Self {
        self.missing_receipts = Some(missing);
        self
    }
}

impl StripeCardsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn client(&self) -> HcbClient {
        HcbClient::from_inner(self.inner.clone())
    }

    fn card_path(id: &str) -> String {
        format!("/cards/{}", segment(id))
    }

    /// Cards held by the current user.
    pub async fn list(&self, expand: &[StripeCardExpand]) -> Result<Vec<StripeCard>> {
        let cards: Vec<StripeCard> = self
            .inner
            .get_with_query("/user/cards", &ExpandQuery { expand })
            .await?;
        Ok(attach_all(cards, &self.client()))
    }

    /// Cards issued by an organization.
    pub async fn for_organization(
        &self,
        organization_id: &str,
        expand: &[StripeCardExpand],
    ) -> Result<Vec<StripeCard>> {
        let cards: Vec<StripeCard> = self
            .inner
            .get_with_query(
                &format!("/organizations/{}/cards", segment(organization_id)),
                &ExpandQuery { expand },
            )
            .await?;
        Ok(attach_all(cards, &self.client()))
    }

    /// A card by id.
    pub async fn get(&self, id: &str, expand: &[StripeCardExpand]) -> Result<StripeCard> {
        let card: StripeCard = self
            .inner
            .get_with_query(&Self::card_path(id), &ExpandQuery { expand })
            .await?;
        Ok(card.attach(&self.client()))
    }

    /// Issue a card from an organization.
    pub async fn create(&self, organization_id: &str, request: &NewStripeCard) -> Result<StripeCard> {
        #[derive(Serialize)]
        struct Card<'a> {
            organization_id: &'a str,
            #[serde(flatten)]
            request: &'a NewStripeCard,
        }

        #[derive(Serialize)]
        struct Body<'a> {
            card: Card<'a>,
        }

        let body = Body {
            card: Card {
                organization_id,
                request,
            },
        };
        let card: StripeCard = self.inner.post("/cards", &body).await?;
        Ok(card.attach(&self.client()))
    }

    /// Change a card's status, e.g. freeze or activate it. `last4` is
    /// required when activating a physical card.
    pub async fn update_status(
        &self,
        id: &str,
        status: StripeCardStatus,
        last4: Option<&str>,
    ) -> Result<StripeCard> {
        #[derive(Serialize)]
        struct Body<'a> {
            status: StripeCardStatus,
            #[serde(skip_serializing_if = "Option::is_none")]
            last4: Option<&'a str>,
        }

        let card: StripeCard = self
            .inner
            .patch(&Self::card_path(id), &Body { status, last4 })
            .await?;
        Ok(card.attach(&self.client()))
    }

    /// Permanently cancel a card. Returns the raw response body.
    pub async fn cancel(&self, id: &str) -> Result<serde_json::Value> {
        self.inner
            .post_empty(&format!("{}/cancel", Self::card_path(id)))
            .await
    }

    /// Stripe ephemeral keys for revealing full card details.
    pub async fn ephemeral_keys(
        &self,
        id: &str,
        nonce: &str,
        stripe_version: Option<&str>,
    ) -> Result<serde_json::Value> {
        #[derive(Serialize)]
        struct Query<'a> {
            nonce: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            stripe_version: Option<&'a str>,
        }

        self.inner
            .get_with_query(
                &format!("{}/ephemeral_keys", Self::card_path(id)),
                &Query {
                    nonce,
                    stripe_version,
                },
            )
            .await
    }

    /// First page of a card's transactions.
    pub async fn transactions(&self, id: &str, query: CardTransactionsQuery) -> Result<TransactionList> {
        let page: TransactionList = self
            .inner
            .get_with_query(&format!("{}/transactions", Self::card_path(id)), &query)
            .await?;

        Ok(page.bind(
            &self.client(),
            PaginationContext::CardTransactions {
                card_id: id.to_string(),
                query,
            },
        ))
    }

    /// Designs available for physical cards, optionally for one
    /// organization.
    pub async fn card_designs(&self, event_id: Option<&str>) -> Result<Vec<CardDesign>> {
        #[derive(Serialize)]
        struct Query<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            event_id: Option<&'a str>,
        }

        self.inner
            .get_with_query("/cards/card_designs", &Query { event_id })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_transactions_query() {
        let request = reqwest::Client::new()
            .get("http://x.test/")
            .query(&CardTransactionsQuery::default().limit(5).missing_receipts(false))
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("limit=5&missing_receipts=false"));
    }
}

//! Card grants service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::query::{segment, CardGrantExpand, ExpandQuery};
use crate::client::{ClientInner, HcbClient};
use crate::models::resource::attach_all;
use crate::models::{Attachable, CardGrant, CardGrantUpdate, NewCardGrant};
use crate::Result;

/// Service for card grants.
///
/// # Example
///
/// ```no_run
/// use hcb_rs::models::NewCardGrant;
///
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let grant = client
///     .card_grants()
///     .create(
///         "hq",
///         &NewCardGrant::new(5_000, "member@example.com").purpose("Travel"),
///     )
///     .await?;
///
/// // Every action returns a new snapshot.
/// let grant = grant.topup(2_500).await?;
/// println!("{:?}", grant.amount_cents);
/// # Ok(())
/// # }
/// ```
pub struct CardGrantsService {
    inner: Arc<ClientInner>,
}

#[derive(Serialize)]
struct AmountBody {
    amount_cents: i64,
}

impl CardGrantsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn client(&self) -> HcbClient {
        HcbClient::from_inner(self.inner.clone())
    }

    fn grant_path(id: &str) -> String {
        format!("/card_grants/{}", segment(id))
    }

    /// Card grants issued to the current user.
    pub async fn list(&self, expand: &[CardGrantExpand]) -> Result<Vec<CardGrant>> {
        let grants: Vec<CardGrant> = self
            .inner
            .get_with_query("/user/card_grants", &ExpandQuery { expand })
            .await?;
        Ok(attach_all(grants, &self.client()))
    }

    /// Card grants issued by an organization.
    pub async fn for_organization(
        &self,
        organization_id: &str,
        expand: &[CardGrantExpand],
    ) -> Result<Vec<CardGrant>> {
        let grants: Vec<CardGrant> = self
            .inner
            .get_with_query(
                &format!("/organizations/{}/card_grants", segment(organization_id)),
                &ExpandQuery { expand },
            )
            .await?;
        Ok(attach_all(grants, &self.client()))
    }

    /// A card grant by id.
    pub async fn get(&self, id: &str, expand: &[CardGrantExpand]) -> Result<CardGrant> {
        let grant: CardGrant = self
            .inner
            .get_with_query(&Self::grant_path(id), &ExpandQuery { expand })
            .await?;
        Ok(grant.attach(&self.client()))
    }

    /// Issue a card grant from an organization.
    pub async fn create(&self, organization_id: &str, request: &NewCardGrant) -> Result<CardGrant> {
        let grant: CardGrant = self
            .inner
            .post(
                &format!("/organizations/{}/card_grants", segment(organization_id)),
                request,
            )
            .await?;
        Ok(grant.attach(&self.client()))
    }

    /// Update a grant's restrictions or purpose.
    pub async fn update(&self, id: &str, update: &CardGrantUpdate) -> Result<CardGrant> {
        let grant: CardGrant = self.inner.patch(&Self::grant_path(id), update).await?;
        Ok(grant.attach(&self.client()))
    }

    /// Add funds to a grant.
    pub async fn topup(&self, id: &str, amount_cents: i64) -> Result<CardGrant> {
        self.post_action(id, "topup", Some(amount_cents)).await
    }

    /// Pull funds back to the organization.
    pub async fn withdraw(&self, id: &str, amount_cents: i64) -> Result<CardGrant> {
        self.post_action(id, "withdraw", Some(amount_cents)).await
    }

    /// Cancel a grant.
    pub async fn cancel(&self, id: &str) -> Result<CardGrant> {
        self.post_action(id, "cancel", None).await
    }

    /// Activate a pending grant.
    pub async fn activate(&self, id: &str) -> Result<CardGrant> {
        self.post_action(id, "activate", None).await
    }

    async fn post_action(
        &self,
        id: &str,
        action: &str,
        amount_cents: Option<i64>,
    ) -> Result<CardGrant> {
        let path = format!("{}/{}", Self::grant_path(id), action);
        let grant: CardGrant = match amount_cents {
            Some(amount_cents) => self.inner.post(&path, &AmountBody { amount_cents }).await?,
            None => self.inner.post_empty(&path).await?,
        };
        Ok(grant.attach(&self.client()))
    }
}

//! Disbursement and ACH transfer service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::query::segment;
use crate::client::{ClientInner, HcbClient};
use crate::models::{Attachable, NewAchTransfer, NewDisbursement, Organization, Transfer};
use crate::Result;

/// Service for moving money out of an organization.
///
/// # Example
///
/// ```no_run
/// use hcb_rs::models::NewDisbursement;
///
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let transfer = client
///     .transfers()
///     .create_disbursement("hq", &NewDisbursement::new("robotics", 10_000, "Season budget"))
///     .await?;
///
/// // The ledger entry can be fetched through the transfer.
/// let txn = transfer.transaction().await?;
/// println!("{:?}", txn.memo);
/// # Ok(())
/// # }
/// ```
pub struct TransfersService {
    inner: Arc<ClientInner>,
}

impl TransfersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Move funds from `organization_id` to another organization.
    ///
    /// The returned transfer carries a stub of the sending organization.
    pub async fn create_disbursement(
        &self,
        organization_id: &str,
        request: &NewDisbursement,
    ) -> Result<Transfer> {
        let client = HcbClient::from_inner(self.inner.clone());
        let transfer: Transfer = self
            .inner
            .post(
                &format!("/organizations/{}/transfers", segment(organization_id)),
                request,
            )
            .await?;

        let organization = Organization::of_id(organization_id, Some(client.clone()));
        Ok(transfer.with_organization(Some(organization)).attach(&client))
    }

    /// Send money from `organization_id` to a bank account. Returns the raw
    /// response body.
    pub async fn create_ach_transfer(
        &self,
        organization_id: &str,
        request: &NewAchTransfer,
    ) -> Result<serde_json::Value> {
        #[derive(Serialize)]
        struct Body<'a> {
            ach_transfer: &'a NewAchTransfer,
        }

        self.inner
            .post(
                &format!("/organizations/{}/ach_transfers", segment(organization_id)),
                &Body {
                    ach_transfer: request,
                },
            )
            .await
    }
}

//! Donations service.

use std::sync::Arc;

use crate::client::query::segment;
use crate::client::ClientInner;
use crate::models::{Donation, NewDonation};
use crate::Result;

/// Service for recording in-person donations.
pub struct DonationsService {
    inner: Arc<ClientInner>,
}

impl DonationsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Record a cash or check donation to an organization.
    pub async fn create(&self, organization_id: &str, request: &NewDonation) -> Result<Donation> {
        self.inner
            .post(
                &format!("/organizations/{}/donations", segment(organization_id)),
                request,
            )
            .await
    }
}

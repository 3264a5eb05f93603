//! Sponsors service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::query::segment;
use crate::client::{ClientInner, HcbClient};
use crate::models::resource::attach_all;
use crate::models::{Attachable, NewSponsor, Sponsor};
use crate::Result;

/// Service for sponsors.
pub struct SponsorsService {
    inner: Arc<ClientInner>,
}

impl SponsorsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn client(&self) -> HcbClient {
        HcbClient::from_inner(self.inner.clone())
    }

    /// Sponsors of an organization.
    pub async fn list(&self, organization_id: &str) -> Result<Vec<Sponsor>> {
        let sponsors: Vec<Sponsor> = self
            .inner
            .get(&format!("/organizations/{}/sponsors", segment(organization_id)))
            .await?;
        Ok(attach_all(sponsors, &self.client()))
    }

    /// A sponsor by id.
    pub async fn get(&self, id: &str) -> Result<Sponsor> {
        let sponsor: Sponsor = self.inner.get(&format!("/sponsors/{}", segment(id))).await?;
        Ok(sponsor.attach(&self.client()))
    }

    /// Create a sponsor for an organization.
    pub async fn create(&self, organization_id: &str, request: &NewSponsor) -> Result<Sponsor> {
        #[derive(Serialize)]
        struct Body<'a> {
            organization_id: &'a str,
            sponsor: &'a NewSponsor,
        }

        let sponsor: Sponsor = self
            .inner
            .post(
                "/sponsors",
                &Body {
                    organization_id,
                    sponsor: request,
                },
            )
            .await?;
        Ok(sponsor.attach(&self.client()))
    }
}

//! Organizations service.

use std::sync::Arc;

use serde::Deserialize;

use crate::client::query::{segment, ExpandQuery, OrganizationExpand};
use crate::client::{ClientInner, HcbClient};
use crate::models::resource::attach_all;
use crate::models::{Attachable, NewSubOrganization, Organization, User};
use crate::Result;

/// Service for organizations (also called events).
///
/// # Example
///
/// ```no_run
/// use hcb_rs::OrganizationExpand;
///
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let orgs = client
///     .organizations()
///     .list(&[OrganizationExpand::BalanceCents])
///     .await?;
///
/// for org in &orgs {
///     println!("{:?}: {:?} cents", org.name, org.balance_cents);
/// }
/// # Ok(())
/// # }
/// ```
pub struct OrganizationsService {
    inner: Arc<ClientInner>,
}

impl OrganizationsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn client(&self) -> HcbClient {
        HcbClient::from_inner(self.inner.clone())
    }

    /// Organizations the current user belongs to.
    pub async fn list(&self, expand: &[OrganizationExpand]) -> Result<Vec<Organization>> {
        let orgs: Vec<Organization> = self
            .inner
            .get_with_query("/user/organizations", &ExpandQuery { expand })
            .await?;
        Ok(attach_all(orgs, &self.client()))
    }

    /// An organization by id or slug.
    pub async fn get(&self, id: &str, expand: &[OrganizationExpand]) -> Result<Organization> {
        let org: Organization = self
            .inner
            .get_with_query(
                &format!("/organizations/{}", segment(id)),
                &ExpandQuery { expand },
            )
            .await?;
        Ok(org.attach(&self.client()))
    }

    /// Users following a transparent organization.
    pub async fn followers(&self, id: &str) -> Result<Vec<User>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            followers: Option<Vec<User>>,
        }

        let response: Response = self
            .inner
            .get(&format!("/organizations/{}/followers", segment(id)))
            .await?;
        Ok(attach_all(
            response.followers.unwrap_or_default(),
            &self.client(),
        ))
    }

    /// Child organizations.
    pub async fn sub_organizations(&self, id: &str) -> Result<Vec<Organization>> {
        let orgs: Vec<Organization> = self
            .inner
            .get(&format!("/organizations/{}/sub_organizations", segment(id)))
            .await?;
        Ok(attach_all(orgs, &self.client()))
    }

    /// Create a sub-organization under `parent_id`.
    pub async fn create_sub_organization(
        &self,
        parent_id: &str,
        request: &NewSubOrganization,
    ) -> Result<Organization> {
        let org: Organization = self
            .inner
            .post(
                &format!("/organizations/{}/sub_organizations", segment(parent_id)),
                request,
            )
            .await?;
        Ok(org.attach(&self.client()))
    }
}

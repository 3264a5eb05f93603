//! Invitations service.

use std::sync::Arc;

use serde::Serialize;

use crate::client::query::segment;
use crate::client::{ClientInner, HcbClient};
use crate::models::resource::attach_all;
use crate::models::{Attachable, Invitation, NewInvitation};
use crate::Result;

/// Service for organization invitations.
pub struct InvitationsService {
    inner: Arc<ClientInner>,
}

impl InvitationsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn client(&self) -> HcbClient {
        HcbClient::from_inner(self.inner.clone())
    }

    fn invitation_path(id: &str) -> String {
        format!("/user/invitations/{}", segment(id))
    }

    /// Pending invitations for the current user.
    pub async fn list(&self) -> Result<Vec<Invitation>> {
        let invitations: Vec<Invitation> = self.inner.get("/user/invitations").await?;
        Ok(attach_all(invitations, &self.client()))
    }

    /// An invitation by id.
    pub async fn get(&self, id: &str) -> Result<Invitation> {
        let invitation: Invitation = self.inner.get(&Self::invitation_path(id)).await?;
        Ok(invitation.attach(&self.client()))
    }

    /// Invite someone to an organization.
    pub async fn create(&self, organization_id: &str, request: &NewInvitation) -> Result<Invitation> {
        #[derive(Serialize)]
        struct Body<'a> {
            event_id: &'a str,
            #[serde(flatten)]
            request: &'a NewInvitation,
        }

        let invitation: Invitation = self
            .inner
            .post(
                "/user/invitations",
                &Body {
                    event_id: organization_id,
                    request,
                },
            )
            .await?;
        Ok(invitation.attach(&self.client()))
    }

    /// Accept an invitation.
    pub async fn accept(&self, id: &str) -> Result<Invitation> {
        let invitation: Invitation = self
            .inner
            .post_empty(&format!("{}/accept", Self::invitation_path(id)))
            .await?;
        Ok(invitation.attach(&self.client()))
    }

    /// Decline an invitation.
    pub async fn reject(&self, id: &str) -> Result<Invitation> {
        let invitation: Invitation = self
            .inner
            .post_empty(&format!("{}/reject", Self::invitation_path(id)))
            .await?;
        Ok(invitation.attach(&self.client()))
    }
}

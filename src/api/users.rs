//! Users service.

use std::sync::Arc;

use crate::client::query::segment;
use crate::client::{ClientInner, HcbClient};
use crate::models::{Attachable, User};
use crate::Result;

/// Service for user lookups.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let me = client.users().me().await?;
/// println!("{} <{:?}>", me.id, me.email);
/// # Ok(())
/// # }
/// ```
pub struct UsersService {
    inner: Arc<ClientInner>,
}

impl UsersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn attach(&self, user: User) -> User {
        user.attach(&HcbClient::from_inner(self.inner.clone()))
    }

    /// The authenticated user.
    pub async fn me(&self) -> Result<User> {
        let user: User = self.inner.get("/user").await?;
        Ok(self.attach(user))
    }

    /// A user by id. Admin only.
    pub async fn get(&self, id: &str) -> Result<User> {
        let user: User = self.inner.get(&format!("/users/{}", segment(id))).await?;
        Ok(self.attach(user))
    }

    /// A user by email address. Admin only.
    pub async fn by_email(&self, email: &str) -> Result<User> {
        let user: User = self
            .inner
            .get(&format!("/users/by_email/{}", segment(email)))
            .await?;
        Ok(self.attach(user))
    }

    /// Profile icons the current user can choose from.
    pub async fn available_icons(&self) -> Result<serde_json::Value> {
        self.inner.get("/user/available_icons").await
    }

    /// Beacon configuration for the current user.
    pub async fn beacon_config(&self) -> Result<serde_json::Value> {
        self.inner.get("/user/beacon_config").await
    }
}

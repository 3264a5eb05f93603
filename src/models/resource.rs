//! The capability shared by every entity that can act on the API.
//!
//! An entity is *attached* when it carries an [`HcbClient`] handle and
//! *detached* otherwise (e.g. one decoded by hand in a test). Actions check
//! attachment first and fail locally with [`Error::DetachedEntity`] before
//! any request is made.
//!
//! Every action returns a fresh snapshot; entities are never updated in place.

use crate::client::HcbClient;
use crate::{Error, Result};

/// An entity identified by a stable id that can be bound to a client.
pub trait Attachable: Sized {
    /// Type name used in error messages.
    const KIND: &'static str;

    /// The entity id.
    fn id(&self) -> &str;

    /// The bound client, if any.
    fn client(&self) -> Option<&HcbClient>;

    /// Build a stub: only the id and client are set, every other field is
    /// absent. Absent fields on a stub are unknown, not false or zero.
    fn of_id(id: impl Into<String>, client: Option<HcbClient>) -> Self;

    /// Bind `client` to this entity and to any nested resources it carries.
    fn attach(self, client: &HcbClient) -> Self;

    /// Returns `true` if a client is bound.
    fn is_attached(&self) -> bool {
        self.client().is_some()
    }

    /// Return the bound client or fail with [`Error::DetachedEntity`].
    fn require_attached(&self) -> Result<&HcbClient> {
        self.client()
            .ok_or(Error::DetachedEntity { entity: Self::KIND })
    }
}

/// Implements [`Attachable`] and id-only equality for an entity struct with
/// `id: String` and `client: Option<HcbClient>` fields that derives `Default`.
///
/// The optional `nested = method` names an inherent
/// `fn(&mut self, &HcbClient)` that threads the client into children.
macro_rules! resource {
    ($ty:ident, $kind:literal) => {
        resource!(@impl $ty, $kind, |_this, _client| {});
    };
    ($ty:ident, $kind:literal, nested = $nested:ident) => {
        resource!(@impl $ty, $kind, |this, client| { this.$nested(client); });
    };
    (@impl $ty:ident, $kind:literal, |$this:ident, $client:ident| $body:block) => {
        impl $crate::models::resource::Attachable for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn client(&self) -> Option<&$crate::client::HcbClient> {
                self.client.as_ref()
            }

            fn of_id(
                id: impl Into<String>,
                client: Option<$crate::client::HcbClient>,
            ) -> Self {
                Self {
                    id: id.into(),
                    client,
                    ..Default::default()
                }
            }

            fn attach(mut self, client: &$crate::client::HcbClient) -> Self {
                self.client = Some(client.clone());
                {
                    let $this = &mut self;
                    let $client = client;
                    $body
                }
                self
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
    };
}

pub(crate) use resource;

/// Attach every element of a decoded list.
pub(crate) fn attach_all<T: Attachable>(items: Vec<T>, client: &HcbClient) -> Vec<T> {
    items.into_iter().map(|item| item.attach(client)).collect()
}

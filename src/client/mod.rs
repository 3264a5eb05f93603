//! HTTP client and transport core for the HCB API.
//!
//! This module provides the main entry point [`HcbClient`]. Every request
//! goes through one path: refresh the token if it reports itself expired,
//! attach the bearer header, send, then decode the body or map the failure
//! into an [`Error`](crate::Error).
//!
//! # Example
//!
//! ```no_run
//! use hcb_rs::{ClientConfig, HcbClient, OAuthCredentials};
//!
//! # async fn example() -> hcb_rs::Result<()> {
//! let credentials = OAuthCredentials::new("client-id", "client-secret", "access", "refresh");
//! let config = ClientConfig::default().with_refresh_buffer(30);
//! let client = HcbClient::from_credentials_with_config(credentials, config)?;
//!
//! let me = client.users().me().await?;
//! println!("Signed in as {:?}", me.name);
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;
pub(crate) mod query;

pub use config::{ClientConfig, API_PATH, DEFAULT_BASE_URL};
pub use http::HcbClient;
pub use paginated::{PageStream, DEFAULT_MAX_PAGES};
pub use query::{CardGrantExpand, OrganizationExpand, StripeCardExpand, TransactionExpand};
pub(crate) use http::ClientInner;

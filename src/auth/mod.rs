//! Authentication and session management for the HCB API.
//!
//! HCB uses OAuth 2.0 bearer tokens. A [`Session`] holds the current
//! [`AccessToken`]; when the token carries an expiry and refresh
//! credentials, the client exchanges the refresh token for a new access
//! token before any request that would otherwise be sent with an expired one.
//!
//! # Static token
//!
//! ```
//! use hcb_rs::Session;
//!
//! let session = Session::new("my-access-token");
//! ```
//!
//! # Refreshable OAuth credentials
//!
//! ```
//! use hcb_rs::{OAuthCredentials, Session};
//!
//! let creds = OAuthCredentials::new("client-id", "client-secret", "access", "refresh");
//! let session = Session::from_credentials(creds, "https://hcb.hackclub.com");
//! ```

mod session;

pub use session::{AccessToken, OAuthCredentials, Session};

//! # hcb-rs
//!
//! An async Rust client for the HCB v4 ledger API.
//!
//! HCB hosts fiscally sponsored organizations. This crate gives typed access
//! to organizations, their ledgers, card grants, Stripe cards, invoices,
//! sponsors, transfers, receipts and invitations.
//!
//! ## Features
//!
//! - **Authentication**: static bearer tokens or refreshable OAuth credentials
//! - **Active entities**: fetched entities keep a client handle and can act on
//!   the API themselves (`card_grant.topup(500)`, `txn.comments()`)
//! - **Stubs**: build an id-only entity and act on it without fetching it
//! - **Typed transactions**: every ledger entry reports its kind and details
//! - **Pagination**: page-by-page, streaming, or collect-all with a page cap
//! - **Typed errors**: server failures map to a flat [`ApiErrorKind`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hcb_rs::HcbClient;
//!
//! #[tokio::main]
//! async fn main() -> hcb_rs::Result<()> {
//!     let client = HcbClient::new("my-access-token")?;
//!
//!     let orgs = client.organizations().list(&[]).await?;
//!     for org in &orgs {
//!         println!("{} ({:?})", org.id, org.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Walking a ledger
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use hcb_rs::api::{TransactionFilters, TransactionsQuery};
//! use hcb_rs::models::{Organization, TransactionDetail};
//! use hcb_rs::HcbClient;
//!
//! #[tokio::main]
//! async fn main() -> hcb_rs::Result<()> {
//!     let client = HcbClient::from_env()?;
//!     let org: Organization = client.stub("hq");
//!
//!     let query = TransactionsQuery::default()
//!         .limit(50)
//!         .filters(TransactionFilters::default().missing_receipts());
//!     let page = org.transactions(query).await?;
//!
//!     let mut items = page.auto_paginate(Some(5));
//!     while let Some(txn) = items.next().await {
//!         let txn = txn?;
//!         let amount = txn.details().and_then(|d| d.as_detail().amount_cents());
//!         println!("{} {} {:?}", txn.id, txn.kind(), amount);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Acting on stubs
//!
//! ```rust,no_run
//! use hcb_rs::models::CardGrant;
//! use hcb_rs::HcbClient;
//!
//! #[tokio::main]
//! async fn main() -> hcb_rs::Result<()> {
//!     let client = HcbClient::new("my-access-token")?;
//!
//!     // No fetch happens here.
//!     let grant: CardGrant = client.stub("cdg_123");
//!     let grant = grant.topup(2_500).await?;
//!     println!("New balance: {:?}", grant.balance_cents);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{AccessToken, OAuthCredentials, Session};
pub use client::{
    CardGrantExpand, ClientConfig, HcbClient, OrganizationExpand, PageStream, StripeCardExpand,
    TransactionExpand, DEFAULT_MAX_PAGES,
};
pub use error::{ApiErrorKind, AuthErrorKind, Error, Result};

/// Prelude module for convenient imports.
///
/// ```rust
/// use hcb_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{MissingReceiptQuery, TransactionFilters, TransactionsQuery};
    pub use crate::auth::{OAuthCredentials, Session};
    pub use crate::client::{
        CardGrantExpand, ClientConfig, HcbClient, OrganizationExpand, StripeCardExpand,
        TransactionExpand,
    };
    pub use crate::error::{ApiErrorKind, AuthErrorKind, Error, Result};
    pub use crate::models::{
        // Capabilities
        Attachable, TransactionDetail,
        // Core entities
        CardGrant, Invoice, Organization, Sponsor, StripeCard, Transaction, TransactionList,
        TransactionType, Transfer, User,
        // Requests
        NewCardGrant, NewComment, NewDisbursement, NewInvoice, NewSponsor, NewStripeCard,
        FileUpload,
    };
}

//! Data models for the HCB API.
//!
//! Every entity carries an optional client handle. Entities returned by a
//! service are attached to the client that fetched them; stubs built with
//! [`Attachable::of_id`] or [`HcbClient::stub`](crate::HcbClient::stub) carry
//! only an id. Models are organized by domain:
//!
//! - [`resource`] - The [`Attachable`] trait shared by all entities
//! - [`enums`] - Roles, card types and card statuses
//! - [`user`] - Users and organization members
//! - [`organization`] - Organizations and their actions
//! - [`transaction`] - Ledger transactions and their kind
//! - [`details`] - Kind-specific transaction details
//! - [`transaction_list`] - Cursor-paginated transaction pages
//! - [`card_grant`], [`stripe_card`] - Spending instruments
//! - [`invoice`], [`sponsor`], [`donation`], [`transfer`] - Money movement
//! - [`receipt`], [`comment`], [`invitation`] - Everything else

pub mod card_grant;
pub mod comment;
pub mod details;
pub mod donation;
pub mod enums;
pub mod invitation;
pub mod invoice;
pub mod organization;
pub mod receipt;
pub mod resource;
pub mod sponsor;
pub mod stripe_card;
pub mod transaction;
pub mod transaction_list;
pub mod transfer;
pub mod user;

// Re-export commonly used types
pub use card_grant::*;
pub use comment::*;
pub use details::*;
pub use donation::*;
pub use enums::*;
pub use invitation::*;
pub use invoice::*;
pub use organization::*;
pub use receipt::*;
pub use resource::Attachable;
pub use sponsor::*;
pub use stripe_card::*;
pub use transaction::*;
pub use transaction_list::TransactionList;
pub use transfer::*;
pub use user::*;

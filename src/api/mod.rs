//! API service modules for HCB endpoints.
//!
//! Each service covers one area of the v4 API and is obtained from
//! [`HcbClient`](crate::HcbClient) (`client.organizations()`,
//! `client.card_grants()`, ...). Entities returned by a service are attached
//! to the client, so they can act on the API themselves.

mod card_grants;
mod donations;
mod invitations;
mod invoices;
mod organizations;
mod receipts;
mod sponsors;
mod stripe_cards;
mod terminal;
mod transactions;
mod transfers;
mod users;

pub use card_grants::CardGrantsService;
pub use donations::DonationsService;
pub use invitations::InvitationsService;
pub use invoices::InvoicesService;
pub use organizations::OrganizationsService;
pub use receipts::ReceiptsService;
pub use sponsors::SponsorsService;
pub use stripe_cards::{CardTransactionsQuery, StripeCardsService};
pub use terminal::TerminalService;
pub use transactions::{
    MissingReceiptQuery, TransactionFilters, TransactionsQuery, TransactionsService,
};
pub use transfers::TransfersService;
pub use users::UsersService;

//! Cursor-paginated transaction listings.
//!
//! A [`TransactionList`] is one page. It remembers which endpoint produced it
//! and with which filters, so [`next_page`](TransactionList::next_page) can
//! ask the same endpoint for the entries after the last one on this page.

use futures_util::future::BoxFuture;
use futures_util::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Deserializer, Serialize};

use super::organization::Organization;
use super::resource::Attachable;
use super::transaction::Transaction;
use crate::api::{CardTransactionsQuery, MissingReceiptQuery, TransactionsQuery};
use crate::client::paginated::{PageStream, DEFAULT_MAX_PAGES};
use crate::client::HcbClient;
use crate::Result;

/// The endpoint a page came from, with its original filters.
#[derive(Debug, Clone)]
pub(crate) enum PaginationContext {
    /// `GET /organizations/{id}/transactions`
    OrganizationTransactions {
        organization_id: String,
        query: TransactionsQuery,
    },
    /// `GET /user/transactions/missing_receipt`
    MissingReceipt { query: MissingReceiptQuery },
    /// `GET /cards/{id}/transactions`
    CardTransactions {
        card_id: String,
        query: CardTransactionsQuery,
    },
}

impl PaginationContext {
    /// Request the page after `after` from the same endpoint.
    async fn fetch(self, client: HcbClient, after: String) -> Result<TransactionList> {
        match self {
            PaginationContext::OrganizationTransactions {
                organization_id,
                mut query,
            } => {
                query.after = Some(after);
                client.transactions().list(&organization_id, query).await
            }
            PaginationContext::MissingReceipt { mut query } => {
                query.after = Some(after);
                client.transactions().missing_receipt(query).await
            }
            PaginationContext::CardTransactions { card_id, mut query } => {
                query.after = Some(after);
                client.stripe_cards().transactions(&card_id, query).await
            }
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of transactions.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use hcb_rs::api::TransactionsQuery;
///
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let page = client
///     .transactions()
///     .list("hq", TransactionsQuery::default().limit(50))
///     .await?;
///
/// let mut transactions = page.auto_paginate(Some(10));
/// while let Some(txn) = transactions.next().await {
///     let txn = txn?;
///     println!("{} {:?}", txn.id, txn.amount_cents);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionList {
    /// Transactions on this page, in server order
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Transaction>,
    /// Total matching transactions, when the server reports it
    pub total_count: Option<u64>,
    /// Whether more pages follow
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_more: bool,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
    #[serde(skip)]
    pub(crate) context: Option<PaginationContext>,
}

impl TransactionList {
    /// Attach the page and its transactions, and record where it came from.
    ///
    /// Transactions listed through an organization inherit it when the
    /// response omits one.
    pub(crate) fn bind(mut self, client: &HcbClient, context: PaginationContext) -> Self {
        let organization = match &context {
            PaginationContext::OrganizationTransactions {
                organization_id, ..
            } => Some(Organization::of_id(
                organization_id.as_str(),
                Some(client.clone()),
            )),
            _ => None,
        };

        self.data = self
            .data
            .into_iter()
            .map(|txn| {
                let txn = txn.attach(client);
                match &organization {
                    Some(org) if txn.organization.is_none() => {
                        txn.with_organization(Some(org.clone()))
                    }
                    _ => txn,
                }
            })
            .collect();
        self.client = Some(client.clone());
        self.context = Some(context);
        self
    }

    /// Number of transactions on this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this page has no transactions.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over this page's transactions.
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.data.iter()
    }

    /// Returns `true` if the page is bound to a client.
    pub fn is_attached(&self) -> bool {
        self.client.is_some()
    }

    /// The request for the following page, or `None` when there is none to
    /// make: no more pages, no client, no endpoint context, or an empty page
    /// (no cursor).
    pub(crate) fn next_page_request(&self) -> Option<BoxFuture<'static, Result<TransactionList>>> {
        if !self.has_more {
            return None;
        }
        let client = self.client.clone()?;
        let context = self.context.clone()?;
        let after = self.data.last()?.id.clone();
        Some(Box::pin(context.fetch(client, after)))
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` when there are no more pages or this page cannot
    /// continue (detached, or not produced by a listing call).
    pub async fn next_page(&self) -> Result<Option<TransactionList>> {
        match self.next_page_request() {
            Some(request) => request.await.map(Some),
            None => Ok(None),
        }
    }

    /// Lazily walk the pages, starting with this one.
    pub fn each_page(self) -> PageStream {
        PageStream::new(self)
    }

    /// Lazily walk every transaction across pages.
    ///
    /// With `max_pages`, at most that many pages (this one included) are
    /// consumed, whether or not more remain.
    pub fn auto_paginate(
        self,
        max_pages: Option<usize>,
    ) -> impl Stream<Item = Result<Transaction>> + Send + 'static {
        self.each_page()
            .take(max_pages.unwrap_or(usize::MAX))
            .flat_map(|page| {
                let items: Vec<Result<Transaction>> = match page {
                    Ok(page) => page.data.into_iter().map(Ok).collect(),
                    Err(e) => vec![Err(e)],
                };
                stream::iter(items)
            })
    }

    /// Collect every transaction, following at most [`DEFAULT_MAX_PAGES`]
    /// pages.
    pub async fn all(self) -> Result<Vec<Transaction>> {
        self.all_with_max_pages(DEFAULT_MAX_PAGES).await
    }

    /// Collect every transaction, following at most `max_pages` pages.
    pub async fn all_with_max_pages(self, max_pages: usize) -> Result<Vec<Transaction>> {
        self.auto_paginate(Some(max_pages)).try_collect().await
    }
}

impl IntoIterator for TransactionList {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a TransactionList {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

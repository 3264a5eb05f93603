//! Transactions service for organization ledgers.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::multipart::Form;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::query::{comma_separated, is_blank, segment, ExpandQuery, TransactionExpand};
use crate::client::{ClientInner, HcbClient};
use crate::models::transaction_list::PaginationContext;
use crate::models::{
    Attachable, Comment, NewComment, Transaction, TransactionList, TransactionType,
};
use crate::Result;

/// Service for ledger transactions.
///
/// # Example
///
/// ```no_run
/// use hcb_rs::api::{TransactionFilters, TransactionsQuery};
///
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let query = TransactionsQuery::default()
///     .limit(25)
///     .filters(TransactionFilters::default().search("pizza"));
///
/// let page = client.transactions().list("hq", query).await?;
/// for txn in &page {
///     println!("{}: {:?} ({})", txn.id, txn.memo, txn.kind());
/// }
/// # Ok(())
/// # }
/// ```
pub struct TransactionsService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing an organization's transactions.
///
/// Kept with the page so later pages reuse the same filters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionsQuery {
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor: return transactions after this id
    #[serde(skip_serializing_if = "is_blank")]
    pub after: Option<String>,
    /// Only transactions of this type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// Search and range filters
    #[serde(flatten)]
    pub filters: TransactionFilters,
    /// Fields to expand
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_separated")]
    pub expand: Vec<TransactionExpand>,
}

impl TransactionsQuery {
    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Start after the given transaction id.
    pub fn after(mut self, transaction_id: impl Into<String>) -> Self {
        self.after = Some(transaction_id.into());
        self
    }

    /// Only return transactions of `kind`.
    pub fn of_type(mut self, kind: TransactionType) -> Self {
        self.transaction_type = Some(kind);
        self
    }

    /// Set the filters.
    pub fn filters(mut self, filters: TransactionFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Expand optional fields.
    pub fn expand(mut self, expand: &[TransactionExpand]) -> Self {
        self.expand = expand.to_vec();
        self
    }
}

/// Filters for organization transaction listings, sent as `filters[...]`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionFilters {
    /// Free-text search
    #[serde(rename = "filters[search]", skip_serializing_if = "is_blank")]
    pub search: Option<String>,
    /// Tag id
    #[serde(rename = "filters[tag_id]", skip_serializing_if = "is_blank")]
    pub tag_id: Option<String>,
    /// Expense type
    #[serde(rename = "filters[expense_type]", skip_serializing_if = "is_blank")]
    pub expense_type: Option<String>,
    /// Smallest amount, in dollars
    #[serde(rename = "filters[minimum_amount]", skip_serializing_if = "Option::is_none")]
    pub minimum_amount: Option<Decimal>,
    /// Largest amount, in dollars
    #[serde(rename = "filters[maximum_amount]", skip_serializing_if = "Option::is_none")]
    pub maximum_amount: Option<Decimal>,
    /// Earliest date
    #[serde(rename = "filters[start_date]", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Latest date
    #[serde(rename = "filters[end_date]", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Only transactions by this user
    #[serde(rename = "filters[user_id]", skip_serializing_if = "is_blank")]
    pub user_id: Option<String>,
    /// Only transactions that still need a receipt
    #[serde(rename = "filters[missing_receipts]", skip_serializing_if = "Option::is_none")]
    pub missing_receipts: Option<bool>,
}

impl TransactionFilters {
    /// Free-text search.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restrict to a tag.
    pub fn tag(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_id = Some(tag_id.into());
        self
    }

    /// Restrict to a date range (inclusive).
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Only transactions missing a receipt.
    pub fn missing_receipts(mut self) -> Self {
        self.missing_receipts = Some(true);
        self
    }
}

/// Query parameters for the current user's transactions missing a receipt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MissingReceiptQuery {
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor: return transactions after this id
    #[serde(skip_serializing_if = "is_blank")]
    pub after: Option<String>,
}

impl MissingReceiptQuery {
    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Serialize)]
struct LookupQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<&'a str>,
    #[serde(flatten)]
    expand: ExpandQuery<'a, TransactionExpand>,
}

impl TransactionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn client(&self) -> HcbClient {
        HcbClient::from_inner(self.inner.clone())
    }

    fn transaction_path(organization_id: &str, transaction_id: &str) -> String {
        format!(
            "/organizations/{}/transactions/{}",
            segment(organization_id),
            segment(transaction_id)
        )
    }

    /// First page of an organization's transactions (id or slug).
    pub async fn list(&self, organization_id: &str, query: TransactionsQuery) -> Result<TransactionList> {
        let path = format!("/organizations/{}/transactions", segment(organization_id));
        let page: TransactionList = self.inner.get_with_query(&path, &query).await?;

        Ok(page.bind(
            &self.client(),
            PaginationContext::OrganizationTransactions {
                organization_id: organization_id.to_string(),
                query,
            },
        ))
    }

    /// Get a transaction by id, optionally scoped to an organization.
    pub async fn get(
        &self,
        id: &str,
        event_id: Option<&str>,
        expand: &[TransactionExpand],
    ) -> Result<Transaction> {
        let query = LookupQuery {
            event_id: event_id.filter(|event| !event.is_empty()),
            expand: ExpandQuery { expand },
        };
        let transaction: Transaction = self
            .inner
            .get_with_query(&format!("/transactions/{}", segment(id)), &query)
            .await?;
        Ok(transaction.attach(&self.client()))
    }

    /// First page of the current user's transactions missing a receipt,
    /// across all organizations.
    pub async fn missing_receipt(&self, query: MissingReceiptQuery) -> Result<TransactionList> {
        let page: TransactionList = self
            .inner
            .get_with_query("/user/transactions/missing_receipt", &query)
            .await?;

        Ok(page.bind(&self.client(), PaginationContext::MissingReceipt { query }))
    }

    /// Replace a transaction's memo.
    pub async fn update_memo(
        &self,
        organization_id: &str,
        transaction_id: &str,
        memo: &str,
    ) -> Result<Transaction> {
        #[derive(Serialize)]
        struct Body<'a> {
            memo: &'a str,
        }

        let transaction: Transaction = self
            .inner
            .patch(
                &Self::transaction_path(organization_id, transaction_id),
                &Body { memo },
            )
            .await?;
        Ok(transaction.attach(&self.client()))
    }

    /// Memo suggestions for a transaction.
    pub async fn memo_suggestions(
        &self,
        organization_id: &str,
        transaction_id: &str,
    ) -> Result<Vec<String>> {
        let path = format!(
            "{}/memo_suggestions",
            Self::transaction_path(organization_id, transaction_id)
        );
        self.inner.get(&path).await
    }

    /// Comments on a transaction.
    pub async fn comments(&self, organization_id: &str, transaction_id: &str) -> Result<Vec<Comment>> {
        let path = format!(
            "{}/comments",
            Self::transaction_path(organization_id, transaction_id)
        );
        let comments: Vec<Comment> = self.inner.get(&path).await?;
        let client = self.client();
        Ok(comments
            .into_iter()
            .map(|comment| comment.attach_author(&client))
            .collect())
    }

    /// Post a comment. Sent as multipart when a file is attached, JSON
    /// otherwise.
    pub async fn create_comment(
        &self,
        organization_id: &str,
        transaction_id: &str,
        comment: NewComment,
    ) -> Result<Comment> {
        #[derive(Serialize)]
        struct Body<'a> {
            content: &'a str,
            admin_only: bool,
        }

        let path = format!(
            "{}/comments",
            Self::transaction_path(organization_id, transaction_id)
        );

        let created: Comment = match comment.file {
            Some(file) => {
                let form = Form::new()
                    .text("content", comment.content)
                    .text("admin_only", comment.admin_only.to_string())
                    .part("file", file.into_part()?);
                self.inner
                    .execute_multipart(Method::POST, &path, form)
                    .await?
            }
            None => {
                let body = Body {
                    content: &comment.content,
                    admin_only: comment.admin_only,
                };
                self.inner.post(&path, &body).await?
            }
        };
        Ok(created.attach_author(&self.client()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<Q: Serialize>(query: &Q) -> String {
        let request = reqwest::Client::new()
            .get("http://x.test/")
            .query(query)
            .build()
            .unwrap();
        request.url().query().unwrap_or_default().to_string()
    }

    #[test]
    fn test_default_query_is_empty() {
        assert_eq!(encode(&TransactionsQuery::default()), "");
        assert_eq!(encode(&MissingReceiptQuery::default()), "");
    }

    #[test]
    fn test_full_query_encoding() {
        let query = TransactionsQuery::default()
            .limit(10)
            .after("txn_9")
            .of_type(TransactionType::CardCharge)
            .filters(TransactionFilters::default().search("pizza").missing_receipts())
            .expand(&[TransactionExpand::Organization]);

        assert_eq!(
            encode(&query),
            "limit=10&after=txn_9&type=card_charge&filters%5Bsearch%5D=pizza\
             &filters%5Bmissing_receipts%5D=true&expand=organization"
        );
    }

    #[test]
    fn test_blank_values_are_dropped() {
        let query = TransactionsQuery {
            after: Some(String::new()),
            filters: TransactionFilters {
                search: Some(String::new()),
                tag_id: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(encode(&query), "");
    }

    #[test]
    fn test_date_range_encoding() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let filters = TransactionFilters::default().between(start, end);
        assert_eq!(
            encode(&filters),
            "filters%5Bstart_date%5D=2024-01-01&filters%5Bend_date%5D=2024-01-31"
        );
    }
}

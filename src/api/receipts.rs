//! Receipts service.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::Method;
use serde::Serialize;

use crate::client::query::segment;
use crate::client::{ClientInner, HcbClient};
use crate::models::resource::attach_all;
use crate::models::{Attachable, FileUpload, Receipt};
use crate::Result;

/// Service for receipt uploads.
///
/// # Example
///
/// ```no_run
/// use hcb_rs::models::FileUpload;
///
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let file = FileUpload::from_path("receipt.png").await?.with_mime("image/png");
///
/// // Without a transaction id the receipt lands in the receipt bin.
/// let receipt = client.receipts().create(file, Some("txn_123")).await?;
/// println!("{:?}", receipt.url);
/// # Ok(())
/// # }
/// ```
pub struct ReceiptsService {
    inner: Arc<ClientInner>,
}

impl ReceiptsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn client(&self) -> HcbClient {
        HcbClient::from_inner(self.inner.clone())
    }

    /// Receipts, optionally only those on one transaction.
    pub async fn list(&self, transaction_id: Option<&str>) -> Result<Vec<Receipt>> {
        #[derive(Serialize)]
        struct Query<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            transaction_id: Option<&'a str>,
        }

        let receipts: Vec<Receipt> = self
            .inner
            .get_with_query("/receipts", &Query { transaction_id })
            .await?;
        Ok(attach_all(receipts, &self.client()))
    }

    /// Upload a receipt, attached to `transaction_id` or to the receipt bin.
    pub async fn create(&self, file: FileUpload, transaction_id: Option<&str>) -> Result<Receipt> {
        let mut form = Form::new().part("file", file.into_part()?);
        if let Some(transaction_id) = transaction_id {
            form = form.text("transaction_id", transaction_id.to_string());
        }

        let receipt: Receipt = self
            .inner
            .execute_multipart(Method::POST, "/receipts", form)
            .await?;
        Ok(receipt.attach(&self.client()))
    }

    /// Delete a receipt. Returns the raw response body.
    pub async fn delete(&self, id: &str) -> Result<serde_json::Value> {
        self.inner
            .delete(&format!("/receipts/{}", segment(id)))
            .await
    }
}

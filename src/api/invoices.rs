//! Invoices service.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::client::query::segment;
use crate::client::{ClientInner, HcbClient};
use crate::models::resource::attach_all;
use crate::models::{Attachable, Invoice, NewInvoice};
use crate::Result;

/// Service for sponsor invoices.
pub struct InvoicesService {
    inner: Arc<ClientInner>,
}

impl InvoicesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn client(&self) -> HcbClient {
        HcbClient::from_inner(self.inner.clone())
    }

    /// Invoices sent by an organization.
    pub async fn list(&self, organization_id: &str) -> Result<Vec<Invoice>> {
        let invoices: Vec<Invoice> = self
            .inner
            .get(&format!("/organizations/{}/invoices", segment(organization_id)))
            .await?;
        Ok(attach_all(invoices, &self.client()))
    }

    /// An invoice by id.
    pub async fn get(&self, id: &str) -> Result<Invoice> {
        let invoice: Invoice = self.inner.get(&format!("/invoices/{}", segment(id))).await?;
        Ok(invoice.attach(&self.client()))
    }

    /// Invoice a sponsor on behalf of an organization.
    pub async fn create(&self, organization_id: &str, request: &NewInvoice) -> Result<Invoice> {
        #[derive(Serialize)]
        struct Item<'a> {
            due_date: NaiveDate,
            item_description: &'a str,
            item_amount: i64,
        }

        #[derive(Serialize)]
        struct Body<'a> {
            organization_id: &'a str,
            sponsor_id: &'a str,
            invoice: Item<'a>,
        }

        let body = Body {
            organization_id,
            sponsor_id: &request.sponsor_id,
            invoice: Item {
                due_date: request.due_date,
                item_description: &request.item_description,
                item_amount: request.item_amount,
            },
        };
        let invoice: Invoice = self.inner.post("/invoices", &body).await?;
        Ok(invoice.attach(&self.client()))
    }
}

//! Organization models.
//!
//! HCB calls organizations "events" in several request bodies
//! (`event_id`); both names refer to the same thing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::card_grant::{CardGrant, NewCardGrant};
use super::donation::{Donation, NewDonation};
use super::invitation::{Invitation, NewInvitation};
use super::invoice::{Invoice, NewInvoice};
use super::resource::{resource, Attachable};
use super::sponsor::{NewSponsor, Sponsor};
use super::stripe_card::StripeCard;
use super::transaction_list::TransactionList;
use super::transfer::{NewAchTransfer, NewDisbursement, Transfer};
use super::user::{OrganizationUser, User};
use crate::api::TransactionsQuery;
use crate::client::query::{CardGrantExpand, StripeCardExpand};
use crate::client::HcbClient;
use crate::Result;

/// An HCB organization: holds funds, issues cards and owns transactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organization {
    /// Unique organization id
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// URL slug, usable in place of the id
    pub slug: Option<String>,
    /// Country code
    pub country: Option<String>,
    /// Icon URL
    pub icon: Option<String>,
    /// Background image URL
    pub background_image: Option<String>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Parent organization id for sub-organizations
    pub parent_id: Option<String>,
    /// Whether the public donation page is enabled
    pub donation_page_available: Option<bool>,
    /// Whether the organization is still in playground mode
    pub playground_mode: Option<bool>,
    /// Whether a playground-mode meeting was requested
    pub playground_mode_meeting_requested: Option<bool>,
    /// Whether the ledger is publicly visible
    pub transparent: Option<bool>,
    /// Fiscal sponsorship fee, in percent
    pub fee_percentage: Option<Decimal>,
    /// Current balance (expand `balance_cents`)
    pub balance_cents: Option<i64>,
    /// Outstanding fees (expand `reporting`)
    pub fee_balance_cents: Option<i64>,
    /// Lifetime spend (expand `reporting`)
    pub total_spent_cents: Option<i64>,
    /// Lifetime income (expand `reporting`)
    pub total_raised_cents: Option<i64>,
    /// Bank account number (expand `account_number`)
    pub account_number: Option<String>,
    /// Bank routing number (expand `account_number`)
    pub routing_number: Option<String>,
    /// SWIFT/BIC code (expand `account_number`)
    pub swift_bic_code: Option<String>,
    /// Members (expand `users`)
    pub users: Option<Vec<OrganizationUser>>,
    #[serde(skip)]
    pub(crate) client: Option<HcbClient>,
}

resource!(Organization, "Organization", nested = attach_nested);

impl Organization {
    fn attach_nested(&mut self, client: &HcbClient) {
        if let Some(users) = self.users.as_mut() {
            for member in users.iter_mut() {
                member.user.client = Some(client.clone());
            }
        }
    }

    /// Fetch a fresh copy of this organization.
    pub async fn reload(&self) -> Result<Organization> {
        let client = self.require_attached()?;
        client.organizations().get(&self.id, &[]).await
    }

    /// Card grants issued by this organization.
    pub async fn card_grants(&self, expand: &[CardGrantExpand]) -> Result<Vec<CardGrant>> {
        let client = self.require_attached()?;
        client.card_grants().for_organization(&self.id, expand).await
    }

    /// Stripe cards issued by this organization.
    pub async fn stripe_cards(&self, expand: &[StripeCardExpand]) -> Result<Vec<StripeCard>> {
        let client = self.require_attached()?;
        client.stripe_cards().for_organization(&self.id, expand).await
    }

    /// Invoices sent by this organization.
    pub async fn invoices(&self) -> Result<Vec<Invoice>> {
        let client = self.require_attached()?;
        client.invoices().list(&self.id).await
    }

    /// Sponsors of this organization.
    pub async fn sponsors(&self) -> Result<Vec<Sponsor>> {
        let client = self.require_attached()?;
        client.sponsors().list(&self.id).await
    }

    /// Users following this (transparent) organization.
    pub async fn followers(&self) -> Result<Vec<User>> {
        let client = self.require_attached()?;
        client.organizations().followers(&self.id).await
    }

    /// First page of this organization's transactions.
    ///
    /// Use [`TransactionList::auto_paginate`] to walk the remaining pages.
    pub async fn transactions(&self, query: TransactionsQuery) -> Result<TransactionList> {
        let client = self.require_attached()?;
        client.transactions().list(&self.id, query).await
    }

    /// Child organizations.
    pub async fn sub_organizations(&self) -> Result<Vec<Organization>> {
        let client = self.require_attached()?;
        client.organizations().sub_organizations(&self.id).await
    }

    /// Issue a card grant.
    pub async fn create_card_grant(&self, request: &NewCardGrant) -> Result<CardGrant> {
        let client = self.require_attached()?;
        client.card_grants().create(&self.id, request).await
    }

    /// Invoice one of this organization's sponsors.
    pub async fn create_invoice(&self, request: &NewInvoice) -> Result<Invoice> {
        let client = self.require_attached()?;
        client.invoices().create(&self.id, request).await
    }

    /// Create a sponsor record for invoicing.
    pub async fn create_sponsor(&self, request: &NewSponsor) -> Result<Sponsor> {
        let client = self.require_attached()?;
        client.sponsors().create(&self.id, request).await
    }

    /// Move funds to another organization.
    pub async fn create_disbursement(&self, request: &NewDisbursement) -> Result<Transfer> {
        let client = self.require_attached()?;
        client.transfers().create_disbursement(&self.id, request).await
    }

    /// Send money to a bank account over ACH.
    ///
    /// Returns the raw response body.
    pub async fn create_ach_transfer(&self, request: &NewAchTransfer) -> Result<serde_json::Value> {
        let client = self.require_attached()?;
        client.transfers().create_ach_transfer(&self.id, request).await
    }

    /// Record an in-person donation.
    pub async fn create_donation(&self, request: &NewDonation) -> Result<Donation> {
        let client = self.require_attached()?;
        client.donations().create(&self.id, request).await
    }

    /// Invite someone to join this organization.
    pub async fn create_invitation(&self, request: &NewInvitation) -> Result<Invitation> {
        let client = self.require_attached()?;
        client.invitations().create(&self.id, request).await
    }

    /// Create a sub-organization under this one.
    pub async fn create_sub_organization(
        &self,
        request: &NewSubOrganization,
    ) -> Result<Organization> {
        let client = self.require_attached()?;
        client
            .organizations()
            .create_sub_organization(&self.id, request)
            .await
    }
}

/// Request body for creating a sub-organization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSubOrganization {
    /// Name of the new organization
    pub name: String,
    /// Email of the point of contact
    pub email: String,
    /// Optional cosigner email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cosigner_email: Option<String>,
    /// Country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Tags scoped to the new organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoped_tags: Option<Vec<String>>,
}

impl NewSubOrganization {
    /// Create a request with the required fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }
}

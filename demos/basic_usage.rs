//! Basic usage example.
//!
//! This example demonstrates how to authenticate with the HCB API, list the
//! organizations the current user belongs to and walk one ledger.
//!
//! Run with: cargo run --example basic_usage
//!
//! Required environment variables: `HCB_CLIENT_ID`, `HCB_CLIENT_SECRET`,
//! `HCB_ACCESS_TOKEN`, `HCB_REFRESH_TOKEN`.

use futures_util::StreamExt;
use hcb_rs::api::TransactionsQuery;
use hcb_rs::models::TransactionDetail;
use hcb_rs::{HcbClient, OrganizationExpand};

#[tokio::main]
async fn main() -> hcb_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let client = HcbClient::from_env()?;

    let me = client.users().me().await?;
    println!("Signed in as {}", me.name.as_deref().unwrap_or("(no name)"));

    let orgs = client
        .organizations()
        .list(&[OrganizationExpand::BalanceCents])
        .await?;
    println!("\nFound {} organization(s):", orgs.len());

    for org in &orgs {
        println!(
            "  - {} ({}) balance: {:?} cents",
            org.name.as_deref().unwrap_or("Unnamed"),
            org.id,
            org.balance_cents
        );
    }

    let Some(org) = orgs.first() else {
        println!("\nNo organizations to inspect.");
        return Ok(());
    };

    println!("\nRecent transactions for {}:", org.id);
    let page = org
        .transactions(TransactionsQuery::default().limit(25))
        .await?;

    let mut transactions = page.auto_paginate(Some(2));
    while let Some(txn) = transactions.next().await {
        let txn = txn?;
        let status = txn
            .details()
            .and_then(|details| details.as_detail().status().map(String::from));
        println!(
            "  {} {:>10} {:<14} {}{}",
            txn.date.map(|d| d.to_string()).unwrap_or_default(),
            txn.amount_cents.unwrap_or_default(),
            txn.kind(),
            txn.memo.as_deref().unwrap_or(""),
            status.map(|s| format!(" [{}]", s)).unwrap_or_default()
        );
    }

    let missing = client
        .transactions()
        .missing_receipt(Default::default())
        .await?;
    println!(
        "\n{} transaction(s) across your organizations need a receipt",
        missing.total_count.unwrap_or(missing.len() as u64)
    );

    println!("\nDone!");
    Ok(())
}

//! Account commands - Print one account page

use colored::*;
use steexp_explorer::{short_key, AccountExplorer, AccountView, Screen};
use steexp_horizon::HorizonClient;
use steexp_types::FetchError;

use crate::display;

/// Load an account, wait for the lookup to settle and print its page
pub async fn show_account(
    explorer: &AccountExplorer,
    horizon: &HorizonClient,
    account_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    explorer.show(account_id);

    let view = match explorer.settled_screen().await {
        Screen::Account(view) => view,
        Screen::Error { account_id, error } => {
            report_failure(&account_id, &error);
            return Err(lookup_failed(&account_id, &error));
        }
        Screen::Blank | Screen::Loading { .. } => {
            anyhow::bail!("lookup of {} did not settle", account_id)
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_sections(&view);
    print_history(horizon, &view).await;
    Ok(())
}

fn report_failure(account_id: &str, error: &FetchError) {
    match error {
        FetchError::NotFound { .. } => {
            display::error(&format!("Account {} not found", account_id));
        }
        FetchError::Transport { .. } => {
            display::error(&error.to_string());
            display::info("The server could not be reached; try again in a moment");
        }
        FetchError::MalformedResponse { .. } => {
            display::error(&error.to_string());
        }
    }
}

/// Short exit error for a failure `report_failure` already printed
fn lookup_failed(account_id: &str, error: &FetchError) -> anyhow::Error {
    let reason = match error {
        FetchError::NotFound { .. } => "not found",
        FetchError::Transport { .. } => "server unreachable",
        FetchError::MalformedResponse { .. } => "unreadable response",
    };
    anyhow::anyhow!("lookup of {} failed: {}", account_id, reason)
}

fn print_sections(view: &AccountView) {
    let sections = &view.sections;
    let identity = &sections.identity;

    display::section("Account");
    display::labeled("Label", &identity.label);
    display::labeled("Account", &identity.account_id);
    if let Some(anchor) = identity.anchor.as_ref() {
        if let Some(domain) = anchor.domain.as_deref() {
            display::labeled("Anchor", domain);
        }
    }
    if let Some(url) = view.json_url.as_deref() {
        display::labeled("JSON", url);
    }

    display::section("Balances");
    for row in &sections.balances {
        println!(
            "  {:<14} {:>24}",
            row.asset.bright_white(),
            row.balance.bright_cyan()
        );
        if let Some(issuer) = row.issuer.as_deref() {
            display::kv("issuer", issuer);
        }
        if let Some(limit) = row.limit.as_deref() {
            display::kv("limit", limit);
        }
    }

    display::section("Signing");
    for row in &sections.signing {
        println!(
            "  {}  weight={}  {}",
            row.public_key.bright_white(),
            row.weight.to_string().bright_cyan(),
            row.signer_type.bright_black()
        );
    }
    let thresholds = &sections.thresholds;
    display::labeled(
        "Thresholds",
        &format!("low={} medium={} high={}", thresholds.low, thresholds.medium, thresholds.high),
    );

    display::section("Flags");
    for row in &sections.flags {
        display::kv(&row.name, &row.value);
    }
}

/// First page of both history lists; failures here do not fail the command
async fn print_history(horizon: &HorizonClient, view: &AccountView) {
    display::section("Operations");
    match horizon.operations(&view.operations, None).await {
        Ok(page) if page.is_empty() => display::info("No operations"),
        Ok(page) => {
            for op in &page.records {
                println!(
                    "  {}  {:<24} {}",
                    op.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
                    op.operation_type,
                    short_key(&op.transaction_hash)
                );
            }
            if page.next_cursor.is_some() {
                display::info("More operations available");
            }
        }
        Err(err) => display::warning(&format!("Could not load operations: {}", err)),
    }

    display::section("Transactions");
    match horizon.transactions(&view.transactions, None).await {
        Ok(page) if page.is_empty() => display::info("No transactions"),
        Ok(page) => {
            for tx in &page.records {
                println!(
                    "  {}  {}  ops={}{}",
                    tx.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
                    short_key(&tx.hash),
                    tx.operation_count,
                    if tx.successful { String::new() } else { " failed".bright_red().to_string() }
                );
            }
            if page.next_cursor.is_some() {
                display::info("More transactions available");
            }
        }
        Err(err) => display::warning(&format!("Could not load transactions: {}", err)),
    }
}

//! Anchor commands - List the known issuers

use colored::*;
use steexp_explorer::AnchorRegistry;

use crate::display;

pub const NOT_COMPREHENSIVE: &str =
    "This is not a comprehensive list of anchors; unknown issuers are shown by account id.";

/// Print every registry entry, then the coverage note
pub fn list_anchors(anchors: &AnchorRegistry, json: bool) -> anyhow::Result<()> {
    if json {
        let entries: Vec<_> = anchors.iter().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    display::section(&format!("Anchors ({})", anchors.len()));
    if anchors.is_empty() {
        display::warning("No anchors configured");
    }
    for anchor in anchors.iter() {
        println!();
        println!("  {}", anchor.name.bright_white().bold());
        display::kv("account", &anchor.id);
        if let Some(domain) = anchor.domain.as_deref() {
            display::kv("domain", domain);
        }
        if let Some(logo) = anchor.logo_url.as_deref() {
            display::kv("logo", logo);
        }
    }
    println!();
    display::info(NOT_COMPREHENSIVE);
    Ok(())
}

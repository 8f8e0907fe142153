//! Terminal rendering of response bodies.
//!
//! `--json` prints the body exactly as an HTTP shell would send it. The
//! human view is a status line, a provenance line and one table.

use owo_colors::OwoColorize;
use tabled::{Table, Tabled};

use crate::application::response::{CandidateItem, DealItem, Item, ResponseBody, SourceStatus};

#[derive(Tabled)]
struct DealRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "OVR")]
    rating: String,
    #[tabled(rename = "Pos")]
    position: String,
    #[tabled(rename = "BIN")]
    bin: u64,
    #[tabled(rename = "Buy")]
    buy: u64,
    #[tabled(rename = "Sell")]
    sell: u64,
    #[tabled(rename = "Profit")]
    profit: i64,
    #[tabled(rename = "Source")]
    source: String,
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "OVR")]
    rating: String,
    #[tabled(rename = "Pos")]
    position: String,
    #[tabled(rename = "Chem")]
    chem: &'static str,
}

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn rating_cell(item: &CandidateItem) -> String {
    match item.rating {
        Some(rating) if item.rating_inferred => format!("{rating}?"),
        Some(rating) => rating.to_string(),
        None => "-".to_string(),
    }
}

impl From<&DealItem> for DealRow {
    fn from(deal: &DealItem) -> Self {
        Self {
            name: deal.candidate.name.clone(),
            rating: rating_cell(&deal.candidate),
            position: dash(deal.candidate.position.as_deref()),
            bin: deal.bin,
            buy: deal.buy,
            sell: deal.sell,
            profit: deal.profit,
            source: deal.price_source.clone(),
        }
    }
}

impl From<&CandidateItem> for CandidateRow {
    fn from(item: &CandidateItem) -> Self {
        Self {
            name: item.name.clone(),
            id: dash(item.id.as_deref()),
            rating: rating_cell(item),
            position: dash(item.position.as_deref()),
            chem: item.chem,
        }
    }
}

impl From<&SourceStatus> for SourceRow {
    fn from(status: &SourceStatus) -> Self {
        Self {
            source: status.source.clone(),
            status: if status.ok { "ok" } else { "down" },
            items: status.items,
            detail: status
                .route
                .clone()
                .or_else(|| status.error.clone())
                .unwrap_or_default(),
        }
    }
}

/// Render `body` as a table. Items are grouped by kind.
#[must_use]
pub fn render_table(body: &ResponseBody) -> Option<String> {
    let mut deals = Vec::new();
    let mut candidates = Vec::new();
    let mut sources = Vec::new();
    for item in &body.items {
        match item {
            Item::Deal(deal) => deals.push(DealRow::from(deal)),
            Item::Candidate(candidate) => candidates.push(CandidateRow::from(candidate)),
            Item::Source(status) => sources.push(SourceRow::from(status)),
        }
    }

    let tables: Vec<String> = [
        (!deals.is_empty()).then(|| Table::new(deals).to_string()),
        (!candidates.is_empty()).then(|| Table::new(candidates).to_string()),
        (!sources.is_empty()).then(|| Table::new(sources).to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!tables.is_empty()).then(|| tables.join("\n\n"))
}

/// Print the body as pretty JSON on stdout.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn print_json(body: &ResponseBody) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

/// Print the human view of the body.
pub fn print_human(body: &ResponseBody) {
    match &body.error {
        Some(error) if !body.ok => eprintln!("  {} {}", "×".red(), error),
        Some(error) => println!("  {} {}", "⚠".yellow(), error),
        None => println!("  {} {} item(s)", "✓".green(), body.items.len()),
    }

    if let Some(provenance) = &body.provenance {
        println!("  {:<8} {} {}", "source".dimmed(), provenance.source, provenance.route.dimmed());
    }
    if let Some(scan) = &body.scan {
        let rounds = scan
            .rounds
            .iter()
            .map(|r| format!("{}:{}/{}", r.threshold, r.kept, r.priced))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {:<8} {:?}, {} priced, rounds {}",
            "scan".dimmed(),
            scan.termination,
            scan.price_hits,
            rounds
        );
    }

    if let Some(table) = render_table(body) {
        println!();
        println!("{table}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, rating: Option<u8>, inferred: bool) -> CandidateItem {
        CandidateItem {
            name: name.into(),
            id: None,
            rating,
            rating_inferred: inferred,
            position: Some("ST".into()),
            source: None,
            chem: "Hunter / Engine / Finisher",
        }
    }

    #[test]
    fn inferred_ratings_are_marked() {
        assert_eq!(rating_cell(&candidate("a", Some(88), true)), "88?");
        assert_eq!(rating_cell(&candidate("a", Some(88), false)), "88");
        assert_eq!(rating_cell(&candidate("a", None, false)), "-");
    }

    #[test]
    fn empty_body_has_no_table() {
        assert!(render_table(&ResponseBody::success(Vec::new())).is_none());
    }

    #[test]
    fn candidates_render_one_row_each() {
        let body = ResponseBody::success(vec![
            Item::Candidate(candidate("Kane", Some(90), false)),
            Item::Candidate(candidate("Isak", None, false)),
        ]);
        let table = render_table(&body).unwrap();
        assert!(table.contains("Kane"));
        assert!(table.contains("Isak"));
        assert!(table.contains("Chem"));
    }
}

//! Command-line interface definitions.
//!
//! Every subcommand is sugar for a parameter bag: `binscout scan --size 20`
//! sends exactly what `binscout query mode=scan size=20` sends.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::query::Params;

/// Lowest buy-now prices and resale deals across catalog sources
#[derive(Parser, Debug)]
#[command(name = "binscout")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the raw JSON response body
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a raw parameter bag (`mode=scan size=20 ...`)
    Query {
        /// `key=value` pairs
        #[arg(value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },

    /// Scan popular candidates for profitable deals
    Scan(ScanArgs),

    /// Resolve one candidate's lowest buy-now price
    Price(PriceArgs),

    /// List popular candidates
    List(ListArgs),

    /// Search candidates by name
    Find(FindArgs),

    /// Probe every listing source
    Status(SourceArg),
}

/// Restrict a request to one source.
#[derive(Args, Debug, Default)]
pub struct SourceArg {
    /// Only ask this source
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    #[arg(long)]
    pub platform: Option<String>,
    /// Maximum number of deals
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub ovr_min: Option<String>,
    #[arg(long)]
    pub ovr_max: Option<String>,
    #[arg(long)]
    pub bin_min: Option<String>,
    #[arg(long)]
    pub bin_max: Option<String>,
    /// Percent below the current price to bid
    #[arg(long)]
    pub discount: Option<String>,
    #[command(flatten)]
    pub source: SourceArg,
}

#[derive(Args, Debug, Default)]
pub struct PriceArgs {
    /// Player id in the source's namespace
    #[arg(long)]
    pub player_id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub platform: Option<String>,
    #[arg(long)]
    pub discount: Option<String>,
    #[command(flatten)]
    pub source: SourceArg,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub limit: Option<String>,
    #[arg(long)]
    pub page: Option<String>,
    #[command(flatten)]
    pub source: SourceArg,
}

#[derive(Args, Debug, Default)]
pub struct FindArgs {
    pub name: String,
    #[arg(long)]
    pub limit: Option<String>,
    #[arg(long)]
    pub page: Option<String>,
    #[command(flatten)]
    pub source: SourceArg,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Accumulates parameters, skipping absent values.
struct Bag(Params);

impl Bag {
    fn mode(mode: &str) -> Self {
        let mut params = Params::new();
        params.insert("mode".into(), mode.into());
        Self(params)
    }

    fn set(mut self, key: &str, value: Option<&String>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.into(), value.clone());
        }
        self
    }
}

impl Commands {
    /// The parameter bag this command sends.
    #[must_use]
    pub fn to_params(&self) -> Params {
        match self {
            Self::Query { params } => params.iter().cloned().collect(),
            Self::Scan(args) => Bag::mode("scan")
                .set("platform", args.platform.as_ref())
                .set("size", args.size.as_ref())
                .set("ovrMin", args.ovr_min.as_ref())
                .set("ovrMax", args.ovr_max.as_ref())
                .set("binMin", args.bin_min.as_ref())
                .set("binMax", args.bin_max.as_ref())
                .set("discount", args.discount.as_ref())
                .set("source", args.source.source.as_ref())
                .0,
            Self::Price(args) => Bag::mode("price")
                .set("playerId", args.player_id.as_ref())
                .set("name", args.name.as_ref())
                .set("platform", args.platform.as_ref())
                .set("discount", args.discount.as_ref())
                .set("source", args.source.source.as_ref())
                .0,
            Self::List(args) => Bag::mode("list")
                .set("limit", args.limit.as_ref())
                .set("page", args.page.as_ref())
                .set("source", args.source.source.as_ref())
                .0,
            Self::Find(args) => Bag::mode("find")
                .set("name", Some(&args.name))
                .set("limit", args.limit.as_ref())
                .set("page", args.page.as_ref())
                .set("source", args.source.source.as_ref())
                .0,
            Self::Status(args) => Bag::mode("status").set("source", args.source.as_ref()).0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_of(args: &[&str]) -> Params {
        Cli::try_parse_from(args).unwrap().command.to_params()
    }

    #[test]
    fn scan_flags_map_to_query_keys() {
        let params = params_of(&["binscout", "scan", "--size", "20", "--ovr-min", "85", "--source", "futgg"]);
        assert_eq!(params.get("mode").map(String::as_str), Some("scan"));
        assert_eq!(params.get("size").map(String::as_str), Some("20"));
        assert_eq!(params.get("ovrMin").map(String::as_str), Some("85"));
        assert_eq!(params.get("source").map(String::as_str), Some("futgg"));
        assert!(!params.contains_key("binMax"));
    }

    #[test]
    fn raw_query_pairs_pass_through() {
        let params = params_of(&["binscout", "--json", "query", "mode=price", "playerId=231747"]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("playerId").map(String::as_str), Some("231747"));
    }

    #[test]
    fn malformed_pair_is_a_usage_error() {
        assert!(Cli::try_parse_from(["binscout", "query", "mode"]).is_err());
        assert!(Cli::try_parse_from(["binscout", "query", "=scan"]).is_err());
    }

    #[test]
    fn find_takes_a_positional_name() {
        let params = params_of(&["binscout", "find", "Vini Jr", "--limit", "5"]);
        assert_eq!(params.get("name").map(String::as_str), Some("Vini Jr"));
        assert_eq!(params.get("limit").map(String::as_str), Some("5"));
    }
}

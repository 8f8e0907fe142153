//! Service built from configuration over scripted HTTP responses.

mod support;

use std::sync::Arc;

use binscout::infrastructure::bootstrap::build_service_with;
use binscout::testkit::config::config_from;
use binscout::testkit::fetcher::ScriptedFetcher;
use serde_json::{json, Value};

use support::scenario::params;

const CONFIG: &str = r#"
[policy]
rounding_step = 1000
relist_fee = 500

[scan]
thresholds = [500]
min_viable = 1
pool_size = 5

[[sources]]
id = "gg"
bases = ["https://gg.test"]
listing = [{ path = "/players/trending/", format = "markup" }]
search = [{ path = "/players/?name={query}", format = "markup" }]
price = [{ path = "/players/{id}/", format = "markup" }]

[[sources]]
id = "bin"
bases = ["https://bin.test"]
price = [{ path = "/player/{id}", format = "markup" }]

[[sources]]
id = "api"
bases = ["https://api.test"]
caller_ids = true
search = ["/players?search={query}&limit={limit}"]
price = ["/players/{id}/price?platform={platform}"]
"#;

const TRENDING: &str = r#"
<div class="grid">
  <a href="/players/101-alpha-one/" title="Alpha One"><img alt="Alpha One"></a>
  <a href="/players/102-bravo-two/" title="Bravo Two"><img alt="Bravo Two"></a>
</div>
"#;

fn scripted() -> Arc<ScriptedFetcher> {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.respond_text("https://gg.test/players/trending/", TRENDING);
    fetcher.respond_text("https://gg.test/players/101/", r#"<script>{"lowestBin": 7000}</script>"#);
    fetcher.respond_status("https://gg.test/players/102/", 403);
    fetcher.respond_text("https://gg.test/players/555/", r#"{"lowestBin": 150000}"#);
    fetcher.respond_text("https://gg.test/players/556/", r#"{"lowestBin": 150000}"#);
    fetcher.respond_json(
        "https://api.test/players?search=Bravo+Two&limit=10",
        r#"{"data": [{"commonName": "Bravo Two", "playerId": 555}]}"#,
    );
    fetcher.respond_json(
        "https://api.test/players/555/price?platform=ps",
        r#"{"data": {"lowestBin": {"PS": "8,000", "xbox": 9100}}}"#,
    );
    fetcher.respond_json(
        "https://api.test/players/555/price?platform=xbox",
        r#"{"data": {"lowestBin": {"PS": "8,000", "xbox": 9100}}}"#,
    );
    fetcher
}

const EMPTY_EVERYWHERE: &str = r#"
[[sources]]
id = "mirror"
bases = ["https://one.test", "https://two.test"]
listing = ["/popular", "/trending"]
price = ["/price/{id}"]
"#;

async fn run(fetcher: &Arc<ScriptedFetcher>, pairs: &[(&str, &str)]) -> Value {
    run_with(CONFIG, fetcher, pairs).await
}

async fn run_with(config: &str, fetcher: &Arc<ScriptedFetcher>, pairs: &[(&str, &str)]) -> Value {
    let service = build_service_with(&config_from(config), fetcher.clone()).expect("service");
    let reply = service.handle(&params(pairs)).await;
    serde_json::to_value(&reply.body).expect("serialize body")
}

#[tokio::test]
async fn scan_prices_through_the_cascade() {
    let fetcher = scripted();
    let body = run(&fetcher, &[("mode", "scan"), ("discount", "0")]).await;

    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["provenance"]["source"], json!("gg"));
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], json!("Alpha One"));
    assert_eq!(items[0]["priceSource"], json!("gg"));
    assert_eq!(items[0]["profit"], json!(600));
    assert_eq!(items[1]["name"], json!("Bravo Two"));
    assert_eq!(items[1]["priceSource"], json!("api"));
    assert_eq!(items[1]["bin"], json!(8_000));
}

#[tokio::test]
async fn foreign_ids_never_reach_other_sources() {
    let fetcher = scripted();
    run(&fetcher, &[("mode", "scan"), ("discount", "0")]).await;

    let urls = fetcher.requested_urls();
    assert!(urls.iter().all(|u| !u.starts_with("https://bin.test")));
    assert!(!urls.iter().any(|u| u == "https://api.test/players/102/price?platform=ps"));
}

#[tokio::test]
async fn price_by_name_walks_every_source() {
    let fetcher = scripted();
    let body = run(&fetcher, &[("mode", "price"), ("name", "Bravo Two"), ("platform", "xbox")]).await;

    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["items"][0]["bin"], json!(9_100));
    let attempts = body["attempts"].as_array().unwrap();
    assert!(attempts.iter().any(|a| a["source"] == json!("bin")
        && a["outcome"]["kind"] == json!("skipped")));
}

#[tokio::test]
async fn restricting_to_a_price_only_source_has_nothing_to_list() {
    let fetcher = scripted();
    let body = run(&fetcher, &[("mode", "scan"), ("source", "bin")]).await;

    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["items"], json!([]));
    assert!(fetcher.requested_urls().is_empty());
}

#[tokio::test]
async fn caller_ids_go_to_the_source_that_issued_them() {
    let fetcher = scripted();
    let body = run(&fetcher, &[("mode", "price"), ("playerId", "555"), ("platform", "ps")]).await;

    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["items"][0]["bin"], json!(8_000));
    assert_eq!(body["items"][0]["priceSource"], json!("api"));
    assert!(!fetcher
        .requested_urls()
        .iter()
        .any(|u| u == "https://gg.test/players/555/"));
}

#[tokio::test]
async fn caller_ids_are_not_reused_by_other_sources() {
    let fetcher = scripted();
    let body = run(&fetcher, &[("mode", "price"), ("playerId", "556")]).await;

    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["items"], json!([]));
    let urls = fetcher.requested_urls();
    assert!(urls.iter().any(|u| u == "https://api.test/players/556/price?platform=ps"));
    assert!(urls.iter().all(|u| !u.starts_with("https://gg.test")));
    assert!(urls.iter().all(|u| !u.starts_with("https://bin.test")));
}

#[tokio::test]
async fn naming_a_source_hands_it_the_caller_id() {
    let fetcher = scripted();
    let body = run(&fetcher, &[("mode", "price"), ("playerId", "555"), ("source", "gg")]).await;

    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["items"][0]["bin"], json!(150_000));
    assert_eq!(fetcher.requested_urls(), vec!["https://gg.test/players/555/"]);
}

fn empty_mirror() -> Arc<ScriptedFetcher> {
    let fetcher = Arc::new(ScriptedFetcher::new());
    for url in [
        "https://one.test/popular",
        "https://one.test/trending",
        "https://two.test/popular",
        "https://two.test/trending",
    ] {
        fetcher.respond_json(url, r#"{"items": []}"#);
    }
    fetcher
}

#[tokio::test]
async fn empty_listings_on_every_route_fail_the_scan() {
    let fetcher = empty_mirror();
    let body = run_with(EMPTY_EVERYWHERE, &fetcher, &[("mode", "scan")]).await;

    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["items"], json!([]));
    assert_eq!(
        fetcher.requested_urls(),
        vec![
            "https://one.test/popular",
            "https://one.test/trending",
            "https://two.test/popular",
            "https://two.test/trending",
        ]
    );
}

#[tokio::test]
async fn empty_listings_are_reported_per_route() {
    let fetcher = empty_mirror();
    let body = run_with(EMPTY_EVERYWHERE, &fetcher, &[("mode", "list")]).await;

    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["items"], json!([]));
    let attempts = body["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 4);
    assert!(attempts.iter().all(|a| a["outcome"]["kind"] == json!("empty")));
}

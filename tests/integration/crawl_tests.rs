//! Integration tests for the crawler
//!
//! These tests use wiremock to serve Duden-shaped search and entry pages
//! and run the full crawl cycle end-to-end.

use duden_crawl::config::Config;
use duden_crawl::crawler::Coordinator;
use duden_crawl::lemma::{LemmaFeature, PartOfSpeech};
use duden_crawl::output::OutputError;
use duden_crawl::CrawlError;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output: PathBuf, features: Vec<LemmaFeature>) -> Config {
    let mut config = Config::default();
    config.search.term = "Apfel".to_string();
    config.output.path = output;
    config.output.features = features;
    config.crawler.base_url = format!("{}/", base_url);
    config.crawler.request_delay_ms = 0;
    config.crawler.max_retries = 0;
    config.crawler.retry_delay_ms = 10;
    config.crawler.timeout_secs = 5;
    config.crawler.max_concurrent_requests = 4;
    config
}

fn vignette(title: &str, snippet: &str, href: &str) -> String {
    format!(
        r#"<section class="vignette">
            <h2 class="vignette__title"><a href="{href}"><strong>{title}</strong></a></h2>
            <p class="vignette__snippet">{snippet}</p>
            <a class="vignette__link" href="{href}">Zum vollständigen Artikel</a>
        </section>"#
    )
}

fn search_page(vignettes: &[String], next: Option<&str>) -> String {
    let pager = next
        .map(|href| format!(r#"<a class="pager__item" rel="next" href="{}">Weiter</a>"#, href))
        .unwrap_or_default();
    format!(
        "<html><body><main>{}</main><nav>{}</nav></body></html>",
        vignettes.concat(),
        pager
    )
}

fn entry_page(headline: &str, part_of_speech: Option<&str>) -> String {
    let tuple = part_of_speech
        .map(|pos| {
            format!(
                r#"<dl class="tuple"><dt class="tuple__key">Wortart: </dt><dd class="tuple__val">{}</dd></dl>"#,
                pos
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><article><div class="lemma"><h1><span>{}</span></h1></div>{}</article></body></html>"#,
        headline, tuple
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

fn read_lines(path: &PathBuf) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_end_to_end_single_relevant_entry() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("apfel.csv");

    mount_page(
        &server,
        "/suchen/dudenonline/Apfel",
        search_page(
            &[
                vignette("Ap&shy;fel", "Substantiv, maskulin – Frucht", "/rechtschreibung/Apfel"),
                vignette("ap&shy;feln", "Verb – Äpfel ernten", "/rechtschreibung/apfeln"),
            ],
            None,
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/rechtschreibung/Apfel",
        entry_page("Ap&shy;fel", Some("Substantiv, maskulin")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/rechtschreibung/apfeln",
        entry_page("ap&shy;feln", Some("Verb")),
        0,
    )
    .await;

    let mut config = create_test_config(
        &base_url,
        output.clone(),
        vec![LemmaFeature::Title, LemmaFeature::Url],
    );
    config.search.filters.part_of_speech = Some([PartOfSpeech::Noun].into_iter().collect());

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.search_pages_requested, 1);
    assert_eq!(stats.outlines_seen, 2);
    assert_eq!(stats.outlines_followed, 1);
    assert_eq!(stats.records_written, 1);

    let lines = read_lines(&output);
    assert_eq!(
        lines,
        vec![
            "title;url".to_string(),
            format!("Apfel;{}/rechtschreibung/Apfel", base_url),
        ]
    );
}

#[tokio::test]
async fn test_pagination_stops_when_next_link_absent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("pages.csv");

    // Next-page links are relative to the current search page
    mount_page(
        &server,
        "/suchen/dudenonline/Apfel",
        search_page(&[], Some("Apfel-2")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/suchen/dudenonline/Apfel-2",
        search_page(&[], Some("Apfel-3")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/suchen/dudenonline/Apfel-3",
        search_page(&[], None),
        1,
    )
    .await;

    let config = create_test_config(&server.uri(), output.clone(), vec![LemmaFeature::Title]);
    let coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.search_pages_requested, 3);
    assert_eq!(stats.search_pages_processed, 3);
    assert_eq!(stats.entry_pages_requested, 0);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(read_lines(&output), vec!["title".to_string()]);
}

#[tokio::test]
async fn test_entries_collected_across_pages() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("all.csv");

    mount_page(
        &server,
        "/suchen/dudenonline/Apfel",
        search_page(
            &[vignette("Apfel", "Substantiv, maskulin", "/rechtschreibung/Apfel")],
            Some("/suchen/dudenonline/Apfel-2"),
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/suchen/dudenonline/Apfel-2",
        search_page(
            &[vignette("Apfelbaum", "Substantiv, maskulin", "/rechtschreibung/Apfelbaum")],
            None,
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/rechtschreibung/Apfel",
        entry_page("Ap&shy;fel", Some("Substantiv, maskulin")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/rechtschreibung/Apfelbaum",
        entry_page("Ap&shy;fel&shy;baum", None),
        1,
    )
    .await;

    let config = create_test_config(&base_url, output.clone(), LemmaFeature::ALL.to_vec());
    let coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.records_written, 2);

    let lines = read_lines(&output);
    assert_eq!(lines[0], "url;title;part_of_speech;hyphenation");
    assert_eq!(lines.len(), 3);

    // Responses may arrive in any order
    let mut rows = lines[1..].to_vec();
    rows.sort();
    assert_eq!(
        rows,
        vec![
            format!(
                "{}/rechtschreibung/Apfel;Apfel;Substantiv, maskulin;Ap | fel",
                base_url
            ),
            format!(
                "{}/rechtschreibung/Apfelbaum;Apfelbaum;;Ap | fel | baum",
                base_url
            ),
        ]
    );
}

#[tokio::test]
async fn test_failed_entry_fetch_does_not_halt_crawl() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("partial.csv");

    mount_page(
        &server,
        "/suchen/dudenonline/Apfel",
        search_page(
            &[
                vignette("Apfel", "Substantiv", "/rechtschreibung/Apfel"),
                vignette("Apfelmus", "Substantiv", "/rechtschreibung/Apfelmus"),
            ],
            None,
        ),
        1,
    )
    .await;
    mount_page(&server, "/rechtschreibung/Apfel", entry_page("Apfel", None), 1).await;

    // One retry, so the broken entry is requested twice
    Mock::given(method("GET"))
        .and(path("/rechtschreibung/Apfelmus"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = create_test_config(&base_url, output.clone(), vec![LemmaFeature::Title]);
    config.crawler.max_retries = 1;

    let coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.records_written, 1);
    assert_eq!(read_lines(&output), vec!["title", "Apfel"]);
}

#[tokio::test]
async fn test_duplicate_entries_fetched_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("dedupe.csv");

    mount_page(
        &server,
        "/suchen/dudenonline/Apfel",
        search_page(
            &[vignette("Apfel", "Substantiv", "/rechtschreibung/Apfel")],
            Some("Apfel-2"),
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/suchen/dudenonline/Apfel-2",
        search_page(&[vignette("Apfel", "Substantiv", "/rechtschreibung/Apfel")], None),
        1,
    )
    .await;
    mount_page(&server, "/rechtschreibung/Apfel", entry_page("Apfel", None), 1).await;

    let config = create_test_config(&server.uri(), output.clone(), vec![LemmaFeature::Title]);
    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.duplicates_skipped, 1);
    assert_eq!(read_lines(&output), vec!["title", "Apfel"]);
}

#[tokio::test]
async fn test_duplicate_entries_kept_when_dedupe_disabled() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("no-dedupe.csv");

    mount_page(
        &server,
        "/suchen/dudenonline/Apfel",
        search_page(
            &[
                vignette("Apfel", "Substantiv", "/rechtschreibung/Apfel"),
                vignette("Apfel", "Substantiv", "/rechtschreibung/Apfel"),
            ],
            None,
        ),
        1,
    )
    .await;
    mount_page(&server, "/rechtschreibung/Apfel", entry_page("Apfel", None), 2).await;

    let mut config = create_test_config(&server.uri(), output.clone(), vec![LemmaFeature::Title]);
    config.crawler.dedupe_requests = false;
    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.duplicates_skipped, 0);
    assert_eq!(read_lines(&output), vec!["title", "Apfel", "Apfel"]);
}

#[tokio::test]
async fn test_existing_output_fails_before_any_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("stale.csv");
    std::fs::write(&output, "title\nAlt\n").unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), output.clone(), vec![LemmaFeature::Title]);
    let result = Coordinator::new(config);

    assert!(matches!(
        result,
        Err(CrawlError::Output(OutputError::AlreadyExists { .. }))
    ));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "title\nAlt\n");
}

#[tokio::test]
async fn test_redirected_pages_keep_pagination_and_served_urls() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("redirects.csv");

    Mock::given(method("GET"))
        .and(path("/suchen/dudenonline/Apfel"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", "/suchen/dudenonline/Apfel/"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/suchen/dudenonline/Apfel/",
        search_page(
            &[vignette("Apfel", "Substantiv", "/rechtschreibung/Apfel")],
            Some("seite-2"),
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/suchen/dudenonline/Apfel/seite-2",
        search_page(
            &[vignette("Apfelbaum", "Substantiv", "/rechtschreibung/Apfelbaum")],
            None,
        ),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/rechtschreibung/Apfel"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", "/rechtschreibung/Apfel_Obst"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/rechtschreibung/Apfel_Obst", entry_page("Apfel", None), 1).await;
    mount_page(
        &server,
        "/rechtschreibung/Apfelbaum",
        entry_page("Apfelbaum", None),
        1,
    )
    .await;

    let config = create_test_config(
        &base_url,
        output.clone(),
        vec![LemmaFeature::Url, LemmaFeature::Title],
    );
    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.search_pages_processed, 2);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(stats.records_written, 2);

    let lines = read_lines(&output);
    assert_eq!(lines[0], "url;title");

    let mut rows = lines[1..].to_vec();
    rows.sort();
    assert_eq!(
        rows,
        vec![
            format!("{}/rechtschreibung/Apfel_Obst;Apfel", base_url),
            format!("{}/rechtschreibung/Apfelbaum;Apfelbaum", base_url),
        ]
    );
}

#[tokio::test]
async fn test_politeness_delay_spaces_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("polite.csv");

    mount_page(
        &server,
        "/suchen/dudenonline/Apfel",
        search_page(
            &[
                vignette("Apfel", "Substantiv", "/rechtschreibung/Apfel"),
                vignette("Apfelbaum", "Substantiv", "/rechtschreibung/Apfelbaum"),
            ],
            None,
        ),
        1,
    )
    .await;
    mount_page(&server, "/rechtschreibung/Apfel", entry_page("Apfel", None), 1).await;
    mount_page(&server, "/rechtschreibung/Apfelbaum", entry_page("Apfelbaum", None), 1).await;

    let mut config = create_test_config(&server.uri(), output.clone(), vec![LemmaFeature::Title]);
    config.crawler.request_delay_ms = 100;

    let started = std::time::Instant::now();
    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    // Three requests need at least two delays between them
    assert!(started.elapsed() >= std::time::Duration::from_millis(200));
    assert_eq!(stats.records_written, 2);
    assert_eq!(stats.fetch_failures, 0);
}

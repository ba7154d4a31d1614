//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock search endpoints and test
//! the full harvest cycle end-to-end against a SQLite snapshot.

use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use vacancy_harvester::config::{load_config, Config, OutputConfig, PaginationConfig, SearchConfig};
use vacancy_harvester::output::list_vacancies;
use vacancy_harvester::state::Termination;
use vacancy_harvester::{
    HarvestError, Harvester, ListingRecord, RecordFilter, SearchRequest, SnapshotStore,
    SqliteSnapshotStore, NOT_SPECIFIED,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/search/vacancy";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, db_path: &Path) -> Config {
    Config {
        search: SearchConfig {
            base_url: format!("{}{}", server.uri(), SEARCH_PATH),
            area: 1,
        },
        fetcher: Default::default(),
        pagination: PaginationConfig::default(),
        output: OutputConfig {
            database_path: db_path.to_string_lossy().to_string(),
        },
    }
}

/// One listing card; `None` fields are left out of the markup
fn card(title: &str, salary: Option<&str>, company: Option<&str>, location: &str) -> String {
    let mut html = String::from(r#"<div class="vacancy-search-item__card">"#);
    html.push_str(&format!(
        r#"<h2><span class="vacancy-name--dx3dV serp-item__title-text">{}</span></h2>"#,
        title
    ));
    if let Some(salary) = salary {
        html.push_str(&format!(
            r#"<span class="magritte-text compensation-text--cCPBX">{}</span>"#,
            salary
        ));
    }
    if let Some(company) = company {
        html.push_str(&format!(
            r#"<span class="company-info-text--O32pGCRW0YDmp3BHuNOP">{}</span>"#,
            company
        ));
    }
    html.push_str(&format!(
        r#"<span data-qa="vacancy-serp__vacancy-address_narrow">{}</span></div>"#,
        location
    ));
    html
}

fn results_page(cards: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><main class="vacancy-serp-content">{}</main></body></html>"#,
        cards.concat()
    )
}

fn titled_page(titles: &[&str]) -> String {
    let cards: Vec<String> = titles
        .iter()
        .map(|t| card(t, Some("100 000 ₽"), Some("Acme"), "Москва"))
        .collect();
    results_page(&cards)
}

/// Mounts a page for `text=backend` with the given status and body
async fn mount_page(server: &MockServer, page: u32, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("text", "backend"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn titles(records: &[ListingRecord]) -> Vec<&str> {
    records.iter().map(|r| r.title.as_str()).collect()
}

#[tokio::test]
async fn test_two_pages_then_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 200, titled_page(&["a1", "a2"])).await;
    mount_page(&server, 1, 200, titled_page(&["b1", "b2"])).await;
    mount_page(&server, 2, 200, results_page(&[])).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();

    let count = harvester.run(&SearchRequest::new("backend")).await.unwrap();

    assert_eq!(count, 4);
    let stored = harvester.store().list(&RecordFilter::default()).unwrap();
    assert_eq!(titles(&stored), vec!["a1", "a2", "b1", "b2"]);
}

#[tokio::test]
async fn test_not_found_ends_pagination() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 200, titled_page(&["a", "b", "c"])).await;
    mount_page(&server, 1, 404, String::new()).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();

    let report = harvester
        .run_with_report(&SearchRequest::new("backend"), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.record_count, 3);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.termination, Termination::EndOfResults);
    assert_eq!(harvester.store().count().unwrap(), 3);
}

#[tokio::test]
async fn test_server_error_keeps_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");

    // First run succeeds and stores two listings
    {
        let server = MockServer::start().await;
        mount_page(&server, 0, 200, titled_page(&["old1", "old2"])).await;
        mount_page(&server, 1, 200, results_page(&[])).await;

        let store = SqliteSnapshotStore::new(&db_path).unwrap();
        let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();
        assert_eq!(harvester.run(&SearchRequest::new("backend")).await.unwrap(), 2);
    }

    // Second run fails on its first page
    let server = MockServer::start().await;
    mount_page(&server, 0, 500, String::new()).await;

    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();
    let result = harvester.run(&SearchRequest::new("backend")).await;

    assert!(matches!(result, Err(HarvestError::FetchFailed { page: 0, .. })));
    let stored = harvester.store().list(&RecordFilter::default()).unwrap();
    assert_eq!(titles(&stored), vec!["old1", "old2"]);
}

#[tokio::test]
async fn test_failure_mid_run_stores_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 200, titled_page(&["a"])).await;
    mount_page(&server, 1, 503, String::new()).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();

    let result = harvester.run(&SearchRequest::new("backend")).await;

    assert!(matches!(result, Err(HarvestError::FetchFailed { page: 1, .. })));
    assert_eq!(harvester.store().count().unwrap(), 0);
}

#[tokio::test]
async fn test_repeated_runs_do_not_duplicate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(titled_page(&["a", "b"])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[])))
        .expect(2)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();

    harvester.run(&SearchRequest::new("backend")).await.unwrap();
    let first = harvester.store().list(&RecordFilter::default()).unwrap();

    harvester.run(&SearchRequest::new("backend")).await.unwrap();
    let second = harvester.store().list(&RecordFilter::default()).unwrap();

    assert_eq!(first, second);
    assert_eq!(harvester.store().count().unwrap(), 2);
}

#[tokio::test]
async fn test_missing_optional_fields_are_stored_as_sentinel() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        200,
        results_page(&[card("Intern", None, None, "Казань")]),
    )
    .await;
    mount_page(&server, 1, 404, String::new()).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();

    harvester.run(&SearchRequest::new("backend")).await.unwrap();

    let stored = harvester.store().list(&RecordFilter::default()).unwrap();
    assert_eq!(
        stored,
        vec![ListingRecord {
            title: "Intern".to_string(),
            salary: NOT_SPECIFIED.to_string(),
            company: NOT_SPECIFIED.to_string(),
            location: "Казань".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_malformed_card_fails_run() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        200,
        results_page(&[r#"<div class="vacancy-search-item__card"><span class="vacancy-name">No address</span></div>"#.to_string()]),
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();

    let result = harvester.run(&SearchRequest::new("backend")).await;

    assert!(matches!(result, Err(HarvestError::Extraction { page: 0, .. })));
    assert_eq!(harvester.store().count().unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_query_sends_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(titled_page(&["x"])))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();

    let mut request = SearchRequest::new("backend");
    request.employment_options = vec![1, 6];

    let result = harvester.run(&request).await;
    assert!(matches!(result, Err(HarvestError::InvalidQuery(_))));
}

#[tokio::test]
async fn test_filters_are_sent_as_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("text", "backend"))
        .and(query_param("area", "1"))
        .and(query_param("experience", "between1And3"))
        .and(query_param("education", "higher&special_secondary"))
        .and(query_param("employment", "full"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();

    let request = SearchRequest {
        text: "backend".to_string(),
        experience_id: 2,
        education_options: vec![3, 2],
        employment_options: vec![1],
    };

    assert_eq!(harvester.run(&request).await.unwrap(), 0);
}

#[tokio::test]
async fn test_page_limit_from_config() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 200, titled_page(&["a"])).await;
    mount_page(&server, 1, 200, titled_page(&["b"])).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(titled_page(&["c"])))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let config_path = temp_dir.path().join("harvester.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[search]
base-url = "{}{}"

[pagination]
max-pages = 2

[output]
database-path = "{}"
"#,
            server.uri(),
            SEARCH_PATH,
            db_path.display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    let store = SqliteSnapshotStore::new(Path::new(&config.output.database_path)).unwrap();
    let harvester = Harvester::new(config, store).unwrap();

    let report = harvester
        .run_with_report(&SearchRequest::new("backend"), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.termination, Termination::PageLimit);
    assert_eq!(report.record_count, 2);
}

#[tokio::test]
async fn test_stored_snapshot_can_be_filtered() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        200,
        results_page(&[
            card("Backend", Some("от 300 000 ₽"), Some("Яндекс"), "Москва"),
            card("Frontend", None, Some("VK"), "Санкт-Петербург"),
            card("DevOps", Some("250 000 ₽"), Some("Яндекс"), "Новосибирск"),
        ]),
    )
    .await;
    mount_page(&server, 1, 200, results_page(&[])).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vacancies.db");
    let store = SqliteSnapshotStore::new(&db_path).unwrap();
    let harvester = Harvester::new(create_test_config(&server, &db_path), store).unwrap();
    harvester.run(&SearchRequest::new("backend")).await.unwrap();

    // A fresh store on the same file sees the committed snapshot
    let reader = SqliteSnapshotStore::new(&db_path).unwrap();
    let filter = RecordFilter {
        company: Some("ЯНДЕКС".to_string()),
        ..RecordFilter::default()
    };
    let found = list_vacancies(&reader, &filter).unwrap();

    assert_eq!(titles(&found), vec!["Backend", "DevOps"]);
}

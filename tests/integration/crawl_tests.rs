//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the portal and drive the real
//! HTTP transport through the whole search, open and paginate flow.

use lawsuit_tracker::config::{Config, FailurePolicy, HttpConfig};
use lawsuit_tracker::crawler::{retrieve, run_codes, CrawlState, Crawler, SearchTarget};
use lawsuit_tracker::output::{FileOutput, OutputHandler};
use lawsuit_tracker::{HttpTransport, TrackerError};
use url::Url;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const CODE: &str = "0001234-56.2023.8.13.0001";
const SEARCH_PATH: &str = "/pje/ConsultaPublica/listView.seam";
const LAWSUIT_PATH: &str = "/lawsuit/view";
const SESSION_COOKIE: &str = "JSESSIONID=abc123";
const TOKEN: &str = "vs-token-7";

/// Matches the render request, which carries no AJAX event fields
struct RenderRequest;

impl Match for RenderRequest {
    fn matches(&self, request: &Request) -> bool {
        !String::from_utf8_lossy(&request.body).contains("AJAXREQUEST")
    }
}

fn landing_page() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            r#"<html><body><form id="fPP" action="{}" method="post"></form></body></html>"#,
            SEARCH_PATH
        ))
        .insert_header("set-cookie", "JSESSIONID=abc123; Path=/; HttpOnly")
}

fn search_results(links: &[&str]) -> ResponseTemplate {
    let rows: String = links
        .iter()
        .map(|link| {
            format!(
                r#"<tr class="rich-table-row"><td><a href="javascript:void(0)" onclick="openPopUp('Consulta pública','{}')">{}</a></td></tr>"#,
                link, CODE
            )
        })
        .collect();

    ResponseTemplate::new(200).set_body_string(format!(
        r#"<html><body><table id="fPP:processosTable"><tbody>{}</tbody></table></body></html>"#,
        rows
    ))
}

fn movement_table(records: &[&str]) -> String {
    let rows: String = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!(
                r#"<tr><td><span class="icon"></span><span id="j_id134:processoEvento:{}:j_id537">{}</span></td></tr>"#,
                i, record
            )
        })
        .collect();

    format!(
        r#"<table id="j_id134:processoEvento"><tbody id="j_id134:processoEvento:tb">{}</tbody></table>"#,
        rows
    )
}

fn lawsuit_page(max_page: u32, records: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        r#"<html><body>
            <form id="j_id134">
                <input type="hidden" name="javax.faces.ViewState" id="javax.faces.ViewState" value="{}">
            </form>
            <table><tr><td class="rich-inslider-right-num">{}</td></tr></table>
            {}
        </body></html>"#,
        TOKEN,
        max_page,
        movement_table(records)
    ))
}

fn rendered_page(records: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        "<html><body>{}</body></html>",
        movement_table(records)
    ))
}

/// Mounts the landing page, the search endpoint and the lawsuit page
async fn mount_portal(server: &MockServer, max_page: u32, first_page: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .and(header_exists("sec-fetch-mode"))
        .respond_with(landing_page())
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .and(header("cookie", SESSION_COOKIE))
        .and(body_string_contains(CODE))
        .respond_with(search_results(&["/lawsuit/view?id=1"]))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(LAWSUIT_PATH))
        .and(query_param("id", "1"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(lawsuit_page(max_page, first_page))
        .expect(1)
        .mount(server)
        .await;
}

fn crawler_for(server: &MockServer) -> Crawler<HttpTransport> {
    let transport = HttpTransport::new(&HttpConfig::default()).expect("Failed to build transport");
    let base_url = Url::parse(&server.uri()).expect("Failed to parse mock server URI");
    Crawler::new(transport, base_url)
}

#[tokio::test]
async fn test_end_to_end_two_pages() {
    let server = MockServer::start().await;
    mount_portal(&server, 2, &["Filed", "Served"]).await;

    Mock::given(method("POST"))
        .and(path(LAWSUIT_PATH))
        .and(header("cookie", SESSION_COOKIE))
        .and(body_string_contains("AJAXREQUEST"))
        .and(body_string_contains(TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ajax-response></ajax-response>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LAWSUIT_PATH))
        .and(header("cookie", SESSION_COOKIE))
        .and(body_string_contains(TOKEN))
        .and(RenderRequest)
        .respond_with(rendered_page(&["Hearing scheduled"]))
        .expect(1)
        .mount(&server)
        .await;

    let result = crawler_for(&server)
        .crawl(&SearchTarget::new(CODE))
        .await
        .expect("Crawl should succeed");

    assert_eq!(result.code(), CODE);
    assert_eq!(result.records(), ["Filed", "Served", "Hearing scheduled"]);
}

#[tokio::test]
async fn test_pages_collected_in_ascending_order() {
    let server = MockServer::start().await;
    mount_portal(&server, 3, &["p1-a", "p1-b"]).await;

    Mock::given(method("POST"))
        .and(path(LAWSUIT_PATH))
        .and(body_string_contains("AJAXREQUEST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    // Render responses are served once each, in registration order
    Mock::given(method("POST"))
        .and(path(LAWSUIT_PATH))
        .and(RenderRequest)
        .respond_with(rendered_page(&["p2-a"]))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LAWSUIT_PATH))
        .and(RenderRequest)
        .respond_with(rendered_page(&["p3-a", "p3-a"]))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let result = crawler_for(&server)
        .crawl(&SearchTarget::new(CODE))
        .await
        .expect("Crawl should succeed");

    assert_eq!(result.records(), ["p1-a", "p1-b", "p2-a", "p3-a", "p3-a"]);
}

#[tokio::test]
async fn test_single_page_skips_pagination() {
    let server = MockServer::start().await;
    mount_portal(&server, 1, &["Filed"]).await;

    Mock::given(method("POST"))
        .and(path(LAWSUIT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = crawler_for(&server)
        .crawl(&SearchTarget::new(CODE))
        .await
        .expect("Crawl should succeed");

    assert_eq!(result.records(), ["Filed"]);
}

#[tokio::test]
async fn test_no_matching_lawsuit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(landing_page())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(search_results(&[]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(LAWSUIT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = crawler_for(&server)
        .crawl(&SearchTarget::new(CODE))
        .await
        .expect("Empty search is not an error");

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_pagination_failure_aborts_code() {
    let server = MockServer::start().await;
    mount_portal(&server, 2, &["Filed", "Served"]).await;

    Mock::given(method("POST"))
        .and(path(LAWSUIT_PATH))
        .and(body_string_contains("AJAXREQUEST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LAWSUIT_PATH))
        .and(RenderRequest)
        .respond_with(rendered_page(&["Hearing scheduled"]))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut outputs: Vec<Box<dyn OutputHandler>> = vec![Box::new(FileOutput::new(dir.path()))];

    let summary = run_codes(
        &crawler_for(&server),
        &[SearchTarget::new(CODE)],
        &mut outputs,
        FailurePolicy::Abort,
    )
    .await
    .expect("Outputs should not fail");

    assert!(!summary.is_success());
    assert!(summary.completed.is_empty());

    let failure = &summary.failed[0];
    assert_eq!(failure.code, CODE);
    assert_eq!(failure.stage, CrawlState::Paginating(1));
    assert!(matches!(
        failure.source,
        TrackerError::Transport { status: 500, .. }
    ));

    // Truncated at crawl start, nothing written after the failure
    let saved = std::fs::read_to_string(dir.path().join(format!("{}.txt", CODE)))
        .expect("Lawsuit file should exist");
    assert_eq!(saved, "");
}

#[tokio::test]
async fn test_landing_page_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = crawler_for(&server)
        .crawl(&SearchTarget::new(CODE))
        .await
        .expect_err("Landing failure is fatal");

    assert_eq!(err.stage, CrawlState::Init);
    assert!(matches!(err.source, TrackerError::Transport { status: 503, .. }));
}

#[tokio::test]
async fn test_retrieve_saves_lawsuit_file() {
    let server = MockServer::start().await;
    mount_portal(&server, 1, &["Filed", "Served"]).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let save_dir = dir.path().join("save");

    let mut config = Config::default();
    config.portal.base_url = server.uri();
    config.output.directory = save_dir.display().to_string();

    let mut outputs: Vec<Box<dyn OutputHandler>> =
        vec![Box::new(FileOutput::new(&config.output.directory))];

    let summary = retrieve(&config, &[SearchTarget::new(CODE)], &mut outputs)
        .await
        .expect("Retrieve should succeed");

    assert!(summary.is_success());
    assert_eq!(summary.completed.len(), 1);

    let saved = std::fs::read_to_string(save_dir.join(format!("{}.txt", CODE)))
        .expect("Lawsuit file should exist");
    assert_eq!(saved, "Filed\nServed\n");
}

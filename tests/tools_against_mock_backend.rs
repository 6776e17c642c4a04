//! End-to-end tool behavior against a mocked search API.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use autotask_search_mcp::backend_client::BackendClient;
use autotask_search_mcp::config::Config;
use autotask_search_mcp::error::ErrorKind;
use autotask_search_mcp::tools::handlers;
use autotask_search_mcp::tools::{
    GetRelatedTicketsInput, GetTicketDetailsInput, GetTicketsNotesInput, SearchTicketsInput,
};

const KEY: &str = "integration-secret-key";

fn client_for(server: &MockServer) -> BackendClient {
    let config = Config::new(&server.uri(), KEY).unwrap();
    BackendClient::new(&config).unwrap()
}

fn slow_client(server: &MockServer) -> BackendClient {
    let config = Config::new(&server.uri(), KEY)
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    BackendClient::new(&config).unwrap()
}

fn search(query: &str, limit: Option<i64>) -> SearchTicketsInput {
    serde_json::from_value(json!({ "query": query, "limit": limit })).unwrap()
}

fn notes_input(value: serde_json::Value) -> GetTicketsNotesInput {
    serde_json::from_value(value).unwrap()
}

fn hit(id: i64, score: f64) -> serde_json::Value {
    json!({
        "id": id,
        "task_number": format!("T2024.{:04}", id),
        "title": format!("Ticket {}", id),
        "description": "snippet",
        "create_date": "2024-03-01T10:00:00Z",
        "relevance_score": score
    })
}

#[tokio::test]
async fn search_sends_bearer_token_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/double-reranked/"))
        .and(header("Authorization", format!("Bearer {}", KEY).as_str()))
        .and(query_param("q", "printer jam"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [hit(1, 0.5)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = handlers::search_tickets(&client_for(&server), search("  printer jam ", None))
        .await
        .unwrap();
    assert!(output.starts_with("Found 1 result(s) for \"printer jam\""));
    assert!(!output.contains(KEY));
}

#[tokio::test]
async fn search_clamps_limit_and_preserves_backend_order() {
    let server = MockServer::start().await;
    let scores = [0.31, 0.97, 0.5, 0.123456789, 0.88];
    let results: Vec<_> = scores
        .iter()
        .enumerate()
        .map(|(i, s)| hit(i as i64 + 1, *s))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/search/double-reranked/"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .expect(1)
        .mount(&server)
        .await;

    let output = handlers::search_tickets(&client_for(&server), search("vpn", Some(500)))
        .await
        .unwrap();

    let positions: Vec<usize> = (1..=5)
        .map(|id| output.find(&format!("(id {})", id)).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(output.contains("relevance: 0.123456789"));
    assert!(output.contains("relevance: 0.97"));
}

#[tokio::test]
async fn search_truncates_oversized_backend_response() {
    let server = MockServer::start().await;
    let results: Vec<_> = (1..=12).map(|id| hit(id, 0.9)).collect();
    Mock::given(method("GET"))
        .and(path("/api/search/double-reranked/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(&server)
        .await;

    let output = handlers::search_tickets(&client_for(&server), search("vpn", Some(5)))
        .await
        .unwrap();
    assert!(output.starts_with("Found 5 result(s)"));
    assert!(!output.contains("(id 6)"));
}

#[tokio::test]
async fn search_with_zero_limit_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = handlers::search_tickets(&client_for(&server), search("vpn", Some(0)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[tokio::test]
async fn search_without_hits_reports_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/double-reranked/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let output = handlers::search_tickets(&client_for(&server), search("zzz", None))
        .await
        .unwrap();
    assert!(output.contains("[MCPS-NORES]"));
}

#[tokio::test]
async fn search_passes_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/double-reranked/"))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("sentiment", "negative"))
        .and(query_param("priority_only", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [hit(1, 0.4)] })))
        .expect(1)
        .mount(&server)
        .await;

    let input: SearchTicketsInput = serde_json::from_value(json!({
        "query": "billing",
        "start_date": "2024-01-01",
        "sentiment": "Negative",
        "priority_only": true
    }))
    .unwrap();
    let output = handlers::search_tickets(&client_for(&server), input)
        .await
        .unwrap();
    assert!(output.contains("Filters: start_date=2024-01-01, sentiment=negative, priority_only=true"));
}

#[tokio::test]
async fn backend_400_surfaces_its_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/double-reranked/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "query too long" })),
        )
        .mount(&server)
        .await;

    let err = handlers::search_tickets(&client_for(&server), search("vpn", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert!(err.to_string().contains("query too long"));
}

#[tokio::test]
async fn related_clamps_limit_to_30() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets/42/related/"))
        .and(query_param("limit", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "source_ticket": { "id": 42, "task_number": "T42", "title": "Seed" },
            "related": [hit(7, 0.77)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = GetRelatedTicketsInput {
        task_id: 42,
        limit: Some(50),
    };
    let output = handlers::get_related_tickets(&client_for(&server), input)
        .await
        .unwrap();
    assert!(output.starts_with("Found 1 ticket(s) related to T42 (id 42): Seed"));
    assert!(output.contains("relevance: 0.77"));
}

#[tokio::test]
async fn details_filter_system_notes_and_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets/12345/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12345,
            "task_number": "T20240216.0023",
            "title": "Password reset loop",
            "description": "User cannot reset password",
            "notes": [
                { "id": 3, "content": "Second", "created": "2024-02-16T10:00:00Z" },
                { "id": 2, "content": "Workflow fired", "created": "2024-02-16T08:30:00Z", "is_system_generated": true },
                { "id": 1, "content": "First", "created": "2024-02-16T09:00:00Z" }
            ]
        })))
        .mount(&server)
        .await;

    let output =
        handlers::get_ticket_details(&client_for(&server), GetTicketDetailsInput { task_id: 12345 })
            .await
            .unwrap();
    assert!(output.contains("--- Notes (2) ---"));
    assert!(!output.contains("Workflow fired"));
    assert!(output.find("First").unwrap() < output.find("Second").unwrap());
}

#[tokio::test]
async fn details_json_404_is_ticket_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets/99999/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .mount(&server)
        .await;

    let err =
        handlers::get_ticket_details(&client_for(&server), GetTicketDetailsInput { task_id: 99999 })
            .await
            .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_tool_message().contains("99999"));
}

#[tokio::test]
async fn details_html_404_is_endpoint_not_found() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
        .mount(&server)
        .await;

    let err =
        handlers::get_ticket_details(&client_for(&server), GetTicketDetailsInput { task_id: 1 })
            .await
            .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
    assert!(err.to_tool_message().starts_with("Error [MCPS-404]"));
}

#[tokio::test]
async fn unauthorized_is_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "bad token" })))
        .mount(&server)
        .await;

    let err = handlers::search_tickets(&client_for(&server), search("vpn", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthFailed);
    assert!(!err.to_tool_message().contains(KEY));
}

#[tokio::test]
async fn server_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "error": "index rebuilding" })))
        .mount(&server)
        .await;

    let err = handlers::search_tickets(&client_for(&server), search("vpn", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerError);
    let message = err.to_tool_message();
    assert!(message.contains("503"));
    assert!(message.contains("index rebuilding"));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = handlers::search_tickets(&slow_client(&server), search("vpn", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn unreachable_backend_is_connection_error() {
    let config = Config::new("http://127.0.0.1:1", KEY).unwrap();
    let client = BackendClient::new(&config).unwrap();

    let err = handlers::search_tickets(&client, search("vpn", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectionError);
    assert!(err.to_tool_message().starts_with("Error [MCPS-CONN]"));
}

#[tokio::test]
async fn bulk_notes_is_one_request_grouped_per_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tickets/notes/bulk/"))
        .and(body_json(json!({ "task_ids": [1, 2], "task_numbers": ["T1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [
                { "id": 10, "task_id": 1, "task_number": "T1", "content": "later", "created": "2024-01-02T00:00:00Z" },
                { "id": 11, "task_id": 1, "task_number": "T1", "content": "robot", "created": "2024-01-01T12:00:00Z", "is_system_generated": true },
                { "id": 12, "task_id": 1, "task_number": "T1", "content": "earlier", "created": "2024-01-01T00:00:00Z" }
            ],
            "not_found": { "task_ids": [2], "task_numbers": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = notes_input(json!({ "task_ids": [1, 2, 1], "task_numbers": [" T1 "] }));
    let output = handlers::get_tickets_notes(&client_for(&server), input)
        .await
        .unwrap();

    assert!(output.starts_with("Notes for 3 ticket(s), 4 note(s) total:"));
    assert!(output.contains("=== id 2 ===\n[UNRECOGNIZED]"));
    assert!(!output.contains("robot"));
    assert!(output.find("earlier").unwrap() < output.find("later").unwrap());
}

#[tokio::test]
async fn bulk_notes_enforces_50_identifier_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tickets/notes/bulk/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "notes": [] })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let fifty: Vec<i64> = (1..=50).collect();
    let output = handlers::get_tickets_notes(&client, notes_input(json!({ "task_ids": fifty })))
        .await
        .unwrap();
    assert!(output.starts_with("Notes for 50 ticket(s)"));

    let fifty_one: Vec<i64> = (1..=51).collect();
    let err = handlers::get_tickets_notes(&client, notes_input(json!({ "task_ids": fifty_one })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooManyTickets);
    assert!(err.to_tool_message().starts_with("Error [MCPS-NOTES-LIMIT]"));
}

#[tokio::test]
async fn bulk_notes_rejects_missing_and_empty_lists() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = handlers::get_tickets_notes(&client, notes_input(json!({})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoParameters);

    let err = handlers::get_tickets_notes(
        &client,
        notes_input(json!({ "task_ids": [], "task_numbers": [] })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyParameters);
}

#[tokio::test]
async fn bulk_notes_404_is_endpoint_level() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .mount(&server)
        .await;

    let err = handlers::get_tickets_notes(&client_for(&server), notes_input(json!({ "task_ids": [1] })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
}

#[tokio::test]
async fn slow_ticket_details_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets/7/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 7 }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = handlers::get_ticket_details(&slow_client(&server), GetTicketDetailsInput { task_id: 7 })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.to_tool_message().starts_with("Error [MCPS-TIMEOUT]"));
}

#[tokio::test]
async fn slow_related_tickets_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets/7/related/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let input = GetRelatedTicketsInput {
        task_id: 7,
        limit: None,
    };
    let err = handlers::get_related_tickets(&slow_client(&server), input)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn related_for_missing_seed_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets/42/related/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Ticket not found" })))
        .expect(1)
        .mount(&server)
        .await;

    let input = GetRelatedTicketsInput {
        task_id: 42,
        limit: None,
    };
    let err = handlers::get_related_tickets(&client_for(&server), input)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let message = err.to_tool_message();
    assert!(message.starts_with("Error [MCPS-NOTFOUND]"));
    assert!(message.contains("42"));
}

#[tokio::test]
async fn search_accepts_hits_with_record_id_and_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/double-reranked/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": 501,
                "task_id": 12345,
                "task_number": "T20240216.0023",
                "title": "VPN drops",
                "description": "VPN drops every hour",
                "snippet": "...drops every hour...",
                "created": "2024-02-16T08:00:00Z",
                "create_date": "2024-02-16T08:00:00Z",
                "relevance_score": 0.87
            }]
        })))
        .mount(&server)
        .await;

    let output = handlers::search_tickets(&client_for(&server), search("vpn", None))
        .await
        .unwrap();
    assert!(output.contains("[1] T20240216.0023 (id 12345) | relevance: 0.87"));
    assert!(output.contains("...drops every hour..."));
}

#[tokio::test]
async fn bulk_notes_attributes_id_only_notes_to_number_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tickets/notes/bulk/"))
        .and(body_json(json!({ "task_numbers": ["T1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [
                { "id": 1, "task_id": 1, "content": "Replaced the toner", "created": "2024-01-01T00:00:00Z" }
            ],
            "tickets": [{ "task_id": 1, "task_number": "T1", "title": "Printer" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = handlers::get_tickets_notes(
        &client_for(&server),
        notes_input(json!({ "task_numbers": ["T1"] })),
    )
    .await
    .unwrap();
    assert!(output.starts_with("Notes for 1 ticket(s), 1 note(s) total:"));
    assert!(output.contains("=== T1 (id 1): Printer ==="));
    assert!(output.contains("Replaced the toner"));
    assert!(!output.contains("(no human notes)"));
}

use docgen_backend::{BackendClient, BackendConfig, RetryConfig};
use docgen_core::{ContextSource, DocgenError, ForwardedCredentials};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> BackendClient {
    let config = BackendConfig::new(format!("{}/api", server.uri()))
        .with_retry_config(RetryConfig::default().with_delay(Duration::ZERO));
    BackendClient::new(config).unwrap()
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_project(server: &MockServer) {
    mount_json(
        server,
        "/api/project/p1",
        json!({"project": {"_id": "p1", "name": "Apollo", "description": "Mission control"}}),
    )
    .await;
    mount_json(
        server,
        "/api/tasks/p1",
        json!({"tasks": [
            {"title": "Login", "status": "Done", "priority": "high", "estimatedHours": 5},
            {"title": "Audit", "status": "To Do"}
        ]}),
    )
    .await;
    mount_json(
        server,
        "/api/sprint/p1",
        json!({"sprints": [{"sprintId": "Sprint 2", "status": "Active", "predictedVelocity": 21}]}),
    )
    .await;
    mount_json(
        server,
        "/api/projectMember/p1",
        json!({"members": [{"memberId": {"name": "Ada"}, "role": "Developer"}]}),
    )
    .await;
}

#[tokio::test]
async fn fetches_and_assembles_context() {
    let server = MockServer::start().await;
    mount_project(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/activity-logs"))
        .and(query_param("project", "p1"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activityLogs": [{"user": {"name": "Ada"}, "action": "created", "entityType": "task"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blockers"))
        .and(query_param("projectId", "p1"))
        .and(query_param("resolved", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blockers": [{"severity": "High", "reason": "Staging is down"}]
        })))
        .mount(&server)
        .await;

    let context = backend(&server).fetch("p1", None, &ForwardedCredentials::default()).await.unwrap();

    assert_eq!(context.project.name.as_deref(), Some("Apollo"));
    assert_eq!(context.project.record_id(), Some("p1"));
    assert_eq!(context.tasks.stats.total, 2);
    assert_eq!(context.tasks.stats.completion_rate, 50.0);
    assert_eq!(context.sprints.stats.active, 1);
    assert_eq!(context.members.stats.by_role["Developer"], 1);
    assert_eq!(context.activity.total, 1);
    assert_eq!(context.blockers.total, 1);
    assert!(context.sprint_detail.is_none());
}

#[tokio::test]
async fn tolerates_duplicate_ids_and_loose_scalars() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/project/p1",
        json!({"project": {"_id": "p1", "id": "p1", "name": "Apollo"}}),
    )
    .await;
    mount_json(
        &server,
        "/api/tasks/p1",
        json!({"tasks": [
            {"_id": "t1", "id": "t1", "title": "Login", "status": "Done", "estimatedHours": "4.5"},
            {"_id": "t2", "title": "Audit", "estimatedHours": {"value": 2}}
        ]}),
    )
    .await;
    mount_json(
        &server,
        "/api/sprint/p1",
        json!({"sprints": [{"_id": "s1", "id": "s1", "sprintId": 3, "goals": "ship it"}]}),
    )
    .await;
    mount_json(&server, "/api/projectMember/p1", json!({"members": []})).await;

    let context = backend(&server).fetch("p1", None, &ForwardedCredentials::default()).await.unwrap();

    assert_eq!(context.project.record_id(), Some("p1"));
    assert_eq!(context.project.name.as_deref(), Some("Apollo"));
    assert_eq!(context.tasks.stats.total, 2);
    assert_eq!(context.tasks.stats.total_estimated_hours, 4.5);
    assert_eq!(context.tasks.items[1].record_id(), Some("t2"));
    let latest = context.sprints.latest.unwrap();
    assert_eq!(latest.label(), Some("3"));
    assert!(latest.goals.is_empty());
}

#[tokio::test]
async fn forwards_credentials_to_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer token-123"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "project": {"name": "Apollo"}, "tasks": [], "sprints": [], "members": []
        })))
        .mount(&server)
        .await;

    let credentials =
        ForwardedCredentials::new(Some("Bearer token-123".into()), Some("sid=abc".into()));
    let context = backend(&server).fetch("p1", None, &credentials).await.unwrap();
    assert_eq!(context.project.name.as_deref(), Some("Apollo"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn fetches_sprint_detail_when_requested() {
    let server = MockServer::start().await;
    mount_project(&server).await;
    mount_json(
        &server,
        "/api/sprint/sprint/s9",
        json!({"success": true, "sprint": {"sprintId": "Sprint 9", "goals": ["Ship"]}}),
    )
    .await;

    let context =
        backend(&server).fetch("p1", Some("s9"), &ForwardedCredentials::default()).await.unwrap();
    let detail = context.sprint_detail.unwrap();
    assert_eq!(detail.label(), Some("Sprint 9"));
    assert_eq!(context.sprint_id.as_deref(), Some("s9"));
}

#[tokio::test]
async fn sprint_body_without_sprint_or_success_is_not_found() {
    let server = MockServer::start().await;
    mount_project(&server).await;
    mount_json(&server, "/api/sprint/sprint/s9", json!({"message": "nope"})).await;

    let err =
        backend(&server).fetch("p1", Some("s9"), &ForwardedCredentials::default()).await.unwrap_err();
    assert!(matches!(err, DocgenError::NotFound(_)));
}

#[tokio::test]
async fn missing_project_key_is_not_found() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/project/p1", json!({"members": []})).await;

    let err = backend(&server)
        .project("p1", &ForwardedCredentials::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DocgenError::NotFound(_)));
}

#[tokio::test]
async fn status_codes_map_to_error_kinds() {
    let cases = [
        (401, "unauthorized"),
        (403, "forbidden"),
        (404, "not_found"),
        (500, "fetch"),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/project/p1"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .expect(1)
            .mount(&server)
            .await;

        let err = backend(&server).project("p1", &ForwardedCredentials::default()).await.unwrap_err();
        let matched = match expected {
            "unauthorized" => matches!(err, DocgenError::Auth { forbidden: false, .. }),
            "forbidden" => matches!(err, DocgenError::Auth { forbidden: true, .. }),
            "not_found" => matches!(err, DocgenError::NotFound(_)),
            _ => matches!(err, DocgenError::Fetch { timed_out: false, .. }),
        };
        assert!(matched, "status {status} mapped to {err:?}");
    }
}

#[tokio::test]
async fn required_failure_fails_whole_fetch() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/project/p1", json!({"project": {"name": "Apollo"}})).await;
    mount_json(&server, "/api/sprint/p1", json!({"sprints": []})).await;
    mount_json(&server, "/api/projectMember/p1", json!({"members": []})).await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/p1"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = backend(&server).fetch("p1", None, &ForwardedCredentials::default()).await.unwrap_err();
    assert!(matches!(err, DocgenError::Fetch { .. }));
}

#[tokio::test]
async fn supplementary_failures_are_tolerated() {
    let server = MockServer::start().await;
    mount_project(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/blockers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let context = backend(&server).fetch("p1", None, &ForwardedCredentials::default()).await.unwrap();
    assert_eq!(context.blockers.total, 0);
    assert_eq!(context.activity.total, 0);
}

#[tokio::test]
async fn undecodable_body_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = backend(&server).project("p1", &ForwardedCredentials::default()).await.unwrap_err();
    assert!(matches!(err, DocgenError::Fetch { timed_out: false, .. }));
}

#[tokio::test]
async fn timeout_is_retried_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project/p1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"project": {"name": "Slow"}}))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_json(&server, "/api/project/p1", json!({"project": {"name": "Apollo"}})).await;

    let config = BackendConfig::new(format!("{}/api", server.uri()))
        .with_timeout(Duration::from_millis(200))
        .with_retry_config(RetryConfig::default().with_delay(Duration::ZERO));
    let project = BackendClient::new(config)
        .unwrap()
        .project("p1", &ForwardedCredentials::default())
        .await
        .unwrap();

    assert_eq!(project.name.as_deref(), Some("Apollo"));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn persistent_timeout_is_reported_as_timed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project/p1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = BackendConfig::new(format!("{}/api", server.uri()))
        .with_timeout(Duration::from_millis(100))
        .with_retry_config(RetryConfig::default().with_delay(Duration::ZERO));
    let err = BackendClient::new(config)
        .unwrap()
        .project("p1", &ForwardedCredentials::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn unreachable_backend_is_fetch_error() {
    let config = BackendConfig::new("http://127.0.0.1:9/api")
        .with_timeout(Duration::from_secs(2))
        .with_retry_config(RetryConfig::default().with_delay(Duration::ZERO));
    let err = BackendClient::new(config)
        .unwrap()
        .project("p1", &ForwardedCredentials::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DocgenError::Fetch { .. }));
}

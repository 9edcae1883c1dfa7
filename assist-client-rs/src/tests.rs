use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assist_types::{JobStatus, Tool, ToolRequest};

use crate::{AssistClient, ClientError, PollOptions};

fn job_body(job_id: Uuid, status: &str) -> serde_json::Value {
    json!({ "job_id": job_id, "status": status, "result": null })
}

fn quick_poll(max_attempts: u32) -> PollOptions {
    PollOptions {
        interval: Duration::from_millis(10),
        max_attempts,
    }
}

#[tokio::test]
async fn poll_resolves_after_intermediate_running_states() {
    let server = MockServer::start().await;
    let job_id = Uuid::new_v4();
    let job_path = format!("/api/jobs/{}", job_id);

    Mock::given(method("GET"))
        .and(path(job_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body(job_id, "running")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(job_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": job_id,
            "status": "completed",
            "result": { "success": true, "data": { "summary": "ok" }, "tool": "debugger" }
        })))
        .mount(&server)
        .await;

    let client = AssistClient::new(server.uri()).unwrap();
    let updates = AtomicU32::new(0);
    let job = client
        .poll_job(job_id, &quick_poll(10), |_| {
            updates.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result.unwrap()["tool"], "debugger");
    // running, running, completed: one callback per status read.
    assert_eq!(updates.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn poll_times_out_after_exactly_max_attempts_reads() {
    let server = MockServer::start().await;
    let job_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/jobs/{}", job_id).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body(job_id, "running")))
        .expect(5)
        .mount(&server)
        .await;

    let client = AssistClient::new(server.uri()).unwrap();
    let result = client.poll_job(job_id, &quick_poll(5), |_| {}).await;

    match result {
        Err(ClientError::Timeout { attempts }) => assert_eq!(attempts, 5),
        other => panic!("expected timeout, got {:?}", other.map(|j| j.status)),
    }
}

#[tokio::test]
async fn failed_job_resolves_rather_than_timing_out() {
    let server = MockServer::start().await;
    let job_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": job_id,
            "status": "failed",
            "result": null,
            "error": "AI Analysis failed: Server error: boom"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AssistClient::new(server.uri()).unwrap();
    let job = client.poll_job(job_id, &quick_poll(5), |_| {}).await.unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().starts_with("AI Analysis failed:"));
}

#[tokio::test]
async fn submit_job_posts_to_the_kind_path() {
    let server = MockServer::start().await;
    let job_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/jobs/refactor"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "job_id": job_id, "status": "pending" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AssistClient::new(server.uri()).unwrap();
    let ticket = client
        .submit_job("refactor", &ToolRequest::with_code("x = 1"))
        .await
        .unwrap();

    assert_eq!(ticket.job_id, job_id);
    assert_eq!(ticket.status, JobStatus::Pending);
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Unknown job kind: lint" })),
        )
        .mount(&server)
        .await;

    let client = AssistClient::new(server.uri()).unwrap();
    let err = client
        .submit_job("lint", &ToolRequest::with_code("x"))
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Unknown job kind: lint");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn run_tool_hits_the_synchronous_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/optimize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "summary": "tight loop" },
            "tool": "optimizer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AssistClient::new(server.uri()).unwrap();
    let envelope = client
        .run_tool(Tool::Optimize, &ToolRequest::with_code("while True: pass"))
        .await
        .unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.tool, "optimizer");
}

#[tokio::test]
async fn analyze_many_keeps_tool_outcomes_independent() {
    let server = MockServer::start().await;
    let debug_id = Uuid::new_v4();
    let test_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/jobs/debug"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "job_id": debug_id, "status": "pending" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/jobs/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "job_id": test_id, "status": "pending" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/jobs/{}", debug_id).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": debug_id,
            "status": "completed",
            "result": { "success": true, "data": {}, "tool": "debugger" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/jobs/{}", test_id).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": test_id,
            "status": "failed",
            "result": null,
            "error": "AI Analysis failed: Rate limited"
        })))
        .mount(&server)
        .await;

    let client = AssistClient::new(server.uri()).unwrap();
    let results = client
        .analyze_many(
            &[Tool::Debug, Tool::Test],
            &ToolRequest::with_code("x = 1"),
            &quick_poll(5),
        )
        .await;

    assert_eq!(results.len(), 2);
    let debug_job = results[0].as_ref().unwrap();
    let test_job = results[1].as_ref().unwrap();
    assert_eq!(debug_job.status, JobStatus::Completed);
    assert_eq!(test_job.status, JobStatus::Failed);
}

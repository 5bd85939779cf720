//! Prover client protocol tests against in-process fake prover services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use wormfarm_prover::{ProverClient, ProverConfig, ProverError};

/// Bind a router on an ephemeral port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn proof_request() -> wormfarm_prover::ProofRequest {
    wormfarm_prover::ProofRequest {
        network: "sepolia".into(),
        amount: "0.05".into(),
        broadcaster_fee: "0".into(),
        prover_fee: "0".into(),
        spend: "0.04999".into(),
        burn_key: "12345".into(),
        wallet_address: "0x716bC7e331c9Da551e5Eb6A099c300db4c08E994".into(),
        receiver_hook: "0x".into(),
        proof: None,
        block_number: None,
    }
}

fn completed_result() -> Value {
    json!({
        "burn_address": "0x000000000000000000000000000000000000dEaD",
        "proof": {
            "pi_a": ["11", "12", "1"],
            "pi_b": [["21", "22"], ["23", "24"], ["1", "0"]],
            "pi_c": ["31", "32", "1"]
        },
        "block_number": 123456u64,
        "nullifier_u256": "987654321",
        "remaining_coin": "0",
        "broadcaster_fee": "0",
        "prover_fee": "0",
        "prover": "0x716bC7e331c9Da551e5Eb6A099c300db4c08E994",
        "reveal_amount": "49990000000000000",
        "wallet_address": "0xcBdF9890B5935F01B2f21583d1885CdC8389eb5F"
    })
}

fn client_for(primary: &str, backups: Vec<String>, timeout: Duration) -> ProverClient {
    ProverClient::new(ProverConfig {
        primary_url: Some(primary.to_string()),
        backup_urls: backups,
        timeout,
        poll_interval: Duration::from_millis(10),
    })
    .unwrap()
}

#[tokio::test]
async fn submit_fails_over_on_queue_full_and_pins_working_endpoint() {
    let a_hits = Arc::new(AtomicUsize::new(0));
    let a_hits_handler = a_hits.clone();
    let endpoint_a = serve(Router::new().route(
        "/proof",
        post(move || {
            let hits = a_hits_handler.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::TOO_MANY_REQUESTS, Json(json!({})))
            }
        }),
    ))
    .await;

    let b_hits = Arc::new(AtomicUsize::new(0));
    let b_hits_handler = b_hits.clone();
    let endpoint_b = serve(Router::new().route(
        "/proof",
        post(move || {
            let hits = b_hits_handler.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::OK,
                    Json(json!({ "result": { "job_id": "job-from-b" } })),
                )
            }
        }),
    ))
    .await;

    let client = client_for(
        &endpoint_a,
        vec![endpoint_b.clone()],
        Duration::from_secs(5),
    );

    let job = client.submit(&proof_request()).await.unwrap();
    assert_eq!(job.0, "job-from-b");
    assert_eq!(client.active_endpoint(), endpoint_b);

    // The pinned endpoint is tried first from now on; A sees no more traffic.
    let job = client.submit(&proof_request()).await.unwrap();
    assert_eq!(job.0, "job-from-b");
    assert_eq!(a_hits.load(Ordering::SeqCst), 1);
    assert_eq!(b_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn submit_advances_past_application_level_errors() {
    let endpoint_a = serve(Router::new().route(
        "/proof",
        post(|| async {
            (
                StatusCode::OK,
                Json(json!({ "status": "error", "message": "burn key rejected" })),
            )
        }),
    ))
    .await;
    let endpoint_b = serve(Router::new().route(
        "/proof",
        post(|| async {
            (
                StatusCode::OK,
                Json(json!({ "result": { "job_id": "job-2" } })),
            )
        }),
    ))
    .await;

    let client = client_for(&endpoint_a, vec![endpoint_b], Duration::from_secs(5));
    let job = client.submit(&proof_request()).await.unwrap();
    assert_eq!(job.0, "job-2");
}

#[tokio::test]
async fn submit_reports_last_error_when_all_endpoints_fail() {
    let endpoint = serve(Router::new().route(
        "/proof",
        post(|| async {
            (
                StatusCode::OK,
                Json(json!({ "status": "error", "message": "queue purge in progress" })),
            )
        }),
    ))
    .await;

    // Single live endpoint plus one dead one; both must be exhausted.
    let client = client_for(
        &endpoint,
        vec!["http://127.0.0.1:1".to_string()],
        Duration::from_secs(5),
    );

    let err = client.submit(&proof_request()).await.unwrap_err();
    match err {
        ProverError::AllEndpointsFailed { last_error } => {
            assert!(!last_error.is_empty());
        }
        other => panic!("expected AllEndpointsFailed, got {other:?}"),
    }
}

/// Fake prover that walks a job through pending → in_progress → completed.
fn staged_prover(polls: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/proof",
            post(|| async {
                (
                    StatusCode::OK,
                    Json(json!({ "result": { "job_id": "staged-job" } })),
                )
            }),
        )
        .route(
            "/proof/:id",
            get(move |Path(_id): Path<String>| {
                let polls = polls.clone();
                async move {
                    let n = polls.fetch_add(1, Ordering::SeqCst);
                    let body = match n {
                        0 => json!({ "status": "pending" }),
                        1 => json!({ "status": "in_progress" }),
                        _ => json!({ "status": "completed", "result": completed_result() }),
                    };
                    (StatusCode::OK, Json(body))
                }
            }),
        )
}

#[tokio::test]
async fn poll_maps_transient_states_to_not_ready() {
    let polls = Arc::new(AtomicUsize::new(0));
    let endpoint = serve(staged_prover(polls.clone())).await;
    let client = client_for(&endpoint, vec![], Duration::from_secs(5));

    let job = client.submit(&proof_request()).await.unwrap();
    assert!(client.poll(&job).await.unwrap().is_none()); // pending
    assert!(client.poll(&job).await.unwrap().is_none()); // in_progress
    let bundle = client.poll(&job).await.unwrap().unwrap();
    assert_eq!(bundle.block_number, 123456);
}

#[tokio::test]
async fn poll_raises_on_error_status() {
    let endpoint = serve(
        Router::new()
            .route(
                "/proof",
                post(|| async {
                    (
                        StatusCode::OK,
                        Json(json!({ "result": { "job_id": "doomed" } })),
                    )
                }),
            )
            .route(
                "/proof/:id",
                get(|Path(_id): Path<String>| async {
                    (
                        StatusCode::OK,
                        Json(json!({ "status": "error", "message": "witness failure" })),
                    )
                }),
            ),
    )
    .await;

    let client = client_for(&endpoint, vec![], Duration::from_secs(5));
    let job = client.submit(&proof_request()).await.unwrap();
    let err = client.poll(&job).await.unwrap_err();
    assert!(matches!(err, ProverError::ProofRejected(msg) if msg.contains("witness")));
}

#[tokio::test]
async fn generate_polls_until_completion() {
    let polls = Arc::new(AtomicUsize::new(0));
    let endpoint = serve(staged_prover(polls.clone())).await;
    let client = client_for(&endpoint, vec![], Duration::from_secs(5));

    let bundle = client.generate(&proof_request()).await.unwrap();
    assert_eq!(bundle.nullifier.to_string(), "987654321");
    assert!(polls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn generate_times_out_when_job_never_completes() {
    let endpoint = serve(
        Router::new()
            .route(
                "/proof",
                post(|| async {
                    (
                        StatusCode::OK,
                        Json(json!({ "result": { "job_id": "stuck" } })),
                    )
                }),
            )
            .route(
                "/proof/:id",
                get(|Path(_id): Path<String>| async {
                    (StatusCode::OK, Json(json!({ "status": "pending" })))
                }),
            ),
    )
    .await;

    let client = client_for(&endpoint, vec![], Duration::from_millis(100));
    let err = client.generate(&proof_request()).await.unwrap_err();
    assert!(matches!(err, ProverError::ProofTimeout { .. }));
}

#[tokio::test]
async fn health_check_accepts_client_error_statuses() {
    let endpoint = serve(Router::new().route(
        "/proof",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({}))) }),
    ))
    .await;

    let client = client_for(&endpoint, vec![], Duration::from_secs(5));
    assert!(client.check_health().await);
}

#[tokio::test]
async fn health_check_fails_on_unreachable_endpoint() {
    let client = client_for("http://127.0.0.1:1", vec![], Duration::from_secs(5));
    assert!(!client.check_health().await);
}

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use planner::{
    config::{AppConfig, MailTransport, NotifyPolicy},
    db::{init_pool, run_migrations, DbPool},
    routes::create_router,
    services::{mail::MemoryMailer, store::SqliteTripStore},
    state::AppState,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

struct TestApp {
    router: Router,
    mailer: MemoryMailer,
    db: DbPool,
    _root: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let root = TempDir::new().unwrap();
        let database_url = format!(
            "sqlite://{}",
            root.path().join("api.sqlite").to_string_lossy()
        );
        let config = AppConfig {
            database_url: database_url.clone(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            api_base_url: Url::parse("http://api.planner.test").unwrap(),
            web_base_url: Url::parse("http://planner.test").unwrap(),
            mail_transport: MailTransport::Log,
            mail_from_name: "Equipe plann.er".into(),
            mail_from_address: "oi@plann.er".into(),
            smtp: None,
            notify_policy: NotifyPolicy::AllOrNothing,
        };

        let db = init_pool(&database_url).await.unwrap();
        run_migrations(&db).await.unwrap();

        let mailer = MemoryMailer::new();
        let state = AppState::new(
            &config,
            Arc::new(SqliteTripStore::new(db.clone())),
            Arc::new(mailer.clone()),
        )
        .unwrap();

        Self {
            router: create_router(state),
            mailer,
            db,
            _root: root,
        }
    }

    async fn get(&self, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post_json(&self, uri: &str, body: Value) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.db)
            .await
            .unwrap()
    }

    async fn create_trip(&self, invites: &[&str]) -> String {
        let response = self.post_json("/trips", trip_body(1, 4, invites)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        body["tripId"].as_str().unwrap().to_string()
    }
}

fn trip_body(start_in_days: i64, end_in_days: i64, invites: &[&str]) -> Value {
    let now = Utc::now();
    json!({
        "destination": "Florianópolis",
        "starts_at": (now + Duration::days(start_in_days)).to_rfc3339(),
        "ends_at": (now + Duration::days(end_in_days)).to_rfc3339(),
        "owner_name": "Ana",
        "owner_email": "a@x.com",
        "emails_to_invite": invites,
    })
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn confirming_twice_redirects_the_same_and_mails_once() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(&["b@x.com"]).await;
    assert_eq!(app.mailer.sent_to("a@x.com").len(), 1);

    let first = app.get(&format!("/trips/{trip_id}/confirm")).await;
    assert_eq!(first.status(), StatusCode::FOUND);
    assert_eq!(location(&first), format!("http://planner.test/trips/{trip_id}"));
    assert_eq!(app.mailer.sent_to("b@x.com").len(), 1);

    let second = app.get(&format!("/trips/{trip_id}/confirm")).await;
    assert_eq!(second.status(), first.status());
    assert_eq!(location(&second), location(&first));
    assert_eq!(app.mailer.sent_to("b@x.com").len(), 1);
    assert_eq!(app.mailer.sent_to("a@x.com").len(), 1);

    let details = json_body(app.get(&format!("/trips/{trip_id}")).await).await;
    assert_eq!(details["trip"]["is_confirmed"], json!(true));
    assert_eq!(details["trip"]["destination"], json!("Florianópolis"));
}

#[tokio::test]
async fn past_start_date_is_a_client_error() {
    let app = TestApp::new().await;
    let response = app.post_json("/trips", trip_body(-1, 3, &[])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Invalid trip start date" })
    );
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn end_before_start_is_a_client_error() {
    let app = TestApp::new().await;
    let response = app.post_json("/trips", trip_body(3, 2, &[])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], json!("Invalid trip end date"));
}

#[tokio::test]
async fn malformed_bodies_are_rejected_before_any_write() {
    let app = TestApp::new().await;

    let mut short_destination = trip_body(1, 2, &[]);
    short_destination["destination"] = json!("Rio");
    let mut bad_invite = trip_body(1, 2, &[]);
    bad_invite["emails_to_invite"] = json!(["not-an-email"]);
    let mut bad_date = trip_body(1, 2, &[]);
    bad_date["starts_at"] = json!("someday");

    for body in [short_destination, bad_invite, bad_date] {
        let response = app.post_json("/trips", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], json!("Invalid input"));
    }
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn confirming_an_unknown_trip_is_a_server_error() {
    let app = TestApp::new().await;
    let response = app
        .get("/trips/7d4c3bc8-4a0b-4a46-9d55-0a8f0a3c52b1/confirm")
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Internal server error" })
    );
}

#[tokio::test]
async fn non_uuid_trip_ids_are_invalid_input() {
    let app = TestApp::new().await;
    let response = app.get("/trips/not-a-uuid/confirm").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inviting_to_an_unknown_trip_is_a_client_error() {
    let app = TestApp::new().await;
    let response = app
        .post_json(
            "/trips/7d4c3bc8-4a0b-4a46-9d55-0a8f0a3c52b1/invites",
            json!({ "email": "d@x.com" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "message": "Trip not found" }));
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn invited_participant_confirms_through_emailed_link() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(&[]).await;

    let response = app
        .post_json(
            &format!("/trips/{trip_id}/invites"),
            json!({ "email": "d@x.com" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let participant_id = json_body(response).await["participantId"]
        .as_str()
        .unwrap()
        .to_string();

    let invitation = app.mailer.sent_to("d@x.com");
    assert_eq!(invitation.len(), 1);
    assert!(invitation[0].html.contains(&format!(
        "http://api.planner.test/participants/{participant_id}/confirm"
    )));

    let confirm = app
        .get(&format!("/participants/{participant_id}/confirm"))
        .await;
    assert_eq!(confirm.status(), StatusCode::FOUND);
    assert_eq!(location(&confirm), format!("http://planner.test/trips/{trip_id}"));

    let listing = json_body(app.get(&format!("/trips/{trip_id}/participants")).await).await;
    let participants = listing["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0]["is_owner"], json!(true));
    assert_eq!(participants[1]["email"], json!("d@x.com"));
    assert_eq!(participants[1]["is_confirmed"], json!(true));
    assert_eq!(participants[1]["name"], Value::Null);
}

#[tokio::test]
async fn unknown_trip_details_are_not_found() {
    let app = TestApp::new().await;
    let response = app
        .get("/trips/7d4c3bc8-4a0b-4a46-9d55-0a8f0a3c52b1")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], json!("Trip not found"));
}

#[tokio::test]
async fn every_listed_invite_becomes_a_participant() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(&["B@x.com", "b@x.com", "a@x.com"]).await;

    let listing = json_body(app.get(&format!("/trips/{trip_id}/participants")).await).await;
    let emails: Vec<_> = listing["participants"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["is_owner"] == json!(false))
        .map(|p| p["email"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(emails, ["B@x.com", "b@x.com", "a@x.com"]);
}

#[tokio::test]
async fn owner_mail_failure_fails_the_request_but_keeps_the_trip() {
    let app = TestApp::new().await;
    app.mailer.fail_for("a@x.com");

    let response = app.post_json("/trips", trip_body(1, 4, &["b@x.com"])).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Internal server error" })
    );
    assert_eq!(app.count("trips").await, 1);
    assert_eq!(app.count("participants").await, 2);
}

#[tokio::test]
async fn invite_mail_failure_fails_the_request_but_keeps_the_participant() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(&[]).await;
    app.mailer.fail_for("d@x.com");

    let response = app
        .post_json(
            &format!("/trips/{trip_id}/invites"),
            json!({ "email": "d@x.com" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Internal server error" })
    );
    assert_eq!(app.count("participants").await, 2);
}

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use tower::ServiceExt;

use service::auth::AuthConfig;
use service::clock::FixedClock;
use service::reminders::RecordingScheduler;
use service::storage::{KvStore, MemoryKvStore};
use service::{AppSettings, StudioApp};

struct Harness {
    router: Router,
    clock: Arc<FixedClock>,
    scheduler: Arc<RecordingScheduler>,
}

fn harness() -> Harness {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let scheduler = Arc::new(RecordingScheduler::new());
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
    let clock = Arc::new(FixedClock::at_local(start));
    let settings = AppSettings {
        reminder_offset_minutes: 60,
        auth: AuthConfig { jwt_secret: Some("test-secret".into()), ..Default::default() },
        ..Default::default()
    };
    let app = StudioApp::new(store, scheduler.clone(), clock.clone(), settings);
    Harness { router: server::build_app(app), clock, scheduler }
}

async fn call(router: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(v) => req.header("content-type", "application/json").body(Body::from(v.to_string()))?,
        None => req.body(Body::empty())?,
    };
    let res = router.clone().oneshot(req).await?;
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn sign_up(router: &Router, email: &str) -> anyhow::Result<String> {
    let (status, _) = call(router, "POST", "/auth/register", None, Some(json!({"email": email, "name": "Ink", "password": "Passw0rd"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(router, "POST", "/auth/login", None, Some(json!({"email": email, "password": "Passw0rd"}))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["token"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let h = harness();
    let (status, body) = call(&h.router, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn api_requires_bearer_token() -> anyhow::Result<()> {
    let h = harness();
    let (status, _) = call(&h.router, "GET", "/api/clients", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&h.router, "GET", "/api/clients", Some("garbage"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let h = harness();
    let token = sign_up(&h.router, "Owner@Studio.com").await?;
    let (status, me) = call(&h.router, "GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "owner@studio.com");
    assert_eq!(me["access"]["state"], "trial");

    let (status, body) = call(&h.router, "POST", "/auth/register", None, Some(json!({"email": "owner@studio.com", "name": "X", "password": "Passw0rd"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1002);

    let (status, _) = call(&h.router, "POST", "/auth/login", None, Some(json!({"email": "owner@studio.com", "password": "wrong-pass"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn booking_flow_schedules_reminder_and_renders_message() -> anyhow::Result<()> {
    let h = harness();
    let token = sign_up(&h.router, "a@studio.com").await?;
    let t = Some(token.as_str());

    let (status, client) = call(&h.router, "POST", "/api/clients", t, Some(json!({"name": "Rita", "phone": "555-0101"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let client_id = client["id"].as_str().unwrap().to_string();

    let booking = json!({
        "client_id": client_id,
        "date": "2024-06-03",
        "time": "14:00:00",
        "duration_minutes": 120,
        "price_cents": 40000
    });
    let (status, appt) = call(&h.router, "POST", "/api/appointments", t, Some(booking)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appt["status"], "pending");
    assert_eq!(appt["client_name"], "Rita");
    assert_eq!(h.scheduler.pending().len(), 1);
    let appt_id = appt["id"].as_str().unwrap().to_string();

    let (status, day) = call(&h.router, "GET", "/api/calendar/day/2024-06-03", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["summary"]["count"], 1);
    assert_eq!(day["summary"]["expected_revenue_cents"], 40000);

    let (status, grid) = call(&h.router, "GET", "/api/calendar/month/2024/6", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(grid["weeks"].as_array().unwrap().len() >= 5);
    let (status, _) = call(&h.router, "GET", "/api/calendar/month/2024/13", t, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, templates) = call(&h.router, "GET", "/api/templates", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    let template_id = templates[0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/templates/{template_id}/render/{appt_id}");
    let (status, msg) = call(&h.router, "POST", &uri, t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(msg["text"].as_str().unwrap().contains("Rita"));

    let (status, done) = call(&h.router, "POST", &format!("/api/appointments/{appt_id}/status"), t, Some(json!({"status": "completed"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");
    assert!(h.scheduler.pending().is_empty());

    let (status, _) = call(&h.router, "POST", &format!("/api/appointments/{appt_id}/status"), t, Some(json!({"status": "pending"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn price_list_and_quote() -> anyhow::Result<()> {
    let h = harness();
    let token = sign_up(&h.router, "p@studio.com").await?;
    let t = Some(token.as_str());

    let (_, cat) = call(&h.router, "POST", "/api/prices/categories", t, Some(json!({"name": "Tattoo"}))).await?;
    let cat_id = cat["id"].as_str().unwrap().to_string();
    let items_uri = format!("/api/prices/categories/{cat_id}/items");
    let (status, small) = call(&h.router, "POST", &items_uri, t, Some(json!({"name": "Small", "base_price_cents": 8000}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (_, color) = call(&h.router, "POST", &items_uri, t, Some(json!({"name": "Color", "base_price_cents": 2500}))).await?;

    let request = json!({"item_ids": [small["id"], color["id"]], "adjustment_cents": -500});
    let (status, quote) = call(&h.router, "POST", "/api/quote", t, Some(request)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["subtotal_cents"], 10500);
    assert_eq!(quote["total_cents"], 10000);

    let (status, _) = call(&h.router, "DELETE", &format!("/api/prices/categories/{cat_id}"), t, None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn users_do_not_see_each_other() -> anyhow::Result<()> {
    let h = harness();
    let a = sign_up(&h.router, "a@studio.com").await?;
    let b = sign_up(&h.router, "b@studio.com").await?;

    let (_, client) = call(&h.router, "POST", "/api/clients", Some(&a), Some(json!({"name": "Rita"}))).await?;
    let id = client["id"].as_str().unwrap();
    let (_, page) = call(&h.router, "GET", "/api/clients", Some(&b), None).await?;
    assert_eq!(page["total"], 0);
    let (status, _) = call(&h.router, "GET", &format!("/api/clients/{id}"), Some(&b), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn expired_trial_blocks_api_until_subscription() -> anyhow::Result<()> {
    let h = harness();
    sign_up(&h.router, "late@studio.com").await?;
    h.clock.advance(Duration::days(8));
    // the first token has expired too; logging in still works after the trial
    let (status, session) = call(&h.router, "POST", "/auth/login", None, Some(json!({"email": "late@studio.com", "password": "Passw0rd"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"]["access"]["state"], "expired");
    let token = session["token"].as_str().unwrap().to_string();

    let (status, body) = call(&h.router, "GET", "/api/studio", Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1005);

    let (status, me) = call(&h.router, "POST", "/auth/subscription", Some(&token), Some(json!({"months": 1}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["access"]["state"], "active");
    let (status, _) = call(&h.router, "GET", "/api/studio", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, me) = call(&h.router, "DELETE", "/auth/subscription", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["access"]["state"], "expired");
    let (status, _) = call(&h.router, "GET", "/api/studio", Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn oversized_subscription_is_a_bad_request() -> anyhow::Result<()> {
    let h = harness();
    let token = sign_up(&h.router, "big@studio.com").await?;
    let (status, body) = call(&h.router, "POST", "/auth/subscription", Some(&token), Some(json!({"months": 10_000_000}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);
    let (status, me) = call(&h.router, "GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["access"]["state"], "trial");
    Ok(())
}

#[tokio::test]
async fn deleting_account_revokes_access() -> anyhow::Result<()> {
    let h = harness();
    let token = sign_up(&h.router, "gone@studio.com").await?;
    call(&h.router, "POST", "/api/clients", Some(&token), Some(json!({"name": "Rita"}))).await?;

    let (status, body) = call(&h.router, "DELETE", "/auth/account", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["keys_removed"].as_u64().unwrap() >= 1);
    let (status, _) = call(&h.router, "GET", "/api/clients", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

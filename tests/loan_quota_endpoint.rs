//! End-to-end specifications for the loan quota endpoint, driven through the
//! public router so validation, calculation, and the notification seam are
//! exercised exactly as a client would reach them.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use microprestamos::loans::domain::Frequency;
use microprestamos::loans::loan_router;
use microprestamos::loans::quota::{self, ANNUAL_RATE_PERCENT};
use microprestamos::notify::{LoanNotification, Notifier, NotifyError};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<LoanNotification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: LoanNotification) -> Result<(), NotifyError> {
        self.sent.lock().expect("notifier mutex").push(notification);
        Ok(())
    }
}

fn app() -> (Router, Arc<RecordingNotifier>) {
    let recorder = Arc::new(RecordingNotifier::default());
    (loan_router(recorder.clone()), recorder)
}

fn post_loan_cuota(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/loan_cuota")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

fn fredd_payload() -> Value {
    json!({
        "name": "Fredd",
        "email": "fredd.a14@hotmail.com",
        "totalIngress": 100000,
        "sector": "publico",
        "workYears": 5,
        "amount": 2000,
        "frecuency": "quincenal",
        "payTime": 24
    })
}

#[tokio::test]
async fn home_page_greets_with_service_name() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request builds"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    assert_eq!(&bytes[..], b"Microprestamos");
}

#[tokio::test(flavor = "current_thread")]
async fn valid_application_yields_biweekly_quota_and_notification() {
    let (app, recorder) = app();
    let response = app
        .oneshot(post_loan_cuota(&fredd_payload()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["frecuency"], "quincenal");
    assert_eq!(body["paytime"], "24 meses.");

    let monthly =
        quota::compute(2000.0, ANNUAL_RATE_PERCENT, 24, Frequency::Mensual).expect("monthly");
    let text = body["text"].as_str().expect("text present");
    assert!(
        text.contains(&format!("${:.2}", monthly / 2.0)),
        "text {text:?} carries half the monthly quota"
    );

    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    let sent = recorder.sent.lock().expect("notifier mutex");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html_body.contains("Email: fredd.a14@hotmail.com"));
    assert!(sent[0].html_body.contains(&format!("Loan Cuota: {:.2}", monthly / 2.0)));
}

#[tokio::test]
async fn missing_email_reports_only_field_errors() {
    let mut payload = fredd_payload();
    payload.as_object_mut().expect("object").remove("email");

    let (app, _) = app();
    let response = app
        .oneshot(post_loan_cuota(&payload))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;

    let email_errors = body["email"].as_array().expect("email errors present");
    assert!(!email_errors.is_empty());
    assert!(email_errors[0]
        .as_str()
        .expect("message is text")
        .contains("obligatorio"));
    assert!(body.get("text").is_none());
    assert!(body.get("amount").is_none());
}

#[tokio::test]
async fn out_of_range_amount_is_always_keyed() {
    let mut payload = fredd_payload();
    payload["amount"] = json!(50);
    payload["sector"] = json!("estatal");

    let (app, _) = app();
    let response = app
        .oneshot(post_loan_cuota(&payload))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["amount"].is_array());
    assert!(body["sector"].is_array());
}

#[tokio::test]
async fn omitted_optionals_fall_back_to_monthly_over_three_months() {
    let mut payload = fredd_payload();
    payload.as_object_mut().expect("object").remove("frecuency");
    payload.as_object_mut().expect("object").remove("payTime");

    let (app, _) = app();
    let response = app
        .oneshot(post_loan_cuota(&payload))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["frecuency"], "mensual");
    assert_eq!(body["paytime"], "3 meses.");
}

#[tokio::test]
async fn api_docs_are_served_as_json() {
    let (app, _) = app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "Microprestamos api");
    assert!(body["paths"]["/loan_cuota"].is_object());
}

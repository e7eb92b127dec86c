mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp, INTERNAL_ADDR};
use serde_json::json;

#[tokio::test]
async fn test_reminder_for_pending_booking_requests_deposit() {
    let app = TestApp::new().await;
    let booking_id = app.submit_booking().await;

    let res = app
        .post_json(
            "/api/v1/notifications/payment-reminder",
            json!({"bookingId": booking_id}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["recipient"], "alice@example.com");
    assert_eq!(body["channelsTried"], json!(["primary"]));
    assert_eq!(body["outcome"]["status"], "delivered");
    assert_eq!(body["outcome"]["channel"], "primary");

    let mails = app.primary_mail.sent();
    let reminder = mails
        .iter()
        .find(|m| m.recipient == "alice@example.com" && m.subject.contains("reminder"))
        .expect("reminder email missing");
    assert!(reminder.body.contains("amount=625"));
    assert!(reminder.body.contains("type=deposit"));
}

#[tokio::test]
async fn test_reminder_after_deposit_requests_balance() {
    let app = TestApp::new().await;
    let booking_id = app.submit_booking().await;
    app.gateway.seed_succeeded("pi_dep", &booking_id, 62_500, "deposit");
    app.put_json(
        "/api/v1/payment-intents",
        json!({"paymentIntentId": "pi_dep", "bookingId": booking_id}),
    )
    .await;

    let res = app
        .post_json(
            "/api/v1/notifications/payment-reminder",
            json!({"bookingId": booking_id}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let mails = app.primary_mail.sent();
    let reminder = mails
        .iter()
        .rev()
        .find(|m| m.recipient == "alice@example.com" && m.subject.contains("reminder"))
        .expect("reminder email missing");
    assert!(reminder.body.contains("amount=1875"));
    assert!(reminder.body.contains("type=final"));
}

#[tokio::test]
async fn test_failed_primary_falls_back_to_backup() {
    let app = TestApp::new().await;
    let booking_id = app.submit_booking().await;
    app.primary_mail.set_failing(true);

    let res = app
        .post_json(
            "/api/v1/notifications/payment-reminder",
            json!({"bookingId": booking_id}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["channelsTried"], json!(["primary", "backup"]));
    assert_eq!(body["outcome"]["status"], "delivered");
    assert_eq!(body["outcome"]["channel"], "backup");

    // Exactly one customer copy of the reminder, on the backup channel.
    let backup_reminders = app
        .backup_mail
        .sent()
        .iter()
        .filter(|m| m.recipient == "alice@example.com" && m.subject.contains("reminder"))
        .count();
    assert_eq!(backup_reminders, 1);
    let primary_reminders = app
        .primary_mail
        .sent()
        .iter()
        .filter(|m| m.recipient == "alice@example.com" && m.subject.contains("reminder"))
        .count();
    assert_eq!(primary_reminders, 0);
}

#[tokio::test]
async fn test_exhausted_channels_queue_for_manual_delivery() {
    let app = TestApp::new().await;
    let booking_id = app.submit_booking().await;
    app.primary_mail.set_failing(true);
    app.backup_mail.set_failing(true);

    let res = app
        .post_json(
            "/api/v1/notifications/payment-reminder",
            json!({"bookingId": booking_id}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["channelsTried"], json!(["primary", "backup"]));
    assert_eq!(body["outcome"]["status"], "manual");
    let link = body["outcome"]["paymentLink"].as_str().unwrap();
    assert!(link.contains(&format!("bookingId={}", booking_id)));

    // The fallback log entry carries the same payment link the email
    // would have.
    let entries = app.fallback_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["paymentLink"].as_str().unwrap(), link);
    assert_eq!(entries[0]["recipient"], "alice@example.com");
    assert!(entries[0]["htmlBody"].as_str().unwrap().contains("reminder")
        || entries[0]["subject"].as_str().unwrap().contains("reminder"));
}

#[tokio::test]
async fn test_internal_copy_failure_does_not_change_verdict() {
    let app = TestApp::new().await;
    let booking_id = app.submit_booking().await;
    app.primary_mail.fail_for(INTERNAL_ADDR);

    let res = app
        .post_json(
            "/api/v1/notifications/payment-reminder",
            json!({"bookingId": booking_id}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["outcome"]["status"], "delivered");
    assert_eq!(body["outcome"]["channel"], "primary");
    // No fallback escalation for the internal copy either.
    assert!(app.backup_mail.sent().is_empty());
}

#[tokio::test]
async fn test_reminder_supports_recipient_override() {
    let app = TestApp::new().await;
    let booking_id = app.submit_booking().await;

    let res = app
        .post_json(
            "/api/v1/notifications/payment-reminder",
            json!({"bookingId": booking_id, "recipient": "planner@example.com"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["recipient"], "planner@example.com");
    assert_eq!(app.primary_mail.deliveries_to("planner@example.com"), 1);
}

#[tokio::test]
async fn test_reminder_for_unknown_booking_is_404() {
    let app = TestApp::new().await;

    let res = app
        .post_json(
            "/api/v1/notifications/payment-reminder",
            json!({"bookingId": "missing"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reminder_for_fully_paid_booking_is_rejected() {
    let app = TestApp::new().await;
    let booking_id = app.submit_booking().await;
    app.gateway.seed_succeeded("pi_full", &booking_id, 250_000, "final");
    app.put_json(
        "/api/v1/payment-intents",
        json!({"paymentIntentId": "pi_full", "bookingId": booking_id}),
    )
    .await;

    let res = app
        .post_json(
            "/api/v1/notifications/payment-reminder",
            json!({"bookingId": booking_id}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

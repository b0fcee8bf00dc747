mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{purchase_order_payload, TestApp};
use rstest::rstest;
use serde_json::json;

#[tokio::test]
async fn create_and_fetch_purchase_order() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;

    let (status, created) = app
        .post("/purchase-orders", purchase_order_payload(vendor_id, "PO-1"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Pending");
    assert!(created["acknowledgment_date"].is_null());

    let po_id = created["id"].as_i64().unwrap();
    let (status, fetched) = app.get(&format!("/purchase-orders/{po_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["po_number"], "PO-1");
    assert_eq!(fetched["vendor_id"], json!(vendor_id));
    assert_eq!(fetched["items"], json!([{"sku": "BOLT-10", "qty": 100}]));
}

#[tokio::test]
async fn purchase_order_for_unknown_vendor_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post("/purchase-orders", purchase_order_payload(42, "PO-1"))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_po_number_conflicts() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    app.create_purchase_order(purchase_order_payload(vendor_id, "PO-1"))
        .await;

    let (status, _) = app
        .post("/purchase-orders", purchase_order_payload(vendor_id, "PO-1"))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn out_of_range_quality_rating_is_rejected() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let mut payload = purchase_order_payload(vendor_id, "PO-1");
    payload["quality_rating"] = json!(6.5);

    let (status, body) = app.post("/purchase-orders", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn acknowledge_unknown_purchase_order_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.post_empty("/purchase-orders/12345/acknowledge").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn acknowledgment_is_recorded_once() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let po_id = app
        .create_purchase_order(purchase_order_payload(vendor_id, "PO-1"))
        .await;

    let before = Utc::now();
    let (status, body) = app
        .post_empty(&format!("/purchase-orders/{po_id}/acknowledge"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Acknowledgment recorded successfully"}));

    let (_, first) = app.get(&format!("/purchase-orders/{po_id}")).await;
    let acknowledged_at: DateTime<Utc> = first["acknowledgment_date"]
        .as_str()
        .expect("acknowledgment recorded")
        .parse()
        .unwrap();
    assert!(acknowledged_at >= before - chrono::Duration::seconds(1));

    let (status, body) = app
        .post_empty(&format!("/purchase-orders/{po_id}/acknowledge"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Acknowledgment recorded successfully");

    let (_, second) = app.get(&format!("/purchase-orders/{po_id}")).await;
    assert_eq!(second["acknowledgment_date"], first["acknowledgment_date"]);
}

#[tokio::test]
async fn imported_acknowledgment_is_kept_on_acknowledge() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let mut payload = purchase_order_payload(vendor_id, "PO-1");
    payload["acknowledgment_date"] = json!("2024-03-02T09:00:00Z");
    let po_id = app.create_purchase_order(payload).await;

    let (status, _) = app
        .post_empty(&format!("/purchase-orders/{po_id}/acknowledge"))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, order) = app.get(&format!("/purchase-orders/{po_id}")).await;
    let acknowledged_at: DateTime<Utc> = order["acknowledgment_date"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(acknowledged_at.to_rfc3339(), "2024-03-02T09:00:00+00:00");
}

#[tokio::test]
async fn acknowledging_a_completed_order_feeds_response_time() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let mut payload = purchase_order_payload(vendor_id, "PO-1");
    payload["status"] = json!("Completed");
    let po_id = app.create_purchase_order(payload).await;

    let (_, before) = app.get(&format!("/vendors/{vendor_id}/performance")).await;
    assert_eq!(before["average_response_time"], 0.0);

    app.post_empty(&format!("/purchase-orders/{po_id}/acknowledge"))
        .await;

    let (_, after) = app.get(&format!("/vendors/{vendor_id}/performance")).await;
    assert!(after["average_response_time"].as_f64().unwrap() > 0.0);
    // Acknowledged long after the 2024 delivery date, so the order counts as on time.
    assert_eq!(after["on_time_delivery_rate"], 100.0);
}

#[rstest]
#[case("Completed", "Pending")]
#[case("Completed", "Canceled")]
#[case("Canceled", "Completed")]
#[case("Canceled", "Pending")]
#[tokio::test]
async fn terminal_status_cannot_change(#[case] initial: &str, #[case] next: &str) {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let mut payload = purchase_order_payload(vendor_id, "PO-1");
    payload["status"] = json!(initial);
    let po_id = app.create_purchase_order(payload).await;

    let (status, body) = app
        .put(&format!("/purchase-orders/{po_id}"), json!({"status": next}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains(initial));

    let (_, order) = app.get(&format!("/purchase-orders/{po_id}")).await;
    assert_eq!(order["status"], initial);
}

#[tokio::test]
async fn rejected_transition_leaves_metrics_untouched() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let mut payload = purchase_order_payload(vendor_id, "PO-1");
    payload["status"] = json!("Completed");
    let po_id = app.create_purchase_order(payload).await;

    let (_, history_before) = app.get(&format!("/vendors/{vendor_id}/history")).await;
    app.put(
        &format!("/purchase-orders/{po_id}"),
        json!({"status": "Pending", "quality_rating": 1.0}),
    )
    .await;
    let (_, history_after) = app.get(&format!("/vendors/{vendor_id}/history")).await;

    assert_eq!(history_before, history_after);
    let (_, order) = app.get(&format!("/purchase-orders/{po_id}")).await;
    assert!(order["quality_rating"].is_null());
}

#[tokio::test]
async fn pending_order_can_be_canceled_and_rated() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let po_id = app
        .create_purchase_order(purchase_order_payload(vendor_id, "PO-1"))
        .await;

    let (status, order) = app
        .put(
            &format!("/purchase-orders/{po_id}"),
            json!({"status": "Canceled", "quantity": 80}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "Canceled");
    assert_eq!(order["quantity"], 80);

    // Same-status updates and other fields stay editable on terminal orders.
    let (status, order) = app
        .put(
            &format!("/purchase-orders/{po_id}"),
            json!({"status": "Canceled", "quality_rating": 2.0}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["quality_rating"], 2.0);

    let (_, performance) = app.get(&format!("/vendors/{vendor_id}/performance")).await;
    assert_eq!(performance["fulfilment_rate"], 0.0);
    assert_eq!(performance["quality_rating_avg"], 0.0);
}

#[tokio::test]
async fn update_cannot_move_an_order_to_another_vendor() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let po_id = app
        .create_purchase_order(purchase_order_payload(vendor_id, "PO-1"))
        .await;

    let (status, body) = app
        .put(&format!("/purchase-orders/{po_id}"), json!({"vendor_id": 99}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("vendor_id"));

    let (_, order) = app.get(&format!("/purchase-orders/{po_id}")).await;
    assert_eq!(order["vendor_id"], json!(vendor_id));
}

#[rstest]
#[case(json!({"status": "completed"}))]
#[case(json!({"quantity": "many"}))]
#[case(json!({"delivery_date": "next week"}))]
#[tokio::test]
async fn malformed_update_fields_get_error_envelope(#[case] payload: serde_json::Value) {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let po_id = app
        .create_purchase_order(purchase_order_payload(vendor_id, "PO-1"))
        .await;

    let (status, body) = app
        .put(&format!("/purchase-orders/{po_id}"), payload)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].is_string());
    assert!(body["request_id"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn malformed_json_body_gets_error_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app
        .raw_post("/purchase-orders", "application/json", "{\"po_number\": ")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn quality_rating_can_be_cleared() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME").await;
    let mut payload = purchase_order_payload(vendor_id, "PO-1");
    payload["status"] = json!("Completed");
    payload["quality_rating"] = json!(4.0);
    let po_id = app.create_purchase_order(payload).await;

    let (_, performance) = app.get(&format!("/vendors/{vendor_id}/performance")).await;
    assert_eq!(performance["quality_rating_avg"], 4.0);

    // Omitting the field leaves the rating alone.
    let (status, order) = app
        .put(&format!("/purchase-orders/{po_id}"), json!({"quantity": 90}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["quality_rating"], 4.0);

    let (status, order) = app
        .put(
            &format!("/purchase-orders/{po_id}"),
            json!({"quality_rating": null}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(order["quality_rating"].is_null());

    let (_, performance) = app.get(&format!("/vendors/{vendor_id}/performance")).await;
    assert_eq!(performance["quality_rating_avg"], 0.0);
    let (_, vendor) = app.get(&format!("/vendors/{vendor_id}")).await;
    assert_eq!(vendor["quality_rating_avg"], 0.0);
}

#[tokio::test]
async fn update_unknown_purchase_order_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .put("/purchase-orders/77", json!({"quantity": 1}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

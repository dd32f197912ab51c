use actix_web::{http::StatusCode, web, web::ServiceConfig};
use checkout_engine::{
    db_types::CheckoutSummary,
    events::EventProducers,
    traits::CheckoutError,
    CheckoutPolicy,
    OrderFlowApi,
};
use serde_json::{json, Value};
use shop_common::Cents;

use super::{
    helpers::{post_json, sample_order, sample_order_items, test_config},
    mocks::MockCheckoutBackend,
};
use crate::{
    endpoint_tests::helpers::{TEST_MERCHANT_ID, TEST_MERCHANT_SECRET},
    payhere::session_signature,
    routes::CheckoutRoute,
};

fn checkout_body() -> Value {
    json!({
        "address_id": "addr-1",
        "items": [{ "item": "item-a", "qty": 2 }],
        "total_amount": "220.00",
    })
}

#[actix_web::test]
async fn checkout_without_customer_header_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_json("", "/checkout", &checkout_body(), configure_success).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No customer id"));
}

#[actix_web::test]
async fn successful_checkout_returns_a_signed_payment_session() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_json("cust-1", "/checkout", &checkout_body(), configure_success).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let response: Value = serde_json::from_str(&body).expect("Body is not JSON");
    assert_eq!(response["order"]["status"], "PAYMENT_PENDING");
    assert_eq!(response["order"]["payment_status"], "PENDING");
    assert!(response["tracking_number"].as_str().unwrap().starts_with("TRK-"));
    assert_eq!(response["payhere_data"]["amount"], "220.00");
    assert_eq!(response["payhere_data"]["currency"], "LKR");
    assert_eq!(response["payhere_data"]["merchant_id"], TEST_MERCHANT_ID);
    // The session signature binds the merchant, the order, the amount and the currency.
    let order_id = response["order_id"].as_str().expect("Missing order id");
    assert_eq!(response["payhere_data"]["order_id"], order_id);
    let expected =
        session_signature(TEST_MERCHANT_ID, order_id, "220.00", "LKR", &TEST_MERCHANT_SECRET.to_string().into());
    assert_eq!(response["payhere_data"]["hash"], expected.as_str());
    // The raw merchant secret must never appear in the payload.
    assert!(!body.contains(TEST_MERCHANT_SECRET));
}

#[actix_web::test]
async fn divergent_total_is_rejected_with_both_figures() {
    let _ = env_logger::try_init().ok();
    let req = json!({
        "address_id": "addr-1",
        "items": [{ "item": "item-a", "qty": 2 }],
        "total_amount": "50.00",
    });
    let (status, body) = post_json("cust-1", "/checkout", &req, configure_mismatch).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: Value = serde_json::from_str(&body).expect("Body is not JSON");
    assert_eq!(response["server_total"], "220.00");
    assert_eq!(response["submitted_total"], "50.00");
}

#[actix_web::test]
async fn malformed_total_amount_never_reaches_the_backend() {
    let _ = env_logger::try_init().ok();
    let req = json!({
        "address_id": "addr-1",
        "items": [{ "item": "item-a", "qty": 2 }],
        "total_amount": "220.005",
    });
    let (status, body) = post_json("cust-1", "/checkout", &req, configure_untouchable).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("total_amount"));
}

#[actix_web::test]
async fn unknown_item_is_a_404() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_json("cust-1", "/checkout", &checkout_body(), configure_unknown_item).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("ghost"));
}

fn register(cfg: &mut ServiceConfig, backend: MockCheckoutBackend) {
    let api = OrderFlowApi::new(backend, CheckoutPolicy::default(), EventProducers::default());
    cfg.service(CheckoutRoute::<MockCheckoutBackend>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_config()));
}

fn configure_success(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_create_order().returning(|order, _| {
        let mut committed = sample_order();
        committed.order_id = order.order_id.clone();
        committed.tracking_number = order.tracking_number.clone();
        committed.customer_id = order.customer_id.clone();
        Ok(CheckoutSummary { order: committed, items: sample_order_items() })
    });
    register(cfg, backend);
}

fn configure_mismatch(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_create_order().returning(|_, _| {
        Err(CheckoutError::PriceMismatch { computed: Cents::from(22_000), submitted: Cents::from(5_000) })
    });
    register(cfg, backend);
}

fn configure_untouchable(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_create_order().never();
    register(cfg, backend);
}

fn configure_unknown_item(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_create_order().returning(|_, _| Err(CheckoutError::ItemNotFound("ghost".to_string())));
    register(cfg, backend);
}

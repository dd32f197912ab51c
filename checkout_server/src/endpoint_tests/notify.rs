use actix_web::{http::StatusCode, web, web::ServiceConfig};
use checkout_engine::{
    events::EventProducers,
    traits::{CheckoutError, Settlement, SettlementResult},
    CheckoutPolicy,
    OrderFlowApi,
};

use super::{
    helpers::{post_form, sample_order, test_config, TEST_MERCHANT_ID, TEST_MERCHANT_SECRET},
    mocks::MockCheckoutBackend,
};
use crate::{
    data_objects::PaymentNotification,
    payhere::notification_signature,
    payment_routes::PayhereNotifyRoute,
};

const ORDER_ID: &str = "a1b2c3d4e5f60718a1b2c3d4e5f60718";

fn notification(status_code: &str) -> PaymentNotification {
    let md5sig = notification_signature(
        TEST_MERCHANT_ID,
        ORDER_ID,
        "220.00",
        "LKR",
        status_code,
        &TEST_MERCHANT_SECRET.to_string().into(),
    );
    PaymentNotification {
        merchant_id: TEST_MERCHANT_ID.to_string(),
        order_id: ORDER_ID.to_string(),
        payment_id: Some("PH-9876".to_string()),
        payhere_amount: "220.00".to_string(),
        payhere_currency: "LKR".to_string(),
        status_code: status_code.to_string(),
        md5sig,
        method: Some("VISA".to_string()),
        status_message: None,
    }
}

#[actix_web::test]
async fn a_verified_success_notification_settles_the_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_form("/payhere/notify", &notification("2"), configure_settles_paid).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn a_duplicate_notification_is_acknowledged_without_effect() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_form("/payhere/notify", &notification("2"), configure_already_settled).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn a_tampered_notification_is_rejected_before_touching_state() {
    let _ = env_logger::try_init().ok();
    let mut tampered = notification("2");
    // Claim a different amount than the one that was signed.
    tampered.payhere_amount = "2.00".to_string();
    let (status, body) =
        post_form("/payhere/notify", &tampered, configure_untouchable).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("signature"));
}

#[actix_web::test]
async fn a_forged_status_code_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut forged = notification("-2");
    // Keep the failure signature but claim success.
    forged.status_code = "2".to_string();
    let (status, _) = post_form("/payhere/notify", &forged, configure_untouchable).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn a_pending_notification_is_acknowledged_without_settlement() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_form("/payhere/notify", &notification("0"), configure_untouchable).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn a_cancellation_maps_to_the_cancelled_settlement() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_form("/payhere/notify", &notification("-1"), configure_settles_cancelled).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn a_verified_notification_for_an_unknown_order_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_form("/payhere/notify", &notification("2"), configure_unknown_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

fn register(cfg: &mut ServiceConfig, backend: MockCheckoutBackend) {
    let api = OrderFlowApi::new(backend, CheckoutPolicy::default(), EventProducers::default());
    cfg.service(PayhereNotifyRoute::<MockCheckoutBackend>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(test_config()));
}

fn configure_settles_paid(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend
        .expect_settle_order()
        .withf(|order_id, settlement| order_id.as_str() == ORDER_ID && *settlement == Settlement::Paid)
        .times(1)
        .returning(|_, settlement| {
            let mut order = sample_order();
            let (status, payment_status) = settlement.target();
            order.status = status;
            order.payment_status = payment_status;
            Ok(SettlementResult::Applied(order))
        });
    register(cfg, backend);
}

fn configure_already_settled(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_settle_order().times(1).returning(|_, _| {
        let mut order = sample_order();
        let (status, payment_status) = Settlement::Paid.target();
        order.status = status;
        order.payment_status = payment_status;
        Ok(SettlementResult::Unchanged(order))
    });
    register(cfg, backend);
}

fn configure_settles_cancelled(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend
        .expect_settle_order()
        .withf(|_, settlement| *settlement == Settlement::Cancelled)
        .times(1)
        .returning(|_, settlement| {
            let mut order = sample_order();
            let (status, payment_status) = settlement.target();
            order.status = status;
            order.payment_status = payment_status;
            Ok(SettlementResult::Applied(order))
        });
    register(cfg, backend);
}

fn configure_unknown_order(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend
        .expect_settle_order()
        .times(1)
        .returning(|order_id, _| Err(CheckoutError::OrderNotFound(order_id.clone())));
    register(cfg, backend);
}

/// For notifications that must never reach the settlement path at all.
fn configure_untouchable(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_settle_order().never();
    register(cfg, backend);
}

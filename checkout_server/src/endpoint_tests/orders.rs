use actix_web::{http::StatusCode, web, web::ServiceConfig};
use checkout_engine::{
    db_types::{CartLine, OrderStatus},
    events::EventProducers,
    traits::CheckoutError,
    CartApi,
    CheckoutPolicy,
    OrderFlowApi,
};
use serde_json::{json, Value};
use shop_common::Cents;

use super::{
    helpers::{delete_request, get_request, post_json, sample_order, sample_order_items},
    mocks::MockCheckoutBackend,
};
use crate::routes::{EmptyCartRoute, FulfillmentRoute, MyCartRoute, MyOrdersRoute, OrderByIdRoute};

#[actix_web::test]
async fn fetch_my_orders_without_header_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request("", "/orders", configure_orders).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("cust-1", "/orders", configure_orders).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders: Value = serde_json::from_str(&body).expect("Body is not JSON");
    assert_eq!(orders.as_array().map(|a| a.len()), Some(1));
    assert_eq!(orders[0]["tracking_number"], "TRK-1717236000000-042");
    assert_eq!(orders[0]["total_price"], 22_000);
}

#[actix_web::test]
async fn fetch_order_detail() {
    let _ = env_logger::try_init().ok();
    let path = format!("/orders/{}", sample_order().order_id.as_str());
    let (status, body) = get_request("cust-1", &path, configure_orders).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let detail: Value = serde_json::from_str(&body).expect("Body is not JSON");
    assert_eq!(detail["order"]["customer_id"], "cust-1");
    assert_eq!(detail["items"][0]["item_id"], "item-a");
}

#[actix_web::test]
async fn another_customers_order_looks_missing() {
    let _ = env_logger::try_init().ok();
    let path = format!("/orders/{}", sample_order().order_id.as_str());
    let (status, _) = get_request("cust-2", &path, configure_orders).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn fetch_my_cart() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("cust-1", "/cart", configure_cart).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let cart: Value = serde_json::from_str(&body).expect("Body is not JSON");
    assert_eq!(cart[0]["item_id"], "item-a");
    assert_eq!(cart[0]["qty"], 2);
}

#[actix_web::test]
async fn emptying_the_cart_reports_the_removed_lines() {
    let _ = env_logger::try_init().ok();
    let (status, body) = delete_request("cust-1", "/cart", configure_empty_cart).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let ack: Value = serde_json::from_str(&body).expect("Body is not JSON");
    assert_eq!(ack["success"], true);
    assert_eq!(ack["message"], "Removed 2 cart lines");
}

#[actix_web::test]
async fn emptying_the_cart_without_header_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, _) = delete_request("", "/cart", configure_untouchable_cart).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn fulfillment_advance() {
    let _ = env_logger::try_init().ok();
    let path = format!("/orders/{}/fulfillment", sample_order().order_id.as_str());
    let (status, body) =
        post_json("cust-1", &path, &json!({ "status": "SHIPPED" }), configure_fulfillment).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).expect("Body is not JSON");
    assert_eq!(order["status"], "SHIPPED");
}

#[actix_web::test]
async fn fulfillment_without_header_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let path = format!("/orders/{}/fulfillment", sample_order().order_id.as_str());
    let (status, _) =
        post_json("", &path, &json!({ "status": "SHIPPED" }), configure_untouched_fulfillment).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn skipping_a_fulfillment_step_is_rejected() {
    let _ = env_logger::try_init().ok();
    let path = format!("/orders/{}/fulfillment", sample_order().order_id.as_str());
    let (status, body) = post_json("cust-1", &path, &json!({ "status": "DELIVERED" }), configure_illegal_advance)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("may not move"));
}

fn orders_api(backend: MockCheckoutBackend) -> OrderFlowApi<MockCheckoutBackend> {
    OrderFlowApi::new(backend, CheckoutPolicy::default(), EventProducers::default())
}

fn configure_orders(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_fetch_orders_for_customer().returning(|_| Ok(vec![sample_order()]));
    backend.expect_fetch_order().returning(|order_id| {
        let order = sample_order();
        Ok((order.order_id == *order_id).then_some(order))
    });
    backend.expect_fetch_order_items().returning(|_| Ok(sample_order_items()));
    cfg.service(MyOrdersRoute::<MockCheckoutBackend>::new())
        .service(OrderByIdRoute::<MockCheckoutBackend>::new())
        .app_data(web::Data::new(orders_api(backend)));
}

fn configure_cart(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_fetch_cart().returning(|_| {
        Ok(vec![CartLine {
            item_id: "item-a".to_string(),
            qty: 2,
            price_at_add: Cents::from(10_000),
            image: None,
        }])
    });
    let api = CartApi::new(backend);
    cfg.service(MyCartRoute::<MockCheckoutBackend>::new()).app_data(web::Data::new(api));
}

fn configure_empty_cart(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_clear_cart().times(1).returning(|_| Ok(2));
    let api = CartApi::new(backend);
    cfg.service(EmptyCartRoute::<MockCheckoutBackend>::new()).app_data(web::Data::new(api));
}

fn configure_untouchable_cart(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_clear_cart().never();
    let api = CartApi::new(backend);
    cfg.service(EmptyCartRoute::<MockCheckoutBackend>::new()).app_data(web::Data::new(api));
}

fn configure_untouched_fulfillment(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_advance_fulfillment().never();
    cfg.service(FulfillmentRoute::<MockCheckoutBackend>::new()).app_data(web::Data::new(orders_api(backend)));
}

fn configure_fulfillment(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_advance_fulfillment().returning(|_, new_status| {
        let mut order = sample_order();
        order.status = new_status;
        Ok(order)
    });
    cfg.service(FulfillmentRoute::<MockCheckoutBackend>::new()).app_data(web::Data::new(orders_api(backend)));
}

fn configure_illegal_advance(cfg: &mut ServiceConfig) {
    let mut backend = MockCheckoutBackend::new();
    backend.expect_advance_fulfillment().returning(|order_id, new_status| {
        Err(CheckoutError::IllegalStatusChange {
            order_id: order_id.clone(),
            from: OrderStatus::Placed,
            to: new_status,
        })
    });
    cfg.service(FulfillmentRoute::<MockCheckoutBackend>::new()).app_data(web::Data::new(orders_api(backend)));
}

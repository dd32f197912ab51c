use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use chrono::{Duration, TimeZone, Utc};
use checkout_engine::db_types::{Order, OrderId, OrderItem, OrderStatus, PaymentStatus};
use serde::Serialize;
use shop_common::{Cents, Secret};

use crate::{
    config::{PayHereConfig, ServerConfig},
    routes::CUSTOMER_ID_HEADER,
};

pub const TEST_MERCHANT_ID: &str = "M12345";
pub const TEST_MERCHANT_SECRET: &str = "test-merchant-secret";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        notify_url: "https://store.test/payhere/notify".to_string(),
        return_url: "https://store.test/thanks".to_string(),
        cancel_url: "https://store.test/cancelled".to_string(),
        payhere: PayHereConfig {
            merchant_id: TEST_MERCHANT_ID.to_string(),
            merchant_secret: Secret::new(TEST_MERCHANT_SECRET.to_string()),
        },
        ..Default::default()
    }
}

/// A representative committed order for mock responses.
pub fn sample_order() -> Order {
    let created = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    Order {
        id: 1,
        order_id: OrderId("a1b2c3d4e5f60718a1b2c3d4e5f60718".into()),
        tracking_number: "TRK-1717236000000-042".to_string(),
        customer_id: "cust-1".to_string(),
        address_id: "addr-1".to_string(),
        total_price: Cents::from(22_000),
        currency: "LKR".to_string(),
        status: OrderStatus::PaymentPending,
        payment_status: PaymentStatus::Pending,
        est_delivery: created + Duration::days(5),
        created_at: created,
        updated_at: created,
    }
}

pub fn sample_order_items() -> Vec<OrderItem> {
    vec![OrderItem { id: 1, order_id: 1, item_id: "item-a".to_string(), qty: 2, unit_price: Cents::from(10_000) }]
}

pub async fn get_request(
    customer_id: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::get().uri(path);
    if !customer_id.is_empty() {
        req = req.insert_header((CUSTOMER_ID_HEADER, customer_id));
    }
    call(req.to_request(), configure).await
}

pub async fn post_json<B: Serialize>(
    customer_id: &str,
    path: &str,
    body: &B,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::post().uri(path).set_json(body);
    if !customer_id.is_empty() {
        req = req.insert_header((CUSTOMER_ID_HEADER, customer_id));
    }
    call(req.to_request(), configure).await
}

pub async fn delete_request(
    customer_id: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::delete().uri(path);
    if !customer_id.is_empty() {
        req = req.insert_header((CUSTOMER_ID_HEADER, customer_id));
    }
    call(req.to_request(), configure).await
}

/// Posts a form-encoded body, the way the payment gateway does.
pub async fn post_form<B: Serialize>(
    path: &str,
    body: &B,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post().uri(path).set_form(body);
    call(req.to_request(), configure).await
}

async fn call(req: actix_http::Request, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

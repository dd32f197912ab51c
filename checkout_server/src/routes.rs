//! Request handler definitions.
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go
//! into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are generic over the backend traits so that the endpoint tests can run against
//! mocks. Since actix cannot register generic handlers directly, each route gets a small factory
//! type via the `route!` macro.

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use checkout_engine::{
    db_types::OrderId,
    traits::{CartManagement, CheckoutDatabase},
    CartApi,
    OrderFlowApi,
};
use log::*;
use shop_common::Cents;

use crate::{
    config::ServerConfig,
    data_objects::{CheckoutRequest, CheckoutResponse, FulfillmentUpdate, JsonResponse},
    errors::ServerError,
    payhere::PaymentSession,
};

/// The header carrying the authenticated customer id. Populated by the auth proxy in front of
/// this service.
pub const CUSTOMER_ID_HEADER: &str = "mts-customer-id";

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

pub fn customer_id(req: &HttpRequest) -> Result<String, ServerError> {
    req.headers()
        .get(CUSTOMER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or(ServerError::MissingCustomerId)
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------  Checkout  ----------------------------------------------------
route!(checkout => Post "/checkout" impl CheckoutDatabase);
/// Places an order.
///
/// The request names items and quantities; the server re-resolves them against the catalog and
/// prices the order itself. If `total_amount` is present it is cross-checked against the computed
/// total and the request fails with a 400 on divergence. On success the response carries the
/// committed order (status `PAYMENT_PENDING`) and a signed gateway session, with a 201 status.
pub async fn checkout<B>(
    req: HttpRequest,
    body: web::Json<CheckoutRequest>,
    api: web::Data<OrderFlowApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError>
where
    B: CheckoutDatabase,
{
    let customer_id = customer_id(&req)?;
    let request = body.into_inner();
    trace!("💻️ Checkout request from customer {customer_id} with {} items", request.items.len());
    let client_total = match &request.total_amount {
        Some(s) => Some(
            s.parse::<Cents>()
                .map_err(|e| ServerError::InvalidRequestBody(format!("total_amount is not a valid amount. {e}")))?,
        ),
        None => None,
    };
    let selections = request.items.iter().map(|i| i.to_selection()).collect();
    let summary = api.checkout(&customer_id, &request.address_id, selections, client_total).await?;
    let payhere_data = PaymentSession::build(&summary.order, &config);
    let response = CheckoutResponse {
        order_id: summary.order.order_id.clone(),
        tracking_number: summary.order.tracking_number.clone(),
        payhere_data,
        order: summary.order,
        items: summary.items,
    };
    Ok(HttpResponse::Created().json(response))
}

//----------------------------------------------    Cart    ----------------------------------------------------
route!(my_cart => Get "/cart" impl CartManagement);
/// The customer's current cart, one line per item. Prices shown here are the historical
/// price-at-add snapshots; the checkout total may differ.
pub async fn my_cart<B>(req: HttpRequest, api: web::Data<CartApi<B>>) -> Result<HttpResponse, ServerError>
where B: CartManagement {
    let customer_id = customer_id(&req)?;
    trace!("💻️ Cart request from customer {customer_id}");
    let cart = api.cart_for_customer(&customer_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(empty_cart => Delete "/cart" impl CartManagement);
/// Drops every line from the customer's cart.
pub async fn empty_cart<B>(req: HttpRequest, api: web::Data<CartApi<B>>) -> Result<HttpResponse, ServerError>
where B: CartManagement {
    let customer_id = customer_id(&req)?;
    let removed = api.empty_cart(&customer_id).await?;
    debug!("💻️ Customer {customer_id} emptied their cart ({removed} lines)");
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Removed {removed} cart lines"))))
}

//----------------------------------------------   Orders   ----------------------------------------------------
route!(my_orders => Get "/orders" impl CheckoutDatabase);
/// All of the customer's orders, newest first.
pub async fn my_orders<B>(req: HttpRequest, api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: CheckoutDatabase {
    let customer_id = customer_id(&req)?;
    trace!("💻️ Order list request from customer {customer_id}");
    let orders = api.orders_for_customer(&customer_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{order_id}" impl CheckoutDatabase);
/// A single order with its captured line items. Orders belonging to other customers are
/// indistinguishable from missing ones.
pub async fn order_by_id<B>(
    req: HttpRequest,
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CheckoutDatabase,
{
    let customer_id = customer_id(&req)?;
    let order_id = OrderId(path.into_inner());
    trace!("💻️ Order detail request from customer {customer_id} for order {order_id}");
    match api.order_detail(&order_id).await? {
        Some((order, items)) if order.customer_id == customer_id => {
            Ok(HttpResponse::Ok().json(serde_json::json!({ "order": order, "items": items })))
        },
        _ => Err(ServerError::NoRecordFound(format!("Order {order_id}"))),
    }
}

//--------------------------------------------  Fulfillment  ---------------------------------------------------
route!(fulfillment => Post "/orders/{order_id}/fulfillment" impl CheckoutDatabase);
/// Advances a paid order along the fulfillment chain (`Placed -> Shipped -> Delivered`). Skipping
/// or repeating a step is rejected with a 400. The caller must be identified; the auth proxy is
/// expected to restrict this route to back-office users.
pub async fn fulfillment<B>(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<FulfillmentUpdate>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CheckoutDatabase,
{
    let caller = customer_id(&req)?;
    let order_id = OrderId(path.into_inner());
    let new_status = body.into_inner().status;
    debug!("💻️ Fulfillment update for order {order_id} by {caller}: {new_status}");
    let order = api.advance_fulfillment(&order_id, new_status).await?;
    Ok(HttpResponse::Ok().json(order))
}

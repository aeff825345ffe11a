//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into
//! a separate module. Keep this module neat and tidy 🙏
//!
//! The IPN handler deliberately never returns a [`crate::errors::ServerError`]: the engine's
//! `process_ipn` is total, and every rejection maps to the same generic 400 body so that callers
//! cannot probe for the failure reason.

use actix_web::{get, web, HttpResponse, Responder};
use badger_tools::BadgerApi;
use bux_payment_engine::{
    order_types::OrderId,
    traits::{MailSender, OrderStore, PaymentLookup},
    CheckoutApi,
    InboundNotification,
    IpnFlowApi,
    IpnResolution,
};
use log::*;

use crate::{
    data_objects::{CheckoutParams, CheckoutResponse},
    errors::{ServerError, IPN_FAILURE_BODY},
};

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

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// --------------------------------------------  IPN endpoint  -------------------------------------------------
route!(incoming_ipn => Post "/gateway/ipn" impl OrderStore, PaymentLookup, MailSender);
pub async fn incoming_ipn<S, L, M>(body: web::Bytes, api: web::Data<IpnFlowApi<S, L, M>>) -> HttpResponse
where
    S: OrderStore,
    L: PaymentLookup,
    M: MailSender,
{
    trace!("💻️ Received payment notification ({} bytes)", body.len());
    let notification = parse_notification(&body);
    match api.process_ipn(notification).await {
        IpnResolution::Accepted { order_id, disposition } => {
            info!("💻️ Notification for order {order_id} accepted: {disposition}");
            HttpResponse::Ok().body("IPN OK")
        },
        IpnResolution::Rejected { reason, .. } => {
            info!("💻️ Notification rejected: {}", reason.kind());
            HttpResponse::BadRequest().body(IPN_FAILURE_BODY)
        },
    }
}

/// An empty or unparseable body becomes `None`, which the engine reports as unreadable POST data.
fn parse_notification(body: &web::Bytes) -> Option<InboundNotification> {
    if body.is_empty() {
        return None;
    }
    match serde_urlencoded::from_bytes::<InboundNotification>(body) {
        Ok(notification) => Some(notification),
        Err(e) => {
            debug!("💻️ Could not parse notification body: {e}");
            None
        },
    }
}

// ------------------------------------------  Checkout endpoint  ----------------------------------------------
route!(checkout => Post "/checkout/{order_id}" impl OrderStore);
pub async fn checkout<S>(
    path: web::Path<i64>,
    params: web::Json<CheckoutParams>,
    api: web::Data<CheckoutApi<S>>,
    badger: web::Data<BadgerApi>,
) -> Result<HttpResponse, ServerError>
where
    S: OrderStore,
{
    let order_id = OrderId(path.into_inner());
    debug!("💻️ Building payment request for order {order_id}");
    let args = api.payment_request_for_order(order_id, &params.success_url, &params.cancel_url).await?;
    let url = badger.payment_url(args.to_query_pairs()).map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(CheckoutResponse::success(url.to_string())))
}

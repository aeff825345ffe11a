use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use badger_tools::BadgerApi;
use bux_payment_engine::{CheckoutApi, IpnFlowApi, MemoryOrderStore};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::BadgerLookup,
    mailer::LogMailer,
    routes::{health, CheckoutRoute, IncomingIpnRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let store = MemoryOrderStore::default();
    let srv = create_server_instance(config, store)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, store: MemoryOrderStore) -> Result<Server, ServerError> {
    let lookup = BadgerLookup::new(config.badger.clone())?;
    let badger_api =
        BadgerApi::new(config.badger.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let (host, port) = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let ipn_api = IpnFlowApi::new(store.clone(), lookup.clone(), LogMailer, config.merchant.clone());
        let checkout_api = CheckoutApi::new(store.clone(), config.merchant.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bpg::access_log"))
            .app_data(web::Data::new(ipn_api))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(badger_api.clone()))
            .service(health)
            .service(IncomingIpnRoute::<MemoryOrderStore, BadgerLookup, LogMailer>::new())
            .service(CheckoutRoute::<MemoryOrderStore>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Url,
};
use serde::de::DeserializeOwned;

use crate::{config::BadgerConfig, BadgerApiError, PaymentRequestResponse, TxResponse};

#[derive(Debug, Clone)]
pub struct BadgerApi {
    config: BadgerConfig,
    client: Arc<Client>,
}

impl BadgerApi {
    pub fn new(config: BadgerConfig) -> Result<Self, BadgerApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        // the payment-request registry only serves the JSON record for this media type
        headers.insert("Accept", HeaderValue::from_static("application/payment-request"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BadgerApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, params: &[(&str, &str)]) -> Result<T, BadgerApiError> {
        trace!("Sending query: {url}");
        let mut req = self.client.get(&url);
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(|e| BadgerApiError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| BadgerApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| BadgerApiError::RequestError(e.to_string()))?;
            Err(BadgerApiError::QueryError { status, message })
        }
    }

    /// Fetch the payment-request record for `payment_id` from the registry.
    pub async fn payment_request(&self, payment_id: &str) -> Result<PaymentRequestResponse, BadgerApiError> {
        let url = format!("{}{payment_id}", self.config.payment_request_url);
        debug!("Fetching payment request {payment_id}");
        let result = self.get_json::<PaymentRequestResponse>(url, &[]).await?;
        debug!("Fetched payment request {payment_id}");
        Ok(result)
    }

    /// Fetch `tx_hash` from the transaction index, including its SLP token detail.
    pub async fn transaction(&self, tx_hash: &str) -> Result<TxResponse, BadgerApiError> {
        let url = format!("{}{tx_hash}", self.config.tx_url);
        debug!("Fetching transaction {tx_hash}");
        let result = self.get_json::<TxResponse>(url, &[("slp", "true")]).await?;
        debug!("Fetched transaction {tx_hash}");
        Ok(result)
    }

    /// Build the customer-facing payment URL from the given query pairs.
    pub fn payment_url<I, K, V>(&self, pairs: I) -> Result<Url, BadgerApiError>
    where
        I: IntoIterator,
        I::Item: std::borrow::Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Url::parse_with_params(&self.config.pay_url, pairs).map_err(|e| BadgerApiError::RequestError(e.to_string()))
    }
}

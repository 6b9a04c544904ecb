//! Order API client methods

use reqwest::Method;

use super::{ClientError, VoltbayClient};
use crate::types::CreateOrderRequest;
use voltbay_core::types::Order;

impl VoltbayClient {
    /// Place an order for a listing.
    pub async fn place_order(&self, request: &CreateOrderRequest) -> Result<Order, ClientError> {
        self.send(
            Method::POST,
            "/orders",
            Some(serde_json::to_value(request)?),
            None,
        )
        .await
    }

    /// Orders where the authenticated user is the buyer.
    pub async fn buyer_orders(&self) -> Result<Vec<Order>, ClientError> {
        self.send(Method::GET, "/orders/buyer", None, None).await
    }

    /// Orders where the authenticated user is the seller.
    pub async fn seller_orders(&self) -> Result<Vec<Order>, ClientError> {
        self.send(Method::GET, "/orders/seller", None, None).await
    }
}

//! Payment gateway client methods
//!
//! The gateway itself is external and redirect-based: the backend mints
//! an order URL, the user finishes the payment in a browser, and the
//! wallet balance is settled server-side.

use reqwest::Method;

use super::{ClientError, VoltbayClient};
use crate::types::{CreateTopUpRequest, CreateTopUpResponse};
use voltbay_core::topup;

const GATEWAY_OK: &str = "1";

impl VoltbayClient {
    /// Request a gateway redirect URL for a wallet top-up.
    ///
    /// The amount is checked against the top-up limits before any
    /// request is sent.
    pub async fn create_top_up(
        &self,
        amount: i64,
        description: impl Into<String>,
    ) -> Result<String, ClientError> {
        topup::validate_top_up_amount(amount)?;

        let request = CreateTopUpRequest {
            amount,
            description: description.into(),
        };
        let response: CreateTopUpResponse = self
            .send(
                Method::POST,
                "/zalopay/create-order",
                Some(serde_json::to_value(&request)?),
                None,
            )
            .await?;

        if response.returncode != GATEWAY_OK {
            return Err(ClientError::GatewayDeclined(format!(
                "returncode {}",
                response.returncode
            )));
        }
        response.orderurl.ok_or_else(|| {
            ClientError::UnexpectedResponse("gateway accepted the order but sent no URL".into())
        })
    }
}

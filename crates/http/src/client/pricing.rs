//! Price suggestion client methods

use reqwest::Method;

use super::{ClientError, VoltbayClient};
use crate::types::{ApiEnvelope, PriceSuggestion, PriceSuggestionRequest};

impl VoltbayClient {
    /// Ask the backend for a suggested asking price for a battery.
    pub async fn price_suggestion(
        &self,
        request: &PriceSuggestionRequest,
    ) -> Result<PriceSuggestion, ClientError> {
        let envelope: ApiEnvelope<PriceSuggestion> = self
            .send(
                Method::POST,
                "/price-suggestion",
                Some(serde_json::to_value(request)?),
                None,
            )
            .await?;

        if !envelope.success {
            return Err(ClientError::BadRequest(
                envelope
                    .message
                    .unwrap_or_else(|| "price suggestion failed".into()),
            ));
        }
        envelope.data.ok_or_else(|| {
            ClientError::UnexpectedResponse("price suggestion succeeded without data".into())
        })
    }
}

//! Request and response shapes for the marketplace API
//!
//! The backend speaks camelCase JSON. Token-bearing responses follow one
//! strict schema; there is deliberately no fallback probing of nested or
//! renamed fields.

use serde::{Deserialize, Serialize};
use voltbay_core::types::Attachment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token payload issued by login, register and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: String,
    pub payment_method: String,
    pub shipping_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_fee: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    pub listing_id: String,
    pub seller_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

/// Filters accepted by the listing index endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub brand: Option<String>,
    pub kind: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub year: Option<u16>,
    pub capacity: Option<String>,
    pub location: Option<String>,
}

impl ListingQuery {
    /// Flatten set filters into query pairs; unset filters are omitted.
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key.to_string(), value));
            }
        };
        push("page", self.page.map(|v| v.to_string()));
        push("pageSize", self.page_size.map(|v| v.to_string()));
        push("brand", self.brand.clone());
        push("type", self.kind.clone());
        push("minPrice", self.min_price.map(|v| v.to_string()));
        push("maxPrice", self.max_price.map(|v| v.to_string()));
        push("year", self.year.map(|v| v.to_string()));
        push("batteryCapacity", self.capacity.clone());
        push("location", self.location.clone());
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopUpRequest {
    pub amount: i64,
    pub description: String,
}

/// Gateway response for a top-up order. `returncode` is `"1"` on
/// success; anything else is a decline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopUpResponse {
    pub returncode: String,
    #[serde(default)]
    pub orderurl: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSuggestionRequest {
    pub brand: String,
    pub year: u16,
    pub cycle_count: u32,
    pub capacity: String,
    pub condition: String,
    pub voltage: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSuggestion {
    pub suggested_price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soh: Option<f64>,
}

/// Standard `{success, data, message}` wrapper some endpoints use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

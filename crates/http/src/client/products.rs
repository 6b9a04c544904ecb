//! Listing API client methods

use reqwest::Method;

use super::{ClientError, VoltbayClient};
use crate::types::ListingQuery;
use voltbay_core::types::Listing;

impl VoltbayClient {
    /// Browse listings, optionally filtered and paginated.
    pub async fn list_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, ClientError> {
        self.send(Method::GET, "/products", None, Some(query.to_pairs()))
            .await
    }

    /// Fetch a single listing by id.
    pub async fn get_listing(&self, id: &str) -> Result<Listing, ClientError> {
        self.send(Method::GET, &format!("/products/{id}"), None, None)
            .await
    }

    /// Listings owned by the authenticated user.
    pub async fn my_listings(&self) -> Result<Vec<Listing>, ClientError> {
        self.send(Method::GET, "/products/my-products", None, None)
            .await
    }

    /// Post a new listing. Any `id` on the draft is ignored.
    pub async fn create_listing(&self, listing: &Listing) -> Result<Listing, ClientError> {
        self.send(
            Method::POST,
            "/products",
            Some(serde_json::to_value(listing)?),
            None,
        )
        .await
    }

    /// Replace an existing listing.
    pub async fn update_listing(&self, id: &str, listing: &Listing) -> Result<Listing, ClientError> {
        self.send(
            Method::PUT,
            &format!("/products/{id}"),
            Some(serde_json::to_value(listing)?),
            None,
        )
        .await
    }

    /// Delete a listing.
    pub async fn delete_listing(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit(Method::DELETE, &format!("/products/{id}"), None, None)
            .await
    }
}

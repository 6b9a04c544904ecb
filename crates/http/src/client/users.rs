//! User profile API client methods

use reqwest::Method;

use super::{ClientError, VoltbayClient};
use crate::types::UpdateProfileRequest;
use voltbay_core::types::UserProfile;

impl VoltbayClient {
    /// Fetch any user's public profile.
    pub async fn get_user(&self, id: &str) -> Result<UserProfile, ClientError> {
        self.send(Method::GET, &format!("/users/{id}"), None, None)
            .await
    }

    /// Fetch the authenticated user's profile and cache it locally.
    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let profile: UserProfile = self.send(Method::GET, "/users/profile", None, None).await?;
        self.credential_store().store_profile(&profile).await?;
        Ok(profile)
    }

    /// Update the authenticated user's profile; the cached copy follows.
    pub async fn update_profile(
        &self,
        id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<UserProfile, ClientError> {
        let profile: UserProfile = self
            .send(
                Method::PUT,
                &format!("/users/{id}"),
                Some(serde_json::to_value(request)?),
                None,
            )
            .await?;
        self.credential_store().store_profile(&profile).await?;
        Ok(profile)
    }
}

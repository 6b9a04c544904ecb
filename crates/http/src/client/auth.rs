//! Authentication API client methods

use reqwest::Method;

use super::{ClientError, VoltbayClient, LOGOUT_PATH};
use crate::types::{LoginRequest, RegisterRequest, TokenResponse};
use voltbay_core::types::TokenPair;
use voltbay_core::validation;

impl VoltbayClient {
    /// Authenticate and persist the issued credential pair.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenPair, ClientError> {
        validation::validate_required(&request.email, "email")?;
        validation::validate_required(&request.password, "password")?;

        let tokens: TokenResponse = self
            .send(
                Method::POST,
                "/auth/login",
                Some(serde_json::to_value(&request)?),
                None,
            )
            .await?;
        self.adopt_tokens(tokens).await
    }

    /// Create an account. Form fields are checked locally before the
    /// request is dispatched.
    pub async fn register(&self, request: RegisterRequest) -> Result<TokenPair, ClientError> {
        validation::validate_email(&request.email, "email")?;
        validation::validate_password(&request.password, "password")?;
        if let Some(phone) = &request.phone {
            validation::validate_phone(phone, "phone")?;
        }

        let tokens: TokenResponse = self
            .send(
                Method::POST,
                "/auth/register",
                Some(serde_json::to_value(&request)?),
                None,
            )
            .await?;
        self.adopt_tokens(tokens).await
    }

    /// Invalidate the session server-side and wipe local credentials.
    ///
    /// Local state is cleared even when the server call fails, and a 401
    /// here never triggers the refresh path.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.send_unit(Method::POST, LOGOUT_PATH, None, None).await;
        self.credential_store().clear().await?;
        result
    }

    async fn adopt_tokens(&self, tokens: TokenResponse) -> Result<TokenPair, ClientError> {
        let pair = TokenPair::new(tokens.access_token, tokens.refresh_token);
        self.credential_store().store_tokens(&pair).await?;
        self.session().reset();
        Ok(pair)
    }
}

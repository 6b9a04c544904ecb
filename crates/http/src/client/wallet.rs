//! Wallet API client methods

use reqwest::Method;

use super::{ClientError, VoltbayClient};
use voltbay_core::types::WalletInfo;

impl VoltbayClient {
    /// Wallet balance for a user.
    pub async fn wallet_for_user(&self, user_id: &str) -> Result<WalletInfo, ClientError> {
        self.send(Method::GET, &format!("/wallets/users/{user_id}"), None, None)
            .await
    }
}

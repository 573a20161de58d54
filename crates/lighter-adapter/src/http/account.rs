/*
[INPUT]:  L1 wallet address query parameters
[OUTPUT]: Sub-account listings for that address
[POS]:    HTTP layer - account lookup endpoints
[UPDATE]: When adding new account endpoints or changing query parameters
*/

use reqwest::Method;

use crate::http::{LighterClient, Result};
use crate::types::AccountsResponse;

impl LighterClient {
    /// List the sub-accounts registered under an L1 wallet address
    ///
    /// GET /api/v1/accountsByL1Address?l1_address={address}
    ///
    /// An unknown address comes back as an API fault whose message names the
    /// absence; use [`LighterError::is_account_not_found`] to classify it.
    ///
    /// [`LighterError::is_account_not_found`]: crate::http::LighterError::is_account_not_found
    pub async fn accounts_by_l1_address(&self, l1_address: &str) -> Result<AccountsResponse> {
        let endpoint = format!("/api/v1/accountsByL1Address?l1_address={}", l1_address);
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }
}

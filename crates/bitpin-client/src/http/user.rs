/*
[INPUT]:  Access token from the client's token store
[OUTPUT]: Account profile and wallet balances
[POS]:    HTTP layer - user account endpoints (Bearer auth)
[UPDATE]: When adding account endpoints
*/

use serde_json::Value;

use crate::http::endpoints::ApiCall;
use crate::http::{BitpinClient, Result};

impl BitpinClient {
    /// Profile of the logged-in account
    ///
    /// GET usr/info/
    pub async fn get_user_info(&self) -> Result<Value> {
        self.send(ApiCall::user_info()).await
    }

    /// GET wlt/wallets/
    pub async fn get_wallets(&self) -> Result<Value> {
        self.send(ApiCall::wallets()).await
    }
}

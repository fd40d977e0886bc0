// aim-common/src/model/credentials.rs
use serde::{Deserialize, Serialize};

/// Authentication token plus the account it should be resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub token: String,
    pub account_id: Option<String>,
}

impl UserCredentials {
    pub fn new(token: impl Into<String>, account_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            account_id,
        }
    }
}

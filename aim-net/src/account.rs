// aim-net/src/account.rs
use std::sync::Arc;

use aim_common::error::Result;
use serde::Deserialize;
use tracing::debug;

use crate::http::Transport;
use crate::validation::combine_paths;

pub const ACCOUNT_OWNER_ROLE: &str = "account/owner";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountReference {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One account the token holder belongs to, with the roles held there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMembership {
    #[serde(default)]
    pub roles: Vec<String>,
    pub account_reference: AccountReference,
}

impl AccountMembership {
    pub fn is_owner(&self) -> bool {
        self.roles.iter().any(|r| r == ACCOUNT_OWNER_ROLE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub service_id: String,
}

/// Resolves a token to account memberships and active subscriptions.
#[derive(Clone)]
pub struct AccountService {
    transport: Arc<dyn Transport>,
    api_endpoint: String,
}

impl AccountService {
    pub fn new(transport: Arc<dyn Transport>, api_endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            api_endpoint: api_endpoint.into(),
        }
    }

    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    pub async fn accounts(&self, token: &str) -> Result<Vec<AccountMembership>> {
        let url = combine_paths(&self.api_endpoint, "account");
        debug!("Fetching accounts from {}", url);
        let body = self.transport.get_with_token(&url, token).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn subscriptions(&self, account_id: &str, token: &str) -> Result<Vec<Subscription>> {
        let url = combine_paths(&self.api_endpoint, &format!("account/{account_id}/subscriptions"));
        debug!("Fetching subscriptions from {}", url);
        let body = self.transport.get_with_token(&url, token).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// First account owned by the token holder; restricted to `account_id`
    /// when one is given.
    pub async fn owner_account(
        &self,
        token: &str,
        account_id: Option<&str>,
    ) -> Result<Option<AccountMembership>> {
        let accounts = self.accounts(token).await?;
        Ok(accounts.into_iter().find(|membership| {
            membership.is_owner()
                && account_id.is_none_or(|id| membership.account_reference.id == id)
        }))
    }

    pub async fn has_subscription(&self, account_id: &str, token: &str, service_id: &str) -> Result<bool> {
        let subscriptions = self.subscriptions(account_id, token).await?;
        Ok(subscriptions
            .iter()
            .any(|s| s.service_id.eq_ignore_ascii_case(service_id)))
    }
}

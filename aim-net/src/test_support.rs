// aim-net/src/test_support.rs
use std::collections::HashMap;
use std::path::Path;

use aim_common::error::Result;
use async_trait::async_trait;

use crate::http::{unavailable, Transport};

/// Answers requests whose URL ends with a registered suffix.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, String>,
}

impl ScriptedTransport {
    pub fn with(mut self, suffix: &str, body: &str) -> Self {
        self.responses.insert(suffix.to_string(), body.to_string());
        self
    }

    fn lookup(&self, url: &str) -> Result<String> {
        self.responses
            .iter()
            .filter(|(suffix, _)| url.ends_with(suffix.as_str()))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, body)| body.clone())
            .ok_or_else(|| unavailable(url, "no scripted response"))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.lookup(url)
    }

    async fn get_with_token(&self, url: &str, _token: &str) -> Result<String> {
        self.lookup(url)
    }

    async fn option(&self, url: &str, _token: &str) -> Result<String> {
        self.lookup(url)
    }

    async fn download(&self, url: &str, _token: Option<&str>, dest: &Path) -> Result<u64> {
        let body = self.lookup(url)?;
        std::fs::write(dest, body.as_bytes())?;
        Ok(body.len() as u64)
    }
}

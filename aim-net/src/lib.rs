// aim-net/src/lib.rs
//! Networking for aim: the HTTP transport, repository metadata and account lookups

pub mod account;
pub mod http;
pub mod repository;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use account::{AccountMembership, AccountService, Subscription, ACCOUNT_OWNER_ROLE};
pub use http::{ReqwestTransport, Transport};
pub use repository::ArtifactMetadataClient;

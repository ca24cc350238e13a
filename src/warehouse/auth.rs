//! OAuth access tokens for BigQuery.
//!
//! A token is requested for every insert. The service-account source caches
//! and refreshes tokens itself, so a long-running process never sends an
//! expired one.

use std::path::Path;

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use secrecy::SecretString;

use crate::error::WarehouseError;

/// Scope needed for `tabledata.insertAll`.
pub const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

/// Source of bearer tokens for warehouse calls.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<SecretString, WarehouseError>;
}

/// Tokens minted from a service-account key file.
pub struct ServiceAccountTokens {
    account: CustomServiceAccount,
}

impl ServiceAccountTokens {
    /// Load the key file `GOOGLE_APPLICATION_CREDENTIALS` points at.
    pub fn from_file(path: &Path) -> Result<Self, WarehouseError> {
        let account = CustomServiceAccount::from_file(path).map_err(|e| {
            WarehouseError::Auth(format!("cannot load credentials {}: {e}", path.display()))
        })?;
        Ok(Self { account })
    }

    /// Project named in the key file, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.account.project_id()
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokens {
    async fn access_token(&self) -> Result<SecretString, WarehouseError> {
        let token = self
            .account
            .token(&[BIGQUERY_SCOPE])
            .await
            .map_err(|e| WarehouseError::Auth(e.to_string()))?;
        Ok(SecretString::from(token.as_str()))
    }
}

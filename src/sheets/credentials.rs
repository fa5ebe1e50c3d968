//! Service-account authentication.
//!
//! Loads a Google service-account JSON key and turns it into request headers
//! through `google-cloud-auth`. Nothing here is cached: every append reloads
//! the key and builds new credentials.

use std::path::Path;

use google_cloud_auth::credentials::service_account::{AccessSpecifier, Builder};
use google_cloud_auth::credentials::{CacheableResource, Credentials};
use http::Extensions;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use serde_json::Value;
use tracing::{debug, error};

use crate::errors::SheetsError;

/// Reads the key file at `path` as raw JSON.
///
/// # Errors
///
/// Returns `CredentialError` if the file cannot be read or is not JSON.
pub fn load_key(path: impl AsRef<Path>) -> Result<Value, SheetsError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SheetsError::CredentialError(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| SheetsError::CredentialError(format!("invalid key file: {e}")))
}

/// Builds service-account credentials restricted to `scope`.
///
/// # Errors
///
/// Returns `CredentialError` if the key is not a usable service-account key.
pub fn service_account_credentials(key: Value, scope: &str) -> Result<Credentials, SheetsError> {
    if let Some(email) = key.get("client_email").and_then(Value::as_str) {
        debug!(client_email = %email, "Building service account credentials");
    }

    Builder::new(key)
        .with_access_specifier(AccessSpecifier::from_scopes([scope]))
        .build()
        .map_err(|e| SheetsError::CredentialError(e.to_string()))
}

/// Fetches the headers that authorize a request, `Authorization` included.
///
/// # Errors
///
/// Returns `AuthError` if no token can be produced.
pub async fn auth_headers(credentials: &Credentials) -> Result<HeaderMap, SheetsError> {
    let headers = match credentials.headers(Extensions::new()).await {
        Ok(CacheableResource::New { data, .. }) => data,
        Ok(CacheableResource::NotModified) => {
            return Err(SheetsError::AuthError(
                "credentials returned no headers".to_string(),
            ));
        }
        Err(e) => {
            error!("Failed to obtain access token: {}", e);
            return Err(SheetsError::AuthError(e.to_string()));
        }
    };

    if !headers.contains_key(AUTHORIZATION) {
        return Err(SheetsError::AuthError(
            "credentials produced no Authorization header".to_string(),
        ));
    }
    Ok(headers)
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::cli::config::{Connection, Credentials};
use crate::error::error_from_response;

const TOKEN_PATH: &str = "/api/catalog/v1/oauth/tokens";
const TOKEN_SCOPE: &str = "PRINCIPAL_ROLE:ALL";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OAuth2 token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Exchange client credentials for a bearer token
pub async fn fetch_token(base_url: &str, client_id: &str, client_secret: &str) -> Result<TokenResponse> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;
    let url = format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH);
    debug!(url = %url, client_id = %client_id, "requesting access token");

    let response = client
        .post(&url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", TOKEN_SCOPE),
        ])
        .send()
        .await
        .with_context(|| format!("Failed to reach token endpoint {}", url))?;

    if !response.status().is_success() {
        let err = error_from_response(response).await;
        bail!("Failed to obtain access token: {}", err);
    }

    let token: TokenResponse = response
        .json()
        .await
        .context("Failed to parse token response")?;

    if token.access_token.is_empty() {
        bail!("Token endpoint returned an empty access token");
    }

    Ok(token)
}

/// Resolve the bearer token for a connection, exchanging client credentials if needed
pub async fn resolve_token(connection: &Connection) -> Result<String> {
    match &connection.credentials {
        Credentials::AccessToken(token) => Ok(token.clone()),
        Credentials::ClientCredentials {
            client_id,
            client_secret,
        } => {
            let token = fetch_token(&connection.base_url, client_id, client_secret).await?;
            Ok(token.access_token)
        }
    }
}

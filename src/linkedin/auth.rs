use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange a refresh token for a fresh access token
pub async fn refresh_access_token(
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<String> {
    refresh_access_token_at(TOKEN_URL, client_id, client_secret, refresh_token).await
}

/// Token refresh against an explicit token endpoint
pub async fn refresh_access_token_at(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<String> {
    let response = Client::new()
        .post(token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
        .send()
        .await
        .context("Failed to reach LinkedIn token endpoint")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Error refreshing token ({}): {}", status, body);
    }

    let token: TokenResponse = response
        .json()
        .await
        .context("Failed to parse token response")?;

    info!("Refreshed LinkedIn access token");

    Ok(token.access_token)
}

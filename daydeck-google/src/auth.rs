//! Loopback OAuth consent flow.
//!
//! Opens the Google consent page in a browser, catches the redirect on a
//! local listener, exchanges the code for tokens and saves the session.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use url::Url;
use uuid::Uuid;

use crate::app_config::{self, Credentials};
use crate::session::{Session, SessionData, TOKEN_URL, TokenResponse};

// Read-only is all the agenda needs.
pub const SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

const CONSENT_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const PRIMARY_CALENDAR_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary";

const REDIRECT_PORT: u16 = 8085;

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

pub fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// Run the full consent flow and return the authorized account email.
pub async fn connect() -> Result<String> {
    let creds = app_config::load()?;
    let redirect = redirect_uri();

    // Nonce tying the callback to this invocation
    let state = Uuid::new_v4().simple().to_string();

    let auth_url = Url::parse_with_params(
        CONSENT_URL,
        [
            ("client_id", creds.client_id.as_str()),
            ("redirect_uri", redirect.as_str()),
            ("response_type", "code"),
            ("scope", SCOPE),
            // offline + consent so Google hands out a refresh token
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state.as_str()),
        ],
    )
    .context("Failed to build consent URL")?;

    eprintln!("\nOpen this URL in your browser to authenticate:\n");
    eprintln!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(auth_url.as_str()).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let (code, returned_state) = wait_for_callback().await?;

    if returned_state != state {
        anyhow::bail!("OAuth state mismatch - possible CSRF attack");
    }

    eprintln!("\nReceived authorization code, exchanging for tokens...");

    let client = reqwest::Client::new();
    let tokens = exchange_code(&client, &creds, &redirect, &code).await?;
    let data = SessionData::from_token_response(tokens, None)?;

    let account_email = fetch_account_email(&client, data.access_token()).await?;

    let session = Session::new(&account_email, data);
    session.save()?;

    eprintln!("Authentication successful!");

    Ok(account_email)
}

async fn exchange_code(
    client: &reqwest::Client,
    creds: &Credentials,
    redirect: &str,
    code: &str,
) -> Result<TokenResponse> {
    let response = client
        .post(TOKEN_URL)
        .form(&[
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .context("Failed to reach the Google token endpoint")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Token exchange failed with HTTP {}: {}", status, body);
    }

    response
        .json()
        .await
        .context("Failed to parse token exchange response")
}

/// The primary calendar's id is the account email.
async fn fetch_account_email(client: &reqwest::Client, access_token: &str) -> Result<String> {
    #[derive(serde::Deserialize)]
    struct PrimaryCalendar {
        id: String,
    }

    let response = client
        .get(PRIMARY_CALENDAR_URL)
        .bearer_auth(access_token)
        .send()
        .await
        .context("Failed to fetch the primary calendar")?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Could not resolve account email (HTTP {})",
            response.status()
        );
    }

    let calendar: PrimaryCalendar = response
        .json()
        .await
        .context("Failed to parse primary calendar response")?;

    Ok(calendar.id)
}

async fn wait_for_callback() -> Result<(String, String)> {
    let listener = TcpListener::bind(redirect_address())
        .await
        .context("Failed to bind OAuth callback listener")?;

    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    // Parse the request to get the code and state
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = Url::parse(&format!("http://localhost{}", url_part))?;

    if let Some((_, error)) = url.query_pairs().find(|(k, _)| k == "error") {
        anyhow::bail!("Authorization was denied: {}", error);
    }

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| anyhow::anyhow!("No code in callback"))?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| anyhow::anyhow!("No state in callback"))?;

    // Send a response to the browser
    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    Ok((code, state))
}

use axum::{
    extract::{FromRef, Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, AuthorizationCode, ClientId,
    ClientSecret, CsrfToken, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        jwt::JwtKeys,
        repo::{AccountStatus, User},
        service::normalize_email,
    },
    config::GoogleConfig,
    state::AppState,
};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v3/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/google", get(google_login))
        .route("/api/auth/google/callback", get(google_callback))
}

fn google_client(config: &GoogleConfig) -> anyhow::Result<BasicClient> {
    Ok(BasicClient::new(
        ClientId::new(config.client_id.clone()),
        Some(ClientSecret::new(config.client_secret.clone())),
        AuthUrl::new(GOOGLE_AUTH_URL.to_string())?,
        Some(TokenUrl::new(GOOGLE_TOKEN_URL.to_string())?),
    )
    .set_redirect_uri(RedirectUrl::new(config.redirect_url.clone())?))
}

/// Identity claim returned by Google once the handshake completes.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    #[allow(dead_code)]
    pub state: Option<String>,
    pub error: Option<String>,
}

fn failure_redirect(state: &AppState) -> Redirect {
    Redirect::to(&format!("{}/login", state.config.frontend_url))
}

#[instrument(skip(state))]
pub async fn google_login(State(state): State<AppState>) -> Redirect {
    let client = match google_client(&state.config.google) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "google client misconfigured");
            return failure_redirect(&state);
        }
    };

    let (auth_url, _csrf) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("profile".into()))
        .add_scope(Scope::new("email".into()))
        .url();

    Redirect::to(auth_url.as_str())
}

/// Google redirects here after login. Everything provider-specific ends at
/// this handler; the account side is the idempotent find-or-create over the
/// verified email. Failures redirect back to the storefront login page.
#[instrument(skip(state, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    if let Some(err) = query.error {
        warn!(error = %err, "google callback reported an error");
        return failure_redirect(&state);
    }
    let Some(code) = query.code else {
        warn!("google callback without code");
        return failure_redirect(&state);
    };

    let client = match google_client(&state.config.google) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "google client misconfigured");
            return failure_redirect(&state);
        }
    };

    let token = match client
        .exchange_code(AuthorizationCode::new(code))
        .request_async(async_http_client)
        .await
    {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "google code exchange failed");
            return failure_redirect(&state);
        }
    };

    let profile: GoogleUserInfo = match reqwest::Client::new()
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(token.access_token().secret())
        .send()
        .await
        .and_then(|r| r.error_for_status())
    {
        Ok(resp) => match resp.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "google userinfo body unreadable");
                return failure_redirect(&state);
            }
        },
        Err(e) => {
            warn!(error = %e, "google userinfo fetch failed");
            return failure_redirect(&state);
        }
    };

    let email = normalize_email(&profile.email);
    let nombre = profile.name.unwrap_or_else(|| email.clone());

    let user = match User::find_or_create_oauth(&state.db, &email, &nombre).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, "oauth find-or-create failed");
            return failure_redirect(&state);
        }
    };

    if user.estado == AccountStatus::Blocked {
        warn!(user_id = %user.id, "blocked account attempted google login");
        return failure_redirect(&state);
    }

    let keys = JwtKeys::from_ref(&state);
    let jwt = match keys.sign(&user) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "jwt sign failed after oauth");
            return failure_redirect(&state);
        }
    };

    info!(user_id = %user.id, email = %user.email, "google login succeeded");
    Redirect::to(&format!(
        "{}/cliente?token={}",
        state.config.frontend_url, jwt
    ))
}

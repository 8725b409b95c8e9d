use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::{Client, Response};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::auth::{AuthError, Identity, IdentityProvider, SignUp};
use crate::config::Config;

const TOKEN_AUDIENCE: &str = "authenticated";

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl RemoteUser {
    fn into_identity(self) -> Identity {
        let username = self.user_metadata.and_then(|m| m.username);
        Identity {
            user_id: self.id,
            username,
            email: self.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    user: RemoteUser,
}

/// Sign-up answers with a session when the project auto-confirms emails,
/// and with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(SessionResponse),
    User(RemoteUser),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

struct Session {
    access_token: String,
    identity: Identity,
}

/// Email/password auth against a hosted GoTrue-compatible endpoint.
pub struct HostedIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
    jwt_secret: String,
    session: RwLock<Option<Session>>,
}

impl HostedIdentityProvider {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: cfg.auth_url.trim_end_matches('/').to_string(),
            api_key: cfg.auth_api_key.clone(),
            jwt_secret: cfg.auth_jwt_secret.clone(),
            session: RwLock::new(None),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Checks the access token's signature and that it belongs to `user_id`.
    /// Without a configured secret the provider's response is trusted.
    fn verify_access_token(&self, token: &str, user_id: &str) -> Result<(), AuthError> {
        if self.jwt_secret.is_empty() {
            return Ok(());
        }
        let claims = verify_token(token, &self.jwt_secret)?;
        if claims.sub != user_id {
            return Err(AuthError::Provider(format!(
                "session token subject {} does not match user {}",
                claims.sub, user_id
            )));
        }
        debug!("Session token verified for {}", claims.email.as_deref().unwrap_or(&claims.sub));
        Ok(())
    }

    async fn open_session(&self, resp: SessionResponse) -> Result<Identity, AuthError> {
        self.verify_access_token(&resp.access_token, &resp.user.id)?;
        let identity = resp.user.into_identity();
        *self.session.write().await = Some(Session {
            access_token: resp.access_token,
            identity: identity.clone(),
        });
        info!("Signed in as {}", identity.display_name());
        Ok(identity)
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn sign_up(&self, request: &SignUp) -> Result<Identity, AuthError> {
        request.validate()?;

        let body = serde_json::json!({
            "email": request.email,
            "password": request.password,
            "data": { "username": request.username },
        });
        let resp = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        match resp.json::<SignUpResponse>().await? {
            SignUpResponse::Session(session) => self.open_session(session).await,
            SignUpResponse::User(user) => {
                info!("Registered {}; waiting for email confirmation", user.id);
                Ok(user.into_identity())
            }
        }
    }

    async fn sign_in(&self, login: &str, password: &str) -> Result<Identity, AuthError> {
        let body = serde_json::json!({ "email": login, "password": password });
        let resp = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let session = resp.json::<SessionResponse>().await?;
        self.open_session(session).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };
        let result = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;
        // The local session is gone either way.
        if let Err(e) = result {
            warn!("Remote sign-out failed: {}", e);
        }
        Ok(())
    }

    async fn current_user(&self) -> Option<Identity> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.identity.clone())
    }
}

fn verify_token(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[TOKEN_AUDIENCE]);
    let data = decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)?;
    Ok(data.claims)
}

async fn check_status(resp: Response) -> Result<Response, AuthError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body: ErrorBody = resp.json().await.unwrap_or_default();
    Err(translate_error(status.as_u16(), &body))
}

fn translate_error(status: u16, body: &ErrorBody) -> AuthError {
    let message = body
        .error_description
        .as_deref()
        .or(body.msg.as_deref())
        .or(body.message.as_deref())
        .unwrap_or("")
        .to_string();
    let lower = message.to_lowercase();
    let code = body.error_code.as_deref().unwrap_or("");

    if code == "invalid_credentials" || lower.contains("invalid login credentials") {
        AuthError::InvalidCredentials
    } else if code == "email_not_confirmed" || lower.contains("email not confirmed") {
        AuthError::EmailNotConfirmed
    } else if code == "user_already_exists" || lower.contains("already registered") {
        AuthError::UserAlreadyExists
    } else if message.is_empty() {
        AuthError::Provider(format!("auth provider returned HTTP {}", status))
    } else {
        AuthError::Provider(message)
    }
}

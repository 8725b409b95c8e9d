use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::{AuthError, Identity, IdentityProvider, SignUp};
use crate::storage::{read_json, write_json};

/// Accounts file kept next to the journals. The leading dot keeps it out of
/// the user-id namespace.
pub const IDENTITY_FILE: &str = ".identity.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalAccount {
    identity: Identity,
    password: String,
}

#[derive(Debug, Default, Deserialize)]
struct LocalState {
    #[serde(default)]
    accounts: BTreeMap<String, LocalAccount>,
    #[serde(default)]
    session: Option<Identity>,
    /// Session came from `EDGECORE_USER` rather than a sign-in.
    #[serde(skip)]
    preset: bool,
}

#[derive(Serialize)]
struct StateFile<'a> {
    accounts: &'a BTreeMap<String, LocalAccount>,
    session: Option<&'a Identity>,
}

/// Single-device accounts. Backed by [`IDENTITY_FILE`] when opened on a
/// directory, in-process only otherwise.
#[derive(Default)]
pub struct LocalIdentityProvider {
    state: RwLock<LocalState>,
    path: Option<PathBuf>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider with a session already open for `user_id`, or none when
    /// `user_id` is empty.
    pub fn signed_in_as(user_id: &str) -> Self {
        Self {
            state: RwLock::new(LocalState {
                accounts: BTreeMap::new(),
                session: preset_identity(user_id),
                preset: true,
            }),
            path: None,
        }
    }

    /// Loads accounts and the saved session from `dir`. Without a saved
    /// session, `default_user` (if any) is used for this process only.
    pub fn open(dir: impl AsRef<Path>, default_user: &str) -> Result<Self, AuthError> {
        let path = dir.as_ref().join(IDENTITY_FILE);
        let mut state: LocalState = read_json(&path)?.unwrap_or_default();
        debug!("Loaded {} local account(s) from {}", state.accounts.len(), path.display());
        if state.session.is_none() {
            state.session = preset_identity(default_user);
            state.preset = state.session.is_some();
        }
        Ok(Self {
            state: RwLock::new(state),
            path: Some(path),
        })
    }

    fn persist(&self, state: &LocalState) -> Result<(), AuthError> {
        if let Some(path) = &self.path {
            let file = StateFile {
                accounts: &state.accounts,
                session: state.session.as_ref().filter(|_| !state.preset),
            };
            write_json(path, &file)?;
        }
        Ok(())
    }
}

fn preset_identity(user_id: &str) -> Option<Identity> {
    (!user_id.is_empty()).then(|| Identity {
        user_id: user_id.to_string(),
        username: Some(user_id.to_string()),
        email: None,
    })
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, request: &SignUp) -> Result<Identity, AuthError> {
        request.validate()?;

        let mut state = self.state.write().await;
        let taken = state.accounts.contains_key(&request.username)
            || state
                .accounts
                .values()
                .any(|a| a.identity.email.as_deref() == Some(request.email.as_str()));
        if taken {
            return Err(AuthError::UserAlreadyExists);
        }

        let identity = Identity {
            user_id: request.username.clone(),
            username: Some(request.username.clone()),
            email: Some(request.email.clone()),
        };
        state.accounts.insert(
            request.username.clone(),
            LocalAccount {
                identity: identity.clone(),
                password: request.password.clone(),
            },
        );
        if let Err(e) = self.persist(&state) {
            state.accounts.remove(&request.username);
            return Err(e);
        }
        info!("Registered local user {}", identity.user_id);
        Ok(identity)
    }

    async fn sign_in(&self, login: &str, password: &str) -> Result<Identity, AuthError> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get(login)
            .or_else(|| {
                state
                    .accounts
                    .values()
                    .find(|a| a.identity.email.as_deref() == Some(login))
            })
            .ok_or(AuthError::InvalidCredentials)?;
        if account.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = account.identity.clone();
        let previous = (state.session.replace(identity.clone()), state.preset);
        state.preset = false;
        if let Err(e) = self.persist(&state) {
            (state.session, state.preset) = previous;
            return Err(e);
        }
        info!("Signed in as {}", identity.display_name());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = self.state.write().await;
        state.session = None;
        state.preset = false;
        self.persist(&state)
    }

    async fn current_user(&self) -> Option<Identity> {
        self.state.read().await.session.clone()
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, TrackerResult, ValidationError};
use crate::session::Session;
use crate::storage::{keys, Storage, StorageJsonExt};

pub const MIN_PASSWORD_LEN: usize = 4;

/// The single shared login. Passwords are stored and compared as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "user".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Outcome of [`AccountStore::load_or_reset`].
#[derive(Debug)]
pub struct LoadedAccount {
    pub credentials: Credentials,
    /// Set when the stored pair was corrupt and has just been dropped.
    pub recovered: Option<DecodeError>,
}

pub struct AccountStore<S> {
    storage: S,
}

impl<S: Storage> AccountStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored credentials, or the built-in pair when none (or garbage) is stored.
    pub fn load(&self) -> Result<Credentials> {
        Ok(self.load_or_reset()?.credentials)
    }

    /// Like [`load`](Self::load), but also reports a corrupt entry. The
    /// entry is removed, so the report happens once.
    pub fn load_or_reset(&self) -> Result<LoadedAccount> {
        match self.storage.get_json::<Credentials>(keys::ACCOUNT)? {
            Some(Ok(creds)) if !creds.username.is_empty() && !creds.password.is_empty() => {
                Ok(LoadedAccount {
                    credentials: creds,
                    recovered: None,
                })
            }
            Some(Err(source)) => {
                tracing::warn!(error = %source, "invalid account data in storage; using default");
                self.storage
                    .remove(keys::ACCOUNT)
                    .context("clearing corrupted account")?;
                Ok(LoadedAccount {
                    credentials: Credentials::default(),
                    recovered: Some(DecodeError {
                        key: keys::ACCOUNT,
                        source,
                    }),
                })
            }
            _ => Ok(LoadedAccount {
                credentials: Credentials::default(),
                recovered: None,
            }),
        }
    }

    /// Picks up the user left signed in by a previous run.
    pub fn restore(&self, session: &mut Session) -> Result<()> {
        let user = self
            .storage
            .get(keys::CURRENT_USER)
            .context("loading current user")?;
        session.set_current_user(user.filter(|u| !u.is_empty()));
        Ok(())
    }

    pub fn sign_in(&self, session: &mut Session, username: &str, password: &str) -> TrackerResult<()> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ValidationError::new("Please enter username and password").into());
        }

        let creds = self.load()?;
        if username != creds.username || password != creds.password {
            return Err(ValidationError::new("Invalid credentials").into());
        }

        self.storage.set(keys::CURRENT_USER, username)?;
        session.set_current_user(Some(username.to_string()));
        log::info!("signed in as {}", username);
        Ok(())
    }

    pub fn sign_out(&self, session: &mut Session) -> Result<()> {
        self.storage.remove(keys::CURRENT_USER)?;
        session.sign_out();
        Ok(())
    }

    /// Replaces the stored credentials and signs in under the new name.
    /// Only a signed-in user may do this.
    pub fn change(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> TrackerResult<()> {
        if !session.is_signed_in() {
            return Err(ValidationError::new("Please sign in first").into());
        }
        let username = username.trim();
        if username.is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(ValidationError::new("All fields are required").into());
        }
        if password != confirm {
            return Err(ValidationError::new("Passwords do not match").into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }

        let creds = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.storage.set_json(keys::ACCOUNT, &creds)?;
        self.storage.set(keys::CURRENT_USER, username)?;
        session.set_current_user(Some(username.to_string()));
        log::info!("account updated for {}", username);
        Ok(())
    }

    /// Re-checks the password before a destructive action. Surrounding
    /// whitespace in the input is ignored.
    pub fn verify_password(&self, password: &str) -> Result<bool> {
        Ok(password.trim() == self.load()?.password)
    }
}

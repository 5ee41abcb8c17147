//! Access token storage.
//!
//! The backend issues an opaque token at login. It is kept in a small file
//! so it survives between runs and is attached to every outgoing request by
//! the [`ApiClient`](crate::ApiClient).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::TokenError;

/// Source of the current access token.
pub trait TokenProvider: Send + Sync {
    /// The token to attach, if the user is logged in.
    fn token(&self) -> Option<String>;
}

/// Provider that never has a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Provider returning a fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// File-backed access token store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// File name of the token inside a data directory.
    pub const FILE_NAME: &'static str = "access_token";

    /// Use the token file at `path`. Nothing is created until `set`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the default token file inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::open(dir.as_ref().join(Self::FILE_NAME))
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a token, replacing any previous one.
    pub fn set(&self, token: &str) -> Result<(), TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, token).map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }

        Ok(())
    }

    /// Read the stored token. Missing or unreadable files read as no token.
    pub fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to read access token");
                }
                None
            }
        }
    }

    /// Whether a token is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Delete the stored token. Removing an absent token is not an error.
    pub fn remove(&self) -> Result<(), TokenError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> TokenError {
        TokenError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl TokenProvider for TokenStore {
    fn token(&self) -> Option<String> {
        self.get()
    }
}

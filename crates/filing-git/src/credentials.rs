//! Remote authentication built at the point of use

use git2::{Cred, RemoteCallbacks};

/// Username/password (or token) pair for an authenticated remote.
///
/// Credentials are combined into git2 callbacks only when a remote operation
/// runs; they are never embedded into the remote URL and never logged.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Build remote callbacks for an operation.
///
/// With credentials present, answers authentication requests with a
/// plaintext userpass pair; otherwise falls back to git's default credential
/// resolution (helpers, agents).
pub fn remote_callbacks(credentials: Option<&Credentials>) -> RemoteCallbacks<'static> {
    let credentials = credentials.cloned();
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, _username_from_url, _allowed_types| {
        match &credentials {
            Some(c) => Cred::userpass_plaintext(&c.username, &c.password),
            None => Cred::default(),
        }
    });
    callbacks
}

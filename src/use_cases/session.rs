use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::entities::{Role, Session};
use crate::domain::ports::KeyValueStorage;

// Exact keys the browser build of the application uses; kept stable so a
// native embedding can share storage with an existing web session.
const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const ROLE_KEY: &str = "userRole";
const REMEMBERED_EMAIL_KEY: &str = "rememberedEmail";

// Mirror of the `user` record as it is persisted.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    id: String,
    role: Role,
    display_name: String,
}

/// Session store over two injected storage scopes.
///
/// `set(session, remember)` writes to the durable scope when `remember`
/// holds, else to the per-tab scope. Reads prefer the durable scope, so a
/// remembered session wins over a stale per-tab one. No expiry timer runs
/// client-side; expiry is discovered reactively via a 401 response.
#[derive(Clone)]
pub struct SessionVault {
    durable: Arc<dyn KeyValueStorage>,
    tab: Arc<dyn KeyValueStorage>,
}

impl SessionVault {
    pub fn new(durable: Arc<dyn KeyValueStorage>, tab: Arc<dyn KeyValueStorage>) -> Self {
        Self { durable, tab }
    }

    /// Current session, or `None` when no token is stored.
    pub fn get(&self) -> Option<Session> {
        let (scope, token) = self.token_scope()?;
        let user = match scope.get(USER_KEY) {
            Some(raw) => match serde_json::from_str::<StoredUser>(&raw) {
                Ok(user) => user,
                Err(err) => {
                    warn!(error = %err, "stored user record is malformed; treating as logged out");
                    return None;
                }
            },
            None => return None,
        };

        // The mirrored role key is authoritative for quick lookups; fall
        // back to the user record when it is missing.
        let role = scope
            .get(ROLE_KEY)
            .and_then(|raw| Role::parse(&raw))
            .unwrap_or(user.role);

        Some(Session {
            token,
            role,
            user_id: user.id,
            display_name: user.display_name,
        })
    }

    /// Token only, for request decoration and the realtime handshake.
    pub fn token(&self) -> Option<String> {
        self.token_scope().map(|(_, token)| token)
    }

    /// Persists the session, always mirroring role and user id.
    pub fn set(&self, session: &Session, remember: bool) {
        let scope: &Arc<dyn KeyValueStorage> = if remember { &self.durable } else { &self.tab };
        let user = StoredUser {
            id: session.user_id.clone(),
            role: session.role,
            display_name: session.display_name.clone(),
        };
        let raw = match serde_json::to_string(&user) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to serialize session user record");
                return;
            }
        };

        scope.set(TOKEN_KEY, &session.token);
        scope.set(USER_KEY, &raw);
        scope.set(ROLE_KEY, session.role.as_str());
    }

    /// Records or forgets the login-form email. Remembered emails live in
    /// the durable scope regardless of where the session itself went.
    pub fn set_remembered_email(&self, email: Option<&str>) {
        match email {
            Some(email) => self.durable.set(REMEMBERED_EMAIL_KEY, email),
            None => self.durable.remove(REMEMBERED_EMAIL_KEY),
        }
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.durable.get(REMEMBERED_EMAIL_KEY)
    }

    /// Removes every session key from both scopes.
    pub fn clear(&self) {
        for scope in [&self.durable, &self.tab] {
            scope.remove(TOKEN_KEY);
            scope.remove(USER_KEY);
            scope.remove(ROLE_KEY);
            scope.remove(REMEMBERED_EMAIL_KEY);
        }
    }

    fn token_scope(&self) -> Option<(&Arc<dyn KeyValueStorage>, String)> {
        if let Some(token) = self.durable.get(TOKEN_KEY) {
            return Some((&self.durable, token));
        }
        self.tab.get(TOKEN_KEY).map(|token| (&self.tab, token))
    }
}

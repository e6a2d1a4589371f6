//! Request and credential types.
//!
//! [`AuthRequest`] is the read-only view of one inbound request that the
//! strategy evaluates. [`Credentials`] is what it hands back.

use crate::constants::fields;
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// Identity Types
// ═══════════════════════════════════════════════════════════════════════

/// Clef user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a user ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// User identity resolved from a login code.
///
/// `id` is always present; whatever else Clef returned (name, email,
/// phone number) is kept in `attributes` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClefUser {
    /// Clef user ID.
    pub id: UserId,

    /// Remaining identity attributes.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ClefUser {
    /// Create a user with no extra attributes.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            attributes: Map::new(),
        }
    }

    /// Add an identity attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Credentials attached to an authenticated request.
///
/// Serializes as a flat object: `{}` when empty, `{"id": "…", …}`
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Authenticated user, if known at this phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,

    /// Identity attributes from Clef.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Credentials {
    /// Credentials with no identity.
    ///
    /// Returned by the authenticate phase of a logout request, before the
    /// payload has been read.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Credentials carrying only a user ID.
    #[must_use]
    pub fn from_id(id: UserId) -> Self {
        Self {
            id: Some(id),
            attributes: Map::new(),
        }
    }

    /// Returns `true` if no identity is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.attributes.is_empty()
    }
}

impl From<ClefUser> for Credentials {
    fn from(user: ClefUser) -> Self {
        Self {
            id: Some(user.id),
            attributes: user.attributes,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Request View
// ═══════════════════════════════════════════════════════════════════════

/// Body of a logout request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutPayload {
    /// Token Clef posts to signal that a user logged out.
    #[serde(default)]
    pub logout_token: Option<String>,
}

impl LogoutPayload {
    /// Payload carrying a logout token.
    #[must_use]
    pub fn new(logout_token: impl Into<String>) -> Self {
        Self {
            logout_token: Some(logout_token.into()),
        }
    }
}

/// What the strategy sees of one request.
///
/// Cookie values must already be decrypted by the surrounding pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRequest {
    /// HTTP method. `POST` selects the logout branch.
    pub method: Method,

    /// Query parameters.
    pub query: HashMap<String, String>,

    /// Decrypted cookie values.
    pub cookies: HashMap<String, String>,

    /// Parsed body, for logout requests.
    pub payload: Option<LogoutPayload>,
}

impl AuthRequest {
    /// Empty request with the given method.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: HashMap::new(),
            cookies: HashMap::new(),
            payload: None,
        }
    }

    /// Empty `GET` request (a login callback).
    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// `POST` request with a logout payload.
    #[must_use]
    pub fn post(payload: LogoutPayload) -> Self {
        Self::new(Method::POST).with_payload(payload)
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Add a decrypted cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Attach a logout payload.
    #[must_use]
    pub fn with_payload(mut self, payload: LogoutPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// The `state` query parameter.
    #[must_use]
    pub fn state_param(&self) -> Option<&str> {
        self.query.get(fields::STATE).map(String::as_str)
    }

    /// The `code` query parameter.
    #[must_use]
    pub fn code_param(&self) -> Option<&str> {
        self.query.get(fields::CODE).map(String::as_str)
    }

    /// A decrypted cookie value.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

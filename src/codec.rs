//! Callback token codec
//!
//! Tokens are `prefix:field:field...` strings carried on buttons. The prefix
//! names the kind of control that minted the token (a menu of one context
//! kind, a paginator kind), so a router only decodes tokens of its own kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Upper bound on an encoded token, matching the chat platform's callback data limit
pub const MAX_TOKEN_BYTES: usize = 64;

const SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Invalid namespace prefix: {0:?}")]
    InvalidNamespace(String),
    #[error("Token {token:?} does not belong to namespace {expected}")]
    WrongNamespace { expected: String, token: String },
    #[error("Malformed token {0:?}")]
    Malformed(String),
    #[error("Field {0:?} contains the reserved separator")]
    ReservedSeparator(String),
    #[error("Encoded token is {0} bytes, limit is {MAX_TOKEN_BYTES}")]
    TooLong(usize),
    #[error("Invalid page delta {0:?}")]
    InvalidDelta(String),
    #[error("Unknown menu action {0:?}")]
    UnknownAction(String),
    #[error("Token minted by paginator instance {found:?}, expected {expected:?}")]
    InstanceMismatch { expected: String, found: String },
}

/// Encoded callback data carried on a button
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackToken(String);

impl CallbackToken {
    /// Wrap raw callback data received from the transport.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value that can travel inside a token as a list of text fields
pub trait TokenPayload: Sized {
    fn to_fields(&self) -> Vec<String>;
    fn from_fields(fields: &[&str]) -> Result<Self, CodecError>;
}

/// Prefix shared by every token of one control kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Result<Self, CodecError> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.contains(SEPARATOR) || prefix.len() >= MAX_TOKEN_BYTES {
            return Err(CodecError::InvalidNamespace(prefix));
        }
        Ok(Self(prefix))
    }

    pub fn prefix(&self) -> &str {
        &self.0
    }

    /// True if `token` was minted under this namespace.
    pub fn owns(&self, token: &str) -> bool {
        token
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }

    pub fn encode<P: TokenPayload>(&self, payload: &P) -> Result<CallbackToken, CodecError> {
        let mut token = self.0.clone();
        for field in payload.to_fields() {
            if field.contains(SEPARATOR) {
                return Err(CodecError::ReservedSeparator(field));
            }
            token.push(SEPARATOR);
            token.push_str(&field);
        }
        if token.len() > MAX_TOKEN_BYTES {
            return Err(CodecError::TooLong(token.len()));
        }
        Ok(CallbackToken(token))
    }

    pub fn decode<P: TokenPayload>(&self, token: &str) -> Result<P, CodecError> {
        let rest = token
            .strip_prefix(self.0.as_str())
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .ok_or_else(|| CodecError::WrongNamespace {
                expected: self.0.clone(),
                token: token.to_string(),
            })?;
        let fields: Vec<&str> = rest.split(SEPARATOR).collect();
        P::from_fields(&fields)
    }
}

impl TryFrom<String> for Namespace {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signed page movement requested by a paginator control.
///
/// `instance` distinguishes paginators of the same kind living side by side;
/// it is empty when the owner does not need that distinction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDelta {
    pub instance: String,
    pub delta: i64,
}

impl TokenPayload for PageDelta {
    fn to_fields(&self) -> Vec<String> {
        vec![self.instance.clone(), self.delta.to_string()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, CodecError> {
        let [instance, delta] = fields else {
            return Err(CodecError::Malformed(fields.join(":")));
        };
        let delta = delta
            .parse()
            .map_err(|_| CodecError::InvalidDelta((*delta).to_string()))?;
        Ok(Self {
            instance: (*instance).to_string(),
            delta,
        })
    }
}

//! Requester identity resolution.
//!
//! A resolver turns the headers of an inbound request into the identity of
//! the caller. Resolvers are pure: no caching, no request mutation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, request::Parts, HeaderName};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelfwise_kernel::settings::{AuthMode, AuthSettings};

const MAX_REQUESTER_LEN: usize = 128;

/// Why a requester could not be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing requester credentials")]
    Missing,

    #[error("malformed requester credentials: {0}")]
    Malformed(&'static str),

    #[error("unknown access token")]
    UnknownToken,
}

/// Opaque identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequesterId(String);

impl RequesterId {
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::Missing);
        }
        if trimmed.len() > MAX_REQUESTER_LEN {
            return Err(AuthError::Malformed("requester id too long"));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(AuthError::Malformed("requester id contains control characters"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the requester of a request from its head.
pub trait RequesterResolver: Send + Sync {
    fn resolve(&self, parts: &Parts) -> Result<RequesterId, AuthError>;
}

pub type SharedResolver = Arc<dyn RequesterResolver>;

/// Trusts an identity header injected by an upstream gateway.
pub struct HeaderResolver {
    header: HeaderName,
}

impl HeaderResolver {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl RequesterResolver for HeaderResolver {
    fn resolve(&self, parts: &Parts) -> Result<RequesterId, AuthError> {
        let value = parts.headers.get(&self.header).ok_or(AuthError::Missing)?;
        let value = value
            .to_str()
            .map_err(|_| AuthError::Malformed("requester header is not visible ASCII"))?;
        RequesterId::parse(value)
    }
}

/// Maps `Authorization: Bearer <token>` onto a static token table.
pub struct BearerTokenResolver {
    tokens: HashMap<String, RequesterId>,
}

impl BearerTokenResolver {
    pub fn new(tokens: HashMap<String, RequesterId>) -> Self {
        Self { tokens }
    }
}

impl RequesterResolver for BearerTokenResolver {
    fn resolve(&self, parts: &Parts) -> Result<RequesterId, AuthError> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::Missing)?
            .to_str()
            .map_err(|_| AuthError::Malformed("authorization header is not visible ASCII"))?;

        // The scheme name is case-insensitive.
        let token = value
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::Malformed("expected a bearer token"))?;

        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::UnknownToken)
    }
}

/// Build the resolver selected by `auth.mode`.
pub fn from_settings(settings: &AuthSettings) -> anyhow::Result<SharedResolver> {
    match settings.mode {
        AuthMode::Header => {
            let header = HeaderName::try_from(settings.header.as_str())
                .with_context(|| format!("invalid auth.header '{}'", settings.header))?;
            tracing::info!(target: "shelfwise-authz", header = %header, "using header requester resolver");
            Ok(Arc::new(HeaderResolver::new(header)))
        }
        AuthMode::Token => {
            let mut tokens = HashMap::with_capacity(settings.tokens.len());
            for (token, requester) in &settings.tokens {
                let requester = RequesterId::parse(requester)
                    .with_context(|| format!("invalid requester id for token entry '{}'", requester))?;
                tokens.insert(token.clone(), requester);
            }
            tracing::info!(target: "shelfwise-authz", tokens = tokens.len(), "using bearer token requester resolver");
            Ok(Arc::new(BearerTokenResolver::new(tokens)))
        }
    }
}

//! Core identifier types used across the Gatehouse subsystem
//!
//! This module provides the fundamental identifier types for invites and
//! principals. A principal is a fully-qualified identity of the form
//! `@localpart:realm`, analogous to an email address with a domain.

use crate::errors::GatehouseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Invite identifier
///
/// Opaque, unique, generated at creation. The same id identifies the same
/// record across the local and remote stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteId(String);

impl InviteId {
    /// Generate a new random invite id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing id string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<InviteId> for String {
    fn from(id: InviteId) -> Self {
        id.0
    }
}

/// Fully-qualified principal identifier of the form `@localpart:realm`
///
/// Parsing splits at the first `:` after the leading `@`; both parts must
/// be non-empty. The realm part names the home server the identity belongs
/// to. Principal comparison in invite lookups is case-insensitive, which
/// [`UserId::eq_ignore_case`] implements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Parse a principal identifier, validating its shape
    pub fn parse(raw: impl Into<String>) -> Result<Self, GatehouseError> {
        let raw = raw.into();
        let rest = raw
            .strip_prefix('@')
            .ok_or_else(|| GatehouseError::invalid(format!("principal missing '@': {raw}")))?;
        let well_formed = matches!(
            rest.split_once(':'),
            Some((localpart, realm)) if !localpart.is_empty() && !realm.is_empty()
        );
        if well_formed {
            Ok(Self(raw))
        } else {
            Err(GatehouseError::invalid(format!(
                "principal missing realm: {raw}"
            )))
        }
    }

    /// The part before the `:`, without the leading `@`
    pub fn localpart(&self) -> &str {
        // Shape was validated at construction.
        self.0[1..].split(':').next().unwrap_or_default()
    }

    /// The realm (home server) part after the first `:`
    pub fn realm(&self) -> &str {
        self.0[1..].split_once(':').map(|(_, r)| r).unwrap_or_default()
    }

    /// Borrow the full identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive identity comparison
    pub fn eq_ignore_case(&self, other: &UserId) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = GatehouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = GatehouseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_principal() {
        let id = UserId::parse("@alice:chat.example.com").unwrap();
        assert_eq!(id.localpart(), "alice");
        assert_eq!(id.realm(), "chat.example.com");
        assert_eq!(id.to_string(), "@alice:chat.example.com");
    }

    #[test]
    fn realm_keeps_port_and_extra_colons() {
        let id = UserId::parse("@bob:example.com:8448").unwrap();
        assert_eq!(id.localpart(), "bob");
        assert_eq!(id.realm(), "example.com:8448");
    }

    #[test]
    fn rejects_malformed_principals() {
        assert!(UserId::parse("alice:chat.example.com").is_err());
        assert!(UserId::parse("@alice").is_err());
        assert!(UserId::parse("@:chat.example.com").is_err());
        assert!(UserId::parse("@alice:").is_err());
        assert!(UserId::parse("").is_err());
    }

    #[test]
    fn case_insensitive_comparison() {
        let a = UserId::parse("@Bob:Evil.org").unwrap();
        let b = UserId::parse("@bob:evil.org").unwrap();
        assert!(a.eq_ignore_case(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn invite_id_round_trips_through_serde() {
        let id = InviteId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: InviteId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}

//! Gatehouse Core
//!
//! Core types for the access-gatekeeping and invite-lifecycle subsystem
//! of a self-hosted chat deployment.
//!
//! # Architecture
//!
//! This crate provides the foundation layer:
//! - `errors` - Unified error type for all Gatehouse operations
//! - `identifiers` - Principal (`@localpart:realm`) and invite identifiers
//! - `invite` - The invitation entity and its validity predicate
//! - `config` - Process-wide access-control configuration
//! - `time` - Injectable wall-clock abstraction
//!
//! # Design Principles
//!
//! - Allow/deny verdicts are values, never errors
//! - Configuration is read once at startup and threaded explicitly
//! - Time is injected so expiry logic is testable

#![forbid(unsafe_code)]

/// Unified error type
pub mod errors;

/// Principal and invite identifiers
pub mod identifiers;

/// Invitation entity
pub mod invite;

/// Access-control configuration
pub mod config;

/// Injectable wall clock
pub mod time;

pub use config::AccessControlConfig;
pub use errors::{GatehouseError, Result};
pub use identifiers::{InviteId, UserId};
pub use invite::{Invite, NewInvite};
pub use time::{system_clock, Clock, FixedClock, SharedClock, SystemClock};

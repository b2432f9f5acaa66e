//! # friendcrm-store
//!
//! Local storage for Friend CRM, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection`, provides typed CRUD helpers for friends and
//! interactions, and implements [`friendcrm_shared::store::FriendStore`] so the
//! core services can run on top of it. Multi-row writes go through a single
//! SQLite transaction.

pub mod backend;
pub mod database;
pub mod friends;
pub mod interactions;
pub mod migrations;

mod convert;
mod error;

pub use database::Database;
pub use error::StoreError;
pub use friendcrm_shared::models::*;

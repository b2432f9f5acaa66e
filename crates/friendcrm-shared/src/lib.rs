//! # friendcrm-shared
//!
//! Domain core of Friend CRM: the overdue policy, interaction aggregation,
//! roster assembly and the two mutating operations (friend registration and
//! interaction logging), written against the [`store::FriendStore`] trait so
//! that any storage backend can be plugged in.

pub mod aggregate;
pub mod clock;
pub mod constants;
pub mod display;
pub mod error;
mod journal;
pub mod models;
pub mod overdue;
mod registrar;
mod roster;
pub mod service;
pub mod store;
pub mod types;
pub mod validate;

#[cfg(test)]
mod testing;

pub use error::CoreError;
pub use models::*;
pub use service::{FriendService, Tenancy};

//! The request-scoped service that runs the core operations.
//!
//! A [`FriendService`] borrows a store handle and a clock for the duration of
//! one request. The operations themselves live next to the rule they enforce:
//! `roster.rs` (get_friends), `registrar.rs` (add_friend) and `journal.rs`
//! (log_interaction).

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::store::FriendStore;
use crate::types::PrincipalId;

/// Whether friends are partitioned per principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tenancy {
    /// One implicit owner; principals are ignored.
    Single,
    /// Every operation requires a principal and only sees its own friends.
    #[default]
    Multi,
}

pub struct FriendService<'a, S: ?Sized, C: ?Sized> {
    pub(crate) store: &'a S,
    pub(crate) clock: &'a C,
    tenancy: Tenancy,
}

impl<'a, S, C> FriendService<'a, S, C>
where
    S: FriendStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(store: &'a S, clock: &'a C, tenancy: Tenancy) -> Self {
        Self {
            store,
            clock,
            tenancy,
        }
    }

    pub fn tenancy(&self) -> Tenancy {
        self.tenancy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Resolve the owner scope of an operation.
    ///
    /// Returns `Some(owner)` in multi-tenant mode and `None` (no scoping) in
    /// single-tenant mode.
    pub(crate) fn scope(&self, principal: Option<&PrincipalId>) -> Result<Option<PrincipalId>> {
        match self.tenancy {
            Tenancy::Single => Ok(None),
            Tenancy::Multi => principal
                .filter(|p| !p.as_str().trim().is_empty())
                .cloned()
                .map(Some)
                .ok_or(CoreError::Unauthorized),
        }
    }
}

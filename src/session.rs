//! Sessions
//!
//! Cart, voucher and checkout operations are always scoped to a user. The
//! session is passed explicitly to every such operation rather than read from
//! ambient process state, so two sessions can coexist in one process and
//! tests can act as any user.

use crate::uuids::TypedUuid;

/// Marker for user identifiers.
#[derive(Debug, Clone, Copy)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// An authenticated storefront session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The authenticated user this session acts for.
    pub user: UserUuid,
}

impl Session {
    /// Creates a session for the given user.
    #[must_use]
    pub const fn new(user: UserUuid) -> Self {
        Self { user }
    }
}

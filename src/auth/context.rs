//! User context for request-scoped identity.

use serde::{Deserialize, Serialize};

use crate::auth::token::Claims;
use crate::types::{UserId, Username};

/// Caller identity extracted from a verified session token.
///
/// Handlers that receive this value can trust it: it only exists after the
/// token signature and expiry were checked. It is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Database ID of the authenticated user
    user_id: UserId,
    /// Username carried in the token
    username: Username,
}

impl UserContext {
    /// Create a new user context.
    pub fn new(user_id: UserId, username: Username) -> Self {
        Self { user_id, username }
    }

    /// Get the authenticated user ID.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Get the authenticated username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Check whether this user authored a resource.
    pub fn owns(&self, author_id: UserId) -> bool {
        self.user_id == author_id
    }
}

impl From<Claims> for UserContext {
    fn from(claims: Claims) -> Self {
        Self::new(claims.user_id, claims.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_context_new() {
        let ctx = UserContext::new(UserId::new(3), Username::new("alice"));

        assert_eq!(ctx.user_id(), UserId::new(3));
        assert_eq!(ctx.username().as_str(), "alice");
    }

    #[test]
    fn test_user_context_from_claims() {
        let claims = Claims {
            user_id: UserId::new(9),
            username: Username::new("bob"),
            exp: 0,
        };
        let ctx = UserContext::from(claims);

        assert_eq!(ctx.user_id(), UserId::new(9));
        assert_eq!(ctx.username().as_str(), "bob");
    }

    #[test]
    fn test_owns() {
        let ctx = UserContext::new(UserId::new(1), Username::new("alice"));
        assert!(ctx.owns(UserId::new(1)));
        assert!(!ctx.owns(UserId::new(2)));
    }
}

use std::fmt;

use crate::auth::UserContext;
use crate::db::PostOwner;

/// Why a caller may not mutate a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipError {
    /// No post with the requested ID exists
    NotFound,
    /// The post belongs to someone else
    Forbidden,
}

impl fmt::Display for OwnershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Post not found"),
            Self::Forbidden => write!(f, "Post belongs to another user"),
        }
    }
}

impl std::error::Error for OwnershipError {}

/// Decide whether `user` may mutate the post described by `owner`.
///
/// Must run before any mutating statement is issued for the post.
pub fn check_owner(owner: Option<PostOwner>, user: &UserContext) -> Result<PostOwner, OwnershipError> {
    let owner = owner.ok_or(OwnershipError::NotFound)?;
    if !user.owns(owner.author_id) {
        return Err(OwnershipError::Forbidden);
    }
    Ok(owner)
}

//! Posts: storage and the author-only mutation rule.

mod ownership;
mod store;

pub use ownership::{OwnershipError, check_owner};
pub use store::PostStore;

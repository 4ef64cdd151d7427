//! Authentication and user context module.
//!
//! This module turns credentials into identities and identities into
//! request-scoped [`UserContext`] values:
//!
//! - **Passwords**: bcrypt secret-equivalents via [`CredentialManager`]
//! - **Session tokens**: HS256 JWTs minted and verified by [`SessionTokenService`]
//! - **Users**: persisted accounts in [`UserStore`]
//!
//! ## Security Model
//!
//! - Identity on protected routes comes from the token alone; no storage
//!   lookup happens before the handler runs
//! - The signing secret is fixed for the life of the process
//! - Unknown usernames and wrong passwords are indistinguishable to callers
//!
//! ## Usage
//!
//! ```ignore
//! // Any handler taking a UserContext is protected
//! async fn list_mine(user: UserContext, State(state): State<AppState>) -> ... {
//!     state.posts.list_by_author(user.user_id()).await
//! }
//! ```

mod context;
mod extractor;
mod password;
mod token;
mod user_store;

pub use context::UserContext;
pub use extractor::{AuthExtractor, ExtractError, strip_bearer};
pub use password::{
    CredentialManager, DEFAULT_PASSWORD_COST, HashingError, MAX_PASSWORD_COST, MIN_PASSWORD_COST,
};
pub use token::{AuthError, Claims, DEFAULT_TOKEN_TTL_HOURS, SessionTokenService, TokenConfig};
pub use user_store::UserStore;

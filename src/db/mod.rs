pub mod connection;
pub mod error;
pub mod schema;

pub use connection::*;
pub use error::StoreError;
pub use schema::*;

pub mod gotrue;
pub mod identity;
pub mod jwks;
pub mod jwt;
pub mod middleware;

pub use identity::{Identity, Role};

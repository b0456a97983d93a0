//! Authentication module for todo-server
//!
//! Password digests, registration and login, signed identity tokens and the
//! middleware that guards protected routes.

pub mod handlers;
pub mod middleware;
pub mod password;
mod service;
pub mod token;

pub use middleware::{AuthenticatedUser, RequireAuth};
pub use service::AuthService;
pub use token::{Claims, JwtIssuer, SessionIssuer};

//! Owner-scoped todo endpoints. Every handler receives the caller's
//! identity from [`crate::auth::RequireAuth`] and passes it to the store.

pub mod handlers;

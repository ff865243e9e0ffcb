//! Admin session gate
//!
//! Sign-in issues a signed token naming a server-side session. The token
//! travels in the `dossier_session` cookie or an `Authorization: Bearer`
//! header; the middleware resolves it to an [`AdminContext`].

pub mod middleware;
pub mod models;
pub mod token;

pub use middleware::{auth_middleware, page_gate_middleware, AuthState};
pub use models::AdminContext;
pub use token::{SessionClaims, SessionTokens};

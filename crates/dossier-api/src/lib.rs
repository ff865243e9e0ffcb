//! Dossier API Library
//!
//! HTTP handlers, auth gate and application setup for the admin console.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;

pub mod auth;
pub mod error;
pub mod state;

pub use error::ErrorResponse;

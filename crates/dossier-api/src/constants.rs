//! API constants

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Current API version
pub const API_VERSION: &str = "v1";

/// Versioned prefix every JSON route is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// Cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "dossier_session";

/// Page the gate sends unauthenticated visitors to
pub const LOGIN_PAGE: &str = "/login";

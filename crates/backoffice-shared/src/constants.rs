//! Application-wide constants

/// Role name required by the administrative mutation gate.
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 900;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

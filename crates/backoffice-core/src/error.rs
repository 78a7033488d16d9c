//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("Role not found")]
    RoleNotFound,

    #[error("Menu not found")]
    MenuNotFound,

    #[error("Area not found")]
    AreaNotFound,

    #[error("Permission not found")]
    PermissionNotFound,

    #[error("Role assignment not found")]
    RoleAssignmentNotFound,

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Role name already exists: {0}")]
    RoleNameAlreadyExists(String),

    #[error("Area name already exists: {0}")]
    AreaNameAlreadyExists(String),

    #[error("Already in the requested state: {0}")]
    AlreadyInState(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not active")]
    UserNotActive,

    #[error("Access denied")]
    AccessDenied,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

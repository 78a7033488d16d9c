//! # Backoffice Infrastructure
//!
//! PostgreSQL implementations of the core repository ports.

pub mod database;

pub use database::{
    create_pool, PgAreaRepository, PgMenuRepository, PgPermissionRepository, PgRoleRepository,
    PgUserRepository,
};

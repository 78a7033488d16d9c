//! # Backoffice Core
//!
//! Domain entities, repository traits, and services for the backoffice
//! access-control system: users, roles, areas, hierarchical menus, and
//! per-(role, menu) capabilities.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use error::DomainError;

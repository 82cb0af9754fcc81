//! `brewup-app`
//!
//! **Responsibility:** wire the catalog to storage for a front end.
//!
//! This crate provides:
//! - configuration from the environment
//! - application services the UI (or the `brewup` CLI) calls for every
//!   user action: shelves, create, edit, favorite, share, open link, delete
//!
//! The front end is a **thin shell** around [`services::CatalogService`].

pub mod config;
pub mod services;

pub use config::AppConfig;
pub use services::{CatalogService, ServiceError};

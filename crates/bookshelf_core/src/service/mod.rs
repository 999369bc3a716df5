//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the web-request layer decoupled from storage details.

pub mod catalog_service;

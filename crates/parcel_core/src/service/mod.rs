//! Core use-case services.
//!
//! # Responsibility
//! - Wrap repository calls into caller-facing entry points.
//! - Keep CLI code decoupled from storage details.

pub mod parcel_service;

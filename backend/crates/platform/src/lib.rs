//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management
//! - Media storage upload client

pub mod cookie;
pub mod media;
pub mod password;

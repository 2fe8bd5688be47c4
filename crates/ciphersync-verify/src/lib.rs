//! # ciphersync-verify
//!
//! Reply verification for CipherSync.
//!
//! This crate provides [`engine::SchemaVerifier`], which implements the
//! [`ciphersync_core::traits::ReplyVerifier`] trait. It validates model
//! replies in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic**: rules (`RequiredField`, `AllowedValues`,
//!    `NumericRange`) evaluated against the reply.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ciphersync_contracts::schemas::code_audit_schema;
//! use ciphersync_verify::engine::SchemaVerifier;
//!
//! let report = SchemaVerifier::new().verify(&reply, &code_audit_schema())?;
//! ```

pub mod engine;

pub use engine::SchemaVerifier;

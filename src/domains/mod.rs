//! Domains module containing the business logic.
//!
//! The only domain is `tools`: the registry of schema-described tools and
//! everything needed to validate and dispatch calls to them.

pub mod tools;

//! Absorber Common Library
//!
//! This crate provides the shared endpoint vocabulary, configuration
//! loading and the PLC transport contract for all absorber workspace crates.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Shared constants
//! - [`endpoint`] - Endpoint options, targets, samples and errors
//! - [`transport`] - The `PlcTransport` trait implemented by drivers
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use absorber_common::prelude::*;
//!
//! let option: EndpointOption = "PlcAttrName_InsertAttribute".parse().unwrap();
//! assert_eq!(option, EndpointOption::Insert);
//! assert_eq!(option.access(), AccessMode::ReadWrite);
//! ```

pub mod config;
pub mod consts;
pub mod endpoint;
pub mod prelude;
pub mod transport;

//! # dg-core
//!
//! Core types and utilities for Datagrid RS.
//!
//! This crate provides the building blocks shared by the other crates:
//! - Error types for data sources and the grid controller
//! - Offset/limit pagination and page window math
//! - Grid configuration

pub mod error;
pub mod pagination;
pub mod config;

pub use error::*;
pub use pagination::*;

//! # harness-core
//!
//! Core crate for the worker harness. Contains the unified error system
//! and the configuration schemas shared by the hook registry, the hook
//! plugins and the worker binary.
//!
//! This crate has **no** internal dependencies on other harness crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;

//! # chessrate common library
//!
//! Shared code for the chessrate tools:
//! - Configuration loading (TOML + compiled defaults)
//! - Remembered input between runs
//! - Error types

pub mod config;
pub mod error;
pub mod input_store;

pub use error::{Error, Result};
pub use input_store::{InputStore, LastInput};

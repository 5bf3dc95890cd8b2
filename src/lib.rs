//! curlbind Library
//!
//! Exposes libcurl's easy and multi handle APIs to an embedding scripting
//! language. Native handles become reference-counted host objects, option
//! sets are dispatched through a typed allow-list, and native callbacks are
//! bridged to interpreted callables.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`host`] - Host value model and argument popping
//! - [`constants`] - Option/info/error identifier table
//! - [`easy`] - Easy handle wrapper, option dispatch, callback trampolines
//! - [`multi`] - Multi handle wrapper and drive loop
//! - [`module`] - Intrinsic table and module registration
//! - [`error`] - Error types shared by every operation
//!
//! The binding is single-threaded: handles are `!Send` and the only
//! cross-thread object is the [`InterruptFlag`].

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod easy;
pub mod error;
pub mod host;
pub mod module;
pub mod multi;
mod native;

// Re-export commonly used types
pub use easy::EasyHandle;
pub use error::{BindingError, ErrorKind};
pub use host::{Args, HostError, HostFn, OutRef, Value};
pub use module::{CurlModule, INTRINSICS, InterruptFlag, Intrinsic};
pub use multi::MultiHandle;
pub use native::{EscapeApi, StringList, escape_api};

//! Host interpreter value model.
//!
//! The binding never talks to a concrete interpreter. Embedders adapt their
//! runtime to [`Value`] and [`HostFn`]; intrinsics receive their arguments as
//! a slice of values and pop them through [`Args`].

mod args;
mod value;

pub use args::Args;
pub use value::{EASY_TYPE_NAME, HostError, HostFn, MULTI_TYPE_NAME, OutRef, Value};

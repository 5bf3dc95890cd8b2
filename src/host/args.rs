//! Argument popping for intrinsic calls.

use crate::easy::EasyHandle;
use crate::error::BindingError;
use crate::multi::MultiHandle;

use super::value::{OutRef, Value};

/// Positional arguments of one intrinsic call, consumed front to back.
#[derive(Debug)]
pub struct Args<'a> {
    usage: &'static str,
    values: &'a [Value],
    pos: usize,
}

impl<'a> Args<'a> {
    /// Wraps the arguments of a call whose usage line is `usage`.
    #[must_use]
    pub fn new(usage: &'static str, values: &'a [Value]) -> Self {
        Self {
            usage,
            values,
            pos: 0,
        }
    }

    /// Number of arguments not yet popped.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len() - self.pos
    }

    /// Arguments not yet popped, without consuming them.
    #[must_use]
    pub fn rest(&self) -> &'a [Value] {
        &self.values[self.pos..]
    }

    /// Fails unless the total argument count lies in `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns a usage error carrying the usage line.
    pub fn expect_count(&self, min: usize, max: usize) -> Result<(), BindingError> {
        let n = self.values.len();
        if n < min || n > max {
            return Err(self.usage_error());
        }
        Ok(())
    }

    /// Pops the next argument of any type.
    ///
    /// # Errors
    ///
    /// Returns a usage error when no argument is left.
    pub fn pop(&mut self) -> Result<&'a Value, BindingError> {
        let value = self.values.get(self.pos).ok_or_else(|| self.usage_error())?;
        self.pos += 1;
        Ok(value)
    }

    /// Pops an integer.
    ///
    /// # Errors
    ///
    /// Returns a usage error when the argument is missing or not an integer.
    pub fn pop_int(&mut self) -> Result<i64, BindingError> {
        let value = self.pop()?;
        value
            .as_int()
            .ok_or_else(|| self.type_error("Integer_Type", value))
    }

    /// Pops a number, accepting integers as well as doubles.
    ///
    /// # Errors
    ///
    /// Returns a usage error when the argument is missing or not numeric.
    pub fn pop_float(&mut self) -> Result<f64, BindingError> {
        let value = self.pop()?;
        value
            .as_float()
            .ok_or_else(|| self.type_error("Double_Type", value))
    }

    /// Pops a (non-binary) string.
    ///
    /// # Errors
    ///
    /// Returns a usage error when the argument is missing or not a string.
    pub fn pop_str(&mut self) -> Result<&'a str, BindingError> {
        let value = self.pop()?;
        value
            .as_str()
            .ok_or_else(|| self.type_error("String_Type", value))
    }

    /// Pops a string or binary string as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns a usage error when the argument is missing or not string-like.
    pub fn pop_bytes(&mut self) -> Result<&'a [u8], BindingError> {
        let value = self.pop()?;
        value
            .as_bytes()
            .ok_or_else(|| self.type_error("BString_Type", value))
    }

    /// Pops an easy handle.
    ///
    /// # Errors
    ///
    /// Returns a usage error when the argument is missing or not an easy handle.
    pub fn pop_easy(&mut self) -> Result<&'a EasyHandle, BindingError> {
        let value = self.pop()?;
        value
            .as_easy()
            .ok_or_else(|| self.type_error(super::EASY_TYPE_NAME, value))
    }

    /// Pops a multi handle.
    ///
    /// # Errors
    ///
    /// Returns a usage error when the argument is missing or not a multi handle.
    pub fn pop_multi(&mut self) -> Result<&'a MultiHandle, BindingError> {
        let value = self.pop()?;
        value
            .as_multi()
            .ok_or_else(|| self.type_error(super::MULTI_TYPE_NAME, value))
    }

    /// Pops a reference if one is left.
    ///
    /// # Errors
    ///
    /// Returns a usage error when the remaining argument is not a reference.
    pub fn pop_optional_ref(&mut self) -> Result<Option<&'a OutRef>, BindingError> {
        if self.remaining() == 0 {
            return Ok(None);
        }
        match self.pop()? {
            Value::Ref(r) => Ok(Some(r)),
            other => Err(self.type_error("Reference_Type", other)),
        }
    }

    /// Fails if any argument was left unconsumed.
    ///
    /// # Errors
    ///
    /// Returns a usage error on surplus arguments.
    pub fn finish(&self) -> Result<(), BindingError> {
        if self.remaining() != 0 {
            return Err(self.usage_error());
        }
        Ok(())
    }

    fn usage_error(&self) -> BindingError {
        BindingError::usage(format!("Usage: {}", self.usage))
    }

    fn type_error(&self, expected: &str, got: &Value) -> BindingError {
        BindingError::usage(format!(
            "argument {} of {}: expected {expected}, got {}",
            self.pos,
            self.usage,
            got.type_name()
        ))
    }
}

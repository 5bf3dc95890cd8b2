//! Trampolines from native callbacks into interpreted callables.

use std::io::{self, Read, Write};
use std::rc::Weak;

use curl::easy::{Handler, ReadError, WriteError};
use tracing::warn;

use crate::host::{HostFn, Value};

use super::{EasyHandle, EasyShared};

/// Which native callback slot a callable is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Write,
    Read,
    Header,
    Progress,
}

/// An interpreted callable together with its opaque user data.
#[derive(Debug, Clone)]
pub struct CallbackPair {
    pub func: HostFn,
    pub data: Value,
}

/// Handler installed in every native easy handle.
///
/// Empty slots reproduce the library defaults: the body goes to standard
/// output, uploads read standard input, headers are discarded and progress
/// never aborts.
#[derive(Debug, Default)]
pub struct Trampolines {
    pub(super) owner: Weak<EasyShared>,
    write: Option<CallbackPair>,
    read: Option<CallbackPair>,
    header: Option<CallbackPair>,
    progress: Option<CallbackPair>,
}

impl Trampolines {
    /// Installs `pair` in the slot for `kind`, returning the replaced pair.
    pub fn set(&mut self, kind: CallbackKind, pair: CallbackPair) -> Option<CallbackPair> {
        let slot = match kind {
            CallbackKind::Write => &mut self.write,
            CallbackKind::Read => &mut self.read,
            CallbackKind::Header => &mut self.header,
            CallbackKind::Progress => &mut self.progress,
        };
        slot.replace(pair)
    }

    fn owner(&self) -> Option<EasyHandle> {
        self.owner.upgrade().map(EasyHandle)
    }
}

/// Runs a byte-sink callable; `true` means every byte was consumed.
///
/// An exception, a non-integer result or `-1` signals failure.
fn deliver(kind: &str, pair: &CallbackPair, data: &[u8]) -> bool {
    match pair.func.call(&[pair.data.clone(), Value::Bytes(data.to_vec())]) {
        Ok(Value::Int(-1)) => false,
        Ok(Value::Int(_)) => true,
        Ok(other) => {
            warn!(
                callback = kind,
                returned = other.type_name(),
                "callback must return an integer status, aborting transfer"
            );
            false
        }
        Err(error) => {
            warn!(callback = kind, %error, "callback failed, aborting transfer");
            false
        }
    }
}

impl Handler for Trampolines {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        let Some(pair) = &self.write else {
            // Stdout failures end the transfer with a write error.
            return Ok(io::stdout()
                .write_all(data)
                .map_or(0, |()| data.len()));
        };
        if deliver("write", pair, data) {
            Ok(data.len())
        } else {
            Ok(0)
        }
    }

    fn header(&mut self, data: &[u8]) -> bool {
        match &self.header {
            Some(pair) => deliver("header", pair, data),
            None => true,
        }
    }

    fn progress(&mut self, dltotal: f64, dlnow: f64, ultotal: f64, ulnow: f64) -> bool {
        let Some(pair) = &self.progress else {
            return true;
        };
        let args = [
            pair.data.clone(),
            Value::Float(dltotal),
            Value::Float(dlnow),
            Value::Float(ultotal),
            Value::Float(ulnow),
        ];
        match pair.func.call(&args) {
            Ok(Value::Int(0)) => true,
            Ok(_) => false,
            Err(error) => {
                warn!(callback = "progress", %error, "callback failed, aborting transfer");
                false
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        let Some(pair) = &self.read else {
            return io::stdin().read(buf).map_err(|_| ReadError::Abort);
        };
        // Without user data the handle itself is passed.
        let context = if pair.data.is_null() {
            self.owner().map_or(Value::Null, Value::Easy)
        } else {
            pair.data.clone()
        };
        let requested = i64::try_from(buf.len()).unwrap_or(i64::MAX);
        let chunk = match pair.func.call(&[context, Value::Int(requested)]) {
            Ok(Value::Null) => return Err(ReadError::Abort),
            Ok(value) => match value.as_bytes() {
                Some(bytes) => bytes.to_vec(),
                None => {
                    warn!(
                        callback = "read",
                        returned = value.type_name(),
                        "callback must return a string or null, aborting transfer"
                    );
                    return Err(ReadError::Abort);
                }
            },
            Err(error) => {
                warn!(callback = "read", %error, "callback failed, aborting transfer");
                return Err(ReadError::Abort);
            }
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }
}

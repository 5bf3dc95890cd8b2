//! Easy handle wrapper.
//!
//! An [`EasyHandle`] owns one native transfer handle plus everything the
//! handle points at: retained option strings, native string lists and the
//! registered callables. Clones share the same handle.
//!
//! # Lifecycle
//!
//! - [`EasyHandle::new`] allocates and applies the defaults (URL, verbose
//!   off, progress suppressed, private token).
//! - [`EasyHandle::setopt`] dispatches through the option table.
//! - [`EasyHandle::perform`] runs a blocking transfer.
//! - [`EasyHandle::close`] releases the native handle; the wrapper itself
//!   lives on until the last clone is dropped.
//!
//! While a transfer runs, any configuration, perform or close request made
//! from inside a callback fails with [`BindingError::Running`].

mod callbacks;
mod info;
mod options;

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::ffi::c_long;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, instrument};

use crate::constants::opt;
use crate::error::BindingError;
use crate::host::{EASY_TYPE_NAME, Value};
use crate::multi::{MultiHandle, MultiShared};
use crate::native::{NativeEasy, NativeMulti, StringList};

pub use callbacks::{CallbackKind, CallbackPair, Trampolines};
pub use info::{InfoKind, classify as classify_info};
pub use options::{OptionKind, classify as classify_option};

/// Flag bit set for the duration of a transfer.
pub(crate) const PERFORM_RUNNING: u32 = 0x1;

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Sets [`PERFORM_RUNNING`] on a flag cell until dropped.
pub(crate) struct RunningGuard<'a>(&'a Cell<u32>);

impl<'a> RunningGuard<'a> {
    pub(crate) fn new(flags: &'a Cell<u32>) -> Self {
        flags.set(flags.get() | PERFORM_RUNNING);
        Self(flags)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() & !PERFORM_RUNNING);
    }
}

fn closed() -> BindingError {
    BindingError::Closed {
        type_name: EASY_TYPE_NAME,
    }
}

pub(crate) struct EasyShared {
    id: usize,
    flags: Cell<u32>,
    state: RefCell<EasyState>,
}

struct EasyState {
    native: Option<NativeEasy<Trampolines>>,
    url: String,
    multi: Option<Weak<MultiShared>>,
}

/// Script-visible easy handle (`Curl_Type`).
#[derive(Clone)]
pub struct EasyHandle(pub(crate) Rc<EasyShared>);

impl EasyHandle {
    /// Creates a handle for `url`.
    ///
    /// Nothing is leaked on failure: a partially configured native handle is
    /// released before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns a runtime error if allocation fails, or the native error if
    /// the URL or one of the defaults is rejected.
    #[instrument(level = "debug", skip_all, fields(url = %url))]
    pub fn new(url: &str) -> Result<Self, BindingError> {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let mut native = NativeEasy::new(Trampolines::default())?;
        native.set_string(opt::URL, url)?;
        native.set_long(opt::VERBOSE, 0)?;
        native.set_long(opt::NOPROGRESS, 1)?;
        native.set_private(id)?;

        let shared = Rc::new_cyclic(|owner| {
            native.handler_mut().owner = owner.clone();
            EasyShared {
                id,
                flags: Cell::new(0),
                state: RefCell::new(EasyState {
                    native: Some(native),
                    url: url.to_string(),
                    multi: None,
                }),
            }
        });
        debug!(easy = id, "easy handle created");
        Ok(Self(shared))
    }

    /// Process-unique token stored in the native private-data slot.
    #[must_use]
    pub fn id(&self) -> usize {
        self.0.id
    }

    /// Whether a transfer involving this handle is in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.0.flags.get() & PERFORM_RUNNING != 0
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0
            .state
            .try_borrow()
            .is_ok_and(|state| state.native.is_none())
    }

    /// The multi handle this handle is attached to, if any.
    #[must_use]
    pub fn multi(&self) -> Option<MultiHandle> {
        let state = self.0.state.try_borrow().ok()?;
        state.multi.as_ref()?.upgrade().map(MultiHandle)
    }

    fn state(&self) -> Result<Ref<'_, EasyState>, BindingError> {
        let state = self.0.state.try_borrow().map_err(|_| BindingError::Running)?;
        if state.native.is_none() {
            return Err(closed());
        }
        Ok(state)
    }

    fn state_mut(&self) -> Result<RefMut<'_, EasyState>, BindingError> {
        if self.is_running() {
            return Err(BindingError::Running);
        }
        let state = self
            .0
            .state
            .try_borrow_mut()
            .map_err(|_| BindingError::Running)?;
        if state.native.is_none() {
            return Err(closed());
        }
        Ok(state)
    }

    fn native(&self) -> Result<Ref<'_, NativeEasy<Trampolines>>, BindingError> {
        Ref::filter_map(self.state()?, |state| state.native.as_ref()).map_err(|_| closed())
    }

    /// Sets an option from host arguments.
    ///
    /// # Errors
    ///
    /// - [`BindingError::Running`] / [`BindingError::Closed`] for an
    ///   unusable handle.
    /// - A usage error for a wrong argument count or type.
    /// - An invalid-parameter error for unsupported options.
    /// - The native error if the library rejects the value.
    #[instrument(level = "debug", skip(self, args), fields(easy = self.id()))]
    pub fn setopt(&self, option: i32, args: &[Value]) -> Result<(), BindingError> {
        let mut guard = self.state_mut()?;
        let state = &mut *guard;
        let native = state.native.as_mut().ok_or_else(closed)?;

        match classify_option(option) {
            OptionKind::Long { default } => {
                let value = match (args, default) {
                    ([], Some(value)) => value,
                    ([Value::Int(v)], _) => c_long::try_from(*v).map_err(|_| {
                        BindingError::invalid_parameter("Integer value out of range for this cURL option")
                    })?,
                    ([other], _) => {
                        return Err(BindingError::usage(format!(
                            "Expecting an integer value for this cURL option, got {}",
                            other.type_name()
                        )));
                    }
                    _ => {
                        return Err(BindingError::usage(
                            "Expecting a single value for this cURL option",
                        ));
                    }
                };
                native.set_long(option, value)?;
            }
            OptionKind::Callback(kind) => {
                let [func, data] = args else {
                    return Err(BindingError::usage("Expecting two arguments for this option"));
                };
                let Value::Function(func) = func else {
                    return Err(BindingError::usage(format!(
                        "Expecting a function for this option, got {}",
                        func.type_name()
                    )));
                };
                if kind == CallbackKind::Progress {
                    native.set_long(opt::NOPROGRESS, 0)?;
                }
                native.handler_mut().set(
                    kind,
                    CallbackPair {
                        func: func.clone(),
                        data: data.clone(),
                    },
                );
            }
            OptionKind::Str => {
                let [Value::Str(value)] = args else {
                    return Err(BindingError::usage("Expecting a single string argument"));
                };
                native.set_string(option, value)?;
                if option == opt::URL {
                    state.url.clone_from(value);
                }
            }
            OptionKind::List => {
                let list = match args {
                    [] => None,
                    [Value::Array(items)] => Some(build_list(items)?),
                    _ => {
                        return Err(BindingError::usage("This option requires an array of strings"));
                    }
                };
                native.set_list(option, list)?;
            }
            OptionKind::Unsupported => {
                return Err(BindingError::invalid_parameter(
                    "cURL option is unknown or unsupported",
                ));
            }
        }
        debug!(option, "option set");
        Ok(())
    }

    /// Runs a blocking transfer.
    ///
    /// # Errors
    ///
    /// Returns the native error with the error buffer as detail; a callback
    /// abort surfaces as code 42 (aborted by callback) or 23 (write error).
    #[instrument(skip(self), fields(easy = self.id()))]
    pub fn perform(&self) -> Result<(), BindingError> {
        if self.is_running() {
            return Err(BindingError::Running);
        }
        let native = self.native()?;
        let _running = RunningGuard::new(&self.0.flags);
        native.perform()
    }

    /// Releases the native handle.
    ///
    /// # Errors
    ///
    /// Fails while running, when already closed, or while still attached to
    /// a multi handle.
    #[instrument(level = "debug", skip(self), fields(easy = self.id()))]
    pub fn close(&self) -> Result<(), BindingError> {
        let mut state = self.state_mut()?;
        if state.multi.is_some() {
            return Err(BindingError::invalid_parameter(
                "The object must first be removed from the Curl_Multi_Type before it can be closed",
            ));
        }
        state.native = None;
        debug!("easy handle closed");
        Ok(())
    }

    /// The last URL successfully set.
    ///
    /// # Errors
    ///
    /// Fails once the handle is closed.
    pub fn url(&self) -> Result<String, BindingError> {
        Ok(self.state()?.url.clone())
    }

    /// Queries transfer information.
    ///
    /// # Errors
    ///
    /// Returns an invalid-parameter error for unsupported identifiers, or
    /// the native error.
    pub fn info(&self, id: i32) -> Result<Value, BindingError> {
        let native = self.native()?;
        let value = match classify_info(id) {
            InfoKind::Str => native.info_string(id)?.map_or(Value::Null, Value::Str),
            InfoKind::Long => Value::Int(native.info_long(id)?),
            InfoKind::Double => Value::Float(native.info_double(id)?),
            InfoKind::List => native.info_list(id)?.map_or(Value::Null, |items| {
                Value::Array(items.into_iter().map(Value::Str).collect())
            }),
            InfoKind::Unsupported => {
                return Err(BindingError::invalid_parameter(
                    "Unknown or unsupported info type",
                ));
            }
        };
        Ok(value)
    }

    /// Percent-encodes `input`.
    ///
    /// # Errors
    ///
    /// Fails once the handle is closed or if the library cannot allocate.
    pub fn escape(&self, input: &[u8]) -> Result<String, BindingError> {
        self.native()?.escape(input)
    }

    /// Decodes percent-escapes.
    ///
    /// Returns a string unless the decoded bytes contain NUL or are not
    /// UTF-8, in which case a binary string is returned.
    ///
    /// # Errors
    ///
    /// Fails once the handle is closed or if the library cannot allocate.
    pub fn unescape(&self, input: &str) -> Result<Value, BindingError> {
        let decoded = self.native()?.unescape(input)?;
        Ok(match String::from_utf8(decoded) {
            Ok(s) if !s.contains('\0') => Value::Str(s),
            Ok(s) => Value::Bytes(s.into_bytes()),
            Err(e) => Value::Bytes(e.into_bytes()),
        })
    }

    pub(crate) fn flags(&self) -> &Cell<u32> {
        &self.0.flags
    }

    /// Puts this handle under `multi`'s management.
    pub(crate) fn attach(
        &self,
        multi: &NativeMulti,
        owner: Weak<MultiShared>,
    ) -> Result<(), BindingError> {
        let mut guard = self.state_mut()?;
        let state = &mut *guard;
        if state.multi.is_some() {
            return Err(BindingError::invalid_parameter(
                "Curl_Type is already attached to a Curl_Multi_Type object",
            ));
        }
        let native = state.native.as_ref().ok_or_else(closed)?;
        // SAFETY: the multi wrapper holds a clone of this handle until it
        // calls `detach`, and `close` refuses while `multi` is set, so the
        // native handle outlives its membership.
        unsafe { multi.add(native)? };
        state.multi = Some(owner);
        Ok(())
    }

    /// Releases this handle from `multi`, clearing the back-reference even
    /// when the native call fails.
    pub(crate) fn detach(&self, multi: &NativeMulti) -> Result<(), BindingError> {
        let mut state = self
            .0
            .state
            .try_borrow_mut()
            .map_err(|_| BindingError::Running)?;
        state.multi = None;
        match &state.native {
            Some(native) => multi.remove(native),
            None => Ok(()),
        }
    }
}

fn build_list(items: &[Value]) -> Result<StringList, BindingError> {
    let mut list = StringList::new();
    for item in items {
        match item {
            Value::Str(s) => list.append(s)?,
            Value::Null => {}
            _ => return Err(BindingError::usage("This option requires an array of strings")),
        }
    }
    Ok(list)
}

impl PartialEq for EasyHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EasyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EasyHandle")
            .field("id", &self.0.id)
            .field("running", &self.is_running())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::info;
    use crate::error::ErrorKind;
    use crate::host::HostFn;

    fn easy() -> EasyHandle {
        EasyHandle::new("http://example.test/").unwrap()
    }

    fn noop() -> Value {
        Value::Function(HostFn::new(|_| Ok(Value::Int(0))))
    }

    #[test]
    fn test_new_retains_url() {
        let e = easy();
        assert_eq!(e.url().unwrap(), "http://example.test/");
        assert!(!e.is_closed());
        assert!(e.multi().is_none());
    }

    #[test]
    fn test_url_read_back_tracks_last_set() {
        let e = easy();
        e.setopt(opt::URL, &[Value::from("http://a.test/")]).unwrap();
        e.setopt(opt::URL, &[Value::from("http://b.test/")]).unwrap();
        assert_eq!(e.url().unwrap(), "http://b.test/");
        e.setopt(opt::URL, &[Value::from("http://b.test/")]).unwrap();
        assert_eq!(e.url().unwrap(), "http://b.test/");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(easy().id(), easy().id());
    }

    #[test]
    fn test_long_option_argument_rules() {
        let e = easy();
        e.setopt(opt::VERBOSE, &[]).unwrap();
        e.setopt(opt::TIMEOUT, &[Value::Int(5)]).unwrap();

        let err = e.setopt(opt::TIMEOUT, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = e
            .setopt(opt::VERBOSE, &[Value::Int(1), Value::Int(2)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = e.setopt(opt::TIMEOUT, &[Value::from("5")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_callback_option_requires_two_arguments() {
        let e = easy();
        let err = e.setopt(opt::WRITEFUNCTION, &[noop()]).unwrap_err();
        assert!(err.to_string().contains("two arguments"));
        e.setopt(opt::WRITEFUNCTION, &[noop(), Value::Null]).unwrap();
        e.setopt(opt::PROGRESSFUNCTION, &[noop(), Value::Int(0)])
            .unwrap();
    }

    #[test]
    fn test_callback_option_requires_function() {
        let e = easy();
        let err = e
            .setopt(opt::HEADERFUNCTION, &[Value::Int(1), Value::Null])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_string_option_rules() {
        let e = easy();
        e.setopt(opt::USERAGENT, &[Value::from("curlbind/test")])
            .unwrap();
        assert!(e.setopt(opt::USERAGENT, &[]).is_err());
        assert!(e.setopt(opt::USERAGENT, &[Value::Int(1)]).is_err());
        assert!(e.setopt(opt::USERAGENT, &[Value::from("a\0b")]).is_err());
    }

    #[test]
    fn test_list_option_rules() {
        let e = easy();
        let headers = Value::Array(vec![Value::from("X-A: 1"), Value::Null, Value::from("X-B: 2")]);
        e.setopt(opt::HTTPHEADER, &[headers]).unwrap();
        e.setopt(opt::HTTPHEADER, &[]).unwrap();
        let err = e
            .setopt(opt::HTTPHEADER, &[Value::from("X-A: 1")])
            .unwrap_err();
        assert!(err.to_string().contains("array of strings"));
        let err = e
            .setopt(opt::QUOTE, &[Value::Array(vec![Value::Int(1)])])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_unsupported_option() {
        let e = easy();
        let err = e.setopt(opt::POSTFIELDSIZE, &[Value::Int(3)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(err.to_string().contains("unknown or unsupported"));
    }

    #[test]
    fn test_close_then_reuse_fails() {
        let e = easy();
        e.close().unwrap();
        assert!(e.is_closed());
        for err in [
            e.close().unwrap_err(),
            e.perform().unwrap_err(),
            e.url().unwrap_err(),
            e.setopt(opt::VERBOSE, &[]).unwrap_err(),
        ] {
            assert!(matches!(err, BindingError::Closed { type_name: "Curl_Type" }), "{err}");
        }
    }

    #[test]
    fn test_running_flag_rejects_mutation() {
        let e = easy();
        let _guard = RunningGuard::new(e.flags());
        assert!(e.is_running());
        assert!(matches!(e.setopt(opt::VERBOSE, &[]), Err(BindingError::Running)));
        assert!(matches!(e.perform(), Err(BindingError::Running)));
        assert!(matches!(e.close(), Err(BindingError::Running)));
        assert!(e.url().is_ok());
    }

    #[test]
    fn test_running_guard_clears_on_drop() {
        let e = easy();
        {
            let _guard = RunningGuard::new(e.flags());
        }
        assert!(!e.is_running());
    }

    #[test]
    fn test_info_before_transfer() {
        let e = easy();
        assert_eq!(e.info(info::RESPONSE_CODE).unwrap(), Value::Int(0));
        let err = e.info(info::PRIVATE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_escape_round_trip_keeps_nul() {
        let e = easy();
        let escaped = e.escape(b"a b\0c").unwrap();
        assert_eq!(escaped, "a%20b%00c");
        assert_eq!(e.unescape(&escaped).unwrap(), Value::Bytes(b"a b\0c".to_vec()));
        assert_eq!(e.unescape("a%20b").unwrap(), Value::from("a b"));
    }
}

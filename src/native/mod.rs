//! Raw calls into the transfer library.
//!
//! The `curl` crate owns handle allocation and the callback plumbing; this
//! module adds what it does not expose: setting and reading options by
//! numeric identifier, retaining the memory those options point at, and
//! managing multi membership without giving up ownership of the easy handle.
//! Every FFI call of the crate lives here.

mod escape;
mod slist;

use std::cell::UnsafeCell;
use std::collections::HashMap;
use std::ffi::{CStr, CString, c_char, c_double, c_int, c_long, c_void};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use curl::easy::{Easy2, Handler};
use curl::multi::Multi;
use curl_sys::{CURL, CURL_ERROR_SIZE, CURLcode, curl_slist};
use tracing::debug;

use crate::constants::{info, opt};
use crate::error::BindingError;

pub use escape::{EscapeApi, escape_api};
pub use slist::StringList;

const OBJECTPOINT: i32 = 10_000;
const NUM_OPT_STRINGS: usize = 1_000;
const CURLMSG_DONE: c_int = 1;

/// Stable error buffer the library writes messages into.
struct ErrorBuffer(Box<UnsafeCell<[c_char; CURL_ERROR_SIZE + 1]>>);

impl ErrorBuffer {
    fn new() -> Self {
        Self(Box::new(UnsafeCell::new([0; CURL_ERROR_SIZE + 1])))
    }

    fn as_ptr(&self) -> *mut c_char {
        self.0.get().cast::<c_char>()
    }

    fn clear(&self) {
        // SAFETY: the buffer is only written by the library during calls on
        // the owning handle, none of which is in flight here.
        unsafe { *self.as_ptr() = 0 };
    }

    fn message(&self) -> String {
        // SAFETY: the buffer is zero-initialised with a spare trailing NUL,
        // so it is always terminated.
        unsafe { CStr::from_ptr(self.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}

fn check(rc: CURLcode) -> Result<(), curl::Error> {
    if rc == curl_sys::CURLE_OK {
        Ok(())
    } else {
        Err(curl::Error::new(rc))
    }
}

/// A native easy handle together with the memory its options point at.
///
/// Field order matters: the handle is released before the strings, lists and
/// error buffer it may still reference.
pub struct NativeEasy<H> {
    handle: Easy2<H>,
    errbuf: ErrorBuffer,
    strings: Vec<Option<CString>>,
    lists: HashMap<i32, StringList>,
}

impl<H: Handler> NativeEasy<H> {
    /// Allocates a handle and points its error buffer at owned storage.
    ///
    /// # Errors
    ///
    /// Returns a runtime error if allocation or the error-buffer set fails.
    pub fn new(handler: H) -> Result<Self, BindingError> {
        let handle = catch_unwind(AssertUnwindSafe(|| Easy2::new(handler)))
            .map_err(|_| BindingError::runtime("curl_easy_init failed"))?;
        let native = Self {
            handle,
            errbuf: ErrorBuffer::new(),
            strings: Vec::new(),
            lists: HashMap::new(),
        };
        // SAFETY: the boxed buffer outlives the handle (field order).
        let rc = unsafe {
            curl_sys::curl_easy_setopt(
                native.handle.raw(),
                opt::ERRORBUFFER as curl_sys::CURLoption,
                native.errbuf.as_ptr(),
            )
        };
        check(rc).map_err(|e| {
            BindingError::runtime(format!("curl_easy_setopt: {}", e.description()))
        })?;
        Ok(native)
    }

    fn fail(&self, error: &curl::Error) -> BindingError {
        BindingError::curl(error, &self.errbuf.message())
    }

    pub fn handler_mut(&mut self) -> &mut H {
        self.handle.get_mut()
    }

    /// Sets an integer-valued option.
    ///
    /// # Errors
    ///
    /// Returns the native error if the library rejects the option.
    pub fn set_long(&self, option: i32, value: c_long) -> Result<(), BindingError> {
        // SAFETY: integer options carry no pointer.
        let rc = unsafe { curl_sys::curl_easy_setopt(self.handle.raw(), option as curl_sys::CURLoption, value) };
        check(rc).map_err(|e| self.fail(&e))
    }

    /// Stores `id` in the handle's private-data slot.
    ///
    /// # Errors
    ///
    /// Returns the native error if the library rejects the option.
    pub fn set_private(&self, id: usize) -> Result<(), BindingError> {
        // SAFETY: the pointer-sized token is never dereferenced by the library.
        let rc = unsafe {
            curl_sys::curl_easy_setopt(self.handle.raw(), opt::PRIVATE as curl_sys::CURLoption, id as *mut c_void)
        };
        check(rc).map_err(|e| self.fail(&e))
    }

    /// Sets a string option, retaining the copy the library points at.
    ///
    /// The previous value for this option is only released once the library
    /// has accepted the new one. Setting the current value again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a usage error for interior NUL bytes, an internal error for
    /// identifiers outside the object-pointer range, or the native error.
    pub fn set_string(&mut self, option: i32, value: &str) -> Result<(), BindingError> {
        let index = usize::try_from(option - OBJECTPOINT)
            .ok()
            .filter(|i| *i < NUM_OPT_STRINGS)
            .ok_or_else(|| {
                BindingError::runtime(format!("Unexpected Curl option value {option}"))
            })?;
        if self.strings.len() <= index {
            self.strings.resize_with(index + 1, || None);
        }
        if self.strings[index]
            .as_ref()
            .is_some_and(|old| old.as_bytes() == value.as_bytes())
        {
            return Ok(());
        }
        let value = CString::new(value)
            .map_err(|_| BindingError::usage("string options may not contain NUL bytes"))?;
        // SAFETY: `value` is moved into `self.strings` below and outlives the
        // handle's use of it.
        let rc = unsafe { curl_sys::curl_easy_setopt(self.handle.raw(), option as curl_sys::CURLoption, value.as_ptr()) };
        check(rc).map_err(|e| self.fail(&e))?;
        self.strings[index] = Some(value);
        Ok(())
    }

    /// Sets a list option, replacing the list previously stored for it.
    ///
    /// `None` clears the option. A rejected list is dropped and the previous
    /// one stays in force.
    ///
    /// # Errors
    ///
    /// Returns the native error if the library rejects the option.
    pub fn set_list(&mut self, option: i32, list: Option<StringList>) -> Result<(), BindingError> {
        let raw = list.as_ref().map_or(ptr::null_mut(), StringList::as_ptr);
        // SAFETY: the list is stored in `self.lists` below and outlives the
        // handle's use of it.
        let rc = unsafe { curl_sys::curl_easy_setopt(self.handle.raw(), option as curl_sys::CURLoption, raw) };
        check(rc).map_err(|e| self.fail(&e))?;
        match list {
            Some(list) => self.lists.insert(option, list),
            None => self.lists.remove(&option),
        };
        Ok(())
    }

    /// Runs a blocking transfer.
    ///
    /// # Errors
    ///
    /// Returns the native error with the error buffer's message as detail.
    pub fn perform(&self) -> Result<(), BindingError> {
        self.errbuf.clear();
        self.handle.perform().map_err(|e| self.fail(&e))
    }

    /// Reads a string-valued info; a null result maps to `None`.
    ///
    /// # Errors
    ///
    /// Returns the native error if the query fails.
    pub fn info_string(&self, id: i32) -> Result<Option<String>, BindingError> {
        let mut out: *const c_char = ptr::null();
        // SAFETY: string infos write a pointer owned by the handle.
        let rc = unsafe { curl_sys::curl_easy_getinfo(self.handle.raw(), id as curl_sys::CURLINFO, &raw mut out) };
        check(rc).map_err(|e| self.fail(&e))?;
        if out.is_null() {
            return Ok(None);
        }
        // SAFETY: non-null results are NUL-terminated and valid until the
        // next call on this handle.
        Ok(Some(unsafe { CStr::from_ptr(out) }.to_string_lossy().into_owned()))
    }

    /// Reads an integer-valued info.
    ///
    /// # Errors
    ///
    /// Returns the native error if the query fails.
    pub fn info_long(&self, id: i32) -> Result<i64, BindingError> {
        let mut out: c_long = 0;
        // SAFETY: integer infos write one `long`.
        let rc = unsafe { curl_sys::curl_easy_getinfo(self.handle.raw(), id as curl_sys::CURLINFO, &raw mut out) };
        check(rc).map_err(|e| self.fail(&e))?;
        Ok(i64::from(out))
    }

    /// Reads a floating-point info.
    ///
    /// # Errors
    ///
    /// Returns the native error if the query fails.
    pub fn info_double(&self, id: i32) -> Result<f64, BindingError> {
        let mut out: c_double = 0.0;
        // SAFETY: double infos write one `double`.
        let rc = unsafe { curl_sys::curl_easy_getinfo(self.handle.raw(), id as curl_sys::CURLINFO, &raw mut out) };
        check(rc).map_err(|e| self.fail(&e))?;
        Ok(out)
    }

    /// Reads a list-valued info; an empty native list maps to `None`.
    ///
    /// # Errors
    ///
    /// Returns the native error if the query fails.
    pub fn info_list(&self, id: i32) -> Result<Option<Vec<String>>, BindingError> {
        let mut out: *mut curl_slist = ptr::null_mut();
        // SAFETY: list infos hand the caller a list it must free.
        let rc = unsafe { curl_sys::curl_easy_getinfo(self.handle.raw(), id as curl_sys::CURLINFO, &raw mut out) };
        check(rc).map_err(|e| self.fail(&e))?;
        // SAFETY: the list was allocated for us and is freed on drop.
        let list = unsafe { StringList::from_raw(out) };
        if list.is_empty() {
            return Ok(None);
        }
        Ok(Some(list.to_vec()))
    }

    /// Percent-encodes `input`.
    ///
    /// # Errors
    ///
    /// Returns a runtime error if the library fails to allocate the result.
    pub fn escape(&self, input: &[u8]) -> Result<String, BindingError> {
        escape::escape(self.handle.raw(), input)
    }

    /// Decodes percent-escapes, preserving embedded NUL bytes.
    ///
    /// # Errors
    ///
    /// Returns a runtime error if the library fails to allocate the result.
    pub fn unescape(&self, input: &str) -> Result<Vec<u8>, BindingError> {
        escape::unescape(self.handle.raw(), input)
    }

    fn raw(&self) -> *mut CURL {
        self.handle.raw()
    }
}

/// A native multi handle.
pub struct NativeMulti {
    handle: Multi,
}

impl NativeMulti {
    /// Allocates a multi handle.
    ///
    /// # Errors
    ///
    /// Returns a native error if allocation fails.
    pub fn new() -> Result<Self, BindingError> {
        let handle = catch_unwind(Multi::new).map_err(|_| BindingError::Multi {
            code: curl_sys::CURLM_OUT_OF_MEMORY,
            description: "curl_multi_init failed".to_string(),
        })?;
        Ok(Self { handle })
    }

    /// Puts an easy handle under this multi handle's management.
    ///
    /// # Safety
    ///
    /// `easy` must be removed with [`remove`](Self::remove) before either
    /// handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns the native multi error.
    pub unsafe fn add<H: Handler>(&self, easy: &NativeEasy<H>) -> Result<(), BindingError> {
        // SAFETY: both handles are live; the caller upholds removal order.
        let rc = unsafe { curl_sys::curl_multi_add_handle(self.handle.raw(), easy.raw()) };
        check_multi(rc)
    }

    /// Releases an easy handle from this multi handle.
    ///
    /// # Errors
    ///
    /// Returns the native multi error.
    pub fn remove<H: Handler>(&self, easy: &NativeEasy<H>) -> Result<(), BindingError> {
        // SAFETY: both handles are live; removing a non-member is reported,
        // not undefined.
        let rc = unsafe { curl_sys::curl_multi_remove_handle(self.handle.raw(), easy.raw()) };
        check_multi(rc)
    }

    /// Blocks until a managed socket is ready or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns the native multi error.
    pub fn wait(&self, timeout: Duration) -> Result<u32, BindingError> {
        self.handle
            .wait(&mut [], timeout)
            .map_err(|e| BindingError::multi(&e))
    }

    /// One non-blocking drive step.
    ///
    /// `Ok(None)` means the library asked to be called again immediately.
    ///
    /// # Errors
    ///
    /// Returns the native multi error.
    pub fn perform(&self) -> Result<Option<u32>, BindingError> {
        match self.handle.perform() {
            Ok(running) => Ok(Some(running)),
            Err(e) if e.is_call_perform() => Ok(None),
            Err(e) => Err(BindingError::multi(&e)),
        }
    }

    /// Drains one completion message, skipping other message kinds.
    ///
    /// Returns the private-data token of the finished handle and its native
    /// result code.
    ///
    /// # Errors
    ///
    /// Returns a native error if the finished handle's token is unreadable.
    pub fn info_read(&self) -> Result<Option<(usize, i32)>, BindingError> {
        loop {
            let mut queued: c_int = 0;
            // SAFETY: the multi handle is live; the message stays valid until
            // the next call on it.
            let msg = unsafe { curl_sys::curl_multi_info_read(self.handle.raw(), &raw mut queued) };
            if msg.is_null() {
                return Ok(None);
            }
            // SAFETY: non-null messages point at a valid `CURLMsg`.
            let (kind, easy, data) = unsafe { ((*msg).msg, (*msg).easy_handle, (*msg).data) };
            if kind != CURLMSG_DONE as curl_sys::CURLMSG {
                continue;
            }
            let mut token: *mut c_char = ptr::null_mut();
            // SAFETY: `easy` is a live member handle of this multi.
            let rc = unsafe { curl_sys::curl_easy_getinfo(easy, info::PRIVATE as curl_sys::CURLINFO, &raw mut token) };
            if let Err(e) = check(rc) {
                return Err(BindingError::curl(&e, "Internal cURL error"));
            }
            // The result code is stored in the pointer-sized data union.
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let code = data as usize as CURLcode;
            return Ok(Some((token as usize, code as i32)));
        }
    }
}

fn check_multi(rc: curl_sys::CURLMcode) -> Result<(), BindingError> {
    if rc == curl_sys::CURLM_OK {
        Ok(())
    } else {
        Err(BindingError::multi(&curl::MultiError::new(rc)))
    }
}

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Process-wide library initialization; repeated calls are no-ops.
///
/// # Errors
///
/// Returns a runtime error if the library fails to initialize.
pub fn global_init(flags: i64) -> Result<(), BindingError> {
    if INITIALIZED.load(Ordering::Acquire) {
        debug!("library already initialized");
        return Ok(());
    }
    let flags = c_long::try_from(flags & crate::constants::global::ALL).unwrap_or(0);
    // SAFETY: global init has no preconditions beyond being single-threaded,
    // which the binding is.
    let rc = unsafe { curl_sys::curl_global_init(flags) };
    if rc != curl_sys::CURLE_OK {
        return Err(BindingError::runtime("curl_global_init failed"));
    }
    INITIALIZED.store(true, Ordering::Release);
    debug!(flags, "library initialized");
    Ok(())
}

/// Undoes [`global_init`] so it may run again.
pub fn global_cleanup() {
    if INITIALIZED.swap(false, Ordering::AcqRel) {
        // SAFETY: paired with a successful `curl_global_init`.
        unsafe { curl_sys::curl_global_cleanup() };
        debug!("library cleaned up");
    }
}

/// Returns the library's message for a native result code.
#[must_use]
pub fn strerror(code: i32) -> String {
    curl::Error::new(code as CURLcode).description().to_string()
}

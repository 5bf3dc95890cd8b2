//! Percent-encoding through the transfer library.
//!
//! Libraries from 7.15.4 on expose handle-bound, length-aware escape calls
//! that round-trip embedded NUL bytes. Older ones only offer the NUL-terminated
//! variants, so the binding falls back to a portable encoder with the same
//! output alphabet.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::sync::OnceLock;

use curl_sys::CURL;
use tracing::debug;

use crate::error::BindingError;

const HANDLE_BOUND_MIN_VERSION: u32 = 0x07_0f_04;

/// Escape API shape offered by the loaded library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeApi {
    /// `curl_easy_escape` / `curl_easy_unescape` with explicit lengths.
    HandleBound,
    /// Portable percent-encoding performed in process.
    Portable,
}

impl EscapeApi {
    /// Picks the API for a given `version_num`.
    #[must_use]
    pub fn for_version(version_num: u32) -> Self {
        if version_num >= HANDLE_BOUND_MIN_VERSION {
            Self::HandleBound
        } else {
            Self::Portable
        }
    }
}

/// Escape API of the running library, resolved once per process.
pub fn escape_api() -> EscapeApi {
    static API: OnceLock<EscapeApi> = OnceLock::new();
    *API.get_or_init(|| {
        let version = curl::Version::get();
        let api = EscapeApi::for_version(version.version_num());
        debug!(version = version.version(), ?api, "resolved escape api");
        api
    })
}

fn length(input: &[u8]) -> Result<c_int, BindingError> {
    c_int::try_from(input.len())
        .map_err(|_| BindingError::invalid_parameter("string too long to escape"))
}

/// Percent-encodes `input`.
///
/// Empty input never reaches the library, which reads a zero length as a
/// request to measure a NUL-terminated string.
pub(super) fn escape(raw: *mut CURL, input: &[u8]) -> Result<String, BindingError> {
    if input.is_empty() {
        return Ok(String::new());
    }
    if escape_api() == EscapeApi::Portable {
        return Ok(urlencoding::encode_binary(input).into_owned());
    }
    let len = length(input)?;
    // SAFETY: `raw` is a live easy handle; `input` is valid for `len` bytes.
    let out = unsafe { curl_sys::curl_easy_escape(raw, input.as_ptr().cast::<c_char>(), len) };
    if out.is_null() {
        return Err(BindingError::runtime("curl_easy_escape failed"));
    }
    // SAFETY: the library returns a NUL-terminated string we must free.
    let escaped = unsafe { CStr::from_ptr(out) }
        .to_string_lossy()
        .into_owned();
    // SAFETY: `out` was allocated by the library and is freed once.
    unsafe { curl_sys::curl_free(out.cast::<c_void>()) };
    Ok(escaped)
}

/// Decodes percent-escapes in `input`, keeping embedded NUL bytes.
pub(super) fn unescape(raw: *mut CURL, input: &str) -> Result<Vec<u8>, BindingError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if escape_api() == EscapeApi::Portable {
        return Ok(urlencoding::decode_binary(input.as_bytes()).into_owned());
    }
    let len = length(input.as_bytes())?;
    let mut out_len: c_int = 0;
    // SAFETY: `raw` is a live easy handle; `input` is valid for `len` bytes.
    let out = unsafe {
        curl_sys::curl_easy_unescape(raw, input.as_ptr().cast::<c_char>(), len, &raw mut out_len)
    };
    if out.is_null() {
        return Err(BindingError::runtime("curl_easy_unescape failed"));
    }
    let decoded = usize::try_from(out_len).map_or_else(
        |_| Vec::new(),
        // SAFETY: the library reports `out_len` valid bytes at `out`.
        |n| unsafe { std::slice::from_raw_parts(out.cast::<u8>(), n) }.to_vec(),
    );
    // SAFETY: `out` was allocated by the library and is freed once.
    unsafe { curl_sys::curl_free(out.cast::<c_void>()) };
    Ok(decoded)
}

//! Owned native string lists.

use std::ffi::{CStr, CString};
use std::ptr;

use curl_sys::curl_slist;

use crate::error::BindingError;

/// A `curl_slist` owned by the binding and freed on drop.
///
/// Appending copies each item, so the source strings need not outlive the
/// list.
#[derive(Debug)]
pub struct StringList {
    raw: *mut curl_slist,
}

impl Default for StringList {
    fn default() -> Self {
        Self::new()
    }
}

impl StringList {
    /// Creates an empty list (a null native pointer).
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: ptr::null_mut(),
        }
    }

    /// Appends a copy of `item`.
    ///
    /// On failure the list built so far is left intact; dropping it releases
    /// every node.
    ///
    /// # Errors
    ///
    /// Returns a usage error if `item` contains a NUL byte, or a runtime
    /// error if the native allocation fails.
    pub fn append(&mut self, item: &str) -> Result<(), BindingError> {
        let item = CString::new(item)
            .map_err(|_| BindingError::usage("list items may not contain NUL bytes"))?;
        // SAFETY: `self.raw` is null or a list returned by a previous append;
        // `item` is a valid C string the native side copies.
        let next = unsafe { curl_sys::curl_slist_append(self.raw, item.as_ptr()) };
        if next.is_null() {
            return Err(BindingError::runtime("Error in building a cURL list"));
        }
        self.raw = next;
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_null()
    }

    /// Copies the items out in list order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        let mut items = Vec::new();
        let mut node = self.raw;
        while !node.is_null() {
            // SAFETY: `node` walks a well-formed list owned by `self`.
            let (data, next) = unsafe { ((*node).data, (*node).next) };
            if !data.is_null() {
                // SAFETY: node data is a NUL-terminated copy made by append.
                let item = unsafe { CStr::from_ptr(data) };
                items.push(item.to_string_lossy().into_owned());
            }
            node = next;
        }
        items
    }

    /// Takes ownership of a list allocated by the native library.
    ///
    /// # Safety
    ///
    /// `raw` must be null or the head of a list that nothing else frees.
    pub(crate) unsafe fn from_raw(raw: *mut curl_slist) -> Self {
        Self { raw }
    }

    pub(crate) fn as_ptr(&self) -> *mut curl_slist {
        self.raw
    }
}

impl Drop for StringList {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            // SAFETY: the list is exclusively owned and freed exactly once.
            unsafe { curl_sys::curl_slist_free_all(self.raw) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_list_is_empty() {
        let list = StringList::new();
        assert!(list.is_empty());
        assert!(list.to_vec().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut list = StringList::new();
        list.append("Accept: */*").unwrap();
        list.append("X-Trace: 1").unwrap();
        assert!(!list.is_empty());
        assert_eq!(list.to_vec(), vec!["Accept: */*", "X-Trace: 1"]);
    }

    #[test]
    fn test_append_rejects_interior_nul() {
        let mut list = StringList::new();
        list.append("ok").unwrap();
        assert!(list.append("bad\0item").is_err());
        assert_eq!(list.to_vec(), vec!["ok"]);
    }
}

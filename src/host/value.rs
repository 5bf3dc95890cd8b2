//! Values exchanged with the embedding interpreter.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::easy::EasyHandle;
use crate::error::BindingError;
use crate::multi::MultiHandle;

/// Registered type name of easy handles.
pub const EASY_TYPE_NAME: &str = "Curl_Type";

/// Registered type name of multi handles.
pub const MULTI_TYPE_NAME: &str = "Curl_Multi_Type";

/// Failure raised by an interpreted callable.
#[derive(Debug, Error)]
pub enum HostError {
    /// The interpreted code raised an exception.
    #[error("{0}")]
    Raised(String),

    /// A binding call made from inside the callable failed.
    #[error(transparent)]
    Binding(#[from] BindingError),
}

impl HostError {
    /// Creates an interpreter-side exception.
    pub fn raised(message: impl Into<String>) -> Self {
        Self::Raised(message.into())
    }
}

type HostCallable = dyn Fn(&[Value]) -> Result<Value, HostError>;

/// An interpreted callable.
///
/// Cloning shares the underlying closure; equality is identity.
#[derive(Clone)]
pub struct HostFn(Rc<HostCallable>);

impl HostFn {
    /// Wraps a closure as a host callable.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, HostError> + 'static,
    {
        Self(Rc::new(func))
    }

    /// Invokes the callable with positional arguments.
    ///
    /// # Errors
    ///
    /// Returns whatever the interpreted code raised.
    pub fn call(&self, args: &[Value]) -> Result<Value, HostError> {
        (self.0)(args)
    }
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostFn({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

impl PartialEq for HostFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A host reference cell (`&var` in the interpreter).
#[derive(Debug, Clone, Default)]
pub struct OutRef(Rc<RefCell<Value>>);

impl OutRef {
    /// Creates a reference holding `Null`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns through the reference.
    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = value;
    }

    /// Returns a copy of the referenced value.
    #[must_use]
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }
}

impl PartialEq for OutRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A value on the interpreter's stack.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    /// Binary-safe string.
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Function(HostFn),
    Easy(EasyHandle),
    Multi(MultiHandle),
    Ref(OutRef),
}

impl Value {
    /// Name of the value's type as the interpreter reports it.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null_Type",
            Self::Int(_) => "Integer_Type",
            Self::Float(_) => "Double_Type",
            Self::Str(_) => "String_Type",
            Self::Bytes(_) => "BString_Type",
            Self::Array(_) => "Array_Type",
            Self::Function(_) => "Ref_Type",
            Self::Easy(_) => EASY_TYPE_NAME,
            Self::Multi(_) => MULTI_TYPE_NAME,
            Self::Ref(_) => "Reference_Type",
        }
    }

    /// Host length protocol.
    ///
    /// A multi handle reports its attached-handle count; a closed one and
    /// scalar values have no length.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Str(s) => Some(s.len()),
            Self::Bytes(b) => Some(b.len()),
            Self::Array(items) => Some(items.len()),
            Self::Multi(multi) => multi.length().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Byte view of a string or binary string.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Str(s) => Some(s.as_bytes()),
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_easy(&self) -> Option<&EasyHandle> {
        match self {
            Self::Easy(easy) => Some(easy),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_multi(&self) -> Option<&MultiHandle> {
        match self {
            Self::Multi(multi) => Some(multi),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            (Self::Easy(a), Self::Easy(b)) => a == b,
            (Self::Multi(a), Self::Multi(b)) => a == b,
            (Self::Ref(a), Self::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<HostFn> for Value {
    fn from(f: HostFn) -> Self {
        Self::Function(f)
    }
}

impl From<EasyHandle> for Value {
    fn from(easy: EasyHandle) -> Self {
        Self::Easy(easy)
    }
}

impl From<MultiHandle> for Value {
    fn from(multi: MultiHandle) -> Self {
        Self::Multi(multi)
    }
}

impl From<OutRef> for Value {
    fn from(r: OutRef) -> Self {
        Self::Ref(r)
    }
}

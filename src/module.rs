//! Registration surface: intrinsics, constants and the interrupt flag.
//!
//! An embedder creates one [`CurlModule`], exposes [`INTRINSICS`] under their
//! names and binds [`CurlModule::constant`] for every name in
//! [`constants::CONSTANTS`](crate::constants::CONSTANTS).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, instrument};

use crate::constants::{self, MODULE_VERSION_STRING};
use crate::easy::EasyHandle;
use crate::error::BindingError;
use crate::host::{Args, Value};
use crate::multi::MultiHandle;
use crate::native;

/// Cooperative cancellation for multi drive loops.
///
/// Cloning shares the flag, so a signal handler or another thread can raise
/// it while the interpreter thread is inside [`MultiHandle::perform`].
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the current drive loop stop after its current step.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type IntrinsicFn = fn(&CurlModule, &mut Args<'_>) -> Result<Value, BindingError>;

/// One script-visible function.
#[derive(Debug, Clone, Copy)]
pub struct Intrinsic {
    pub name: &'static str,
    /// Usage line reported on argument errors.
    pub usage: &'static str,
    func: IntrinsicFn,
}

macro_rules! intrinsic {
    ($name:literal, $usage:literal, $func:expr) => {
        Intrinsic {
            name: $name,
            usage: $usage,
            func: $func,
        }
    };
}

/// Every registered intrinsic.
pub static INTRINSICS: &[Intrinsic] = &[
    intrinsic!("curl_new", "curl_new(url)", curl_new),
    intrinsic!("curl_setopt", "curl_setopt(curlobj, option, value...)", curl_setopt),
    intrinsic!("curl_global_init", "curl_global_init(flags)", curl_global_init),
    intrinsic!("curl_global_cleanup", "curl_global_cleanup()", curl_global_cleanup),
    intrinsic!("curl_perform", "curl_perform(curlobj)", curl_perform),
    intrinsic!("curl_close", "curl_close(curlobj)", curl_close),
    intrinsic!("curl_get_info", "curl_get_info(curlobj, info)", curl_get_info),
    intrinsic!("curl_get_url", "curl_get_url(curlobj)", curl_get_url),
    intrinsic!("curl_multi_new", "curl_multi_new()", curl_multi_new),
    intrinsic!(
        "curl_multi_perform",
        "curl_multi_perform(multiobj [, timeout_secs])",
        curl_multi_perform
    ),
    intrinsic!(
        "curl_multi_add_handle",
        "curl_multi_add_handle(multiobj, curlobj)",
        curl_multi_add_handle
    ),
    intrinsic!(
        "curl_multi_remove_handle",
        "curl_multi_remove_handle(multiobj, curlobj)",
        curl_multi_remove_handle
    ),
    intrinsic!("curl_multi_close", "curl_multi_close(multiobj)", curl_multi_close),
    intrinsic!(
        "curl_multi_info_read",
        "curl_multi_info_read(multiobj [, &status])",
        curl_multi_info_read
    ),
    intrinsic!("curl_multi_length", "curl_multi_length(multiobj)", curl_multi_length),
    intrinsic!("curl_easy_strerror", "curl_easy_strerror(code)", curl_strerror),
    intrinsic!("curl_strerror", "curl_strerror(code)", curl_strerror),
    intrinsic!("curl_easy_escape", "curl_easy_escape(curlobj, bytes)", curl_easy_escape),
    intrinsic!(
        "curl_easy_unescape",
        "curl_easy_unescape(curlobj, string)",
        curl_easy_unescape
    ),
];

/// Looks up an intrinsic by its registered name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Intrinsic> {
    INTRINSICS.iter().find(|intrinsic| intrinsic.name == name)
}

/// The module instance an interpreter binds to.
#[derive(Debug, Default)]
pub struct CurlModule {
    interrupt: InterruptFlag,
}

impl CurlModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the flag that stops multi drive loops.
    #[must_use]
    pub fn interrupt(&self) -> &InterruptFlag {
        &self.interrupt
    }

    /// Calls the intrinsic registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-parameter error for unknown names, or whatever the
    /// intrinsic reports.
    #[instrument(level = "trace", skip(self, args), fields(nargs = args.len()))]
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, BindingError> {
        let intrinsic = lookup(name).ok_or_else(|| {
            BindingError::invalid_parameter(format!("{name} is not a registered intrinsic"))
        })?;
        let mut args = Args::new(intrinsic.usage, args);
        (intrinsic.func)(self, &mut args)
    }

    /// Value of a registered constant or module variable.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<Value> {
        if name == "_curl_module_version_string" {
            return Some(Value::from(MODULE_VERSION_STRING));
        }
        constants::lookup(name).map(Value::Int)
    }
}

fn curl_new(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 1)?;
    let url = args.pop_str()?;
    Ok(Value::Easy(EasyHandle::new(url)?))
}

fn curl_setopt(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    if args.remaining() < 2 {
        return Err(BindingError::usage("Usage: curl_setopt(curlobj, option, value)"));
    }
    let easy = args.pop_easy()?;
    let option = args.pop_int()?;
    let option = i32::try_from(option)
        .map_err(|_| BindingError::invalid_parameter("cURL option is unknown or unsupported"))?;
    easy.setopt(option, args.rest())?;
    Ok(Value::Null)
}

fn curl_global_init(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 1)?;
    native::global_init(args.pop_int()?)?;
    Ok(Value::Null)
}

fn curl_global_cleanup(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.finish()?;
    native::global_cleanup();
    Ok(Value::Null)
}

fn curl_perform(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 1)?;
    args.pop_easy()?.perform()?;
    Ok(Value::Null)
}

fn curl_close(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 1)?;
    args.pop_easy()?.close()?;
    Ok(Value::Null)
}

fn curl_get_info(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(2, 2)?;
    let easy = args.pop_easy()?;
    let id = i32::try_from(args.pop_int()?)
        .map_err(|_| BindingError::invalid_parameter("Unknown or unsupported info type"))?;
    easy.info(id)
}

fn curl_get_url(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 1)?;
    Ok(Value::Str(args.pop_easy()?.url()?))
}

fn curl_easy_escape(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(2, 2)?;
    let easy = args.pop_easy()?;
    let input = args.pop_bytes()?;
    Ok(Value::Str(easy.escape(input)?))
}

fn curl_easy_unescape(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(2, 2)?;
    let easy = args.pop_easy()?;
    let input = args.pop_str()?;
    easy.unescape(input)
}

fn curl_strerror(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 1)?;
    let code = i32::try_from(args.pop_int()?).unwrap_or(i32::MAX);
    Ok(Value::Str(native::strerror(code)))
}

fn curl_multi_new(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.finish()?;
    Ok(Value::Multi(MultiHandle::new()?))
}

/// Pops one easy and one multi handle in either order.
fn pop_pair<'a>(args: &mut Args<'a>) -> Result<(&'a MultiHandle, &'a EasyHandle), BindingError> {
    args.expect_count(2, 2)?;
    match args.rest() {
        [Value::Easy(_), _] => {
            let easy = args.pop_easy()?;
            Ok((args.pop_multi()?, easy))
        }
        _ => {
            let multi = args.pop_multi()?;
            Ok((multi, args.pop_easy()?))
        }
    }
}

fn curl_multi_add_handle(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    let (multi, easy) = pop_pair(args)?;
    multi.add(easy)?;
    Ok(Value::Null)
}

fn curl_multi_remove_handle(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    let (multi, easy) = pop_pair(args)?;
    multi.remove(easy)?;
    Ok(Value::Null)
}

fn curl_multi_perform(module: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 2)?;
    let multi = args.pop_multi()?;
    let timeout = if args.remaining() > 0 {
        args.pop_float()?.max(0.0)
    } else {
        0.0
    };
    let running = multi.perform(timeout, &module.interrupt)?;
    if module.interrupt.is_raised() {
        debug!("clearing interrupt after drive loop");
        module.interrupt.clear();
    }
    Ok(Value::Int(i64::try_from(running).unwrap_or(i64::MAX)))
}

fn curl_multi_info_read(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 2)?;
    let multi = args.pop_multi()?;
    let status = args.pop_optional_ref()?;
    Ok(multi
        .info_read(status)?
        .map_or(Value::Null, Value::Easy))
}

fn curl_multi_close(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 1)?;
    args.pop_multi()?.close()?;
    Ok(Value::Null)
}

fn curl_multi_length(_: &CurlModule, args: &mut Args<'_>) -> Result<Value, BindingError> {
    args.expect_count(1, 1)?;
    let count = args.pop_multi()?.length()?;
    Ok(Value::Int(i64::try_from(count).unwrap_or(i64::MAX)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::ErrorKind;
    use crate::host::OutRef;

    #[test]
    fn test_intrinsic_names_unique() {
        let mut seen = HashSet::new();
        for intrinsic in INTRINSICS {
            assert!(seen.insert(intrinsic.name), "duplicate {}", intrinsic.name);
        }
    }

    #[test]
    fn test_unknown_intrinsic() {
        let module = CurlModule::new();
        let err = module.call("curl_frobnicate", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_constants_and_version_variable() {
        let module = CurlModule::new();
        assert_eq!(module.constant("CURLOPT_URL"), Some(Value::Int(10_002)));
        assert_eq!(
            module.constant("_curl_module_version_string"),
            Some(Value::from(env!("CARGO_PKG_VERSION")))
        );
        assert!(module.constant("_curl_module_version").is_some());
    }

    #[test]
    fn test_new_and_get_url() {
        let module = CurlModule::new();
        let easy = module
            .call("curl_new", &[Value::from("http://example.test/x")])
            .unwrap();
        assert_eq!(easy.type_name(), "Curl_Type");
        let url = module.call("curl_get_url", &[easy]).unwrap();
        assert_eq!(url, Value::from("http://example.test/x"));
    }

    #[test]
    fn test_setopt_requires_handle_and_option() {
        let module = CurlModule::new();
        let easy = module.call("curl_new", &[Value::from("http://example.test/")]).unwrap();
        let err = module.call("curl_setopt", &[easy.clone()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        let verbose = module.constant("CURLOPT_VERBOSE").unwrap();
        module.call("curl_setopt", &[easy, verbose]).unwrap();
    }

    #[test]
    fn test_multi_pair_accepts_either_order() {
        let module = CurlModule::new();
        let easy = module.call("curl_new", &[Value::from("http://example.test/")]).unwrap();
        let multi = module.call("curl_multi_new", &[]).unwrap();
        module
            .call("curl_multi_add_handle", &[easy.clone(), multi.clone()])
            .unwrap();
        assert_eq!(
            module.call("curl_multi_length", &[multi.clone()]).unwrap(),
            Value::Int(1)
        );
        module
            .call("curl_multi_remove_handle", &[multi.clone(), easy])
            .unwrap();
        assert_eq!(module.call("curl_multi_length", &[multi]).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_multi_pair_rejects_two_easies() {
        let module = CurlModule::new();
        let a = module.call("curl_new", &[Value::from("http://example.test/")]).unwrap();
        let b = module.call("curl_new", &[Value::from("http://example.test/")]).unwrap();
        let err = module.call("curl_multi_add_handle", &[a, b]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_info_read_on_idle_multi() {
        let module = CurlModule::new();
        let multi = module.call("curl_multi_new", &[]).unwrap();
        let status = OutRef::new();
        let got = module
            .call("curl_multi_info_read", &[multi, Value::Ref(status)])
            .unwrap();
        assert!(got.is_null());
    }

    #[test]
    fn test_strerror() {
        let module = CurlModule::new();
        let msg = module.call("curl_strerror", &[Value::Int(0)]).unwrap();
        assert_eq!(msg.as_str().map(str::is_empty), Some(false));
        assert_eq!(
            module.call("curl_easy_strerror", &[Value::Int(6)]).unwrap(),
            module.call("curl_strerror", &[Value::Int(6)]).unwrap()
        );
    }

    #[test]
    fn test_interrupt_flag_shared_between_clones() {
        let flag = InterruptFlag::new();
        let other = flag.clone();
        other.raise();
        assert!(flag.is_raised());
        flag.clear();
        assert!(!other.is_raised());
    }
}

//! Process-wide init/cleanup. Kept in its own test binary so no other test
//! runs concurrently with the cleanup.

use curlbind::{CurlModule, EasyHandle, Value};

#[test]
fn test_global_init_and_cleanup_are_idempotent() {
    let m = CurlModule::new();
    let all = m.constant("CURL_GLOBAL_ALL").unwrap();

    m.call("curl_global_init", &[all.clone()]).unwrap();
    m.call("curl_global_init", &[all.clone()]).unwrap();
    EasyHandle::new("http://a.test/").unwrap().close().unwrap();

    m.call("curl_global_cleanup", &[]).unwrap();
    m.call("curl_global_cleanup", &[]).unwrap();

    // Unknown bits are masked off rather than rejected.
    m.call("curl_global_init", &[Value::Int(0xff)]).unwrap();
    m.call("curl_global_cleanup", &[]).unwrap();

    let err = m.call("curl_global_cleanup", &[Value::Int(1)]).unwrap_err();
    assert_eq!(err.kind(), curlbind::ErrorKind::Usage);
}

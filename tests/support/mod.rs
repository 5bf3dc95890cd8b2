//! Shared helpers for socket-bound integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::net::TcpListener;
use std::panic::Location;
use std::rc::Rc;

use curlbind::{HostFn, Value};
use wiremock::MockServer;

#[must_use]
pub fn socket_tests_required() -> bool {
    std::env::var("CURLBIND_REQUIRE_SOCKET_TESTS")
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[track_caller]
#[must_use]
pub fn should_skip_socket_bound_test() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return false;
    }

    let location = Location::caller();
    let message = format!(
        "[socket-bound-test] cannot bind localhost socket at {}:{}; wiremock-based test cannot run in this environment",
        location.file(),
        location.line()
    );
    if socket_tests_required() {
        panic!("{message}. Set CURLBIND_REQUIRE_SOCKET_TESTS=0 to allow local skip behavior.");
    }

    eprintln!(
        "{message}. Skipping test. Set CURLBIND_REQUIRE_SOCKET_TESTS=1 to fail-fast instead."
    );
    true
}

pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if should_skip_socket_bound_test() {
        None
    } else {
        Some(MockServer::start().await)
    }
}

/// A URL nothing listens on.
#[must_use]
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

/// Byte sink usable as a write or header callback.
pub fn byte_sink() -> (HostFn, Rc<RefCell<Vec<u8>>>) {
    let buffer = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&buffer);
    let func = HostFn::new(move |args| {
        if let Some(bytes) = args.get(1).and_then(Value::as_bytes) {
            sink.borrow_mut().extend_from_slice(bytes);
        }
        Ok(Value::Int(0))
    });
    (func, buffer)
}

/// Byte sink that records each delivery separately.
pub fn chunk_sink() -> (HostFn, Rc<RefCell<Vec<Vec<u8>>>>) {
    let chunks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&chunks);
    let func = HostFn::new(move |args| {
        if let Some(bytes) = args.get(1).and_then(Value::as_bytes) {
            sink.borrow_mut().push(bytes.to_vec());
        }
        Ok(Value::Int(0))
    });
    (func, chunks)
}

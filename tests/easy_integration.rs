//! Integration tests for blocking easy-handle transfers against a mock server.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use curlbind::constants::{code, info, opt};
use curlbind::{BindingError, EasyHandle, ErrorKind, HostFn, Value};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::{byte_sink, chunk_sink, refused_url, start_mock_server_or_skip};

#[tokio::test(flavor = "multi_thread")]
async fn test_write_callback_accumulates_body() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&server)
        .await;
    let url = format!("{}/hello", server.uri());

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, body) = byte_sink();
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Int(0)])
            .unwrap();
        easy.perform().unwrap();
        assert_eq!(&*body.borrow(), b"hello");
        easy.close().unwrap();
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_callback_receives_user_data() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("abc"))
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let write = HostFn::new(move |args| {
            sink.borrow_mut().push(args[0].clone());
            Ok(Value::Int(0))
        });
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::from("ctx")])
            .unwrap();
        easy.perform().unwrap();
        assert!(!seen.borrow().is_empty());
        assert!(seen.borrow().iter().all(|v| *v == Value::from("ctx")));
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_callback_minus_one_fails_with_write_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let write = HostFn::new(|_| Ok(Value::Int(-1)));
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        let err = easy.perform().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Native);
        assert_eq!(err.code(), Some(code::WRITE_ERROR));
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_header_callback_sees_each_header_line() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-test", "yes")
                .set_body_string("ok"),
        )
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        let (headers, lines) = chunk_sink();
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(opt::HEADERFUNCTION, &[Value::from(headers), Value::Null])
            .unwrap();
        easy.perform().unwrap();

        let lines: Vec<String> = lines
            .borrow()
            .iter()
            .map(|line| String::from_utf8_lossy(line).to_ascii_lowercase())
            .collect();
        assert!(lines[0].starts_with("http/1.1 200"), "{lines:?}");
        assert!(lines.iter().any(|l| l.starts_with("x-test: yes")), "{lines:?}");
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_request_headers_and_user_agent_are_sent() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(header("x-token", "abc"))
        .and(header("user-agent", "curlbind-tests"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(
            opt::HTTPHEADER,
            &[Value::Array(vec![Value::from("X-Token: abc")])],
        )
        .unwrap();
        easy.setopt(opt::USERAGENT, &[Value::from("curlbind-tests")])
            .unwrap();
        easy.perform().unwrap();
        assert_eq!(easy.info(info::RESPONSE_CODE).unwrap(), Value::Int(200));
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_postfields_sends_body() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("POST"))
        .and(body_string("a=1&b=2"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(opt::POSTFIELDS, &[Value::from("a=1&b=2")]).unwrap();
        easy.perform().unwrap();
        assert_eq!(easy.info(info::RESPONSE_CODE).unwrap(), Value::Int(201));
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_callback_null_aborts_upload() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        let read = HostFn::new(|_| Ok(Value::Null));
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(opt::UPLOAD, &[]).unwrap();
        easy.setopt(opt::READFUNCTION, &[Value::from(read), Value::Null])
            .unwrap();
        let err = easy.perform().unwrap_err();
        assert_eq!(err.code(), Some(code::ABORTED_BY_CALLBACK));
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_callback_empty_string_ends_upload() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("PUT"))
        .and(body_string("payload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let read = HostFn::new(move |_| {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                Ok(Value::from("payload"))
            } else {
                Ok(Value::from(""))
            }
        });
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(opt::UPLOAD, &[]).unwrap();
        easy.setopt(opt::READFUNCTION, &[Value::from(read), Value::Null])
            .unwrap();
        easy.perform().unwrap();
        assert!(calls.get() >= 2);
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_callback_without_data_receives_handle() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        let got_handle = Rc::new(Cell::new(false));
        let flag = Rc::clone(&got_handle);
        let read = HostFn::new(move |args| {
            flag.set(args[0].as_easy().is_some());
            Ok(Value::from(""))
        });
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(opt::UPLOAD, &[]).unwrap();
        easy.setopt(opt::READFUNCTION, &[Value::from(read), Value::Null])
            .unwrap();
        easy.perform().unwrap();
        assert!(got_handle.get());
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reentrant_calls_from_callback_are_rejected() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let slot: Rc<RefCell<Option<EasyHandle>>> = Rc::new(RefCell::new(Some(easy.clone())));
        let errors: Rc<RefCell<Vec<BindingError>>> = Rc::new(RefCell::new(Vec::new()));

        let (cb_slot, cb_errors) = (Rc::clone(&slot), Rc::clone(&errors));
        let write = HostFn::new(move |_| {
            if let Some(handle) = cb_slot.borrow().as_ref() {
                assert!(handle.is_running());
                if let Err(e) = handle.setopt(opt::URL, &[Value::from("http://other.test/")]) {
                    cb_errors.borrow_mut().push(e);
                }
                if let Err(e) = handle.perform() {
                    cb_errors.borrow_mut().push(e);
                }
                if let Err(e) = handle.close() {
                    cb_errors.borrow_mut().push(e);
                }
            }
            Ok(Value::Int(0))
        });
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.perform().unwrap();
        slot.borrow_mut().take();

        let errors = errors.borrow();
        assert!(errors.len() >= 3);
        assert!(errors.iter().all(|e| matches!(e, BindingError::Running)));
        assert!(!easy.is_running());
        assert_eq!(easy.url().unwrap(), url);
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_callback_error_aborts_transfer() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let write = HostFn::new(|_| Err(curlbind::HostError::raised("boom")));
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        let err = easy.perform().unwrap_err();
        assert_eq!(err.code(), Some(code::WRITE_ERROR));
        // The handle stays usable after a failed transfer.
        assert!(!easy.is_running());
        easy.setopt(opt::VERBOSE, &[Value::Int(0)]).unwrap();
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_progress_callback_nonzero_aborts() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        let progress = HostFn::new(|_| Ok(Value::Int(1)));
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(opt::PROGRESSFUNCTION, &[Value::from(progress), Value::Null])
            .unwrap();
        let err = easy.perform().unwrap_err();
        assert_eq!(err.code(), Some(code::ABORTED_BY_CALLBACK));
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_info_after_perform() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("hello", "text/plain"),
        )
        .mount(&server)
        .await;
    let url = format!("{}/doc", server.uri());

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.perform().unwrap();

        assert_eq!(easy.info(info::RESPONSE_CODE).unwrap(), Value::Int(200));
        assert_eq!(easy.info(info::EFFECTIVE_URL).unwrap(), Value::from(url.as_str()));
        assert_eq!(
            easy.info(info::CONTENT_TYPE).unwrap().as_str(),
            Some("text/plain")
        );
        assert_eq!(easy.info(info::SIZE_DOWNLOAD).unwrap(), Value::Float(5.0));
        assert!(easy.info(info::TOTAL_TIME).unwrap().as_float().unwrap() >= 0.0);
        assert_eq!(easy.info(info::PRIMARY_IP).unwrap(), Value::from("127.0.0.1"));
        assert_eq!(easy.info(info::REDIRECT_URL).unwrap(), Value::Null);

        let err = easy.info(info::PRIVATE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_follow_location_reaches_target() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;
    let url = format!("{}/old", server.uri());

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, body) = byte_sink();
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(opt::FOLLOWLOCATION, &[]).unwrap();
        easy.perform().unwrap();
        assert_eq!(&*body.borrow(), b"moved");
        assert_eq!(easy.info(info::REDIRECT_COUNT).unwrap(), Value::Int(1));
        // The stored URL is the one last set, not the effective one.
        assert_eq!(easy.url().unwrap(), url);
    });
}

#[test]
fn test_connection_refused_reports_native_code_and_detail() {
    let easy = EasyHandle::new(&refused_url()).unwrap();
    let (write, _) = byte_sink();
    easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
        .unwrap();
    let err = easy.perform().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Native);
    assert_eq!(err.code(), Some(code::COULDNT_CONNECT));
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_unsupported_protocol() {
    let easy = EasyHandle::new("nosuchscheme://x/").unwrap();
    let err = easy.perform().unwrap_err();
    assert_eq!(err.code(), Some(code::UNSUPPORTED_PROTOCOL));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_values_keep_previous_header_and_agent() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(header("x-kept", "1"))
        .and(header("user-agent", "kept-agent"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let url = server.uri();

    tokio::task::block_in_place(|| {
        let easy = EasyHandle::new(&url).unwrap();
        let (write, _) = byte_sink();
        easy.setopt(opt::WRITEFUNCTION, &[Value::from(write), Value::Null])
            .unwrap();
        easy.setopt(opt::HTTPHEADER, &[Value::Array(vec![Value::from("X-Kept: 1")])])
            .unwrap();
        easy.setopt(opt::USERAGENT, &[Value::from("kept-agent")])
            .unwrap();

        let err = easy
            .setopt(opt::HTTPHEADER, &[Value::Array(vec![Value::from("X-Bad: \0")])])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = easy
            .setopt(opt::HTTPHEADER, &[Value::Array(vec![Value::Int(1)])])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = easy
            .setopt(opt::USERAGENT, &[Value::from("bad\0agent")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);

        easy.perform().unwrap();
        assert_eq!(easy.info(info::RESPONSE_CODE).unwrap(), Value::Int(200));
    });
}

#[test]
fn test_rejected_url_keeps_retained_url() {
    let easy = EasyHandle::new("http://kept.test/").unwrap();

    let err = easy.setopt(opt::URL, &[Value::from("http://bad\0.test/")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
    assert_eq!(easy.url().unwrap(), "http://kept.test/");

    // Longer than the library's input limit, so the native set fails.
    let oversized = format!("http://a.test/{}", "a".repeat(8_000_001));
    let err = easy.setopt(opt::URL, &[Value::from(oversized.as_str())]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Native);
    assert_eq!(easy.url().unwrap(), "http://kept.test/");

    easy.setopt(opt::URL, &[Value::from("http://next.test/")]).unwrap();
    assert_eq!(easy.url().unwrap(), "http://next.test/");
}

#[test]
fn test_escape_and_unescape_empty_input() {
    let easy = EasyHandle::new("http://a.test/").unwrap();
    assert_eq!(easy.escape(b"").unwrap(), "");
    assert_eq!(easy.unescape("").unwrap(), Value::from(""));
    easy.close().unwrap();
}

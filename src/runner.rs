//! Transfer driver for the CLI.
//!
//! Everything goes through [`CurlModule::call`] with script-visible names and
//! constants, so the binary exercises the same surface an interpreter binds.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use curlbind::{CurlModule, HostFn, OutRef, Value};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Per-transfer settings resolved from CLI flags and the config file.
#[derive(Debug, Clone, Default)]
pub struct TransferSettings {
    pub headers: Vec<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub follow_location: bool,
    pub progress: bool,
    pub json: bool,
    pub poll_timeout_secs: f64,
}

/// What `--json` prints for each transfer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransferSummary {
    pub url: String,
    pub effective_url: Option<String>,
    pub response_code: i64,
    pub total_time: f64,
    pub bytes: usize,
    pub result: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferSummary {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.result == 0
    }
}

struct Transfer {
    url: String,
    easy: Value,
    body: Rc<RefCell<Vec<u8>>>,
    bar: Option<ProgressBar>,
}

/// Looks up a registered constant as an argument value.
fn constant(module: &CurlModule, name: &str) -> Result<Value> {
    module
        .constant(name)
        .ok_or_else(|| anyhow!("constant {name} is not registered"))
}

fn setopt(module: &CurlModule, easy: &Value, option: &str, values: Vec<Value>) -> Result<()> {
    let mut args = vec![easy.clone(), constant(module, option)?];
    args.extend(values);
    module
        .call("curl_setopt", &args)
        .with_context(|| format!("Failed to set {option}"))?;
    Ok(())
}

fn progress_bar(url: &str, bars: &MultiProgress) -> ProgressBar {
    let bar = bars.add(ProgressBar::new(0));
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:30}] {bytes}/{total_bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(url.to_string());
    bar
}

fn prepare(
    module: &CurlModule,
    url: &str,
    settings: &TransferSettings,
    bars: Option<&MultiProgress>,
) -> Result<Transfer> {
    let easy = module
        .call("curl_new", &[Value::from(url)])
        .with_context(|| format!("Failed to create handle for {url}"))?;

    let body = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&body);
    let write = HostFn::new(move |args| {
        if let Some(bytes) = args.get(1).and_then(Value::as_bytes) {
            sink.borrow_mut().extend_from_slice(bytes);
        }
        Ok(Value::Int(0))
    });
    setopt(module, &easy, "CURLOPT_WRITEFUNCTION", vec![Value::from(write), Value::Null])?;
    setopt(module, &easy, "CURLOPT_NOSIGNAL", Vec::new())?;

    if !settings.headers.is_empty() {
        let headers = settings.headers.iter().map(|h| Value::from(h.as_str())).collect();
        setopt(module, &easy, "CURLOPT_HTTPHEADER", vec![Value::Array(headers)])?;
    }
    if let Some(agent) = &settings.user_agent {
        setopt(module, &easy, "CURLOPT_USERAGENT", vec![Value::from(agent.as_str())])?;
    }
    if let Some(secs) = settings.timeout_secs {
        setopt(module, &easy, "CURLOPT_TIMEOUT", vec![seconds(secs)])?;
    }
    if let Some(secs) = settings.connect_timeout_secs {
        setopt(module, &easy, "CURLOPT_CONNECTTIMEOUT", vec![seconds(secs)])?;
    }
    if settings.follow_location {
        setopt(module, &easy, "CURLOPT_FOLLOWLOCATION", Vec::new())?;
    }

    let bar = bars.map(|bars| progress_bar(url, bars));
    if let Some(bar) = &bar {
        let bar = bar.clone();
        let progress = HostFn::new(move |args| {
            let total = args.get(1).and_then(Value::as_float).unwrap_or(0.0);
            let now = args.get(2).and_then(Value::as_float).unwrap_or(0.0);
            if total > 0.0 {
                bar.set_length(byte_count(total));
            }
            bar.set_position(byte_count(now));
            Ok(Value::Int(0))
        });
        setopt(
            module,
            &easy,
            "CURLOPT_PROGRESSFUNCTION",
            vec![Value::from(progress), Value::Null],
        )?;
    }

    Ok(Transfer {
        url: url.to_string(),
        easy,
        body,
        bar,
    })
}

fn seconds(secs: u64) -> Value {
    Value::Int(i64::try_from(secs).unwrap_or(i64::MAX))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn byte_count(value: f64) -> u64 {
    value.max(0.0) as u64
}

fn info(module: &CurlModule, easy: &Value, name: &str) -> Result<Value> {
    module
        .call("curl_get_info", &[easy.clone(), constant(module, name)?])
        .with_context(|| format!("Failed to read {name}"))
}

fn summarize(module: &CurlModule, transfer: &Transfer, result: i64) -> Result<TransferSummary> {
    let error = if result == 0 {
        None
    } else {
        module
            .call("curl_strerror", &[Value::Int(result)])?
            .as_str()
            .map(str::to_string)
    };
    Ok(TransferSummary {
        url: transfer.url.clone(),
        effective_url: info(module, &transfer.easy, "CURLINFO_EFFECTIVE_URL")?
            .as_str()
            .map(str::to_string),
        response_code: info(module, &transfer.easy, "CURLINFO_RESPONSE_CODE")?
            .as_int()
            .unwrap_or(0),
        total_time: info(module, &transfer.easy, "CURLINFO_TOTAL_TIME")?
            .as_float()
            .unwrap_or(0.0),
        bytes: transfer.body.borrow().len(),
        result,
        error,
    })
}

/// Prints the body or the JSON summary, then closes the handle.
fn finish(
    module: &CurlModule,
    transfer: &Transfer,
    result: i64,
    settings: &TransferSettings,
) -> Result<TransferSummary> {
    if let Some(bar) = &transfer.bar {
        bar.finish_and_clear();
    }
    let summary = summarize(module, transfer, result)?;
    if settings.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else if summary.succeeded() {
        io::stdout()
            .write_all(&transfer.body.borrow())
            .context("Failed to write response body")?;
    }
    if summary.succeeded() {
        info!(
            url = %summary.url,
            code = summary.response_code,
            bytes = summary.bytes,
            "Transfer complete"
        );
    } else {
        warn!(
            url = %summary.url,
            result = summary.result,
            error = summary.error.as_deref().unwrap_or(""),
            "Transfer failed"
        );
    }
    module.call("curl_close", &[transfer.easy.clone()])?;
    Ok(summary)
}

/// Runs each URL as a blocking transfer, one after another.
pub fn run_sequential(
    module: &CurlModule,
    urls: &[String],
    settings: &TransferSettings,
) -> Result<Vec<TransferSummary>> {
    let bars = settings.progress.then(MultiProgress::new);
    let mut summaries = Vec::with_capacity(urls.len());
    for url in urls {
        let transfer = prepare(module, url, settings, bars.as_ref())?;
        let result = match module.call("curl_perform", &[transfer.easy.clone()]) {
            Ok(_) => 0,
            Err(error) => {
                debug!(url = %url, %error, "perform failed");
                error.code().map_or(-1, i64::from)
            }
        };
        summaries.push(finish(module, &transfer, result, settings)?);
    }
    Ok(summaries)
}

/// Runs every URL concurrently on one multi handle.
pub fn run_multi(
    module: &CurlModule,
    urls: &[String],
    settings: &TransferSettings,
) -> Result<Vec<TransferSummary>> {
    let bars = settings.progress.then(MultiProgress::new);
    let multi = module.call("curl_multi_new", &[])?;
    let mut pending = Vec::with_capacity(urls.len());
    for url in urls {
        let transfer = prepare(module, url, settings, bars.as_ref())?;
        module.call("curl_multi_add_handle", &[multi.clone(), transfer.easy.clone()])?;
        pending.push(transfer);
    }

    let status = OutRef::new();
    let mut summaries = Vec::with_capacity(pending.len());
    loop {
        let running = module
            .call(
                "curl_multi_perform",
                &[multi.clone(), Value::Float(settings.poll_timeout_secs)],
            )
            .context("Multi drive step failed")?
            .as_int()
            .unwrap_or(0);

        while let Some(done) = module
            .call("curl_multi_info_read", &[multi.clone(), Value::Ref(status.clone())])?
            .as_easy()
            .cloned()
        {
            let Some(index) = pending.iter().position(|t| t.easy.as_easy() == Some(&done)) else {
                continue;
            };
            let transfer = pending.swap_remove(index);
            module.call("curl_multi_remove_handle", &[multi.clone(), transfer.easy.clone()])?;
            let result = status.get().as_int().unwrap_or(-1);
            summaries.push(finish(module, &transfer, result, settings)?);
        }

        if running == 0 || pending.is_empty() {
            break;
        }
    }

    for transfer in pending {
        warn!(url = %transfer.url, "transfer never reported completion");
        module.call("curl_multi_remove_handle", &[multi.clone(), transfer.easy.clone()])?;
        module.call("curl_close", &[transfer.easy])?;
    }
    module.call("curl_multi_close", &[multi])?;
    Ok(summaries)
}

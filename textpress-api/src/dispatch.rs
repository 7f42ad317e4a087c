use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};

use crate::error::TransformError;
use crate::{js_ops, json_ops};

pub const DEFAULT_SIZE_THRESHOLD_BYTES: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    Json,
    JavaScript,
}

impl FromStr for TextKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(TextKind::Json),
            "js" | "javascript" => Ok(TextKind::JavaScript),
            other => Err(TransformError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Compress,
    Format,
    Validate,
    Minify,
}

impl FromStr for Operation {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compress" => Ok(Operation::Compress),
            "format" => Ok(Operation::Format),
            "validate" => Ok(Operation::Validate),
            "minify" => Ok(Operation::Minify),
            other => Err(TransformError::UnknownOperation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub text: String,
    pub kind: TextKind,
    pub operation: Operation,
}

// Exactly one of output / error is present, gated by success.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl TransformResult {
    fn completed(output: String, elapsed_ms: u64) -> Self {
        Self {
            success: true,
            output: Some(output),
            error: None,
            elapsed_ms,
        }
    }

    fn failed(error: &TransformError, elapsed_ms: u64) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.to_string()),
            elapsed_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DispatchOptions {
    #[serde(default = "default_size_threshold")]
    pub size_threshold_bytes: usize,
}

fn default_size_threshold() -> usize {
    DEFAULT_SIZE_THRESHOLD_BYTES
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            size_threshold_bytes: DEFAULT_SIZE_THRESHOLD_BYTES,
        }
    }
}

// Single operation table shared by the synchronous and offloaded paths.
pub fn execute_operation(
    kind: TextKind,
    operation: Operation,
    text: &str,
) -> Result<String, TransformError> {
    match (kind, operation) {
        (TextKind::Json, Operation::Compress) => json_ops::compress(text),
        (TextKind::Json, Operation::Format) => json_ops::format(text),
        (TextKind::Json, Operation::Validate) => json_ops::validate(text),
        (TextKind::Json, Operation::Minify) => Err(TransformError::UnknownOperation(
            "minify is not available for JSON input".to_string(),
        )),
        (TextKind::JavaScript, Operation::Compress) => Ok(js_ops::compress(text)),
        (TextKind::JavaScript, Operation::Format) => Ok(js_ops::format(text)),
        (TextKind::JavaScript, Operation::Minify) => Ok(js_ops::minify(text)),
        (TextKind::JavaScript, Operation::Validate) => js_ops::validate(text),
    }
}

// Every failure is converted into an unsuccessful result; callers render
// the error string directly and never see a panic or an Err.
pub fn run_sync(request: &TransformRequest) -> TransformResult {
    if request.text.trim().is_empty() {
        return TransformResult::failed(&TransformError::EmptyInput, 0);
    }

    let started = Instant::now();
    let outcome = execute_operation(request.kind, request.operation, &request.text);
    let elapsed_ms = elapsed_millis(started);

    match outcome {
        Ok(output) => TransformResult::completed(output, elapsed_ms),
        Err(error) => TransformResult::failed(&error, elapsed_ms),
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    (started.elapsed().as_secs_f64() * 1000.0).round() as u64
}

struct OffloadRequest {
    kind: TextKind,
    operation: Operation,
    text: String,
    reply: oneshot::Sender<TransformResult>,
}

// Explicit handle for offloaded execution: owns the runtime and the
// request channel of a stateless worker loop. Dropping the handle closes
// the channel and shuts the runtime down on every exit path.
pub struct ExecutionContext {
    requests: mpsc::Sender<OffloadRequest>,
    runtime: Runtime,
    options: DispatchOptions,
}

impl ExecutionContext {
    pub fn acquire() -> Result<Self, TransformError> {
        Self::with_options(DispatchOptions::default())
    }

    pub fn with_options(options: DispatchOptions) -> Result<Self, TransformError> {
        let runtime = Runtime::new()?;
        let (requests, mut receiver) = mpsc::channel::<OffloadRequest>(32);

        runtime.spawn(async move {
            while let Some(request) = receiver.recv().await {
                let OffloadRequest {
                    kind,
                    operation,
                    text,
                    reply,
                } = request;

                let result = tokio::task::spawn_blocking(move || {
                    run_sync(&TransformRequest {
                        text,
                        kind,
                        operation,
                    })
                })
                .await
                .unwrap_or_else(|_| TransformResult::failed(&TransformError::Offload, 0));

                let _ = reply.send(result);
            }
        });

        Ok(Self {
            requests,
            runtime,
            options,
        })
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    // Request/response over channels; one reply per request, no retries,
    // no timeout.
    fn offload(&self, request: &TransformRequest) -> TransformResult {
        let (reply_tx, reply_rx) = oneshot::channel();
        let offload = OffloadRequest {
            kind: request.kind,
            operation: request.operation,
            text: request.text.clone(),
            reply: reply_tx,
        };

        if self.requests.blocking_send(offload).is_err() {
            return TransformResult::failed(&TransformError::Offload, 0);
        }

        match self.runtime.block_on(reply_rx) {
            Ok(result) => result,
            Err(_) => TransformResult::failed(&TransformError::Offload, 0),
        }
    }

    pub fn release(self) {}
}

// Inputs at or below the size threshold run in the caller's thread;
// larger inputs are handed to the context's worker. Both paths execute
// the identical operation table.
pub fn run(context: &ExecutionContext, request: &TransformRequest) -> TransformResult {
    if request.text.trim().is_empty() {
        return TransformResult::failed(&TransformError::EmptyInput, 0);
    }

    if request.text.len() <= context.options.size_threshold_bytes {
        run_sync(request)
    } else {
        context.offload(request)
    }
}

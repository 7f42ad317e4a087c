pub mod dispatch;
pub mod error;
pub mod js_ops;
pub mod json_ops;
pub mod repair;
pub mod scanner;
pub mod stats;
pub mod token;

pub use dispatch::{
    DispatchOptions, ExecutionContext, Operation, TextKind, TransformRequest, TransformResult,
    execute_operation, run, run_sync,
};
pub use error::TransformError;
pub use stats::StatsReport;

pub fn process_text(text: &str, kind: TextKind, operation: Operation) -> TransformResult {
    dispatch::run_sync(&TransformRequest {
        text: text.to_string(),
        kind,
        operation,
    })
}

pub fn format_error_as_json(error: &TransformError, minify: bool) -> String {
    let error_json = serde_json::json!({
        "error": {
            "type": error.kind(),
            "message": format!("{}", error)
        }
    });

    if minify {
        serde_json::to_string(&error_json).unwrap_or_else(|_| {
            String::from(r#"{"error":{"type":"ParseError","message":"JSON serialization error"}}"#)
        })
    } else {
        serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| {
            String::from(r#"{"error":{"type":"ParseError","message":"JSON serialization error"}}"#)
        })
    }
}

use crate::error::RuntimeError;
use crate::messages::{TransformRequestMessage, TransformResponseMessage};
use textpress_api::dispatch::{self, Operation, TextKind, TransformRequest};
use tracing::debug;

pub async fn handle_request(request: TransformRequestMessage) -> Result<String, RuntimeError> {
    debug!("Received request with ID: {}", request.id);
    debug!("Action: {} ({})", request.action, request.kind);

    let response = process_transform(request).await?;
    Ok(serde_json::to_string(&response)?)
}

async fn process_transform(
    request: TransformRequestMessage,
) -> Result<TransformResponseMessage, RuntimeError> {
    let id = request.id.clone();

    let transform = match build_transform_request(&request) {
        Ok(transform) => transform,
        Err(error) => {
            return Ok(TransformResponseMessage::failure(id, error.to_string()));
        }
    };

    let result = tokio::task::spawn_blocking(move || dispatch::run_sync(&transform))
        .await
        .map_err(|e| RuntimeError::TaskExecutionError(e.to_string()))?;

    Ok(TransformResponseMessage::from_result(id, result))
}

fn build_transform_request(
    request: &TransformRequestMessage,
) -> Result<TransformRequest, textpress_api::TransformError> {
    let kind: TextKind = request.kind.parse()?;
    let operation: Operation = request.action.parse()?;

    Ok(TransformRequest {
        text: request.text.clone(),
        kind,
        operation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use textpress_api::dispatch::DispatchOptions;

    fn message(action: &str, kind: &str, text: &str) -> TransformRequestMessage {
        TransformRequestMessage {
            id: "test".to_string(),
            action: action.to_string(),
            kind: kind.to_string(),
            text: text.to_string(),
            options: DispatchOptions::default(),
        }
    }

    #[tokio::test]
    async fn compress_request_round_trips() {
        let json = handle_request(message("compress", "json", "{ a: 1, }"))
            .await
            .unwrap();
        let response: TransformResponseMessage = serde_json::from_str(&json).unwrap();
        assert!(response.success);
        assert_eq!(response.id, "test");
        assert_eq!(response.result.as_deref(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn unknown_action_becomes_error_response() {
        let json = handle_request(message("explode", "json", "{}"))
            .await
            .unwrap();
        let response: TransformResponseMessage = serde_json::from_str(&json).unwrap();
        assert!(!response.success);
        assert!(response.error.is_some_and(|e| e.contains("explode")));
    }

    #[tokio::test]
    async fn unknown_kind_becomes_error_response() {
        let json = handle_request(message("compress", "xml", "{}"))
            .await
            .unwrap();
        let response: TransformResponseMessage = serde_json::from_str(&json).unwrap();
        assert!(!response.success);
        assert!(response.error.is_some_and(|e| e.contains("xml")));
    }

    #[tokio::test]
    async fn failed_transform_keeps_request_id() {
        let json = handle_request(message("validate", "js", "(1,2]"))
            .await
            .unwrap();
        let response: TransformResponseMessage = serde_json::from_str(&json).unwrap();
        assert!(!response.success);
        assert_eq!(response.id, "test");
    }
}

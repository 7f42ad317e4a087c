use serde::{Deserialize, Serialize, de::Deserializer};
use textpress_api::dispatch::DispatchOptions;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum ClientMessage {
    Request(TransformRequestMessage),
    Unknown(serde_json::Value),
}

impl<'de> Deserialize<'de> for ClientMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        if let serde_json::Value::Object(ref map) = value {
            if map.contains_key("action") {
                if let Ok(request) =
                    serde_json::from_value::<TransformRequestMessage>(value.clone())
                {
                    return Ok(ClientMessage::Request(request));
                }
            }
        }

        Ok(ClientMessage::Unknown(value))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransformRequestMessage {
    #[serde(default = "generate_request_id")]
    pub id: String,
    pub action: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    pub text: String,
    #[serde(default)]
    pub options: DispatchOptions,
}

fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_kind() -> String {
    "json".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransformResponseMessage {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl TransformResponseMessage {
    pub fn from_result(id: String, result: textpress_api::TransformResult) -> Self {
        Self {
            id,
            success: result.success,
            result: result.output,
            error: result.error,
            elapsed_ms: result.elapsed_ms,
        }
    }

    pub fn failure(id: String, error: String) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(error),
            elapsed_ms: 0,
        }
    }
}

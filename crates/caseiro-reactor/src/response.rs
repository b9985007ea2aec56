use serde::{Deserialize, Serialize};
use serde_json::json;

const PREVIEW_CHARS: usize = 300;

/// HTTP-shaped invocation result: a status and a JSON-encoded body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactorResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl ReactorResponse {
    pub fn success(output_uri: &str, answer: &str) -> Self {
        let preview: String = answer.chars().take(PREVIEW_CHARS).collect();
        Self {
            status_code: 200,
            body: json!({
                "message": "Success",
                "output_s3": output_uri,
                "preview": preview,
            })
            .to_string(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            status_code: 400,
            body: json!({ "error": "Bad Request", "message": message }).to_string(),
        }
    }

    pub fn server_error(message: &str) -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": "Internal Server Error", "message": message }).to_string(),
        }
    }

    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

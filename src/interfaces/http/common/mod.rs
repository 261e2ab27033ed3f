//! Shared HTTP types: the error envelope and the validating JSON extractor

pub mod validated_json;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use validated_json::ValidatedJson;

/// Body of every non-2xx JSON response. Successful responses carry the
/// resource itself.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`
    pub success: bool,
    #[schema(example = "Not allowed")]
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_envelope() {
        let body = serde_json::to_value(ErrorBody::new("Not allowed")).unwrap();
        assert_eq!(body, serde_json::json!({"success": false, "error": "Not allowed"}));
    }
}

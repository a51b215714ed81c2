use serde::Serialize;
use utoipa::ToSchema;

/// Envelope for every JSON body the service answers with.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_wraps_data() {
        let body = serde_json::to_value(ApiResponse::success("ok", 3)).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "ok", "data": 3 }));
    }
}

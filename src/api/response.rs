//! `{data, meta}` envelope for the JSON digest endpoint.

use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};

pub type Envelope<T> = (StatusCode, Json<ApiResponse<T>>);

#[derive(Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub meta: Meta,
}

#[derive(Serialize)]
pub struct Meta {
    pub ok: bool,
    pub code: u16,
    pub served_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn success<T: Serialize>(data: T) -> Envelope<T> {
    wrap(StatusCode::OK, Some(data), None)
}

pub fn error<T>(status: StatusCode, message: String) -> Envelope<T> {
    wrap(status, None, Some(message))
}

fn wrap<T>(status: StatusCode, data: Option<T>, error: Option<String>) -> Envelope<T> {
    let meta = Meta {
        ok: status.is_success(),
        code: status.as_u16(),
        served_at: Utc::now(),
        error,
    };
    (status, Json(ApiResponse { data, meta }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_carry_the_message_and_no_data() {
        let (status, Json(body)) = error::<()>(StatusCode::BAD_GATEWAY, "feed down".into());
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["meta"]["ok"], false);
        assert_eq!(json["meta"]["code"], 502);
        assert_eq!(json["meta"]["error"], "feed down");
        assert!(json.get("data").is_none());
    }
}

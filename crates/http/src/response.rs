//! Success envelope shared by every feature slice.

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};

/// Body of every successful API response.
///
/// Services fill in `status`, `message` and `data`; controllers add the
/// originating `route` before writing it out.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl<T> Envelope<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            message: message.into(),
            data,
            route: None,
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data)
    }

    /// Echo the request URI (path and query) back to the client.
    pub fn with_route(mut self, uri: &Uri) -> Self {
        let route = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        self.route = Some(route.to_string());
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn envelope_writes_its_status_and_route() {
        let uri: Uri = "/users/books/recently-visited/B42?from=home".parse().unwrap();
        let response = Envelope::created("created", serde_json::json!({"bookId": "B42"}))
            .with_route(&uri)
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 201);
        assert_eq!(body["data"]["bookId"], "B42");
        assert_eq!(body["route"], "/users/books/recently-visited/B42?from=home");
    }

    #[test]
    fn route_is_omitted_until_set() {
        let envelope = Envelope::ok("ok", Vec::<u8>::new());
        let body = serde_json::to_value(&envelope).unwrap();
        assert!(body.get("route").is_none());
        assert_eq!(body["data"], serde_json::json!([]));
    }
}

//! HTTP request and response types.
//!
//! Velo uses the `http` crate's types end to end with a fully buffered
//! [`Full<Bytes>`] body. Handlers and middleware exchange these aliases
//! rather than generic body types.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;

/// The request type that flows through routing, middleware and handlers.
pub type Request = http::Request<Full<Bytes>>;

/// The response type produced by handlers and middleware.
pub type Response = http::Response<Full<Bytes>>;

/// Conversion of handler return values into HTTP responses.
///
/// A [`Response`] passes through unchanged; plain text values become a
/// `200 OK` response with the text as the body. This is what lets a
/// handler return `Ok("hello")` instead of building a response by hand.
pub trait IntoResponse {
    /// Converts the value into a [`Response`].
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        text(StatusCode::OK, self)
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        text(StatusCode::OK, self)
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Response {
        text(StatusCode::OK, "")
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        text(self, "")
    }
}

impl IntoResponse for (StatusCode, String) {
    fn into_response(self) -> Response {
        text(self.0, self.1)
    }
}

fn text(status: StatusCode, body: impl Into<Bytes>) -> Response {
    let mut response = http::Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
}

/// Convenience constructors for [`Response`].
pub trait ResponseExt {
    /// Builds a plain-text response with the given status.
    fn text(status: StatusCode, body: impl Into<Bytes>) -> Response;
}

impl ResponseExt for Response {
    fn text(status: StatusCode, body: impl Into<Bytes>) -> Response {
        text(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collect")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[test]
    fn string_becomes_ok_response() {
        let response = "hello".to_string().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(tokio_test::block_on(body_text(response)), "hello");
    }

    #[tokio::test]
    async fn str_becomes_ok_response() {
        let response = "hi".into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "hi");
    }

    #[test]
    fn response_passes_through_unchanged() {
        let mut original = Response::text(StatusCode::CREATED, "made");
        original
            .headers_mut()
            .insert("x-marker", http::HeaderValue::from_static("kept"));

        let coerced = original.into_response();
        assert_eq!(coerced.status(), StatusCode::CREATED);
        assert_eq!(coerced.headers().get("x-marker").map(|v| v.as_bytes()), Some(&b"kept"[..]));
    }

    #[test]
    fn status_tuple_sets_status_and_body() {
        let response = (StatusCode::ACCEPTED, "queued".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}

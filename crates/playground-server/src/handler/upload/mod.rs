//! The upload endpoint.
//!
//! `POST /api/upload` accepts either a `multipart/form-data` body carrying
//! the file in the configured form field, or a raw body whose `Content-Type`
//! decides the file extension. Every other method is answered with a plain
//! text `405 Method Not Allowed`.

mod dispatcher;
mod form;
mod raw;
mod strategy;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::routing::post;

pub use self::dispatcher::UploadDispatcher;
pub use self::form::FormUpload;
pub use self::raw::RawUpload;
pub use self::strategy::{UploadOutcome, UploadStrategy};
use crate::handler::{ErrorKind, Result};
use crate::handler::response::{FileInfo, ResponseEnvelope};
use crate::middleware::security::create_body_limit_layer;
use crate::service::ServiceState;
use crate::utility::tracing_targets::TRACING_TARGET_UPLOAD;

/// Stores the uploaded file and reports it.
async fn upload_file(
    State(dispatcher): State<UploadDispatcher>,
    request: Request,
) -> Result<ResponseEnvelope> {
    let stored = dispatcher.dispatch(request).await?;
    let file = FileInfo::from_file_name(&stored.name);

    tracing::info!(
        target: TRACING_TARGET_UPLOAD,
        file_name = %file.name,
        mime_type = %file.mime_type,
        size = stored.size,
        "file uploaded"
    );

    Ok(ResponseEnvelope::created(file))
}

/// Answers non-POST requests with a plain text body, outside the envelope.
async fn method_not_allowed() -> (StatusCode, &'static str) {
    let kind = ErrorKind::MethodNotAllowed;
    (kind.status_code(), kind.default_message())
}

/// Returns a [`Router`] with the upload routes.
pub fn routes<S>(state: &ServiceState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let dispatcher = UploadDispatcher::from_state(state);
    let upload = post(upload_file)
        .fallback(method_not_allowed)
        .layer(create_body_limit_layer(state.config().max_upload_size));

    Router::new()
        .route("/api/upload", upload.clone())
        .route("/api/upload/", upload)
        .with_state(dispatcher)
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum_test::multipart::{MultipartForm, Part};
    use bytes::Bytes;
    use futures::stream;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::handler::response::{FILE_CREATED_MESSAGE, ResponseEnvelope};
    use crate::handler::test::create_test_server_in;
    use crate::service::{ServiceConfig, ServiceState};

    fn text_part(content: &'static str, file_name: &str) -> Part {
        Part::bytes(content.as_bytes())
            .file_name(file_name)
            .mime_type("text/plain")
    }

    #[tokio::test]
    async fn multipart_upload_is_stored() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let form = MultipartForm::new().add_part("file", text_part("hello world", "test.txt"));
        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let envelope: ResponseEnvelope = response.json();
        assert_eq!(envelope.status, 201);
        assert_eq!(envelope.message, FILE_CREATED_MESSAGE);
        assert_eq!(envelope.error, None);

        let file = envelope.file.expect("file info should be present");
        assert_eq!(file.name, "test.txt");
        assert_eq!(file.mime_type, "text/plain");

        let content = tokio::fs::read_to_string(temp.path().join("upload/test.txt")).await?;
        assert_eq!(content, "hello world");
        Ok(())
    }

    #[tokio::test]
    async fn raw_upload_is_stored_with_derived_extension() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let response = server
            .post("/api/upload")
            .content_type("text/plain")
            .bytes(Bytes::from_static(b"binary payload"))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let envelope: ResponseEnvelope = response.json();
        let file = envelope.file.expect("file info should be present");
        assert_eq!(file.mime_type, "text/plain");

        let (stem, extension) = file
            .name
            .rsplit_once('.')
            .expect("generated name should have an extension");
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(
            mime_guess::from_ext(extension).first_raw(),
            Some("text/plain")
        );

        let content = tokio::fs::read(temp.path().join("upload").join(&file.name)).await?;
        assert_eq!(content, b"binary payload");
        Ok(())
    }

    #[tokio::test]
    async fn other_methods_are_not_allowed() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        for response in [
            server.get("/api/upload").await,
            server.put("/api/upload").await,
            server.delete("/api/upload/").await,
            server.patch("/api/upload").await,
        ] {
            response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
            response.assert_text("Method not allowed");
        }

        assert!(!temp.path().join("upload").exists());
        Ok(())
    }

    #[tokio::test]
    async fn successive_uploads_succeed() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        for (name, content) in [("first.txt", "one"), ("second.txt", "two")] {
            let form = MultipartForm::new().add_part("file", text_part(content, name));
            let response = server.post("/api/upload/").multipart(form).await;
            response.assert_status(axum::http::StatusCode::CREATED);
        }

        let upload_dir = temp.path().join("upload");
        assert_eq!(tokio::fs::read_to_string(upload_dir.join("first.txt")).await?, "one");
        assert_eq!(tokio::fs::read_to_string(upload_dir.join("second.txt")).await?, "two");
        Ok(())
    }

    #[tokio::test]
    async fn same_name_overwrites_previous_upload() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        for content in ["the first and longer version", "v2"] {
            let form = MultipartForm::new().add_part("file", text_part(content, "same.txt"));
            server
                .post("/api/upload")
                .multipart(form)
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let content = tokio::fs::read_to_string(temp.path().join("upload/same.txt")).await?;
        assert_eq!(content, "v2");
        Ok(())
    }

    #[tokio::test]
    async fn unsupported_media_type_is_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let response = server
            .post("/api/upload")
            .content_type("application/x-not-registered")
            .bytes(Bytes::from_static(b"data"))
            .await;

        response.assert_status(axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let envelope: ResponseEnvelope = response.json();
        assert_eq!(envelope.status, 415);
        assert!(envelope.error.is_some_and(|error| !error.is_empty()));
        assert!(envelope.file.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn missing_form_field_is_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let form = MultipartForm::new()
            .add_text("comment", "no file here")
            .add_part("attachment", text_part("wrong field", "other.txt"));
        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
        let envelope: ResponseEnvelope = response.json();
        assert_eq!(envelope.status, 400);
        assert!(envelope.error.is_some_and(|error| error.contains("'file'")));
        assert!(!temp.path().join("upload/other.txt").exists());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_multipart_is_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let response = server
            .post("/api/upload")
            .content_type("multipart/form-data; boundary=XYZ")
            .bytes(Bytes::from_static(b"this is not a multipart body"))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/upload")
            .content_type("multipart/form-data")
            .bytes(Bytes::from_static(b"--XYZ--"))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn traversal_names_stay_inside_the_upload_dir() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let form = MultipartForm::new()
            .add_part("file", text_part("contained", "../../escape.txt"));
        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let envelope: ResponseEnvelope = response.json();
        assert_eq!(envelope.file.map(|file| file.name).as_deref(), Some("escape.txt"));
        assert!(temp.path().join("upload/escape.txt").exists());
        assert!(!temp.path().join("escape.txt").exists());
        Ok(())
    }

    #[tokio::test]
    async fn unusable_file_names_are_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let form = MultipartForm::new().add_part("file", text_part("dots", ".."));
        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn overlong_file_names_are_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let file_name = format!("{}.txt", "a".repeat(300));
        let form = MultipartForm::new().add_part("file", text_part("long name", &file_name));
        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let envelope: ResponseEnvelope = response.json();
        assert_eq!(envelope.status, 400);
        assert!(
            envelope
                .error
                .is_some_and(|error| error.starts_with("Invalid file name"))
        );
        assert!(!temp.path().join("upload").join(&file_name).exists());
        Ok(())
    }

    #[tokio::test]
    async fn streamed_multipart_above_the_cap_is_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let config = ServiceConfig::builder()
            .with_upload_dir(temp.path().join("upload"))
            .with_max_upload_size(64usize)
            .build()?;
        let state = ServiceState::from_config(&config)?;
        let app: Router = super::routes(&state);

        let chunks = [
            "--boundary\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"big.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n"
                .to_owned(),
            "x".repeat(640),
            "\r\n--boundary--\r\n".to_owned(),
        ];
        let body = Body::from_stream(stream::iter(
            chunks.map(|chunk| Ok::<_, std::io::Error>(Bytes::from(chunk))),
        ));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=boundary")
            .body(body)?;
        assert!(request.headers().get(header::CONTENT_LENGTH).is_none());

        let response = app.oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let envelope = ResponseEnvelope::from_json(&body)?;
        assert_eq!(envelope.status, 413);
        assert!(
            envelope
                .error
                .is_some_and(|error| error.starts_with("The request body exceeds the upload limit"))
        );
        assert!(envelope.file.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn oversized_uploads_are_rejected() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let config = ServiceConfig::builder()
            .with_upload_dir(temp.path().join("upload"))
            .with_max_upload_size(16usize)
            .build()?;
        let server = crate::handler::test::create_test_server_with_config(&config)?;

        let response = server
            .post("/api/upload")
            .content_type("text/plain")
            .bytes(Bytes::from_static(b"this body is longer than sixteen bytes"))
            .await;
        response.assert_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE);

        let form = MultipartForm::new()
            .add_part("file", text_part("also far too long for the limit", "big.txt"));
        let response = server.post("/api/upload").multipart(form).await;
        response.assert_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE);
        Ok(())
    }

    #[tokio::test]
    async fn responses_are_json_envelopes() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let server = create_test_server_in(&temp)?;

        let response = server
            .post("/api/upload")
            .content_type("application/x-not-registered")
            .bytes(Bytes::from_static(b"data"))
            .await;

        assert_eq!(response.header(header::CONTENT_TYPE), "application/json");
        assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), "nosniff");
        Ok(())
    }
}

use {
    actix_web::{http::{header::ContentType, StatusCode}, HttpResponse, ResponseError},
    tracing::error,
    crate::templates::Templates,
};

/// Failures that escape a handler. Rendered as the generic error page.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("failed to render page: {0}")]
    Template(#[from] minijinja::Error),
}

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let detail = self.to_string();
        error!("request failed: {}", detail);

        // the page templates may be what failed, so the error page is compiled separately
        match Templates::new().and_then(|templates| templates.error(&detail)) {
            Ok(page) => HttpResponse::build(self.status_code())
                .content_type(ContentType::html())
                .body(page),
            Err(_) => HttpResponse::build(self.status_code())
                .content_type(ContentType::plaintext())
                .body(format!("Internal server error: {}", detail)),
        }
    }
}

use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup, etag: Option<&str>) -> ResultResp {
    let mut builder = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref());
    if let Some(tag) = etag {
        builder = builder.header("ETag", format!("\"{tag}\""));
    }

    builder
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

pub fn json_response(value: &serde_json::Value) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(value.to_string()))
        .map_err(|_| ServerError::InternalError)
}

/// 303 so a form POST lands on a GET.
pub fn redirect(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

pub fn not_modified(etag: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(304)
        .header("ETag", format!("\"{etag}\""))
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

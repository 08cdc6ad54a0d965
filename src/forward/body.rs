//! Body normalization.
//!
//! # Responsibilities
//! - Decide once per request how the body is interpreted
//! - Buffer the inbound body within the configured limit
//! - Validate and re-serialize JSON, parse multipart forms
//!
//! # Design Decisions
//! - The interpretation is an explicit policy chosen from method, declared
//!   Content-Type and login status, not probed at each use site
//! - Normalization returns `Result`; a rejected body never reaches the
//!   network
//! - The login endpoint tolerates mislabelled JSON: it tries a parse and
//!   falls back to the raw text

use std::future::poll_fn;
use std::pin::Pin;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{FromRequest, Multipart, Request},
    http::{header, Method, StatusCode},
};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::error::GatewayError;
use crate::security::headers::method_has_body;

/// How the inbound body is read and forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    /// GET, DELETE, OPTIONS: nothing is read or forwarded.
    None,
    /// Declared JSON: must parse, forwarded re-serialized.
    Json,
    /// Login with a non-JSON declared type: JSON if it parses, raw otherwise.
    LenientJson,
    /// Declared multipart: parsed into parts and re-encoded.
    Multipart,
    /// Anything else: bytes forwarded unchanged.
    Raw,
}

/// Pick the body policy for a request.
///
/// `content_type` is expected lowercased.
pub fn body_policy(method: &Method, content_type: Option<&str>, is_login: bool) -> BodyPolicy {
    if !method_has_body(method) {
        return BodyPolicy::None;
    }
    let content_type = content_type.unwrap_or_default();
    if content_type.contains("application/json") {
        BodyPolicy::Json
    } else if is_login && *method == Method::POST {
        BodyPolicy::LenientJson
    } else if content_type.contains("multipart/form-data") {
        BodyPolicy::Multipart
    } else {
        BodyPolicy::Raw
    }
}

/// One field of a parsed multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A normalized body, resolved once per request.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardBody {
    Empty,
    Json(Value),
    Raw(Bytes),
    Multipart(Vec<FormPart>),
}

impl ForwardBody {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardBody::Empty => "empty",
            ForwardBody::Json(_) => "json",
            ForwardBody::Raw(_) => "raw",
            ForwardBody::Multipart(_) => "multipart",
        }
    }
}

/// The policies whose body is buffered whole before interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferedPolicy {
    Json,
    LenientJson,
    Raw,
}

/// Interpret a buffered body.
pub fn normalize_bytes(bytes: Bytes, policy: BufferedPolicy) -> Result<ForwardBody, GatewayError> {
    match policy {
        BufferedPolicy::Json => serde_json::from_slice(&bytes)
            .map(ForwardBody::Json)
            .map_err(GatewayError::MalformedJson),
        BufferedPolicy::LenientJson => Ok(match serde_json::from_slice(&bytes) {
            Ok(value) => ForwardBody::Json(value),
            Err(_) => ForwardBody::Raw(bytes),
        }),
        BufferedPolicy::Raw => Ok(ForwardBody::Raw(bytes)),
    }
}

/// Read and normalize the body of `request` under `policy`.
pub async fn read_body(
    request: Request,
    policy: BodyPolicy,
    limit: usize,
) -> Result<ForwardBody, GatewayError> {
    match policy {
        BodyPolicy::None => Ok(ForwardBody::Empty),
        BodyPolicy::Multipart => read_multipart(request, limit).await,
        BodyPolicy::Json => read_buffered(request, BufferedPolicy::Json, limit).await,
        BodyPolicy::LenientJson => read_buffered(request, BufferedPolicy::LenientJson, limit).await,
        BodyPolicy::Raw => read_buffered(request, BufferedPolicy::Raw, limit).await,
    }
}

async fn read_buffered(
    request: Request,
    policy: BufferedPolicy,
    limit: usize,
) -> Result<ForwardBody, GatewayError> {
    let declared_len = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > limit) {
        return Err(GatewayError::PayloadTooLarge { limit });
    }
    let bytes = read_bytes(request.into_body(), limit).await?;
    normalize_bytes(bytes, policy)
}

/// Buffer `body`, failing with 413 as soon as it grows past `limit`.
///
/// Covers bodies without a usable Content-Length (chunked uploads), so the
/// status matches the declared-length check in `read_buffered`.
async fn read_bytes(mut body: Body, limit: usize) -> Result<Bytes, GatewayError> {
    let mut buf = Vec::new();
    while let Some(frame) = poll_fn(|cx| Pin::new(&mut body).poll_frame(cx)).await {
        let frame = frame.map_err(|e| GatewayError::BodyRead(e.to_string()))?;
        // trailers carry no payload
        let Ok(data) = frame.into_data() else {
            continue;
        };
        if buf.len() + data.len() > limit {
            return Err(GatewayError::PayloadTooLarge { limit });
        }
        buf.extend_from_slice(&data);
    }
    Ok(Bytes::from(buf))
}

async fn read_multipart(request: Request, limit: usize) -> Result<ForwardBody, GatewayError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| GatewayError::MalformedMultipart(e.to_string()))?;

    let mut parts = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(e, limit)),
        };
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        parts.push(FormPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(ForwardBody::Multipart(parts))
}

fn multipart_error(err: axum::extract::multipart::MultipartError, limit: usize) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge { limit }
    } else {
        GatewayError::MalformedMultipart(err.to_string())
    }
}

/// Re-encode parsed parts as an outbound multipart form.
pub fn build_form(parts: Vec<FormPart>) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    for part in parts {
        let mut outbound = Part::bytes(part.data.to_vec());
        if let Some(file_name) = part.file_name {
            outbound = outbound.file_name(file_name);
        }
        if let Some(content_type) = part.content_type {
            outbound = outbound
                .mime_str(&content_type)
                .map_err(|e| GatewayError::MalformedMultipart(e.to_string()))?;
        }
        form = form.part(part.name, outbound);
    }
    Ok(form)
}

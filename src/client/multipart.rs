//! Single-file `multipart/form-data` bodies.
//!
//! [`MultipartAssembler`] turns one local file into a complete request body
//! plus the matching `Content-Type` header value. Each assembler carries its
//! own boundary; [`MultipartAssembler::new`] draws a fresh random one, so a new
//! assembler is created for every upload.
//!
//! # Body Layout
//!
//! ```text
//! --{boundary}\r\n
//! Content-Disposition: form-data; name="file"; filename="{name}\r\n
//! Content-Type: {mime}\r\n
//! \r\n
//! {file bytes}\r\n
//! --{boundary}--\r\n
//! ```
//!
//! The MIME type comes from the file extension through a [`MimeLookup`] and
//! falls back to `application/octet-stream`.

use bytes::{BufMut, Bytes, BytesMut};
use std::path::Path;

const CRLF: &str = "\r\n";
const FALLBACK_MIME: &str = "application/octet-stream";

/// Maps a file extension to a MIME type.
pub trait MimeLookup: Send + Sync {
    /// MIME type for `extension` (without the leading dot), if known.
    fn mime_type(&self, extension: &str) -> Option<String>;
}

/// Extension lookup backed by `mime_guess`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessMime;

impl MimeLookup for GuessMime {
    fn mime_type(&self, extension: &str) -> Option<String> {
        mime_guess::from_ext(extension).first_raw().map(str::to_string)
    }
}

/// Encoded multipart body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    /// Complete request body
    pub body: Bytes,
    /// `Content-Type` header value, including the boundary
    pub content_type: String,
}

/// Builds single-file multipart bodies.
#[derive(Debug, Clone)]
pub struct MultipartAssembler<M = GuessMime> {
    boundary: String,
    mime: M,
}

impl MultipartAssembler<GuessMime> {
    /// Assembler with a random boundary and `mime_guess` lookup.
    pub fn new() -> Self {
        Self::with_boundary(uuid::Uuid::new_v4().to_string())
    }

    /// Assembler with a fixed boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        MultipartAssembler {
            boundary: boundary.into(),
            mime: GuessMime,
        }
    }
}

impl Default for MultipartAssembler<GuessMime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MimeLookup> MultipartAssembler<M> {
    /// Replace the MIME lookup.
    pub fn with_mime_lookup<N: MimeLookup>(self, mime: N) -> MultipartAssembler<N> {
        MultipartAssembler {
            boundary: self.boundary,
            mime,
        }
    }

    /// Boundary token used by this assembler.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `Content-Type` header value for bodies from this assembler.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Read `path` and encode it as the `file` form field.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while reading the file.
    pub async fn assemble(&self, path: &Path) -> std::io::Result<MultipartBody> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(MultipartBody {
            body: self.encode(&file_name, &contents),
            content_type: self.content_type(),
        })
    }

    /// Encode in-memory `contents` as if read from a file named `file_name`.
    pub fn encode(&self, file_name: &str, contents: &[u8]) -> Bytes {
        let mime_type = self.mime_for(file_name);
        let mut body = BytesMut::with_capacity(contents.len() + 256);

        body.put_slice(format!("--{}{CRLF}", self.boundary).as_bytes());
        body.put_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}{CRLF}")
                .as_bytes(),
        );
        body.put_slice(format!("Content-Type: {mime_type}{CRLF}{CRLF}").as_bytes());
        body.put_slice(contents);
        body.put_slice(CRLF.as_bytes());
        body.put_slice(format!("--{}--{CRLF}", self.boundary).as_bytes());

        body.freeze()
    }

    fn mime_for(&self, file_name: &str) -> String {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.mime.mime_type(ext))
            .unwrap_or_else(|| FALLBACK_MIME.to_string())
    }
}

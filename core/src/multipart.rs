//! `multipart/form-data` encoding for single-file uploads.
//!
//! Both image endpoints take exactly one part, so this only knows how to
//! write one file field. The boundary is a fresh v4 uuid per body, which
//! cannot collide with JPEG content in practice.

use uuid::Uuid;

/// An encoded form body plus the `content-type` header value announcing its
/// boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub content_type: String,
    pub body: Vec<u8>,
}

pub fn encode_file_part(field: &str, filename: &str, content_type: &str, bytes: &[u8]) -> MultipartBody {
    let boundary = format!("noseprint-{}", Uuid::new_v4().simple());

    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n").as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body,
    }
}

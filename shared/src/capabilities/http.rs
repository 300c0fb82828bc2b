//! Request bodies and error mapping for `crux_http`.

use crux_http::Response;

use crate::{AppError, ErrorKind};

pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const APPLICATION_JSON: &str = "application/json";

/// What the HTTP capability hands back to `update`. Any 4xx/5xx status
/// arrives as `crux_http::Error::Http` with the body attached.
pub type HttpResult = crux_http::Result<Response<Vec<u8>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilePart {
    name: String,
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// A `multipart/form-data` body under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<FilePart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(format!("----doctorai-{}", uuid::Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.parts.push(FilePart {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        });
        self
    }

    #[must_use]
    pub fn content_type(&self) -> String {
        format!("{MULTIPART_FORM_DATA}; boundary={}", self.boundary)
    }

    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        let payload: usize = self.parts.iter().map(|p| p.data.len() + 128).sum();
        let mut body = Vec::with_capacity(payload + self.boundary.len() + 8);

        for part in self.parts {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    quote_param(&part.name),
                    quote_param(&part.filename)
                )
                .as_bytes(),
            );
            body.extend_from_slice(
                format!("Content-Type: {}\r\n\r\n", header_value(&part.content_type)).as_bytes(),
            );
            body.extend_from_slice(&part.data);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        body
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Part headers are single lines.
fn header_value(value: &str) -> String {
    value.chars().filter(|c| !c.is_control()).collect()
}

fn quote_param(value: &str) -> String {
    header_value(value)
        .chars()
        .map(|c| if c == '"' { '\'' } else { c })
        .collect()
}

impl From<crux_http::Error> for AppError {
    fn from(error: crux_http::Error) -> Self {
        let internal = error.to_string();
        let app_error = match error {
            crux_http::Error::Http(http) => {
                AppError::from_http_status(u16::from(http.code), http.body.as_deref())
            }
            crux_http::Error::Timeout => AppError::new(ErrorKind::Timeout, "Request timed out"),
            crux_http::Error::Io(_) => AppError::new(ErrorKind::Network, "Network request failed"),
            crux_http::Error::Json(_) => {
                AppError::new(ErrorKind::Deserialization, "Unexpected response from server")
            }
            crux_http::Error::Url(_) => AppError::new(ErrorKind::Internal, "Invalid request"),
        };
        app_error.with_internal(internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_body_layout() {
        let form = MultipartForm::with_boundary("XYZ").file(
            "file",
            "scan.png",
            "image/png",
            vec![1, 2, 3],
        );
        assert_eq!(form.content_type(), "multipart/form-data; boundary=XYZ");

        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"file\"; filename=\"scan.png\"\r\nContent-Type: image/png\r\n\r\n",
        );
        expected.extend_from_slice(&[1, 2, 3]);
        expected.extend_from_slice(b"\r\n--XYZ--\r\n");
        assert_eq!(form.into_body(), expected);
    }

    #[test]
    fn test_multipart_headers_stay_on_one_line() {
        let body = MultipartForm::with_boundary("B")
            .file(
                "file",
                "a\"b\r\n.png",
                "image/png\r\nx-injected: 1",
                Vec::new(),
            )
            .into_body();
        let text = String::from_utf8(body).unwrap();

        assert!(text.contains("filename=\"a'b.png\""));
        assert!(text.contains("Content-Type: image/pngx-injected: 1\r\n"));
        assert!(!text.lines().any(|line| line.starts_with("x-injected")));
    }

    #[test]
    fn test_transport_errors() {
        let timeout: AppError = crux_http::Error::Timeout.into();
        assert_eq!(timeout.kind, ErrorKind::Timeout);
        assert!(timeout.is_retryable());

        let bad_url: AppError = crux_http::Error::Url("relative URL without a base".into()).into();
        assert_eq!(bad_url.kind, ErrorKind::Internal);

        let offline: AppError = crux_http::Error::Io("connection refused".into()).into();
        assert_eq!(offline.kind, ErrorKind::Network);
        assert_eq!(
            offline.internal_message.as_deref(),
            Some("IO error: connection refused")
        );
    }
}

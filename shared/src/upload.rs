//! Client-side checks for dropped image files. Nothing here touches the
//! network; a file that fails is never stored or sent.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AppError, ErrorKind, ACCEPTED_IMAGE_EXTENSIONS, MAX_UPLOAD_BYTES};

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("file is empty")]
    Empty,

    #[error("'{mime_type}' is not an image type")]
    NotAnImage { mime_type: String },

    #[error("extension '{extension}' is not accepted")]
    UnsupportedExtension { extension: String },

    #[error("file is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("file contents do not look like an accepted image ({detected})")]
    ContentMismatch { detected: String },
}

impl From<UploadError> for AppError {
    fn from(error: UploadError) -> Self {
        let internal = error.to_string();
        match error {
            UploadError::TooLarge { size, .. } => {
                AppError::new(ErrorKind::ImageTooLarge, "File size should be less than 10MB")
                    .with_context("size", size.to_string())
            }
            UploadError::Empty
            | UploadError::NotAnImage { .. }
            | UploadError::UnsupportedExtension { .. }
            | UploadError::ContentMismatch { .. } => {
                AppError::new(ErrorKind::ImageFormatUnsupported, "Please upload an image file")
            }
        }
        .with_internal(internal)
    }
}

/// Validates a dropped file in the order a user would expect to hear about
/// problems: type first, then size, then the bytes themselves.
pub fn validate_image(
    name: &str,
    mime_type: &str,
    bytes: Vec<u8>,
) -> Result<UploadedFile, UploadError> {
    let mime = mime_type.trim().to_ascii_lowercase();
    if !is_image_mime(&mime) {
        return Err(UploadError::NotAnImage {
            mime_type: mime_type.escape_default().to_string(),
        });
    }

    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ACCEPTED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedExtension { extension });
    }

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            max: MAX_UPLOAD_BYTES,
        });
    }

    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }

    match image::guess_format(&bytes) {
        Ok(ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif) => {}
        Ok(other) => {
            return Err(UploadError::ContentMismatch {
                detected: format!("{other:?}"),
            })
        }
        Err(_) => {
            return Err(UploadError::ContentMismatch {
                detected: "unknown".to_string(),
            })
        }
    }

    Ok(UploadedFile {
        name: name.to_string(),
        mime_type: mime,
        bytes,
    })
}

/// A bare `image/<subtype>`: no parameters, whitespace or control characters.
fn is_image_mime(mime: &str) -> bool {
    mime.strip_prefix("image/").is_some_and(|subtype| {
        !subtype.is_empty()
            && subtype
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"!#$&-^_.+".contains(&b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];

    #[test]
    fn test_accepts_png_and_jpeg() {
        let file = validate_image("scan.PNG", "image/png", PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(file.name, "scan.PNG");
        assert_eq!(file.size(), PNG_MAGIC.len());

        assert!(validate_image("xray.jpeg", "image/jpeg", JPEG_MAGIC.to_vec()).is_ok());
    }

    #[test]
    fn test_rejects_non_image_mime() {
        let err = validate_image("notes.pdf", "application/pdf", b"%PDF-1.4".to_vec()).unwrap_err();
        assert!(matches!(err, UploadError::NotAnImage { .. }));

        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::ImageFormatUnsupported);
    }

    #[test]
    fn test_rejects_mime_with_extra_header_text() {
        for mime in [
            "image/png\r\nx-injected: 1",
            "image/png; charset=binary",
            "image/ png",
            "image/",
            "image/png\0",
        ] {
            let err = validate_image("a.png", mime, PNG_MAGIC.to_vec()).unwrap_err();
            assert!(matches!(err, UploadError::NotAnImage { .. }), "{mime:?}");
        }

        let err = validate_image("a.png", "image/png\r\nx-injected: 1", PNG_MAGIC.to_vec())
            .unwrap_err();
        assert!(!err.to_string().contains('\n'));

        let file = validate_image("a.png", " Image/PNG ", PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(file.mime_type, "image/png");
    }

    #[test]
    fn test_rejects_unaccepted_extension() {
        let err = validate_image("scan.bmp", "image/bmp", b"BM".to_vec()).unwrap_err();
        assert_eq!(
            err,
            UploadError::UnsupportedExtension {
                extension: "bmp".into()
            }
        );
        assert!(validate_image("noext", "image/png", PNG_MAGIC.to_vec()).is_err());
    }

    #[test]
    fn test_rejects_oversized() {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.resize(MAX_UPLOAD_BYTES + 1, 0);
        let err = validate_image("big.png", "image/png", bytes).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));

        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::ImageTooLarge);
        assert_eq!(app.message, "File size should be less than 10MB");
    }

    #[test]
    fn test_rejects_disguised_content() {
        let err = validate_image("fake.png", "image/png", b"hello world".to_vec()).unwrap_err();
        assert!(matches!(err, UploadError::ContentMismatch { .. }));

        assert_eq!(
            validate_image("empty.png", "image/png", Vec::new()).unwrap_err(),
            UploadError::Empty
        );
    }
}

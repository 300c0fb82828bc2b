//! JSON values in the shell's key/value store (browser `localStorage` or the
//! platform equivalent), on top of `crux_kv`.

use crux_kv::error::KeyValueError;
use serde::{de::DeserializeOwned, Serialize};

use crate::{AppError, ErrorKind};

pub const MAX_VALUE_SIZE: usize = 64 * 1024;

/// What `KeyValue::get` and `KeyValue::set` report back: the stored (or
/// previously stored) bytes, `None` when the key was never written.
pub type KvResult = Result<Option<Vec<u8>>, KeyValueError>;

pub fn encode_json<T: Serialize>(key: &str, value: &T) -> Result<Vec<u8>, AppError> {
    let bytes = serde_json::to_vec(value).map_err(|e| {
        AppError::new(ErrorKind::Serialization, "Local storage operation failed")
            .with_internal(e.to_string())
            .with_context("key", key)
    })?;

    if bytes.len() > MAX_VALUE_SIZE {
        return Err(
            AppError::new(ErrorKind::Storage, "Local storage operation failed")
                .with_internal(format!(
                    "value of {} bytes exceeds maximum of {MAX_VALUE_SIZE}",
                    bytes.len()
                ))
                .with_context("key", key),
        );
    }
    Ok(bytes)
}

pub fn decode_json<T: DeserializeOwned>(result: KvResult) -> Result<Option<T>, AppError> {
    match result? {
        None => Ok(None),
        Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            AppError::new(ErrorKind::Deserialization, "Local storage operation failed")
                .with_internal(e.to_string())
        }),
    }
}

impl From<KeyValueError> for AppError {
    fn from(error: KeyValueError) -> Self {
        let kind = match &error {
            KeyValueError::Timeout => ErrorKind::Timeout,
            KeyValueError::Io { .. } | KeyValueError::Other { .. } => ErrorKind::Storage,
            KeyValueError::CursorNotFound => ErrorKind::Internal,
        };
        AppError::new(kind, "Local storage operation failed").with_internal(error.to_string())
    }
}

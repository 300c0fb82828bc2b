//! Request builders and response parsers for the prediction service.
//!
//! Builders produce an [`ApiRequest`] that is handed to `crux_http`; the
//! shell performs it. No retries, batching or auth headers are added here.

use crux_http::{Http, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

use crate::capabilities::http::{HttpResult, MultipartForm, APPLICATION_JSON};
use crate::config::ApiConfig;
use crate::i18n::{tr, Locale};
use crate::upload::UploadedFile;
use crate::{AppError, AppResult, ErrorKind};

pub const PALM_FEATURE_COUNT: usize = 5;
pub const PALM_DISEASE_PATH: &str = "/api/palm_disease";
pub const CHAT_PATH: &str = "/api/chatbot";
const FILE_FIELD: &str = "file";

/// The six image classifiers exposed by the prediction service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagingModel {
    #[default]
    BoneFracture,
    LungColon,
    Monkeypox,
    SkinCancer,
    Tumor,
    Xray,
}

impl ImagingModel {
    pub const ALL: [Self; 6] = [
        Self::BoneFracture,
        Self::LungColon,
        Self::Monkeypox,
        Self::SkinCancer,
        Self::Tumor,
        Self::Xray,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::BoneFracture => "bone_fracture",
            Self::LungColon => "lung_colon",
            Self::Monkeypox => "monkeypox",
            Self::SkinCancer => "skin_cancer",
            Self::Tumor => "tumor",
            Self::Xray => "xray",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::BoneFracture => "/api/bone_fracture",
            Self::LungColon => "/api/lung_colon",
            Self::Monkeypox => "/api/monkeypox",
            Self::SkinCancer => "/api/skin_cancer",
            Self::Tumor => "/api/tumor",
            Self::Xray => "/api/xray",
        }
    }

    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match self {
            Self::BoneFracture => tr(locale, "Bone Fracture", "كسر العظام"),
            Self::LungColon => tr(locale, "Lung & Colon Cancer", "سرطان الرئة والقولون"),
            Self::Monkeypox => tr(locale, "Monkeypox", "جدري القرود"),
            Self::SkinCancer => tr(locale, "Skin Cancer", "سرطان الجلد"),
            Self::Tumor => tr(locale, "Brain Tumor", "ورم الدماغ"),
            Self::Xray => tr(locale, "Chest X-ray", "أشعة الصدر"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub condition: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub confidence: Option<f64>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    text: &'a str,
}

// Both `{condition|result, confidence}` and `{prediction: {class}, confidence}`
// appear in the wild.
#[derive(Deserialize)]
struct RawPrediction {
    #[serde(default, alias = "result")]
    condition: Option<String>,
    #[serde(default)]
    prediction: Option<NestedClass>,
    confidence: Option<f64>,
}

#[derive(Deserialize)]
struct NestedClass {
    class: String,
}

/// A POST to the prediction service with its body already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub content_type: String,
    pub body: Vec<u8>,
    /// Enforced by the app with a timer; `crux_http` requests carry no deadline.
    pub timeout: Duration,
}

impl ApiRequest {
    fn json<T: Serialize + ?Sized>(
        config: &ApiConfig,
        path: &str,
        value: &T,
        timeout: Duration,
    ) -> AppResult<Self> {
        let body = serde_json::to_vec(value).map_err(|e| {
            AppError::new(ErrorKind::Serialization, "Failed to encode request")
                .with_internal(e.to_string())
        })?;

        Ok(Self {
            url: config.endpoint(path)?,
            content_type: APPLICATION_JSON.to_string(),
            body,
            timeout,
        })
    }

    pub fn send<Ev, F>(self, http: &Http<Ev>, make_event: F)
    where
        Ev: 'static,
        F: FnOnce(HttpResult) -> Ev + Send + 'static,
    {
        tracing::debug!(url = %self.url, size = self.body.len(), "http request");
        http.post(&self.url)
            .body(self.body)
            .header("Content-Type", self.content_type.as_str())
            .send(make_event);
    }
}

#[instrument(level = "debug", skip_all, fields(model = model.id(), file = %file.name))]
pub fn predict_image(
    config: &ApiConfig,
    model: ImagingModel,
    file: &UploadedFile,
) -> AppResult<ApiRequest> {
    let form = MultipartForm::new().file(
        FILE_FIELD,
        file.name.clone(),
        file.mime_type.clone(),
        file.bytes.clone(),
    );

    Ok(ApiRequest {
        url: config.endpoint(model.path())?,
        content_type: form.content_type(),
        body: form.into_body(),
        timeout: config.prediction_timeout,
    })
}

#[instrument(level = "debug", skip(config))]
pub fn predict_palm_disease(
    config: &ApiConfig,
    features: &[f64; PALM_FEATURE_COUNT],
) -> AppResult<ApiRequest> {
    ApiRequest::json(
        config,
        PALM_DISEASE_PATH,
        features.as_slice(),
        config.prediction_timeout,
    )
}

#[instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn chat(config: &ApiConfig, text: &str) -> AppResult<ApiRequest> {
    ApiRequest::json(config, CHAT_PATH, &ChatRequest { text }, config.chat_timeout)
}

/// Checks the status and decodes a classifier response.
pub fn parse_prediction(response: &Response<Vec<u8>>) -> AppResult<Prediction> {
    let raw: RawPrediction = decode(response)?;

    let condition = raw
        .condition
        .or(raw.prediction.map(|p| p.class))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| malformed("missing condition"))?;

    let confidence = raw
        .confidence
        .ok_or_else(|| malformed("missing confidence"))
        .and_then(|c| normalize_confidence(c).ok_or_else(|| malformed("confidence out of range")))?;

    Ok(Prediction {
        condition,
        confidence,
    })
}

pub fn parse_chat(response: &Response<Vec<u8>>) -> AppResult<ChatReply> {
    let reply: ChatReply = decode(response)?;

    let text = reply.response.trim();
    if text.is_empty() {
        return Err(malformed("empty chat response"));
    }

    let confidence = reply
        .confidence
        .map(|c| normalize_confidence(c).ok_or_else(|| malformed("confidence out of range")))
        .transpose()?;

    Ok(ChatReply {
        response: text.to_string(),
        confidence,
    })
}

/// Confidence is a probability; anything outside `0..=1` is malformed.
fn normalize_confidence(value: f64) -> Option<f64> {
    (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(value)
}

fn decode<T: serde::de::DeserializeOwned>(response: &Response<Vec<u8>>) -> AppResult<T> {
    let status = u16::from(response.status());
    let body = response.body().map_or(&[][..], Vec::as_slice);

    if !response.status().is_success() {
        tracing::warn!(status, "prediction service returned an error status");
        return Err(AppError::from_http_status(status, Some(body)));
    }

    serde_json::from_slice(body).map_err(|e| malformed(&e.to_string()))
}

fn malformed(reason: &str) -> AppError {
    AppError::new(ErrorKind::Deserialization, "Unexpected response from server")
        .with_internal(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crux_http::http::StatusCode;
    use crux_http::testing::ResponseBuilder;
    use serde_json::json;

    fn file() -> UploadedFile {
        UploadedFile {
            name: "chest.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn response(body: &str) -> Response<Vec<u8>> {
        ResponseBuilder::ok().body(body.as_bytes().to_vec()).build()
    }

    #[test]
    fn test_endpoint_table() {
        let paths: Vec<_> = ImagingModel::ALL.iter().map(|m| m.path()).collect();
        assert_eq!(
            paths,
            vec![
                "/api/bone_fracture",
                "/api/lung_colon",
                "/api/monkeypox",
                "/api/skin_cancer",
                "/api/tumor",
                "/api/xray"
            ]
        );
        assert_eq!(ImagingModel::from_id("tumor"), Some(ImagingModel::Tumor));
        assert_eq!(ImagingModel::Tumor.label(Locale::Ar), "ورم الدماغ");
    }

    #[test]
    fn test_predict_image_builds_multipart() {
        let request = predict_image(&ApiConfig::default(), ImagingModel::Xray, &file()).unwrap();

        assert_eq!(request.url, "http://localhost:8000/api/xray");
        assert_eq!(request.timeout, Duration::from_secs(60));
        assert!(request
            .content_type
            .starts_with("multipart/form-data; boundary="));

        let body = String::from_utf8_lossy(&request.body).into_owned();
        assert!(body.contains("name=\"file\"; filename=\"chest.png\""));
        assert!(body.contains("Content-Type: image/png"));
    }

    #[test]
    fn test_palm_request_is_numeric_array() {
        let request =
            predict_palm_disease(&ApiConfig::default(), &[1.0, 2.5, 0.0, 10.0, 3.0]).unwrap();
        assert_eq!(request.url, "http://localhost:8000/api/palm_disease");
        assert_eq!(request.content_type, "application/json");
        assert_eq!(request.body, b"[1.0,2.5,0.0,10.0,3.0]".to_vec());
    }

    #[test]
    fn test_chat_request_body() {
        let request = chat(&ApiConfig::default(), "I have a headache").unwrap();
        assert_eq!(request.url, "http://localhost:8000/api/chatbot");
        assert_eq!(request.timeout, Duration::from_secs(30));
        assert_eq!(request.body, br#"{"text":"I have a headache"}"#.to_vec());
    }

    #[test]
    fn test_parse_prediction_shapes() {
        let p = parse_prediction(&response(r#"{"condition":"Fractured","confidence":0.92}"#))
            .unwrap();
        assert_eq!(p.condition, "Fractured");
        assert!((p.confidence - 0.92).abs() < f64::EPSILON);

        let p = parse_prediction(&response(r#"{"result":"normal","confidence":0.8}"#)).unwrap();
        assert_eq!(p.condition, "normal");

        let body = json!({"prediction": {"class": "Healthy", "class_index": 0}, "confidence": 0.7});
        let p = parse_prediction(&response(&body.to_string())).unwrap();
        assert_eq!(p.condition, "Healthy");

        let p = parse_prediction(&response(r#"{"condition":"glioma","confidence":1}"#)).unwrap();
        assert!((p.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_prediction_rejects_malformed() {
        for body in [
            "not json",
            r#"{"confidence":0.5}"#,
            r#"{"condition":"x"}"#,
            r#"{"condition":"  ","confidence":0.5}"#,
            r#"{"condition":"x","confidence":-0.1}"#,
            r#"{"condition":"x","confidence":1.01}"#,
            r#"{"condition":"x","confidence":87}"#,
        ] {
            let err = parse_prediction(&response(body)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Deserialization, "{body}");
        }
    }

    #[test]
    fn test_parse_prediction_non_success_status() {
        let response = ResponseBuilder::with_status(StatusCode::NotModified)
            .body(Vec::new())
            .build();
        let err = parse_prediction(&response).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.context.get("http_status").map(String::as_str), Some("304"));
    }

    #[test]
    fn test_parse_chat() {
        let reply = parse_chat(&response(r#"{"response":"  Drink water. "}"#)).unwrap();
        assert_eq!(reply.response, "Drink water.");
        assert_eq!(reply.confidence, None);

        assert!(parse_chat(&response(r#"{"response":""}"#)).is_err());
        assert_eq!(
            parse_chat(&response(r#"{"response":"ok","confidence":40}"#))
                .unwrap_err()
                .kind,
            ErrorKind::Deserialization
        );
    }
}

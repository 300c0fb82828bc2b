//! On-device inference over bundled ONNX models.
//!
//! The outputs are placeholders until trained models and their label maps
//! ship; the update loop does not call into this module.

use ndarray::{Array, Array2, Array4, Dimension};
use ort::session::Session;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::catalog::SYMPTOMS;
use crate::model::{AnalysisOutcome, Severity};
use crate::orchestration::normalize_symptom;
use crate::{AppError, ErrorKind};

pub const IMAGE_INPUT_SIZE: u32 = 224;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("{model} model not loaded")]
    ModelNotLoaded { model: &'static str },

    #[error("could not decode image")]
    Decode,

    #[error("inference engine error")]
    Engine,

    #[error("processing error: {0}")]
    Processing(String),
}

impl From<ort::Error> for InferenceError {
    fn from(e: ort::Error) -> Self {
        tracing::error!(error = %e, "onnx runtime error");
        Self::Engine
    }
}

impl From<InferenceError> for AppError {
    fn from(error: InferenceError) -> Self {
        let kind = match error {
            InferenceError::ModelNotLoaded { .. } => ErrorKind::InvalidState,
            InferenceError::Decode => ErrorKind::ImageFormatUnsupported,
            InferenceError::Engine | InferenceError::Processing(_) => ErrorKind::Internal,
        };
        AppError::new(kind, "Local analysis failed").with_internal(error.to_string())
    }
}

struct LoadedModels {
    image: Mutex<Session>,
    symptom: Mutex<Session>,
    chat: Mutex<Session>,
}

#[derive(Default)]
pub struct InferenceService {
    models: Option<LoadedModels>,
}

impl InferenceService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.models.is_some()
    }

    #[instrument(skip_all, fields(image = image.len(), symptom = symptom.len(), chat = chat.len()))]
    pub fn load_models(
        &mut self,
        image: &[u8],
        symptom: &[u8],
        chat: &[u8],
    ) -> Result<(), InferenceError> {
        let models = LoadedModels {
            image: Mutex::new(Session::builder()?.commit_from_memory(image)?),
            symptom: Mutex::new(Session::builder()?.commit_from_memory(symptom)?),
            chat: Mutex::new(Session::builder()?.commit_from_memory(chat)?),
        };
        self.models = Some(models);
        debug!("local models loaded");
        Ok(())
    }

    fn loaded(&self, model: &'static str) -> Result<&LoadedModels, InferenceError> {
        self.models
            .as_ref()
            .ok_or(InferenceError::ModelNotLoaded { model })
    }

    #[instrument(skip_all, fields(len = image_data.len()))]
    pub fn analyze_image(&self, image_data: &[u8]) -> Result<AnalysisOutcome, InferenceError> {
        let models = self.loaded("image")?;
        let input = preprocess_image(image_data)?;
        run_f32(&models.image, input)?;

        Ok(placeholder(0.95, Severity::Medium))
    }

    #[instrument(skip_all, fields(count = symptoms.len()))]
    pub fn analyze_symptoms(&self, symptoms: &[String]) -> Result<AnalysisOutcome, InferenceError> {
        let models = self.loaded("symptom")?;
        let input = encode_symptoms(symptoms);
        run_f32(&models.symptom, input)?;

        Ok(placeholder(0.85, Severity::Low))
    }

    #[instrument(skip_all, fields(len = message.len()))]
    pub fn generate_chat_response(&self, message: &str) -> Result<String, InferenceError> {
        let models = self.loaded("chat")?;

        let ids: Vec<i64> = message.bytes().map(i64::from).collect();
        let input = Array2::from_shape_vec((1, ids.len()), ids)
            .map_err(|e| InferenceError::Processing(e.to_string()))?;
        let input_value = ort::value::Value::from_array(input)?;

        let mut session = models
            .chat
            .lock()
            .map_err(|_| InferenceError::Processing("chat session lock poisoned".into()))?;
        session.run(ort::inputs![input_value])?;
        debug!("chat model ran");

        Ok("Sample response".to_string())
    }
}

fn placeholder(confidence: f64, severity: Severity) -> AnalysisOutcome {
    AnalysisOutcome {
        condition: "Sample Condition".to_string(),
        confidence,
        description: "Sample description".to_string(),
        recommendations: vec!["Sample recommendation".to_string()],
        severity,
    }
}

/// Decodes and resizes to a `[1, 3, 224, 224]` tensor scaled to `0..=1`.
fn preprocess_image(image_data: &[u8]) -> Result<Array4<f32>, InferenceError> {
    let decoded = image::load_from_memory(image_data).map_err(|_| InferenceError::Decode)?;
    let rgb = decoded
        .resize_exact(
            IMAGE_INPUT_SIZE,
            IMAGE_INPUT_SIZE,
            image::imageops::FilterType::Nearest,
        )
        .to_rgb8();

    let size = IMAGE_INPUT_SIZE as usize;
    Ok(Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| {
        #[allow(clippy::cast_possible_truncation)]
        let pixel = rgb.get_pixel(x as u32, y as u32);
        f32::from(pixel[c]) / 255.0
    }))
}

/// One-hot over the symptom catalogue, in catalogue order.
fn encode_symptoms(symptoms: &[String]) -> Array2<f32> {
    let selected: Vec<String> = symptoms.iter().map(|s| normalize_symptom(s)).collect();
    Array2::from_shape_fn((1, SYMPTOMS.len()), |(_, i)| {
        let id = normalize_symptom(SYMPTOMS[i].id);
        if selected.contains(&id) {
            1.0
        } else {
            0.0
        }
    })
}

fn run_f32<D>(session: &Mutex<Session>, input: Array<f32, D>) -> Result<Vec<f32>, InferenceError>
where
    D: Dimension + 'static,
{
    let input_value = ort::value::Value::from_array(input)?;

    let mut session = session
        .lock()
        .map_err(|_| InferenceError::Processing("session lock poisoned".into()))?;
    let outputs = session.run(ort::inputs![input_value])?;

    let output = outputs
        .get("output")
        .ok_or_else(|| InferenceError::Processing("model missing output node".into()))?;
    let (_, data) = output.try_extract_tensor::<f32>()?;
    Ok(data.to_vec())
}

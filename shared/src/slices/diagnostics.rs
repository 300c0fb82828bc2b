use serde::{Deserialize, Serialize};

use crate::gateway::ImagingModel;
use crate::model::{DiagnosisType, DiagnosticResult, ResultId};
use crate::upload::UploadedFile;
use crate::AppError;

/// Which workflow produced a result or an error.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Imaging(ImagingModel),
    PalmDisease,
    Symptoms,
    Chat,
}

impl AnalysisKind {
    #[must_use]
    pub const fn diagnosis_type(self) -> DiagnosisType {
        match self {
            Self::Imaging(_) => DiagnosisType::Imaging,
            Self::PalmDisease | Self::Symptoms => DiagnosisType::Symptoms,
            Self::Chat => DiagnosisType::Chat,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Imaging(model) => model.id(),
            Self::PalmDisease => "palm_disease",
            Self::Symptoms => "symptoms",
            Self::Chat => "chat",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScopedError {
    pub kind: AnalysisKind,
    pub error: AppError,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SelectedImage {
    pub file: UploadedFile,
    pub preview_url: String,
}

#[derive(Debug, Default)]
pub struct DiagnosticsState {
    /// Newest first.
    pub results: Vec<DiagnosticResult>,
    pub current_result: Option<DiagnosticResult>,
    pub is_analyzing: bool,
    pub pending: Option<AnalysisKind>,
    pub selected_image: Option<SelectedImage>,
    /// Insertion ordered, never contains duplicates.
    pub selected_symptoms: Vec<String>,
    pub error: Option<ScopedError>,
}

impl DiagnosticsState {
    /// Replaces (or clears) the selected image. Returns the previous preview
    /// URL when nothing else references it any more and it can be released.
    pub fn set_selected_image(&mut self, image: Option<SelectedImage>) -> Option<String> {
        let previous = std::mem::replace(&mut self.selected_image, image)?;
        let url = previous.preview_url;

        let reused = self
            .selected_image
            .as_ref()
            .is_some_and(|img| img.preview_url == url);

        if reused || self.is_url_referenced(&url) {
            None
        } else {
            Some(url)
        }
    }

    #[must_use]
    pub fn is_url_referenced(&self, url: &str) -> bool {
        self.results
            .iter()
            .chain(self.current_result.iter())
            .any(|r| r.image_url.as_deref() == Some(url))
    }

    pub fn add_symptom(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.selected_symptoms.contains(&id) {
            return false;
        }
        self.selected_symptoms.push(id);
        true
    }

    pub fn remove_symptom(&mut self, id: &str) -> bool {
        let before = self.selected_symptoms.len();
        self.selected_symptoms.retain(|s| s != id);
        self.selected_symptoms.len() != before
    }

    pub fn clear_symptoms(&mut self) {
        self.selected_symptoms.clear();
    }

    pub fn set_current_result(&mut self, result: Option<DiagnosticResult>) {
        self.current_result = result;
    }

    /// Makes a stored result current. Unknown ids leave the state untouched.
    pub fn select_result(&mut self, id: &ResultId) -> bool {
        let Some(result) = self.results.iter().find(|r| &r.id == id).cloned() else {
            return false;
        };
        self.set_current_result(Some(result));
        true
    }

    /// Drops the whole history and returns preview URLs that are now unreferenced.
    pub fn clear_results(&mut self) -> Vec<String> {
        let selected = self
            .selected_image
            .as_ref()
            .map(|img| img.preview_url.as_str());

        let mut released: Vec<String> = Vec::new();
        for url in self
            .results
            .iter()
            .chain(self.current_result.iter())
            .filter_map(|r| r.image_url.as_deref())
        {
            if Some(url) != selected && !released.iter().any(|u| u == url) {
                released.push(url.to_string());
            }
        }

        self.results.clear();
        self.current_result = None;
        released
    }

    /// Marks an analysis as in flight. Returns `false` when one already is.
    pub fn begin_analysis(&mut self, kind: AnalysisKind) -> bool {
        if self.is_analyzing {
            return false;
        }
        self.is_analyzing = true;
        self.pending = Some(kind);
        self.error = None;
        true
    }

    pub fn complete_analysis(&mut self, result: DiagnosticResult) {
        self.is_analyzing = false;
        self.pending = None;
        self.set_current_result(Some(result.clone()));
        self.results.insert(0, result);
    }

    pub fn fail_analysis(&mut self, kind: AnalysisKind, error: AppError) {
        self.is_analyzing = false;
        self.pending = None;
        self.error = Some(ScopedError { kind, error });
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    #[must_use]
    pub fn error_for(&self, matches: impl Fn(AnalysisKind) -> bool) -> Option<&AppError> {
        self.error
            .as_ref()
            .filter(|scoped| matches(scoped.kind))
            .map(|scoped| &scoped.error)
    }
}

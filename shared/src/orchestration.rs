//! Turns gateway predictions and local triage into stored [`DiagnosticResult`]s.

use crate::catalog::ConditionTable;
use crate::gateway::{ChatReply, ImagingModel, Prediction, PALM_FEATURE_COUNT};
use crate::i18n::Locale;
use crate::model::{AnalysisOutcome, DiagnosisType, DiagnosticResult, ResultId, Severity};
use crate::UnixTimeMs;

const CHAT_DEFAULT_CONFIDENCE: f64 = 1.0;

/// One outcome of the local symptom rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriageRule {
    pub condition: &'static str,
    pub severity: Severity,
    pub confidence: f64,
}

pub const COMMON_COLD: TriageRule = TriageRule {
    condition: "Common cold",
    severity: Severity::Low,
    confidence: 0.75,
};

pub const CARDIOVASCULAR: TriageRule = TriageRule {
    condition: "Possible cardiovascular issue",
    severity: Severity::High,
    confidence: 0.65,
};

pub const NON_SPECIFIC: TriageRule = TriageRule {
    condition: "Non-specific symptoms",
    severity: Severity::Low,
    confidence: 0.60,
};

/// Folds a symptom id or label to lower-case words: `chestPain`,
/// `chest_pain` and `Chest Pain` all become `chest pain`.
#[must_use]
pub fn normalize_symptom(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 4);
    let mut prev: Option<char> = None;

    for c in id.trim().chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };

        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push(' ');
        }
        if c.is_whitespace() {
            if !out.ends_with(' ') && !out.is_empty() {
                out.push(' ');
            }
        } else {
            out.extend(c.to_lowercase());
        }
        prev = Some(c);
    }

    out.trim_end().to_string()
}

/// First matching rule wins.
#[must_use]
pub fn triage(symptoms: &[String]) -> TriageRule {
    let normalized: Vec<String> = symptoms.iter().map(|s| normalize_symptom(s)).collect();
    let has = |name: &str| normalized.iter().any(|s| s == name);

    if has("headache") && has("fever") {
        COMMON_COLD
    } else if has("chest pain") {
        CARDIOVASCULAR
    } else {
        NON_SPECIFIC
    }
}

/// Looks `condition` up in the shared table for `locale`. Unknown labels get
/// the generic fallback text and severity.
#[must_use]
pub fn outcome(condition: &str, confidence: f64, locale: Locale) -> AnalysisOutcome {
    let details = ConditionTable::global().details(condition, locale);
    if !details.known {
        tracing::debug!(condition, "condition not in table, using fallback");
    }

    AnalysisOutcome {
        condition: condition.to_string(),
        confidence: confidence.clamp(0.0, 1.0),
        description: details.description,
        recommendations: details.recommendations,
        severity: details.severity,
    }
}

fn new_result(
    diagnosis_type: DiagnosisType,
    result: AnalysisOutcome,
    now: UnixTimeMs,
) -> DiagnosticResult {
    DiagnosticResult {
        id: ResultId::generate(),
        diagnosis_type,
        result,
        timestamp: now,
        image_url: None,
        symptoms: None,
    }
}

#[must_use]
pub fn imaging_result(
    model: ImagingModel,
    prediction: &Prediction,
    image_url: Option<String>,
    locale: Locale,
    now: UnixTimeMs,
) -> DiagnosticResult {
    tracing::info!(
        model = model.id(),
        condition = %prediction.condition,
        confidence = prediction.confidence,
        "imaging analysis complete"
    );

    DiagnosticResult {
        image_url,
        ..new_result(
            DiagnosisType::Imaging,
            outcome(&prediction.condition, prediction.confidence, locale),
            now,
        )
    }
}

/// Palm results are filed with the symptom analyses; the feature vector is
/// kept as its textual values.
#[must_use]
pub fn palm_result(
    prediction: &Prediction,
    features: &[f64; PALM_FEATURE_COUNT],
    locale: Locale,
    now: UnixTimeMs,
) -> DiagnosticResult {
    tracing::info!(condition = %prediction.condition, "palm disease analysis complete");

    DiagnosticResult {
        symptoms: Some(features.iter().map(ToString::to_string).collect()),
        ..new_result(
            DiagnosisType::Symptoms,
            outcome(&prediction.condition, prediction.confidence, locale),
            now,
        )
    }
}

#[must_use]
pub fn symptom_result(symptoms: &[String], locale: Locale, now: UnixTimeMs) -> DiagnosticResult {
    let rule = triage(symptoms);
    tracing::info!(condition = rule.condition, count = symptoms.len(), "symptom triage complete");

    let mut analysis = outcome(rule.condition, rule.confidence, locale);
    analysis.severity = rule.severity;

    DiagnosticResult {
        symptoms: Some(symptoms.to_vec()),
        ..new_result(DiagnosisType::Symptoms, analysis, now)
    }
}

#[must_use]
pub fn chat_result(reply: &ChatReply, locale: Locale, now: UnixTimeMs) -> DiagnosticResult {
    let confidence = reply.confidence.unwrap_or(CHAT_DEFAULT_CONFIDENCE);
    new_result(
        DiagnosisType::Chat,
        outcome(&reply.response, confidence, locale),
        now,
    )
}

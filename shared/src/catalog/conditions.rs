use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::i18n::{LocalizedText, Locale};
use crate::model::Severity;

const EMBEDDED_TABLE: &str = include_str!("../../data/conditions.json");

static TABLE: LazyLock<ConditionTable> = LazyLock::new(|| {
    ConditionTable::parse(EMBEDDED_TABLE).unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded condition table is invalid, using fallback only");
        ConditionTable::empty()
    })
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEntry {
    pub id: String,
    /// The capability whose model emits this label.
    pub source: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub recommendations: Vec<LocalizedText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub severity: Severity,
    pub description: LocalizedText,
    pub recommendations: Vec<LocalizedText>,
}

impl Default for Fallback {
    fn default() -> Self {
        Self {
            severity: Severity::Medium,
            description: LocalizedText::new("Analysis complete.", "اكتمل التحليل."),
            recommendations: vec![LocalizedText::new(
                "Consult a healthcare professional for detailed diagnosis.",
                "استشر أخصائي رعاية صحية لتشخيص مفصل.",
            )],
        }
    }
}

#[derive(Deserialize)]
struct RawTable {
    version: u32,
    fallback: Fallback,
    conditions: Vec<ConditionEntry>,
}

/// Localized guidance for one condition label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionDetails {
    pub severity: Severity,
    pub description: String,
    pub recommendations: Vec<String>,
    /// `false` when the label was not in the table and defaults were used.
    pub known: bool,
}

/// Condition label → severity, description and recommendations, per locale.
#[derive(Debug, Clone)]
pub struct ConditionTable {
    version: u32,
    fallback: Fallback,
    entries: Vec<ConditionEntry>,
    exact: HashMap<String, usize>,
    folded: HashMap<String, usize>,
}

impl ConditionTable {
    /// The table shipped with the crate, parsed on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        &TABLE
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let raw: RawTable = serde_json::from_str(raw)?;
        Ok(Self::build(raw.version, raw.fallback, raw.conditions))
    }

    fn empty() -> Self {
        Self::build(0, Fallback::default(), Vec::new())
    }

    fn build(version: u32, fallback: Fallback, entries: Vec<ConditionEntry>) -> Self {
        let mut exact = HashMap::with_capacity(entries.len());
        let mut folded = HashMap::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            if exact.insert(entry.id.clone(), idx).is_some() {
                tracing::warn!(condition = %entry.id, "duplicate condition id, last entry wins");
            }
            folded.entry(entry.id.to_lowercase()).or_insert(idx);
        }

        Self {
            version,
            fallback,
            entries,
            exact,
            folded,
        }
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact match first, then a case-insensitive one.
    #[must_use]
    pub fn entry(&self, condition: &str) -> Option<&ConditionEntry> {
        let condition = condition.trim();
        self.exact
            .get(condition)
            .or_else(|| self.folded.get(&condition.to_lowercase()))
            .and_then(|&idx| self.entries.get(idx))
    }

    #[must_use]
    pub fn details(&self, condition: &str, locale: Locale) -> ConditionDetails {
        let Some(entry) = self.entry(condition) else {
            return ConditionDetails {
                severity: self.fallback.severity,
                description: self.fallback.description.get(locale).to_string(),
                recommendations: localize_all(&self.fallback.recommendations, locale),
                known: false,
            };
        };

        let description = entry
            .description
            .as_ref()
            .unwrap_or(&self.fallback.description)
            .get(locale)
            .to_string();

        let recommendations = if entry.recommendations.is_empty() {
            localize_all(&self.fallback.recommendations, locale)
        } else {
            localize_all(&entry.recommendations, locale)
        };

        ConditionDetails {
            severity: entry.severity,
            description,
            recommendations,
            known: true,
        }
    }

    pub fn entries_for<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a ConditionEntry> {
        self.entries.iter().filter(move |e| e.source == source)
    }
}

fn localize_all(texts: &[LocalizedText], locale: Locale) -> Vec<String> {
    texts.iter().map(|t| t.get(locale).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_parses() {
        let table = ConditionTable::parse(EMBEDDED_TABLE).unwrap();
        assert_eq!(table.version(), 1);
        assert_eq!(table.len(), 29);
        assert_eq!(ConditionTable::global().len(), table.len());
    }

    #[test]
    fn test_known_condition_en_and_ar() {
        let table = ConditionTable::global();

        let en = table.details("Fractured", Locale::En);
        assert!(en.known);
        assert_eq!(en.severity, Severity::High);
        assert_eq!(en.description, "A fracture was detected in the bone.");
        assert_eq!(en.recommendations.len(), 2);

        let ar = table.details("Fractured", Locale::Ar);
        assert_eq!(ar.description, "تم اكتشاف كسر في العظم.");
        assert_eq!(ar.recommendations[0], "استشر أخصائي عظام فورًا.");
    }

    #[test]
    fn test_severity_only_entry_uses_generic_text() {
        let details = ConditionTable::global().details("glioma", Locale::En);
        assert!(details.known);
        assert_eq!(details.severity, Severity::High);
        assert_eq!(details.description, "Analysis complete.");
        assert_eq!(
            details.recommendations,
            vec!["Consult a healthcare professional for detailed diagnosis."]
        );
    }

    #[test]
    fn test_unknown_condition_falls_back_in_both_languages() {
        let table = ConditionTable::global();

        let en = table.details("Dragon Pox", Locale::En);
        assert!(!en.known);
        assert_eq!(en.severity, Severity::Medium);
        assert_eq!(
            en.recommendations,
            vec!["Consult a healthcare professional for detailed diagnosis."]
        );

        let ar = table.details("Dragon Pox", Locale::Ar);
        assert_eq!(ar.severity, Severity::Medium);
        assert_eq!(ar.description, "اكتمل التحليل.");
        assert_eq!(ar.recommendations, vec!["استشر أخصائي رعاية صحية لتشخيص مفصل."]);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let table = ConditionTable::global();
        assert_eq!(table.details("PNEUMONIA", Locale::En).severity, Severity::High);
        assert_eq!(table.details(" Normal ", Locale::En).severity, Severity::Low);
    }

    #[test]
    fn test_every_imaging_source_has_entries() {
        let table = ConditionTable::global();
        for source in [
            "bone_fracture",
            "lung_colon",
            "monkeypox",
            "skin_cancer",
            "tumor",
            "xray",
            "palm_disease",
            "symptoms",
        ] {
            assert!(table.entries_for(source).count() >= 2, "{source}");
        }
    }

    #[test]
    fn test_invalid_table_rejected() {
        assert!(ConditionTable::parse("{\"version\": 1}").is_err());
    }
}

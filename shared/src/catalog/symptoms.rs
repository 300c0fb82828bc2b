use serde::{Deserialize, Serialize};

use crate::i18n::{tr, Locale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyRegion {
    Head,
    Chest,
    Abdomen,
    Limbs,
    Skin,
    General,
    Palm,
}

impl BodyRegion {
    pub const ALL: [Self; 7] = [
        Self::Head,
        Self::Chest,
        Self::Abdomen,
        Self::Limbs,
        Self::Skin,
        Self::General,
        Self::Palm,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Chest => "chest",
            Self::Abdomen => "abdomen",
            Self::Limbs => "limbs",
            Self::Skin => "skin",
            Self::General => "general",
            Self::Palm => "palm",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match self {
            Self::Head => tr(locale, "Head", "الرأس"),
            Self::Chest => tr(locale, "Chest", "الصدر"),
            Self::Abdomen => tr(locale, "Abdomen", "البطن"),
            Self::Limbs => tr(locale, "Arms & Legs", "الذراعين والساقين"),
            Self::Skin => tr(locale, "Skin", "الجلد"),
            Self::General => tr(locale, "General", "عام"),
            Self::Palm => tr(locale, "Palm Plant", "نبات النخيل"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symptom {
    pub id: &'static str,
    pub en: &'static str,
    pub ar: &'static str,
    pub region: Option<BodyRegion>,
}

impl Symptom {
    #[must_use]
    pub const fn label(&self, locale: Locale) -> &'static str {
        tr(locale, self.en, self.ar)
    }
}

const fn symptom(
    id: &'static str,
    en: &'static str,
    ar: &'static str,
    region: Option<BodyRegion>,
) -> Symptom {
    Symptom { id, en, ar, region }
}

pub static SYMPTOMS: [Symptom; 20] = [
    symptom("headache", "Headache", "صداع", Some(BodyRegion::Head)),
    symptom("fever", "Fever", "حمى", Some(BodyRegion::General)),
    symptom("cough", "Cough", "سعال", Some(BodyRegion::Chest)),
    symptom("fatigue", "Fatigue", "إرهاق", Some(BodyRegion::General)),
    symptom("chestPain", "Chest Pain", "ألم في الصدر", Some(BodyRegion::Chest)),
    symptom("shortnessOfBreath", "Shortness of Breath", "ضيق في التنفس", Some(BodyRegion::Chest)),
    symptom("nauseaVomiting", "Nausea/Vomiting", "غثيان/قيء", Some(BodyRegion::Abdomen)),
    symptom("abdominalPain", "Abdominal Pain", "ألم في البطن", Some(BodyRegion::Abdomen)),
    symptom("diarrhea", "Diarrhea", "إسهال", Some(BodyRegion::Abdomen)),
    symptom("rash", "Rash", "طفح جلدي", Some(BodyRegion::Skin)),
    symptom("jointPain", "Joint Pain", "ألم في المفاصل", Some(BodyRegion::Limbs)),
    symptom("dizziness", "Dizziness", "دوار", Some(BodyRegion::Head)),
    symptom("soreThroat", "Sore Throat", "التهاب الحلق", Some(BodyRegion::Head)),
    symptom("difficultySwallowing", "Difficulty Swallowing", "صعوبة في البلع", None),
    symptom("earPain", "Ear Pain", "ألم في الأذن", Some(BodyRegion::Head)),
    symptom("lossOfAppetite", "Loss of Appetite", "فقدان الشهية", Some(BodyRegion::Abdomen)),
    symptom("muscleAches", "Muscle Aches", "آلام عضلية", Some(BodyRegion::Limbs)),
    symptom("stiffNeck", "Stiff Neck", "تيبس الرقبة", None),
    symptom("blurredVision", "Blurred Vision", "عدم وضوح الرؤية", Some(BodyRegion::Head)),
    symptom("constipation", "Constipation", "إمساك", Some(BodyRegion::Abdomen)),
];

#[must_use]
pub fn find_symptom(id: &str) -> Option<&'static Symptom> {
    SYMPTOMS.iter().find(|s| s.id == id)
}

/// Catalogue entries visible for a search term and region. A non-empty
/// search, no region, or the palm region all ignore the region filter.
#[must_use]
pub fn filter_symptoms(
    search: &str,
    region: Option<BodyRegion>,
    locale: Locale,
) -> Vec<&'static Symptom> {
    let needle = search.trim().to_lowercase();
    let region = match region {
        Some(BodyRegion::Palm) | None => None,
        Some(_) if !needle.is_empty() => None,
        Some(r) => Some(r),
    };

    SYMPTOMS
        .iter()
        .filter(|s| region.map_or(true, |r| s.region == Some(r)))
        .filter(|s| needle.is_empty() || s.label(locale).to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PalmFeature {
    pub id: &'static str,
    pub en: &'static str,
    pub ar: &'static str,
}

impl PalmFeature {
    #[must_use]
    pub const fn label(&self, locale: Locale) -> &'static str {
        tr(locale, self.en, self.ar)
    }
}

/// Feature order matches the vector the palm model expects.
pub static PALM_FEATURES: [PalmFeature; 5] = [
    PalmFeature {
        id: "leaf_discoloration",
        en: "Leaf Discoloration (0-10)",
        ar: "تغير لون الأوراق (0-10)",
    },
    PalmFeature {
        id: "spot_density",
        en: "Spot Density (0-10)",
        ar: "كثافة البقع (0-10)",
    },
    PalmFeature {
        id: "wilting_severity",
        en: "Wilting Severity (0-10)",
        ar: "شدة الذبول (0-10)",
    },
    PalmFeature {
        id: "growth_stunting",
        en: "Growth Stunting (0-10)",
        ar: "توقف النمو (0-10)",
    },
    PalmFeature {
        id: "lesion_size",
        en: "Lesion Size (0-10)",
        ar: "حجم الآفات (0-10)",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(symptoms: &[&Symptom]) -> Vec<&'static str> {
        symptoms.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_catalogue_ids_unique() {
        let mut all: Vec<_> = SYMPTOMS.iter().map(|s| s.id).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), SYMPTOMS.len());
    }

    #[test]
    fn test_region_filter() {
        let head = filter_symptoms("", Some(BodyRegion::Head), Locale::En);
        assert_eq!(
            ids(&head),
            vec!["headache", "dizziness", "soreThroat", "earPain", "blurredVision"]
        );

        let skin = filter_symptoms("", Some(BodyRegion::Skin), Locale::En);
        assert_eq!(ids(&skin), vec!["rash"]);
    }

    #[test]
    fn test_search_overrides_region() {
        let found = filter_symptoms("PAIN", Some(BodyRegion::Skin), Locale::En);
        assert_eq!(
            ids(&found),
            vec!["chestPain", "abdominalPain", "jointPain", "earPain"]
        );
    }

    #[test]
    fn test_search_in_arabic() {
        let found = filter_symptoms("ألم", None, Locale::Ar);
        assert!(found.iter().any(|s| s.id == "chestPain"));
        assert!(found.iter().all(|s| s.ar.contains("ألم")));
    }

    #[test]
    fn test_palm_or_no_region_lists_everything() {
        assert_eq!(filter_symptoms("", None, Locale::En).len(), 20);
        assert_eq!(filter_symptoms("", Some(BodyRegion::Palm), Locale::En).len(), 20);
    }

    #[test]
    fn test_region_ids_round_trip() {
        for region in BodyRegion::ALL {
            assert_eq!(BodyRegion::from_id(region.id()), Some(region));
        }
        assert_eq!(BodyRegion::from_id("tail"), None);
    }

    #[test]
    fn test_find_symptom() {
        assert_eq!(find_symptom("stiffNeck").map(|s| s.region), Some(None));
        assert!(find_symptom("nope").is_none());
    }
}

//! Static content: the condition table and the symptom checker catalogue.

pub mod conditions;
pub mod symptoms;

pub use self::conditions::{ConditionDetails, ConditionTable};
pub use self::symptoms::{
    filter_symptoms, find_symptom, BodyRegion, PalmFeature, Symptom, PALM_FEATURES, SYMPTOMS,
};

//! Built-in regression fixtures for the extraction prompt

use serde::Serialize;
use serde_json::{Value as JsonValue, json};

/// Parsed model output: an open-schema JSON object
pub type ExtractedRecord = JsonValue;

/// A clinical note and the record the model is expected to extract from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fixture {
    pub input: String,
    pub expected: ExtractedRecord,
}

impl Fixture {
    pub fn new(input: impl Into<String>, expected: ExtractedRecord) -> Self {
        Self {
            input: input.into(),
            expected,
        }
    }
}

/// The fixed fixture list, in run order
pub fn builtin_fixtures() -> Vec<Fixture> {
    vec![
        Fixture::new(
            "Patient requires a full face CPAP mask with humidifier due to AHI > 20. Ordered by Dr. Cameron.",
            json!({
                "device": "CPAP",
                "mask_type": "full face",
                "add_ons": ["humidifier"],
                "qualifier": "AHI > 20",
                "ordering_provider": "Dr. Cameron"
            }),
        ),
        Fixture::new(
            "Patient diagnosed with COPD, SpO2 measured at 87% on room air. Needs portable oxygen concentrator for use during exertion and sleep. Dr. Chase signed the order.",
            json!({
                "device": "portable oxygen concentrator",
                "diagnosis": "COPD",
                "SpO2": "87%",
                "usage": ["exertion", "sleep"],
                "ordering_provider": "Dr. Chase"
            }),
        ),
        Fixture::new(
            "Patient has MS with significant mobility issues. Recommended a lightweight manual wheelchair with elevating leg rests. Ordered by Dr. Taub.",
            json!({
                "device": "manual wheelchair",
                "type": "lightweight",
                "features": ["elevating leg rests"],
                "diagnosis": "MS",
                "ordering_provider": "Dr. Taub"
            }),
        ),
        Fixture::new(
            "Asthma diagnosis confirmed. Prescribing nebulizer with mouthpiece and tubing. Dr. Foreman completed the documentation.",
            json!({
                "device": "nebulizer",
                "accessories": ["mouthpiece", "tubing"],
                "diagnosis": "Asthma",
                "ordering_provider": "Dr. Foreman"
            }),
        ),
        Fixture::new(
            "Patient is non-ambulatory and requires hospital bed with trapeze bar and side rails. Diagnosis: late-stage ALS. Order submitted by Dr. Cuddy.",
            json!({
                "device": "hospital bed",
                "features": ["trapeze bar", "side rails"],
                "diagnosis": "ALS",
                "mobility_status": "non-ambulatory",
                "ordering_provider": "Dr. Cuddy"
            }),
        ),
        Fixture::new(
            "CPAP supplies requested. Full face mask with headgear and filters. Patient has been compliant. Ordered by Dr. House.",
            json!({
                "product": "CPAP supplies",
                "components": ["full face mask", "headgear", "filters"],
                "compliance_status": "compliant",
                "ordering_provider": "Dr. House"
            }),
        ),
    ]
}

//! Reference scenarios for the scoring pipeline.

use endorisk::request::AssessmentRequest;
use endorisk::{
    extract_markers, Marker, MarkerSet, Profile, ProfileDefaults, RiskEngine, RiskLevel,
};
use serde_json::json;

fn profile(value: serde_json::Value, defaults: &ProfileDefaults) -> Profile {
    Profile::from_value(&value, defaults).unwrap()
}

#[test]
fn scenario_1_high_risk_male_saturates_diabetes() {
    let p = profile(
        json!({
            "Age": 45,
            "Gender": "Male",
            "BMI": 32,
            "Sleep quality": "poor",
            "Stress level": "high",
            "Exercise frequency": "sedentary",
            "Diet type": "high sugar",
            "Family history": "diabetes in father"
        }),
        &ProfileDefaults::default(),
    );
    let result = RiskEngine::new().assess(&p, &MarkerSet::new());

    assert_eq!(result.risk_scores.diabetes, "100%");
    assert_eq!(result.risk_level.diabetes, RiskLevel::High);
    for label in [
        "High BMI",
        "Poor sleep",
        "High stress",
        "Low physical activity",
        "Unhealthy diet pattern",
        "Family history of diabetes",
        "Poor sleep + high stress correlation",
        "High BMI + family history correlation",
    ] {
        assert!(result.has_trigger(label), "missing trigger {}", label);
    }
    assert_eq!(result.risk_scores.pcos, "16%");
}

#[test]
fn scenario_2_empty_profile_with_neutral_defaults() {
    let p = profile(json!({}), &ProfileDefaults::neutral());
    let result = RiskEngine::new().assess(&p, &MarkerSet::new());

    assert_eq!(result.risk_scores.thyroid, "20%");
    assert_eq!(result.risk_scores.diabetes, "20%");
    assert_eq!(result.risk_scores.pcos, "0%");
    assert_eq!(result.risk_scores.adrenal, "20%");
    assert_eq!(result.risk_scores.metabolic, "20%");
    for (_, level) in result.risk_level.iter() {
        assert_eq!(*level, RiskLevel::Low);
    }
    assert!(result.key_triggers.is_empty());
}

#[test]
fn scenario_2_empty_profile_with_documented_defaults() {
    // Missing text fields take "average", "moderate", "low" and "mixed".
    let p = profile(json!({}), &ProfileDefaults::default());
    let result = RiskEngine::new().assess(&p, &MarkerSet::new());

    assert_eq!(result.risk_scores.thyroid, "20%");
    assert_eq!(result.risk_scores.diabetes, "32%");
    assert_eq!(result.risk_scores.pcos, "0%");
    assert_eq!(result.risk_scores.adrenal, "38%");
    assert_eq!(result.risk_scores.metabolic, "32%");
    assert_eq!(result.risk_level.adrenal, RiskLevel::Moderate);
    assert_eq!(result.key_triggers, vec!["Low physical activity"]);
}

#[test]
fn scenario_3_extracted_markers_raise_triggers() {
    let markers = extract_markers("Patient TSH=0.2, Cortisol - 25");
    assert_eq!(markers.get(Marker::Tsh), Some(0.2));
    assert_eq!(markers.get(Marker::Cortisol), Some(25.0));
    assert_eq!(markers.present_count(), 2);

    let p = profile(json!({"Gender": "female"}), &ProfileDefaults::neutral());
    let result = RiskEngine::new().assess(&p, &markers);
    assert!(result.has_trigger("Abnormal TSH"));
    assert!(result.has_trigger("Abnormal cortisol"));
    assert_eq!(result.risk_scores.thyroid, "45%");
    assert_eq!(result.risk_scores.adrenal, "40%");
}

#[test]
fn scenario_3_through_a_request() {
    let request = AssessmentRequest::from_value(json!({
        "profile": {"Gender": "female"},
        "lab_report_text": "Patient TSH=0.2, Cortisol - 25"
    }))
    .unwrap();
    let done = request
        .assess(&RiskEngine::new(), &ProfileDefaults::neutral(), None)
        .unwrap();
    let json = serde_json::to_value(&done.response).unwrap();
    assert_eq!(json["extracted_markers"]["TSH"], 0.2);
    assert!(json["extracted_markers"]["T3"].is_null());
    assert_eq!(
        json["assessment"]["key_triggers"],
        json!(["Abnormal TSH", "Abnormal cortisol"])
    );
}

#[test]
fn scenario_4_irregular_cycles_with_prediabetic_hba1c() {
    let p = profile(
        json!({"Gender": "female", "Symptoms": ["irregular cycles"]}),
        &ProfileDefaults::neutral(),
    );
    let markers = MarkerSet::new().with(Marker::HbA1c, 5.8);
    let result = RiskEngine::new().assess(&p, &markers);

    assert!(result.has_trigger("Prediabetic HbA1c"));
    assert!(result.has_trigger("Irregular cycles + insulin issue correlation"));
    assert!(result.has_trigger("PCOS symptom pattern"));
    // baseline 15 + symptoms 20 + correlation 15
    assert_eq!(result.risk_scores.pcos, "50%");
    assert_eq!(result.risk_level.pcos, RiskLevel::Moderate);
}

#[test]
fn embedded_lab_results_feed_the_engine() {
    let p = profile(
        json!({"Lab results (optional)": {"HbA1c": "6.8", "Fasting glucose": 99}}),
        &ProfileDefaults::neutral(),
    );
    let result = RiskEngine::new().assess(&p, &p.lab_results);
    assert!(result.has_trigger("Diabetic-range HbA1c"));
    assert!(!result.has_trigger("High fasting glucose"));
    assert_eq!(result.risk_scores.diabetes, "55%");
}

#[test]
fn fixed_guidance_text_is_verbatim() {
    let female = profile(json!({"Gender": "Female"}), &ProfileDefaults::neutral());
    let male = profile(json!({"Gender": "male"}), &ProfileDefaults::neutral());
    let engine = RiskEngine::new();
    let result = engine.assess(&female, &MarkerSet::new());

    assert_eq!(
        result.explanation,
        "Risk scores were calculated using weighted lifestyle factors, symptom clustering, \
         family history, available lab markers, and correlation logic for adrenal, diabetes, \
         and PCOS pathways."
    );
    assert_eq!(
        result.recommended_actions,
        vec![
            "Improve sleep hygiene (7-8 hours with fixed timing)",
            "Exercise at least 150 minutes/week",
            "Lower processed sugar and refined carbohydrates",
            "Use daily stress reduction techniques",
            "Review findings with an endocrinologist",
        ]
    );
    let base_tests = [
        "TSH, Free T3, Free T4",
        "HbA1c and fasting glucose",
        "Fasting insulin and HOMA-IR",
        "Morning cortisol",
        "Lipid profile",
    ];
    let mut female_tests = base_tests.to_vec();
    female_tests.push("LH, FSH, Testosterone, pelvic ultrasound (if PCOS suspected)");
    assert_eq!(result.suggested_tests, female_tests);
    assert_eq!(
        engine.assess(&male, &MarkerSet::new()).suggested_tests,
        base_tests.to_vec()
    );
}

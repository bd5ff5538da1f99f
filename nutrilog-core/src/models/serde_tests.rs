//! Serde tests for the wire and output shapes of core types.

use crate::{DataType, FoodCandidate, FoodDetail, Goals, LogId, MacroKind, NutritionResult};

// ============================================================================
// FoodDetail Wire Format
// ============================================================================

#[test]
fn test_food_detail_parses_fdc_shape() {
    let json = r#"{
        "fdcId": 171688,
        "description": "Apples, raw, with skin",
        "dataType": "SR Legacy",
        "servingSize": 182.0,
        "servingSizeUnit": "g",
        "foodNutrients": [
            {
                "type": "FoodNutrient",
                "nutrient": {"id": 1008, "number": "208", "name": "Energy", "unitName": "kcal"},
                "amount": 52.0
            },
            {
                "nutrient": {"id": 1003, "number": "203", "name": "Protein", "unitName": "g"},
                "amount": 0.26
            }
        ]
    }"#;

    let detail: FoodDetail = serde_json::from_str(json).unwrap();
    assert_eq!(detail.fdc_id, Some(171_688));
    assert_eq!(detail.description.as_deref(), Some("Apples, raw, with skin"));
    assert_eq!(detail.serving_size, Some(182.0));
    assert_eq!(detail.food_nutrients.len(), 2);
    assert_eq!(detail.food_nutrients[0].nutrient_id(), Some(1008));
    assert_eq!(detail.food_nutrients[1].nutrient_name(), Some("Protein"));
    assert_eq!(
        detail.food_nutrients[0]
            .nutrient
            .as_ref()
            .and_then(|n| n.unit_name.as_deref()),
        Some("kcal")
    );
}

#[test]
fn test_food_detail_tolerates_missing_fields() {
    let detail: FoodDetail = serde_json::from_str("{}").unwrap();
    assert!(detail.description.is_none());
    assert!(detail.food_nutrients.is_empty());

    let json = r#"{"foodNutrients": [{"amount": 3.0}, {"nutrient": {"name": "Protein"}}]}"#;
    let detail: FoodDetail = serde_json::from_str(json).unwrap();
    assert!(detail.food_nutrients[0].nutrient.is_none());
    assert!(detail.food_nutrients[1].amount.is_none());
}

// ============================================================================
// Output Shapes
// ============================================================================

#[test]
fn test_nutrition_result_nulls_stay_null() {
    let result = NutritionResult::empty(5, "Mystery");
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["fdcId"], 5);
    assert!(value["calories"].is_null());
    assert!(value["servingSize"].is_null());
}

#[test]
fn test_candidate_serializes_camel_case() {
    let mut candidate = FoodCandidate::new(9, "Greek Yogurt");
    candidate.data_type = DataType::Branded;
    candidate.brand = Some("Acme".to_string());

    let value = serde_json::to_value(&candidate).unwrap();
    assert_eq!(value["dataType"], "Branded");
    assert_eq!(value["brand"], "Acme");
}

#[test]
fn test_macro_kind_lowercase() {
    assert_eq!(serde_json::to_string(&MacroKind::Carbs).unwrap(), r#""carbs""#);
    let kind: MacroKind = serde_json::from_str(r#""fat""#).unwrap();
    assert_eq!(kind, MacroKind::Fat);
}

#[test]
fn test_log_id_is_transparent() {
    assert_eq!(serde_json::to_string(&LogId::new(17)).unwrap(), "17");
}

#[test]
fn test_goals_shape() {
    let value = serde_json::to_value(Goals::default()).unwrap();
    assert_eq!(value["calories"], 2000);
    assert_eq!(value["carbs"], 250);
}

//! End-to-end lookups against a mock FoodData Central server.

use std::sync::Arc;

use nutrilog_fetch::{ApiKey, FdcClient, FdcConfig, FetchError, LookupPipeline, RetryStrategy};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> FdcClient {
    let config = FdcConfig::new(ApiKey::new("test-key").unwrap())
        .with_base_url(&format!("{}/fdc/v1", server.uri()))
        .unwrap()
        .with_retry(RetryStrategy::no_retry());
    FdcClient::new(config).unwrap()
}

fn apple_detail() -> serde_json::Value {
    json!({
        "fdcId": 1,
        "description": "Apple",
        "servingSize": 182,
        "foodNutrients": [
            {"nutrient": {"id": 1008, "name": "Energy"}, "amount": 52},
            {"nutrient": {"id": 1003, "name": "Protein"}, "amount": 0.3},
            {"nutrient": {"id": 1005, "name": "Carbohydrate, by difference"}, "amount": 13.8},
            {"nutrient": {"id": 1004, "name": "Total lipid (fat)"}, "amount": 0.2}
        ]
    })
}

async fn mount_search(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/fdc/v1/foods/search"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("query", "apple"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalHits": 2,
            "foods": [
                {"fdcId": 1, "description": "Apple", "dataType": "Foundation"},
                {"fdcId": 2, "description": "APPLE JUICE", "dataType": "Branded"}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_lookup_enriches_and_degrades_per_food() {
    let server = MockServer::start().await;
    mount_search(&server).await;

    Mock::given(method("GET"))
        .and(path("/fdc/v1/food/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apple_detail()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/food/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let pipeline = LookupPipeline::new(Arc::new(client(&server)));
    let results = pipeline.lookup("apple").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].fdc_id, 1);
    assert_eq!(results[0].calories, Some(52.0));
    assert_eq!(results[0].carbs, Some(13.8));
    assert!(results[0].has_complete_macros());

    assert_eq!(results[1].fdc_id, 2);
    assert_eq!(results[1].name, "APPLE JUICE");
    assert!(!results[1].has_any_macro());
}

#[tokio::test]
async fn test_lookup_report_counts_failures() {
    let server = MockServer::start().await;
    mount_search(&server).await;

    Mock::given(method("GET"))
        .and(path("/fdc/v1/food/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apple_detail()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/food/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let pipeline = LookupPipeline::new(Arc::new(client(&server)));
    let outcome = pipeline.lookup_with_report("apple").await.unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.failures(), 1);
    assert!(!outcome.attempts[1].success);
}

#[tokio::test]
async fn test_search_failure_reaches_caller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/foods/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let pipeline = LookupPipeline::new(Arc::new(client(&server)));
    let err = pipeline.lookup("apple").await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert_eq!(err.user_message(), "Could not reach the food database.");
}

#[tokio::test]
async fn test_zero_hits_fetch_no_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/foods/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalHits": 0, "foods": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/food/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apple_detail()))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = LookupPipeline::new(Arc::new(client(&server)));
    assert!(pipeline.lookup("zzzz").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_one_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fdc/v1/food/1"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apple_detail()))
        .mount(&server)
        .await;

    let pipeline = LookupPipeline::new(Arc::new(client(&server)));
    let result = pipeline.lookup_one(1).await.unwrap();

    assert_eq!(result.protein, Some(0.3));
    assert_eq!(result.serving_size, Some(182.0));
}

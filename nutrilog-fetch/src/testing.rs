//! In-memory food database for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use nutrilog_core::{FoodCandidate, FoodDetail, FoodNutrient};

use crate::database::FoodDatabase;
use crate::error::FetchError;

/// Builds a detail record with all four macros keyed by nutrient ID.
pub(crate) fn detail(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodDetail {
    FoodDetail {
        description: Some(name.to_string()),
        food_nutrients: vec![
            FoodNutrient::with_id(1008, Some(calories)),
            FoodNutrient::with_id(1003, Some(protein)),
            FoodNutrient::with_id(1005, Some(carbs)),
            FoodNutrient::with_id(1004, Some(fat)),
        ],
        ..FoodDetail::default()
    }
}

#[derive(Default)]
pub(crate) struct MockDatabase {
    candidates: Vec<FoodCandidate>,
    details: HashMap<u64, FoodDetail>,
    failing: HashSet<u64>,
    detail_delays: HashMap<u64, Duration>,
    query_delays: HashMap<String, Duration>,
    search_fails: bool,
    queries: Mutex<Vec<String>>,
    detail_calls: AtomicUsize,
}

impl MockDatabase {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate whose detail normalizes completely.
    pub(crate) fn with_food(mut self, id: u64, name: &str, calories: f64) -> Self {
        self.candidates.push(FoodCandidate::new(id, name));
        self.details.insert(id, detail(name, calories, 1.0, 2.0, 3.0));
        self
    }

    /// Adds a candidate whose detail fetch fails.
    pub(crate) fn with_failing_food(mut self, id: u64, name: &str) -> Self {
        self.candidates.push(FoodCandidate::new(id, name));
        self.failing.insert(id);
        self
    }

    /// Adds a candidate with a custom detail record.
    pub(crate) fn with_detail(mut self, id: u64, name: &str, detail: FoodDetail) -> Self {
        self.candidates.push(FoodCandidate::new(id, name));
        self.details.insert(id, detail);
        self
    }

    pub(crate) fn with_detail_delay(mut self, id: u64, delay: Duration) -> Self {
        self.detail_delays.insert(id, delay);
        self
    }

    pub(crate) fn with_query_delay(mut self, query: &str, delay: Duration) -> Self {
        self.query_delays.insert(query.to_string(), delay);
        self
    }

    pub(crate) fn with_failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FoodDatabase for MockDatabase {
    fn id(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodCandidate>, FetchError> {
        let query = query.trim().to_string();
        self.queries.lock().unwrap().push(query.clone());

        if let Some(delay) = self.query_delays.get(&query) {
            tokio::time::sleep(*delay).await;
        }
        if self.search_fails {
            return Err(FetchError::Status {
                status: 500,
                body: "search down".to_string(),
            });
        }

        let needle = query.to_lowercase();
        Ok(self
            .candidates
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn fetch_detail(&self, fdc_id: u64) -> Result<FoodDetail, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.detail_delays.get(&fdc_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&fdc_id) {
            return Err(FetchError::Status {
                status: 500,
                body: "detail down".to_string(),
            });
        }

        self.details
            .get(&fdc_id)
            .cloned()
            .ok_or_else(|| FetchError::InvalidResponse(format!("unknown id {fdc_id}")))
    }
}

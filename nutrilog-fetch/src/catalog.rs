//! Built-in offline food catalog.
//!
//! Twenty common foods with per-serving macros. Serves searches and details
//! through the same [`FoodDatabase`] seam as the remote client, so the
//! pipeline and CLI work without an API key.

use async_trait::async_trait;
use nutrilog_core::{FoodCandidate, FoodDetail, FoodNutrient, MacroKind};
use tracing::debug;

use crate::database::FoodDatabase;
use crate::error::FetchError;

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogFood {
    /// Catalog identifier.
    pub id: u64,
    /// Display name including the serving.
    pub name: &'static str,
    /// Energy in kcal.
    pub calories: f64,
    /// Protein in grams.
    pub protein: f64,
    /// Carbohydrates in grams.
    pub carbs: f64,
    /// Fat in grams.
    pub fat: f64,
}

impl CatalogFood {
    const fn new(id: u64, name: &'static str, calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            id,
            name,
            calories,
            protein,
            carbs,
            fat,
        }
    }

    fn amount(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Calories => self.calories,
            MacroKind::Protein => self.protein,
            MacroKind::Carbs => self.carbs,
            MacroKind::Fat => self.fat,
        }
    }

    /// Renders the entry as a detail record keyed by standard nutrient IDs.
    pub fn to_detail(&self) -> FoodDetail {
        let food_nutrients = MacroKind::ALL
            .iter()
            .map(|&kind| FoodNutrient::with_id(kind.nutrient_ids()[0], Some(self.amount(kind))))
            .collect();

        FoodDetail {
            fdc_id: Some(self.id),
            description: Some(self.name.to_string()),
            food_nutrients,
            ..FoodDetail::default()
        }
    }
}

/// The built-in foods.
pub const CATALOG_FOODS: [CatalogFood; 20] = [
    // Fruits
    CatalogFood::new(1, "Apple, medium", 95.0, 0.5, 25.0, 0.3),
    CatalogFood::new(2, "Banana, medium", 105.0, 1.3, 27.0, 0.4),
    CatalogFood::new(3, "Orange, medium", 62.0, 1.2, 15.0, 0.2),
    CatalogFood::new(4, "Strawberries (1 cup)", 49.0, 1.0, 12.0, 0.5),
    // Grains
    CatalogFood::new(5, "Bread (1 slice)", 79.0, 3.6, 14.0, 1.1),
    CatalogFood::new(6, "White Rice (1 cup cooked)", 205.0, 4.3, 45.0, 0.4),
    CatalogFood::new(7, "Oatmeal (1 cup cooked)", 158.0, 5.5, 27.0, 3.2),
    CatalogFood::new(8, "Pasta (1 cup cooked)", 220.0, 8.0, 43.0, 1.3),
    // Protein
    CatalogFood::new(9, "Chicken Breast (100g)", 165.0, 31.0, 0.0, 3.6),
    CatalogFood::new(10, "Egg (large)", 78.0, 6.3, 0.6, 5.3),
    CatalogFood::new(11, "Ground Beef 90% (100g)", 199.0, 28.0, 0.0, 9.3),
    CatalogFood::new(12, "Salmon (100g)", 208.0, 20.0, 0.0, 13.0),
    CatalogFood::new(13, "Tofu, firm (100g)", 76.0, 8.0, 3.0, 5.0),
    // Dairy
    CatalogFood::new(14, "Milk, 2% (1 cup)", 122.0, 8.0, 12.0, 4.8),
    CatalogFood::new(15, "Cheddar Cheese (1 oz)", 115.0, 7.0, 0.1, 9.6),
    CatalogFood::new(16, "Greek Yogurt, plain (1 cup)", 100.0, 17.0, 6.0, 0.7),
    // Vegetables
    CatalogFood::new(17, "Broccoli (1 cup)", 55.0, 3.7, 11.0, 0.6),
    CatalogFood::new(18, "Carrot, medium", 25.0, 0.6, 6.0, 0.1),
    CatalogFood::new(19, "Spinach (1 cup)", 7.0, 0.9, 1.0, 0.1),
    CatalogFood::new(20, "Potato, medium", 163.0, 4.3, 37.0, 0.2),
];

/// Offline [`FoodDatabase`] over [`CATALOG_FOODS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    /// Creates the catalog.
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive substring match over food names.
    pub fn matches(query: &str) -> impl Iterator<Item = &'static CatalogFood> {
        let needle = query.trim().to_lowercase();
        CATALOG_FOODS
            .iter()
            .filter(move |food| !needle.is_empty() && food.name.to_lowercase().contains(&needle))
    }

    /// Looks up one entry by id.
    pub fn get(id: u64) -> Option<&'static CatalogFood> {
        CATALOG_FOODS.iter().find(|food| food.id == id)
    }
}

#[async_trait]
impl FoodDatabase for StaticCatalog {
    fn id(&self) -> &str {
        "catalog"
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodCandidate>, FetchError> {
        let candidates: Vec<FoodCandidate> = Self::matches(query)
            .map(|food| FoodCandidate::new(food.id, food.name))
            .collect();

        debug!(query, hits = candidates.len(), "Catalog search");
        Ok(candidates)
    }

    async fn fetch_detail(&self, fdc_id: u64) -> Result<FoodDetail, FetchError> {
        Self::get(fdc_id)
            .map(CatalogFood::to_detail)
            .ok_or_else(|| FetchError::InvalidResponse(format!("No catalog food with id {fdc_id}")))
    }
}

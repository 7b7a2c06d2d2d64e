use std::sync::Arc;

use parking_lot::RwLock;
use strsim::jaro_winkler;

use crate::error::{DietError, Result};
use crate::models::Food;

/// Minimum Jaro-Winkler score for a fuzzy name suggestion.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// The foods a session has picked, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct FoodSelection {
    foods: Vec<Food>,
}

impl FoodSelection {
    /// Create a selection, keeping the last entry for any repeated id.
    pub fn new(foods: Vec<Food>) -> Self {
        let mut selection = Self::default();
        for food in foods {
            selection.upsert(food);
        }
        selection
    }

    /// Add a food. Fails if its id is already selected.
    pub fn add(&mut self, food: Food) -> Result<()> {
        if self.position_by_id(&food.fdc_id).is_some() {
            return Err(DietError::DuplicateFood(food.description));
        }
        self.foods.push(food);
        Ok(())
    }

    /// Insert or replace by id.
    pub fn upsert(&mut self, food: Food) {
        match self.position_by_id(&food.fdc_id) {
            Some(i) => self.foods[i] = food,
            None => self.foods.push(food),
        }
    }

    /// Remove by id, or by name (case-insensitive).
    pub fn remove(&mut self, id_or_name: &str) -> Result<Food> {
        let index = self
            .position(id_or_name)
            .ok_or_else(|| DietError::FoodNotFound(id_or_name.to_string()))?;
        Ok(self.foods.remove(index))
    }

    /// Look up by id, or by name (case-insensitive).
    pub fn get(&self, id_or_name: &str) -> Option<&Food> {
        self.position(id_or_name).map(|i| &self.foods[i])
    }

    /// Foods whose names resemble `query`, best match first.
    pub fn similar(&self, query: &str, limit: usize) -> Vec<(&Food, f64)> {
        let query = query.to_lowercase();
        let mut candidates: Vec<(&Food, f64)> = self
            .foods
            .iter()
            .map(|f| (f, jaro_winkler(&f.key(), &query)))
            .filter(|(_, score)| *score > SIMILARITY_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates.truncate(limit);
        candidates
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn to_foods(&self) -> Vec<Food> {
        self.foods.clone()
    }

    pub fn clear(&mut self) {
        self.foods.clear();
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    fn position_by_id(&self, id: &str) -> Option<usize> {
        self.foods.iter().position(|f| f.fdc_id == id)
    }

    fn position(&self, id_or_name: &str) -> Option<usize> {
        self.position_by_id(id_or_name).or_else(|| {
            let key = id_or_name.to_lowercase();
            self.foods.iter().position(|f| f.key() == key)
        })
    }
}

/// A selection shared between threads; one writer at a time.
#[derive(Debug, Clone, Default)]
pub struct SharedSelection(Arc<RwLock<FoodSelection>>);

impl SharedSelection {
    pub fn new(selection: FoodSelection) -> Self {
        Self(Arc::new(RwLock::new(selection)))
    }

    pub fn add(&self, food: Food) -> Result<()> {
        self.0.write().add(food)
    }

    pub fn remove(&self, id_or_name: &str) -> Result<Food> {
        self.0.write().remove(id_or_name)
    }

    /// Copy of the current foods, for handing to the optimiser.
    pub fn snapshot(&self) -> Vec<Food> {
        self.0.read().to_foods()
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}

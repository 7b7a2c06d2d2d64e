use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::nutrients::catalogue::canonical_nutrient;

/// A candidate food with its price, serving limits and nutrient profile.
///
/// Nutrient values are per 100 g; missing entries count as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    #[serde(alias = "id", alias = "fdc_id", deserialize_with = "de_food_id")]
    pub fdc_id: String,

    #[serde(alias = "name")]
    pub description: String,

    /// Price per serving.
    pub price: f64,

    /// Serving size in grams.
    #[serde(alias = "serving_size")]
    pub serving_size: f64,

    /// Maximum total grams; `None` or 0 means no explicit cap.
    #[serde(default, alias = "max_serving")]
    pub max_serving: Option<f64>,

    #[serde(default, alias = "must_include")]
    pub must_include: bool,

    #[serde(
        default,
        alias = "requires_integer_servings",
        alias = "integerServings"
    )]
    pub requires_integer_servings: bool,

    #[serde(default)]
    pub nutrients: BTreeMap<String, f64>,
}

fn de_food_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(u64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

impl Food {
    /// Nutrient content per 100 g.
    #[inline]
    pub fn nutrient(&self, key: &str) -> f64 {
        self.nutrients.get(key).copied().unwrap_or(0.0)
    }

    /// Nutrient content of one serving.
    #[inline]
    pub fn per_serving(&self, key: &str) -> f64 {
        self.nutrient(key) * self.serving_size / 100.0
    }

    /// Maximum number of servings, using `fallback_grams` when no cap is set.
    pub fn max_servings(&self, fallback_grams: f64) -> f64 {
        let cap = match self.max_serving {
            Some(grams) if grams > 0.0 => grams,
            _ => fallback_grams,
        };
        cap / self.serving_size
    }

    /// Rewrite nutrient keys into the canonical vocabulary.
    ///
    /// When two spellings collide, the canonical spelling wins.
    pub fn canonicalised(mut self) -> Self {
        let mut nutrients = BTreeMap::new();
        let mut aliased = Vec::new();
        for (key, value) in std::mem::take(&mut self.nutrients) {
            let canonical = canonical_nutrient(&key);
            if canonical == key {
                nutrients.insert(key, value);
            } else {
                aliased.push((canonical.to_string(), value));
            }
        }
        for (key, value) in aliased {
            nutrients.entry(key).or_insert(value);
        }
        self.nutrients = nutrients;
        self
    }

    /// Reasons this food cannot be optimised over; empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.description.trim().is_empty() {
            problems.push(format!("Food '{}' has no description", self.fdc_id));
        }
        if !(self.serving_size.is_finite() && self.serving_size > 0.0) {
            problems.push(format!(
                "{}: serving size must be a positive number of grams",
                self.description
            ));
        }
        if !(self.price.is_finite() && self.price >= 0.0) {
            problems.push(format!("{}: price must be non-negative", self.description));
        }
        if self
            .max_serving
            .is_some_and(|max| !(max.is_finite() && max >= 0.0))
        {
            problems.push(format!(
                "{}: max serving must be non-negative",
                self.description
            ));
        }
        if let Some((key, _)) = self
            .nutrients
            .iter()
            .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
        {
            problems.push(format!(
                "{}: nutrient '{}' must be non-negative",
                self.description, key
            ));
        }
        problems
    }

    pub fn is_valid(&self) -> bool {
        self.problems().is_empty()
    }

    /// Canonical key for name lookups (lowercase description).
    pub fn key(&self) -> String {
        self.description.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_food() -> Food {
        Food {
            fdc_id: "1234".to_string(),
            description: "Chicken Breast".to_string(),
            price: 2.5,
            serving_size: 150.0,
            max_serving: Some(600.0),
            must_include: false,
            requires_integer_servings: false,
            nutrients: BTreeMap::from([
                ("protein".to_string(), 25.0),
                ("fats".to_string(), 3.0),
            ]),
        }
    }

    #[test]
    fn test_per_serving_scales_by_serving_size() {
        let food = sample_food();
        assert!((food.per_serving("protein") - 37.5).abs() < 1e-9);
        assert_eq!(food.per_serving("Iron (mg)"), 0.0);
    }

    #[test]
    fn test_max_servings_fallback() {
        let mut food = sample_food();
        assert!((food.max_servings(10_000.0) - 4.0).abs() < 1e-9);

        food.max_serving = Some(0.0);
        assert!((food.max_servings(300.0) - 2.0).abs() < 1e-9);

        food.max_serving = None;
        assert!((food.max_servings(300.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_canonicalised_renames_aliases() {
        let mut food = sample_food();
        food.nutrients.insert("fiber".to_string(), 1.5);
        food.nutrients.insert("Vitamin A (mcg)".to_string(), 12.0);

        let food = food.canonicalised();
        assert_eq!(food.nutrient("fibre"), 1.5);
        assert_eq!(food.nutrient("Vitamin A (µg)"), 12.0);
        assert!(!food.nutrients.contains_key("fiber"));
    }

    #[test]
    fn test_deserialize_numeric_id_and_aliases() {
        let json = r#"{
            "fdcId": 123456,
            "description": "Apple",
            "price": 0.4,
            "servingSize": 100,
            "must_include": true,
            "integerServings": true,
            "nutrients": {"carbohydrate": 13.8}
        }"#;
        let food: Food = serde_json::from_str(json).unwrap();
        assert_eq!(food.fdc_id, "123456");
        assert!(food.must_include);
        assert!(food.requires_integer_servings);
        assert_eq!(food.max_serving, None);
    }

    #[test]
    fn test_problems() {
        assert!(sample_food().is_valid());

        let mut bad = sample_food();
        bad.serving_size = 0.0;
        bad.price = -1.0;
        assert_eq!(bad.problems().len(), 2);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nutrients::catalogue::canonical_nutrient;

/// Per-nutrient limits, keyed by canonical nutrient name.
///
/// Absent and NaN values both mean "no bound"; NaN is never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutrientBoundSet(BTreeMap<String, f64>);

impl NutrientBoundSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, nutrient: &str) -> Option<f64> {
        self.0.get(nutrient).copied()
    }

    pub fn contains(&self, nutrient: &str) -> bool {
        self.0.contains_key(nutrient)
    }

    /// Set a bound. NaN or infinite values clear it instead.
    pub fn set(&mut self, nutrient: impl Into<String>, value: f64) {
        let nutrient = nutrient.into();
        if value.is_finite() {
            self.0.insert(nutrient, value);
        } else {
            self.0.remove(&nutrient);
        }
    }

    pub fn remove(&mut self, nutrient: &str) -> Option<f64> {
        self.0.remove(nutrient)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Standardise keys into the canonical vocabulary and drop non-finite values.
    pub fn standardised(self) -> Self {
        self.0
            .into_iter()
            .map(|(k, v)| (canonical_nutrient(&k).to_string(), v))
            .collect()
    }
}

impl FromIterator<(String, f64)> for NutrientBoundSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.set(k, v);
        }
        set
    }
}

impl<'a> FromIterator<(&'a str, f64)> for NutrientBoundSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// Lower (RDA) and upper (UL) bounds for one person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientBounds {
    pub lower: NutrientBoundSet,
    pub upper: NutrientBoundSet,
}

impl NutrientBounds {
    pub fn new(lower: NutrientBoundSet, upper: NutrientBoundSet) -> Self {
        Self { lower, upper }
    }

    /// Nutrients whose upper bound sits below their lower bound.
    pub fn conflicts(&self) -> Vec<String> {
        self.lower
            .iter()
            .filter_map(|(k, lo)| match self.upper.get(k) {
                Some(hi) if hi < lo => Some(k.to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Caller-supplied bound overrides. A `null` value clears the bound.
pub type BoundOverrides = BTreeMap<String, Option<f64>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_treated_as_absent() {
        let mut set = NutrientBoundSet::new();
        set.set("Iron (mg)", 8.0);
        set.set("Iron (mg)", f64::NAN);
        assert!(!set.contains("Iron (mg)"));

        let set: NutrientBoundSet = [("Zinc (mg)", f64::NAN), ("Iron (mg)", 8.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_standardised_keys() {
        let set: NutrientBoundSet = [("Fibre (g)", 38.0), ("Protein (g)", 56.0)]
            .into_iter()
            .collect();
        let set = set.standardised();
        assert_eq!(set.get("fibre"), Some(38.0));
        assert_eq!(set.get("protein"), Some(56.0));
    }

    #[test]
    fn test_conflicts() {
        let lower: NutrientBoundSet = [("Iron (mg)", 8.0), ("Zinc (mg)", 11.0)]
            .into_iter()
            .collect();
        let upper: NutrientBoundSet = [("Iron (mg)", 45.0), ("Zinc (mg)", 5.0)]
            .into_iter()
            .collect();
        let bounds = NutrientBounds::new(lower, upper);
        assert_eq!(bounds.conflicts(), vec!["Zinc (mg)".to_string()]);
    }
}

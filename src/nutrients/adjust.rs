use tracing::debug;

use crate::models::{BoundOverrides, NutrientBoundSet, NutrientBounds, SmokingStatus};
use crate::nutrients::catalogue::{
    FIBRE, SATURATED_FATS, SMOKER_VITAMIN_C_MG, VITAMIN_C, canonical_nutrient,
};

/// Apply caller overrides and physiological adjustments to base bounds.
///
/// Returns a fresh bound pair; `bounds` is left untouched. Not idempotent:
/// each call for a smoker adds another 35 mg to the vitamin C lower bound,
/// so call it exactly once per request on the provider's base bounds.
pub fn adjust(
    bounds: &NutrientBounds,
    custom_lower: Option<&BoundOverrides>,
    custom_upper: Option<&BoundOverrides>,
    smoking: SmokingStatus,
) -> NutrientBounds {
    let mut adjusted = bounds.clone();

    if let Some(overrides) = custom_lower {
        apply_overrides(&mut adjusted.lower, overrides);
    }
    if let Some(overrides) = custom_upper {
        apply_overrides(&mut adjusted.upper, overrides);
    }

    if smoking == SmokingStatus::Yes {
        let vitamin_c_overridden = custom_lower.is_some_and(|overrides| {
            overrides
                .keys()
                .any(|k| canonical_nutrient(k) == VITAMIN_C)
        });
        if !vitamin_c_overridden {
            if let Some(current) = adjusted.lower.get(VITAMIN_C) {
                adjusted.lower.set(VITAMIN_C, current + SMOKER_VITAMIN_C_MG);
            }
        }
    }

    adjusted
}

/// Overwrite bounds the set already has, plus the fibre and saturated-fat keys.
fn apply_overrides(set: &mut NutrientBoundSet, overrides: &BoundOverrides) {
    for (name, value) in overrides {
        let key = canonical_nutrient(name);
        if !(set.contains(key) || key == FIBRE || key == SATURATED_FATS) {
            debug!(nutrient = %name, "Ignoring override for untracked nutrient");
            continue;
        }
        match value {
            Some(v) => set.set(key, *v),
            None => {
                set.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NutrientBounds {
        NutrientBounds::new(
            [("Vitamin C (mg)", 90.0), ("fibre", 38.0), ("Iron (mg)", 8.0)]
                .into_iter()
                .collect(),
            [("Vitamin C (mg)", 2000.0), ("Iron (mg)", 45.0)]
                .into_iter()
                .collect(),
        )
    }

    fn overrides(entries: &[(&str, Option<f64>)]) -> BoundOverrides {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_non_smoker_keeps_vitamin_c() {
        let adjusted = adjust(&base(), None, None, SmokingStatus::No);
        assert_eq!(adjusted, base());
    }

    #[test]
    fn test_smoker_adds_vitamin_c() {
        let adjusted = adjust(&base(), None, None, SmokingStatus::Yes);
        assert_eq!(adjusted.lower.get(VITAMIN_C), Some(125.0));
    }

    #[test]
    fn test_custom_vitamin_c_suppresses_smoker_adjustment() {
        let lower = overrides(&[("Vitamin C (mg)", Some(100.0))]);
        let adjusted = adjust(&base(), Some(&lower), None, SmokingStatus::Yes);
        assert_eq!(adjusted.lower.get(VITAMIN_C), Some(100.0));
    }

    #[test]
    fn test_aliased_override_keys() {
        let lower = overrides(&[("Fibre (g)", Some(30.0))]);
        let upper = overrides(&[("Saturated Fats (g)", Some(20.0))]);
        let adjusted = adjust(&base(), Some(&lower), Some(&upper), SmokingStatus::No);
        assert_eq!(adjusted.lower.get(FIBRE), Some(30.0));
        assert_eq!(adjusted.upper.get(SATURATED_FATS), Some(20.0));
    }

    #[test]
    fn test_null_override_clears_and_unknown_is_ignored() {
        let upper = overrides(&[("Iron (mg)", None), ("Unobtainium (mg)", Some(1.0))]);
        let adjusted = adjust(&base(), None, Some(&upper), SmokingStatus::No);
        assert!(!adjusted.upper.contains("Iron (mg)"));
        assert!(!adjusted.upper.contains("Unobtainium (mg)"));
    }

    #[test]
    fn test_repeated_smoker_adjustment_accumulates() {
        let once = adjust(&base(), None, None, SmokingStatus::Yes);
        let twice = adjust(&once, None, None, SmokingStatus::Yes);
        assert_eq!(twice.lower.get(VITAMIN_C), Some(160.0));
        // The input is never mutated.
        assert_eq!(once.lower.get(VITAMIN_C), Some(125.0));
    }
}

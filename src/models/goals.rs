use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::bounds::BoundOverrides;
use crate::nutrients::catalogue::{CARBOHYDRATE, FATS, FIBRE, PROTEIN, SATURATED_FATS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[serde(alias = "m", alias = "M", alias = "Male")]
    Male,
    #[serde(alias = "f", alias = "F", alias = "Female")]
    Female,
}

impl Sex {
    /// Prefix used by the life-stage groups in the reference tables.
    pub fn table_prefix(self) -> &'static str {
        match self {
            Sex::Male => "Males",
            Sex::Female => "Females",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
    Yes,
    #[default]
    No,
}

impl SmokingStatus {
    pub fn from_flag(smoker: bool) -> Self {
        if smoker {
            SmokingStatus::Yes
        } else {
            SmokingStatus::No
        }
    }
}

/// Caller targets for the macro nutrients plus optional bound overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientGoals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,

    #[serde(default, alias = "fiber", skip_serializing_if = "Option::is_none")]
    pub fibre: Option<f64>,

    /// Upper-only target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturated_fats: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bounds: Option<BoundOverrides>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bounds: Option<BoundOverrides>,
}

impl NutrientGoals {
    /// Goal for a goal-governed nutrient key.
    pub fn get(&self, nutrient: &str) -> Option<f64> {
        let value = match nutrient {
            PROTEIN => self.protein,
            CARBOHYDRATE => self.carbohydrate,
            FATS => self.fats,
            FIBRE => self.fibre,
            SATURATED_FATS => self.saturated_fats,
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Whether both override maps are present and non-empty.
    pub fn has_custom_bounds(&self) -> bool {
        let non_empty = |m: &Option<BoundOverrides>| m.as_ref().is_some_and(|m| !m.is_empty());
        non_empty(&self.lower_bounds) && non_empty(&self.upper_bounds)
    }

    pub fn problems(&self) -> Vec<String> {
        [
            (PROTEIN, self.protein),
            (CARBOHYDRATE, self.carbohydrate),
            (FATS, self.fats),
            (FIBRE, self.fibre),
            (SATURATED_FATS, self.saturated_fats),
        ]
        .into_iter()
        .filter_map(|(name, value)| match value {
            Some(v) if !(v.is_finite() && v >= 0.0) => {
                Some(format!("Goal for {} must be a non-negative number", name))
            }
            _ => None,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_aliases() {
        let sex: Sex = serde_json::from_str("\"m\"").unwrap();
        assert_eq!(sex, Sex::Male);
        let sex: Sex = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(sex, Sex::Female);
    }

    #[test]
    fn test_goals_fiber_alias_and_lookup() {
        let goals: NutrientGoals =
            serde_json::from_str(r#"{"protein": 150, "fiber": 28}"#).unwrap();
        assert_eq!(goals.get(FIBRE), Some(28.0));
        assert_eq!(goals.get(FATS), None);
        assert!(!goals.has_custom_bounds());
    }

    #[test]
    fn test_has_custom_bounds_requires_both_maps() {
        let mut goals = NutrientGoals::default();
        goals.lower_bounds = Some(BoundOverrides::from([("Iron (mg)".to_string(), Some(10.0))]));
        assert!(!goals.has_custom_bounds());

        goals.upper_bounds = Some(BoundOverrides::from([("Iron (mg)".to_string(), Some(40.0))]));
        assert!(goals.has_custom_bounds());
    }

    #[test]
    fn test_negative_goal_is_a_problem() {
        let goals = NutrientGoals {
            protein: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(goals.problems().len(), 1);
    }
}

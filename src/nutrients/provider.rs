use std::path::Path;

use tracing::debug;

use crate::error::{DietError, Result};
use crate::models::{NutrientBoundSet, NutrientBounds, Sex};
use crate::nutrients::catalogue::{SUPPLEMENT_ONLY_ULS, TOTAL_WATER_LITRES, WATER};
use crate::nutrients::tables::{ReferenceTable, TableKind};

/// Map an age and sex to the life-stage group naming used by the tables.
pub fn life_stage_group(age: u32, sex: Sex) -> String {
    let prefix = sex.table_prefix();
    match age {
        0..=3 => "Children 1-3 y".to_string(),
        4..=8 => "Children 4-8 y".to_string(),
        9..=13 => format!("{} 9-13 y", prefix),
        14..=18 => format!("{} 14-18 y", prefix),
        19..=30 => format!("{} 19-30 y", prefix),
        31..=50 => format!("{} 31-50 y", prefix),
        51..=70 => format!("{} 51-70 y", prefix),
        _ => format!("{} > 70 y", prefix),
    }
}

/// Derives personalised RDA/UL bounds from the reference tables.
#[derive(Debug, Clone)]
pub struct NutrientBoundProvider {
    vitamins_rda: ReferenceTable,
    vitamins_ul: ReferenceTable,
    elements_rda: ReferenceTable,
    elements_ul: ReferenceTable,
    macros_rda: ReferenceTable,
}

impl NutrientBoundProvider {
    pub fn new(
        vitamins_rda: ReferenceTable,
        vitamins_ul: ReferenceTable,
        elements_rda: ReferenceTable,
        elements_ul: ReferenceTable,
        macros_rda: ReferenceTable,
    ) -> Self {
        Self {
            vitamins_rda,
            vitamins_ul,
            elements_rda,
            elements_ul,
            macros_rda,
        }
    }

    /// Load from `dir` if given, otherwise from the bundled tables.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        Ok(Self::new(
            ReferenceTable::load(TableKind::VitaminsRda, dir)?,
            ReferenceTable::load(TableKind::VitaminsUl, dir)?,
            ReferenceTable::load(TableKind::ElementsRda, dir)?,
            ReferenceTable::load(TableKind::ElementsUl, dir)?,
            ReferenceTable::load(TableKind::MacrosRda, dir)?,
        ))
    }

    pub fn bundled() -> Result<Self> {
        Self::load(None)
    }

    /// Lower (RDA) and upper (UL) bounds for a person.
    ///
    /// Fails with `BoundsNotFound` when any table lacks the life-stage row.
    pub fn get_bounds(&self, age: u32, sex: Sex) -> Result<NutrientBounds> {
        let group = life_stage_group(age, sex);
        let not_found = || DietError::BoundsNotFound {
            group: group.clone(),
        };

        let lower_rows = [
            self.vitamins_rda.row(&group).ok_or_else(not_found)?,
            self.elements_rda.row(&group).ok_or_else(not_found)?,
            self.macros_rda.row(&group).ok_or_else(not_found)?,
        ];
        let upper_rows = [
            self.vitamins_ul.row(&group).ok_or_else(not_found)?,
            self.elements_ul.row(&group).ok_or_else(not_found)?,
        ];

        let mut lower = collect_row_values(lower_rows.concat());
        let mut upper = collect_row_values(upper_rows.concat());

        if let Some(litres) = lower.remove(TOTAL_WATER_LITRES) {
            lower.set(WATER, litres * 1000.0);
        }

        for nutrient in SUPPLEMENT_ONLY_ULS {
            if let (Some(ul), Some(rda)) = (upper.get(nutrient), lower.get(nutrient)) {
                upper.set(*nutrient, ul + rda);
            }
        }

        debug!(
            group = %group,
            lower = lower.len(),
            upper = upper.len(),
            "Loaded nutrient bounds"
        );

        Ok(NutrientBounds::new(lower.standardised(), upper.standardised()))
    }
}

fn collect_row_values(row: Vec<(&str, Option<f64>)>) -> NutrientBoundSet {
    row.into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> ReferenceTable {
        ReferenceTable::from_reader(csv.as_bytes(), &[]).unwrap()
    }

    fn small_provider() -> NutrientBoundProvider {
        NutrientBoundProvider::new(
            table("Life-Stage Group,Vitamin C (mg),Folate (µg)\nMales 31-50 y,90,400\n"),
            table("Life-Stage Group,Vitamin C (mg),Folate (µg)\nMales 31-50 y,2000,1000\n"),
            table("Life-Stage Group,Magnesium (mg),Iron (mg)\nMales 31-50 y,420,8\n"),
            table("Life-Stage Group,Magnesium (mg),Iron (mg)\nMales 31-50 y,350,ND\n"),
            table("Life-Stage Group,Total Water (L),Fibre (g),Protein (g)\nMales 31-50 y,3.7,38,56\n"),
        )
    }

    #[test]
    fn test_life_stage_group_breakpoints() {
        assert_eq!(life_stage_group(2, Sex::Male), "Children 1-3 y");
        assert_eq!(life_stage_group(8, Sex::Female), "Children 4-8 y");
        assert_eq!(life_stage_group(13, Sex::Female), "Females 9-13 y");
        assert_eq!(life_stage_group(18, Sex::Male), "Males 14-18 y");
        assert_eq!(life_stage_group(30, Sex::Male), "Males 19-30 y");
        assert_eq!(life_stage_group(31, Sex::Male), "Males 31-50 y");
        assert_eq!(life_stage_group(70, Sex::Female), "Females 51-70 y");
        assert_eq!(life_stage_group(71, Sex::Female), "Females > 70 y");
    }

    #[test]
    fn test_corrective_rules() {
        let bounds = small_provider().get_bounds(40, Sex::Male).unwrap();

        // Water converted from litres and renamed.
        assert_eq!(bounds.lower.get("Water (mL)"), Some(3700.0));
        assert!(!bounds.lower.contains("Total Water (L)"));

        // Supplement-only ULs get the RDA added back in.
        assert_eq!(bounds.upper.get("Folate (µg)"), Some(1400.0));
        assert_eq!(bounds.upper.get("Magnesium (mg)"), Some(770.0));
        assert_eq!(bounds.upper.get("Vitamin C (mg)"), Some(2000.0));

        // ND cells are absent.
        assert!(!bounds.upper.contains("Iron (mg)"));
    }

    #[test]
    fn test_macro_keys_are_standardised() {
        let bounds = small_provider().get_bounds(40, Sex::Male).unwrap();
        assert_eq!(bounds.lower.get("fibre"), Some(38.0));
        assert_eq!(bounds.lower.get("protein"), Some(56.0));
    }

    #[test]
    fn test_missing_group_is_not_found() {
        let err = small_provider().get_bounds(25, Sex::Female).unwrap_err();
        match err {
            DietError::BoundsNotFound { group } => assert_eq!(group, "Females 19-30 y"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

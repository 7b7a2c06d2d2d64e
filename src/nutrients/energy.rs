use crate::models::Sex;
use crate::nutrients::catalogue::*;

/// Daily macro targets in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroTargets {
    pub protein: f64,
    pub carbohydrate: f64,
    pub fats: f64,
    pub fibre: f64,
    pub saturated_fats: f64,
}

/// Basal metabolic rate (Mifflin–St Jeor), truncated to whole kcal.
pub fn calculate_bmr(sex: Sex, weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    let bmr = match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    };
    bmr.trunc()
}

/// Total daily energy expenditure.
#[inline]
pub fn calculate_tdee(bmr: f64, activity_multiplier: f64) -> f64 {
    bmr * activity_multiplier
}

/// Daily intake as a share of TDEE, rounded to whole kcal.
#[inline]
pub fn daily_caloric_intake(tdee: f64, percentage: f64) -> f64 {
    (percentage * tdee).round()
}

/// Macro targets from an intake and protein/carb/fat energy fractions.
pub fn calculate_macros(intake_kcal: f64, pratio: f64, cratio: f64, fratio: f64) -> MacroTargets {
    MacroTargets {
        protein: pratio * intake_kcal / PROTEIN_KCAL_PER_GRAM,
        carbohydrate: cratio * intake_kcal / CARB_KCAL_PER_GRAM,
        fats: fratio * intake_kcal / FAT_KCAL_PER_GRAM,
        fibre: FIBRE_PER_KCAL * intake_kcal,
        saturated_fats: SATURATED_FAT_RATIO * intake_kcal / FAT_KCAL_PER_GRAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr_both_sexes() {
        assert_eq!(calculate_bmr(Sex::Male, 70.0, 175.0, 30), 1648.0);
        assert_eq!(calculate_bmr(Sex::Female, 60.0, 165.0, 30), 1320.0);
        assert_eq!(calculate_bmr(Sex::Female, 0.0, 0.0, 0), -161.0);
    }

    #[test]
    fn test_tdee_multipliers() {
        assert!((calculate_tdee(2000.0, 1.2) - 2400.0).abs() < 1e-9);
        assert!((calculate_tdee(2000.0, 1.725) - 3450.0).abs() < 1e-9);
        let tdee = calculate_tdee(1320.0, 1.55);
        assert!((2045.0..=2047.0).contains(&tdee));
    }

    #[test]
    fn test_macros() {
        let m = calculate_macros(2000.0, 0.3, 0.4, 0.3);
        assert!((m.protein - 150.0).abs() < 1e-9);
        assert!((m.carbohydrate - 200.0).abs() < 1e-9);
        assert!((m.fats - 66.666).abs() < 0.01);
        assert!((m.fibre - 28.0).abs() < 1e-9);
        assert!((m.saturated_fats - 22.222).abs() < 0.01);
    }
}

use std::collections::HashMap;
use std::sync::LazyLock;

// ─────────────────────────────────────────────────────────────────────────────
// Canonical nutrient keys
// ─────────────────────────────────────────────────────────────────────────────

pub const PROTEIN: &str = "protein";
pub const CARBOHYDRATE: &str = "carbohydrate";
pub const FATS: &str = "fats";
pub const FIBRE: &str = "fibre";
pub const SATURATED_FATS: &str = "saturated_fats";
pub const VITAMIN_C: &str = "Vitamin C (mg)";
pub const WATER: &str = "Water (mL)";

/// Macro nutrients whose lower limit comes from the caller's goals, not the tables.
pub const MACRO_NUTRIENTS: [&str; 4] = [PROTEIN, CARBOHYDRATE, FATS, FIBRE];

/// Nutrients constrained through `NutrientGoals` rather than the bound sets.
pub const GOAL_GOVERNED: [&str; 5] = [PROTEIN, CARBOHYDRATE, FATS, FIBRE, SATURATED_FATS];

/// A nutrient the optimiser tracks and reports totals for.
#[derive(Debug, Clone, Copy)]
pub struct NutrientInfo {
    /// Canonical key used in food profiles and bound sets.
    pub key: &'static str,
    /// Column header in the selected-foods spreadsheet.
    pub csv_header: &'static str,
}

const fn info(key: &'static str, csv_header: &'static str) -> NutrientInfo {
    NutrientInfo { key, csv_header }
}

/// Tracked nutrients, in spreadsheet column order.
pub const NUTRIENTS: &[NutrientInfo] = &[
    info(WATER, "Water (mL)"),
    info(CARBOHYDRATE, "Carbohydrate (g)"),
    info(FIBRE, "Fibre (g)"),
    info(FATS, "Fats (g)"),
    info(SATURATED_FATS, "Saturated Fats (g)"),
    info(PROTEIN, "Protein (g)"),
    info("Thiamin (mg)", "Thiamin (Vitamin B1) (mg)"),
    info("Riboflavin (mg)", "Riboflavin (Vitamin B2) (mg)"),
    info("Niacin (mg)", "Niacin (Vitamin B3) (mg)"),
    info("Pantothenic Acid (mg)", "Pantothenic Acid (Vitamin B5) (mg)"),
    info("Vitamin B6 (mg)", "Vitamin B6 (mg)"),
    info("Choline (mg)", "Choline (mg)"),
    info("Folate (µg)", "Folate (Vitamin B9) (mcg)"),
    info("Vitamin A (µg)", "Vitamin A (mcg)"),
    info(VITAMIN_C, "Vitamin C (mg)"),
    info("Vitamin E (mg)", "Vitamin E (mg)"),
    info("Vitamin K (µg)", "Vitamin K (mcg)"),
    info("Calcium (mg)", "Calcium (mg)"),
    info("Iron (mg)", "Iron (mg)"),
    info("Magnesium (mg)", "Magnesium (mg)"),
    info("Manganese (mg)", "Manganese (mg)"),
    info("Phosphorus (mg)", "Phosphorus (mg)"),
    info("Potassium (mg)", "Potassium (mg)"),
    info("Selenium (µg)", "Selenium (mcg)"),
    info("Sodium (mg)", "Sodium (mg)"),
    info("Zinc (mg)", "Zinc (mg)"),
];

/// Alternative spellings mapped to canonical keys.
pub static NUTRIENT_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("Protein (g)", PROTEIN);
    m.insert("Carbohydrate (g)", CARBOHYDRATE);
    m.insert("Carbohydrates (g)", CARBOHYDRATE);
    m.insert("Fats (g)", FATS);
    m.insert("Fat (g)", FATS);
    m.insert("Fibre (g)", FIBRE);
    m.insert("Fiber (g)", FIBRE);
    m.insert("fiber", FIBRE);
    m.insert("Saturated Fats (g)", SATURATED_FATS);
    m.insert("Vitamin A (mcg)", "Vitamin A (µg)");
    m.insert("Vitamin K (mcg)", "Vitamin K (µg)");
    m.insert("Folate (mcg)", "Folate (µg)");
    m.insert("Selenium (mcg)", "Selenium (µg)");
    m
});

/// Display names used in feasibility reports for goal-governed nutrients.
pub static GOAL_DISPLAY_NAMES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        m.insert(PROTEIN, "Protein (g)");
        m.insert(CARBOHYDRATE, "Carbohydrates (g)");
        m.insert(FATS, "Fats (g)");
        m.insert(FIBRE, "Fibre (g)");
        m.insert(SATURATED_FATS, "Saturated Fats (g)");
        m
    });

/// Map any known spelling of a nutrient to its canonical key.
pub fn canonical_nutrient(name: &str) -> &str {
    NUTRIENT_ALIASES.get(name).copied().unwrap_or(name)
}

/// Display name for a nutrient key.
pub fn display_name(key: &str) -> &str {
    GOAL_DISPLAY_NAMES.get(key).copied().unwrap_or(key)
}

pub fn is_goal_governed(key: &str) -> bool {
    GOAL_GOVERNED.contains(&key)
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference tables
// ─────────────────────────────────────────────────────────────────────────────

pub const LIFE_STAGE_COLUMN: &str = "Life-Stage Group";

/// Sentinel for "not determined" in the reference tables.
pub const NO_DATA: &str = "ND";

/// Life-stage rows dropped from every table (substring match).
pub const EXCLUDED_AGE_GROUPS: &[&str] = &[
    "Infants",
    "Children",
    "Lactation",
    "Pregnancy",
    "Males 9-13 y",
    "Males 14-18 y",
    "Females 9-13 y",
    "Females 14-18 y",
];

pub const VITAMINS_RDA_EXCLUDE: &[&str] = &["Biotin (µg)", "Vitamin D (µg)", "Vitamin B12 (µg)"];
pub const VITAMINS_UL_EXCLUDE: &[&str] = &["Vitamin D (µg)"];
pub const ELEMENTS_RDA_EXCLUDE: &[&str] = &[
    "Chromium (µg)",
    "Molybdenum (µg)",
    "Chloride (g)",
    "Fluoride (mg)",
    "Iodine (µg)",
    "Copper (µg)",
];
pub const ELEMENTS_UL_EXCLUDE: &[&str] = &[
    "Boron (mg)",
    "Molybdenum (µg)",
    "Chloride (g)",
    "Fluoride (mg)",
    "Iodine (µg)",
    "Nickel (mg)",
    "Vanadium (µg)",
    "Copper (µg)",
];
pub const MACROS_RDA_EXCLUDE: &[&str] = &["Fat (g)", "Linoleic Acid (g)", "α-Linolenic Acid (g)"];

/// Upper limits defined as intake from supplements only; the RDA is added back in.
pub const SUPPLEMENT_ONLY_ULS: &[&str] = &[
    "Folate (µg)",
    "Niacin (mg)",
    "Vitamin E (mg)",
    "Magnesium (mg)",
];

pub const TOTAL_WATER_LITRES: &str = "Total Water (L)";

/// Extra vitamin C lower bound for smokers, in mg.
pub const SMOKER_VITAMIN_C_MG: f64 = 35.0;

// ─────────────────────────────────────────────────────────────────────────────
// Energy
// ─────────────────────────────────────────────────────────────────────────────

pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
pub const CARB_KCAL_PER_GRAM: f64 = 4.0;
pub const FAT_KCAL_PER_GRAM: f64 = 9.0;

/// Grams of fibre per kcal of intake.
pub const FIBRE_PER_KCAL: f64 = 0.014;

/// Share of intake energy allowed from saturated fat.
pub const SATURATED_FAT_RATIO: f64 = 0.10;

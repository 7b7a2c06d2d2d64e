use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{DietError, Result};
use crate::models::Food;
use crate::nutrients::catalogue::{NUTRIENTS, canonical_nutrient};
use crate::state::FoodSelection;

// Spreadsheet layout of an exported selection.
const DISCRETE_SERVINGS: &str = "Discrete Servings";
const MUST_INCLUDE: &str = "Must Include";
const FOOD_ITEM: &str = "Food Item";
const PRICE_PER_SERVING: &str = "Price Per Serving";
const SERVING_SIZE: &str = "Serving Size (g)";
const MAX_SERVING: &str = "Max Serving (g)";
const FDC_ID: &str = "FDC ID";

const DEFAULT_SERVING_G: f64 = 100.0;

/// Load foods from a JSON file.
///
/// Deduplicates by id (last occurrence wins, first position kept).
pub fn load_foods<P: AsRef<Path>>(path: P) -> Result<Vec<Food>> {
    let content = fs::read_to_string(path)?;
    let foods: Vec<Food> = serde_json::from_str(&content)?;
    Ok(FoodSelection::new(foods).to_foods())
}

/// Save foods to a JSON file, deduplicated by id.
pub fn save_foods<P: AsRef<Path>>(path: P, foods: &[Food]) -> Result<()> {
    let deduped = FoodSelection::new(foods.to_vec()).to_foods();
    let json = serde_json::to_string_pretty(&deduped)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a saved selection, or an empty one if the file does not exist yet.
pub fn load_selection<P: AsRef<Path>>(path: P) -> Result<FoodSelection> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(FoodSelection::default());
    }
    Ok(FoodSelection::new(load_foods(path)?))
}

fn header_row() -> Vec<&'static str> {
    let mut headers = vec![
        DISCRETE_SERVINGS,
        MUST_INCLUDE,
        FOOD_ITEM,
        PRICE_PER_SERVING,
        SERVING_SIZE,
        MAX_SERVING,
    ];
    headers.extend(NUTRIENTS.iter().map(|n| n.csv_header));
    headers.push(FDC_ID);
    headers
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Write foods in the spreadsheet layout, nutrients per serving.
pub fn export_csv<W: Write>(writer: W, foods: &[Food]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header_row())?;

    for food in foods {
        let mut record = vec![
            yes_no(food.requires_integer_servings).to_string(),
            yes_no(food.must_include).to_string(),
            food.description.clone(),
            food.price.to_string(),
            food.serving_size.to_string(),
            food.max_serving.map(|g| g.to_string()).unwrap_or_default(),
        ];
        record.extend(NUTRIENTS.iter().map(|n| food.per_serving(n.key).to_string()));
        record.push(food.fdc_id.clone());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_csv_path<P: AsRef<Path>>(path: P, foods: &[Food]) -> Result<()> {
    export_csv(File::create(path)?, foods)
}

/// Map a spreadsheet column to the nutrient key it holds, if any.
fn nutrient_for_header(header: &str) -> Option<&'static str> {
    NUTRIENTS
        .iter()
        .find(|n| n.csv_header == header || n.key == canonical_nutrient(header))
        .map(|n| n.key)
}

fn number(cell: Option<&str>) -> f64 {
    cell.and_then(|c| c.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Read foods from the spreadsheet layout, converting to per-100 g.
///
/// Rows without a food name are skipped; a file with rows but no named food
/// is rejected. A missing or zero serving size means 100 g.
pub fn import_csv<R: Read>(reader: R) -> Result<Vec<Food>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();
    let nutrient_columns: Vec<(usize, &'static str)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| nutrient_for_header(h).map(|key| (i, key)))
        .collect();

    let mut foods = Vec::new();
    let mut rows = 0usize;

    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        rows += 1;
        let cell = |name: &str| {
            column
                .get(name)
                .and_then(|&i| record.get(i))
                .filter(|c| !c.is_empty())
        };

        let Some(description) = cell(FOOD_ITEM) else {
            continue;
        };

        let serving_size = match number(cell(SERVING_SIZE)) {
            s if s > 0.0 => s,
            _ => DEFAULT_SERVING_G,
        };

        let mut nutrients = BTreeMap::new();
        for &(i, key) in &nutrient_columns {
            let per_serving = number(record.get(i));
            nutrients
                .entry(key.to_string())
                .or_insert(per_serving * 100.0 / serving_size);
        }

        let max_serving = Some(number(cell(MAX_SERVING))).filter(|g| *g > 0.0);

        foods.push(Food {
            fdc_id: cell(FDC_ID)
                .map(str::to_string)
                .unwrap_or_else(|| format!("imported-{}", index + 1)),
            description: description.to_string(),
            price: number(cell(PRICE_PER_SERVING).or_else(|| cell("Price"))),
            serving_size,
            max_serving,
            must_include: cell(MUST_INCLUDE) == Some("Yes"),
            requires_integer_servings: cell(DISCRETE_SERVINGS) == Some("Yes"),
            nutrients,
        });
    }

    if rows > 0 && foods.is_empty() {
        return Err(DietError::InvalidInput(format!(
            "Missing required '{}' column",
            FOOD_ITEM
        )));
    }

    debug!(rows, imported = foods.len(), "Imported foods from CSV");
    Ok(foods)
}

pub fn import_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<Food>> {
    import_csv(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn sample_food() -> Food {
        Food {
            fdc_id: "173944".to_string(),
            description: "Banana, raw".to_string(),
            price: 0.25,
            serving_size: 120.0,
            max_serving: Some(360.0),
            must_include: true,
            requires_integer_servings: true,
            nutrients: [
                ("carbohydrate".to_string(), 22.8),
                ("Potassium (mg)".to_string(), 358.0),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_load_and_save_roundtrip() {
        let json = r#"[
            {"fdcId": 173944, "description": "Banana, raw", "price": 0.25, "servingSize": 120, "nutrients": {"carbohydrate": 22.8}}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let foods = load_foods(file.path()).unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].fdc_id, "173944");

        let out_file = NamedTempFile::new().unwrap();
        save_foods(out_file.path(), &foods).unwrap();

        let reloaded = load_foods(out_file.path()).unwrap();
        assert_eq!(reloaded, foods);
    }

    #[test]
    fn test_deduplication() {
        let json = r#"[
            {"id": "1", "name": "Oats", "price": 0.2, "servingSize": 40},
            {"id": "1", "name": "Rolled Oats", "price": 0.3, "servingSize": 40}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let foods = load_foods(file.path()).unwrap();
        assert_eq!(foods.len(), 1);
        // Last occurrence wins
        assert_eq!(foods[0].description, "Rolled Oats");
        assert_eq!(foods[0].price, 0.3);
    }

    #[test]
    fn test_missing_selection_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let selection = load_selection(dir.path().join("selection.json")).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_csv_export_then_import() {
        let mut buf = Vec::new();
        export_csv(&mut buf, &[sample_food()]).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("Discrete Servings,Must Include,Food Item,"));
        assert!(header.ends_with(",FDC ID"));

        let foods = import_csv(buf.as_slice()).unwrap();
        let food = &foods[0];
        assert_eq!(food.fdc_id, "173944");
        assert!(food.must_include && food.requires_integer_servings);
        assert_eq!(food.max_serving, Some(360.0));
        assert!((food.nutrient("carbohydrate") - 22.8).abs() < 1e-9);
        assert!((food.nutrient("Potassium (mg)") - 358.0).abs() < 1e-9);
        assert_eq!(food.nutrient("Iron (mg)"), 0.0);
    }

    #[test]
    fn test_csv_import_converts_to_per_100g() {
        let csv = "\
Food Item,Serving Size (g),Price Per Serving,Protein (g),Vitamin A (µg),Fiber (g)
Greek Yogurt,200,1.10,20,50,
,100,1,1,1,1
Lentils,,0.4,9,,8
";
        let foods = import_csv(csv.as_bytes()).unwrap();
        assert_eq!(foods.len(), 2);

        let yogurt = &foods[0];
        assert_eq!(yogurt.fdc_id, "imported-1");
        assert!((yogurt.nutrient("protein") - 10.0).abs() < 1e-9);
        assert!((yogurt.nutrient("Vitamin A (µg)") - 25.0).abs() < 1e-9);
        assert!(!yogurt.must_include);

        let lentils = &foods[1];
        assert_eq!(lentils.serving_size, 100.0);
        assert_eq!(lentils.fdc_id, "imported-3");
        assert!((lentils.nutrient("fibre") - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_csv_without_food_item_is_rejected() {
        let csv = "Name,Price\nRice,0.3\n";
        assert!(matches!(
            import_csv(csv.as_bytes()),
            Err(DietError::InvalidInput(_))
        ));
        assert!(import_csv("Food Item,Price\n".as_bytes()).unwrap().is_empty());
    }
}

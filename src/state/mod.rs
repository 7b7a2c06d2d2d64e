mod manager;
mod persistence;

pub use manager::{FoodSelection, SIMILARITY_THRESHOLD, SharedSelection};
pub use persistence::{
    export_csv, export_csv_path, import_csv, import_csv_path, load_foods, load_selection,
    save_foods,
};

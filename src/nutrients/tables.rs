use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DietError, Result};
use crate::nutrients::catalogue::*;

/// The five reference tables a bound lookup draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    VitaminsRda,
    VitaminsUl,
    ElementsRda,
    ElementsUl,
    MacrosRda,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::VitaminsRda,
        TableKind::VitaminsUl,
        TableKind::ElementsRda,
        TableKind::ElementsUl,
        TableKind::MacrosRda,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TableKind::VitaminsRda => "vitamins-RDAs.csv",
            TableKind::VitaminsUl => "vitamins-ULs.csv",
            TableKind::ElementsRda => "elements-RDAs.csv",
            TableKind::ElementsUl => "elements-ULs.csv",
            TableKind::MacrosRda => "macros-RDAs.csv",
        }
    }

    /// Deprecated or irrelevant columns dropped on load.
    pub fn excluded_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::VitaminsRda => VITAMINS_RDA_EXCLUDE,
            TableKind::VitaminsUl => VITAMINS_UL_EXCLUDE,
            TableKind::ElementsRda => ELEMENTS_RDA_EXCLUDE,
            TableKind::ElementsUl => ELEMENTS_UL_EXCLUDE,
            TableKind::MacrosRda => MACROS_RDA_EXCLUDE,
        }
    }

    /// Table contents compiled into the binary.
    pub fn bundled(self) -> &'static str {
        match self {
            TableKind::VitaminsRda => include_str!("../../data/vitamins-RDAs.csv"),
            TableKind::VitaminsUl => include_str!("../../data/vitamins-ULs.csv"),
            TableKind::ElementsRda => include_str!("../../data/elements-RDAs.csv"),
            TableKind::ElementsUl => include_str!("../../data/elements-ULs.csv"),
            TableKind::MacrosRda => include_str!("../../data/macros-RDAs.csv"),
        }
    }
}

/// One row per life-stage group, one column per nutrient (unit in the name).
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    columns: Vec<String>,
    rows: Vec<(String, Vec<Option<f64>>)>,
}

impl ReferenceTable {
    /// Parse a table, dropping `excluded` columns and non-adult life-stage rows.
    ///
    /// Cells that are not numeric (including the "ND" sentinel) load as `None`.
    pub fn from_reader<R: Read>(reader: R, excluded: &[&str]) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let group_idx = headers
            .iter()
            .position(|h| h == LIFE_STAGE_COLUMN)
            .ok_or_else(|| {
                DietError::InvalidInput(format!("missing '{}' column", LIFE_STAGE_COLUMN))
            })?;

        let kept: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != group_idx && !excluded.contains(h))
            .map(|(i, _)| i)
            .collect();
        let columns = kept.iter().map(|&i| headers[i].to_string()).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let group = record.get(group_idx).unwrap_or_default().to_string();
            if is_excluded_group(&group) {
                continue;
            }
            let values = kept
                .iter()
                .map(|&i| record.get(i).and_then(parse_cell))
                .collect();
            rows.push((group, values));
        }

        Ok(Self { columns, rows })
    }

    pub fn from_path<P: AsRef<Path>>(path: P, excluded: &[&str]) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, excluded)
    }

    pub fn load(kind: TableKind, dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_path(dir.join(kind.file_name()), kind.excluded_columns()),
            None => Self::from_reader(kind.bundled().as_bytes(), kind.excluded_columns()),
        }
    }

    /// Nutrient values for a life-stage group, if the table has that row.
    pub fn row(&self, group: &str) -> Option<Vec<(&str, Option<f64>)>> {
        self.rows.iter().find(|(g, _)| g == group).map(|(_, values)| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(values.iter().copied())
                .collect()
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(g, _)| g.as_str())
    }
}

fn is_excluded_group(group: &str) -> bool {
    EXCLUDED_AGE_GROUPS.iter().any(|ex| group.contains(ex))
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell == NO_DATA {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Life-Stage Group,Vitamin A (µg),Vitamin D (µg),Vitamin C (mg)
Children 1-3 y,300,15,15
Males 19-30 y,900,15,90
Females 19-30 y,700,15,ND
";

    #[test]
    fn test_drops_excluded_columns_and_groups() {
        let table = ReferenceTable::from_reader(SAMPLE.as_bytes(), &["Vitamin D (µg)"]).unwrap();
        assert_eq!(table.columns(), ["Vitamin A (µg)", "Vitamin C (mg)"]);
        assert_eq!(
            table.groups().collect::<Vec<_>>(),
            ["Males 19-30 y", "Females 19-30 y"]
        );
        assert!(table.row("Children 1-3 y").is_none());
    }

    #[test]
    fn test_no_data_sentinel_is_absent() {
        let table = ReferenceTable::from_reader(SAMPLE.as_bytes(), &[]).unwrap();
        let row = table.row("Females 19-30 y").unwrap();
        assert_eq!(row[0], ("Vitamin A (µg)", Some(700.0)));
        assert_eq!(row[2], ("Vitamin C (mg)", None));
    }

    #[test]
    fn test_missing_group_column_is_an_error() {
        let err = ReferenceTable::from_reader("Age,Iron (mg)\n30,8\n".as_bytes(), &[]);
        assert!(err.is_err());
    }

    #[test]
    fn test_bundled_tables_parse() {
        for kind in TableKind::ALL {
            let table = ReferenceTable::load(kind, None).unwrap();
            assert!(table.row("Males 31-50 y").is_some(), "{:?}", kind);
            for excluded in kind.excluded_columns() {
                assert!(!table.columns().iter().any(|c| c == excluded));
            }
        }
    }
}

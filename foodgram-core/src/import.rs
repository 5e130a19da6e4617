//! CSV fixture readers for the reference data (ingredients and tags).
//!
//! Files have no header row. Ingredient rows are `name,unit`; tag rows are
//! `name,color,slug`. Rows with the wrong number of fields are skipped and
//! counted, rows with the right shape but invalid values are errors.

use crate::validation::{validate_ingredient, validate_tag, ValidationError};
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Parsed rows plus the number of malformed rows that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

pub fn read_ingredients<R: Read>(reader: R) -> Result<Parsed<IngredientRecord>, ImportError> {
    read_rows(reader, 2, |line, fields| {
        let name = fields[0].trim();
        let measurement_unit = fields[1].trim();
        validate_ingredient(name, measurement_unit)
            .map_err(|source| ImportError::InvalidRow { line, source })?;
        Ok(IngredientRecord {
            name: name.to_string(),
            measurement_unit: measurement_unit.to_string(),
        })
    })
}

pub fn read_tags<R: Read>(reader: R) -> Result<Parsed<TagRecord>, ImportError> {
    read_rows(reader, 3, |line, fields| {
        let (name, color, slug) = (fields[0].trim(), fields[1].trim(), fields[2].trim());
        validate_tag(name, color, slug)
            .map_err(|source| ImportError::InvalidRow { line, source })?;
        Ok(TagRecord {
            name: name.to_string(),
            color: color.to_uppercase(),
            slug: slug.to_string(),
        })
    })
}

fn read_rows<R, T, F>(reader: R, width: usize, mut convert: F) -> Result<Parsed<T>, ImportError>
where
    R: Read,
    F: FnMut(u64, &csv::StringRecord) -> Result<T, ImportError>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped = 0;
    for row in csv_reader.records() {
        let row = row?;
        if row.len() != width {
            skipped += 1;
            continue;
        }
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        records.push(convert(line, &row)?);
    }

    Ok(Parsed { records, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ingredients() {
        let csv = "абрикосовое варенье,г\n\"мука, пшеничная\",г\nbroken row\nсоль,по вкусу\n";
        let parsed = read_ingredients(csv.as_bytes()).unwrap();

        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.records[1].name, "мука, пшеничная");
        assert_eq!(parsed.records[2].measurement_unit, "по вкусу");
    }

    #[test]
    fn test_blank_unit_is_an_error() {
        let csv = "salt,g\npepper,\n";
        match read_ingredients(csv.as_bytes()) {
            Err(ImportError::InvalidRow { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(
                    source,
                    ValidationError::Empty {
                        field: "measurement_unit"
                    }
                );
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn test_read_tags() {
        let csv = "Завтрак,#e26c2d,breakfast\nОбед,#49B64E,lunch\n";
        let parsed = read_tags(csv.as_bytes()).unwrap();
        assert_eq!(parsed.skipped, 0);
        assert_eq!(
            parsed.records[0],
            TagRecord {
                name: "Завтрак".to_string(),
                color: "#E26C2D".to_string(),
                slug: "breakfast".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_tag_color() {
        let csv = "Ужин,purple,dinner\n";
        assert!(matches!(
            read_tags(csv.as_bytes()),
            Err(ImportError::InvalidRow {
                source: ValidationError::InvalidColor,
                ..
            })
        ));
    }
}

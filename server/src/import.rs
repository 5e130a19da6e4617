//! `import-ingredients` and `import-tags`: load reference data from CSV.

use crate::models::{NewIngredient, NewTag};
use crate::schema::{ingredients, tags};
use anyhow::Context;
use diesel::prelude::*;
use foodgram_core::import::{read_ingredients, read_tags};
use std::fs::File;
use std::path::Path;

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Rows written to the database
    pub inserted: usize,
    /// Rows that already existed
    pub existing: usize,
    /// Rows with the wrong number of fields
    pub skipped: usize,
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

/// Get-or-create every `(name, unit)` pair in the file.
pub fn import_ingredients(conn: &mut PgConnection, path: &Path) -> anyhow::Result<ImportSummary> {
    let parsed = read_ingredients(open(path)?)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let total = parsed.records.len();

    let inserted = conn.transaction(|conn| {
        let mut inserted = 0;
        for record in &parsed.records {
            inserted += diesel::insert_into(ingredients::table)
                .values(&NewIngredient {
                    name: &record.name,
                    measurement_unit: &record.measurement_unit,
                })
                .on_conflict((ingredients::name, ingredients::measurement_unit))
                .do_nothing()
                .execute(conn)?;
        }
        Ok::<_, diesel::result::Error>(inserted)
    })?;

    let summary = ImportSummary {
        inserted,
        existing: total - inserted,
        skipped: parsed.skipped,
    };
    tracing::info!(
        path = %path.display(),
        inserted = summary.inserted,
        existing = summary.existing,
        skipped = summary.skipped,
        "ingredients imported"
    );
    Ok(summary)
}

/// Get-or-create every tag in the file, keyed by slug.
pub fn import_tags(conn: &mut PgConnection, path: &Path) -> anyhow::Result<ImportSummary> {
    let parsed =
        read_tags(open(path)?).with_context(|| format!("Failed to parse {}", path.display()))?;
    let total = parsed.records.len();

    let inserted = conn.transaction(|conn| {
        let mut inserted = 0;
        for record in &parsed.records {
            inserted += diesel::insert_into(tags::table)
                .values(&NewTag {
                    name: &record.name,
                    color: &record.color,
                    slug: &record.slug,
                })
                .on_conflict(tags::slug)
                .do_nothing()
                .execute(conn)?;
        }
        Ok::<_, diesel::result::Error>(inserted)
    })?;

    let summary = ImportSummary {
        inserted,
        existing: total - inserted,
        skipped: parsed.skipped,
    };
    tracing::info!(
        path = %path.display(),
        inserted = summary.inserted,
        existing = summary.existing,
        skipped = summary.skipped,
        "tags imported"
    );
    Ok(summary)
}

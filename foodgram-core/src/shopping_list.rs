//! Shopping-list aggregation.
//!
//! A user's cart resolves to a flat list of recipe-ingredient rows. This
//! module sums those rows per `(ingredient name, measurement unit)` and
//! renders the result as the plain-text shopping list users download.

use std::collections::BTreeMap;
use std::fmt::Write;

/// First lines of every downloaded shopping list.
pub const REPORT_HEADER: &str = "Foodgram\nShopping list:\n";

/// Filename offered in the `Content-Disposition` of the download.
pub const REPORT_FILENAME: &str = "shopping-list.txt";

/// One recipe-ingredient row reachable from a cart entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredient {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl CartIngredient {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: i32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Grouping key. Equality is exact on both fields; ordering is by name, then unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IngredientKey {
    pub name: String,
    pub measurement_unit: String,
}

/// Aggregated totals for one user's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    totals: BTreeMap<IngredientKey, i64>,
}

impl ShoppingList {
    /// Sum every row into its `(name, unit)` bucket.
    pub fn aggregate<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = CartIngredient>,
    {
        let mut totals: BTreeMap<IngredientKey, i64> = BTreeMap::new();
        for row in rows {
            let key = IngredientKey {
                name: row.name,
                measurement_unit: row.measurement_unit,
            };
            *totals.entry(key).or_insert(0) += i64::from(row.amount);
        }
        Self { totals }
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn get(&self, name: &str, measurement_unit: &str) -> Option<i64> {
        self.totals
            .get(&IngredientKey {
                name: name.to_string(),
                measurement_unit: measurement_unit.to_string(),
            })
            .copied()
    }

    /// Entries in report order (name, then unit).
    pub fn iter(&self) -> impl Iterator<Item = (&IngredientKey, i64)> {
        self.totals.iter().map(|(key, amount)| (key, *amount))
    }

    /// Render the downloadable text: header, then `"{name}, {amount} {unit}"` per line.
    pub fn render_report(&self) -> String {
        let mut report = String::from(REPORT_HEADER);
        for (key, amount) in self.iter() {
            // Writing into a String cannot fail.
            let _ = writeln!(report, "{}, {} {}", key.name, amount, key.measurement_unit);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cart_renders_header_only() {
        let list = ShoppingList::aggregate(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.render_report(), REPORT_HEADER);
    }

    #[test]
    fn test_report_lines_sorted_by_name_then_unit() {
        let list = ShoppingList::aggregate(vec![
            CartIngredient::new("sugar", "g", 50),
            CartIngredient::new("salt", "tsp", 1),
            CartIngredient::new("salt", "g", 5),
        ]);

        assert_eq!(
            list.render_report(),
            "Foodgram\nShopping list:\nsalt, 5 g\nsalt, 1 tsp\nsugar, 50 g\n"
        );
    }

    #[test]
    fn test_names_are_not_merged_across_case() {
        let list = ShoppingList::aggregate(vec![
            CartIngredient::new("Flour", "g", 100),
            CartIngredient::new("flour", "g", 100),
        ]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_large_totals_do_not_overflow_i32() {
        let list = ShoppingList::aggregate(vec![
            CartIngredient::new("water", "ml", i32::MAX),
            CartIngredient::new("water", "ml", i32::MAX),
        ]);
        assert_eq!(list.get("water", "ml"), Some(2 * i64::from(i32::MAX)));
    }
}

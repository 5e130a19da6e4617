//! Aggregation behaviour of the shopping list as seen by callers.

use foodgram_core::shopping_list::{CartIngredient, ShoppingList, REPORT_HEADER};

/// Recipe-ingredient rows grouped per recipe, the way a cart resolves them.
fn recipe_a() -> Vec<CartIngredient> {
    vec![
        CartIngredient::new("flour", "g", 200),
        CartIngredient::new("egg", "pcs", 2),
        CartIngredient::new("salt", "g", 5),
    ]
}

fn recipe_b() -> Vec<CartIngredient> {
    vec![
        CartIngredient::new("flour", "g", 300),
        CartIngredient::new("milk", "ml", 250),
        CartIngredient::new("salt", "tsp", 1),
    ]
}

fn recipe_c() -> Vec<CartIngredient> {
    vec![
        CartIngredient::new("egg", "pcs", 3),
        CartIngredient::new("sugar", "g", 80),
    ]
}

fn cart(recipes: &[Vec<CartIngredient>]) -> Vec<CartIngredient> {
    recipes.iter().flatten().cloned().collect()
}

#[test]
fn empty_cart_yields_empty_mapping() {
    let list = ShoppingList::aggregate(Vec::new());
    assert!(list.is_empty());
    assert_eq!(list.iter().count(), 0);
    assert_eq!(list.render_report(), REPORT_HEADER);
}

#[test]
fn shared_ingredient_amounts_are_summed() {
    let list = ShoppingList::aggregate(cart(&[recipe_a(), recipe_b()]));
    assert_eq!(list.get("flour", "g"), Some(500));
    assert_eq!(list.get("milk", "ml"), Some(250));
    assert_eq!(list.get("egg", "pcs"), Some(2));
}

#[test]
fn aggregation_is_order_independent() {
    let recipes = [recipe_a(), recipe_b(), recipe_c()];
    let expected = ShoppingList::aggregate(cart(&recipes));

    let mut rows = cart(&recipes);
    rows.reverse();
    assert_eq!(ShoppingList::aggregate(rows.clone()), expected);

    for shift in 1..rows.len() {
        rows.rotate_left(shift);
        assert_eq!(ShoppingList::aggregate(rows.clone()), expected);
    }

    let reordered = cart(&[recipe_c(), recipe_a(), recipe_b()]);
    assert_eq!(ShoppingList::aggregate(reordered), expected);
}

#[test]
fn removing_a_recipe_drops_its_contributions() {
    let full = ShoppingList::aggregate(cart(&[recipe_a(), recipe_b(), recipe_c()]));
    assert_eq!(full.get("egg", "pcs"), Some(5));
    assert_eq!(full.get("sugar", "g"), Some(80));

    let without_c = ShoppingList::aggregate(cart(&[recipe_a(), recipe_b()]));
    assert_eq!(without_c.get("egg", "pcs"), Some(2));
    assert_eq!(without_c.get("sugar", "g"), None);
}

#[test]
fn different_units_stay_separate() {
    let list = ShoppingList::aggregate(cart(&[recipe_a(), recipe_b()]));
    assert_eq!(list.get("salt", "g"), Some(5));
    assert_eq!(list.get("salt", "tsp"), Some(1));
    assert_eq!(list.iter().filter(|(key, _)| key.name == "salt").count(), 2);
}

#[test]
fn report_lists_one_line_per_ingredient() {
    let report = ShoppingList::aggregate(cart(&[recipe_a(), recipe_b()])).render_report();
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Foodgram",
            "Shopping list:",
            "egg, 2 pcs",
            "flour, 500 g",
            "milk, 250 ml",
            "salt, 5 g",
            "salt, 1 tsp",
        ]
    );
}

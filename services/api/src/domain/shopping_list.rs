//! Shopping list aggregation over the ingredient lines of cart recipes.

use std::collections::HashMap;

use crate::domain::types::CartLine;

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: f64,
}

/// Sum amounts per ingredient, ordered by ingredient name.
///
/// Every line counts, so an ingredient amount shared by two cart recipes is
/// added twice.
pub fn aggregate(lines: Vec<CartLine>) -> Vec<ShoppingListItem> {
    let mut by_ingredient: HashMap<i32, ShoppingListItem> = HashMap::new();
    for line in lines {
        by_ingredient
            .entry(line.ingredient_id)
            .and_modify(|item| item.amount += line.amount)
            .or_insert(ShoppingListItem {
                name: line.name,
                measurement_unit: line.measurement_unit,
                amount: line.amount,
            });
    }
    let mut items: Vec<(i32, ShoppingListItem)> = by_ingredient.into_iter().collect();
    items.sort_by(|(a_id, a), (b_id, b)| a.name.cmp(&b.name).then(a_id.cmp(b_id)));
    items.into_iter().map(|(_, item)| item).collect()
}

/// One `name amount unit` line per item. Empty input renders as an empty string.
pub fn render(items: &[ShoppingListItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} {} {}\n",
                item.name,
                format_amount(item.amount),
                item.measurement_unit
            )
        })
        .collect()
}

/// Round away float noise from summation; integral values print without `.0`.
fn format_amount(amount: f64) -> String {
    let rounded = (amount * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

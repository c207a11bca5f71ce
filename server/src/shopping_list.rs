//! Shopping list aggregation.
//!
//! Collects the ingredient lines of every recipe in a user's cart, merges
//! lines that share (name, measurement unit), and renders a plain-text
//! report. The report is recomputed on every request; nothing is cached or
//! persisted.

use crate::schema::{cart_entries, ingredients, recipe_lines};
use diesel::prelude::*;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Attachment filename handed to the HTTP boundary.
pub const REPORT_FILENAME: &str = "shopping_list.txt";

const REPORT_HEADER: &str = "=== Shopping list ===\n\n";
const EMPTY_CART_LINE: &str = "Your shopping cart is empty.\n";

/// One merged report line: every cart occurrence of the same
/// (name, measurement unit) pair summed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Raw (name, unit, amount) rows for every line of every recipe in the
/// user's cart. A single statement, so the result is one consistent
/// snapshot even while a concurrent update is replacing a recipe's lines.
pub fn cart_lines(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> QueryResult<Vec<(String, String, i32)>> {
    cart_entries::table
        .inner_join(
            recipe_lines::table.on(recipe_lines::recipe_id.eq(cart_entries::recipe_id)),
        )
        .inner_join(ingredients::table.on(ingredients::id.eq(recipe_lines::ingredient_id)))
        .filter(cart_entries::user_id.eq(user_id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_lines::amount,
        ))
        .load(conn)
}

/// Groups rows by the case-sensitive (name, unit) pair and sums amounts.
/// Rows with a non-positive amount are dropped rather than trusted, even
/// though the line constraints should make them impossible. The result is
/// sorted ascending by name (then unit).
pub fn aggregate(rows: Vec<(String, String, i32)>) -> Vec<AggregatedLine> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();

    for (name, unit, amount) in rows {
        if amount < 1 {
            continue;
        }
        *totals.entry((name, unit)).or_insert(0) += i64::from(amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| AggregatedLine {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

/// Renders the report text. An empty cart renders the sentinel line, never
/// an empty body.
pub fn render_report(lines: &[AggregatedLine]) -> String {
    let mut report = String::from(REPORT_HEADER);

    if lines.is_empty() {
        report.push_str(EMPTY_CART_LINE);
        return report;
    }

    for line in lines {
        report.push_str(&format!(
            "{} - {} {}\n",
            line.name, line.total_amount, line.measurement_unit
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, unit: &str, amount: i32) -> (String, String, i32) {
        (name.to_string(), unit.to_string(), amount)
    }

    #[test]
    fn test_merges_same_ingredient_across_recipes() {
        // Flour from two different recipes in the cart collapses to one line
        let lines = aggregate(vec![row("Flour", "g", 200), row("Flour", "g", 300)]);
        assert_eq!(
            lines,
            vec![AggregatedLine {
                name: "Flour".to_string(),
                measurement_unit: "g".to_string(),
                total_amount: 500,
            }]
        );
    }

    #[test]
    fn test_same_name_different_unit_stays_separate() {
        let lines = aggregate(vec![row("Milk", "ml", 250), row("Milk", "cup", 1)]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].measurement_unit, "cup");
        assert_eq!(lines[1].measurement_unit, "ml");
    }

    #[test]
    fn test_grouping_is_case_sensitive() {
        let lines = aggregate(vec![row("flour", "g", 100), row("Flour", "g", 100)]);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_sorted_by_name() {
        let lines = aggregate(vec![
            row("Sugar", "g", 50),
            row("Egg", "pc", 2),
            row("Flour", "g", 200),
        ]);
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Egg", "Flour", "Sugar"]);
    }

    #[test]
    fn test_order_of_cart_rows_is_irrelevant() {
        let forward = vec![row("Flour", "g", 200), row("Egg", "pc", 2), row("Flour", "g", 300)];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(aggregate(forward), aggregate(backward));
    }

    #[test]
    fn test_non_positive_amounts_dropped() {
        let lines = aggregate(vec![
            row("Flour", "g", 200),
            row("Flour", "g", 0),
            row("Salt", "g", -5),
        ]);
        assert_eq!(
            lines,
            vec![AggregatedLine {
                name: "Flour".to_string(),
                measurement_unit: "g".to_string(),
                total_amount: 200,
            }]
        );
    }

    #[test]
    fn test_render_report_lines() {
        let report = render_report(&aggregate(vec![
            row("Flour", "g", 200),
            row("Sugar", "g", 50),
            row("Flour", "g", 300),
            row("Egg", "pc", 2),
        ]));
        assert_eq!(
            report,
            "=== Shopping list ===\n\nEgg - 2 pc\nFlour - 500 g\nSugar - 50 g\n"
        );
    }

    #[test]
    fn test_render_empty_cart_sentinel() {
        let report = render_report(&[]);
        assert_eq!(report, "=== Shopping list ===\n\nYour shopping cart is empty.\n");
        assert!(!report.is_empty());
    }
}

//! Recipe ingredient lines.
//!
//! A recipe owns its lines exclusively: they are bulk-inserted when the
//! recipe is created and replaced wholesale when it is updated. An ingredient
//! appears at most once per recipe and every amount is a positive integer.
//! All validation runs before any write so a failed request leaves the
//! existing lines untouched.

use crate::models::NewRecipeLine;
use crate::schema::{ingredients, recipe_lines};
use diesel::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// One `{id, amount}` pair from a create/update request.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct LineInput {
    /// Catalog ingredient id
    pub id: Uuid,
    /// Amount in the ingredient's measurement unit, must be >= 1
    pub amount: i32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineError {
    Empty,
    Duplicate(Uuid),
    InvalidAmount(i32),
    UnknownIngredient(Uuid),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::Empty => write!(f, "At least one ingredient is required"),
            LineError::Duplicate(id) => {
                write!(f, "Ingredient {} is listed more than once", id)
            }
            LineError::InvalidAmount(amount) => {
                write!(f, "Amount must be a positive integer, got {}", amount)
            }
            LineError::UnknownIngredient(id) => {
                write!(f, "Ingredient {} does not exist", id)
            }
        }
    }
}

/// Validates the shape of a line set without touching the database:
/// non-empty, no repeated ingredient, every amount >= 1. The input is
/// returned as-is on success, no coercion happens here.
pub fn validate_lines(lines: &[LineInput]) -> Result<(), LineError> {
    if lines.is_empty() {
        return Err(LineError::Empty);
    }

    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if line.amount < 1 {
            return Err(LineError::InvalidAmount(line.amount));
        }
        if !seen.insert(line.id) {
            return Err(LineError::Duplicate(line.id));
        }
    }

    Ok(())
}

/// Returns the first referenced ingredient id that does not resolve in the
/// catalog, or None when every line references an existing ingredient.
pub fn missing_ingredient(
    conn: &mut PgConnection,
    lines: &[LineInput],
) -> QueryResult<Option<Uuid>> {
    let ids: Vec<Uuid> = lines.iter().map(|l| l.id).collect();

    let found: HashSet<Uuid> = ingredients::table
        .filter(ingredients::id.eq_any(&ids))
        .select(ingredients::id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();

    Ok(ids.into_iter().find(|id| !found.contains(id)))
}

/// Bulk-inserts a validated line set for a recipe.
pub fn insert_lines(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    lines: &[LineInput],
) -> QueryResult<usize> {
    let rows: Vec<NewRecipeLine> = lines
        .iter()
        .map(|line| NewRecipeLine {
            recipe_id,
            ingredient_id: line.id,
            amount: line.amount,
        })
        .collect();

    diesel::insert_into(recipe_lines::table)
        .values(&rows)
        .execute(conn)
}

/// Deletes the recipe's existing lines and bulk-inserts the new set.
/// Callers must run this inside a transaction so a concurrent shopping-list
/// read sees the old or the new full set, never a partial one.
pub fn replace_lines(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    lines: &[LineInput],
) -> QueryResult<()> {
    diesel::delete(recipe_lines::table.filter(recipe_lines::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    insert_lines(conn, recipe_id, lines)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: Uuid, amount: i32) -> LineInput {
        LineInput { id, amount }
    }

    #[test]
    fn test_empty_lines_rejected() {
        assert_eq!(validate_lines(&[]), Err(LineError::Empty));
    }

    #[test]
    fn test_valid_lines_accepted() {
        let lines = [line(Uuid::new_v4(), 1), line(Uuid::new_v4(), 500)];
        assert_eq!(validate_lines(&lines), Ok(()));
    }

    #[test]
    fn test_duplicate_rejected_regardless_of_amount() {
        let id = Uuid::new_v4();
        let lines = [line(id, 200), line(Uuid::new_v4(), 50), line(id, 300)];
        assert_eq!(validate_lines(&lines), Err(LineError::Duplicate(id)));
    }

    #[test]
    fn test_duplicate_rejected_regardless_of_order() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let forward = [line(id, 1), line(other, 1), line(id, 2)];
        let backward = [line(id, 2), line(other, 1), line(id, 1)];
        assert_eq!(validate_lines(&forward), Err(LineError::Duplicate(id)));
        assert_eq!(validate_lines(&backward), Err(LineError::Duplicate(id)));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let lines = [line(Uuid::new_v4(), 0)];
        assert_eq!(validate_lines(&lines), Err(LineError::InvalidAmount(0)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = [line(Uuid::new_v4(), 1), line(Uuid::new_v4(), -7)];
        assert_eq!(validate_lines(&lines), Err(LineError::InvalidAmount(-7)));
    }

    #[test]
    fn test_amount_checked_before_duplicates() {
        // A bad amount on the first line wins over a later duplicate
        let id = Uuid::new_v4();
        let lines = [line(id, 0), line(id, 5)];
        assert_eq!(validate_lines(&lines), Err(LineError::InvalidAmount(0)));
    }
}

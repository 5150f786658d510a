//! The application's route URIs.
//!
//! For endpoints that take a parameter, e.g., '/edit/{transaction_id}', use
//! [format_endpoint].

use crate::transaction::TransactionType;

/// The transactions list page with running totals.
pub const ROOT: &str = "/";
/// The page and endpoint for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/add";
/// The page and endpoint for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/edit/{transaction_id}";
/// The endpoint for deleting a transaction.
pub const DELETE_TRANSACTION: &str = "/delete/{transaction_id}";
/// The page for listing categories, optionally filtered by `?type=`.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page and endpoint for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The page and endpoint for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The endpoint for deleting a category.
pub const DELETE_CATEGORY: &str = "/categories/{category_id}/delete";
/// The dev-only endpoint for seeding the default categories.
pub const SEED_CATEGORIES: &str = "/categories/seed";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The categories list page filtered by `transaction_type`.
pub fn categories_view_filtered(transaction_type: TransactionType) -> String {
    format!("{CATEGORIES_VIEW}?type={transaction_type}")
}

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/edit/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

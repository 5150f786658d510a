//! This file defines the [Category] type, the default category seeder and
//! the routes for creating, editing and deleting categories.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use maud::{Markup, html};
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    flash::set_flash,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    not_found::get_404_not_found_response,
    transaction::TransactionType,
};

/// The sentinel category that unlocks the free-text category field.
pub const OTHERS_CATEGORY: &str = "Others";

/// The categories inserted by the seed endpoint.
///
/// "Others" is part of the expense list so the sentinel is always available
/// in the dropdown after seeding.
pub const DEFAULT_CATEGORIES: &[(TransactionType, &str)] = &[
    (TransactionType::Income, "Salary"),
    (TransactionType::Income, "Bonus"),
    (TransactionType::Expense, "Food"),
    (TransactionType::Expense, "Groceries"),
    (TransactionType::Expense, "Transport"),
    (TransactionType::Expense, "Housing"),
    (TransactionType::Expense, "Utilities"),
    (TransactionType::Expense, "Health"),
    (TransactionType::Expense, "Entertainment"),
    (TransactionType::Expense, "Shopping"),
    (TransactionType::Expense, "Travel"),
    (TransactionType::Expense, OTHERS_CATEGORY),
];

pub type CategoryId = i64;

/// The name of a category.
///
/// The name is guaranteed to be non-empty with no surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller must ensure that `name` is non-empty and trimmed.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping for transactions of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// Whether this category applies to income or expense transactions.
    pub transaction_type: TransactionType,
    /// The name of the category.
    pub name: CategoryName,
    /// When the category was created.
    pub created_at: OffsetDateTime,
    /// When the category was last renamed or retyped.
    pub updated_at: OffsetDateTime,
}

// ============================================================================
// TEMPLATES
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    /// "Income" or "Expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The category name.
    #[serde(default)]
    pub name: String,
}

fn category_form_view(
    title: &str,
    post_endpoint: &str,
    values: &CategoryForm,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form action=(post_endpoint) method="post" class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                    select id="type" name="type" required class=(FORM_SELECT_STYLE)
                    {
                        option
                            value=(TransactionType::Income)
                            selected[values.transaction_type == TransactionType::Income.as_str()]
                        {
                            "Income"
                        }
                        option
                            value=(TransactionType::Expense)
                            selected[values.transaction_type == TransactionType::Expense.as_str()]
                        {
                            "Expense"
                        }
                    }
                }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        value=(values.name)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                @if !error_message.is_empty() {
                    p class="text-red-600 dark:text-red-400"
                    {
                        (error_message)
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Category" }
            }
        }
    };

    base(title, &content)
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// The state needed for the new category page.
#[derive(Debug, Clone)]
pub struct NewCategoryPageState;

impl FromRef<AppState> for NewCategoryPageState {
    fn from_ref(_state: &AppState) -> Self {
        Self
    }
}

/// Route handler for the page for adding a category.
pub async fn get_new_category_page(State(_): State<NewCategoryPageState>) -> Response {
    category_form_view(
        "Add Category",
        endpoints::NEW_CATEGORY_VIEW,
        &CategoryForm {
            transaction_type: TransactionType::Expense.to_string(),
            name: String::new(),
        },
        "",
    )
    .into_response()
}

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new category.
///
/// Duplicates within a type are rejected by a pre-check; a concurrent insert
/// that slips past the pre-check is caught by the unique constraint and
/// reported the same way. Success redirects to the category list filtered to
/// the new category's type.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let rerender = |error: &Error| {
        category_form_view(
            "Add Category",
            endpoints::NEW_CATEGORY_VIEW,
            &form,
            &format!("Error: {error}"),
        )
        .into_response()
    };

    let (transaction_type, name) = match parse_category_form(&form) {
        Ok(parsed) => parsed,
        Err(error) => return rerender(&error),
    };

    match category_exists(transaction_type, &name, None, &connection) {
        Ok(true) => return rerender(&Error::DuplicateCategory),
        Ok(false) => {}
        Err(error) => {
            tracing::error!("Failed to check for a duplicate category: {error}");
            return rerender(&error);
        }
    }

    match create_category(transaction_type, &name, &connection) {
        Ok(_) => Redirect::to(&endpoints::categories_view_filtered(transaction_type))
            .into_response(),
        Err(error) => {
            if !matches!(error, Error::DuplicateCategory) {
                tracing::error!("An unexpected error occurred while creating a category: {error}");
            }

            rerender(&error)
        }
    }
}

/// The state needed for the edit category page.
#[derive(Debug, Clone)]
pub struct EditCategoryPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler for the edit category page.
///
/// A category that no longer exists redirects to the category list without
/// an error.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryPageState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let category = match get_category(category_id, &connection) {
        Ok(category) => category,
        Err(Error::NotFound) => {
            return Redirect::to(endpoints::CATEGORIES_VIEW).into_response();
        }
        Err(error) => {
            tracing::error!("Failed to retrieve category {category_id}: {error}");
            return error.into_response();
        }
    };

    category_form_view(
        "Edit Category",
        &endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id),
        &CategoryForm {
            transaction_type: category.transaction_type.to_string(),
            name: category.name.to_string(),
        },
        "",
    )
    .into_response()
}

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a category's type and name.
///
/// The duplicate check excludes the row being edited so saving a category
/// without renaming it succeeds.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<UpdateCategoryEndpointState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    if let Err(Error::NotFound) = get_category(category_id, &connection) {
        return Redirect::to(endpoints::CATEGORIES_VIEW).into_response();
    }

    let rerender = |error: &Error| {
        category_form_view(
            "Edit Category",
            &endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id),
            &form,
            &format!("Error: {error}"),
        )
        .into_response()
    };

    let (transaction_type, name) = match parse_category_form(&form) {
        Ok(parsed) => parsed,
        Err(error) => return rerender(&error),
    };

    match category_exists(transaction_type, &name, Some(category_id), &connection) {
        Ok(true) => return rerender(&Error::DuplicateCategory),
        Ok(false) => {}
        Err(error) => {
            tracing::error!("Failed to check for a duplicate category: {error}");
            return rerender(&error);
        }
    }

    match update_category(category_id, transaction_type, &name, &connection) {
        Ok(_) => Redirect::to(&endpoints::categories_view_filtered(transaction_type))
            .into_response(),
        Err(Error::NotFound) => Redirect::to(endpoints::CATEGORIES_VIEW).into_response(),
        Err(error) => {
            if !matches!(error, Error::DuplicateCategory) {
                tracing::error!(
                    "An unexpected error occurred while updating category {category_id}: {error}"
                );
            }

            rerender(&error)
        }
    }
}

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a category.
///
/// Transactions keep their stored category string, so deleting a category
/// never touches the transactions table. Redirects to the category list
/// filtered to the deleted category's type when known.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryEndpointState>,
    jar: SignedCookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    // Capture the type before the row disappears so the redirect can keep
    // the user's filter.
    let redirect_to = match get_category(category_id, &connection) {
        Ok(category) => endpoints::categories_view_filtered(category.transaction_type),
        Err(_) => endpoints::CATEGORIES_VIEW.to_owned(),
    };

    match delete_category(category_id, &connection) {
        Ok(_) | Err(Error::NotFound) => (jar, Redirect::to(&redirect_to)).into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            let jar = set_flash(jar, "Failed to delete the category. Please try again.");

            (jar, Redirect::to(&redirect_to)).into_response()
        }
    }
}

/// The state needed for seeding the default categories.
#[derive(Debug, Clone)]
pub struct SeedCategoriesEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub dev_mode: bool,
}

impl FromRef<AppState> for SeedCategoriesEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            dev_mode: state.dev_mode,
        }
    }
}

/// A route handler that inserts the default categories.
///
/// The endpoint only exists in dev mode; otherwise it responds with the 404
/// page, indistinguishable from an unknown route. Seeding is idempotent,
/// categories that already exist are skipped.
pub async fn seed_categories_endpoint(
    State(state): State<SeedCategoriesEndpointState>,
    jar: SignedCookieJar,
) -> Response {
    if !state.dev_mode {
        return get_404_not_found_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match seed_default_categories(&connection) {
        Ok(inserted_count) => {
            tracing::info!("Seeded {inserted_count} default categories");
            let jar = set_flash(jar, &format!("Added {inserted_count} default categories"));

            (jar, Redirect::to(endpoints::CATEGORIES_VIEW)).into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while seeding categories: {error}");
            let jar = set_flash(jar, "Failed to seed the default categories. Please try again.");

            (jar, Redirect::to(endpoints::CATEGORIES_VIEW)).into_response()
        }
    }
}

fn parse_category_form(form: &CategoryForm) -> Result<(TransactionType, CategoryName), Error> {
    let transaction_type = form.transaction_type.parse()?;
    let name = CategoryName::new(&form.name)?;

    Ok((transaction_type, name))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a category in the database.
///
/// # Errors
/// This function will return an [Error::DuplicateCategory] if a category
/// with the same type and name already exists, or an error if there is an
/// SQL error.
pub fn create_category(
    transaction_type: TransactionType,
    name: &CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let tx = connection.unchecked_transaction()?;
    let now = OffsetDateTime::now_utc();

    let category = tx.query_row(
        "INSERT INTO categories (type, name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, type, name, created_at, updated_at",
        params![transaction_type.as_str(), name.as_ref(), now, now],
        map_category_row,
    )?;

    tx.commit()?;

    Ok(category)
}

/// Retrieve a category from the database by its `id`.
///
/// # Errors
/// This function will return an [Error::NotFound] if `category_id` does not
/// refer to a stored category, or an error if there is an SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, type, name, created_at, updated_at FROM categories WHERE id = :id",
        )?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve categories, optionally filtered to one transaction type.
///
/// Categories are ordered by type then name so income and expense groups
/// render contiguously.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_categories(
    transaction_type: Option<TransactionType>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let type_filter = transaction_type.map(|transaction_type| transaction_type.as_str());

    connection
        .prepare(
            "SELECT id, type, name, created_at, updated_at FROM categories
             WHERE :type IS NULL OR type = :type
             ORDER BY type, name",
        )?
        .query_map(&[(":type", &type_filter)], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Check whether a category with this type and name exists.
///
/// `exclude` skips one row by ID, used when editing so a category does not
/// collide with itself.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn category_exists(
    transaction_type: TransactionType,
    name: &CategoryName,
    exclude: Option<CategoryId>,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM categories
         WHERE type = ?1 AND name = ?2 AND (?3 IS NULL OR id <> ?3)",
        params![transaction_type.as_str(), name.as_ref(), exclude],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Overwrite a category's type and name and bump its `updated_at`.
///
/// # Errors
/// This function will return an [Error::NotFound] if the category does not
/// exist, an [Error::DuplicateCategory] if the new type and name collide
/// with another category, or an error if there is an SQL error.
pub fn update_category(
    category_id: CategoryId,
    transaction_type: TransactionType,
    name: &CategoryName,
    connection: &Connection,
) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    let rows_affected = tx.execute(
        "UPDATE categories SET type = ?1, name = ?2, updated_at = ?3 WHERE id = ?4",
        params![
            transaction_type.as_str(),
            name.as_ref(),
            OffsetDateTime::now_utc(),
            category_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tx.commit()?;

    Ok(())
}

/// Delete a category from the database.
///
/// # Errors
/// This function will return an [Error::NotFound] if the category does not
/// exist, or an error if there is an SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    let rows_affected = tx.execute("DELETE FROM categories WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tx.commit()?;

    Ok(())
}

/// Insert the default categories, skipping any that already exist.
///
/// Returns the number of rows inserted. The whole seed runs in one
/// transaction so a fault inserts nothing.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn seed_default_categories(connection: &Connection) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;
    let mut inserted_count = 0;

    for (transaction_type, name) in DEFAULT_CATEGORIES {
        let now = OffsetDateTime::now_utc();

        inserted_count += tx.execute(
            "INSERT OR IGNORE INTO categories (type, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![transaction_type.as_str(), name, now, now],
        )?;
    }

    tx.commit()?;

    Ok(inserted_count)
}

/// Create the categories table.
///
/// The unique constraint spans type and name so "Travel" can exist as both
/// an income and an expense category.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(type, name)
                )",
        (),
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let type_text: String = row.get(1)?;
    let transaction_type = type_text.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("invalid transaction type {type_text}").into(),
        )
    })?;
    let name: String = row.get(2)?;

    Ok(Category {
        id: row.get(0)?,
        transaction_type,
        name: CategoryName::new_unchecked(&name),
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize, transaction::TransactionType};

    use super::{
        CategoryName, DEFAULT_CATEGORIES, category_exists, create_category, delete_category,
        get_categories, get_category, seed_default_categories, update_category,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Food").unwrap();

        let category = create_category(TransactionType::Expense, &name, &connection)
            .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.transaction_type, TransactionType::Expense);
        assert_eq!(category.name, name);
    }

    #[test]
    fn create_duplicate_category_fails_and_inserts_one_row() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Food").unwrap();
        create_category(TransactionType::Expense, &name, &connection).unwrap();

        let result = create_category(TransactionType::Expense, &name, &connection);

        assert_eq!(result, Err(Error::DuplicateCategory));
        let categories = get_categories(None, &connection).unwrap();
        assert_eq!(categories.len(), 1);
    }

    #[test]
    fn same_name_with_different_type_is_allowed() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Travel").unwrap();
        create_category(TransactionType::Expense, &name, &connection).unwrap();

        create_category(TransactionType::Income, &name, &connection)
            .expect("Could not create income category with the same name");

        assert_eq!(get_categories(None, &connection).unwrap().len(), 2);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_category(999999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_categories_filters_by_type() {
        let connection = get_test_db_connection();
        create_category(
            TransactionType::Income,
            &CategoryName::new("Salary").unwrap(),
            &connection,
        )
        .unwrap();
        create_category(
            TransactionType::Expense,
            &CategoryName::new("Food").unwrap(),
            &connection,
        )
        .unwrap();

        let expense_categories =
            get_categories(Some(TransactionType::Expense), &connection).unwrap();

        assert_eq!(expense_categories.len(), 1);
        assert_eq!(expense_categories[0].name.as_ref(), "Food");
    }

    #[test]
    fn category_exists_excludes_the_given_id() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Food").unwrap();
        let category = create_category(TransactionType::Expense, &name, &connection).unwrap();

        // The row does not collide with itself.
        assert!(
            !category_exists(TransactionType::Expense, &name, Some(category.id), &connection)
                .unwrap()
        );
        assert!(category_exists(TransactionType::Expense, &name, None, &connection).unwrap());
    }

    #[test]
    fn update_category_renames_and_bumps_updated_at() {
        let connection = get_test_db_connection();
        let category = create_category(
            TransactionType::Expense,
            &CategoryName::new("Food").unwrap(),
            &connection,
        )
        .unwrap();

        let new_name = CategoryName::new("Dining").unwrap();
        update_category(category.id, TransactionType::Expense, &new_name, &connection)
            .expect("Could not update category");

        let stored = get_category(category.id, &connection).unwrap();
        assert_eq!(stored.name, new_name);
        assert!(stored.updated_at >= category.updated_at);
    }

    #[test]
    fn update_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let result = update_category(
            999999,
            TransactionType::Expense,
            &CategoryName::new("Food").unwrap(),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_category_succeeds() {
        let connection = get_test_db_connection();
        let category = create_category(
            TransactionType::Expense,
            &CategoryName::new("Food").unwrap(),
            &connection,
        )
        .unwrap();

        delete_category(category.id, &connection).expect("Could not delete category");

        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn seed_inserts_all_defaults_once() {
        let connection = get_test_db_connection();

        let first_run = seed_default_categories(&connection).unwrap();
        let second_run = seed_default_categories(&connection).unwrap();

        assert_eq!(first_run, DEFAULT_CATEGORIES.len());
        assert_eq!(second_run, 0);
        assert_eq!(
            get_categories(None, &connection).unwrap().len(),
            DEFAULT_CATEGORIES.len()
        );
    }

    #[test]
    fn seed_skips_existing_categories() {
        let connection = get_test_db_connection();
        create_category(
            TransactionType::Expense,
            &CategoryName::new("Food").unwrap(),
            &connection,
        )
        .unwrap();

        let inserted_count = seed_default_categories(&connection).unwrap();

        assert_eq!(inserted_count, DEFAULT_CATEGORIES.len() - 1);
    }
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use rusqlite::Connection;
    use scraper::Html;

    use crate::{category::get_categories, db::initialize};

    use super::{CategoryForm, CreateCategoryEndpointState, create_category_endpoint};

    fn get_test_state() -> CreateCategoryEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        CreateCategoryEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_create_category() {
        let state = get_test_state();
        let form = CategoryForm {
            transaction_type: "Expense".to_owned(),
            name: "Food".to_owned(),
        };

        let response = create_category_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/categories?type=Expense"
        );

        let connection = state.db_connection.lock().unwrap();
        let categories = get_categories(None, &connection).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_ref(), "Food");
    }

    #[tokio::test]
    async fn empty_name_renders_error() {
        let state = get_test_state();
        let form = CategoryForm {
            transaction_type: "Expense".to_owned(),
            name: "   ".to_owned(),
        };

        let response = create_category_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_error_message(response, "Error: Category name cannot be empty").await;

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_categories(None, &connection).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn duplicate_name_renders_error_and_keeps_one_row() {
        let state = get_test_state();
        let form = CategoryForm {
            transaction_type: "Expense".to_owned(),
            name: "Food".to_owned(),
        };

        create_category_endpoint(State(state.clone()), Form(form.clone()))
            .await
            .into_response();
        let response = create_category_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_error_message(
            response,
            "Error: a category with this type and name already exists",
        )
        .await;

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_categories(None, &connection).unwrap().len(), 1);
    }

    async fn assert_error_message(response: Response, want_error_message: &str) {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        let html = Html::parse_document(&text);

        let p = scraper::Selector::parse("p.text-red-600").unwrap();
        let error_message = html
            .select(&p)
            .next()
            .expect("No error message found")
            .text()
            .collect::<Vec<_>>()
            .join("");

        assert_eq!(want_error_message, error_message.trim());
    }
}

#[cfg(test)]
mod edit_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use rusqlite::Connection;
    use scraper::Html;

    use crate::{db::initialize, endpoints, transaction::TransactionType};

    use super::{
        CategoryForm, CategoryName, EditCategoryPageState, UpdateCategoryEndpointState,
        create_category, get_categories, get_category, get_edit_category_page,
        update_category_endpoint,
    };

    fn get_test_connection() -> Arc<Mutex<Connection>> {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        Arc::new(Mutex::new(connection))
    }

    #[tokio::test]
    async fn edit_page_renders_stored_values() {
        let db_connection = get_test_connection();
        let category = {
            let connection = db_connection.lock().unwrap();
            create_category(
                TransactionType::Expense,
                &CategoryName::new("Food").unwrap(),
                &connection,
            )
            .unwrap()
        };
        let state = EditCategoryPageState { db_connection };

        let response = get_edit_category_page(Path(category.id), State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html(response).await;
        let input = scraper::Selector::parse("input[name=name]").unwrap();
        let name = html
            .select(&input)
            .next()
            .expect("No name input found")
            .value()
            .attr("value")
            .unwrap_or_default();
        assert_eq!(name, "Food");
    }

    #[tokio::test]
    async fn edit_page_for_missing_category_redirects_silently() {
        let state = EditCategoryPageState {
            db_connection: get_test_connection(),
        };

        let response = get_edit_category_page(Path(999999), State(state)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::CATEGORIES_VIEW
        );
    }

    #[tokio::test]
    async fn update_renames_category_and_redirects_filtered() {
        let db_connection = get_test_connection();
        let category = {
            let connection = db_connection.lock().unwrap();
            create_category(
                TransactionType::Expense,
                &CategoryName::new("Food").unwrap(),
                &connection,
            )
            .unwrap()
        };
        let state = UpdateCategoryEndpointState {
            db_connection: db_connection.clone(),
        };
        let form = CategoryForm {
            transaction_type: "Expense".to_owned(),
            name: "Dining".to_owned(),
        };

        let response = update_category_endpoint(Path(category.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/categories?type=Expense"
        );

        let connection = db_connection.lock().unwrap();
        let stored = get_category(category.id, &connection).unwrap();
        assert_eq!(stored.name.as_ref(), "Dining");
    }

    #[tokio::test]
    async fn update_rejects_renaming_onto_an_existing_pair() {
        let db_connection = get_test_connection();
        let category = {
            let connection = db_connection.lock().unwrap();
            create_category(
                TransactionType::Expense,
                &CategoryName::new("Groceries").unwrap(),
                &connection,
            )
            .unwrap();
            create_category(
                TransactionType::Expense,
                &CategoryName::new("Food").unwrap(),
                &connection,
            )
            .unwrap()
        };
        let state = UpdateCategoryEndpointState {
            db_connection: db_connection.clone(),
        };
        let form = CategoryForm {
            transaction_type: "Expense".to_owned(),
            name: "Groceries".to_owned(),
        };

        let response = update_category_endpoint(Path(category.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html(response).await;
        let p = scraper::Selector::parse("p.text-red-600").unwrap();
        let error_message = html
            .select(&p)
            .next()
            .expect("No error message found")
            .text()
            .collect::<String>();
        assert_eq!(
            error_message.trim(),
            "Error: a category with this type and name already exists"
        );

        let connection = db_connection.lock().unwrap();
        let stored = get_category(category.id, &connection).unwrap();
        assert_eq!(stored.name.as_ref(), "Food");
    }

    #[tokio::test]
    async fn update_keeping_own_name_succeeds() {
        let db_connection = get_test_connection();
        let category = {
            let connection = db_connection.lock().unwrap();
            create_category(
                TransactionType::Expense,
                &CategoryName::new("Food").unwrap(),
                &connection,
            )
            .unwrap()
        };
        let state = UpdateCategoryEndpointState {
            db_connection: db_connection.clone(),
        };
        // An unchanged save must not collide with the row itself.
        let form = CategoryForm {
            transaction_type: "Expense".to_owned(),
            name: "Food".to_owned(),
        };

        let response = update_category_endpoint(Path(category.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = db_connection.lock().unwrap();
        assert_eq!(get_categories(None, &connection).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_missing_category_redirects_silently() {
        let state = UpdateCategoryEndpointState {
            db_connection: get_test_connection(),
        };
        let form = CategoryForm {
            transaction_type: "Expense".to_owned(),
            name: "Food".to_owned(),
        };

        let response = update_category_endpoint(Path(999999), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::CATEGORIES_VIEW
        );
    }

    async fn parse_html(response: Response) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }
}


#[cfg(test)]
mod seed_categories_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::SignedCookieJar;
    use rusqlite::Connection;

    use crate::{
        app_state::create_cookie_key,
        category::{DEFAULT_CATEGORIES, get_categories},
        db::initialize,
        endpoints,
    };

    use super::{SeedCategoriesEndpointState, seed_categories_endpoint};

    fn get_test_state(dev_mode: bool) -> SeedCategoriesEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        SeedCategoriesEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            dev_mode,
        }
    }

    fn empty_jar() -> SignedCookieJar {
        SignedCookieJar::new(create_cookie_key("test-secret"))
    }

    #[tokio::test]
    async fn seeding_inserts_defaults_and_redirects() {
        let state = get_test_state(true);

        let response = seed_categories_endpoint(State(state.clone()), empty_jar())
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::CATEGORIES_VIEW
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_categories(None, &connection).unwrap().len(),
            DEFAULT_CATEGORIES.len()
        );
    }

    #[tokio::test]
    async fn seeding_twice_adds_nothing_more() {
        let state = get_test_state(true);

        seed_categories_endpoint(State(state.clone()), empty_jar())
            .await
            .into_response();
        seed_categories_endpoint(State(state.clone()), empty_jar())
            .await
            .into_response();

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_categories(None, &connection).unwrap().len(),
            DEFAULT_CATEGORIES.len()
        );
    }

    #[tokio::test]
    async fn seeding_outside_dev_mode_returns_404() {
        let state = get_test_state(false);

        let response = seed_categories_endpoint(State(state.clone()), empty_jar())
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_categories(None, &connection).unwrap().len(), 0);
    }
}

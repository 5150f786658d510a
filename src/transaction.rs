//! This file defines the `Transaction` type, the category resolution logic
//! and the routes for creating, editing and deleting transactions.
//!
//! A transaction is a single income or expense entry in the ledger.

use std::{
    fmt::Display,
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use maud::{Markup, html};
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    category::{Category, OTHERS_CATEGORY, get_categories},
    endpoints,
    flash::set_flash,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// Whether a transaction brings money in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum TransactionType {
    /// Money coming in, e.g. wages.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The canonical string stored in the database and shown in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidTransactionType(s.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type TransactionId = i64;

/// An income or expense entry in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// Whether this entry is income or an expense.
    pub transaction_type: TransactionType,
    /// The category the entry belongs to.
    ///
    /// This is a plain string, not a reference to the categories table, so
    /// entries survive category renames and deletions.
    pub category: String,
    /// The free-text category, set only when `category` is the sentinel
    /// "Others".
    pub other_category: Option<String>,
    /// Who the money went to or came from.
    pub merchant: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// How the transaction was paid, e.g. "Card".
    pub payment_method: String,
    /// The bank or account involved.
    pub bank_name: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
}

/// The fields needed to create a transaction, i.e. a [Transaction] without
/// an ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: Date,
    pub transaction_type: TransactionType,
    pub category: String,
    pub other_category: Option<String>,
    pub merchant: String,
    pub description: String,
    pub payment_method: String,
    pub bank_name: String,
    pub amount: f64,
}

// ============================================================================
// CATEGORY RESOLUTION
// ============================================================================

/// Resolve the stored category pair from the dropdown selection and the
/// free-text "Others" field.
///
/// The same function serves the create and edit paths so the two cannot
/// drift apart:
/// 1. A dropdown selection other than "Others" wins outright and the free
///    text is ignored.
/// 2. Selecting "Others" keeps the sentinel as the category and stores the
///    free text, if any, alongside it.
/// 3. With no dropdown selection the free text degrades to being the
///    category itself.
pub fn resolve_category(selected: &str, other: &str) -> (String, Option<String>) {
    let selected = selected.trim();
    let other = other.trim();

    if !selected.is_empty() && selected != OTHERS_CATEGORY {
        (selected.to_owned(), None)
    } else if selected == OTHERS_CATEGORY {
        let other_category = (!other.is_empty()).then(|| other.to_owned());

        (OTHERS_CATEGORY.to_owned(), other_category)
    } else if !other.is_empty() {
        (other.to_owned(), Some(other.to_owned()))
    } else {
        (String::new(), None)
    }
}

// ============================================================================
// FORM PARSING
// ============================================================================

const DATE_INPUT_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// The raw form data for creating or editing a transaction.
///
/// All fields arrive as strings; [parse_transaction_form] turns them into a
/// validated [NewTransaction].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The transaction date as `YYYY-MM-DD`.
    pub date: String,
    /// "Income" or "Expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The category dropdown selection, possibly empty.
    #[serde(default)]
    pub category: String,
    /// The free-text category field, used with the "Others" selection.
    #[serde(default)]
    pub other_category: String,
    #[serde(default)]
    pub merchant: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub bank_name: String,
    /// The amount as a decimal string.
    pub amount: String,
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: transaction.date.to_string(),
            transaction_type: transaction.transaction_type.to_string(),
            category: transaction.category.clone(),
            other_category: transaction.other_category.clone().unwrap_or_default(),
            merchant: transaction.merchant.clone(),
            description: transaction.description.clone(),
            payment_method: transaction.payment_method.clone(),
            bank_name: transaction.bank_name.clone(),
            amount: transaction.amount.to_string(),
        }
    }
}

/// Validate the raw form data and resolve its category fields.
///
/// # Errors
/// This function will return an [Error::InvalidDate], [Error::InvalidAmount]
/// or [Error::InvalidTransactionType] describing the first field that failed
/// validation. Nothing is written to the database on error.
pub fn parse_transaction_form(form: &TransactionForm) -> Result<NewTransaction, Error> {
    let date = Date::parse(form.date.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| Error::InvalidDate(form.date.clone()))?;

    let transaction_type = form.transaction_type.parse()?;

    let amount: f64 = form
        .amount
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(form.amount.clone()))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount(form.amount.clone()));
    }

    let (category, other_category) = resolve_category(&form.category, &form.other_category);

    Ok(NewTransaction {
        date,
        transaction_type,
        category,
        other_category,
        merchant: form.merchant.trim().to_owned(),
        description: form.description.trim().to_owned(),
        payment_method: form.payment_method.trim().to_owned(),
        bank_name: form.bank_name.trim().to_owned(),
        amount,
    })
}

// ============================================================================
// TEMPLATES
// ============================================================================

fn text_input(name: &str, label: &str, value: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                id=(name)
                type="text"
                name=(name)
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn transaction_form_view(
    post_endpoint: &str,
    values: &TransactionForm,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let income_categories = categories
        .iter()
        .filter(|category| category.transaction_type == TransactionType::Income);
    let expense_categories = categories
        .iter()
        .filter(|category| category.transaction_type == TransactionType::Expense);

    html! {
        form
            action=(post_endpoint)
            method="post"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    id="date"
                    type="date"
                    name="date"
                    value=(values.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

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
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select id="category" name="category" class=(FORM_SELECT_STYLE)
                {
                    option value="" selected[values.category.is_empty()] { "Select a category" }

                    optgroup label="Income"
                    {
                        @for category in income_categories {
                            option
                                value=(category.name)
                                selected[values.category == category.name.as_ref()]
                            {
                                (category.name)
                            }
                        }
                    }

                    optgroup label="Expense"
                    {
                        @for category in expense_categories {
                            option
                                value=(category.name)
                                selected[values.category == category.name.as_ref()]
                            {
                                (category.name)
                            }
                        }
                    }
                }
            }

            (text_input(
                "other_category",
                "Other category (used with \"Others\")",
                &values.other_category,
            ))
            (text_input("merchant", "Merchant", &values.merchant))
            (text_input("description", "Description", &values.description))
            (text_input("payment_method", "Payment method", &values.payment_method))
            (text_input("bank_name", "Bank", &values.bank_name))

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    id="amount"
                    type="number"
                    name="amount"
                    value=(values.amount)
                    step="0.01"
                    min="0"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Transaction" }
        }
    }
}

fn new_transaction_view(
    values: &TransactionForm,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = transaction_form_view(
        endpoints::NEW_TRANSACTION_VIEW,
        values,
        categories,
        error_message,
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Transaction", &content)
}

fn edit_transaction_view(
    transaction_id: TransactionId,
    values: &TransactionForm,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();
    let post_endpoint = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);
    let form = transaction_form_view(&post_endpoint, values, categories, error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Transaction", &content)
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler for the page for adding a transaction.
pub async fn get_new_transaction_page(State(state): State<NewTransactionPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let categories = match get_categories(None, &connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Failed to retrieve categories for the add transaction page: {error}");
            Vec::new()
        }
    };

    new_transaction_view(&TransactionForm::default(), &categories, "").into_response()
}

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Redirects to the transactions list on success. Validation failures and
/// store faults re-render the form with a message and write nothing.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let new_transaction = match parse_transaction_form(&form) {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            let categories = get_categories(None, &connection).unwrap_or_default();

            return new_transaction_view(&form, &categories, &format!("Error: {error}"))
                .into_response();
        }
    };

    match create_transaction(new_transaction, &connection) {
        Ok(_) => Redirect::to(endpoints::ROOT).into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");
            let categories = get_categories(None, &connection).unwrap_or_default();

            new_transaction_view(
                &form,
                &categories,
                "Failed to save the transaction. Please try again.",
            )
            .into_response()
        }
    }
}

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler for the edit transaction page.
///
/// A transaction that no longer exists redirects to the transactions list
/// without an error, it is treated as already gone.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionPageState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let transaction = match get_transaction(transaction_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Redirect::to(endpoints::ROOT).into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
            return error.into_response();
        }
    };

    let categories = get_categories(None, &connection).unwrap_or_default();

    edit_transaction_view(
        transaction_id,
        &TransactionForm::from(&transaction),
        &categories,
        "",
    )
    .into_response()
}

/// The state needed for updating a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a transaction.
///
/// On a validation failure the edit form is re-rendered from the stored
/// row's unmodified fields plus the error message.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<UpdateTransactionEndpointState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let original = match get_transaction(transaction_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Redirect::to(endpoints::ROOT).into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
            return error.into_response();
        }
    };

    let new_fields = match parse_transaction_form(&form) {
        Ok(new_fields) => new_fields,
        Err(error) => {
            let categories = get_categories(None, &connection).unwrap_or_default();

            return edit_transaction_view(
                transaction_id,
                &TransactionForm::from(&original),
                &categories,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let updated = Transaction {
        id: original.id,
        date: new_fields.date,
        transaction_type: new_fields.transaction_type,
        category: new_fields.category,
        other_category: new_fields.other_category,
        merchant: new_fields.merchant,
        description: new_fields.description,
        payment_method: new_fields.payment_method,
        bank_name: new_fields.bank_name,
        amount: new_fields.amount,
    };

    match update_transaction(&updated, &connection) {
        Ok(_) => Redirect::to(endpoints::ROOT).into_response(),
        // Deleted between the fetch and the write, treat it as already gone.
        Err(Error::NotFound) => Redirect::to(endpoints::ROOT).into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating transaction {transaction_id}: {error}"
            );
            let categories = get_categories(None, &connection).unwrap_or_default();

            edit_transaction_view(
                transaction_id,
                &TransactionForm::from(&original),
                &categories,
                "Failed to save the transaction. Please try again.",
            )
            .into_response()
        }
    }
}

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// Redirects to the transactions list regardless of outcome. A missing row
/// is treated as already deleted; a store fault is reported via a flash
/// message.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<DeleteTransactionEndpointState>,
    jar: SignedCookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(_) | Err(Error::NotFound) => (jar, Redirect::to(endpoints::ROOT)).into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting transaction {transaction_id}: {error}"
            );
            let jar = set_flash(jar, "Failed to delete the transaction. Please try again.");

            (jar, Redirect::to(endpoints::ROOT)).into_response()
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a transaction in the database.
///
/// The insert runs inside its own transaction; a fault leaves no partial
/// state behind.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let tx = connection.unchecked_transaction()?;

    let transaction = tx.query_row(
        "INSERT INTO transactions
            (date, type, category, other_category, merchant, description, payment_method, bank_name, amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         RETURNING id, date, type, category, other_category, merchant, description, payment_method, bank_name, amount",
        params![
            new_transaction.date,
            new_transaction.transaction_type.as_str(),
            new_transaction.category,
            new_transaction.other_category,
            new_transaction.merchant,
            new_transaction.description,
            new_transaction.payment_method,
            new_transaction.bank_name,
            new_transaction.amount,
        ],
        map_transaction_row,
    )?;

    tx.commit()?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return an [Error::NotFound] if `transaction_id` does
/// not refer to a stored transaction, or an error if there is an SQL error.
pub fn get_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, date, type, category, other_category, merchant, description, payment_method, bank_name, amount
             FROM transactions WHERE id = :id",
        )?
        .query_row(&[(":id", &transaction_id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Retrieve all transactions, most recently inserted first.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, type, category, other_category, merchant, description, payment_method, bank_name, amount
             FROM transactions ORDER BY id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the stored fields of the transaction with `transaction.id`.
///
/// The update runs inside its own transaction and is rolled back on fault.
///
/// # Errors
/// This function will return an [Error::NotFound] if the transaction does
/// not exist, or an error if there is an SQL error.
pub fn update_transaction(transaction: &Transaction, connection: &Connection) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    let rows_affected = tx.execute(
        "UPDATE transactions
         SET date = ?1, type = ?2, category = ?3, other_category = ?4, merchant = ?5,
             description = ?6, payment_method = ?7, bank_name = ?8, amount = ?9
         WHERE id = ?10",
        params![
            transaction.date,
            transaction.transaction_type.as_str(),
            transaction.category,
            transaction.other_category,
            transaction.merchant,
            transaction.description,
            transaction.payment_method,
            transaction.bank_name,
            transaction.amount,
            transaction.id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tx.commit()?;

    Ok(())
}

/// Delete a transaction from the database.
///
/// # Errors
/// This function will return an [Error::NotFound] if the transaction does
/// not exist, or an error if there is an SQL error.
pub fn delete_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    let rows_affected = tx.execute("DELETE FROM transactions WHERE id = ?1", [transaction_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tx.commit()?;

    Ok(())
}

/// Create the base transactions table.
///
/// The `other_category` column is added afterwards by the schema migration
/// in [crate::db].
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                merchant TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                payment_method TEXT NOT NULL DEFAULT '',
                bank_name TEXT NOT NULL DEFAULT '',
                amount REAL NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let type_text: String = row.get(2)?;
    let transaction_type = type_text.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("invalid transaction type {type_text}").into(),
        )
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        transaction_type,
        category: row.get(3)?,
        other_category: row.get(4)?,
        merchant: row.get(5)?,
        description: row.get(6)?,
        payment_method: row.get(7)?,
        bank_name: row.get(8)?,
        amount: row.get(9)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_type_tests {
    use crate::Error;

    use super::TransactionType;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("EXPENSE".parse(), Ok(TransactionType::Expense));
        assert_eq!("Income".parse(), Ok(TransactionType::Income));
    }

    #[test]
    fn parse_fails_on_unknown_type() {
        let result: Result<TransactionType, Error> = "Transfer".parse();

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("Transfer".to_owned()))
        );
    }
}

//! This file defines the home page listing all transactions with income,
//! expense and balance totals.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    flash::take_flash,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, flash_banner, format_currency, link,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionType, get_all_transactions},
};

/// The income, expense and balance totals of a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    /// Income minus expenses. Negative when spending exceeds income.
    pub balance: f64,
}

/// Sum up the income, expense and balance totals of `transactions`.
pub fn calculate_totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => totals.income += transaction.amount,
            TransactionType::Expense => totals.expense += transaction.amount,
        }
    }

    totals.balance = totals.income - totals.expense;

    totals
}

fn totals_card(label: &str, amount: f64) -> Markup {
    html! {
        div class="p-4 rounded-lg bg-white shadow dark:bg-gray-800"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class="text-2xl font-semibold text-gray-900 dark:text-white"
            {
                (format_currency(amount))
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let category_text = match &transaction.other_category {
        Some(other_category) => format!("{} ({other_category})", transaction.category),
        None => transaction.category.clone(),
    };
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.transaction_type) }
            td class=(TABLE_CELL_STYLE) { (category_text) }
            td class=(TABLE_CELL_STYLE) { (transaction.merchant) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) { (transaction.payment_method) }
            td class=(TABLE_CELL_STYLE) { (transaction.bank_name) }
            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                (link(&edit_url, "Edit"))
            }
            td class=(TABLE_CELL_STYLE)
            {
                form action=(delete_url) method="post"
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}

fn transactions_view(
    transactions: &[Transaction],
    totals: Totals,
    flash_message: Option<String>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(message) = flash_message {
                (flash_banner(&message))
            }

            div class="grid grid-cols-1 gap-4 md:grid-cols-3"
            {
                (totals_card("Income", totals.income))
                (totals_card("Expenses", totals.expense))
                (totals_card("Balance", totals.balance))
            }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "No transactions yet. "
                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add your first transaction."
                    }
                }
            } @else {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Date" }
                            th class=(TABLE_CELL_STYLE) { "Type" }
                            th class=(TABLE_CELL_STYLE) { "Category" }
                            th class=(TABLE_CELL_STYLE) { "Merchant" }
                            th class=(TABLE_CELL_STYLE) { "Description" }
                            th class=(TABLE_CELL_STYLE) { "Payment Method" }
                            th class=(TABLE_CELL_STYLE) { "Bank" }
                            th class=(TABLE_CELL_STYLE) { "Amount" }
                            th class=(TABLE_CELL_STYLE) {}
                            th class=(TABLE_CELL_STYLE) {}
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(transaction))
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &content)
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler for the home page.
///
/// Lists all transactions, most recently added first, with totals above the
/// table. Consumes any pending flash message.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    jar: SignedCookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let transactions = match get_all_transactions(&connection) {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("Failed to retrieve transactions: {error}");
            return error.into_response();
        }
    };

    let totals = calculate_totals(&transactions);
    let (jar, flash_message) = take_flash(jar);

    (jar, transactions_view(&transactions, totals, flash_message)).into_response()
}

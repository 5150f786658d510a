//! This file defines the page listing categories, optionally filtered to
//! one transaction type.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{Category, get_categories},
    endpoints,
    flash::take_flash,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, flash_banner, link,
    },
    navigation::NavBar,
    transaction::TransactionType,
};

/// The query parameters accepted by the categories page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesPageQuery {
    /// Restrict the list to "Income" or "Expense" categories. An
    /// unrecognized value falls back to showing everything.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

fn filter_link(label: &str, url: &str, is_active: bool) -> Markup {
    html! {
        @if is_active {
            span class="font-semibold text-gray-900 dark:text-white" { (label) }
        } @else {
            a href=(url) class=(LINK_STYLE) { (label) }
        }
    }
}

fn categories_view(
    categories: &[Category],
    type_filter: Option<TransactionType>,
    dev_mode: bool,
    flash_message: Option<String>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(message) = flash_message {
                (flash_banner(&message))
            }

            div class="flex gap-4 items-center"
            {
                (filter_link("All", endpoints::CATEGORIES_VIEW, type_filter.is_none()))
                (filter_link(
                    "Income",
                    &endpoints::categories_view_filtered(TransactionType::Income),
                    type_filter == Some(TransactionType::Income),
                ))
                (filter_link(
                    "Expense",
                    &endpoints::categories_view_filtered(TransactionType::Expense),
                    type_filter == Some(TransactionType::Expense),
                ))

                (link(endpoints::NEW_CATEGORY_VIEW, "Add Category"))
            }

            @if categories.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No categories yet." }
            } @else {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Type" }
                            th class=(TABLE_CELL_STYLE) { "Name" }
                            th class=(TABLE_CELL_STYLE) {}
                            th class=(TABLE_CELL_STYLE) {}
                        }
                    }

                    tbody
                    {
                        @for category in categories {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (category.transaction_type) }
                                td class=(TABLE_CELL_STYLE) { (category.name) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (link(
                                        &endpoints::format_endpoint(
                                            endpoints::EDIT_CATEGORY_VIEW,
                                            category.id,
                                        ),
                                        "Edit",
                                    ))
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    form
                                        action=(endpoints::format_endpoint(
                                            endpoints::DELETE_CATEGORY,
                                            category.id,
                                        ))
                                        method="post"
                                    {
                                        button type="submit" class=(BUTTON_DELETE_STYLE)
                                        {
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            @if dev_mode {
                form action=(endpoints::SEED_CATEGORIES) method="post"
                {
                    button type="submit" class=(LINK_STYLE) { "Seed default categories" }
                }
            }
        }
    };

    base("Categories", &content)
}

/// The state needed for the categories page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub dev_mode: bool,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            dev_mode: state.dev_mode,
        }
    }
}

/// Route handler for the categories page.
///
/// The `type` query parameter filters the list; its value is parsed
/// case-insensitively and junk values show the unfiltered list.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    Query(query): Query<CategoriesPageQuery>,
    jar: SignedCookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let type_filter: Option<TransactionType> = query
        .transaction_type
        .as_deref()
        .and_then(|raw_type| raw_type.parse().ok());

    let categories = match get_categories(type_filter, &connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Failed to retrieve categories: {error}");
            return error.into_response();
        }
    };

    let (jar, flash_message) = take_flash(jar);

    (
        jar,
        categories_view(&categories, type_filter, state.dev_mode, flash_message),
    )
        .into_response()
}

//! Ties together the route handlers and the endpoints they serve.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    categories_page::get_categories_page,
    category::{
        create_category_endpoint, delete_category_endpoint, get_edit_category_page,
        get_new_category_page, seed_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, update_transaction_endpoint,
    },
    transactions_page::get_transactions_page,
};

/// Return a router with all the app's routes.
///
/// Writes all go through POST routes; every GET route is read-only so a
/// crawler following links cannot modify the ledger.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page).post(create_transaction_endpoint),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page).post(update_transaction_endpoint),
        )
        .route(endpoints::DELETE_TRANSACTION, post(delete_transaction_endpoint))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(
            endpoints::NEW_CATEGORY_VIEW,
            get(get_new_category_page).post(create_category_endpoint),
        )
        .route(
            endpoints::EDIT_CATEGORY_VIEW,
            get(get_edit_category_page).post(update_category_endpoint),
        )
        .route(endpoints::DELETE_CATEGORY, post(delete_category_endpoint))
        .route(endpoints::SEED_CATEGORIES, post(seed_categories_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints, transaction::TransactionForm};

    use super::build_router;

    fn new_test_server(dev_mode: bool) -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(db_connection, "42", dev_mode)
            .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn root_serves_the_transactions_page() {
        let server = new_test_server(false);

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        assert!(response.text().contains("Transactions"));
    }

    #[tokio::test]
    async fn unknown_route_returns_the_404_page() {
        let server = new_test_server(false);

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn seed_endpoint_is_hidden_outside_dev_mode() {
        let server = new_test_server(false);

        let response = server.post(endpoints::SEED_CATEGORIES).await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn seed_endpoint_redirects_in_dev_mode() {
        let server = new_test_server(true);

        let response = server.post(endpoints::SEED_CATEGORIES).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            endpoints::CATEGORIES_VIEW
        );
    }

    #[tokio::test]
    async fn create_transaction_form_roundtrip() {
        let server = new_test_server(false);

        let form = TransactionForm {
            date: "2025-01-15".to_owned(),
            transaction_type: "Expense".to_owned(),
            category: "Food".to_owned(),
            merchant: "Corner Cafe".to_owned(),
            description: "Lunch".to_owned(),
            payment_method: "Card".to_owned(),
            bank_name: "ANZ".to_owned(),
            amount: "12.50".to_owned(),
            ..Default::default()
        };

        let response = server
            .post(endpoints::NEW_TRANSACTION_VIEW)
            .form(&form)
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::ROOT);

        let page = server.get(endpoints::ROOT).await;
        assert!(page.text().contains("Corner Cafe"));
    }
}

//! HTTP handlers for the credlink backend.
//!
//! Routes are mounted at the root:
//!
//! ```text
//! GET  /health
//! POST /get-credit-score
//! POST /create_link_token
//! POST /exchange_public_token
//! GET  /accounts_balance
//! GET  /transactions
//! ```

pub mod credit_score;
pub mod data;
pub mod extract;
pub mod health;
pub mod plaid;

use actix_web::web;

/// Registers every route. Expects `web::Data<AppState>` to be present.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route(
            "/get-credit-score",
            web::post().to(credit_score::get_credit_score),
        )
        .route(
            "/create_link_token",
            web::post().to(plaid::create_link_token),
        )
        .route(
            "/exchange_public_token",
            web::post().to(plaid::exchange_public_token),
        )
        .route(
            "/accounts_balance",
            web::get().to(plaid::get_accounts_balance),
        )
        .route("/transactions", web::get().to(plaid::get_transactions));
}

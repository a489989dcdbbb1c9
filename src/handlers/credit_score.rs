//! Credit score endpoint.
//!
//! Scoring is not implemented yet: every caller receives the same placeholder
//! value and the user identifier is ignored.

use actix_web::HttpResponse;

use super::{
    data::{CreditScoreResponse, UserRequest},
    extract::ValidatedJson,
};

/// Score returned until a real scoring integration exists.
pub const PLACEHOLDER_CREDIT_SCORE: u32 = 750;

/// Returns the placeholder credit score for any user.
///
/// # Request Body (JSON)
/// ```json
/// { "userId": "anything" }
/// ```
///
/// # Success Response (200 OK)
/// ```json
/// { "creditScore": 750 }
/// ```
#[tracing::instrument(skip(payload), fields(user_id = %payload.user_id))]
pub async fn get_credit_score(payload: ValidatedJson<UserRequest>) -> HttpResponse {
    tracing::debug!("Returning placeholder credit score");
    HttpResponse::Ok().json(CreditScoreResponse {
        credit_score: PLACEHOLDER_CREDIT_SCORE,
    })
}

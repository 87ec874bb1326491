//! Webhook fulfillment route.
//!
//! Dispatches on the platform tag and shapes the executor outcome into the
//! fulfillment contract: executor success and failure are both HTTP 200
//! (the failure rendered into the error envelope); only routing problems
//! (unknown tag, missing parameter) are HTTP errors.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use agentsql_core::{
    error_reply, table_reply, FulfillmentReply, QueryTag, ResultSet, SqlFailure, WebhookRequest,
    NO_RESULTS,
};

use crate::error::ApiError;
use crate::query;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(handle_webhook))
}

/// POST /webhook - fulfillment entry point
async fn handle_webhook(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Response, ApiError> {
    let tag: QueryTag = request.fulfillment_info.tag.parse()?;
    tracing::info!(tag = %request.fulfillment_info.tag, "webhook request");

    let params = &request.session_info.parameters;
    let outcome = match tag {
        QueryTag::Static => {
            let sql = params
                .sql
                .as_deref()
                .ok_or(ApiError::MissingParameter { name: "sql" })?;
            query::run_statement(state.pool(), sql).await
        }
        QueryTag::Parameterized => {
            let phrase = params.sql_investment_search_phrase.as_deref().ok_or(
                ApiError::MissingParameter {
                    name: "sql_investment_search_phrase",
                },
            )?;
            query::vector_search(state.pool(), phrase).await
        }
    };

    Ok(reply_response(outcome))
}

fn reply_response(outcome: Result<ResultSet, SqlFailure>) -> Response {
    match outcome {
        Ok(result) => match table_reply(&result) {
            // Plain-text body, not an envelope. Callers handle both shapes.
            FulfillmentReply::NoResults => NO_RESULTS.into_response(),
            reply @ FulfillmentReply::Envelope(_) => Json(reply).into_response(),
        },
        Err(failure) => Json(error_reply(&failure)).into_response(),
    }
}

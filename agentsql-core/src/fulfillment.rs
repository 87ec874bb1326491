//! Fulfillment reply construction.
//!
//! Maps an executor outcome (result set or failure descriptor) into the
//! platform envelope. The zero-row case deliberately yields the bare string
//! "No results" instead of an envelope, matching the contract the agent
//! flows were built against.

use serde::Serialize;

use crate::table;
use crate::webhook::{
    FulfillmentResponse, MessagePayload, ResponseMessage, ResponseSessionInfo, RichContent,
    SessionOutput, WebhookResponse,
};

/// Literal body returned when a statement produces no rows.
pub const NO_RESULTS: &str = "No results";

const MERGE_BEHAVIOR: &str = "APPEND";
const RESULT_TITLE: &str = "SQL Result";
const RESULT_SUBTITLE: &str = "SQL Result Details";
const ERROR_TITLE: &str = "Error Generating SQL";

/// An ordered, request-scoped tabular result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Structured descriptor for a failed statement. The message is fixed; the
/// details carry the database error text shown to the end user.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFailure {
    pub message: String,
    pub details: String,
}

impl SqlFailure {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            message: "SQL Query Failed.".to_string(),
            details: details.into(),
        }
    }
}

/// A successful fulfillment outcome.
///
/// `NoResults` serializes as the bare string "No results"; callers must
/// handle both a string and an envelope body.
#[derive(Debug, Clone, PartialEq)]
pub enum FulfillmentReply {
    NoResults,
    Envelope(WebhookResponse),
}

impl Serialize for FulfillmentReply {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoResults => serializer.serialize_str(NO_RESULTS),
            Self::Envelope(response) => response.serialize(serializer),
        }
    }
}

fn envelope(content: RichContent, parameters: SessionOutput) -> WebhookResponse {
    WebhookResponse {
        fulfillment_response: FulfillmentResponse {
            messages: vec![ResponseMessage {
                payload: MessagePayload {
                    rich_content: vec![vec![content]],
                },
            }],
            merge_behavior: MERGE_BEHAVIOR.to_string(),
        },
        session_info: ResponseSessionInfo { parameters },
    }
}

/// Build the success reply for a result set.
pub fn table_reply(result: &ResultSet) -> FulfillmentReply {
    let Some(html) = table::render(result) else {
        return FulfillmentReply::NoResults;
    };
    FulfillmentReply::Envelope(envelope(
        RichContent::Accordion {
            title: RESULT_TITLE.to_string(),
            subtitle: RESULT_SUBTITLE.to_string(),
            text: html.clone(),
        },
        SessionOutput::Table {
            row_count: result.row_count().to_string(),
            sql_result: html,
        },
    ))
}

/// Build the error reply for a failed statement.
pub fn error_reply(failure: &SqlFailure) -> WebhookResponse {
    envelope(
        RichContent::Description {
            title: ERROR_TITLE.to_string(),
            text: vec![failure.message.clone(), failure.details.clone()],
        },
        SessionOutput::Error {
            row_count: "0".to_string(),
            sql: String::new(),
            error: "true".to_string(),
        },
    )
}

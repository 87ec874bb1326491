//! Webhook envelope types for the conversational-agent platform.
//!
//! Explicit serde types replace the dynamic nested-mapping lookups the
//! platform's examples use. Serialized key spelling matches the wire format
//! exactly; note that `merge_behavior` really is snake_case on the wire while
//! its siblings are camelCase.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Inbound fulfillment request, subset consumed by this service.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRequest {
    #[serde(rename = "fulfillmentInfo")]
    pub fulfillment_info: FulfillmentInfo,
    #[serde(rename = "sessionInfo", default)]
    pub session_info: SessionInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FulfillmentInfo {
    pub tag: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub parameters: SessionParams,
}

/// Session parameters the service reads. Other parameters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionParams {
    pub sql: Option<String>,
    pub sql_investment_search_phrase: Option<String>,
}

/// Which fulfillment behavior a request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTag {
    /// Execute the SQL supplied in session parameters verbatim.
    Static,
    /// Vector-similarity search over the investments table.
    Parameterized,
}

/// Routing error: the platform sent a tag this service does not implement.
#[derive(Debug, Clone, Error)]
#[error("unknown webhook tag: '{0}'")]
pub struct UnknownTag(pub String);

impl FromStr for QueryTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "parameterized" => Ok(Self::Parameterized),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}

/// Outbound fulfillment envelope, success or error shaped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookResponse {
    #[serde(rename = "fulfillmentResponse")]
    pub fulfillment_response: FulfillmentResponse,
    #[serde(rename = "sessionInfo")]
    pub session_info: ResponseSessionInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FulfillmentResponse {
    pub messages: Vec<ResponseMessage>,
    pub merge_behavior: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseMessage {
    pub payload: MessagePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagePayload {
    #[serde(rename = "richContent")]
    pub rich_content: Vec<Vec<RichContent>>,
}

/// Rich-content blocks the platform renders in conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RichContent {
    /// Collapsible table block used for successful results.
    Accordion {
        title: String,
        subtitle: String,
        text: String,
    },
    /// Error-display block; `text` lines are message then details.
    Description { title: String, text: Vec<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseSessionInfo {
    pub parameters: SessionOutput,
}

/// The two outbound parameter shapes. Stringly-typed values ("5", "true")
/// are what the platform expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SessionOutput {
    Table {
        #[serde(rename = "rowCount")]
        row_count: String,
        #[serde(rename = "sqlResult")]
        sql_result: String,
    },
    Error {
        #[serde(rename = "rowCount")]
        row_count: String,
        sql: String,
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_static_request() {
        let req: WebhookRequest = serde_json::from_str(
            r#"{
                "fulfillmentInfo": {"tag": "static"},
                "sessionInfo": {"parameters": {"sql": "SELECT 1"}}
            }"#,
        )
        .unwrap();
        assert_eq!(req.fulfillment_info.tag, "static");
        assert_eq!(req.session_info.parameters.sql.as_deref(), Some("SELECT 1"));
        assert!(req.session_info.parameters.sql_investment_search_phrase.is_none());
    }

    #[test]
    fn session_info_defaults_when_absent() {
        let req: WebhookRequest =
            serde_json::from_str(r#"{"fulfillmentInfo": {"tag": "parameterized"}}"#).unwrap();
        assert!(req.session_info.parameters.sql.is_none());
    }

    #[test]
    fn unknown_envelope_fields_are_ignored() {
        let req: WebhookRequest = serde_json::from_str(
            r#"{
                "fulfillmentInfo": {"tag": "static"},
                "sessionInfo": {"parameters": {"sql": "SELECT 1", "other": 42}},
                "pageInfo": {"currentPage": "x"}
            }"#,
        )
        .unwrap();
        assert_eq!(req.fulfillment_info.tag, "static");
    }

    #[test]
    fn tag_parsing() {
        assert_eq!("static".parse::<QueryTag>().unwrap(), QueryTag::Static);
        assert_eq!(
            "parameterized".parse::<QueryTag>().unwrap(),
            QueryTag::Parameterized
        );
        let err = "delete-everything".parse::<QueryTag>().unwrap_err();
        assert_eq!(err.to_string(), "unknown webhook tag: 'delete-everything'");
    }

    #[test]
    fn rich_content_serializes_with_type_tag() {
        let block = RichContent::Accordion {
            title: "SQL Result".into(),
            subtitle: "SQL Result Details".into(),
            text: "<table></table>".into(),
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "accordion");
        assert_eq!(value["subtitle"], "SQL Result Details");

        let block = RichContent::Description {
            title: "Error Generating SQL".into(),
            text: vec!["SQL Query Failed.".into(), "syntax error".into()],
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "description");
        assert_eq!(value["text"][1], "syntax error");
    }

    #[test]
    fn session_output_key_spelling() {
        let out = SessionOutput::Table {
            row_count: "3".into(),
            sql_result: "<table></table>".into(),
        };
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["rowCount"], "3");
        assert_eq!(value["sqlResult"], "<table></table>");

        let out = SessionOutput::Error {
            row_count: "0".into(),
            sql: String::new(),
            error: "true".into(),
        };
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["rowCount"], "0");
        assert_eq!(value["error"], "true");
        assert_eq!(value["sql"], "");
    }
}

//! agentsql-core: platform envelope types and fulfillment formatting
//!
//! Everything in this crate is synchronous and database-free:
//! - Webhook request/response envelope types (Dialogflow CX style)
//! - HTML table rendering for tabular SQL results
//! - Success/error fulfillment reply construction
//! - AlloyDB environment configuration

pub mod config;
pub mod fulfillment;
pub mod table;
pub mod webhook;

pub use config::{AlloyDbConfig, ConfigError};
pub use fulfillment::{error_reply, table_reply, FulfillmentReply, ResultSet, SqlFailure, NO_RESULTS};
pub use webhook::{QueryTag, UnknownTag, WebhookRequest, WebhookResponse};

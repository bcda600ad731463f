use std::collections::HashMap;

use relief_geo::Location;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RouteSupplies,
    CheckStatus,
    FindShelter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

/// Which path resolved a query: the LLM or the deterministic keyword
/// parser. Matches the response schema's `parsed_by` field exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParsedBy {
    Llm,
    Keyword,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParsedQuery {
    pub intent: Intent,
    pub supplies: HashMap<String, u32>,
    pub origin: Option<Location>,
    pub urgency: Urgency,
    pub constraints: Vec<String>,
    pub parsed_by: ParsedBy,
}

//! Shared wire types for the Code Assist API.
//!
//! Everything here is transient request/response state; nothing is persisted.
//! Tool endpoints use camelCase field names on the wire, job endpoints use
//! snake_case (`job_id`), matching the public API contract.

pub mod job;
pub mod request;

pub use job::{Job, JobStatus, JobTicket};
pub use request::{
    AnalyzeAllRequest, CreatePrRequest, ExportRequest, PrRequest, ToolRequest,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four analysis tools that share the `ToolRequest` shape.
///
/// PR generation has its own request shape (`PrRequest`) and is not part of
/// the fan-out default set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Debug,
    Refactor,
    Optimize,
    Test,
}

impl Tool {
    /// All tools, in the order the fan-out default uses them.
    pub const ALL: [Tool; 4] = [Tool::Debug, Tool::Refactor, Tool::Optimize, Tool::Test];

    /// Short name used in routes and the `tools` request field.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Debug => "debug",
            Tool::Refactor => "refactor",
            Tool::Optimize => "optimize",
            Tool::Test => "test",
        }
    }

    /// Label reported in the `tool` field of result envelopes.
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Debug => "debugger",
            Tool::Refactor => "refactorizer",
            Tool::Optimize => "optimizer",
            Tool::Test => "tester",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Tool::Debug),
            "refactor" => Ok(Tool::Refactor),
            "optimize" => Ok(Tool::Optimize),
            "test" => Ok(Tool::Test),
            other => Err(UnknownTool(other.to_string())),
        }
    }
}

/// Success envelope returned by every tool endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEnvelope {
    pub success: bool,
    pub data: serde_json::Value,
    pub tool: String,
}

impl ToolEnvelope {
    pub fn new(tool: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            tool: tool.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_round_trips_through_name() {
        for tool in Tool::ALL {
            assert_eq!(tool.name().parse::<Tool>().unwrap(), tool);
        }
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = "lint".parse::<Tool>().unwrap_err();
        assert_eq!(err, UnknownTool("lint".to_string()));
    }

    #[test]
    fn tool_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tool::Refactor).unwrap(), "\"refactor\"");
    }

    #[test]
    fn envelope_shape() {
        let envelope = ToolEnvelope::new("debugger", serde_json::json!({"summary": "ok"}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["tool"], "debugger");
        assert_eq!(value["data"]["summary"], "ok");
    }
}

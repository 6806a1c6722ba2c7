use thiserror::Error;

/// Failures surfaced by graph construction and interaction-mode switches.
///
/// None of these are fatal: a failed mode switch leaves the session exactly
/// as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("node id must not be empty")]
    EmptyNodeId,

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("no valid packages found in: {}", .requested.join(", "))]
    NoValidPackages { requested: Vec<String> },

    #[error("no packages given")]
    EmptyQuery,

    #[error(
        "no matching scenario for [{}]; known queries: {}",
        .query.join(", "),
        .known.join(" | ")
    )]
    NoMatchingScenario { query: Vec<String>, known: Vec<String> },

    #[error("scenario {scenario} validation failed, missing: [{}]", .missing.join(", "))]
    ScenarioValidation {
        scenario: String,
        missing: Vec<String>,
    },

    #[error("cycle mode is not active")]
    CycleModeInactive,

    #[error("unknown cycle: {0}")]
    UnknownCycle(String),
}

use thiserror::Error;

/// Configuration problems surfaced before any validation runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown WCAG level `{0}` (expected A, AA or AAA)")]
    UnknownWcagLevel(String),

    #[error("localization is enforced but supportedLanguages is empty")]
    EmptySupportedLanguages,

    #[error("invalid locale code `{0}` in supportedLanguages")]
    InvalidLanguageCode(String),

    #[error("maxComponentSize must be greater than zero")]
    InvalidMaxComponentSize,

    #[error("tokenPrefix `{0}` must not contain whitespace")]
    InvalidTokenPrefix(String),

    #[error("unsupported configuration file `{0}` (expected .toml, .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structured failure from the markup parser.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Internal failure of a single rule evaluation. The orchestrator drops the
/// rule's contribution for that file instead of failing the run.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule `{rule}` panicked: {message}")]
    Panicked { rule: String, message: String },

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a rule with id `{0}` is already registered")]
    DuplicateRule(String),
}

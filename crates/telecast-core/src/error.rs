//! Error types for Telecast Core

use thiserror::Error;

/// Result type alias for category and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Category/configuration error types.
///
/// Playback faults never show up here: engine trouble arrives as a
/// [`MediaSignal`](crate::player::MediaSignal) and is recovered by the
/// player's reconnect loop, surfacing to the host only as state and
/// buffering notifications.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("failed to parse configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("resource {identifier}: missing required field `{field}`")]
    MissingField {
        identifier: String,
        field: &'static str,
    },

    #[error("resource {identifier}: field `{field}` must be {expected}")]
    FieldType {
        identifier: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("no such video resource type: {0}")]
    UnknownResourceType(String),

    #[error("no such {domain} key: {key}")]
    UnknownKey {
        domain: &'static str,
        key: String,
    },

    // Category errors
    #[error("no video plugin has been added to the category")]
    NoPlugin,

    #[error("{count} video plugins added; category operations need exactly one")]
    MultiplePlugins { count: usize },

    #[error("a plugin with key `{key}` is already registered")]
    DuplicatePlugin { key: String },

    #[error("configuration document has no section for plugin `{key}`")]
    PluginConfigMissing { key: String },

    #[error("plugin `{key}` has not been configured")]
    PluginNotConfigured { key: String },

    // Endpoint errors
    #[error("resource {identifier}: egress endpoint is not a valid URL: {endpoint}")]
    InvalidEgressUrl {
        identifier: String,
        endpoint: String,
        source: url::ParseError,
    },
}

impl Error {
    /// Recovery hint suitable for showing to an operator, where one exists.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::Configuration(_) => {
                Some("Check that the content of the configuration file hasn't been deleted.")
            }
            Error::Parse(_) | Error::MissingField { .. } | Error::FieldType { .. } => {
                Some("Check the config file to make sure it hasn't been wrongly modified.")
            }
            Error::UnknownResourceType(_) | Error::UnknownKey { .. } => {
                Some("Consider re-generating the video config file.")
            }
            Error::NoPlugin | Error::PluginConfigMissing { .. } => {
                Some("Add the video plugin before calling configure().")
            }
            Error::PluginNotConfigured { .. } => {
                Some("Call configure() with a valid configuration document first.")
            }
            _ => None,
        }
    }
}

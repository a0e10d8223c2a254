//! On-demand (VOD) resources

use super::{VideoResource, VideoResourceType};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where source material for a VOD asset is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    /// An input S3 bucket name.
    S3Bucket,
}

impl InputKind {
    /// All input kinds.
    pub const ALL: [InputKind; 1] = [InputKind::S3Bucket];

    /// JSON field name for this kind.
    pub fn key(&self) -> &'static str {
        match self {
            InputKind::S3Bucket => "input",
        }
    }

    /// Look up an input kind by its JSON field name.
    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "input" => Ok(InputKind::S3Bucket),
            other => Err(Error::UnknownKey {
                domain: "input",
                key: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Where processed VOD output lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// An output S3 bucket resource name.
    S3Bucket,
    /// A full output URL; may point at S3 or a CDN depending on the
    /// environment. Not always present.
    BaseUrl,
}

impl OutputKind {
    /// All output kinds.
    pub const ALL: [OutputKind; 2] = [OutputKind::S3Bucket, OutputKind::BaseUrl];

    /// JSON field name for this kind.
    pub fn key(&self) -> &'static str {
        match self {
            OutputKind::S3Bucket => "output",
            OutputKind::BaseUrl => "outputUrl",
        }
    }

    /// Look up an output kind by its JSON field name.
    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "output" => Ok(OutputKind::S3Bucket),
            "outputUrl" => Ok(OutputKind::BaseUrl),
            other => Err(Error::UnknownKey {
                domain: "output",
                key: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// An on-demand video resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnDemandResource {
    identifier: String,
    input: HashMap<InputKind, String>,
    output: HashMap<OutputKind, String>,
}

impl OnDemandResource {
    /// Create a new on-demand resource.
    pub fn new(
        identifier: impl Into<String>,
        input: HashMap<InputKind, String>,
        output: HashMap<OutputKind, String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            input,
            output,
        }
    }

    /// Name this resource was configured under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Input point, typically an S3 bucket, if configured.
    pub fn input_point(&self, kind: InputKind) -> Option<&str> {
        self.input.get(&kind).map(String::as_str)
    }

    /// Output point, typically an S3 bucket resource name or URL, if
    /// configured.
    pub fn output_point(&self, kind: OutputKind) -> Option<&str> {
        self.output.get(&kind).map(String::as_str)
    }

    pub(crate) fn input_map(&self) -> &HashMap<InputKind, String> {
        &self.input
    }

    pub(crate) fn output_map(&self) -> &HashMap<OutputKind, String> {
        &self.output
    }
}

impl VideoResource for OnDemandResource {
    fn identifier(&self) -> &str {
        self.identifier()
    }

    fn resource_type(&self) -> VideoResourceType {
        VideoResourceType::OnDemand
    }
}

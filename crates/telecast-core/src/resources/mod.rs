//! Typed video resource model
//!
//! Resources come in two flavors:
//! - [`LiveResource`]: a live channel with ingress, stream-key and egress
//!   endpoint maps
//! - [`OnDemandResource`]: a pre-recorded asset with input/output storage
//!   locations
//!
//! Endpoint maps are keyed by small closed enums; a missing entry is a
//! `None` lookup, never an error. Unknown key *strings* (from config JSON)
//! are a configuration error — see the `from_key` constructors.

mod live;
mod ondemand;

pub use live::{EgressKind, IngressKind, LiveResource, StreamKeyKind};
pub use ondemand::{InputKind, OnDemandResource, OutputKind};

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Types of video resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoResourceType {
    /// Live streaming video resource
    Live,
    /// On-demand video resource
    OnDemand,
}

impl VideoResourceType {
    /// Name used in the configuration `type` field.
    pub fn name(&self) -> &'static str {
        match self {
            VideoResourceType::Live => "LIVE",
            VideoResourceType::OnDemand => "ON_DEMAND",
        }
    }

    /// Look up a resource type by its configuration name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "LIVE" => Ok(VideoResourceType::Live),
            "ON_DEMAND" => Ok(VideoResourceType::OnDemand),
            other => Err(Error::UnknownResourceType(other.to_string())),
        }
    }
}

impl std::fmt::Display for VideoResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A video resource known to the category.
pub trait VideoResource {
    /// Identifier for this resource; immutable after construction.
    fn identifier(&self) -> &str;

    /// The type of resource that this is.
    fn resource_type(&self) -> VideoResourceType;
}

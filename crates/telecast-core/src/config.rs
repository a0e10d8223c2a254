//! Plugin configuration and its JSON reader
//!
//! The configuration document maps resource identifiers to resource
//! descriptors:
//!
//! ```json
//! {
//!     "myStream": {
//!         "type": "LIVE",
//!         "ingress": { "primary": "rtmp://...", "backup": "rtmp://..." },
//!         "keys": { "primary": "...", "backup": "..." },
//!         "egress": { "hls": "https://...", "dash": "https://..." }
//!     },
//!     "myAsset": {
//!         "type": "ON_DEMAND",
//!         "input": "uploads-bucket",
//!         "output": "renditions-bucket",
//!         "outputUrl": "https://..."
//!     }
//! }
//! ```
//!
//! Identifier keys are free-form; everything below them is a closed domain.
//! An unknown sub-object key or `type` name fails the whole read — these are
//! data-integrity checks on a generated file, not recoverable conditions.

use crate::resources::{
    EgressKind, IngressKind, InputKind, LiveResource, OnDemandResource, OutputKind, StreamKeyKind,
    VideoResourceType,
};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Parsed video plugin configuration.
///
/// Holds the live and on-demand resources keyed by identifier. Usually
/// produced by [`read_from_str`] or [`read_from_value`]; the `add_*`
/// methods exist for programmatic assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginConfiguration {
    live: HashMap<String, LiveResource>,
    on_demand: HashMap<String, OnDemandResource>,
}

impl PluginConfiguration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live resource, keyed by its identifier.
    pub fn add_live(&mut self, resource: LiveResource) {
        self.live
            .insert(resource.identifier().to_string(), resource);
    }

    /// Add an on-demand resource, keyed by its identifier.
    pub fn add_on_demand(&mut self, resource: OnDemandResource) {
        self.on_demand
            .insert(resource.identifier().to_string(), resource);
    }

    /// All live resources, keyed by identifier.
    pub fn live_resources(&self) -> &HashMap<String, LiveResource> {
        &self.live
    }

    /// Look up a live resource by identifier.
    pub fn live_resource(&self, identifier: &str) -> Option<&LiveResource> {
        self.live.get(identifier)
    }

    /// All on-demand resources, keyed by identifier.
    pub fn on_demand_resources(&self) -> &HashMap<String, OnDemandResource> {
        &self.on_demand
    }

    /// Look up an on-demand resource by identifier.
    pub fn on_demand_resource(&self, identifier: &str) -> Option<&OnDemandResource> {
        self.on_demand.get(identifier)
    }

    /// Total resource count across both types.
    pub fn len(&self) -> usize {
        self.live.len() + self.on_demand.len()
    }

    /// True when no resources are configured.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.on_demand.is_empty()
    }
}

/// Read a configuration from a JSON string.
pub fn read_from_str(json: &str) -> Result<PluginConfiguration> {
    let document: Value = serde_json::from_str(json)?;
    read_from_value(&document)
}

/// Read a configuration from an already-parsed JSON document.
pub fn read_from_value(document: &Value) -> Result<PluginConfiguration> {
    let entries = document.as_object().ok_or_else(|| {
        Error::Configuration("configuration root must be a JSON object".to_string())
    })?;

    let mut configuration = PluginConfiguration::new();
    for (identifier, entry) in entries {
        let fields = entry.as_object().ok_or_else(|| {
            Error::Configuration(format!("resource {identifier} must be a JSON object"))
        })?;
        match VideoResourceType::from_name(required_string(identifier, fields, "type")?)? {
            VideoResourceType::Live => {
                configuration.add_live(read_live(identifier, fields)?);
            }
            VideoResourceType::OnDemand => {
                configuration.add_on_demand(read_on_demand(identifier, fields)?);
            }
        }
    }

    debug!(
        live = configuration.live.len(),
        on_demand = configuration.on_demand.len(),
        "Parsed video configuration"
    );
    Ok(configuration)
}

/// Write a configuration back out in the documented JSON shape.
///
/// Feeding the result to [`read_from_value`] yields an equal configuration.
pub fn to_value(configuration: &PluginConfiguration) -> Value {
    let mut entries = Map::new();

    for (identifier, resource) in configuration.live_resources() {
        let mut fields = Map::new();
        fields.insert("type".to_string(), VideoResourceType::Live.name().into());
        fields.insert(
            "ingress".to_string(),
            write_keyed_map(&IngressKind::ALL, resource.ingress_map()),
        );
        fields.insert(
            "keys".to_string(),
            write_keyed_map(&StreamKeyKind::ALL, resource.stream_key_map()),
        );
        fields.insert(
            "egress".to_string(),
            write_keyed_map(&EgressKind::ALL, resource.egress_map()),
        );
        entries.insert(identifier.clone(), Value::Object(fields));
    }

    for (identifier, resource) in configuration.on_demand_resources() {
        let mut fields = Map::new();
        fields.insert(
            "type".to_string(),
            VideoResourceType::OnDemand.name().into(),
        );
        if let Some(input) = resource.input_point(InputKind::S3Bucket) {
            fields.insert("input".to_string(), input.into());
        }
        if let Some(output) = resource.output_point(OutputKind::S3Bucket) {
            fields.insert("output".to_string(), output.into());
        }
        if let Some(url) = resource.output_point(OutputKind::BaseUrl) {
            fields.insert("outputUrl".to_string(), url.into());
        }
        entries.insert(identifier.clone(), Value::Object(fields));
    }

    Value::Object(entries)
}

fn read_live(identifier: &str, fields: &Map<String, Value>) -> Result<LiveResource> {
    let ingress = read_keyed_map(
        identifier,
        required_object(identifier, fields, "ingress")?,
        "ingress",
        IngressKind::from_key,
    )?;
    let stream_keys = read_keyed_map(
        identifier,
        required_object(identifier, fields, "keys")?,
        "keys",
        StreamKeyKind::from_key,
    )?;
    let egress = read_keyed_map(
        identifier,
        required_object(identifier, fields, "egress")?,
        "egress",
        EgressKind::from_key,
    )?;
    Ok(LiveResource::new(identifier, ingress, stream_keys, egress))
}

fn read_on_demand(identifier: &str, fields: &Map<String, Value>) -> Result<OnDemandResource> {
    let mut input = HashMap::new();
    input.insert(
        InputKind::S3Bucket,
        required_string(identifier, fields, "input")?.to_string(),
    );

    let mut output = HashMap::new();
    output.insert(
        OutputKind::S3Bucket,
        required_string(identifier, fields, "output")?.to_string(),
    );
    // Not always present
    if let Some(value) = fields.get("outputUrl") {
        let url = value.as_str().ok_or_else(|| Error::FieldType {
            identifier: identifier.to_string(),
            field: "outputUrl",
            expected: "a string",
        })?;
        output.insert(OutputKind::BaseUrl, url.to_string());
    }

    Ok(OnDemandResource::new(identifier, input, output))
}

fn read_keyed_map<K, F>(
    identifier: &str,
    entries: &Map<String, Value>,
    field: &'static str,
    parse_key: F,
) -> Result<HashMap<K, String>>
where
    K: Eq + Hash,
    F: Fn(&str) -> Result<K>,
{
    let mut map = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        let kind = parse_key(key)?;
        let point = value.as_str().ok_or_else(|| Error::FieldType {
            identifier: identifier.to_string(),
            field,
            expected: "an object of string values",
        })?;
        map.insert(kind, point.to_string());
    }
    Ok(map)
}

fn write_keyed_map<K>(kinds: &[K], points: &HashMap<K, String>) -> Value
where
    K: Eq + Hash + std::fmt::Display,
{
    let mut fields = Map::new();
    for kind in kinds {
        if let Some(point) = points.get(kind) {
            fields.insert(kind.to_string(), point.as_str().into());
        }
    }
    Value::Object(fields)
}

fn required_string<'a>(
    identifier: &str,
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str> {
    let value = fields.get(field).ok_or_else(|| Error::MissingField {
        identifier: identifier.to_string(),
        field,
    })?;
    value.as_str().ok_or_else(|| Error::FieldType {
        identifier: identifier.to_string(),
        field,
        expected: "a string",
    })
}

fn required_object<'a>(
    identifier: &str,
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Map<String, Value>> {
    let value = fields.get(field).ok_or_else(|| Error::MissingField {
        identifier: identifier.to_string(),
        field,
    })?;
    value.as_object().ok_or_else(|| Error::FieldType {
        identifier: identifier.to_string(),
        field,
        expected: "an object",
    })
}

//! Video category
//!
//! The category is the host-facing surface: a registry of plugins that
//! forwards every category-level operation to the one selected plugin. No
//! fan-out, no caching, no error translation beyond propagating the
//! plugin's own failures.

use crate::plugin::VideoPlugin;
use crate::resources::{LiveResource, OnDemandResource};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};
use url::Url;

/// Category-wide video operations.
///
/// Implemented by plugins and by [`VideoCategory`] itself, which delegates.
/// Lookups of unknown identifiers yield `Ok(None)`; `Err` is reserved for
/// category and configuration faults.
pub trait VideoCategoryBehavior {
    /// All live resources, keyed by identifier.
    fn live_resources(&self) -> Result<HashMap<String, LiveResource>>;

    /// Look up a live resource by identifier.
    fn live_resource(&self, identifier: &str) -> Result<Option<LiveResource>>;

    /// All on-demand resources, keyed by identifier.
    fn on_demand_resources(&self) -> Result<HashMap<String, OnDemandResource>>;

    /// Look up an on-demand resource by identifier.
    fn on_demand_resource(&self, identifier: &str) -> Result<Option<OnDemandResource>>;

    /// Resolve the preferred egress endpoint of a live resource as a URL.
    ///
    /// An unknown resource, or one with an empty egress map, yields
    /// `Ok(None)`; an endpoint that does not parse as a URL is an error.
    fn egress_for(&self, resource_name: &str) -> Result<Option<Url>>;
}

/// Registry of video plugins.
///
/// Plugins are added, then configured in one shot from a category
/// configuration document:
///
/// ```json
/// { "plugins": { "telecastVideoPlugin": { ...resource map... } } }
/// ```
///
/// Category operations require exactly one registered plugin and forward
/// to it.
#[derive(Default)]
pub struct VideoCategory {
    plugins: Vec<Box<dyn VideoPlugin>>,
}

impl VideoCategory {
    /// Create an empty category.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. Each plugin key can only be registered once.
    pub fn add_plugin(&mut self, plugin: Box<dyn VideoPlugin>) -> Result<()> {
        let key = plugin.plugin_key();
        if self.plugins.iter().any(|existing| existing.plugin_key() == key) {
            return Err(Error::DuplicatePlugin {
                key: key.to_string(),
            });
        }
        debug!(plugin = key, "Video plugin added");
        self.plugins.push(plugin);
        Ok(())
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Configure every registered plugin from a category document.
    ///
    /// Each plugin receives the `plugins` section stored under its key; a
    /// registered plugin without a section is a configuration error.
    pub fn configure(&mut self, document: &Value) -> Result<()> {
        let sections = document
            .get("plugins")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                Error::Configuration("category document has no `plugins` object".to_string())
            })?;

        for plugin in self.plugins.iter_mut() {
            let key = plugin.plugin_key().to_string();
            let section = sections.get(&key).ok_or_else(|| Error::PluginConfigMissing {
                key: key.clone(),
            })?;
            plugin.configure(section)?;
            info!(plugin = %key, "Video plugin configured");
        }
        Ok(())
    }

    fn selected_plugin(&self) -> Result<&dyn VideoPlugin> {
        match self.plugins.len() {
            0 => Err(Error::NoPlugin),
            1 => Ok(self.plugins[0].as_ref()),
            count => Err(Error::MultiplePlugins { count }),
        }
    }
}

impl VideoCategoryBehavior for VideoCategory {
    fn live_resources(&self) -> Result<HashMap<String, LiveResource>> {
        self.selected_plugin()?.live_resources()
    }

    fn live_resource(&self, identifier: &str) -> Result<Option<LiveResource>> {
        self.selected_plugin()?.live_resource(identifier)
    }

    fn on_demand_resources(&self) -> Result<HashMap<String, OnDemandResource>> {
        self.selected_plugin()?.on_demand_resources()
    }

    fn on_demand_resource(&self, identifier: &str) -> Result<Option<OnDemandResource>> {
        self.selected_plugin()?.on_demand_resource(identifier)
    }

    fn egress_for(&self, resource_name: &str) -> Result<Option<Url>> {
        self.selected_plugin()?.egress_for(resource_name)
    }
}

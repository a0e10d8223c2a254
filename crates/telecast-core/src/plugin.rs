//! Video plugins

use crate::category::VideoCategoryBehavior;
use crate::config::{self, PluginConfiguration};
use crate::resources::{LiveResource, OnDemandResource};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// A plugin backing the video category.
///
/// A plugin is the category operations plus a key and a configuration
/// entry point. [`VideoCategory`](crate::category::VideoCategory) hands
/// each plugin the configuration section stored under its key.
pub trait VideoPlugin: VideoCategoryBehavior + Send {
    /// Key identifying this plugin in the configuration document.
    fn plugin_key(&self) -> &str;

    /// Parse and store this plugin's configuration section.
    fn configure(&mut self, document: &Value) -> Result<()>;
}

/// The Telecast video plugin.
///
/// Backed by a [`PluginConfiguration`] parsed from its configuration
/// section. Every category operation before a successful
/// [`configure`](VideoPlugin::configure) fails with
/// [`Error::PluginNotConfigured`].
#[derive(Debug, Default)]
pub struct TelecastVideoPlugin {
    configuration: Option<PluginConfiguration>,
}

impl TelecastVideoPlugin {
    /// Key under which this plugin appears in a category document.
    pub const PLUGIN_KEY: &'static str = "telecastVideoPlugin";

    /// Create an unconfigured plugin.
    pub fn new() -> Self {
        Self::default()
    }

    fn configuration(&self) -> Result<&PluginConfiguration> {
        self.configuration
            .as_ref()
            .ok_or_else(|| Error::PluginNotConfigured {
                key: Self::PLUGIN_KEY.to_string(),
            })
    }
}

impl VideoPlugin for TelecastVideoPlugin {
    fn plugin_key(&self) -> &str {
        Self::PLUGIN_KEY
    }

    fn configure(&mut self, document: &Value) -> Result<()> {
        let configuration = config::read_from_value(document)?;
        debug!(
            resources = configuration.len(),
            "Plugin configuration stored"
        );
        self.configuration = Some(configuration);
        Ok(())
    }
}

impl VideoCategoryBehavior for TelecastVideoPlugin {
    fn live_resources(&self) -> Result<HashMap<String, LiveResource>> {
        Ok(self.configuration()?.live_resources().clone())
    }

    fn live_resource(&self, identifier: &str) -> Result<Option<LiveResource>> {
        Ok(self.configuration()?.live_resource(identifier).cloned())
    }

    fn on_demand_resources(&self) -> Result<HashMap<String, OnDemandResource>> {
        Ok(self.configuration()?.on_demand_resources().clone())
    }

    fn on_demand_resource(&self, identifier: &str) -> Result<Option<OnDemandResource>> {
        Ok(self.configuration()?.on_demand_resource(identifier).cloned())
    }

    fn egress_for(&self, resource_name: &str) -> Result<Option<Url>> {
        let configuration = self.configuration()?;
        let Some(resource) = configuration.live_resource(resource_name) else {
            return Ok(None);
        };
        let Some((_, point)) = resource.preferred_egress() else {
            return Ok(None);
        };
        let url = Url::parse(point).map_err(|source| Error::InvalidEgressUrl {
            identifier: resource_name.to_string(),
            endpoint: point.to_string(),
            source,
        })?;
        Ok(Some(url))
    }
}

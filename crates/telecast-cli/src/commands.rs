//! CLI command implementations

use std::fs;
use std::path::Path;

use anyhow::Context;
use telecast_core::{
    read_from_str, to_value, EgressKind, IngressKind, InputKind, OutputKind, PluginConfiguration,
    StreamKeyKind,
};

use crate::output::{to_json, OutputFormat};

/// Validate a configuration document
pub fn validate(config: &Path) -> anyhow::Result<()> {
    println!("Validating: {}", config.display());

    let json = fs::read_to_string(config)
        .with_context(|| format!("reading {}", config.display()))?;

    match read_from_str(&json) {
        Ok(configuration) => {
            println!("\nConfiguration OK");
            println!(
                "  Live resources:      {}",
                configuration.live_resources().len()
            );
            println!(
                "  On-demand resources: {}",
                configuration.on_demand_resources().len()
            );
        }
        Err(e) => {
            eprintln!("\nInvalid configuration: {e}");
            if let Some(hint) = e.suggestion() {
                eprintln!("  hint: {hint}");
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// List configured resources
pub fn resources(config: &Path, format: &str) -> anyhow::Result<()> {
    let configuration = load(config)?;

    if let OutputFormat::Json = OutputFormat::from(format) {
        println!("{}", to_json(&to_value(&configuration))?);
        return Ok(());
    }

    println!("Live resources:");
    if configuration.live_resources().is_empty() {
        println!("  (none)");
    }
    let mut live: Vec<_> = configuration.live_resources().iter().collect();
    live.sort_by_key(|&(identifier, _)| identifier);
    for (identifier, resource) in live {
        let ingress = IngressKind::ALL
            .iter()
            .filter(|kind| resource.ingress_point(**kind).is_some())
            .count();
        let keys = StreamKeyKind::ALL
            .iter()
            .filter(|kind| resource.stream_key(**kind).is_some())
            .count();
        let egress = EgressKind::ALL
            .iter()
            .filter(|kind| resource.egress_point(**kind).is_some())
            .count();
        println!("  {identifier}");
        println!("    ingress endpoints: {ingress}");
        println!("    stream keys:       {keys}");
        println!("    egress endpoints:  {egress}");
    }

    println!("\nOn-demand resources:");
    if configuration.on_demand_resources().is_empty() {
        println!("  (none)");
    }
    let mut on_demand: Vec<_> = configuration.on_demand_resources().iter().collect();
    on_demand.sort_by_key(|&(identifier, _)| identifier);
    for (identifier, resource) in on_demand {
        println!("  {identifier}");
        if let Some(input) = resource.input_point(InputKind::S3Bucket) {
            println!("    input:  {input}");
        }
        if let Some(output) = resource.output_point(OutputKind::S3Bucket) {
            println!("    output: {output}");
        }
        if let Some(url) = resource.output_point(OutputKind::BaseUrl) {
            println!("    url:    {url}");
        }
    }

    Ok(())
}

/// Show egress endpoints for a live resource, preferred one first marked
pub fn egress(config: &Path, resource_id: &str) -> anyhow::Result<()> {
    let configuration = load(config)?;

    let Some(resource) = configuration.live_resource(resource_id) else {
        eprintln!("No live resource named \"{resource_id}\"");
        std::process::exit(1);
    };

    let preferred = resource.preferred_egress().map(|(kind, _)| kind);
    println!("Egress endpoints for \"{resource_id}\":");
    let mut any = false;
    for kind in EgressKind::ALL {
        if let Some(point) = resource.egress_point(kind) {
            let marker = if preferred == Some(kind) {
                "  (preferred)"
            } else {
                ""
            };
            println!("  {:<10} {point}{marker}", kind.to_string());
            any = true;
        }
    }
    if !any {
        println!("  none configured; a player would leave its source unset");
    }

    Ok(())
}

fn load(config: &Path) -> anyhow::Result<PluginConfiguration> {
    tracing::debug!(path = %config.display(), "Loading configuration");
    let json = fs::read_to_string(config)
        .with_context(|| format!("reading {}", config.display()))?;
    read_from_str(&json).map_err(|e| match e.suggestion() {
        Some(hint) => anyhow::anyhow!("{e}\n  hint: {hint}"),
        None => anyhow::Error::new(e),
    })
}

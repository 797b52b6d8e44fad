//! Catalog inspection commands.

use anyhow::Result;
use rackwalk_core::config::RackwalkConfig;
use rackwalk_core::schema::SchemaProvider;

use crate::output;

/// Prints the device sections of the active catalog.
pub fn sections(config: &RackwalkConfig, json: bool) -> Result<()> {
    let provider = config.provider();
    let sections = provider.catalog().sections().to_vec();
    output::print_out(json, &sections, |section| {
        let fields: Vec<String> = section
            .fields
            .iter()
            .map(|f| {
                if f.required {
                    format!("{}*", f.id)
                } else {
                    f.id.clone()
                }
            })
            .collect();
        format!("{}\t{}\t{}", section.id, section.title, fields.join(","))
    })
}

/// Prints the facility directory.
pub fn facilities(config: &RackwalkConfig, json: bool) -> Result<()> {
    let provider = config.provider();
    let facilities = provider.directory().facilities().to_vec();
    output::print_out(json, &facilities, |facility| {
        format!(
            "{}\t{}\t{} rack(s)",
            facility.id,
            facility.name,
            facility.racks.len()
        )
    })
}

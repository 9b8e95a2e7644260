use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use log::debug;
use struct_mapping::MappingConfig;

/// Reads the mapping configuration from a json file.
pub(crate) fn load(path: &Path) -> Result<MappingConfig> {
	let file = File::open(path)
		.with_context(|| anyhow!("failed to open config file {path:?}"))?;
	let config: MappingConfig = serde_json::from_reader(BufReader::new(file))
		.with_context(|| anyhow!("failed to parse config file {path:?}"))?;

	debug!(
		"loaded {} type override(s), {} blacklisted type(s) and {} blacklisted field(s) from {path:?}",
		config.overrides.len(), config.blacklist_types.len(), config.blacklist_fields.len(),
	);
	Ok(config)
}

use std::collections::BTreeSet;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use crate::naming::BoundaryMode;

pub const DEFAULT_MARKER_ATTRIBUTE: &str = "ScalaSig";

/// User supplied mapping rules. Read-only for the duration of a generation run.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use struct_mapping::config::MappingConfig;
///
/// let config: MappingConfig = serde_json::from_str(r#"{
///     "types": { "Ljava/util/UUID;": "string" },
///     "blacklist_fields": ["password"]
/// }"#).unwrap();
///
/// assert_eq!(config.overrides.get("ljava/util/uuid;").map(String::as_str), Some("string"));
/// assert_eq!(config.marker_attribute, "ScalaSig");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
	/// Lowercased raw type signature to target type template. Use `%s` for the generic parameters, in order.
	#[serde(rename = "types", deserialize_with = "lowercase_keys")]
	pub overrides: IndexMap<String, String>,
	/// Exact raw type signatures. Fields of these types are left out.
	pub blacklist_types: Vec<String>,
	/// Field names, compared ignoring case against the Go field name. These fields are left out.
	pub blacklist_fields: Vec<String>,
	/// Words with a casing that should be used instead of the default one.
	pub case_overrides: Vec<String>,
	pub boundary_mode: BoundaryMode,
	/// Only classes carrying a class level attribute with this name are generated.
	pub marker_attribute: String,
}

impl Default for MappingConfig {
	fn default() -> Self {
		MappingConfig {
			overrides: IndexMap::new(),
			blacklist_types: Vec::new(),
			blacklist_fields: Vec::new(),
			case_overrides: Vec::new(),
			boundary_mode: BoundaryMode::default(),
			marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_owned(),
		}
	}
}

impl MappingConfig {
	/// Adds a type override, taking care of lowercasing the signature.
	pub fn with_override(mut self, signature: &str, template: &str) -> MappingConfig {
		self.overrides.insert(signature.to_lowercase(), template.to_owned());
		self
	}

	pub fn is_blacklisted_field(&self, declaration_name: &str) -> bool {
		let name = declaration_name.to_lowercase();
		self.blacklist_fields.iter().any(|field| field.to_lowercase() == name)
	}
}

fn lowercase_keys<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IndexMap<String, String>, D::Error> {
	let map = IndexMap::<String, String>::deserialize(deserializer)?;
	Ok(map.into_iter()
		.map(|(signature, template)| (signature.to_lowercase(), template))
		.collect())
}

/// The fully qualified names (`.` separated) of all classes generated in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownTypes {
	names: BTreeSet<String>,
}

impl KnownTypes {
	pub fn new() -> KnownTypes {
		KnownTypes::default()
	}

	/// Accepts both `com.ua.Foo` and the internal `com/ua/Foo` form.
	pub fn insert(&mut self, name: &str) {
		self.names.insert(name.replace('/', "."));
	}

	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	pub fn iter(&self) -> impl Iterator<Item=&str> {
		self.names.iter().map(String::as_str)
	}
}

impl<S: AsRef<str>> FromIterator<S> for KnownTypes {
	fn from_iter<T: IntoIterator<Item=S>>(iter: T) -> Self {
		let mut known = KnownTypes::new();
		for name in iter {
			known.insert(name.as_ref());
		}
		known
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::config::{KnownTypes, MappingConfig};
	use crate::naming::BoundaryMode;

	#[test]
	fn deserialize_full() -> Result<()> {
		let config: MappingConfig = serde_json::from_str(r#"{
			"types": {
				"Lscala/collection/immutable/Vector<>;": "[]%s",
				"Ljava/util/UUID;": "string"
			},
			"blacklist_types": ["Lcom/ua/Internal;"],
			"blacklist_fields": ["Password"],
			"case_overrides": ["iOS"],
			"boundary_mode": "lower_upper",
			"marker_attribute": "ScalaInlineInfo"
		}"#)?;

		let overrides: Vec<(&str, &str)> = config.overrides.iter()
			.map(|(k, v)| (k.as_str(), v.as_str()))
			.collect();
		assert_eq!(overrides, vec![
			("lscala/collection/immutable/vector<>;", "[]%s"),
			("ljava/util/uuid;", "string"),
		]);
		assert_eq!(config.blacklist_types, vec!["Lcom/ua/Internal;".to_owned()]);
		assert_eq!(config.case_overrides, vec!["iOS".to_owned()]);
		assert_eq!(config.boundary_mode, BoundaryMode::LowerUpper);
		assert_eq!(config.marker_attribute, "ScalaInlineInfo");
		Ok(())
	}

	#[test]
	fn deserialize_empty() -> Result<()> {
		let config: MappingConfig = serde_json::from_str("{}")?;
		assert_eq!(config, MappingConfig::default());
		Ok(())
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let result = serde_json::from_str::<MappingConfig>(r#"{ "blacklistTypes": ["Lcom/ua/Internal;"] }"#);
		assert!(result.is_err_and(|e| e.to_string().contains("unknown field `blacklistTypes`")));
	}

	#[test]
	fn blacklisted_field_ignores_case() {
		let config = MappingConfig {
			blacklist_fields: vec!["Password".to_owned()],
			..MappingConfig::default()
		};
		assert!(config.is_blacklisted_field("PASSWORD"));
		assert!(config.is_blacklisted_field("password"));
		assert!(!config.is_blacklisted_field("PasswordHash"));
	}

	#[test]
	fn known_types_normalize_separators() {
		let known: KnownTypes = ["com/ua/Foo", "com.ua.Bar"].into_iter().collect();
		assert!(known.contains("com.ua.Foo"));
		assert!(known.contains("com.ua.Bar"));
		assert!(!known.contains("com/ua/Foo"));
		assert_eq!(known.iter().collect::<Vec<_>>(), vec!["com.ua.Bar", "com.ua.Foo"]);
	}
}

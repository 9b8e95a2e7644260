//! Turning JVM field names into Go field names and json tag names.
use serde::Deserialize;
use crate::config::MappingConfig;

/// Abbreviations that are written fully uppercased in Go identifiers.
const COMMON_INITIALISMS: &[&str] = &[
	"ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP", "JSON", "LHS",
	"QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS", "TTL", "UDP", "UI", "UID", "UUID", "URI",
	"URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

/// Which character transitions start a new word in an identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
	/// Lowercase to uppercase, letter to digit and digit to letter.
	#[default]
	Full,
	/// Only lowercase to uppercase. This is how older versions split identifiers.
	LowerUpper,
}

impl BoundaryMode {
	fn is_boundary(self, previous: char, current: char) -> bool {
		let lower_upper = previous.is_lowercase() && current.is_uppercase();
		match self {
			BoundaryMode::LowerUpper => lower_upper,
			BoundaryMode::Full => lower_upper
				|| (previous.is_alphabetic() && current.is_numeric())
				|| (previous.is_numeric() && current.is_alphabetic()),
		}
	}
}

/// Splits an identifier into its words.
///
/// ```
/// use struct_mapping::naming::{BoundaryMode, split_boundaries};
///
/// assert_eq!(split_boundaries("fieldOneTwo", BoundaryMode::Full), vec!["field", "One", "Two"]);
/// assert_eq!(split_boundaries("address2Line", BoundaryMode::Full), vec!["address", "2", "Line"]);
/// assert_eq!(split_boundaries("address2Line", BoundaryMode::LowerUpper), vec!["address2Line"]);
/// ```
pub fn split_boundaries(identifier: &str, mode: BoundaryMode) -> Vec<&str> {
	let mut segments = Vec::new();
	let mut start = 0;
	let mut previous = None;

	for (index, current) in identifier.char_indices() {
		if previous.is_some_and(|previous| mode.is_boundary(previous, current)) {
			segments.push(&identifier[start..index]);
			start = index;
		}
		previous = Some(current);
	}
	if start < identifier.len() {
		segments.push(&identifier[start..]);
	}

	segments
}

/// The last segment of a `.` separated fully qualified class name.
///
/// ```
/// use struct_mapping::naming::simple_class_name;
///
/// assert_eq!(simple_class_name("com.ua.b2bservice.model.Account"), "Account");
/// assert_eq!(simple_class_name("Account"), "Account");
/// ```
pub fn simple_class_name(name: &str) -> &str {
	name.rsplit_once('.').map_or(name, |(_, simple)| simple)
}

fn capitalize(segment: &str) -> String {
	let mut chars = segment.chars();
	match chars.next() {
		None => String::new(),
		Some(first) => first.to_uppercase().chain(chars).collect(),
	}
}

/// Naming rules for one generation run.
#[derive(Debug, Clone, Copy)]
pub struct Naming<'a> {
	case_overrides: &'a [String],
	mode: BoundaryMode,
}

impl<'a> Naming<'a> {
	pub fn new(config: &'a MappingConfig) -> Naming<'a> {
		Naming {
			case_overrides: &config.case_overrides,
			mode: config.boundary_mode,
		}
	}

	pub fn split<'s>(&self, identifier: &'s str) -> Vec<&'s str> {
		split_boundaries(identifier, self.mode)
	}

	/// The Go field name for a field.
	///
	/// Each word gets its first character uppercased, the rest is kept as is. Known initialisms are written uppercase.
	/// Finally, a word matching one of the case overrides (ignoring case) is replaced by that override.
	pub fn declaration_name(&self, identifier: &str) -> String {
		self.split(identifier)
			.into_iter()
			.map(|segment| {
				let upper = segment.to_uppercase();
				let rendered = if COMMON_INITIALISMS.contains(&upper.as_str()) {
					upper
				} else {
					capitalize(segment)
				};

				let lower = segment.to_lowercase();
				self.case_overrides.iter()
					.find(|case_override| case_override.to_lowercase() == lower)
					.map_or(rendered, |case_override| case_override.clone())
			})
			.collect()
	}

	/// The json tag name for a field: its words lowercased and joined by `_`.
	pub fn tag_name(&self, identifier: &str) -> String {
		self.split(identifier)
			.into_iter()
			.map(str::to_lowercase)
			.collect::<Vec<_>>()
			.join("_")
	}
}

//! Mapping of parsed signatures to Go types.
//!
//! The mapping is done by an ordered list of [`Rule`]s, tried one after the other for each node of the tree, after the
//! children of the node have been mapped. The order is:
//! 1. the type overrides from the [`MappingConfig`],
//! 2. the type blacklist,
//! 3. `scala.Option`,
//! 4. the built-in types,
//! 5. the classes being generated in the same run.
use std::fmt::{Display, Formatter};
use log::trace;
use crate::config::{KnownTypes, MappingConfig};
use crate::error::TypeError;
use crate::naming::simple_class_name;
use crate::signature::{GenericNode, TypeToken};

/// The token of `scala.Option`.
pub const OPTION: &str = "Lscala/Option<>;";

const BUILTIN_TYPES: &[(&str, &str)] = &[
	("Lscala/collection/immutable/List<>;", "[]%s"),
	("Lscala/collection/immutable/Map<>;", "map[%s]%s"),
	("Lscala/collection/immutable/Set<>;", "[]%s"),
	("Lscala/collection/Seq<>;", "[]%s"),

	("J", "int64"),
	("I", "int"),
	("Z", "bool"),

	// generic `Int`s are erased to `Object`
	("Ljava/lang/Object;", "int"),
	("Ljava/lang/String;", "string"),
	("Ljava/sql/Date;", "time.Time"),
	("Ljava/sql/Timestamp;", "time.Time"),
	("Lorg/joda/time/DateTime;", "time.Time"),
	("Lorg/joda/time/LocalDate;", "time.Time"),
	("Lscala/Enumeration$Value;", "string"),
	("Lscala/math/BigDecimal;", "decimal.Decimal"),
];

/// A type in Go syntax, like `int`, `*string`, `[]Foo` or `map[string]int`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoType(String);

impl GoType {
	pub fn new(s: impl Into<String>) -> GoType {
		GoType(s.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Slices and maps. These represent absence by being empty.
	pub fn is_collection(&self) -> bool {
		self.0.starts_with("[]") || self.0.starts_with("map[")
	}

	/// Pointers, which represent absence by being `nil`.
	pub fn is_nilable(&self) -> bool {
		self.0.starts_with('*')
	}

	pub fn pointer_to(&self) -> GoType {
		GoType(format!("*{}", self.0))
	}
}

impl Display for GoType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// The outcome of mapping a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	Mapped(GoType),
	/// The type (or one of its generic parameters) is blacklisted. The field should be left out.
	Skip,
	Fail(TypeError),
}

/// A target type with `%s` placeholders for the generic parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
	pub fn new(s: impl Into<String>) -> Template {
		Template(s.into())
	}

	fn placeholders(&self) -> usize {
		self.0.matches("%s").count()
	}

	/// Fills in the placeholders. A template without placeholders ignores the children.
	pub fn fill(&self, token: &TypeToken, children: &[GoType]) -> Result<GoType, TypeError> {
		let expected = self.placeholders();
		if expected == 0 {
			return Ok(GoType(self.0.clone()));
		}
		if expected != children.len() {
			return Err(TypeError::ParameterCount { token: token.to_string(), expected, got: children.len() });
		}

		let mut s = String::new();
		let mut children = children.iter();
		for (i, piece) in self.0.split("%s").enumerate() {
			if i > 0 {
				if let Some(child) = children.next() {
					s.push_str(child.as_str());
				}
			}
			s.push_str(piece);
		}
		Ok(GoType(s))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
	/// Matches the lowercased token.
	Override { signature: String, template: Template },
	/// Matches the token exactly.
	Blacklist { signature: String },
	/// `scala.Option` becomes a pointer, unless it wraps a collection.
	OptionWrapper,
	Builtin { signature: &'static str, template: Template },
	/// A class of the current run, referenced by its simple name.
	KnownClass,
}

impl Rule {
	fn apply(&self, token: &TypeToken, children: &[GoType], known: &KnownTypes) -> Option<Resolution> {
		match self {
			Rule::Override { signature, template } => {
				(token.as_str().to_lowercase() == *signature).then(|| into_resolution(template.fill(token, children)))
			},
			Rule::Blacklist { signature } => {
				(token.as_str() == signature).then_some(Resolution::Skip)
			},
			Rule::OptionWrapper => {
				(token.as_str() == OPTION).then(|| match children {
					[child] if child.is_collection() => Resolution::Mapped(child.clone()),
					[child] => Resolution::Mapped(child.pointer_to()),
					// no rule covers an `Option` with any other number of parameters
					_ => Resolution::Fail(TypeError::Unmappable { token: token.to_string() }),
				})
			},
			Rule::Builtin { signature, template } => {
				(token.as_str() == *signature).then(|| into_resolution(template.fill(token, children)))
			},
			Rule::KnownClass => {
				token.class_name()
					.filter(|name| known.contains(name))
					.map(|name| Resolution::Mapped(GoType::new(simple_class_name(&name))))
			},
		}
	}
}

fn into_resolution(result: Result<GoType, TypeError>) -> Resolution {
	match result {
		Ok(go_type) => Resolution::Mapped(go_type),
		Err(e) => Resolution::Fail(e),
	}
}

/// Maps signature trees to Go types.
#[derive(Debug, Clone)]
pub struct TypeResolver<'a> {
	rules: Vec<Rule>,
	known: &'a KnownTypes,
}

impl<'a> TypeResolver<'a> {
	pub fn new(config: &MappingConfig, known: &'a KnownTypes) -> TypeResolver<'a> {
		let overrides = config.overrides.iter()
			.map(|(signature, template)| Rule::Override {
				signature: signature.to_lowercase(),
				template: Template::new(template.as_str()),
			});
		let blacklist = config.blacklist_types.iter()
			.map(|signature| Rule::Blacklist { signature: signature.clone() });
		let builtins = BUILTIN_TYPES.iter()
			.map(|&(signature, template)| Rule::Builtin { signature, template: Template::new(template) });

		let rules = overrides
			.chain(blacklist)
			.chain(std::iter::once(Rule::OptionWrapper))
			.chain(builtins)
			.chain(std::iter::once(Rule::KnownClass))
			.collect();

		TypeResolver { rules, known }
	}

	/// Maps a tree, children first.
	pub fn resolve(&self, node: &GenericNode) -> Resolution {
		let mut children = Vec::with_capacity(node.children.len());
		for child in &node.children {
			match self.resolve(child) {
				Resolution::Mapped(go_type) => children.push(go_type),
				other => return other,
			}
		}

		for rule in &self.rules {
			if let Some(resolution) = rule.apply(&node.token, &children, self.known) {
				trace!("{} resolved by {rule:?} to {resolution:?}", node.token);
				return resolution;
			}
		}

		Resolution::Fail(TypeError::Unmappable { token: node.token.to_string() })
	}

	/// Parses and maps a descriptor or generic signature.
	pub fn resolve_signature(&self, signature: &str) -> Resolution {
		match GenericNode::parse(signature) {
			Ok(node) => self.resolve(&node),
			Err(e) => Resolution::Fail(e.into()),
		}
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::config::{KnownTypes, MappingConfig};
	use crate::error::TypeError;
	use crate::resolve::{GoType, Resolution, TypeResolver};
	use crate::signature::GenericNode;

	fn mapped(s: &str) -> Resolution {
		Resolution::Mapped(GoType::new(s))
	}

	fn resolve_with(config: &MappingConfig, signature: &str) -> Resolution {
		let known: KnownTypes = ["com.ua.Foo"].into_iter().collect();
		TypeResolver::new(config, &known).resolve_signature(signature)
	}

	fn resolve(signature: &str) -> Resolution {
		resolve_with(&MappingConfig::default(), signature)
	}

	#[test]
	fn builtins() {
		assert_eq!(resolve("I"), mapped("int"));
		assert_eq!(resolve("J"), mapped("int64"));
		assert_eq!(resolve("Z"), mapped("bool"));
		assert_eq!(resolve("Ljava/lang/String;"), mapped("string"));
		assert_eq!(resolve("Lorg/joda/time/DateTime;"), mapped("time.Time"));
		assert_eq!(resolve("Lscala/math/BigDecimal;"), mapped("decimal.Decimal"));
		assert_eq!(resolve("Lscala/collection/Seq<Ljava/lang/String;>;"), mapped("[]string"));
	}

	#[test]
	fn map_of_strings() {
		assert_eq!(
			resolve("Lscala/collection/immutable/Map<Ljava/lang/String;Ljava/lang/String;>;"),
			mapped("map[string]string"),
		);
	}

	#[test]
	fn option_of_collection_is_not_a_pointer() {
		assert_eq!(resolve("Lscala/Option<Lscala/collection/immutable/List<Ljava/lang/Object;>;>;"), mapped("[]int"));
		assert_eq!(
			resolve("Lscala/Option<Lscala/collection/immutable/Map<Ljava/lang/String;J>;>;"),
			mapped("map[string]int64"),
		);
	}

	#[test]
	fn option_of_value_is_a_pointer() {
		assert_eq!(resolve("Lscala/Option<Z>;"), mapped("*bool"));
		assert_eq!(resolve("Lscala/Option<Ljava/lang/String;>;"), mapped("*string"));

		let known = KnownTypes::new();
		let resolver = TypeResolver::new(&MappingConfig::default(), &known);
		let node = GenericNode::parametrized("Lscala/Option<>;", vec![GenericNode::leaf("Z")]);
		assert_eq!(resolver.resolve(&node), mapped("*bool"));
	}

	#[test]
	fn option_needs_one_parameter() {
		let known = KnownTypes::new();
		let resolver = TypeResolver::new(&MappingConfig::default(), &known);
		let node = GenericNode::parametrized("Lscala/Option<>;", vec![GenericNode::leaf("Z"), GenericNode::leaf("I")]);

		assert_eq!(
			resolver.resolve(&node),
			Resolution::Fail(TypeError::Unmappable { token: "Lscala/Option<>;".to_owned() }),
		);
	}

	#[test]
	fn known_classes() {
		assert_eq!(resolve("Lcom/ua/Foo;"), mapped("Foo"));
		assert_eq!(resolve("Lscala/collection/immutable/List<Lcom/ua/Foo;>;"), mapped("[]Foo"));
		assert_eq!(resolve("Lscala/Option<Lcom/ua/Foo;>;"), mapped("*Foo"));
	}

	#[test]
	fn unmappable_reports_token() {
		assert_eq!(
			resolve("Lcom/ua/Bar;"),
			Resolution::Fail(TypeError::Unmappable { token: "Lcom/ua/Bar;".to_owned() }),
		);
		// the innermost failing token is reported
		assert_eq!(
			resolve("Lscala/Option<Lscala/collection/immutable/List<Ljava/util/UUID;>;>;"),
			Resolution::Fail(TypeError::Unmappable { token: "Ljava/util/UUID;".to_owned() }),
		);
		assert_eq!(
			resolve("Lscala/collection/immutable/Vector<Ljava/lang/String;>;"),
			Resolution::Fail(TypeError::Unmappable { token: "Lscala/collection/immutable/Vector<>;".to_owned() }),
		);
	}

	#[test]
	fn malformed_signature_fails() {
		assert!(matches!(resolve("Lscala/Option<Ljava/lang/String;"), Resolution::Fail(TypeError::Malformed(_))));
	}

	#[test]
	fn overrides_win_over_builtins() {
		let config = MappingConfig::default()
			.with_override("Ljava/lang/Object;", "interface{}")
			.with_override("Lscala/collection/immutable/Map<>;", "Dict[%s, %s]");

		assert_eq!(resolve_with(&config, "Ljava/lang/Object;"), mapped("interface{}"));
		assert_eq!(
			resolve_with(&config, "Lscala/collection/immutable/Map<Ljava/lang/String;Ljava/lang/Object;>;"),
			mapped("Dict[string, interface{}]"),
		);
	}

	#[test]
	fn overrides_ignore_case() {
		let mut config = MappingConfig::default();
		config.overrides.insert("Ljava/util/UUID;".to_owned(), "uuid.UUID".to_owned());

		assert_eq!(resolve_with(&config, "Ljava/util/UUID;"), mapped("uuid.UUID"));
		assert_eq!(resolve_with(&config, "LJAVA/UTIL/uuid;"), mapped("uuid.UUID"));
	}

	#[test]
	fn override_without_placeholder_ignores_children() {
		let config = MappingConfig::default()
			.with_override("Lscala/collection/immutable/Vector<>;", "json.RawMessage");

		assert_eq!(resolve_with(&config, "Lscala/collection/immutable/Vector<Ljava/lang/String;>;"), mapped("json.RawMessage"));
	}

	#[test]
	fn override_with_wrong_placeholder_count() {
		let config = MappingConfig::default()
			.with_override("Lscala/collection/immutable/Vector<>;", "map[%s]%s");

		assert_eq!(
			resolve_with(&config, "Lscala/collection/immutable/Vector<Ljava/lang/String;>;"),
			Resolution::Fail(TypeError::ParameterCount {
				token: "Lscala/collection/immutable/Vector<>;".to_owned(),
				expected: 2,
				got: 1,
			}),
		);
	}

	#[test]
	fn blacklist() {
		let config = MappingConfig {
			blacklist_types: vec!["Lcom/ua/Secret;".to_owned(), "Lscala/Option<>;".to_owned()],
			..MappingConfig::default()
		};

		assert_eq!(resolve_with(&config, "Lcom/ua/Secret;"), Resolution::Skip);
		// blacklisting a type blacklists everything containing it
		assert_eq!(resolve_with(&config, "Lscala/collection/immutable/List<Lcom/ua/Secret;>;"), Resolution::Skip);
		// the blacklist is checked before the special handling of options
		assert_eq!(resolve_with(&config, "Lscala/Option<Ljava/lang/String;>;"), Resolution::Skip);
		// exact match only
		assert_eq!(
			resolve_with(&config, "Lcom/ua/secret;"),
			Resolution::Fail(TypeError::Unmappable { token: "Lcom/ua/secret;".to_owned() }),
		);
	}

	#[test]
	fn override_wins_over_blacklist() {
		let config = MappingConfig {
			blacklist_types: vec!["Lcom/ua/Secret;".to_owned()],
			..MappingConfig::default()
		}.with_override("Lcom/ua/Secret;", "string");

		assert_eq!(resolve_with(&config, "Lcom/ua/Secret;"), mapped("string"));
	}

	#[test]
	fn go_type_kinds() {
		assert!(GoType::new("[]int").is_collection());
		assert!(GoType::new("map[string]int").is_collection());
		assert!(!GoType::new("*int").is_collection());
		assert!(GoType::new("*int").is_nilable());
		assert_eq!(GoType::new("Foo").pointer_to(), GoType::new("*Foo"));
	}
}

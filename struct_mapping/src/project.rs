use std::fmt::{Display, Formatter};
use log::debug;
use crate::config::{KnownTypes, MappingConfig};
use crate::error::TypeError;
use crate::naming::Naming;
use crate::resolve::{GoType, Resolution, TypeResolver};
use crate::source::SourceField;

/// The json struct tag of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
	pub name: String,
	pub omit_empty: bool,
}

impl Display for Tag {
	/// Formats like `json:"name,omitempty"`.
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "json:\"{}", self.name)?;
		if self.omit_empty {
			f.write_str(",omitempty")?;
		}
		f.write_str("\"")
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedField {
	pub name: String,
	pub go_type: GoType,
	pub tag: Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	BlacklistedField,
	BlacklistedType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
	Field(ProjectedField),
	Skip(SkipReason),
}

/// Turns source fields into Go struct fields.
#[derive(Debug, Clone)]
pub struct FieldProjector<'a> {
	config: &'a MappingConfig,
	naming: Naming<'a>,
	resolver: TypeResolver<'a>,
}

impl<'a> FieldProjector<'a> {
	pub fn new(config: &'a MappingConfig, known: &'a KnownTypes) -> FieldProjector<'a> {
		FieldProjector {
			config,
			naming: Naming::new(config),
			resolver: TypeResolver::new(config, known),
		}
	}

	pub fn project(&self, field: &SourceField) -> Result<Projection, TypeError> {
		let name = self.naming.declaration_name(&field.name);
		if self.config.is_blacklisted_field(&name) {
			debug!("skipping blacklisted field {:?}", field.name);
			return Ok(Projection::Skip(SkipReason::BlacklistedField));
		}

		let go_type = match self.resolver.resolve_signature(field.type_signature()) {
			Resolution::Mapped(go_type) => go_type,
			Resolution::Skip => {
				debug!("skipping field {:?} of blacklisted type {:?}", field.name, field.type_signature());
				return Ok(Projection::Skip(SkipReason::BlacklistedType));
			},
			Resolution::Fail(e) => return Err(e),
		};

		let tag = Tag {
			name: self.naming.tag_name(&field.name),
			omit_empty: go_type.is_nilable(),
		};

		Ok(Projection::Field(ProjectedField { name, go_type, tag }))
	}
}

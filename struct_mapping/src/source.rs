//! The description of a compiled class, as handed over by whatever reads the class files.

pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_FINAL: u16 = 0x0010;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceField {
	pub name: String,
	pub access: u16,
	/// The plain field descriptor, like `Lscala/Option;`.
	pub descriptor: String,
	/// The generic signature, like `Lscala/Option<Ljava/lang/String;>;`, if the field has one.
	pub signature: Option<String>,
}

impl SourceField {
	/// The signature if present, since it carries the generic parameters the descriptor lacks, the descriptor otherwise.
	pub fn type_signature(&self) -> &str {
		self.signature.as_deref().unwrap_or(&self.descriptor)
	}

	/// The constructor parameters of a case class are stored in `private final` fields.
	pub fn is_private_final(&self) -> bool {
		const PRIVATE_FINAL: u16 = ACC_PRIVATE | ACC_FINAL;
		self.access & PRIVATE_FINAL == PRIVATE_FINAL
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceClass {
	/// The fully qualified name, `.` separated.
	pub name: String,
	/// The names of the class level attributes.
	pub attributes: Vec<String>,
	/// The fields, in class file order.
	pub fields: Vec<SourceField>,
}

impl SourceClass {
	pub fn has_attribute(&self, name: &str) -> bool {
		self.attributes.iter().any(|attribute| attribute == name)
	}
}

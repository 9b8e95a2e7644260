//! Writing Go source code.
use std::io::{self, Write};
use crate::generate::StructWriter;
use crate::project::ProjectedField;

/// Writes `type X struct` declarations.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use struct_mapping::generate::StructWriter;
/// use struct_mapping::go::GoStructWriter;
/// use struct_mapping::project::{ProjectedField, Tag};
/// use struct_mapping::resolve::GoType;
///
/// let mut writer = GoStructWriter::new(Vec::new());
/// writer.header("Account", "com.ua.model.Account").unwrap();
/// writer.field(&ProjectedField {
///     name: "Name".to_owned(),
///     go_type: GoType::new("string"),
///     tag: Tag { name: "name".to_owned(), omit_empty: false },
/// }).unwrap();
/// writer.footer().unwrap();
///
/// assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "\
/// // Account represents the Scala class com.ua.model.Account
/// type Account struct {
/// \tName string `json:\"name\"`
/// }
///
/// ");
/// ```
#[derive(Debug)]
pub struct GoStructWriter<W: Write> {
	inner: W,
	/// Written before the first declaration, then cleared.
	package: Option<String>,
}

impl<W: Write> GoStructWriter<W> {
	pub fn new(inner: W) -> GoStructWriter<W> {
		GoStructWriter { inner, package: None }
	}

	/// Makes the output start with a `package` clause.
	pub fn with_package(inner: W, package: impl Into<String>) -> GoStructWriter<W> {
		GoStructWriter { inner, package: Some(package.into()) }
	}

	pub fn into_inner(self) -> W {
		self.inner
	}
}

impl<W: Write> StructWriter for GoStructWriter<W> {
	fn header(&mut self, simple_name: &str, source_name: &str) -> io::Result<()> {
		if let Some(package) = self.package.take() {
			writeln!(self.inner, "package {package}")?;
			writeln!(self.inner)?;
		}
		writeln!(self.inner, "// {simple_name} represents the Scala class {source_name}")?;
		writeln!(self.inner, "type {simple_name} struct {{")
	}

	fn field(&mut self, field: &ProjectedField) -> io::Result<()> {
		writeln!(self.inner, "\t{} {} `{}`", field.name, field.go_type, field.tag)
	}

	fn footer(&mut self) -> io::Result<()> {
		writeln!(self.inner, "}}")?;
		writeln!(self.inner)?;
		self.inner.flush()
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::generate::StructWriter;
	use crate::go::GoStructWriter;
	use crate::project::{ProjectedField, Tag};
	use crate::resolve::GoType;

	#[test]
	fn package_clause_once() -> Result<()> {
		let mut writer = GoStructWriter::with_package(Vec::new(), "model");

		writer.header("A", "com.ua.A")?;
		writer.field(&ProjectedField {
			name: "Tags".to_owned(),
			go_type: GoType::new("[]string"),
			tag: Tag { name: "tags".to_owned(), omit_empty: false },
		})?;
		writer.footer()?;
		writer.header("B", "com.ua.B")?;
		writer.field(&ProjectedField {
			name: "Parent".to_owned(),
			go_type: GoType::new("*A"),
			tag: Tag { name: "parent".to_owned(), omit_empty: true },
		})?;
		writer.footer()?;

		let expected = "package model

// A represents the Scala class com.ua.A
type A struct {
	Tags []string `json:\"tags\"`
}

// B represents the Scala class com.ua.B
type B struct {
	Parent *A `json:\"parent,omitempty\"`
}

";
		assert_eq!(String::from_utf8(writer.into_inner())?, expected);
		Ok(())
	}

	#[test]
	fn empty_struct() -> Result<()> {
		let mut writer = GoStructWriter::new(Vec::new());
		writer.header("Empty", "Empty")?;
		writer.footer()?;

		assert_eq!(String::from_utf8(writer.into_inner())?, "// Empty represents the Scala class Empty\ntype Empty struct {\n}\n\n");
		Ok(())
	}
}

use std::io;
use log::{debug, info};
use crate::config::{KnownTypes, MappingConfig};
use crate::error::GenerateError;
use crate::naming::simple_class_name;
use crate::project::{FieldProjector, ProjectedField, Projection};
use crate::source::SourceClass;

/// Receives the declaration of one class: first the header, then the fields, then the footer.
pub trait StructWriter {
	/// `simple_name` is the name of the declared type, `source_name` the fully qualified name of the class.
	fn header(&mut self, simple_name: &str, source_name: &str) -> io::Result<()>;
	fn field(&mut self, field: &ProjectedField) -> io::Result<()>;
	fn footer(&mut self) -> io::Result<()>;
}

impl<T: StructWriter + ?Sized> StructWriter for &mut T {
	fn header(&mut self, simple_name: &str, source_name: &str) -> io::Result<()> {
		(**self).header(simple_name, source_name)
	}
	fn field(&mut self, field: &ProjectedField) -> io::Result<()> {
		(**self).field(field)
	}
	fn footer(&mut self) -> io::Result<()> {
		(**self).footer()
	}
}

#[derive(Debug, Clone)]
pub struct Generator<'a> {
	config: &'a MappingConfig,
	projector: FieldProjector<'a>,
}

impl<'a> Generator<'a> {
	pub fn new(config: &'a MappingConfig, known: &'a KnownTypes) -> Generator<'a> {
		Generator {
			config,
			projector: FieldProjector::new(config, known),
		}
	}

	/// Projects all eligible fields of a class, sorted by name. Skipped fields are left out.
	pub fn project_class(&self, class: &SourceClass) -> Result<Vec<ProjectedField>, GenerateError> {
		if !class.has_attribute(&self.config.marker_attribute) {
			return Err(GenerateError::MissingMarkerAttribute {
				class: class.name.clone(),
				marker: self.config.marker_attribute.clone(),
			});
		}

		let mut fields: Vec<_> = class.fields.iter()
			.filter(|field| field.is_private_final())
			.collect();
		fields.sort_by(|a, b| a.name.cmp(&b.name));

		let mut projected = Vec::with_capacity(fields.len());
		for field in fields {
			match self.projector.project(field) {
				Ok(Projection::Field(field)) => projected.push(field),
				Ok(Projection::Skip(reason)) => debug!("left out field {:?} of {}: {reason:?}", field.name, class.name),
				Err(source) => return Err(GenerateError::Field { field: field.name.clone(), source }),
			}
		}
		Ok(projected)
	}

	/// Writes the declaration of a class.
	///
	/// Nothing is written if any field fails.
	pub fn generate(&self, class: &SourceClass, mut writer: impl StructWriter) -> Result<(), GenerateError> {
		let fields = self.project_class(class)?;

		let simple_name = simple_class_name(&class.name);
		info!("generating {simple_name} with {} field(s) from {}", fields.len(), class.name);

		let write_error = |source| GenerateError::Write { class: class.name.clone(), source };
		writer.header(simple_name, &class.name).map_err(write_error)?;
		for field in &fields {
			writer.field(field).map_err(write_error)?;
		}
		writer.footer().map_err(write_error)
	}
}

#[cfg(test)]
mod testing {
	use std::io;
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::config::{KnownTypes, MappingConfig};
	use crate::error::{GenerateError, TypeError};
	use crate::generate::{Generator, StructWriter};
	use crate::project::ProjectedField;
	use crate::source::{ACC_FINAL, ACC_PRIVATE, SourceClass, SourceField};

	/// Records the calls, as strings.
	#[derive(Default)]
	struct Recorder(Vec<String>);

	impl StructWriter for Recorder {
		fn header(&mut self, simple_name: &str, source_name: &str) -> io::Result<()> {
			self.0.push(format!("header {simple_name} {source_name}"));
			Ok(())
		}
		fn field(&mut self, field: &ProjectedField) -> io::Result<()> {
			self.0.push(format!("field {} {} {}", field.name, field.go_type, field.tag));
			Ok(())
		}
		fn footer(&mut self) -> io::Result<()> {
			self.0.push("footer".to_owned());
			Ok(())
		}
	}

	struct Broken;

	impl StructWriter for Broken {
		fn header(&mut self, _: &str, _: &str) -> io::Result<()> {
			Ok(())
		}
		fn field(&mut self, _: &ProjectedField) -> io::Result<()> {
			Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
		}
		fn footer(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	fn field(access: u16, name: &str, descriptor: &str) -> SourceField {
		SourceField { name: name.to_owned(), access, descriptor: descriptor.to_owned(), signature: None }
	}

	fn class(fields: Vec<SourceField>) -> SourceClass {
		SourceClass {
			name: "com.ua.model.Account".to_owned(),
			attributes: vec!["ScalaSig".to_owned()],
			fields,
		}
	}

	const PF: u16 = ACC_PRIVATE | ACC_FINAL;

	#[test]
	fn sorted_and_filtered() -> Result<()> {
		let config = MappingConfig::default();
		let known = KnownTypes::new();
		let generator = Generator::new(&config, &known);

		let class = class(vec![
			field(PF, "name", "Ljava/lang/String;"),
			field(PF, "active", "Z"),
			// only private final fields are eligible
			field(ACC_PRIVATE, "cache", "Ljava/util/UUID;"),
			field(ACC_FINAL, "MODULE$", "Ljava/util/UUID;"),
			field(PF | 0x0008, "balance", "J"),
		]);

		let mut recorder = Recorder::default();
		generator.generate(&class, &mut recorder)?;

		assert_eq!(recorder.0, vec![
			"header Account com.ua.model.Account",
			"field Active bool json:\"active\"",
			"field Balance int64 json:\"balance\"",
			"field Name string json:\"name\"",
			"footer",
		]);
		Ok(())
	}

	#[test]
	fn missing_marker() {
		let config = MappingConfig::default();
		let known = KnownTypes::new();
		let generator = Generator::new(&config, &known);

		let class = SourceClass {
			attributes: vec!["SourceFile".to_owned()],
			..class(vec![field(PF, "name", "Ljava/lang/String;")])
		};

		let mut recorder = Recorder::default();
		let result = generator.generate(&class, &mut recorder);

		assert!(matches!(
			result,
			Err(GenerateError::MissingMarkerAttribute { ref class, ref marker }) if class == "com.ua.model.Account" && marker == "ScalaSig"
		));
		assert!(recorder.0.is_empty());
	}

	#[test]
	fn failing_field_writes_nothing() {
		let config = MappingConfig::default();
		let known = KnownTypes::new();
		let generator = Generator::new(&config, &known);

		let class = class(vec![
			field(PF, "active", "Z"),
			field(PF, "id", "Ljava/util/UUID;"),
		]);

		let mut recorder = Recorder::default();
		match generator.generate(&class, &mut recorder) {
			Err(GenerateError::Field { field, source }) => {
				assert_eq!(field, "id");
				assert_eq!(source, TypeError::Unmappable { token: "Ljava/util/UUID;".to_owned() });
			},
			other => panic!("expected a field error, got {other:?}"),
		}
		assert!(recorder.0.is_empty());
	}

	#[test]
	fn write_error() {
		let config = MappingConfig::default();
		let known = KnownTypes::new();
		let generator = Generator::new(&config, &known);

		let class = class(vec![field(PF, "active", "Z")]);

		let result = generator.generate(&class, Broken);
		assert!(matches!(result, Err(GenerateError::Write { ref class, .. }) if class == "com.ua.model.Account"));
	}

	#[test]
	fn custom_marker() -> Result<()> {
		let config = MappingConfig {
			marker_attribute: "ScalaInlineInfo".to_owned(),
			..MappingConfig::default()
		};
		let known = KnownTypes::new();
		let generator = Generator::new(&config, &known);

		let class = SourceClass {
			attributes: vec!["ScalaInlineInfo".to_owned()],
			..class(vec![field(PF, "active", "Z")])
		};
		assert_eq!(generator.project_class(&class)?.len(), 1);
		Ok(())
	}
}

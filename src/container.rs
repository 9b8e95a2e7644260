use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use log::{debug, trace};
use walkdir::WalkDir;
use zip::ZipArchive;
use class_fields::ClassFile;
use struct_mapping::{SourceClass, SourceField};

const CLASS_SUFFIX: &str = ".class";
const META_INF: &str = "META-INF/";

/// Something holding class files, like a jar or a directory of `.class` files.
pub(crate) trait ClassContainer {
	/// The fully qualified, `.` separated, names of all classes, sorted.
	fn class_names(&mut self) -> Result<Vec<String>>;

	/// Reads a single class, by its fully qualified name.
	fn read_class(&mut self, name: &str) -> Result<SourceClass>;
}

/// `com.ua.Foo` to `com/ua/Foo.class`
fn entry_name(class_name: &str) -> String {
	format!("{}{CLASS_SUFFIX}", class_name.replace('.', "/"))
}

fn to_source(class: ClassFile) -> SourceClass {
	SourceClass {
		name: class.name.replace('/', "."),
		attributes: class.attributes.into_iter()
			.map(|attribute| attribute.name)
			.collect(),
		fields: class.fields.into_iter()
			.map(|field| SourceField {
				name: field.name,
				access: field.access,
				descriptor: field.descriptor,
				signature: field.signature,
			})
			.collect(),
	}
}

pub(crate) struct JarContainer<R: Read + Seek> {
	name: String,
	zip: ZipArchive<R>,
}

impl<R: Read + Seek> Debug for JarContainer<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JarContainer").field("name", &self.name).finish_non_exhaustive()
	}
}

impl JarContainer<BufReader<File>> {
	pub(crate) fn open(path: &Path) -> Result<JarContainer<BufReader<File>>> {
		let file = File::open(path)
			.with_context(|| anyhow!("failed to open jar {path:?}"))?;
		JarContainer::new(path.display().to_string(), BufReader::new(file))
	}
}

impl<R: Read + Seek> JarContainer<R> {
	pub(crate) fn new(name: String, reader: R) -> Result<JarContainer<R>> {
		let zip = ZipArchive::new(reader)
			.with_context(|| anyhow!("failed to read zip archive of {name}"))?;
		debug!("opened jar {name} with {} entries", zip.len());
		Ok(JarContainer { name, zip })
	}
}

impl<R: Read + Seek> ClassContainer for JarContainer<R> {
	fn class_names(&mut self) -> Result<Vec<String>> {
		let mut names: Vec<String> = self.zip.file_names()
			// multi release jars keep copies of classes in `META-INF/versions/<n>/`
			.filter(|name| !name.starts_with(META_INF))
			.filter_map(|name| name.strip_suffix(CLASS_SUFFIX))
			.map(|name| name.replace('/', "."))
			.collect();
		names.sort();
		Ok(names)
	}

	fn read_class(&mut self, name: &str) -> Result<SourceClass> {
		let entry_name = entry_name(name);
		trace!("reading {entry_name} from {}", self.name);

		let mut entry = self.zip.by_name(&entry_name)
			.with_context(|| anyhow!("no entry {entry_name:?} in jar {}", self.name))?;
		let class = class_fields::read_class(&mut entry)
			.with_context(|| anyhow!("failed to read class {name} from jar {}", self.name))?;

		Ok(to_source(class))
	}
}

#[derive(Debug)]
pub(crate) struct DirContainer {
	root: PathBuf,
}

impl DirContainer {
	pub(crate) fn new(root: PathBuf) -> DirContainer {
		debug!("reading classes from directory {root:?}");
		DirContainer { root }
	}
}

impl ClassContainer for DirContainer {
	fn class_names(&mut self) -> Result<Vec<String>> {
		let mut names = Vec::new();
		for entry in WalkDir::new(&self.root).follow_links(false) {
			let entry = entry
				.with_context(|| anyhow!("failed to walk directory {:?}", self.root))?;
			if !entry.file_type().is_file() {
				continue;
			}

			let relative = entry.path().strip_prefix(&self.root)
				.with_context(|| anyhow!("{:?} is not inside of {:?}", entry.path(), self.root))?;
			let Some(relative) = relative.to_str() else {
				continue;
			};
			if let Some(name) = relative.strip_suffix(CLASS_SUFFIX) {
				names.push(name.replace(std::path::MAIN_SEPARATOR, "."));
			}
		}
		names.sort();
		Ok(names)
	}

	fn read_class(&mut self, name: &str) -> Result<SourceClass> {
		let path = self.root.join(entry_name(name));
		trace!("reading {path:?}");

		let file = File::open(&path)
			.with_context(|| anyhow!("failed to open class file {path:?}"))?;
		let class = class_fields::read_class(&mut BufReader::new(file))
			.with_context(|| anyhow!("failed to read class {name} from {path:?}"))?;

		Ok(to_source(class))
	}
}

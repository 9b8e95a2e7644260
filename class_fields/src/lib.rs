//! Reads (and writes) the parts of a [Java Class File](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html)
//! that describe the shape of a data class: its name, its class level attributes and its fields.
//!
//! Methods are skipped entirely. Attributes are kept as raw bytes, with the exception of the
//! `Signature` attribute of fields, which is resolved against the constant pool.
//!
//! ```
//! # use pretty_assertions::assert_eq;
//! use class_fields::{Attribute, ClassFile, Field, flags};
//!
//! let class = ClassFile {
//!     access: flags::ACC_PUBLIC,
//!     name: "org/example/Account".to_owned(),
//!     super_class: Some("java/lang/Object".to_owned()),
//!     interfaces: vec![],
//!     fields: vec![
//!         Field {
//!             access: flags::ACC_PRIVATE | flags::ACC_FINAL,
//!             name: "accountId".to_owned(),
//!             descriptor: "J".to_owned(),
//!             signature: None,
//!             attributes: vec![],
//!         },
//!     ],
//!     attributes: vec![
//!         Attribute { name: "ScalaSig".to_owned(), info: vec![5, 0, 0] },
//!     ],
//! };
//!
//! let bytes = class.to_bytes().unwrap();
//! let read = class_fields::read_class(&mut bytes.as_slice()).unwrap();
//!
//! assert_eq!(read, class);
//! assert!(read.has_attribute("ScalaSig"));
//! ```
use std::io::Read;
use anyhow::{anyhow, bail, Context, Result};
use crate::pool::Pool;

mod pool;
mod writer;

pub const MAGIC: u32 = 0xCAFEBABE;

pub mod flags {
	pub const ACC_PUBLIC: u16       = 0x0001; // class, field, method, inner class
	pub const ACC_PRIVATE: u16      = 0x0002; // field, method, inner class
	pub const ACC_PROTECTED: u16    = 0x0004; // field, method, inner class
	pub const ACC_STATIC: u16       = 0x0008; // field, method, inner class
	pub const ACC_FINAL: u16        = 0x0010; // class, field, method, inner class, parameter
	pub const ACC_VOLATILE: u16     = 0x0040; // field
	pub const ACC_TRANSIENT: u16    = 0x0080; // field
	pub const ACC_SYNTHETIC: u16    = 0x1000; // class, field, method, inner class, parameter, module
	pub const ACC_ENUM: u16         = 0x4000; // class, field, inner class
}

/// The name of the attribute carrying the generic signature of a field.
pub const SIGNATURE: &str = "Signature";

/// A class file, reduced to the parts needed for describing its fields.
///
/// Class names are in their internal form, using `/` as package separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
	pub access: u16,
	pub name: String,
	pub super_class: Option<String>,
	pub interfaces: Vec<String>,
	pub fields: Vec<Field>,
	/// The class level attributes, in the order they appear in the class file.
	pub attributes: Vec<Attribute>,
}

impl ClassFile {
	/// Checks if the class carries an attribute with the given name.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.attributes.iter().any(|attribute| attribute.name == name)
	}

	/// Converts the class file to binary representation.
	///
	/// Methods aren't part of [`ClassFile`], so the written class file never contains any.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		writer::write(self)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	pub access: u16,
	pub name: String,
	pub descriptor: String,
	/// The contents of the `Signature` attribute, if present.
	pub signature: Option<String>,
	/// All other attributes.
	pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name: String,
	pub info: Vec<u8>,
}

pub(crate) trait ClassRead {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]>;
	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>>;

	fn read_u8(&mut self) -> Result<u8> {
		Ok(u8::from_be_bytes(self.read_n().context("couldn't read u8, perhaps the data's end is reached?")?))
	}
	fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_n().context("couldn't read u16, perhaps the data's end is reached?")?))
	}
	fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_n().context("couldn't read u32, perhaps the data's end is reached?")?))
	}
	fn read_u16_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u16()? as usize)
	}
	/// Reads over `n` bytes, without buffering them.
	fn skip(&mut self, n: usize) -> Result<()>;
	fn read_vec<T, S, E>(&mut self, get_size: S, mut get_element: E) -> Result<Vec<T>>
		where
			S: FnOnce(&mut Self) -> Result<usize>,
			E: FnMut(&mut Self) -> Result<T>
	{
		let size = get_size(self)?;
		let mut vec = Vec::with_capacity(size);
		for _ in 0..size {
			vec.push(get_element(self)?);
		}
		Ok(vec)
	}
}

impl<T: Read> ClassRead for T {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		self.read_exact(&mut buf)?;
		Ok(buf)
	}

	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>> {
		// the size comes from the data itself, so let the buffer only grow as far as there actually is data
		let mut vec = Vec::new();
		self.by_ref().take(size as u64).read_to_end(&mut vec)?;
		if vec.len() != size {
			bail!("couldn't read {size} bytes, the data's end is reached after {} bytes", vec.len());
		}
		Ok(vec)
	}

	fn skip(&mut self, n: usize) -> Result<()> {
		let skipped = std::io::copy(&mut self.by_ref().take(n as u64), &mut std::io::sink())?;
		if skipped != n as u64 {
			bail!("couldn't skip {n} bytes, the data's end is reached after {skipped} bytes");
		}
		Ok(())
	}
}

/// Reads a single class file from the reader.
///
/// Only the constant pool, the header, the fields and the class attributes are interpreted. Methods are skipped.
pub fn read_class(reader: &mut impl Read) -> Result<ClassFile> {
	let magic = reader.read_u32()?;
	if magic != MAGIC {
		bail!("wrong magic: got {magic:#x}, expected 0xCAFEBABE");
	}

	let _minor = reader.read_u16()?;
	let _major = reader.read_u16()?;

	let pool = Pool::read(reader).context("failed to read constant pool")?;

	let access = reader.read_u16()?;
	let name = pool.get_class(reader.read_u16()?)
		.context("failed to read this class")?;
	let super_class = pool.get_optional(reader.read_u16()?, Pool::get_class)
		.with_context(|| anyhow!("failed to read super class of {name:?}"))?;
	let interfaces = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| pool.get_class(r.read_u16()?)
	).with_context(|| anyhow!("failed to read interfaces of {name:?}"))?;

	let fields = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| read_field(r, &pool)
	).with_context(|| anyhow!("failed to read fields of {name:?}"))?;

	// Methods have the same structure as fields, but we're not interested in them.
	for _ in 0..reader.read_u16()? {
		reader.skip(2 + 2 + 2)?;
		skip_attributes(reader)?;
	}

	let attributes = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| read_attribute(r, &pool)
	).with_context(|| anyhow!("failed to read attributes of {name:?}"))?;

	Ok(ClassFile { access, name, super_class, interfaces, fields, attributes })
}

fn read_field(reader: &mut impl ClassRead, pool: &Pool) -> Result<Field> {
	let access = reader.read_u16()?;
	let name = pool.get_utf8(reader.read_u16()?)?;
	let descriptor = pool.get_utf8(reader.read_u16()?)
		.with_context(|| anyhow!("failed to read descriptor of field {name:?}"))?;

	let mut signature = None;
	let mut attributes = Vec::new();
	for _ in 0..reader.read_u16()? {
		let attribute = read_attribute(reader, pool)
			.with_context(|| anyhow!("failed to read attribute of field {name:?}"))?;

		if attribute.name == SIGNATURE {
			let index = match attribute.info.as_slice() {
				&[a, b] => u16::from_be_bytes([a, b]),
				info => bail!("`Signature` attribute of field {name:?} must have length 2, got {}", info.len()),
			};
			if signature.is_some() {
				bail!("field {name:?} has more than one `Signature` attribute");
			}
			signature = Some(pool.get_utf8(index)?);
		} else {
			attributes.push(attribute);
		}
	}

	Ok(Field { access, name, descriptor, signature, attributes })
}

fn read_attribute(reader: &mut impl ClassRead, pool: &Pool) -> Result<Attribute> {
	let name = pool.get_utf8(reader.read_u16()?)?;
	let length = reader.read_u32()? as usize;
	let info = reader.read_u8_vec(length)
		.with_context(|| anyhow!("failed to read contents of attribute {name:?}"))?;
	Ok(Attribute { name, info })
}

/// Skips the `attributes_count` and `attributes` items of the structs.
fn skip_attributes(reader: &mut impl ClassRead) -> Result<()> {
	let attributes_count = reader.read_u16()?;

	for _ in 0..attributes_count {
		let _attribute_name_index = reader.read_u16()?;
		let attribute_length = reader.read_u32()?;

		reader.skip(attribute_length as usize)?;
	}

	Ok(())
}

use std::collections::HashMap;
use anyhow::{anyhow, Context, Result};
use java_string::JavaStr;
use crate::{Attribute, ClassFile, Field, MAGIC, SIGNATURE};
use crate::pool::{CLASS, UTF8};

/// A constant pool under construction, deduplicating equal entries.
struct PoolWrite<'a> {
	entries: Vec<PoolEntry<'a>>,
	indices: HashMap<PoolEntry<'a>, u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PoolEntry<'a> {
	Utf8 { string: &'a str },
	Class { name_index: u16 },
}

impl<'a> PoolWrite<'a> {
	fn new() -> PoolWrite<'a> {
		PoolWrite { entries: Vec::new(), indices: HashMap::new() }
	}

	fn put(&mut self, entry: PoolEntry<'a>) -> Result<u16> {
		if let Some(&index) = self.indices.get(&entry) {
			return Ok(index);
		}
		// the constant pool indices start at 1, not at 0
		let index = u16::try_from(self.entries.len() + 1)
			.ok()
			.filter(|&index| index < u16::MAX)
			.ok_or_else(|| anyhow!("too many constant pool entries"))?;
		self.entries.push(entry.clone());
		self.indices.insert(entry, index);
		Ok(index)
	}

	fn put_utf8(&mut self, string: &'a str) -> Result<u16> {
		self.put(PoolEntry::Utf8 { string })
	}

	fn put_class(&mut self, name: &'a str) -> Result<u16> {
		let name_index = self.put_utf8(name)?;
		self.put(PoolEntry::Class { name_index })
	}

	fn put_optional(&mut self, value: Option<&'a String>, f: impl FnOnce(&mut Self, &'a str) -> Result<u16>) -> Result<u16> {
		value.map_or(Ok(0), |value| f(self, value.as_str()))
	}

	fn write(&self, out: &mut Vec<u8>) -> Result<()> {
		write_usize_as_u16(out, self.entries.len() + 1)?;
		for entry in &self.entries {
			match *entry {
				PoolEntry::Utf8 { string } => {
					let bytes = JavaStr::from_str(string).to_modified_utf8();
					out.push(UTF8);
					write_usize_as_u16(out, bytes.len())
						.with_context(|| anyhow!("string too long for the constant pool: {string:?}"))?;
					out.extend_from_slice(&bytes);
				},
				PoolEntry::Class { name_index } => {
					out.push(CLASS);
					out.extend_from_slice(&name_index.to_be_bytes());
				},
			}
		}
		Ok(())
	}
}

fn write_usize_as_u16(out: &mut Vec<u8>, value: usize) -> Result<()> {
	let value = u16::try_from(value)
		.with_context(|| anyhow!("value {value} doesn't fit into u16"))?;
	out.extend_from_slice(&value.to_be_bytes());
	Ok(())
}

fn write_attribute<'a>(out: &mut Vec<u8>, pool: &mut PoolWrite<'a>, name: &'a str, info: &[u8]) -> Result<()> {
	out.extend_from_slice(&pool.put_utf8(name)?.to_be_bytes());
	let length = u32::try_from(info.len())
		.with_context(|| anyhow!("attribute {name:?} is too long"))?;
	out.extend_from_slice(&length.to_be_bytes());
	out.extend_from_slice(info);
	Ok(())
}

fn write_attributes<'a>(out: &mut Vec<u8>, pool: &mut PoolWrite<'a>, attributes: &'a [Attribute]) -> Result<()> {
	write_usize_as_u16(out, attributes.len())?;
	for attribute in attributes {
		write_attribute(out, pool, &attribute.name, &attribute.info)?;
	}
	Ok(())
}

fn write_field<'a>(out: &mut Vec<u8>, pool: &mut PoolWrite<'a>, field: &'a Field) -> Result<()> {
	out.extend_from_slice(&field.access.to_be_bytes());
	out.extend_from_slice(&pool.put_utf8(&field.name)?.to_be_bytes());
	out.extend_from_slice(&pool.put_utf8(&field.descriptor)?.to_be_bytes());

	let count = field.attributes.len() + usize::from(field.signature.is_some());
	write_usize_as_u16(out, count)?;
	if let Some(signature) = &field.signature {
		let index = pool.put_utf8(signature)?;
		write_attribute(out, pool, SIGNATURE, &index.to_be_bytes())?;
	}
	for attribute in &field.attributes {
		write_attribute(out, pool, &attribute.name, &attribute.info)?;
	}
	Ok(())
}

/// Writes the class as a java 8 class file without any methods.
pub(crate) fn write(class: &ClassFile) -> Result<Vec<u8>> {
	let mut pool = PoolWrite::new();
	// The buffer for everything after the constant pool.
	let mut body = Vec::new();

	body.extend_from_slice(&class.access.to_be_bytes());
	body.extend_from_slice(&pool.put_class(&class.name)?.to_be_bytes());
	body.extend_from_slice(&pool.put_optional(class.super_class.as_ref(), PoolWrite::put_class)?.to_be_bytes());

	write_usize_as_u16(&mut body, class.interfaces.len())?;
	for interface in &class.interfaces {
		body.extend_from_slice(&pool.put_class(interface)?.to_be_bytes());
	}

	write_usize_as_u16(&mut body, class.fields.len())
		.with_context(|| anyhow!("too many fields in class {:?}", class.name))?;
	for field in &class.fields {
		write_field(&mut body, &mut pool, field)
			.with_context(|| anyhow!("failed to write field {:?} of class {:?}", field.name, class.name))?;
	}

	// methods_count
	body.extend_from_slice(&0u16.to_be_bytes());

	write_attributes(&mut body, &mut pool, &class.attributes)
		.with_context(|| anyhow!("failed to write attributes of class {:?}", class.name))?;

	let mut out = Vec::with_capacity(10 + body.len());
	out.extend_from_slice(&MAGIC.to_be_bytes());
	out.extend_from_slice(&0u16.to_be_bytes()); // minor
	out.extend_from_slice(&52u16.to_be_bytes()); // major, java 8
	pool.write(&mut out)?;
	out.extend_from_slice(&body);

	Ok(out)
}

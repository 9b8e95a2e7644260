use anyhow::{anyhow, bail, Context, Result};
use java_string::JavaString;
use crate::ClassRead;

pub(crate) const UTF8: u8 = 1;
pub(crate) const INTEGER: u8 = 3;
pub(crate) const FLOAT: u8 = 4;
pub(crate) const LONG: u8 = 5;
pub(crate) const DOUBLE: u8 = 6;
pub(crate) const CLASS: u8 = 7;
pub(crate) const STRING: u8 = 8;
pub(crate) const FIELD_REF: u8 = 9;
pub(crate) const METHOD_REF: u8 = 10;
pub(crate) const INTERFACE_METHOD_REF: u8 = 11;
pub(crate) const NAME_AND_TYPE: u8 = 12;
pub(crate) const METHOD_HANDLE: u8 = 15;
pub(crate) const METHOD_TYPE: u8 = 16;
pub(crate) const DYNAMIC: u8 = 17;
pub(crate) const INVOKE_DYNAMIC: u8 = 18;
pub(crate) const MODULE: u8 = 19;
pub(crate) const PACKAGE: u8 = 20;

/// The pool entries we care about. Everything else is read over and stored as [`PoolEntry::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum PoolEntry {
	Utf8 { string: String },
	Class { name_index: u16 },
	Other { tag: u8 },
}

pub(crate) struct Pool {
	/// We store a [`None`] for the zero index, as well as for the upper indices of long and double entries.
	inner: Vec<Option<PoolEntry>>,
}

impl Pool {
	/// Reads the constant pool from the specified reader. The first thing read is an `u16` specifying the size of the constant pool.
	pub(crate) fn read(reader: &mut impl ClassRead) -> Result<Pool> {
		let mut pool = vec![None];

		let constant_pool_count = reader.read_u16_as_usize()?;
		while pool.len() < constant_pool_count {
			let index = pool.len();
			let tag = reader.read_u8()?;
			match tag {
				UTF8 => {
					let length = reader.read_u16_as_usize()?;
					let vec = reader.read_u8_vec(length)?;
					let string = from_modified_utf8(vec)
						.with_context(|| anyhow!("invalid `Utf8` pool entry at index {index}"))?;
					pool.push(Some(PoolEntry::Utf8 { string }));
				},
				CLASS => {
					let name_index = reader.read_u16()?;
					pool.push(Some(PoolEntry::Class { name_index }));
				},
				LONG | DOUBLE => {
					reader.skip(8)?;
					pool.push(Some(PoolEntry::Other { tag }));
					pool.push(None); // long and double take up two pool slots
				},
				INTEGER | FLOAT | FIELD_REF | METHOD_REF | INTERFACE_METHOD_REF | NAME_AND_TYPE | DYNAMIC | INVOKE_DYNAMIC => {
					reader.skip(4)?;
					pool.push(Some(PoolEntry::Other { tag }));
				},
				METHOD_HANDLE => {
					reader.skip(3)?;
					pool.push(Some(PoolEntry::Other { tag }));
				},
				STRING | METHOD_TYPE | MODULE | PACKAGE => {
					reader.skip(2)?;
					pool.push(Some(PoolEntry::Other { tag }));
				},
				tag => bail!("unknown constant pool tag {tag} at index {index}"),
			}
		}

		Ok(Pool { inner: pool })
	}

	fn get(&self, index: u16) -> Result<&PoolEntry> {
		self.inner.get(index as usize)
			.and_then(|entry| entry.as_ref())
			.ok_or_else(|| anyhow!("invalid constant pool index {index}"))
	}

	pub(crate) fn get_utf8(&self, index: u16) -> Result<String> {
		match self.get(index)? {
			PoolEntry::Utf8 { string } => Ok(string.clone()),
			entry => bail!("pool entry at {index} not `Utf8`: {entry:?}"),
		}
	}

	pub(crate) fn get_class(&self, index: u16) -> Result<String> {
		match *self.get(index)? {
			PoolEntry::Class { name_index } => self.get_utf8(name_index)
				.with_context(|| anyhow!("while reading name of `Class` pool entry at {index}")),
			ref entry => bail!("pool entry at {index} not `Class`: {entry:?}"),
		}
	}

	/// Index zero means absent, every other index must be valid.
	pub(crate) fn get_optional<T>(&self, index: u16, f: impl FnOnce(&Pool, u16) -> Result<T>) -> Result<Option<T>> {
		if index == 0 {
			Ok(None)
		} else {
			f(self, index).map(Some)
		}
	}
}

/// Decodes the modified UTF-8 used by class files, refusing strings that aren't valid (regular) unicode.
pub(crate) fn from_modified_utf8(vec: Vec<u8>) -> Result<String> {
	let string = JavaString::from_modified_utf8(vec)
		.with_context(|| anyhow!("invalid java utf8 contents"))?;
	string.as_str()
		.map(|s| s.to_owned())
		.map_err(|_| anyhow!("java string {string:?} contains unpaired surrogates"))
}

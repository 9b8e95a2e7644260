//! Parsing of generic signatures into trees of [`GenericNode`]s.
//!
//! Only the part of the [grammar](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.7.9.1) needed for
//! (nested) parametrized class types is understood: a parametrized type `Lname<...>;` holds a list of parameters, each of which
//! ends with its own `;` (or is a single primitive code).
use std::fmt::{Display, Formatter};
use crate::error::MalformedSignature;

const PRIMITIVE_CODES: &[u8] = b"BCDFIJSZ";

/// A raw type signature fragment.
///
/// Either a primitive code like `I`, a class type like `Ljava/lang/String;`, or the head of a parametrized class type
/// with the parameters removed, like `Lscala/Option<>;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeToken(String);

impl TypeToken {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns `true` for a token like `Lscala/Option<>;`.
	pub fn is_parametrized(&self) -> bool {
		self.0.ends_with("<>;")
	}

	pub fn is_primitive(&self) -> bool {
		matches!(self.0.as_bytes(), [code] if PRIMITIVE_CODES.contains(code))
	}

	/// The fully qualified name, with `.` as separator, of a non-parametrized class type.
	///
	/// ```
	/// use struct_mapping::signature::TypeToken;
	///
	/// assert_eq!(TypeToken::from("Lcom/ua/Foo;").class_name(), Some("com.ua.Foo".to_owned()));
	/// assert_eq!(TypeToken::from("Lscala/Option<>;").class_name(), None);
	/// assert_eq!(TypeToken::from("J").class_name(), None);
	/// ```
	pub fn class_name(&self) -> Option<String> {
		if self.is_parametrized() {
			return None;
		}
		self.0.strip_prefix('L')
			.and_then(|s| s.strip_suffix(';'))
			.map(|s| s.replace('/', "."))
	}
}

impl From<&str> for TypeToken {
	fn from(value: &str) -> Self {
		TypeToken(value.to_owned())
	}
}

impl Display for TypeToken {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// A node of a parsed signature.
///
/// A node has children if and only if its token is parametrized. The children are in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericNode {
	pub token: TypeToken,
	pub children: Vec<GenericNode>,
}

impl GenericNode {
	pub fn leaf(token: &str) -> GenericNode {
		GenericNode { token: token.into(), children: Vec::new() }
	}

	/// Creates a node from a parametrized token like `Lscala/Option<>;` and its parameters.
	pub fn parametrized(token: &str, children: Vec<GenericNode>) -> GenericNode {
		GenericNode { token: token.into(), children }
	}

	/// Parses a type descriptor or generic signature.
	///
	/// The inverse of this function is [`GenericNode::to_signature`].
	///
	/// # Examples
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use struct_mapping::signature::GenericNode;
	///
	/// assert_eq!(
	///     GenericNode::parse("Ljava/lang/String;").unwrap(),
	///     GenericNode::leaf("Ljava/lang/String;"),
	/// );
	/// assert_eq!(
	///     GenericNode::parse("Lscala/Option<Ljava/lang/String;>;").unwrap(),
	///     GenericNode::parametrized("Lscala/Option<>;", vec![
	///         GenericNode::leaf("Ljava/lang/String;"),
	///     ]),
	/// );
	/// ```
	pub fn parse(signature: &str) -> Result<GenericNode, MalformedSignature> {
		let Some(open) = signature.find('<') else {
			if signature.is_empty() {
				return Err(MalformedSignature::new(signature, "empty signature"));
			}
			if signature.contains('>') {
				return Err(MalformedSignature::new(signature, "unmatched `>`"));
			}
			return Ok(GenericNode::leaf(signature));
		};

		let (head, rest) = signature.split_at(open + 1);
		let Some(inner) = rest.strip_suffix(">;") else {
			return Err(MalformedSignature::new(signature, "parametrized type doesn't end with `>;`"));
		};

		let children = split_parameters(signature, inner)?
			.into_iter()
			.map(GenericNode::parse)
			.collect::<Result<Vec<_>, _>>()?;

		Ok(GenericNode {
			token: TypeToken(format!("{head}>;")),
			children,
		})
	}

	/// Writes the tree back into a signature.
	///
	/// The inverse of this function is [`GenericNode::parse`].
	pub fn to_signature(&self) -> String {
		let mut s = String::new();
		self.write_signature(&mut s);
		s
	}

	fn write_signature(&self, s: &mut String) {
		match self.token.as_str().strip_suffix(">;") {
			Some(head) if !self.children.is_empty() => {
				s.push_str(head);
				for child in &self.children {
					child.write_signature(s);
				}
				s.push_str(">;");
			},
			_ => s.push_str(self.token.as_str()),
		}
	}
}

/// Splits the text between the `<` and `>;` of a parametrized type into its parameters.
///
/// A `;` ends a parameter only if it's not nested inside another pair of angle brackets. A primitive code, possibly
/// preceded by array dimensions, forms a parameter on its own.
fn split_parameters<'a>(signature: &str, inner: &'a str) -> Result<Vec<&'a str>, MalformedSignature> {
	let mut parameters = Vec::new();
	let mut depth: usize = 0;
	let mut start = 0;

	// All the characters we look at are ascii, so indexing by byte positions is fine.
	for (pos, byte) in inner.bytes().enumerate() {
		match byte {
			b'<' => depth += 1,
			b'>' => {
				depth = depth.checked_sub(1)
					.ok_or_else(|| MalformedSignature::new(signature, "unbalanced `>`"))?;
			},
			b';' if depth == 0 => {
				parameters.push(&inner[start..=pos]);
				start = pos + 1;
			},
			code if depth == 0 && PRIMITIVE_CODES.contains(&code) && inner[start..pos].bytes().all(|b| b == b'[') => {
				parameters.push(&inner[start..=pos]);
				start = pos + 1;
			},
			_ => {},
		}
	}

	if depth != 0 {
		return Err(MalformedSignature::new(signature, "unbalanced `<`"));
	}
	if start != inner.len() {
		return Err(MalformedSignature::new(signature, "truncated type parameter"));
	}
	if parameters.is_empty() {
		return Err(MalformedSignature::new(signature, "parametrized type without type parameters"));
	}

	Ok(parameters)
}

use thiserror::Error;

/// A generic signature that doesn't follow the `L<name><...>;` nesting rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed signature {signature:?}: {reason}")]
pub struct MalformedSignature {
	pub signature: String,
	pub reason: &'static str,
}

impl MalformedSignature {
	pub(crate) fn new(signature: &str, reason: &'static str) -> MalformedSignature {
		MalformedSignature { signature: signature.to_owned(), reason }
	}
}

/// Fatal failures while turning a signature into a target type.
///
/// Note that a blacklisted type is not an error, see [`crate::resolve::Resolution::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
	#[error(transparent)]
	Malformed(#[from] MalformedSignature),
	/// No rule covers the token. Carries the raw token.
	#[error("unable to map type {token}")]
	Unmappable { token: String },
	/// A rule covers the token, but not with this number of generic parameters.
	#[error("type {token} requires {expected} generic parameter(s), got {got}")]
	ParameterCount { token: String, expected: usize, got: usize },
}

/// Errors aborting the generation of a single class.
#[derive(Debug, Error)]
pub enum GenerateError {
	#[error("class {class} does not have a {marker} attribute")]
	MissingMarkerAttribute { class: String, marker: String },
	#[error("unable to handle field {field}")]
	Field {
		field: String,
		#[source]
		source: TypeError,
	},
	#[error("failed to write declaration of class {class}")]
	Write {
		class: String,
		#[source]
		source: std::io::Error,
	},
}

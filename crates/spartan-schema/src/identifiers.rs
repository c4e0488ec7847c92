//! Reserved words of the schema source grammar.

// Root keys
pub const SCHEMA: &str = "schema";
pub const LET: &str = "let";
pub const SPARTAN: &str = "spartan";

// Scalar type names
pub const NULL: &str = "null";
pub const BOOLEAN: &str = "boolean";
pub const INTEGER: &str = "integer";
pub const FLOAT: &str = "float";
pub const NUMBER: &str = "number";
pub const STRING: &str = "string";
pub const DATE: &str = "date";
pub const BINARY: &str = "binary";
pub const ANY: &str = "any";

// Directives (first element of a sequence)
pub const ENUM: &str = "enum";
pub const TUPLE: &str = "tuple";
pub const ARRAY: &str = "array";
pub const DICTIONARY: &str = "dictionary";
pub const ONEOF: &str = "oneof";
pub const REF: &str = "ref";
pub const OPTIONAL: &str = "optional";

/// The only accepted value of the `spartan` root key.
pub const FORMAT_VERSION: f64 = 1.0;

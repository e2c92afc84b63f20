//! Document Model Values
//!
//! Tagged runtime values for schema-bound document fields, plus the fixed
//! conversion table used to coerce loosely-typed external input into a
//! field's declared target type.
//!
//! # Core Concepts
//!
//! - [`Value`]: sum type over every value kind a field may hold or receive
//! - [`ValueType`]: declared target type of a field
//! - [`ValueKind`]: runtime tag of a [`Value`] (includes `Null` and `Map`)
//! - [`LookupValue`]: id + display text pair produced by lookup sources
//! - [`convert`]: one explicit rule per (source kind, target type) pair
//!
//! # Example
//!
//! ```rust,ignore
//! use docmodel_value::{convert, Value, ValueType};
//!
//! let v = convert(&Value::text("42"), ValueType::Integer, None)?;
//! assert_eq!(v, Value::Integer(42));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod convert;
pub mod error;
pub mod lookup;
pub mod value;

// Re-exports
pub use convert::{convert, format_date, parse_date, truthiness};
pub use error::{ConversionError, ParseValueTypeError};
pub use lookup::{LookupResolver, LookupValue};
pub use value::{Value, ValueKind, ValueType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

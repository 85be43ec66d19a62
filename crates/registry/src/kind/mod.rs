//! Per-type physical resolution and validation
//!
//! One module per logical attribute type. Each exposes
//! `resolve(config) -> PhysicalType` and
//! `validate(field, value, config) -> Result<(), ValidationError>` for a
//! value that is present and non-null; the required check runs before
//! dispatch in [`crate::registry::TypeRegistry`].

pub(crate) mod binary;
pub(crate) mod boolean;
pub(crate) mod decimal;
pub(crate) mod integer;
pub(crate) mod json;
pub(crate) mod string;
pub(crate) mod temporal;
pub(crate) mod uuid;

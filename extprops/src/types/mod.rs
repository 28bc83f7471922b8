//! Target type descriptions and their binding to Rust types.

mod descriptor;
mod from_property;

pub use descriptor::{EnumType, RawType, TypeDescriptor};
pub use from_property::FromProperty;

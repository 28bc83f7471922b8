//! Built-in leaf converters.

mod big;
mod collection;
mod datetime;
mod duration;
mod enums;
mod map;
mod optional;
mod primitive;
mod properties;
mod string;

use std::sync::Arc;

pub use big::BigNumberConverter;
pub use collection::{ArrayConverter, ListConverter, SetConverter};
pub use datetime::DateTimeConverter;
pub use duration::DurationConverter;
pub use enums::EnumConverter;
pub use map::MapConverter;
pub use optional::OptionalConverter;
pub use primitive::PrimitiveConverter;
pub use properties::PropertiesConverter;
pub use string::StringConverter;

use super::Converter;

/// The built-in converters in dispatch order.
#[must_use]
pub fn defaults() -> Vec<Arc<dyn Converter>> {
    vec![
        Arc::new(StringConverter),
        Arc::new(PrimitiveConverter),
        Arc::new(BigNumberConverter),
        Arc::new(EnumConverter),
        Arc::new(DateTimeConverter),
        Arc::new(DurationConverter),
        Arc::new(PropertiesConverter),
        Arc::new(ArrayConverter),
        Arc::new(ListConverter),
        Arc::new(SetConverter),
        Arc::new(OptionalConverter),
        Arc::new(MapConverter),
    ]
}

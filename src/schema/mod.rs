mod fields;

pub use fields::flattened_fields;

use crate::report::Report;

/// Per-type validation hook. Configuration types implement it where field
/// rules exist; the walker invokes it wherever a value exposes it through
/// [`ConfigValue::validator`]. Hooks read the value and return diagnostics,
/// they never mutate.
pub trait Validate {
    fn validate(&self) -> Report;
}

/// The statically authored schema descriptor every configuration type
/// implements: it exposes the value's shape for traversal and, optionally, a
/// reference to its validation hook. Storing the hook reference here (instead
/// of rediscovering it per representation) means a value is validated exactly
/// once, no matter how many wrapper layers sit above it.
pub trait ConfigValue {
    fn shape(&self) -> Shape<'_>;

    fn validator(&self) -> Option<&dyn Validate> {
        None
    }
}

/// The four value shapes the walker distinguishes.
pub enum Shape<'a> {
    /// A leaf; nothing to descend into.
    Scalar,
    /// Present or absent wrapper around one inner value.
    Optional(Option<&'a dyn ConfigValue>),
    /// Aggregate with named fields.
    Record(Vec<Field<'a>>),
    /// Homogeneous ordered elements.
    Sequence(Vec<&'a dyn ConfigValue>),
}

/// One field of a record: the document key it correlates with, whether it is
/// an embedded substructure whose fields are hoisted into the enclosing
/// record, and the field value itself.
pub struct Field<'a> {
    pub tag: &'static str,
    pub flatten: bool,
    pub value: &'a dyn ConfigValue,
}

impl<'a> Field<'a> {
    pub fn new(tag: &'static str, value: &'a dyn ConfigValue) -> Self {
        Self {
            tag,
            flatten: false,
            value,
        }
    }

    /// An embedded field: it has no document key of its own and its record's
    /// fields are flattened into the enclosing record.
    pub fn embedded(value: &'a dyn ConfigValue) -> Self {
        Self {
            tag: "",
            flatten: true,
            value,
        }
    }
}

macro_rules! scalar_config_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigValue for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar
                }
            }
        )*
    };
}

scalar_config_value!(String, bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl<T: ConfigValue> ConfigValue for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Optional(self.as_ref().map(|inner| inner as &dyn ConfigValue))
    }
}

impl<T: ConfigValue> ConfigValue for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|item| item as &dyn ConfigValue).collect())
    }
}

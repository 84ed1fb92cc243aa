use super::{Field, Shape};

/// Flattens a record's field list: embedded fields are replaced, in place, by
/// their own record's fields, recursively. The result preserves declaration
/// order and never contains an entry for an embedded field itself, only for
/// its leaves.
pub fn flattened_fields(fields: Vec<Field<'_>>) -> Vec<Field<'_>> {
    let mut flat = Vec::with_capacity(fields.len());
    for field in fields {
        if field.flatten {
            if let Shape::Record(inner) = field.value.shape() {
                flat.extend(flattened_fields(inner));
            }
            continue;
        }
        flat.push(field);
    }
    flat
}

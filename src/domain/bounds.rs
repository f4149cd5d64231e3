// Characteristic bound extraction from a blend specification

use super::models::{BlendSpecification, CharacteristicBound};
use super::value_objects::BoundKind;

/// Extract the active characteristic bounds of a blend specification
///
/// Keys look like `min_<characteristic>` / `max_<characteristic>`; the
/// characteristic keeps any further underscores. Values are fractions of the
/// target quantity. Zero, negative and non-numeric values are skipped.
pub fn extract_bounds(spec: &BlendSpecification, target_quantity: f64) -> Vec<CharacteristicBound> {
    spec.entries()
        .filter_map(|(key, value)| {
            let (kind, characteristic) = parse_key(key)?;
            let fraction = value.as_f64().filter(|f| *f > 0.0)?;

            Some(CharacteristicBound {
                characteristic: characteristic.to_string(),
                kind,
                value: fraction * target_quantity,
            })
        })
        .collect()
}

fn parse_key(key: &str) -> Option<(BoundKind, &str)> {
    [BoundKind::Min, BoundKind::Max]
        .into_iter()
        .find_map(|kind| key.strip_prefix(kind.prefix()).map(|rest| (kind, rest)))
}

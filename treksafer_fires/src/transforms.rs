use crate::types::FireValue;

/// Named per-field transforms a `DataSource.mapping.transforms` entry may
/// reference by name; unknown names are a no-op rather than an error so a
/// config typo degrades gracefully instead of dropping the field.
pub fn apply(name: &str, value: FireValue) -> FireValue {
    match name {
        "acres_to_hectares" => acres_to_hectares(value),
        _ => value,
    }
}

const ACRES_PER_HECTARE: f64 = 2.4710538147;

fn acres_to_hectares(value: FireValue) -> FireValue {
    match value.as_f64() {
        Some(acres) => FireValue::Number((acres / ACRES_PER_HECTARE * 100.0).round() / 100.0),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acres_to_hectares_matches_known_conversion() {
        let result = apply("acres_to_hectares", FireValue::Number(100.0));
        assert_eq!(result, FireValue::Number(40.47));
    }

    #[test]
    fn unknown_transform_is_a_no_op() {
        let result = apply("does_not_exist", FireValue::Text("x".to_string()));
        assert_eq!(result, FireValue::Text("x".to_string()));
    }
}

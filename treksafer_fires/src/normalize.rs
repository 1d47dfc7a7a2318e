use treksafer_common::{bearing, Coordinate};
use treksafer_config::FieldMapping;
use treksafer_geoindex::PerimeterRow;

use crate::transforms;
use crate::types::{FireRecord, FireValue, DIRECTION_KEY, DISTANCE_KEY, STATUS_KEY};

/// Build one normalized record from a matched perimeter row: map declared
/// fields, apply transforms, translate the status vocabulary, and stamp in
/// the computed distance/bearing.
pub fn normalize_row(row: &PerimeterRow, mapping: &FieldMapping, location: &Coordinate, distance_m: f64) -> FireRecord {
    let mut record = FireRecord::default();

    record.fields.insert(DISTANCE_KEY.to_string(), FireValue::Number(distance_m));

    let direction = row
        .closest_point(location)
        .map(|closest| bearing::compass_direction(location, &closest).to_string())
        .unwrap_or_default();
    record.fields.insert(DIRECTION_KEY.to_string(), FireValue::Text(direction));

    for (data_key, raw_attr) in &mapping.fields {
        let Some(attribute) = row.attr(raw_attr) else {
            continue;
        };
        let mut value = FireValue::from(attribute);
        if let Some(transform_name) = mapping.transforms.get(data_key) {
            value = transforms::apply(transform_name, value);
        }
        record.fields.insert(data_key.clone(), value);
    }

    // A `Status` field that came in as a raw string always goes through the
    // source's status vocabulary; one that arrived already numeric is left
    // alone (some sources encode the level directly in the shapefile).
    if let Some(raw_status) = record.text(STATUS_KEY).map(str::to_string) {
        let level = mapping
            .status_map
            .iter()
            .find(|(_, raw_values)| raw_values.iter().any(|raw| *raw == raw_status))
            .and_then(|(category, _)| status_label_to_level(category))
            .unwrap_or(f64::INFINITY);
        record.fields.insert(STATUS_KEY.to_string(), FireValue::Number(level));
    }

    record
}

fn status_label_to_level(label: &str) -> Option<f64> {
    match label.to_ascii_lowercase().as_str() {
        "active" => Some(1.0),
        "managed" => Some(2.0),
        "controlled" => Some(3.0),
        "out" => Some(4.0),
        _ => None,
    }
}

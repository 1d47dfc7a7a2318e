//! Renders the fixed English reply vocabulary: the error taxonomy, per-fire
//! SMS entries under budget, and the AQI line that prefixes a fire reply.

mod errors;
mod fire;

pub use errors::ReplyError;
pub use fire::format_fire;
use treksafer_fires::FireRecord;

/// Join a batch of fire entries the way a multi-hit reply is assembled:
/// one blank line between entries, none after the last.
pub fn format_fires(records: &[FireRecord]) -> String {
    records.iter().map(format_fire).collect::<Vec<_>>().join("\n\n")
}

/// The AQI line prefixed once to a fire reply when enabled and available.
pub fn aqi_line(aqi: i64) -> String {
    format!("AQI: {aqi}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use treksafer_fires::types::{DIRECTION_KEY, DISTANCE_KEY, FIRE_KEY, SIZE_KEY};
    use treksafer_fires::FireValue;

    fn fire(code: &str, distance_m: f64) -> FireRecord {
        let mut fields = HashMap::new();
        fields.insert(FIRE_KEY.to_string(), FireValue::Text(code.to_string()));
        fields.insert(DISTANCE_KEY.to_string(), FireValue::Number(distance_m));
        fields.insert(DIRECTION_KEY.to_string(), FireValue::Text("SE".to_string()));
        fields.insert(SIZE_KEY.to_string(), FireValue::Number(10.0));
        FireRecord { fields }
    }

    #[test]
    fn multiple_fires_are_separated_by_a_blank_line() {
        let records = vec![fire("K-1", 1000.0), fire("K-2", 2000.0)];
        let rendered = format_fires(&records);
        assert!(rendered.contains("\n\n"));
        assert_eq!(rendered.matches("Fire: ").count(), 2);
    }

    #[test]
    fn aqi_line_reports_the_value() {
        assert_eq!(aqi_line(42), "AQI: 42");
    }
}

use treksafer_parser::StatusFilter;

use crate::types::FireRecord;

/// Include records whose status level is at or below `filter`'s level;
/// `all` disables the filter entirely rather than admitting a max level.
pub fn apply_status(records: Vec<FireRecord>, filter: StatusFilter) -> Vec<FireRecord> {
    let Some(max_level) = filter.level() else {
        return records;
    };
    records
        .into_iter()
        .filter(|record| record.status_level() <= max_level as f64)
        .collect()
}

/// Require `Size >= threshold`; a missing or non-numeric size excludes the
/// record rather than passing it through.
pub fn apply_size(records: Vec<FireRecord>, min_size_ha: f64) -> Vec<FireRecord> {
    records.into_iter().filter(|record| record.size_ha().is_some_and(|ha| ha >= min_size_ha)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FireValue, SIZE_KEY, STATUS_KEY};
    use std::collections::HashMap;

    fn record_with(status: f64, size: Option<f64>) -> FireRecord {
        let mut fields = HashMap::new();
        fields.insert(STATUS_KEY.to_string(), FireValue::Number(status));
        if let Some(size) = size {
            fields.insert(SIZE_KEY.to_string(), FireValue::Number(size));
        }
        FireRecord { fields }
    }

    #[test]
    fn status_filter_is_monotone_in_level() {
        let records = vec![record_with(1.0, None), record_with(2.0, None), record_with(4.0, None)];
        let filtered = apply_status(records, StatusFilter::Managed);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn all_disables_status_filter() {
        let records = vec![record_with(1.0, None), record_with(4.0, None)];
        let filtered = apply_status(records, StatusFilter::All);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn missing_size_is_excluded() {
        let records = vec![record_with(1.0, Some(10.0)), record_with(1.0, None)];
        let filtered = apply_size(records, 1.0);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn size_below_threshold_is_excluded() {
        let records = vec![record_with(1.0, Some(0.5)), record_with(1.0, Some(5.0))];
        let filtered = apply_size(records, 1.0);
        assert_eq!(filtered.len(), 1);
    }
}

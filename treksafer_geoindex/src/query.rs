use std::collections::HashSet;

use treksafer_common::Coordinate;

use crate::layer::PerimeterSet;

/// The three-way `distance_from_region` contract every avalanche provider and
/// boundary lookup shares: containment wins outright, a finite distance is
/// only meaningful within the buffer, and anything else collapses to
/// "out of range" rather than carrying a raw float around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContainmentDistance {
    Contained,
    Nearby(f64),
    OutOfRange,
}

impl ContainmentDistance {
    pub fn is_covered(&self) -> bool {
        !matches!(self, ContainmentDistance::OutOfRange)
    }

    pub fn distance_km(&self) -> f64 {
        match self {
            ContainmentDistance::Contained => 0.0,
            ContainmentDistance::Nearby(km) => *km,
            ContainmentDistance::OutOfRange => f64::INFINITY,
        }
    }
}

/// `distance_from_region` against a single polygon set.
pub fn distance_from_region(set: &PerimeterSet, point: &Coordinate, buffer_km: f64) -> ContainmentDistance {
    if set.containing(point).is_some() {
        return ContainmentDistance::Contained;
    }
    match set.nearest_within(point, buffer_km) {
        Some((_, km)) => ContainmentDistance::Nearby(km),
        None => ContainmentDistance::OutOfRange,
    }
}

/// Either the contained polygon's `name_field` value, the name of the
/// nearest polygon within `buffer_km`, or `None` when nothing qualifies.
pub fn cover_or_nearest<'a>(set: &'a PerimeterSet, point: &Coordinate, buffer_km: f64, name_field: &str) -> Option<&'a str> {
    if let Some(row) = set.containing(point) {
        return row.attr(name_field).and_then(|v| v.as_str());
    }
    set.nearest_within(point, buffer_km)
        .and_then(|(row, _)| row.attr(name_field))
        .and_then(|v| v.as_str())
}

/// Union of region-code attribute values (e.g. ISO country codes, Canadian
/// province postal codes) whose polygon lies within `max_km` of `point`,
/// across two fixed boundary layers.
pub fn sources_for(
    countries: &PerimeterSet,
    canada_provinces: &PerimeterSet,
    point: &Coordinate,
    max_km: f64,
    iso_field: &str,
    postal_field: &str,
) -> HashSet<String> {
    let mut codes = HashSet::new();

    for row in countries.rows() {
        let within = row.contains(point) || row.distance_m(point) / 1000.0 <= max_km;
        if within {
            if let Some(code) = row.attr(iso_field).and_then(|v| v.as_str()) {
                codes.insert(code.to_string());
            }
        }
    }

    for row in canada_provinces.rows() {
        let within = row.contains(point) || row.distance_m(point) / 1000.0 <= max_km;
        if within {
            if let Some(code) = row.attr(postal_field).and_then(|v| v.as_str()) {
                codes.insert(code.to_string());
            }
        }
    }

    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_yields_out_of_range() {
        let set = PerimeterSet::empty();
        let point = Coordinate::new(50.0, -120.0).unwrap();
        assert_eq!(distance_from_region(&set, &point, 25.0), ContainmentDistance::OutOfRange);
    }

    #[test]
    fn out_of_range_is_never_covered() {
        assert!(!ContainmentDistance::OutOfRange.is_covered());
        assert!(ContainmentDistance::Contained.is_covered());
        assert!(ContainmentDistance::Nearby(3.0).is_covered());
    }
}

use std::collections::HashMap;

use treksafer_geoindex::AttributeValue;

/// A normalized field value, narrowed from [`AttributeValue`] to the two
/// shapes a reply formatter or filter ever needs to branch on.
#[derive(Debug, Clone, PartialEq)]
pub enum FireValue {
    Text(String),
    Number(f64),
}

impl FireValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FireValue::Number(n) => Some(*n),
            FireValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FireValue::Text(s) => Some(s.as_str()),
            FireValue::Number(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            FireValue::Text(s) => s.clone(),
            FireValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }
}

impl From<&AttributeValue> for FireValue {
    fn from(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Numeric(n) => FireValue::Number(*n),
            AttributeValue::Logical(b) => FireValue::Text(b.to_string()),
            AttributeValue::Character(s) => FireValue::Text(s.clone()),
            AttributeValue::Null => FireValue::Text(String::new()),
        }
    }
}

/// One normalized, filtered perimeter match: whichever keys the source's
/// `FieldMapping` declared (`Fire`, `Name`, `Location`, `Size`, `Status`, or
/// source-specific extras), plus the computed `Distance` (meters) and
/// `Direction` (compass point) every record carries regardless of mapping.
#[derive(Debug, Clone, Default)]
pub struct FireRecord {
    pub fields: HashMap<String, FireValue>,
}

pub const DISTANCE_KEY: &str = "Distance";
pub const DIRECTION_KEY: &str = "Direction";
pub const STATUS_KEY: &str = "Status";
pub const SIZE_KEY: &str = "Size";
pub const NAME_KEY: &str = "Name";
pub const FIRE_KEY: &str = "Fire";
pub const LOCATION_KEY: &str = "Location";

impl FireRecord {
    pub fn get(&self, key: &str) -> Option<&FireValue> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FireValue::as_str)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FireValue::as_f64)
    }

    /// `+inf` when the raw status string had no entry in this source's
    /// `status_map`: effectively unknown, excluded by every filter but `all`.
    pub fn status_level(&self) -> f64 {
        self.number(STATUS_KEY).unwrap_or(f64::INFINITY)
    }

    pub fn size_ha(&self) -> Option<f64> {
        self.number(SIZE_KEY)
    }

    pub fn distance_m(&self) -> f64 {
        self.number(DISTANCE_KEY).unwrap_or(f64::INFINITY)
    }

    pub fn direction(&self) -> Option<&str> {
        self.text(DIRECTION_KEY)
    }
}

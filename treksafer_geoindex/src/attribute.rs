use shapefile::dbase::FieldValue;

/// A dbase attribute value, reduced to the handful of shapes the fire/avalanche
/// field mappings actually consume. Keeping this local instead of passing
/// `shapefile::dbase::FieldValue` around every crate boundary means nothing
/// outside `treksafer_geoindex` needs to know the shapefile crate exists.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Character(String),
    Numeric(f64),
    Logical(bool),
    Null,
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Character(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Numeric(n) => Some(*n),
            AttributeValue::Character(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// A display form good enough to interpolate into an enrichment URL or a
    /// formatted reply field, regardless of the underlying dbase type.
    pub fn display(&self) -> String {
        match self {
            AttributeValue::Character(s) => s.clone(),
            AttributeValue::Numeric(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            AttributeValue::Logical(b) => b.to_string(),
            AttributeValue::Null => String::new(),
        }
    }
}

impl From<&FieldValue> for AttributeValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Character(Some(s)) => AttributeValue::Character(s.clone()),
            FieldValue::Character(None) => AttributeValue::Null,
            FieldValue::Numeric(Some(n)) => AttributeValue::Numeric(*n),
            FieldValue::Numeric(None) => AttributeValue::Null,
            FieldValue::Float(Some(n)) => AttributeValue::Numeric(*n as f64),
            FieldValue::Float(None) => AttributeValue::Null,
            FieldValue::Logical(Some(b)) => AttributeValue::Logical(*b),
            FieldValue::Logical(None) => AttributeValue::Null,
            FieldValue::Integer(n) => AttributeValue::Numeric(*n as f64),
            FieldValue::Date(Some(date)) => AttributeValue::Character(date.to_string()),
            FieldValue::Date(None) => AttributeValue::Null,
            other => AttributeValue::Character(format!("{other:?}")),
        }
    }
}

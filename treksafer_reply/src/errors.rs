/// The fixed English error taxonomy a reply ever surfaces in place of real
/// data. Every variant renders to one line; none of them are ever combined
/// with fire or avalanche content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyError {
    NoGps,
    OutsideOfArea,
    NoFires,
    AvalancheUnavailable,
    UnknownDataType,
}

impl ReplyError {
    pub fn message(&self, fire_radius_km: f64) -> String {
        match self {
            ReplyError::NoGps => {
                "TrekSafer ERROR: No GPS location found. Ensure device is setup to include location in sent message or manually include coordinates with \"(lat, long)\".".to_string()
            }
            ReplyError::OutsideOfArea => {
                "TrekSafer ERROR: GPS coordinates outside of supported fire perimeter area. No data available.".to_string()
            }
            ReplyError::NoFires => {
                format!("No fires reported within a {fire_radius_km}km radius of your location.")
            }
            ReplyError::AvalancheUnavailable => {
                "TrekSafer ERROR: GPS coordinates outside of supported avalanche forecast area. No data available.".to_string()
            }
            ReplyError::UnknownDataType => "TrekSafer ERROR: Could not determine whether you're asking about fires or avalanches.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fires_message_reports_effective_radius() {
        assert_eq!(ReplyError::NoFires.message(75.0), "No fires reported within a 75km radius of your location.");
    }
}

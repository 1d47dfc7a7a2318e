use treksafer_common::rounding::round_to;
use treksafer_fires::types::{DIRECTION_KEY, FIRE_KEY, LOCATION_KEY, NAME_KEY};
use treksafer_fires::FireRecord;

const SMS_BUDGET_UNITS: usize = 159;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FireSize {
    Full,
    Medium,
    Short,
}

impl FireSize {
    fn degrade(self) -> Option<FireSize> {
        match self {
            FireSize::Full => Some(FireSize::Medium),
            FireSize::Medium => Some(FireSize::Short),
            FireSize::Short => None,
        }
    }
}

/// Render `record` at the largest size that fits the SMS budget, falling
/// back through `full` -> `medium` -> `short`. `short` is never degraded
/// further even if it still overflows.
pub fn format_fire(record: &FireRecord) -> String {
    let mut size = FireSize::Full;
    loop {
        let rendered = render(record, size);
        if message_length(&rendered) <= SMS_BUDGET_UNITS {
            return rendered;
        }
        match size.degrade() {
            Some(next) => size = next,
            None => return rendered,
        }
    }
}

/// UTF-16 code unit count -- the unit an SMS budget is denominated in,
/// matching surrogate-pair-aware length rather than byte or `char` count.
fn message_length(message: &str) -> usize {
    message.encode_utf16().count()
}

fn render(record: &FireRecord, size: FireSize) -> String {
    let code = record.text(FIRE_KEY).unwrap_or("");
    let name = record.text(NAME_KEY);
    let direction = record.direction().unwrap_or("");
    let distance = format_distance(record.distance_m());
    let size_ha = record.size_ha().map(|ha| ha.round() as i64);
    let status_label = status_label(record.status_level());

    let full_name = match (size, name) {
        (FireSize::Full, Some(n)) if n != code => format!("{n} ({code})"),
        (FireSize::Medium, Some(n)) if n != code => format!("{n} {code}"),
        _ => code.to_string(),
    };

    let dist_dir = match size {
        FireSize::Full => format!("{distance}km {direction}"),
        FireSize::Medium => format!("{distance} {direction}"),
        FireSize::Short => format!("{distance}{direction}"),
    };

    let mut lines = Vec::new();
    match size {
        FireSize::Full => {
            lines.push(format!("Fire: {full_name}"));
            if let Some(location) = record.text(LOCATION_KEY).filter(|s| !s.is_empty()) {
                lines.push(format!("Location: {location}"));
            }
            lines.push(dist_dir);
            if let Some(ha) = size_ha {
                lines.push(format!("Size: {ha} ha"));
            }
            if let Some(label) = status_label {
                lines.push(format!("Status: {label}"));
            }
        }
        FireSize::Medium => {
            lines.push(format!("Fire: {full_name}"));
            lines.push(dist_dir);
            if let Some(ha) = size_ha {
                lines.push(format!("Size: {ha} ha"));
            }
        }
        FireSize::Short => {
            lines.push(full_name);
            lines.push(dist_dir);
            if let Some(ha) = size_ha {
                lines.push(format!("{ha}ha"));
            }
        }
    }

    lines.join("\n")
}

fn status_label(level: f64) -> Option<&'static str> {
    if level == 1.0 {
        Some("active")
    } else if level == 2.0 {
        Some("managed")
    } else if level == 3.0 {
        Some("controlled")
    } else if level == 4.0 {
        Some("out")
    } else {
        None
    }
}

/// `< 10 km` keeps one decimal (half-away-from-zero); `>= 10 km` rounds to
/// an integer; a trailing `.0` is always stripped either way.
fn format_distance(meters: f64) -> String {
    let km = meters / 1000.0;
    let rounded = if km < 10.0 { round_to(km, 1) } else { round_to(km, 0) };
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        rounded.to_string()
    }
}

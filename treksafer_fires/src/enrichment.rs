use std::collections::HashMap;

use treksafer_config::ApiEnrichment;
use treksafer_http::CachedHttp;

use crate::transforms;
use crate::types::{FireRecord, FireValue};

/// `{field_name}` interpolated from an already-mapped record field; values
/// are restricted to a printable-ASCII allowlist excluding URL-breaking
/// characters before substitution, since the row data an enrichment URL
/// pulls from is not a trusted input (spec's design notes call this out
/// explicitly rather than leaving it implicit).
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '/' | '?' | '#' | '&' | '=' | ' ' | '"' | '\'' | '<' | '>'))
        .collect()
}

fn build_url(template: &str, record: &FireRecord) -> Option<String> {
    let mut url = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        url.push_str(&rest[..open]);
        rest = &rest[open + 1..];
        let close = rest.find('}')?;
        let field_name = &rest[..close];
        rest = &rest[close + 1..];

        let raw = record.get(field_name)?.display();
        url.push_str(&sanitize(&raw));
    }
    url.push_str(rest);
    Some(url)
}

/// Fetch the source's auxiliary API and merge its fields into `record`. A
/// malformed template, network failure, or unparsable body is logged and
/// left the record untouched -- enrichment is best-effort, never fatal.
pub async fn enrich(record: &mut FireRecord, enrichment: &ApiEnrichment, transforms: &HashMap<String, String>, http: &CachedHttp) {
    let Some(url) = build_url(&enrichment.url_template, record) else {
        tracing::warn!(template = enrichment.url_template, "enrichment url template could not be resolved");
        return;
    };

    let body = match http.get_text(&url).await {
        Ok(body) => body,
        Err(error) => {
            tracing::warn!(url, %error, "enrichment request failed");
            return;
        }
    };

    let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) else {
        tracing::warn!(url, "enrichment response was not valid json");
        return;
    };

    merge_fields(record, &enrichment.fields, transforms, &json);
}

/// Apply each configured `data_key -> api_field` mapping from a parsed
/// response into `record`, running the field's configured transform (if
/// any) the same way a shapefile-mapped field would.
fn merge_fields(record: &mut FireRecord, fields: &HashMap<String, String>, transforms: &HashMap<String, String>, json: &serde_json::Value) {
    for (data_key, api_field) in fields {
        let Some(value) = json.get(api_field) else {
            continue;
        };
        let mut fire_value = match value {
            serde_json::Value::Number(n) => FireValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => FireValue::Text(s.clone()),
            other => FireValue::Text(other.to_string()),
        };
        if let Some(transform_name) = transforms.get(data_key) {
            fire_value = transforms::apply(transform_name, fire_value);
        }
        record.fields.insert(data_key.clone(), fire_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FIRE_KEY;
    use std::collections::HashMap;

    #[test]
    fn sanitize_strips_url_breaking_characters() {
        assert_eq!(sanitize("abc/def?x=1"), "abcdefx1");
    }

    #[test]
    fn build_url_substitutes_known_fields() {
        let mut fields = HashMap::new();
        fields.insert(FIRE_KEY.to_string(), FireValue::Text("K-12345".to_string()));
        let record = FireRecord { fields };
        let url = build_url("https://api.example.com/fires/{Fire}/details", &record).unwrap();
        assert_eq!(url, "https://api.example.com/fires/K-12345/details");
    }

    #[test]
    fn build_url_fails_on_unknown_field() {
        let record = FireRecord::default();
        assert!(build_url("https://api.example.com/{Missing}", &record).is_none());
    }

    #[test]
    fn merge_fields_applies_the_configured_transform() {
        let mut record = FireRecord::default();
        let mut fields = HashMap::new();
        fields.insert("Size".to_string(), "acres".to_string());
        let mut transforms = HashMap::new();
        transforms.insert("Size".to_string(), "acres_to_hectares".to_string());
        let json = serde_json::json!({ "acres": 100.0 });

        merge_fields(&mut record, &fields, &transforms, &json);

        assert_eq!(record.fields.get("Size"), Some(&FireValue::Number(40.47)));
    }

    #[test]
    fn merge_fields_without_a_transform_inserts_the_raw_value() {
        let mut record = FireRecord::default();
        let mut fields = HashMap::new();
        fields.insert("Size".to_string(), "acres".to_string());
        let json = serde_json::json!({ "acres": 100.0 });

        merge_fields(&mut record, &fields, &HashMap::new(), &json);

        assert_eq!(record.fields.get("Size"), Some(&FireValue::Number(100.0)));
    }
}

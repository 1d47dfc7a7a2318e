use std::path::{Path, PathBuf};

use crate::errors::{ConfigError, Result};
use crate::settings::Settings;

const ENV_VAR: &str = "TREKSAFER_ENV";
const OVERRIDE_PREFIX: &str = "TREKSAFER_";

/// Load settings for the environment named by `TREKSAFER_ENV` (default
/// `prod`) from `<config_dir>/<env>.yaml`.
///
/// Order of operations, matching the richer of the two loaders the source
/// carried: load `.env` then `.env.<env>` (later files win, real environment
/// variables always win over either), read the YAML file, expand
/// `${VAR}`/`${VAR:-default}` placeholders against the now-merged
/// environment, bind it strictly (unknown keys are a hard error), then apply
/// `TREKSAFER_*`-prefixed scalar overrides on top.
pub fn load(config_dir: impl AsRef<Path>) -> Result<Settings> {
    let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "prod".to_string());
    load_env(config_dir, &env)
}

pub fn load_env(config_dir: impl AsRef<Path>, env: &str) -> Result<Settings> {
    load_dotenv_sidecars(env);

    let path = config_dir.as_ref().join(format!("{env}.yaml"));
    load_file(&path)
}

fn load_dotenv_sidecars(env: &str) {
    // Best-effort: secrets files are optional, missing ones are not an error.
    let _ = dotenvy::from_filename(".env");
    let _ = dotenvy::from_filename(format!(".env.{env}"));
}

pub fn load_file(path: &Path) -> Result<Settings> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let expanded = shellexpand::full(&raw).map_err(|source| ConfigError::PlaceholderExpansion {
        path: path.to_path_buf(),
        source,
    })?;

    let mut settings: Settings =
        serde_yaml::from_str(&expanded).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

    apply_scalar_overrides(&mut settings);
    validate(&settings)?;

    Ok(settings)
}

/// Pydantic-style `TREKSAFER_*` env overrides for a handful of scalar knobs
/// operators commonly tweak per-deployment without editing the YAML file.
fn apply_scalar_overrides(settings: &mut Settings) {
    if let Ok(v) = std::env::var(format!("{OVERRIDE_PREFIX}FIRE_RADIUS")) {
        if let Ok(parsed) = v.parse() {
            settings.fire_radius = parsed;
        }
    }
    if let Ok(v) = std::env::var(format!("{OVERRIDE_PREFIX}MAX_RADIUS")) {
        if let Ok(parsed) = v.parse() {
            settings.max_radius = parsed;
        }
    }
    if let Ok(v) = std::env::var(format!("{OVERRIDE_PREFIX}FIRE_STATUS")) {
        settings.fire_status = v;
    }
    if let Ok(v) = std::env::var(format!("{OVERRIDE_PREFIX}INCLUDE_AQI")) {
        if let Ok(parsed) = v.parse() {
            settings.include_aqi = parsed;
        }
    }
    if let Ok(v) = std::env::var(format!("{OVERRIDE_PREFIX}LOG_LEVEL")) {
        settings.log_level = v;
    }
    if let Ok(v) = std::env::var(format!("{OVERRIDE_PREFIX}SHAPEFILES")) {
        settings.shapefiles = v;
    }
}

fn validate(settings: &Settings) -> Result<()> {
    for transport in &settings.transports {
        if !transport.enabled() {
            continue;
        }
        let missing: Vec<&str> = match transport {
            crate::settings::TransportConfig::Sms {
                project_id,
                api_token,
                phone_number,
                ..
            } => [
                ("project_id", project_id),
                ("api_token", api_token),
                ("phone_number", phone_number),
            ]
            .into_iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(name, _)| name)
            .collect(),
            crate::settings::TransportConfig::Cli { host, .. } => {
                if host.trim().is_empty() {
                    vec!["host"]
                } else {
                    vec![]
                }
            }
        };

        if !missing.is_empty() {
            return Err(ConfigError::IncompleteTransport {
                transport: transport.name().to_string(),
                detail: missing.join(", "),
            });
        }
    }

    Ok(())
}

pub fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const MINIMAL: &str = r#"
avalanche:
  providers: {}
data:
  - location: "us"
    filename: "*.shp"
    mapping:
      fields:
        Name: "FIRE_NAME"
        Size: "ACRES"
"#;

    #[test]
    fn loads_minimal_config_with_defaults() {
        let file = write_temp_yaml(MINIMAL);
        let settings = load_file(file.path()).unwrap();
        assert_eq!(settings.env, "prod");
        assert_eq!(settings.fire_radius, 100.0);
        assert_eq!(settings.data.len(), 1);
        assert!(settings.transports.is_empty());
    }

    #[test]
    fn expands_placeholder_with_default() {
        std::env::remove_var("TREKSAFER_TEST_RADIUS");
        let yaml = format!("fire_radius: ${{TREKSAFER_TEST_RADIUS:-42}}\n{MINIMAL}");
        let file = write_temp_yaml(&yaml);
        let settings = load_file(file.path()).unwrap();
        assert_eq!(settings.fire_radius, 42.0);
    }

    #[test]
    fn expands_placeholder_from_real_env() {
        std::env::set_var("TREKSAFER_TEST_RADIUS_2", "77");
        let yaml = format!("fire_radius: ${{TREKSAFER_TEST_RADIUS_2:-42}}\n{MINIMAL}");
        let file = write_temp_yaml(&yaml);
        let settings = load_file(file.path()).unwrap();
        assert_eq!(settings.fire_radius, 77.0);
        std::env::remove_var("TREKSAFER_TEST_RADIUS_2");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let yaml = format!("{MINIMAL}\nbogus_key: 1\n");
        let file = write_temp_yaml(&yaml);
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_not_found_error() {
        let err = load_file(Path::new("/nonexistent/path/does-not-exist.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn enabled_incomplete_sms_transport_is_rejected() {
        let yaml = format!(
            "{MINIMAL}\ntransports:\n  - type: sms\n    project_id: \"\"\n    api_token: \"x\"\n    phone_number: \"+1\"\n    enabled: true\n"
        );
        let file = write_temp_yaml(&yaml);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IncompleteTransport { .. }));
    }

    #[test]
    fn disabled_incomplete_transport_is_accepted() {
        let yaml = format!(
            "{MINIMAL}\ntransports:\n  - type: sms\n    project_id: \"\"\n    api_token: \"\"\n    phone_number: \"\"\n    enabled: false\n"
        );
        let file = write_temp_yaml(&yaml);
        assert!(load_file(file.path()).is_ok());
    }

    #[test]
    fn scalar_override_wins_over_yaml_value() {
        std::env::set_var("TREKSAFER_FIRE_STATUS", "contained");
        let file = write_temp_yaml(MINIMAL);
        let settings = load_file(file.path()).unwrap();
        assert_eq!(settings.fire_status, "contained");
        std::env::remove_var("TREKSAFER_FIRE_STATUS");
    }

    #[test]
    fn default_log_file_path_uses_env_name() {
        let file = write_temp_yaml(MINIMAL);
        let settings = load_file(file.path()).unwrap();
        assert_eq!(settings.log_file_path(), PathBuf::from("logs/prod.log"));
    }
}

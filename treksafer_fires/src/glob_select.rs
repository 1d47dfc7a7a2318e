use std::path::{Path, PathBuf};

/// Resolve a `DataSource`'s `{DATE}`-templated filename against
/// `<shapefiles>/<location>`, returning the lexically greatest match (dates
/// are zero-padded `YYYYMMDD`, so lexical order is chronological order).
pub fn select_latest(shapefiles_base: &Path, location: &str, filename_pattern: &str) -> Option<PathBuf> {
    let pattern = filename_pattern.replace("{DATE}", "*");
    let target_dir = shapefiles_base.join(location);
    let full_pattern = target_dir.join(&pattern);

    let mut matches: Vec<PathBuf> = glob::glob(&full_pattern.to_string_lossy())
        .ok()?
        .filter_map(Result::ok)
        .collect();

    matches.sort();
    matches.pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn picks_lexically_greatest_dated_file() {
        let dir = std::env::temp_dir().join("treksafer-glob-select-test");
        let source_dir = dir.join("bc-wildfires");
        fs::create_dir_all(&source_dir).unwrap();
        for name in ["perimeters_20240601.shp.zip", "perimeters_20240815.shp.zip", "perimeters_20240102.shp.zip"] {
            fs::write(source_dir.join(name), b"").unwrap();
        }

        let picked = select_latest(&dir, "bc-wildfires", "perimeters_{DATE}.shp.zip").unwrap();
        assert_eq!(picked.file_name().unwrap().to_str().unwrap(), "perimeters_20240815.shp.zip");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_directory_yields_none() {
        let dir = std::env::temp_dir().join("treksafer-glob-select-missing");
        fs::remove_dir_all(&dir).ok();
        assert!(select_latest(&dir, "nope", "perimeters_{DATE}.shp.zip").is_none());
    }
}

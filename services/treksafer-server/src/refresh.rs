use std::path::Path;
use std::sync::Arc;

use treksafer_config::Settings;
use treksafer_http::CachedHttp;

/// Periodic task: for each configured `DataSource` that declares a
/// `refresh_url`, download today's perimeter archive into
/// `shapefiles/<location>/` if a file for today isn't already present.
/// Per-agency scraping logic beyond a plain GET is out of scope here; this
/// implements the scheduling and storage contract only.
pub async fn run(settings: Arc<Settings>, http: Arc<CachedHttp>, mut shutdown: tokio::sync::watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(settings.refresh.interval_hours * 3600));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                refresh_all(&settings, &http).await;
            }
            _ = shutdown.changed() => {
                tracing::info!("refresh job shutting down");
                return;
            }
        }
    }
}

async fn refresh_all(settings: &Settings, http: &CachedHttp) {
    for source in &settings.data {
        let Some(url) = &source.refresh_url else { continue };
        let dest = today_destination(&settings.shapefiles, &source.location, &source.filename);
        if dest.exists() {
            continue;
        }

        tracing::info!(location = source.location, url, "refreshing perimeter shapefile");
        if let Err(error) = http.download_to_file(url, &dest).await {
            tracing::warn!(location = source.location, url, %error, "shapefile refresh failed");
        }
    }
}

/// Resolve `filename`'s `{DATE}` placeholder against today's date, matching
/// the zero-padded `YYYYMMDD` convention `glob_select` reads back later.
fn today_destination(shapefiles_base: &str, location: &str, filename_pattern: &str) -> std::path::PathBuf {
    let today = today_stamp();
    let filename = filename_pattern.replace("{DATE}", &today);
    Path::new(shapefiles_base).join(location).join(filename)
}

fn today_stamp() -> String {
    chrono::Utc::now().format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_substitutes_date_placeholder() {
        let dest = today_destination("shapefiles", "us", "wildfires_{DATE}.zip");
        let name = dest.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("wildfires_"));
        assert!(name.ends_with(".zip"));
        assert_eq!(name.len(), "wildfires_YYYYMMDD.zip".len());
    }
}

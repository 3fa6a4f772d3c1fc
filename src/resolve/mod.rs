//! Interpretation of a fetched release: the version gate, platform
//! asset selection, and auxiliary metadata extraction.

mod notes;
mod version;

pub use notes::min_platform_version;
pub use version::{compare, is_upgrade, parse_segments};

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::error::{Result, UpdateError};
use crate::platform::Platform;
use crate::registry::{Asset, ReleaseRecord};

/// Placeholder used when a release carries no notes.
pub const NO_RELEASE_NOTES: &str = "No release notes provided.";

/// A genuine upgrade over the running version, ready to download.
#[derive(Debug, Clone, Serialize)]
pub struct AppUpdate {
    /// Normalized version with the leading "v" stripped.
    pub version: String,
    pub notes: String,
    pub download_url: String,
    /// Name of the selected asset; becomes the destination file name.
    pub file_name: String,
    /// Best-effort: falls back to the wall clock when the registry
    /// timestamp is absent or unparsable. Display/sort only.
    pub published_at: DateTime<Utc>,
    pub min_platform_version: Option<String>,
    /// Size in bytes of the selected asset, passed through verbatim.
    pub file_size: Option<u64>,
}

/// Decide whether `release` is an upgrade over `current_version`.
///
/// `Ok(None)` when the release version is equal, lesser, or not
/// numeric. A release that is an upgrade but carries no asset matching
/// `platform` fails with `InvalidResponse`: it is not actionable.
pub fn resolve_update(
    release: &ReleaseRecord,
    current_version: &str,
    platform: &Platform,
) -> Result<Option<AppUpdate>> {
    let candidate = release
        .tag_name
        .strip_prefix('v')
        .unwrap_or(&release.tag_name);

    if !version::is_upgrade(candidate, current_version) {
        debug!(
            "Release {} is not an upgrade over {}",
            candidate, current_version
        );
        return Ok(None);
    }

    let asset = select_asset(&release.assets, platform).ok_or_else(|| {
        UpdateError::InvalidResponse(format!(
            "release {} has no installer asset for this platform",
            release.tag_name
        ))
    })?;

    let notes = release
        .body
        .clone()
        .unwrap_or_else(|| NO_RELEASE_NOTES.to_string());

    let published_at = release
        .published_at
        .as_deref()
        .and_then(parse_published_at)
        .unwrap_or_else(Utc::now);

    Ok(Some(AppUpdate {
        version: candidate.to_string(),
        min_platform_version: min_platform_version(&notes),
        download_url: asset.download_url.clone(),
        file_name: asset.name.clone(),
        published_at,
        file_size: asset.size,
        notes,
    }))
}

/// First asset satisfying both platform conditions, in list order.
pub fn select_asset<'a>(assets: &'a [Asset], platform: &Platform) -> Option<&'a Asset> {
    assets.iter().find(|asset| platform.matches(&asset.name))
}

fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macos() -> Platform {
        Platform::new(".dmg", &["macos", "darwin", "osx"])
    }

    fn asset(name: &str, size: Option<u64>) -> Asset {
        Asset {
            name: name.to_string(),
            download_url: format!("https://example.com/{}", name),
            size,
        }
    }

    fn release(tag: &str, assets: Vec<Asset>) -> ReleaseRecord {
        ReleaseRecord {
            tag_name: tag.to_string(),
            body: Some("Bug fixes.".to_string()),
            published_at: Some("2024-05-01T12:00:00Z".to_string()),
            assets,
            status: 200,
        }
    }

    #[test]
    fn test_equal_version_yields_no_update() {
        let release = release("v1.2.0", vec![asset("App-macOS.dmg", Some(100))]);

        let result = resolve_update(&release, "1.2.0", &macos()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_newer_version_yields_update() {
        let release = release("v1.3.0", vec![asset("App-macOS.dmg", Some(100))]);

        let update = resolve_update(&release, "1.2.0", &macos()).unwrap().unwrap();
        assert_eq!(update.version, "1.3.0");
        assert_eq!(update.download_url, "https://example.com/App-macOS.dmg");
        assert_eq!(update.file_name, "App-macOS.dmg");
        assert_eq!(update.file_size, Some(100));
    }

    #[test]
    fn test_lesser_version_yields_no_update() {
        let release = release("v1.1.0", vec![asset("App-macOS.dmg", None)]);

        assert!(resolve_update(&release, "1.2.0", &macos()).unwrap().is_none());
    }

    #[test]
    fn test_tag_without_v_prefix() {
        let release = release("1.3.0", vec![asset("App-macOS.dmg", None)]);

        let update = resolve_update(&release, "1.2.0", &macos()).unwrap().unwrap();
        assert_eq!(update.version, "1.3.0");
    }

    #[test]
    fn test_unparsable_tag_yields_no_update() {
        let release = release("nightly", vec![asset("App-macOS.dmg", None)]);

        assert!(resolve_update(&release, "1.2.0", &macos()).unwrap().is_none());
    }

    #[test]
    fn test_no_matching_asset_is_invalid_response() {
        let release = release(
            "v1.3.0",
            vec![asset("App-windows.exe", None), asset("Notes.txt", None)],
        );

        let result = resolve_update(&release, "1.2.0", &macos());
        assert!(matches!(result, Err(UpdateError::InvalidResponse(_))));
    }

    #[test]
    fn test_first_matching_asset_wins() {
        let release = release(
            "v1.3.0",
            vec![
                asset("Checksums.txt", None),
                asset("App-macOS.dmg", Some(1)),
                asset("App-macOS-legacy.dmg", Some(2)),
            ],
        );

        let update = resolve_update(&release, "1.2.0", &macos()).unwrap().unwrap();
        assert_eq!(update.file_name, "App-macOS.dmg");
    }

    #[test]
    fn test_absent_notes_default_to_placeholder() {
        let mut release = release("v1.3.0", vec![asset("App-macOS.dmg", None)]);
        release.body = None;

        let update = resolve_update(&release, "1.2.0", &macos()).unwrap().unwrap();
        assert_eq!(update.notes, NO_RELEASE_NOTES);
        assert_eq!(update.min_platform_version, None);
    }

    #[test]
    fn test_min_platform_version_extracted_from_notes() {
        let mut release = release("v1.3.0", vec![asset("App-macOS.dmg", None)]);
        release.body =
            Some("Requires macOS 13.0 or later and some other 99.9 number".to_string());

        let update = resolve_update(&release, "1.2.0", &macos()).unwrap().unwrap();
        assert_eq!(update.min_platform_version, Some("13.0".to_string()));
    }

    #[test]
    fn test_published_at_parsed_when_valid() {
        let release = release("v1.3.0", vec![asset("App-macOS.dmg", None)]);

        let update = resolve_update(&release, "1.2.0", &macos()).unwrap().unwrap();
        assert_eq!(update.published_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_published_at_falls_back_to_now() {
        let mut release = release("v1.3.0", vec![asset("App-macOS.dmg", None)]);
        release.published_at = Some("yesterday-ish".to_string());

        let before = Utc::now();
        let update = resolve_update(&release, "1.2.0", &macos()).unwrap().unwrap();
        let after = Utc::now();

        assert!(update.published_at >= before && update.published_at <= after);
    }

    #[test]
    fn test_file_size_absent_passes_through() {
        let release = release("v1.3.0", vec![asset("App-macOS.dmg", None)]);

        let update = resolve_update(&release, "1.2.0", &macos()).unwrap().unwrap();
        assert_eq!(update.file_size, None);
    }

    #[test]
    fn test_select_asset_requires_both_conditions() {
        let assets = vec![
            asset("App.dmg", None),         // extension only
            asset("App-macOS.zip", None),   // identifier only
            asset("App-macOS.dmg", None),   // both
        ];

        let picked = select_asset(&assets, &macos()).unwrap();
        assert_eq!(picked.name, "App-macOS.dmg");
    }
}

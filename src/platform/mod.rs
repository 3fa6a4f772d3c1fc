/// Platform fingerprint used for installer asset selection.
///
/// An asset is usable on a platform only when its name both ends with
/// the platform's installer extension and contains one of the
/// platform's identifier substrings.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Installer file extension including the leading dot, lowercase.
    pub installer_ext: String,
    /// Substrings identifying this platform in asset names, lowercase.
    pub identifiers: Vec<String>,
}

impl Platform {
    /// Detect the current platform.
    pub fn detect() -> Self {
        #[cfg(target_os = "macos")]
        {
            Self::new(".dmg", &["macos", "darwin", "osx"])
        }
        #[cfg(target_os = "windows")]
        {
            Self::new(".exe", &["windows", "win"])
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Self::new(".appimage", &["linux"])
        }
    }

    pub fn new(installer_ext: &str, identifiers: &[&str]) -> Self {
        Self {
            installer_ext: installer_ext.to_lowercase(),
            identifiers: identifiers.iter().map(|id| id.to_lowercase()).collect(),
        }
    }

    /// Check if an asset name is a usable installer for this platform.
    /// Both conditions must hold; matching is case-insensitive.
    pub fn matches(&self, asset_name: &str) -> bool {
        let name = asset_name.to_lowercase();

        name.ends_with(&self.installer_ext) && self.identifiers.iter().any(|id| name.contains(id))
    }
}

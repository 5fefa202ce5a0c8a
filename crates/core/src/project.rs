//! Gradle Project Introspection
//!
//! Pulls application identity out of the app module's build script without
//! invoking Gradle. Both Groovy (`applicationId "x"`) and Kotlin DSL
//! (`applicationId = "x"`) spellings are handled, as are the older
//! `minSdkVersion`-style keys.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

use crate::error::{DroidtailError, Result};

/// Build scripts probed under the project root, in order.
const BUILD_SCRIPTS: &[&str] = &["app/build.gradle", "app/build.gradle.kts"];

/// Identity fields extracted from the app module's build script.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    pub application_id: String,
    pub version_code: Option<u64>,
    pub version_name: Option<String>,
    pub min_sdk: Option<u32>,
    pub target_sdk: Option<u32>,
    pub compile_sdk: Option<u32>,
}

impl ProjectInfo {
    /// Load from the first build script found under `project_dir`.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = Self::find_build_script(project_dir).ok_or_else(|| {
            DroidtailError::NotFound(format!(
                "no app/build.gradle under {}",
                project_dir.display()
            ))
        })?;
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).ok_or_else(|| {
            DroidtailError::Project(format!("no applicationId in {}", path.display()))
        })
    }

    /// Locate the app module's build script under `project_dir`.
    pub fn find_build_script(project_dir: &Path) -> Option<PathBuf> {
        BUILD_SCRIPTS
            .iter()
            .map(|rel| project_dir.join(rel))
            .find(|path| path.exists())
    }

    /// Parse build script text; `None` when no applicationId is declared.
    pub fn parse(content: &str) -> Option<Self> {
        let application_id = find_field(content, "applicationId")?;
        Some(Self {
            application_id,
            version_code: find_field(content, "versionCode").and_then(|v| v.parse().ok()),
            version_name: find_field(content, "versionName"),
            min_sdk: find_field(content, "minSdk").and_then(|v| v.parse().ok()),
            target_sdk: find_field(content, "targetSdk").and_then(|v| v.parse().ok()),
            compile_sdk: find_field(content, "compileSdk").and_then(|v| v.parse().ok()),
        })
    }
}

/// Find a declaration like `key "value"`, `key value`, or `key = value`,
/// also trying the legacy `keyVersion` spelling. Groovy single quotes are
/// accepted too.
fn find_field(content: &str, key: &str) -> Option<String> {
    for candidate in [key.to_string(), format!("{key}Version")] {
        let pattern = format!(r#"{candidate}\b\s*=?\s*['"]?([\w.]+)['"]?"#);
        let re = Regex::new(&pattern).ok()?;
        if let Some(caps) = re.captures(content) {
            return Some(caps[1].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROOVY_BUILD: &str = r#"
plugins {
    id 'com.android.application'
}

android {
    namespace 'com.example.demo'
    compileSdk 35

    defaultConfig {
        applicationId "com.example.demo"
        minSdkVersion 21
        targetSdkVersion 35
        versionCode 7
        versionName "1.2.3"
    }
}
"#;

    const KTS_BUILD: &str = r#"
android {
    compileSdk = 34

    defaultConfig {
        applicationId = "dev.acme.widget"
        minSdk = 24
        targetSdk = 34
        versionCode = 12
        versionName = "0.9"
    }
}
"#;

    #[test]
    fn parses_groovy_build_script() {
        let info = ProjectInfo::parse(GROOVY_BUILD).unwrap();
        assert_eq!(info.application_id, "com.example.demo");
        assert_eq!(info.version_code, Some(7));
        assert_eq!(info.version_name.as_deref(), Some("1.2.3"));
        assert_eq!(info.min_sdk, Some(21));
        assert_eq!(info.target_sdk, Some(35));
        assert_eq!(info.compile_sdk, Some(35));
    }

    #[test]
    fn parses_kotlin_dsl_build_script() {
        let info = ProjectInfo::parse(KTS_BUILD).unwrap();
        assert_eq!(info.application_id, "dev.acme.widget");
        assert_eq!(info.version_code, Some(12));
        assert_eq!(info.min_sdk, Some(24));
        assert_eq!(info.compile_sdk, Some(34));
    }

    #[test]
    fn missing_application_id_is_none() {
        assert!(ProjectInfo::parse("android { compileSdk 34 }").is_none());
    }

    #[test]
    fn loads_from_project_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("app")).unwrap();
        std::fs::write(dir.path().join("app/build.gradle"), GROOVY_BUILD).unwrap();

        let info = ProjectInfo::load(dir.path()).unwrap();
        assert_eq!(info.application_id, "com.example.demo");
    }

    #[test]
    fn load_without_build_script_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ProjectInfo::load(dir.path()),
            Err(DroidtailError::NotFound(_))
        ));
    }
}

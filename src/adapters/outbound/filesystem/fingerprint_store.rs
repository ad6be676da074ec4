use super::artifact_writer::write_atomically;
use crate::ports::outbound::FingerprintStore;
use crate::sbom_generation::domain::{BuildKey, FingerprintRecord};
use crate::shared::error::SbomError;
use crate::shared::security::validate_regular_file;
use crate::shared::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// SidecarFingerprintStore keeps the fingerprint of the last write in a
/// hidden JSON file next to the artifact.
///
/// An unreadable or malformed side-car is treated as absent, which forces a
/// regeneration instead of failing the build.
pub struct SidecarFingerprintStore;

impl SidecarFingerprintStore {
    pub fn new() -> Self {
        Self
    }

    /// `.sbom-fingerprint.<project>.<configuration>.json` inside `directory`
    pub fn sidecar_path(directory: &Path, key: &BuildKey) -> PathBuf {
        directory.join(format!(
            ".sbom-fingerprint.{}.{}.json",
            sanitize(&key.project),
            sanitize(&key.configuration)
        ))
    }
}

impl Default for SidecarFingerprintStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintStore for SidecarFingerprintStore {
    fn load(&self, directory: &Path, key: &BuildKey) -> Result<Option<FingerprintRecord>> {
        let path = Self::sidecar_path(directory, key);
        if !path.exists() {
            return Ok(None);
        }
        validate_regular_file(&path, "fingerprint side-car")?;

        let content = fs::read_to_string(&path).map_err(|e| SbomError::FileReadError {
            path: path.clone(),
            details: e.to_string(),
        })?;
        Ok(serde_json::from_str(&content).ok())
    }

    fn save(&self, directory: &Path, key: &BuildKey, record: &FingerprintRecord) -> Result<()> {
        let path = Self::sidecar_path(directory, key);
        let json = serde_json::to_string_pretty(record)?;
        write_atomically(&path, json.as_bytes())
    }

    fn remove(&self, directory: &Path, key: &BuildKey) -> Result<bool> {
        let path = Self::sidecar_path(directory, key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SbomError::FileWriteError {
                path,
                details: e.to_string(),
            }
            .into()),
        }
    }
}

/// Keeps ASCII alphanumerics and `-`; every other byte becomes `_XX` (hex).
///
/// The mapping is injective, so distinct keys never share a side-car, and
/// `.` never appears inside a part.
fn sanitize(part: &str) -> String {
    let mut sanitized = String::with_capacity(part.len());
    for byte in part.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            sanitized.push(char::from(byte));
        } else {
            sanitized.push_str(&format!("_{:02X}", byte));
        }
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{Fingerprint, OutputFormat, SbomArtifact};
    use tempfile::TempDir;

    fn record(directory: &Path, hex: &str) -> FingerprintRecord {
        FingerprintRecord {
            fingerprint: Fingerprint::from_hex(hex),
            artifact: SbomArtifact::new(directory.join("sbom.json"), OutputFormat::Json, 42)
                .with_fingerprint(Fingerprint::from_hex(hex)),
            written_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = SidecarFingerprintStore::new();
        let key = BuildKey::new("App", "Debug");

        assert!(store.load(temp_dir.path(), &key).unwrap().is_none());

        let saved = record(temp_dir.path(), "abc123");
        store.save(temp_dir.path(), &key, &saved).unwrap();

        assert_eq!(store.load(temp_dir.path(), &key).unwrap(), Some(saved));
    }

    #[test]
    fn test_keys_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let store = SidecarFingerprintStore::new();
        let debug = BuildKey::new("App", "Debug");
        let release = BuildKey::new("App", "Release");

        store
            .save(temp_dir.path(), &debug, &record(temp_dir.path(), "aaa"))
            .unwrap();

        assert!(store.load(temp_dir.path(), &release).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_sidecar_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let key = BuildKey::new("App", "Debug");
        fs::write(
            SidecarFingerprintStore::sidecar_path(temp_dir.path(), &key),
            "{ not json",
        )
        .unwrap();

        let loaded = SidecarFingerprintStore::new()
            .load(temp_dir.path(), &key)
            .unwrap();

        assert!(loaded.is_none());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = SidecarFingerprintStore::new();
        let key = BuildKey::new("App", "Debug");

        assert!(!store.remove(temp_dir.path(), &key).unwrap());
        store
            .save(temp_dir.path(), &key, &record(temp_dir.path(), "abc"))
            .unwrap();
        assert!(store.remove(temp_dir.path(), &key).unwrap());
        assert!(store.load(temp_dir.path(), &key).unwrap().is_none());
    }

    #[test]
    fn test_sidecar_path_sanitizes_names() {
        let key = BuildKey::new("My App/../x", "Release|x64");
        let path = SidecarFingerprintStore::sidecar_path(Path::new("/out"), &key);
        assert_eq!(
            path,
            PathBuf::from("/out/.sbom-fingerprint.My_20App_2F_2E_2E_2Fx.Release_7Cx64.json")
        );
    }

    #[test]
    fn test_similar_keys_get_distinct_sidecars() {
        let dir = Path::new("/out");
        let paths = [
            SidecarFingerprintStore::sidecar_path(dir, &BuildKey::new("My App", "Debug")),
            SidecarFingerprintStore::sidecar_path(dir, &BuildKey::new("My_App", "Debug")),
            SidecarFingerprintStore::sidecar_path(dir, &BuildKey::new("a.b", "c")),
            SidecarFingerprintStore::sidecar_path(dir, &BuildKey::new("a", "b.c")),
        ];
        for (i, a) in paths.iter().enumerate() {
            for b in &paths[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_similar_keys_keep_separate_records() {
        let temp_dir = TempDir::new().unwrap();
        let store = SidecarFingerprintStore::new();
        let spaced = BuildKey::new("My App", "Debug");
        let underscored = BuildKey::new("My_App", "Debug");

        store
            .save(temp_dir.path(), &spaced, &record(temp_dir.path(), "aaaa"))
            .unwrap();
        store
            .save(temp_dir.path(), &underscored, &record(temp_dir.path(), "bbbb"))
            .unwrap();

        let loaded = store.load(temp_dir.path(), &spaced).unwrap().unwrap();
        assert_eq!(loaded, record(temp_dir.path(), "aaaa"));
    }
}

//! Example-data loader.
//!
//! Reads a JSON array of providers and feeds each entry through the normal
//! [`ProviderDirectory::add`] validation, so seeded data obeys the same rules
//! as data added over HTTP.

use std::path::Path;

use crate::directory::{NewProvider, ProviderDirectory};

/// Outcome of seeding a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub rejected: usize,
}

/// Errors that can occur when reading a seed file.
#[derive(Debug)]
pub enum SeedError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not a JSON array of providers.
    Json(serde_json::Error),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read seed file: {e}"),
            Self::Json(e) => write!(f, "invalid seed file: {e}"),
        }
    }
}

impl std::error::Error for SeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SeedError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Parse seed providers from a JSON string.
pub fn parse_seed(json: &str) -> Result<Vec<NewProvider>, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Read seed providers from a JSON file.
pub fn load_seed_file(path: &Path) -> Result<Vec<NewProvider>, SeedError> {
    let contents = std::fs::read_to_string(path)?;
    parse_seed(&contents)
}

/// Add every provider to the directory, skipping (and logging) invalid ones.
pub fn seed_directory(directory: &mut ProviderDirectory, providers: Vec<NewProvider>) -> SeedReport {
    let mut report = SeedReport::default();
    for provider in providers {
        match directory.add(provider) {
            Ok(_) => report.inserted += 1,
            Err(e) => {
                tracing::warn!("skipping seed entry: {e}");
                report.rejected += 1;
            }
        }
    }
    tracing::info!(
        "seeded {} providers ({} rejected)",
        report.inserted,
        report.rejected
    );
    report
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SEED: &str = r#"[
        {"id": 1, "name": "Ana", "service_type": "Plumber", "rating": 4.5, "location": "Lima"},
        {"id": 2, "name": "Beto", "service_type": "Electrician", "rating": 3, "location": "Cusco"},
        {"id": 1, "name": "Dup", "service_type": "Plumber", "rating": 4, "location": "Lima"},
        {"id": 3, "name": "Carla", "service_type": "Painter", "rating": 9, "location": "Lima"},
        {"id": 4, "name": "Dora", "service_type": "Painter", "location": "Quito"}
    ]"#;

    #[test]
    fn test_parse_seed_keeps_missing_fields_as_none() {
        let providers = parse_seed(SEED).expect("parse");
        assert_eq!(providers.len(), 5);
        assert_eq!(providers[4].rating, None);
        assert_eq!(providers[0].name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_seed_directory_skips_invalid_entries() {
        let mut directory = ProviderDirectory::new(3).expect("create directory");
        let report = seed_directory(&mut directory, parse_seed(SEED).expect("parse"));

        assert_eq!(
            report,
            SeedReport {
                inserted: 2,
                rejected: 3
            }
        );
        assert_eq!(directory.len(), 2);
        assert_eq!(
            directory.find_by_id(1).value.map(|p| p.name),
            Some("Ana".to_string())
        );
    }

    #[test]
    fn test_load_seed_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SEED.as_bytes()).expect("write seed");

        let providers = load_seed_file(file.path()).expect("load");
        assert_eq!(providers.len(), 5);
    }

    #[test]
    fn test_bundled_sample_file_seeds_cleanly() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/providers.json");
        let providers = load_seed_file(&path).expect("load bundled sample");

        let mut directory = ProviderDirectory::new(3).expect("create directory");
        let report = seed_directory(&mut directory, providers);

        assert_eq!(
            report,
            SeedReport {
                inserted: 8,
                rejected: 0
            }
        );
        assert_eq!(directory.len(), 8);
    }

    #[test]
    fn test_load_seed_file_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = load_seed_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(SeedError::Io(_))));

        let malformed = parse_seed(r#"{"id": 1}"#);
        assert!(matches!(malformed, Err(SeedError::Json(_))));
    }
}

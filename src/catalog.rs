//! Catalog persistence: the JSON snapshot bridging the aggregation run and
//! the lookup service.
//!
//! The catalog is a flat, fully-rewritten array of stations. Writes are
//! atomic (temp file plus rename in the target directory) so a crashed run
//! never leaves a truncated catalog for the service to trip over. Loading
//! distinguishes a missing file from a malformed one; both are fatal for the
//! service, which must not start serving an empty or partial catalog
//! silently.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::station::Station;

/// Why a catalog could not be loaded. Both variants are fatal at service
/// startup; the split exists so the operator message can say which it was.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog file not found at {path} (run `bandscan aggregate` first)")]
    NotFound { path: String },
    #[error("catalog file {path} is not valid JSON: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("reading catalog file {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Serialize the aggregated sequence to `path`, atomically.
///
/// The emission order of the sources is preserved as-is; the name-keyed merge
/// happens at load time. Failure here is fatal to the run.
pub fn write(path: &Path, stations: &[Station]) -> Result<()> {
    let json = serde_json::to_vec_pretty(stations).context("serializing catalog")?;

    // Same-directory temp file so the rename cannot cross filesystems
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("moving catalog into place at {}", path.display()))?;

    info!(path = %path.display(), count = stations.len(), "Catalog written");
    Ok(())
}

/// Load the catalog sequence back from `path`.
pub fn load(path: &Path) -> Result<Vec<Station>, CatalogError> {
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CatalogError::NotFound { path: display.clone() }
        } else {
            CatalogError::Io { path: display.clone(), source: e }
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|e| CatalogError::Malformed {
        path: display,
        source: e,
    })
}

/// Name-keyed view of the catalog. Later entries overwrite earlier ones with
/// the same name, whole record at a time — this is the identity contract, not
/// a field-wise merge.
#[must_use]
pub fn index_by_name(stations: Vec<Station>) -> HashMap<String, Station> {
    stations
        .into_iter()
        .map(|station| (station.name.clone(), station))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;

    use crate::station::Station;

    struct TempPath(PathBuf);

    impl TempPath {
        fn new(name: &str) -> Self {
            let path = env::temp_dir().join(format!(
                "bandscan-test-{}-{name}.json",
                std::process::id()
            ));
            Self(path)
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
            let _ = fs::remove_file(self.0.with_extension("json.tmp"));
        }
    }

    fn playable(name: &str, stream: &str) -> Station {
        Station {
            stream: stream.to_string(),
            playable: true,
            ..Station::unresolved(name)
        }
    }

    #[test]
    fn write_then_load_round_trips() {
        let tmp = TempPath::new("roundtrip");
        let stations = vec![
            playable("Radio Paradise", "http://stream-uk1.radioparadise.com/aac-320"),
            Station::unresolved("City FM"),
        ];
        write(&tmp.0, &stations).unwrap();
        assert_eq!(load(&tmp.0).unwrap(), stations);
    }

    #[test]
    fn write_is_deterministic_for_identical_input() {
        let tmp_a = TempPath::new("det-a");
        let tmp_b = TempPath::new("det-b");
        let stations = vec![playable("A", "http://a.example/s.mp3"), Station::unresolved("B")];
        write(&tmp_a.0, &stations).unwrap();
        write(&tmp_b.0, &stations).unwrap();
        assert_eq!(fs::read(&tmp_a.0).unwrap(), fs::read(&tmp_b.0).unwrap());
    }

    #[test]
    fn no_temp_file_remains_after_write() {
        let tmp = TempPath::new("no-tmp");
        write(&tmp.0, &[Station::unresolved("A")]).unwrap();
        assert!(!tmp.0.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load(Path::new("/nonexistent/bandscan-catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[test]
    fn garbage_file_is_malformed() {
        let tmp = TempPath::new("garbage");
        fs::write(&tmp.0, b"not json {{{").unwrap();
        let err = load(&tmp.0).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }

    #[test]
    fn index_applies_last_write_wins_whole_record() {
        let early = playable("Radio Paradise", "http://early.example/a.mp3");
        let late = Station {
            genre: "Eclectic".to_string(),
            ..playable("Radio Paradise", "http://late.example/b.mp3")
        };
        let index = index_by_name(vec![early, late.clone(), Station::unresolved("Other")]);
        assert_eq!(index.len(), 2);
        // Whole record, never a field-wise blend
        assert_eq!(index["Radio Paradise"], late);
    }
}

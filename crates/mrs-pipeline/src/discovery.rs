//! Report/mapper pair discovery

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{Error, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A mapping report and the mapper found next to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePair {
    pub report: PathBuf,
    /// First `*.xml` in the report's directory, if any
    pub mapper: Option<PathBuf>,
}

impl FilePair {
    pub fn new(report: impl Into<PathBuf>, mapper: impl Into<PathBuf>) -> Self {
        Self {
            report: report.into(),
            mapper: Some(mapper.into()),
        }
    }
}

/// Every `*.txt` report below `dir` (recursively, any case), sorted, each
/// paired with the first `*.xml` of its own directory.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] for a non-UTF-8 directory and
/// [`Error::Discovery`] when a directory cannot be listed.
pub fn discover_pairs(dir: impl AsRef<Path>) -> Result<Vec<FilePair>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Discovery(format!("'{}' is not a directory", dir.display())));
    }

    let reports = matching(dir, "**/*.txt")?;
    let mut pairs = Vec::with_capacity(reports.len());
    for report in reports {
        let parent = report.parent().unwrap_or(dir);
        let mapper = matching(parent, "*.xml")?.into_iter().next();
        match &mapper {
            Some(mapper) => debug!(report = %report.display(), mapper = %mapper.display(), "Found pair"),
            None => warn!(report = %report.display(), "No mapper XML next to report"),
        }
        pairs.push(FilePair { report, mapper });
    }

    debug!(dir = %dir.display(), pairs = pairs.len(), "Discovery finished");
    Ok(pairs)
}

fn matching(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let base = dir
        .to_str()
        .ok_or_else(|| Error::InvalidPath(dir.display().to_string()))?;
    let full = format!("{}/{pattern}", Pattern::escape(base));

    let mut paths = glob::glob_with(&full, MATCH_OPTIONS)
        .map_err(|e| Error::Discovery(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Discovery(e.to_string()))?;
    paths.retain(|path| path.is_file());
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn pairs_reports_with_first_sibling_mapper() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a/PO_850_IN.txt"));
        touch(&root.join("a/z_map.xml"));
        touch(&root.join("a/B_MAP.XML"));
        touch(&root.join("b/nested/INV_OUT_810.TXT"));
        touch(&root.join("b/nested/inv.xml"));
        touch(&root.join("c/ORPHAN_IN.txt"));
        touch(&root.join("notes.md"));

        let pairs = discover_pairs(root).unwrap();
        assert_eq!(pairs.len(), 3);

        assert_eq!(pairs[0].report, root.join("a/PO_850_IN.txt"));
        assert_eq!(pairs[0].mapper.as_deref(), Some(root.join("a/B_MAP.XML").as_path()));
        assert_eq!(pairs[1].report, root.join("b/nested/INV_OUT_810.TXT"));
        assert_eq!(pairs[1].mapper.as_deref(), Some(root.join("b/nested/inv.xml").as_path()));
        assert_eq!(pairs[2].report, root.join("c/ORPHAN_IN.txt"));
        assert_eq!(pairs[2].mapper, None);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_pairs(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, Error::Discovery(_)));
    }

    #[test]
    fn directory_names_with_glob_characters_are_literal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("run [1]");
        touch(&root.join("X_IN.txt"));
        touch(&root.join("x.xml"));

        let pairs = discover_pairs(&root).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].mapper.is_some());
    }
}

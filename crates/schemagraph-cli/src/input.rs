//! Loading catalogs from snapshot files.

use schemagraph_core::{infer_weak_associations, load_snapshot, Catalog, Error};
use std::path::Path;
use tracing::info;

/// Load a snapshot and build its catalog, optionally running weak
/// association inference over the snapshot's candidates.
pub fn load_catalog(path: &Path, infer: bool) -> Result<Catalog, Error> {
    let snapshot = load_snapshot(path)?;
    let candidates = snapshot.weak_associations.clone();
    let mut catalog = snapshot.into_catalog()?;

    if infer && !candidates.is_empty() {
        infer_weak_associations(&mut catalog, &candidates);
    }

    info!(
        path = %path.display(),
        tables = catalog.full_tables().count(),
        "Loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "tables": [
            {"schema": "HR", "name": "DEPT", "columns": [{"name": "ID", "type": "INTEGER"}]},
            {"schema": "HR", "name": "EMP", "columns": [
                {"name": "ID", "type": "INTEGER"},
                {"name": "DEPT_ID", "type": "INTEGER"}
            ]}
        ],
        "weak_associations": [
            {"primary_key_column": "HR.DEPT.ID", "foreign_key_column": "HR.EMP.DEPT_ID"}
        ]
    }"#;

    fn snapshot_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_with_inference() {
        let file = snapshot_file();
        let catalog = load_catalog(file.path(), true).unwrap();

        let names: Vec<_> = catalog.weak_associations().iter().map(|w| w.name()).collect();
        assert_eq!(names, vec!["SC_6F563CA9_7F7669C4"]);
    }

    #[test]
    fn test_load_without_inference() {
        let file = snapshot_file();
        let catalog = load_catalog(file.path(), false).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.weak_associations().is_empty());
    }

    #[test]
    fn test_missing_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load_catalog(&dir.path().join("none.json"), true).unwrap();

        assert!(catalog.is_empty());
    }
}

//! SQLite-specific DSN helpers.

use std::path::Path;

/// True for `sqlite::memory:` style DSNs and `mode=memory` URIs.
pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Strip the `sqlite:` scheme and any query string, returning the file path part.
fn file_part(dsn: &str) -> &str {
    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);
    rest.split('?').next().unwrap_or(rest)
}

/// Normalize a `SQLite` DSN so the file is created if missing, optionally
/// creating its parent directory.
pub fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> std::io::Result<String> {
    let dsn = dsn.trim();
    if is_memory_dsn(dsn) {
        return Ok(dsn.to_owned());
    }

    let path = file_part(dsn);
    if create_dirs
        && let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    if dsn.contains("mode=") {
        Ok(dsn.to_owned())
    } else if dsn.contains('?') {
        Ok(format!("{dsn}&mode=rwc"))
    } else {
        Ok(format!("{dsn}?mode=rwc"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_dsns_are_detected() {
        assert!(is_memory_dsn("sqlite::memory:"));
        assert!(is_memory_dsn("sqlite://file:blog?mode=memory&cache=shared"));
        assert!(!is_memory_dsn("sqlite://data/blog.db"));
    }

    #[test]
    fn test_file_dsn_gets_create_mode() {
        let out = prepare_sqlite_path("sqlite:blog.db", false).unwrap_or_default();
        assert_eq!(out, "sqlite:blog.db?mode=rwc");

        let out = prepare_sqlite_path("sqlite:blog.db?cache=shared", false).unwrap_or_default();
        assert_eq!(out, "sqlite:blog.db?cache=shared&mode=rwc");
    }

    #[test]
    fn test_parent_directory_is_created() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let db = dir.path().join("nested").join("blog.db");
        let dsn = format!("sqlite://{}", db.display());

        let out = prepare_sqlite_path(&dsn, true).unwrap_or_default();
        assert!(out.ends_with("?mode=rwc"));
        assert!(dir.path().join("nested").is_dir());
    }
}

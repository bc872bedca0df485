//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find a config file by walking up from `start`.
///
/// An absolute `config_name` is returned as-is when it exists.
///
/// ```text
/// /home/user/lesson/src/       ← start
/// /home/user/lesson/playpen.toml  ← found
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("playpen.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("playpen.toml")).unwrap();
        assert_eq!(found, dir.path().join("playpen.toml"));
    }

    #[test]
    fn test_absolute_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(find_config_file(dir.path(), &missing), None);

        fs::write(&missing, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &missing), Some(missing));
    }
}

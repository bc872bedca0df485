//! Reading buffers from source files and writing them back out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::SourceArgs;
use crate::buffer::{Buffers, Language};

/// File names used when buffers are written into a directory.
pub fn file_name(language: Language) -> &'static str {
    match language {
        Language::Html => "index.html",
        Language::Css => "style.css",
        Language::Js => "script.js",
    }
}

impl SourceArgs {
    pub fn path(&self, language: Language) -> Option<&Path> {
        match language {
            Language::Html => self.html.as_deref(),
            Language::Css => self.css.as_deref(),
            Language::Js => self.js.as_deref(),
        }
    }

    /// Languages with a source file, and their paths.
    pub fn files(&self) -> impl Iterator<Item = (Language, &Path)> {
        Language::ALL
            .into_iter()
            .filter_map(|language| self.path(language).map(|path| (language, path)))
    }

    pub fn read(&self) -> Result<Buffers> {
        let mut buffers = Buffers::default();
        for (language, path) in self.files() {
            let text = read_source(path)?;
            match language {
                Language::Html => buffers.html = text,
                Language::Css => buffers.css = text,
                Language::Js => buffers.js = text,
            }
        }
        Ok(buffers)
    }
}

pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write buffers as `index.html`, `style.css` and `script.js` under `dir`.
pub fn write_buffers(dir: &Path, buffers: &Buffers) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Language::ALL
        .into_iter()
        .map(|language| {
            let path = dir.join(file_name(language));
            fs::write(&path, buffers.get(language))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

/// Print buffers as a JSON object on stdout.
pub fn print_buffers(buffers: &Buffers) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(buffers)?);
    Ok(())
}

/// Write to `dir` when given, otherwise print.
pub fn emit_buffers(dir: Option<&Path>, buffers: &Buffers) -> Result<()> {
    match dir {
        Some(dir) => {
            for path in write_buffers(dir, buffers)? {
                crate::log!("write"; "{}", path.display());
            }
            Ok(())
        }
        None => print_buffers(buffers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_sources_are_empty() {
        let dir = TempDir::new().unwrap();
        let js = dir.path().join("main.js");
        fs::write(&js, "console.log(1)").unwrap();

        let args = SourceArgs {
            js: Some(js),
            ..Default::default()
        };
        let buffers = args.read().unwrap();
        assert_eq!(buffers, Buffers::new("", "", "console.log(1)"));
    }

    #[test]
    fn test_read_reports_unreadable_file() {
        let args = SourceArgs {
            css: Some(PathBuf::from("/definitely/not/here.css")),
            ..Default::default()
        };
        let err = args.read().unwrap_err();
        assert!(err.to_string().contains("here.css"));
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = TempDir::new().unwrap();
        let buffers = Buffers::new("<p>a</p>", "p{}", "1");
        let paths = write_buffers(dir.path(), &buffers).unwrap();
        assert_eq!(paths.len(), 3);

        let args = SourceArgs {
            html: Some(dir.path().join("index.html")),
            css: Some(dir.path().join("style.css")),
            js: Some(dir.path().join("script.js")),
        };
        assert_eq!(args.read().unwrap(), buffers);
    }
}

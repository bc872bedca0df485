//! `playpen build`: write the preview document without running it.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::SourceArgs;
use crate::config::PlaypenConfig;
use crate::log;
use crate::preview::DocumentBuilder;

pub fn build_document(
    config: &PlaypenConfig,
    sources: &SourceArgs,
    output: Option<&Path>,
) -> Result<()> {
    let buffers = sources.read()?;
    let document =
        DocumentBuilder::new(&config.preview.title).build(&buffers.html, &buffers.css, &buffers.js);

    let Some(output) = output else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(document.as_str().as_bytes())?;
        return stdout.flush().map_err(Into::into);
    };

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, document.as_str())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log!("build"; "wrote {} ({} bytes)", output.display(), document.as_str().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_writes_document() {
        let dir = TempDir::new().unwrap();
        let js = dir.path().join("a.js");
        fs::write(&js, "console.log('x')").unwrap();
        let output = dir.path().join("out/preview.html");

        let sources = SourceArgs {
            js: Some(js),
            ..Default::default()
        };
        build_document(&PlaypenConfig::default(), &sources, Some(&output)).unwrap();

        let html = fs::read_to_string(output).unwrap();
        assert!(html.contains("console.log('x')"));
        assert!(html.contains("<title>Preview</title>"));
    }
}

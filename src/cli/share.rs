//! `playpen share encode|decode`.

use std::path::Path;

use anyhow::{Context, Result};

use super::SourceArgs;
use super::sources::emit_buffers;
use crate::buffer::Buffers;
use crate::config::PlaypenConfig;
use crate::persist::{decode_share, share_url, token_from_url};

/// Print a share link for the source files.
pub fn encode_link(config: &PlaypenConfig, sources: &SourceArgs) -> Result<()> {
    let buffers = sources.read()?;
    let base = config
        .share
        .base_url()
        .context("Invalid share.base_url")?;
    println!("{}", share_url(&base, &config.share.param, &buffers));
    Ok(())
}

/// Decode a token or link, then write or print its buffers.
pub fn decode_link(config: &PlaypenConfig, input: &str, output: Option<&Path>) -> Result<()> {
    let buffers = decode_input(input, &config.share.param)?;
    emit_buffers(output, &buffers)
}

/// Accept either a bare token or a link carrying one in `param`.
pub fn decode_input(input: &str, param: &str) -> Result<Buffers> {
    let input = input.trim();
    let token = if input.contains("://") {
        token_from_url(input, param)?
    } else {
        input.to_string()
    };
    decode_share(&token).context("Failed to decode share token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::encode_share;

    #[test]
    fn test_decode_input_accepts_token_and_link() {
        let buffers = Buffers::new("<b>x</b>", "", "alert(1)");
        let token = encode_share(&buffers);
        let link = format!("https://playground.local/?code={token}");

        assert_eq!(decode_input(&token, "code").unwrap(), buffers);
        assert_eq!(decode_input(&link, "code").unwrap(), buffers);
        assert!(decode_input(&link, "other").is_err());
    }
}

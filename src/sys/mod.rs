//! Host platform interaction: handing URLs to the system opener.

use std::process::{Command, Stdio};

use crate::error::{Context, Result};

/// Something that can open a URL outside the TUI.
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        let (program, args) = opener_command(url);
        let status = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_ctx(|| format!("failed to execute {program}"))?;
        if status.success() {
            Ok(())
        } else {
            Err(crate::error::simple_error(format!(
                "{program} exited with {status} while opening {url}"
            )))
        }
    }
}

fn opener_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        // empty title argument so `start` does not treat the URL as one
        ("cmd", vec!["/C".into(), "start".into(), String::new(), url.to_string()])
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_passes_url_last() {
        let (_, args) = opener_command("https://example.org");
        assert_eq!(args.last().map(String::as_str), Some("https://example.org"));
    }
}

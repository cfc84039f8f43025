use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config;
use crate::detect::{self, Detection};

/// Label the canonical target encoding reports under.
pub const CANONICAL_LABEL: &str = "UTF-8";

/// Per-file failure taxonomy. No variant is fatal to a run.
#[derive(Debug, Error)]
pub enum RecodeError {
    #[error("cannot read: {0}")]
    Open(#[source] io::Error),
    #[error("{encoding} bytes do not decode cleanly; file left unchanged")]
    Transcode { encoding: &'static str },
    #[error("cannot overwrite: {0}")]
    Write(#[source] io::Error),
}

/// What happened to a single candidate file.
#[derive(Debug)]
pub enum Outcome {
    /// Extension not in the recognized set; untouched and unreported.
    Skipped,
    /// Already in the target encoding (`Some` label) or nothing was
    /// detectable (`None`); untouched either way.
    AlreadyCanonical { encoding: Option<&'static str> },
    /// Rewritten in place as UTF-8.
    Converted { from: &'static str },
    /// Dry-run stand-in for `Converted`.
    WouldConvert { from: &'static str },
    /// Open, transcode, or write failure.
    Failed(RecodeError),
}

/// Conversion knobs shared by every file in a run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub extensions: Vec<String>,
    pub dry_run: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            extensions: config::DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
            dry_run: false,
        }
    }
}

/// Convert one file to UTF-8 in place.
///
/// The write happens only after a clean strict decode, so a failed file
/// keeps its original bytes. Everything is buffered; files are assumed to
/// be source-code sized.
pub fn convert_file(path: &Path, opts: &ConvertOptions) -> Outcome {
    if !has_matched_extension(path, &opts.extensions) {
        return Outcome::Skipped;
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => return Outcome::Failed(RecodeError::Open(err)),
    };

    match detect::detect(&bytes) {
        Detection::Inconclusive => Outcome::AlreadyCanonical { encoding: None },
        Detection::Canonical => Outcome::AlreadyCanonical {
            encoding: Some(CANONICAL_LABEL),
        },
        Detection::Legacy(encoding) => {
            // BOM-sniffing decode: a UTF-16 BOM both picks the codec and
            // gets stripped from the output.
            let (text, used, had_errors) = encoding.decode(&bytes);
            if had_errors {
                return Outcome::Failed(RecodeError::Transcode {
                    encoding: used.name(),
                });
            }
            debug!("{}: decoded as {}", path.display(), used.name());
            if opts.dry_run {
                return Outcome::WouldConvert { from: used.name() };
            }
            match fs::write(path, text.as_bytes()) {
                Ok(()) => Outcome::Converted { from: used.name() },
                Err(err) => Outcome::Failed(RecodeError::Write(err)),
            }
        }
    }
}

/// Case-sensitive suffix match of the file name against the recognized set.
fn has_matched_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

//! Output locations: where the SVG and PNG artifacts of each page land.
//!
//! Both directories are an explicit value threaded through
//! [`crate::config::RenderConfig`] rather than fixed paths relative to the
//! process working directory, so tests and library callers can point them at
//! a temp dir.

use crate::error::RenderError;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default vector-output directory name.
pub const SVG_DIR: &str = "svg";
/// Default raster-output directory name.
pub const PNG_DIR: &str = "png";

/// The pair of directories artifacts are written into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDirs {
    pub vector: PathBuf,
    pub raster: PathBuf,
}

impl Default for OutputDirs {
    /// `svg/` and `png/` relative to the working directory.
    fn default() -> Self {
        Self {
            vector: PathBuf::from(SVG_DIR),
            raster: PathBuf::from(PNG_DIR),
        }
    }
}

impl OutputDirs {
    /// `svg/` and `png/` under `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            vector: root.join(SVG_DIR),
            raster: root.join(PNG_DIR),
        }
    }

    /// Create both directories if they are missing.
    ///
    /// Safe to call any number of times. A path that already exists as a
    /// directory is fine; anything else (permissions, a regular file in the
    /// way, an invalid path) is an error.
    pub fn ensure(&self) -> Result<(), RenderError> {
        for dir in [&self.vector, &self.raster] {
            ensure_dir(dir)?;
        }
        Ok(())
    }

    /// Artifact paths for zero-based page `page_index` of the PDF at `pdf_path`.
    pub fn artifact_paths(&self, pdf_path: &Path, page_index: usize) -> ArtifactPaths {
        let base = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        ArtifactPaths {
            svg: self.vector.join(format!("{base}_{page_index:02}.svg")),
            png: self.raster.join(format!("{base}_{page_index:02}.png")),
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<(), RenderError> {
    match std::fs::create_dir_all(dir) {
        Ok(()) if dir.is_dir() => {
            debug!("Output directory ready: {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Ok(()) => Err(RenderError::OutputDirectory {
            path: dir.to_path_buf(),
            source: std::io::Error::new(ErrorKind::AlreadyExists, "path exists but is not a directory"),
        }),
        Err(source) => Err(RenderError::OutputDirectory {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// The two files written for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub svg: PathBuf,
    pub png: PathBuf,
}

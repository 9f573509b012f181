//! Configuration types for a render run.
//!
//! Two records, two audiences:
//!
//! * [`ExtractionConfig`] — tuning knobs for the table extractor, supplied by
//!   the operator as a JSON object (`--config '{"n_glyph_row_threshold": 4}'`).
//!   Every field is optional; unset fields fall back to the extractor's
//!   defaults. Unknown keys are rejected up front instead of surfacing later
//!   as a confusing extractor failure.
//! * [`RenderConfig`] — where artifacts go and what gets printed, built via
//!   [`RenderConfigBuilder`].

use crate::error::RenderError;
use crate::output::OutputDirs;
use serde::{Deserialize, Serialize};

/// Default minimum number of glyphs stacked in an x-band to form a column.
pub const DEFAULT_GLYPH_COLUMN_THRESHOLD: u32 = 3;
/// Default minimum number of glyphs sharing a baseline to form a row.
pub const DEFAULT_GLYPH_ROW_THRESHOLD: u32 = 5;

/// Extraction parameters, deserialised from the `--config` JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Minimum glyphs stacked in an x-band for it to count as a column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_glyph_column_threshold: Option<u32>,

    /// Minimum glyphs on one baseline for it to count as a table row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_glyph_row_threshold: Option<u32>,

    /// Text that marks the first row of the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_top_hint: Option<String>,

    /// Text that marks the last row of the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_bottom_hint: Option<String>,

    /// One cell per glyph run instead of merging runs that share a column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atomise: Option<bool>,

    /// Stretch the table box over the full vertical extent of the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_y: Option<bool>,
}

impl ExtractionConfig {
    /// Parse and validate a JSON object.
    ///
    /// # Errors
    /// [`RenderError::ConfigParse`] on malformed JSON, wrong value types,
    /// unknown keys, or a zero threshold.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let parse_err = |e: serde_json::Error| RenderError::ConfigParse {
            detail: e.to_string(),
        };

        let value: serde_json::Value = serde_json::from_str(json).map_err(parse_err)?;
        if !value.is_object() {
            return Err(RenderError::ConfigParse {
                detail: format!("expected a JSON object, got {json}"),
            });
        }

        let config: Self = serde_json::from_value(value).map_err(parse_err)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RenderError> {
        for (key, value) in [
            ("n_glyph_column_threshold", self.n_glyph_column_threshold),
            ("n_glyph_row_threshold", self.n_glyph_row_threshold),
        ] {
            if value == Some(0) {
                return Err(RenderError::ConfigParse {
                    detail: format!("{key} must be ≥ 1"),
                });
            }
        }
        Ok(())
    }

    pub fn glyph_column_threshold(&self) -> usize {
        self.n_glyph_column_threshold
            .unwrap_or(DEFAULT_GLYPH_COLUMN_THRESHOLD) as usize
    }

    pub fn glyph_row_threshold(&self) -> usize {
        self.n_glyph_row_threshold
            .unwrap_or(DEFAULT_GLYPH_ROW_THRESHOLD) as usize
    }

    pub fn atomise(&self) -> bool {
        self.atomise.unwrap_or(false)
    }

    pub fn extend_y(&self) -> bool {
        self.extend_y.unwrap_or(false)
    }
}

/// Settings for a render run, shared by every input document.
///
/// # Example
/// ```rust
/// use pdftables_render::RenderConfig;
///
/// let config = RenderConfig::builder()
///     .output_root("debug-out")
///     .show_ascii(true)
///     .build()
///     .unwrap();
/// assert!(config.output_dirs.vector.ends_with("svg"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Where SVG and PNG artifacts are written. Default: `svg/` and `png/`.
    pub output_dirs: OutputDirs,

    /// Longest edge of the raster artifact in pixels. Range: 100–10 000. Default: 1600.
    pub max_rendered_pixels: u32,

    /// Emit an ASCII rendering of every table. Default: false.
    pub show_ascii: bool,

    /// Emit a structured dump of every table's data. Default: false.
    pub pretty_print: bool,

    /// Call the inspection hook after every page. Default: false.
    pub interactive: bool,

    /// Extraction parameters passed to the table extractor.
    pub extraction: ExtractionConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dirs: OutputDirs::default(),
            max_rendered_pixels: 1600,
            show_ascii: false,
            pretty_print: false,
            interactive: false,
            extraction: ExtractionConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn output_dirs(mut self, dirs: OutputDirs) -> Self {
        self.config.output_dirs = dirs;
        self
    }

    /// Put `svg/` and `png/` under `root`.
    pub fn output_root(mut self, root: impl AsRef<std::path::Path>) -> Self {
        self.config.output_dirs = OutputDirs::under(root);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px;
        self
    }

    pub fn show_ascii(mut self, v: bool) -> Self {
        self.config.show_ascii = v;
        self
    }

    pub fn pretty_print(mut self, v: bool) -> Self {
        self.config.pretty_print = v;
        self
    }

    pub fn interactive(mut self, v: bool) -> Self {
        self.config.interactive = v;
        self
    }

    pub fn extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.config.extraction = extraction;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, RenderError> {
        let c = &self.config;
        if !(100..=10_000).contains(&c.max_rendered_pixels) {
            return Err(RenderError::ConfigParse {
                detail: format!(
                    "max rendered pixels must be 100–10000, got {}",
                    c.max_rendered_pixels
                ),
            });
        }
        c.extraction.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = ExtractionConfig::from_json("{}").unwrap();
        assert_eq!(config, ExtractionConfig::default());
        assert_eq!(config.glyph_column_threshold(), 3);
        assert_eq!(config.glyph_row_threshold(), 5);
        assert!(!config.atomise());
    }

    #[test]
    fn known_keys_are_parsed() {
        let config = ExtractionConfig::from_json(
            r#"{ "n_glyph_column_threshold": 2, "n_glyph_row_threshold": 4, "table_top_hint": "Name" }"#,
        )
        .unwrap();
        assert_eq!(config.glyph_column_threshold(), 2);
        assert_eq!(config.glyph_row_threshold(), 4);
        assert_eq!(config.table_top_hint.as_deref(), Some("Name"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = ExtractionConfig::from_json(r#"{ "n_glyph_colum_threshold": 2 }"#).unwrap_err();
        match err {
            RenderError::ConfigParse { detail } => {
                assert!(detail.contains("n_glyph_colum_threshold"), "got: {detail}")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn invalid_json_and_types_are_rejected() {
        assert!(matches!(
            ExtractionConfig::from_json("{ not json"),
            Err(RenderError::ConfigParse { .. })
        ));
        assert!(matches!(
            ExtractionConfig::from_json(r#"{ "atomise": "yes" }"#),
            Err(RenderError::ConfigParse { .. })
        ));
        assert!(matches!(
            ExtractionConfig::from_json("[1, 2]"),
            Err(RenderError::ConfigParse { .. })
        ));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        assert!(matches!(
            ExtractionConfig::from_json(r#"{ "n_glyph_row_threshold": 0 }"#),
            Err(RenderError::ConfigParse { .. })
        ));
    }

    #[test]
    fn builder_validates_pixels() {
        assert!(RenderConfig::builder().max_rendered_pixels(50).build().is_err());
        let config = RenderConfig::builder()
            .max_rendered_pixels(800)
            .pretty_print(true)
            .build()
            .unwrap();
        assert_eq!(config.max_rendered_pixels, 800);
        assert!(config.pretty_print);
        assert!(!config.show_ascii);
    }
}

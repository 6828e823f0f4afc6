//! Rendering palette colours through TOML templates into artifacts.
//!
//! A template is a flat TOML table mapping config keys to dotted colour
//! paths:
//!
//! ```toml
//! background = "base.bg"
//! color0 = "normal.black"
//! ```
//!
//! Each entry becomes one `key<separator>value` line, where the value is
//! looked up in `themes/<palette>/colors.json`.
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{AutoconfError, ConfigError, RenderError};

/// Extension appended to output names whose template stem has no dot.
const DEFAULT_EXTENSION: &str = "conf";

/// Where to read colours and templates from and where to write artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Palette name, used as the output filename prefix.
    pub palette: String,
    /// `colors.json` of the palette.
    pub colors: PathBuf,
    /// Template file, or directory searched recursively for `*.toml`.
    pub templates: PathBuf,
    /// Existing directory receiving the artifacts.
    pub output_dir: PathBuf,
    /// Text between key and value on each line.
    pub separator: String,
}

impl RenderJob {
    /// Default locations for `app` and `palette`, with optional overrides.
    #[must_use]
    pub fn for_app(
        config: &Config,
        app: &str,
        palette: &str,
        template: Option<&Path>,
        output: Option<&Path>,
    ) -> Self {
        let app_dir = config.app_dir(app);
        let separator = config
            .registry
            .get(app)
            .map_or(" ", |s| s.separator())
            .to_string();
        Self {
            palette: palette.to_string(),
            colors: config
                .config_dir
                .join("themes")
                .join(palette)
                .join("colors.json"),
            templates: template.map_or_else(|| app_dir.join("templates"), Path::to_path_buf),
            output_dir: output.map_or_else(|| app_dir.join("generated"), Path::to_path_buf),
            separator,
        }
    }
}

/// One written artifact.
#[derive(Debug)]
pub struct RenderedFile {
    /// Template the artifact was rendered from.
    pub template: PathBuf,
    /// Path of the written artifact.
    pub output: PathBuf,
    /// Number of lines written.
    pub lines: usize,
    /// Entries left out of the output.
    pub skipped: Vec<RenderError>,
}

/// Render every template of `job` and write the artifacts.
///
/// # Errors
///
/// Fails before writing anything if the colours file, the template path or
/// the output directory is missing, and on the first unreadable or
/// malformed template.
pub fn generate(job: &RenderJob) -> Result<Vec<RenderedFile>, AutoconfError> {
    if !job.colors.is_file() {
        return Err(ConfigError::NotFound {
            what: "palette colors".to_string(),
            path: job.colors.clone(),
        }
        .into());
    }
    if !job.templates.exists() {
        return Err(ConfigError::NotFound {
            what: "template path".to_string(),
            path: job.templates.clone(),
        }
        .into());
    }
    if !job.output_dir.is_dir() {
        return Err(ConfigError::NotFound {
            what: "output directory".to_string(),
            path: job.output_dir.clone(),
        }
        .into());
    }

    let colors: Value = serde_json::from_str(&read(&job.colors)?).map_err(|e| {
        RenderError::InvalidTemplate {
            path: job.colors.clone(),
            message: e.to_string(),
        }
    })?;

    let mut rendered = Vec::new();
    for template in template_files(&job.templates)? {
        let source = read(&template)?;
        let (text, lines, skipped) = render_template(&template, &source, &colors, &job.separator)?;
        let output = job.output_dir.join(output_name(&job.palette, &template));
        fs::write(&output, text).map_err(|source| ConfigError::Io {
            path: output.clone(),
            source,
        })?;
        tracing::debug!("{lines} line(s) written to {}", output.display());
        rendered.push(RenderedFile {
            template,
            output,
            lines,
            skipped,
        });
    }
    Ok(rendered)
}

/// Render one template's source text.
///
/// Lines follow the order of the entries in `source`. Returns the file
/// contents, the number of lines and the entries skipped because their
/// colour path does not resolve to a scalar. Skipped entries are left for
/// the caller to report.
///
/// # Errors
///
/// Returns [`RenderError::InvalidTemplate`] if `source` is not TOML.
pub fn render_template(
    path: &Path,
    source: &str,
    colors: &Value,
    separator: &str,
) -> Result<(String, usize, Vec<RenderError>), RenderError> {
    let table: toml::Table = toml::from_str(source).map_err(|e| RenderError::InvalidTemplate {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let mut out = String::new();
    let mut lines = 0;
    let mut skipped = Vec::new();
    for (key, color_path) in &table {
        let Some(color_path) = color_path.as_str() else {
            skipped.push(RenderError::InvalidTemplate {
                path: path.to_path_buf(),
                message: format!("value of '{key}' is not a string"),
            });
            continue;
        };
        match lookup_color(colors, color_path) {
            Some(value) => {
                out.push_str(&format!("{key}{separator}{value}\n"));
                lines += 1;
            }
            None => skipped.push(RenderError::MissingColor {
                key: key.clone(),
                color: color_path.to_string(),
            }),
        }
    }
    Ok((out, lines, skipped))
}

/// Follow a dotted path through the colours document to a scalar.
fn lookup_color(colors: &Value, dotted: &str) -> Option<String> {
    let value = dotted
        .split('.')
        .try_fold(colors, |node, segment| node.get(segment))?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Artifact filename for `template`: `<palette>-<stem>`, with `.conf`
/// appended when the stem has no extension of its own.
#[must_use]
pub fn output_name(palette: &str, template: &Path) -> String {
    let stem = template
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().to_string());
    if stem.contains('.') {
        format!("{palette}-{stem}")
    } else {
        format!("{palette}-{stem}.{DEFAULT_EXTENSION}")
    }
}

/// `path` itself, or every `*.toml` below it in sorted order.
fn template_files(path: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut found = Vec::new();
    let mut pending = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| ConfigError::Io {
                path: dir.clone(),
                source,
            })?;
            let child = entry.path();
            if child.is_dir() {
                pending.push(child);
            } else if child.extension().is_some_and(|e| e == "toml") {
                found.push(child);
            }
        }
    }
    found.sort();
    Ok(found)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

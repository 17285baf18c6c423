//! Cookiecutter-style project scaffolding.
//!
//! A template directory holds a `cookiecutter.json` of default values and
//! a project tree whose paths and file contents may contain
//! `{{ cookiecutter.key }}` placeholders. Rendering substitutes every
//! placeholder; a key with no value is an error. Files that are not
//! UTF-8 are copied verbatim.

use crate::core::error::{Result, SpaceriniError};
use crate::core::publish::folder::join_relative;
use crate::core::types::value_to_text;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default values file at the template root
pub const CONTEXT_FILE: &str = "cookiecutter.json";

/// Template variables
pub type Context = BTreeMap<String, Value>;

static PLACEHOLDER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\{\{\s*cookiecutter\.([A-Za-z0-9_]+)\s*\}\}").ok());

/// Read the template's default context
pub fn load_defaults(template_dir: &Path) -> Result<Context> {
    let path = template_dir.join(CONTEXT_FILE);
    let text = fs::read_to_string(&path).map_err(|e| {
        SpaceriniError::ConfigError(format!(
            "Template {} has no readable {CONTEXT_FILE}: {e}",
            template_dir.display()
        ))
    })?;

    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(SpaceriniError::ConfigError(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
    }
}

/// Substitute every placeholder in `text`
pub fn render(text: &str, context: &Context) -> Result<String> {
    let Some(re) = PLACEHOLDER.as_ref() else {
        return Err(SpaceriniError::ConfigError(
            "Placeholder pattern failed to compile".to_string(),
        ));
    };

    let mut missing: Option<String> = None;
    let rendered = re.replace_all(text, |caps: &Captures| match context.get(&caps[1]) {
        Some(value) => value_to_text(value),
        None => {
            missing.get_or_insert_with(|| caps[1].to_string());
            String::new()
        }
    });

    match missing {
        Some(key) => Err(SpaceriniError::ConfigError(format!(
            "Template variable '{key}' has no value"
        ))),
        None => Ok(rendered.into_owned()),
    }
}

/// Defaults overlaid with `extra`; string defaults may refer to other keys
fn merged_context(template_dir: &Path, extra: &Context) -> Result<Context> {
    let mut context = load_defaults(template_dir)?;
    context.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));

    let resolved = context
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.clone(), Value::String(render(s, &context)?))),
            other => Ok((k.clone(), other.clone())),
        })
        .collect::<Result<Context>>()?;
    Ok(resolved)
}

/// Render `template_dir` into `output_dir`
///
/// Returns the rendered project directory (the rendered name of the
/// template's top-level directory). An existing project directory is an
/// error unless `overwrite` is set, in which case rendered files replace
/// existing ones and other files are left alone.
pub fn create_app(
    template_dir: &Path,
    extra: &Context,
    output_dir: &Path,
    overwrite: bool,
) -> Result<PathBuf> {
    let context = merged_context(template_dir, extra)?;
    let project = project_root(template_dir)?;

    let project_name = render(&file_name(&project), &context)?;
    let target = join_relative(output_dir, &project_name).ok_or_else(|| outside(&project_name))?;
    if target.exists() && !overwrite {
        return Err(SpaceriniError::ConfigError(format!(
            "{} already exists",
            target.display()
        )));
    }

    let mut files = 0usize;
    for entry in WalkDir::new(&project).follow_links(false) {
        let entry = entry.map_err(|e| SpaceriniError::IoError(e.into()))?;
        let relative = entry.path().strip_prefix(template_dir).map_err(|_| {
            SpaceriniError::ConfigError(format!(
                "{} escapes the template directory",
                entry.path().display()
            ))
        })?;

        let rendered = render(&relative.to_string_lossy(), &context)?;
        let dest = join_relative(output_dir, &rendered).ok_or_else(|| outside(&rendered))?;

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }

        let bytes = fs::read(entry.path())?;
        match String::from_utf8(bytes) {
            Ok(text) => fs::write(&dest, render(&text, &context)?)?,
            Err(raw) => fs::write(&dest, raw.into_bytes())?,
        }
        files += 1;
    }

    tracing::info!(
        "Rendered {} files from {} into {}",
        files,
        template_dir.display(),
        target.display()
    );
    Ok(target)
}

/// The single templated directory at the root of a template
fn project_root(template_dir: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(template_dir)
        .map_err(|e| {
            SpaceriniError::ConfigError(format!(
                "Template directory {} is not readable: {e}",
                template_dir.display()
            ))
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir() && file_name(p).contains("cookiecutter."))
        .collect();
    candidates.sort();

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(SpaceriniError::ConfigError(format!(
            "Template {} has no templated project directory",
            template_dir.display()
        ))),
        n => Err(SpaceriniError::ConfigError(format!(
            "Template {} has {n} templated project directories",
            template_dir.display()
        ))),
    }
}

fn outside(rendered: &str) -> SpaceriniError {
    SpaceriniError::ConfigError(format!("Rendered path '{rendered}' leaves the output directory"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

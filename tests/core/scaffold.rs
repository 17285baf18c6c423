//! Rendering the bundled gradio app template

use serde_json::json;
use spacerini::core::index::SUPPORTED_LANGUAGES;
use spacerini::core::scaffold::{create_app, load_defaults, Context};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn gradio_template() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/gradio")
}

fn context(pairs: &[(&str, serde_json::Value)]) -> Context {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_bundled_defaults_cover_every_placeholder() {
    let defaults = load_defaults(&gradio_template()).unwrap();
    for key in ["local_app", "space_title", "sdk", "results_per_page"] {
        assert!(defaults.contains_key(key), "missing default {key}");
    }

    let out = TempDir::new().unwrap();
    assert!(create_app(&gradio_template(), &Context::new(), out.path(), false).is_ok());
}

#[test]
fn test_render_gradio_app() {
    let out = TempDir::new().unwrap();
    let extra = context(&[
        ("local_app", json!("imdb")),
        ("space_title", json!("IMDB search")),
        ("dataset_name", json!("imdb")),
        ("results_per_page", json!(5)),
    ]);

    let app = create_app(&gradio_template(), &extra, out.path(), false).unwrap();

    assert_eq!(app, out.path().join("imdb"));
    let readme = fs::read_to_string(app.join("README.md")).unwrap();
    assert!(readme.contains("title: IMDB search"));
    assert!(readme.contains("sdk: gradio"));
    assert!(!readme.contains("cookiecutter"));

    let script = fs::read_to_string(app.join("app.py")).unwrap();
    assert!(script.contains("RESULTS_PER_PAGE = 5"));
    assert!(app.join("requirements.txt").exists());
}

#[test]
fn test_app_knows_every_index_language() {
    let out = TempDir::new().unwrap();
    let app = create_app(&gradio_template(), &Context::new(), out.path(), false).unwrap();
    let script = fs::read_to_string(app.join("app.py")).unwrap();

    for code in SUPPORTED_LANGUAGES {
        assert!(script.contains(&format!("\"{code}\": ")), "app.py lacks {code}");
    }
    assert!(script.contains("Unsupported index language"));
}

#[test]
fn test_existing_app_needs_overwrite() {
    let out = TempDir::new().unwrap();
    let extra = context(&[("local_app", json!("demo"))]);

    create_app(&gradio_template(), &extra, out.path(), false).unwrap();
    assert!(create_app(&gradio_template(), &extra, out.path(), false).is_err());

    // Files next to the rendered ones survive an overwrite
    fs::write(out.path().join("demo/keep.txt"), "kept").unwrap();
    create_app(&gradio_template(), &extra, out.path(), true).unwrap();
    assert!(out.path().join("demo/keep.txt").exists());
}

/*!
 * Common test utilities for the ppt-translator test suite
 */

use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

use ppt_translator::providers::mock::MockProvider;
use ppt_translator::translation::{
    CoordinatorOptions, RetryPolicy, TextUnit, TranslationCache, TranslationCoordinator,
};

/// Route library logs through env_logger, once per test binary
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Text units on a single slide, one paragraph each
pub fn units(texts: &[&str]) -> Vec<TextUnit> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| TextUnit::new(0, i, *text))
        .collect()
}

/// Coordinator over a mock provider with immediate retries
pub fn coordinator(
    provider: MockProvider,
    cache: TranslationCache,
    source: &str,
    target: &str,
    max_chunk_size: usize,
) -> TranslationCoordinator<MockProvider> {
    let options = CoordinatorOptions::new(source, target)
        .max_chunk_size(max_chunk_size)
        .max_workers(4)
        .retry(RetryPolicy::immediate(3));
    TranslationCoordinator::new(Arc::new(provider), cache, options)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Slide XML with one single-run paragraph per entry
pub fn slide_xml(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|text| {
            format!(
                r#"<a:p><a:r><a:rPr lang="en-US" sz="2400"/><a:t>{}</a:t></a:r></a:p>"#,
                escape(text)
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody><a:bodyPr/>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
        body
    )
}

/// Write a minimal `.pptx` archive with the given slides
///
/// Slide parts are added in reverse order so readers cannot rely on archive order.
pub fn build_minimal_pptx(path: &Path, slides: &[&[&str]]) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(path)?);
    let options = FileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#,
    )?;

    zip.start_file("ppt/presentation.xml", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8"?><p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#,
    )?;

    for (i, paragraphs) in slides.iter().enumerate().rev() {
        zip.start_file(format!("ppt/slides/slide{}.xml", i + 1), options)?;
        zip.write_all(slide_xml(paragraphs).as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

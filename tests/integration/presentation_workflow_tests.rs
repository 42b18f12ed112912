/*!
 * End-to-end tests: build a real archive, translate it and read it back
 */

use anyhow::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use ppt_translator::app_config::Config;
use ppt_translator::app_controller::Controller;
use ppt_translator::errors::{ErrorClass, PresentationError};
use ppt_translator::file_utils::FileManager;
use ppt_translator::presentation::PptxDocument;
use ppt_translator::providers::mock::{MockBehavior, MockProvider};
use ppt_translator::translation::TranslationCache;

use crate::common;

fn texts_of(path: &Path) -> Result<Vec<String>> {
    let document = PptxDocument::open(path)?;
    Ok(document.text_units()?.into_iter().map(|unit| unit.text).collect())
}

fn read_entry(path: &Path, name: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut entry = archive.by_name(name)?;
    let mut content = Vec::new();
    entry.read_to_end(&mut content)?;
    Ok(content)
}

fn controller(provider: MockProvider) -> Controller<MockProvider> {
    Controller::with_provider(Config::default(), Arc::new(provider), TranslationCache::new(true))
}

#[test]
fn test_open_withManySlides_shouldOrderByNumber() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deck.pptx");
    let labels: Vec<String> = (1..=11).map(|n| format!("Slide {}", n)).collect();
    let slides: Vec<Vec<&str>> = labels.iter().map(|label| vec![label.as_str()]).collect();
    let slide_refs: Vec<&[&str]> = slides.iter().map(Vec::as_slice).collect();
    common::build_minimal_pptx(&path, &slide_refs)?;

    let document = PptxDocument::open(&path)?;
    let units = document.text_units()?;

    assert_eq!(document.slide_count(), 11);
    assert_eq!(units.iter().map(|u| u.text.clone()).collect::<Vec<_>>(), labels);
    assert_eq!(units[10].locator.section, 10);
    Ok(())
}

#[test]
fn test_open_withLegacyPpt_shouldBeUnsupported() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "old.ppt", "binary")?;

    assert!(matches!(PptxDocument::open(&path), Err(PresentationError::Unsupported(_))));
    Ok(())
}

#[test]
fn test_open_withArchiveWithoutSlides_shouldBeUnsupported() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("empty.pptx");
    common::build_minimal_pptx(&path, &[])?;

    assert!(matches!(PptxDocument::open(&path), Err(PresentationError::Unsupported(_))));
    Ok(())
}

#[tokio::test]
async fn test_translateAndWrite_shouldReplaceTextAndKeepOtherParts() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("deck.pptx");
    common::build_minimal_pptx(&input, &[&["Hello", "World"], &["Hello", "A & B"]])?;

    let provider = MockProvider::uppercase();
    let coordinator = common::coordinator(provider.clone(), TranslationCache::new(true), "en", "fr", 100);

    let document = PptxDocument::open(&input)?;
    let units = document.text_units()?;
    assert_eq!(units.len(), 4);

    let result = coordinator.translate_units(&units).await?;
    let output = FileManager::translated_output_path(&input);
    document.write_translated(&result, &output)?;

    assert_eq!(provider.strings_sent(), 3);
    assert_eq!(texts_of(&output)?, vec!["HELLO", "WORLD", "HELLO", "A & B"]);
    assert_eq!(
        read_entry(&output, "ppt/presentation.xml")?,
        read_entry(&input, "ppt/presentation.xml")?
    );

    let slide = String::from_utf8(read_entry(&output, "ppt/slides/slide1.xml")?)?;
    assert!(slide.contains(r#"<a:rPr lang="en-US" sz="2400"/><a:t>HELLO</a:t>"#));
    Ok(())
}

#[tokio::test]
async fn test_translateAndWrite_withRejectedUnit_shouldKeepOriginalText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("deck.pptx");
    common::build_minimal_pptx(&input, &[&["keep calm", "secret plan"]])?;

    let provider = MockProvider::new(MockBehavior::RejectContaining("secret".to_string()));
    let coordinator = common::coordinator(provider, TranslationCache::new(true), "en", "fr", 100);

    let document = PptxDocument::open(&input)?;
    let result = coordinator.translate_units(&document.text_units()?).await?;
    let output = temp_dir.path().join("out.pptx");
    document.write_translated(&result, &output)?;

    assert_eq!(result.stats.failed_units, 1);
    assert_eq!(texts_of(&output)?, vec!["KEEP CALM", "secret plan"]);
    Ok(())
}

#[tokio::test]
async fn test_controllerRun_withFolder_shouldTranslateAndSkipExisting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::build_minimal_pptx(&root.join("one.pptx"), &[&["Hello"]])?;
    common::build_minimal_pptx(&root.join("two.pptx"), &[&["Hello", "Again"]])?;
    common::create_test_file(root, "legacy.ppt", "binary")?;

    let provider = MockProvider::uppercase();
    let controller = controller(provider.clone());

    let summary = controller.run(root, false, true).await?;

    assert_eq!(summary.translated_files, 2);
    assert_eq!(summary.skipped_files, 1);
    assert!(summary.is_success());
    assert_eq!(texts_of(&root.join("two_translated.pptx"))?, vec!["HELLO", "AGAIN"]);
    assert!(root.join("one_translation.json").exists());
    // "Hello" is answered by the shared cache for the second file
    assert_eq!(provider.strings_sent(), 2);

    let again = controller.run(root, false, false).await?;
    assert_eq!(again.translated_files, 0);
    assert_eq!(again.skipped_files, 3);

    let forced = controller.run(root, true, false).await?;
    assert_eq!(forced.translated_files, 2);
    Ok(())
}

#[tokio::test]
async fn test_controllerRun_withIntermediate_shouldRecordOutcomes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("deck.pptx");
    common::build_minimal_pptx(&input, &[&["Hello"]])?;

    controller(MockProvider::uppercase()).run(&input, false, true).await?;

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("deck_translation.json"))?)?;
    let outcome = &json["outcomes"][0];
    assert_eq!(outcome["source_text"], "Hello");
    assert_eq!(outcome["translation"]["status"], "translated");
    assert_eq!(outcome["translation"]["text"], "HELLO");
    Ok(())
}

#[tokio::test]
async fn test_controllerRun_withAuthFailure_shouldStopBatch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::build_minimal_pptx(&root.join("a.pptx"), &[&["Hello"]])?;
    common::build_minimal_pptx(&root.join("b.pptx"), &[&["World"]])?;

    let provider = MockProvider::new(MockBehavior::Failing(ErrorClass::Auth));
    let result = controller(provider.clone()).run(root, false, false).await;

    assert!(result.is_err());
    assert_eq!(provider.call_count(), 1);
    assert!(!root.join("a_translated.pptx").exists());
    assert!(!root.join("b_translated.pptx").exists());
    Ok(())
}

#[tokio::test]
async fn test_controllerRun_withUntranslatedUnits_shouldReportFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("deck.pptx");
    common::build_minimal_pptx(&input, &[&["fine", "blocked"]])?;

    let provider = MockProvider::new(MockBehavior::RejectContaining("blocked".to_string()));
    let summary = controller(provider).run(&input, false, false).await?;

    assert_eq!(summary.translated_files, 1);
    assert_eq!(summary.untranslated_units, 1);
    assert!(!summary.is_success());
    Ok(())
}

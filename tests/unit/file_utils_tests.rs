/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

use ppt_translator::file_utils::FileManager;

use crate::common;

#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "deck.pptx", "not really a deck")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

#[test]
fn test_findPresentations_withTree_shouldCollectSortedAndSkipOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let nested = root.join("b_nested");
    fs::create_dir_all(&nested)?;

    common::create_test_file(root, "c.pptx", "")?;
    common::create_test_file(root, "a.PPTX", "")?;
    common::create_test_file(root, "a_translated.pptx", "")?;
    common::create_test_file(root, "notes.txt", "")?;
    common::create_test_file(&nested, "legacy.ppt", "")?;

    let found = FileManager::find_presentations(root)?;
    let names: Vec<PathBuf> = found
        .iter()
        .map(|path| path.strip_prefix(root).unwrap().to_path_buf())
        .collect();

    assert_eq!(
        names,
        vec![
            PathBuf::from("a.PPTX"),
            PathBuf::from("b_nested/legacy.ppt"),
            PathBuf::from("c.pptx"),
        ]
    );
    Ok(())
}

#[test]
fn test_findPresentations_withSingleFile_shouldReturnIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let deck = common::create_test_file(temp_dir.path(), "deck.pptx", "")?;
    let notes = common::create_test_file(temp_dir.path(), "notes.txt", "")?;

    assert_eq!(FileManager::find_presentations(&deck)?, vec![deck]);
    assert!(FileManager::find_presentations(&notes).is_err());
    assert!(FileManager::find_presentations(temp_dir.path().join("missing")).is_err());
    Ok(())
}

#[test]
fn test_writeJson_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("deck_translation.json");

    FileManager::write_json(&path, &json!({ "units": 2 }))?;

    let content = fs::read_to_string(&path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(value["units"], 2);
    Ok(())
}

#[test]
fn test_cleanPath_withPlainPath_shouldKeepIt() {
    assert_eq!(
        FileManager::clean_path("  slides/deck.pptx "),
        PathBuf::from("slides/deck.pptx")
    );
}

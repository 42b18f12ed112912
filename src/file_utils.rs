use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Suffix appended to the stem of translated outputs
pub const TRANSLATED_SUFFIX: &str = "_translated";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Strip shell quoting and escaped spaces from a user-supplied path
    pub fn clean_path(path: &str) -> PathBuf {
        let trimmed = path.trim().trim_matches(|c| c == '\'' || c == '"');
        PathBuf::from(trimmed.replace("\\ ", " ").replace("\\'", "'"))
    }

    /// Whether the path has a `.pptx` or legacy `.ppt` extension
    pub fn is_presentation<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                ext.eq_ignore_ascii_case("pptx") || ext.eq_ignore_ascii_case("ppt")
            })
            .unwrap_or(false)
    }

    /// Whether the file is itself an output of this tool
    pub fn is_translated_output<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(TRANSLATED_SUFFIX))
            .unwrap_or(false)
    }

    /// Collect presentations from a file or a directory tree, sorted by path
    ///
    /// Outputs of earlier runs (`*_translated.pptx`) are left out.
    pub fn find_presentations<P: AsRef<Path>>(target: P) -> Result<Vec<PathBuf>> {
        let target = target.as_ref();

        if Self::file_exists(target) {
            if !Self::is_presentation(target) {
                return Err(anyhow::anyhow!(
                    "Not a PowerPoint file (.pptx or .ppt): {:?}",
                    target
                ));
            }
            return Ok(vec![target.to_path_buf()]);
        }

        if !Self::dir_exists(target) {
            return Err(anyhow::anyhow!("Path does not exist: {:?}", target));
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(target).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_presentation(path) && !Self::is_translated_output(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    // @generates: `<stem>_translated.pptx` next to the input
    pub fn translated_output_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        input_file.with_file_name(format!("{}{}.pptx", stem, TRANSLATED_SUFFIX))
    }

    // @generates: `<stem>_translation.json` next to the input
    pub fn intermediate_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        input_file.with_file_name(format!("{}_translation.json", stem))
    }

    /// Serialize `value` as pretty JSON to `path`
    pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        fs::write(path, content).with_context(|| format!("Failed to write to file: {:?}", path))?;
        Ok(())
    }
}

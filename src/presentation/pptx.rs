//! PPTX (Office Open XML) text extraction and write-back.
//!
//! Each `<a:p>` paragraph of a slide is one text unit. Its locator position
//! is the paragraph's index among all paragraphs of the slide, so the same
//! index addresses it again at write-back. Text inside `<a:fld>` fields
//! (slide numbers, dates) is neither extracted nor replaced.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::PresentationError;
use crate::translation::{TextUnit, TranslationResult};

/// Regex for slide part names
static SLIDE_PART_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("Invalid slide part regex")
});

/// One slide part loaded from the archive
#[derive(Debug, Clone)]
struct SlidePart {
    /// Archive entry name
    name: String,
    /// Number taken from the entry name
    number: usize,
    /// Slide XML
    xml: String,
}

/// An opened `.pptx` presentation
#[derive(Debug)]
pub struct PptxDocument {
    path: PathBuf,
    slides: Vec<SlidePart>,
}

impl PptxDocument {
    /// Open a presentation and load its slide parts in slide-number order
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PresentationError> {
        let path = path.as_ref().to_path_buf();

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();
        if extension == "ppt" {
            return Err(PresentationError::Unsupported(format!(
                "{} is a legacy binary .ppt file; convert it to .pptx first",
                path.display()
            )));
        }

        let mut archive = ZipArchive::new(File::open(&path)?)?;

        let mut slides = Vec::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let number = match SLIDE_PART_REGEX
                .captures(&name)
                .and_then(|caps| caps[1].parse::<usize>().ok())
            {
                Some(number) => number,
                None => continue,
            };

            let mut xml = String::new();
            file.read_to_string(&mut xml)?;
            slides.push(SlidePart { name, number, xml });
        }

        if slides.is_empty() {
            return Err(PresentationError::Unsupported(format!(
                "{} contains no slides",
                path.display()
            )));
        }

        slides.sort_by_key(|slide| slide.number);
        debug!("Loaded {} slides from {:?}", slides.len(), path);

        Ok(Self { path, slides })
    }

    /// Source file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of slides
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Every non-blank paragraph, slide by slide
    pub fn text_units(&self) -> Result<Vec<TextUnit>, PresentationError> {
        let mut units = Vec::new();
        for (section, slide) in self.slides.iter().enumerate() {
            let paragraphs = extract_paragraphs(&slide.xml).map_err(|e| xml_error(&slide.name, e))?;
            units.extend(
                paragraphs
                    .into_iter()
                    .map(|(position, text)| TextUnit::new(section, position, text)),
            );
        }
        Ok(units)
    }

    /// Write a copy of the presentation with translated paragraphs to `output`
    ///
    /// Untranslated units keep their original text. The archive is written to
    /// a temporary file next to `output` and moved into place once complete.
    pub fn write_translated(&self, result: &TranslationResult, output: &Path) -> Result<(), PresentationError> {
        let mut per_slide: HashMap<usize, HashMap<usize, String>> = HashMap::new();
        for outcome in &result.outcomes {
            if let Some(text) = outcome.translation.text() {
                if text != outcome.source_text {
                    per_slide
                        .entry(outcome.locator.section)
                        .or_default()
                        .insert(outcome.locator.position, text.to_string());
                }
            }
        }

        let mut rewritten: HashMap<&str, Vec<u8>> = HashMap::new();
        for (section, slide) in self.slides.iter().enumerate() {
            if let Some(translations) = per_slide.get(&section) {
                let xml = apply_translations(&slide.xml, translations)
                    .map_err(|e| xml_error(&slide.name, e))?;
                rewritten.insert(slide.name.as_str(), xml);
            }
        }

        let mut archive = ZipArchive::new(File::open(&self.path)?)?;

        let directory = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(directory)?;
        let mut writer = ZipWriter::new(temp);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            match rewritten.get(file.name()) {
                Some(xml) => {
                    let name = file.name().to_string();
                    drop(file);
                    writer.start_file(name, options)?;
                    writer.write_all(xml)?;
                }
                None => writer.raw_copy_file(file)?,
            }
        }

        let temp = writer.finish()?;
        temp.persist(output).map_err(|e| PresentationError::Io(e.error))?;

        info!(
            "Wrote {} ({} slides rewritten)",
            output.display(),
            rewritten.len()
        );
        Ok(())
    }
}

fn xml_error(part: &str, error: quick_xml::Error) -> PresentationError {
    PresentationError::Xml {
        part: part.to_string(),
        message: error.to_string(),
    }
}

/// Strip the namespace prefix from an element name
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Paragraph text of a slide as `(paragraph index, text)`, blank paragraphs omitted
///
/// Runs are concatenated and line breaks become spaces.
pub fn extract_paragraphs(xml: &str) -> Result<Vec<(usize, String)>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();

    let mut paragraph_count = 0;
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_field = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"p" => {
                    current = Some(String::new());
                    paragraph_count += 1;
                }
                b"t" => in_text = true,
                b"fld" => in_field = true,
                b"br" => push_break(&mut current),
                _ => {}
            },
            Event::Empty(e) => {
                if local_name(e.name().as_ref()) == b"br" {
                    push_break(&mut current);
                }
            }
            Event::Text(e) if in_text && !in_field => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) if in_text && !in_field => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"p" => {
                    if let Some(text) = current.take() {
                        if !text.trim().is_empty() {
                            paragraphs.push((paragraph_count - 1, text));
                        }
                    }
                }
                b"t" => in_text = false,
                b"fld" => in_field = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_break(current: &mut Option<String>) {
    if let Some(text) = current.as_mut() {
        text.push(' ');
    }
}

/// Rewrite paragraphs of a slide, keyed by paragraph index
///
/// The translation goes into the first text run so that run's formatting
/// wins; later runs are emptied and line breaks inside the paragraph are
/// dropped. Paragraphs without an entry pass through unchanged.
pub fn apply_translations(xml: &str, translations: &HashMap<usize, String>) -> Result<Vec<u8>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(xml.len())));

    let mut paragraph_count = 0;
    let mut translation: Option<&str> = None;
    let mut written = false;
    let mut in_text = false;
    let mut in_field = false;
    let mut skip_depth = 0usize;

    loop {
        let event = reader.read_event()?;

        if skip_depth > 0 {
            match &event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match &event {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"p" => {
                    translation = translations.get(&paragraph_count).map(String::as_str);
                    paragraph_count += 1;
                    written = false;
                }
                b"fld" => in_field = true,
                b"br" if translation.is_some() => {
                    skip_depth = 1;
                    continue;
                }
                b"t" if !in_field => {
                    if let Some(text) = translation {
                        in_text = true;
                        writer.write_event(&event)?;
                        if !written {
                            writer.write_event(Event::Text(BytesText::new(text)))?;
                            written = true;
                        }
                        continue;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"br" if translation.is_some() => continue,
                b"t" if !in_field && !written => {
                    if let Some(text) = translation {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
                        writer.write_event(Event::Text(BytesText::new(text)))?;
                        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
                        written = true;
                        continue;
                    }
                }
                _ => {}
            },
            Event::Text(_) | Event::CData(_) if in_text => continue,
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"p" => translation = None,
                b"t" => in_text = false,
                b"fld" => in_field = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }

        writer.write_event(&event)?;
    }

    Ok(writer.into_inner().into_inner())
}

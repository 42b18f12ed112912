/*!
 * Presentation documents.
 *
 * Reading slide text out of `.pptx` archives and writing translated copies
 * back with every other part of the archive left untouched.
 */

pub mod pptx;

pub use pptx::{apply_translations, extract_paragraphs, PptxDocument};

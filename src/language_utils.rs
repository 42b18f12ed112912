use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating, normalizing, and
/// matching ISO 639-1 (2-letter) and ISO 639-2 (3-letter) language codes,
/// optionally followed by a region subtag such as `zh-TW` or `pt_BR`.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// Split a code into its lowercase primary subtag and an uppercase region subtag
pub fn split_region(code: &str) -> (String, Option<String>) {
    let trimmed = code.trim();
    match trimmed.split_once(['-', '_']) {
        Some((primary, region)) => (
            primary.to_lowercase(),
            Some(region.to_uppercase()).filter(|r| !r.is_empty()),
        ),
        None => (trimmed.to_lowercase(), None),
    }
}

/// Map an ISO 639-2/B code to its ISO 639-2/T form when they differ
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra", // French
        "ger" => "deu", // German
        "dut" => "nld", // Dutch
        "gre" => "ell", // Greek
        "chi" => "zho", // Chinese
        "cze" => "ces", // Czech
        "ice" => "isl", // Icelandic
        "alb" => "sqi", // Albanian
        "arm" => "hye", // Armenian
        "baq" => "eus", // Basque
        "bur" => "mya", // Burmese
        "per" => "fas", // Persian
        "geo" => "kat", // Georgian
        "may" => "msa", // Malay
        "mac" => "mkd", // Macedonian
        "rum" => "ron", // Romanian
        "slo" => "slk", // Slovak
        "wel" => "cym", // Welsh
        _ => return None,
    };
    Some(part2t)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
///
/// A region subtag is accepted when it is 2 letters or 3 digits.
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let (primary, region) = split_region(code);

    if let Some(region) = &region {
        let valid_region = (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
            || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()));
        if !valid_region {
            return Err(anyhow!("Invalid region subtag in language code: {}", code));
        }
    }

    // Check for ISO 639-1 (2-letter) code
    if primary.len() == 2 {
        if Language::from_639_1(&primary).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
    }
    // Check for ISO 639-2 (3-letter) code
    else if primary.len() == 3 {
        if Language::from_639_3(&primary).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }

        if part2b_to_part2t(&primary).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format, dropping any region
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let (primary, _) = split_region(code);

    // If it's a 2-letter code, convert to 3-letter
    if primary.len() == 2 {
        if let Some(lang) = Language::from_639_1(&primary) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if primary.len() == 3 {
        if Language::from_639_3(&primary).is_some() {
            return Ok(primary);
        }

        if let Some(part2t) = part2b_to_part2t(&primary) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language and region)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let (normalized1, normalized2) = match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(n1), Ok(n2)) => (n1, n2),
        _ => return false,
    };

    normalized1 == normalized2 && split_region(code1).1 == split_region(code2).1
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Human-readable name for prompts, e.g. `Chinese (TW)`
///
/// Unknown codes are returned unchanged so that a prompt can still be built.
pub fn display_name(code: &str) -> String {
    let name = match get_language_name(code) {
        Ok(name) => name,
        Err(_) => return code.trim().to_string(),
    };

    match split_region(code).1 {
        Some(region) => format!("{} ({})", name, region),
        None => name,
    }
}

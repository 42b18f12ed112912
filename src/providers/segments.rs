/*!
 * Prompt construction and response decoding for batch requests.
 *
 * A batch of strings travels as one chat message. Each string is preceded by
 * a numbered `<<SEG_n>>` marker and the message closes with `<<END>>`. The
 * response is decoded by marker label, so a model that reorders segments is
 * still mapped back correctly. A single string is sent bare.
 */

use std::collections::BTreeMap;

use log::error;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ProviderError;
use crate::language_utils;

/// Regex for matching segment markers
static SEGMENT_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<<SEG_(\d+)>>").expect("Invalid segment marker regex")
});

/// End marker constant
const END_MARKER: &str = "<<END>>";

/// Build the system prompt for a request carrying `segment_count` strings
pub fn system_prompt(source_language: &str, target_language: &str, segment_count: usize) -> String {
    let source = language_utils::display_name(source_language);
    let target = language_utils::display_name(target_language);

    let mut prompt = format!(
        "You are a translation assistant. Translate the user provided text from {} to {} \
         while preserving tone and formatting. Reply with the translation only.",
        source, target
    );

    if segment_count > 1 {
        prompt.push_str(&format!(
            "\n\nThe text is split into {} segments, each introduced by a marker such as <<SEG_0>>. \
             Translate every segment independently. Repeat each marker unchanged before its \
             translation, keep the segments in the same order, do not merge or split segments, \
             and finish with {}.",
            segment_count, END_MARKER
        ));
    }

    prompt
}

/// Encode a batch of strings into one user message
pub fn encode_segments<T: AsRef<str>>(texts: &[T]) -> String {
    if let [single] = texts {
        return single.as_ref().to_string();
    }

    let mut message = String::new();
    for (i, text) in texts.iter().enumerate() {
        message.push_str(&format!("<<SEG_{}>>\n{}\n", i, text.as_ref()));
    }
    message.push_str(END_MARKER);
    message
}

/// Decode a model response into exactly `expected` strings, ordered by label
///
/// Missing, duplicated or out-of-range labels are protocol violations.
pub fn decode_segments(response: &str, expected: usize) -> Result<Vec<String>, ProviderError> {
    if expected == 0 {
        return Ok(Vec::new());
    }

    if expected == 1 && !SEGMENT_MARKER_REGEX.is_match(response) {
        let text = strip_end_marker(response).trim();
        if text.is_empty() {
            return Err(ProviderError::ParseError("Empty translation in response".to_string()));
        }
        return Ok(vec![text.to_string()]);
    }

    let markers: Vec<(usize, usize, usize)> = SEGMENT_MARKER_REGEX
        .captures_iter(response)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let label = cap.get(1)?.as_str().parse().ok()?;
            Some((label, whole.start(), whole.end()))
        })
        .collect();

    let mut segments: BTreeMap<usize, String> = BTreeMap::new();
    for (i, &(label, _, body_start)) in markers.iter().enumerate() {
        let body_end = markers
            .get(i + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(response.len());
        let body = strip_end_marker(&response[body_start..body_end]).trim();

        if label >= expected || segments.insert(label, body.to_string()).is_some() {
            error!(
                "Malformed segment labels in response: label {} with {} expected",
                label, expected
            );
            return Err(ProviderError::CardinalityMismatch {
                expected,
                actual: markers.len(),
            });
        }
    }

    if segments.len() != expected {
        return Err(ProviderError::CardinalityMismatch {
            expected,
            actual: segments.len(),
        });
    }

    Ok(segments.into_values().collect())
}

// Only the closing marker is removed; an `<<END>>` inside translated text stays
fn strip_end_marker(text: &str) -> &str {
    let text = text.trim_end();
    text.strip_suffix(END_MARKER).unwrap_or(text)
}

/*!
 * Tests for greedy chunking
 */

use ppt_translator::translation::Chunker;

fn lengths(texts: &[&str], max: usize) -> Vec<Vec<usize>> {
    Chunker::new(max)
        .chunk(texts)
        .iter()
        .map(|chunk| texts[chunk.range.clone()].iter().map(|t| t.chars().count()).collect())
        .collect()
}

#[test]
fn test_chunk_withThreeEqualStrings_shouldPackGreedily() {
    assert_eq!(lengths(&["aaaa", "bbbb", "cccc"], 10), vec![vec![4, 4], vec![4]]);
}

#[test]
fn test_chunk_withOversizedString_shouldSendItAlone() {
    let texts = ["a".repeat(15), "bb".to_string()];
    let chunks = Chunker::new(10).chunk(&texts);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].range, 0..1);
    assert!(chunks[0].oversized);
    assert_eq!(chunks[0].char_count, 15);
    assert!(!chunks[1].oversized);
}

#[test]
fn test_chunk_withMultibyteText_shouldCountCharacters() {
    // 6 characters, 18 bytes
    let chunks = Chunker::new(6).chunk(&["你好世", "界再见"]);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].char_count, 6);
}

#[test]
fn test_chunk_withEmptyInput_shouldProduceNoChunks() {
    let texts: Vec<String> = Vec::new();
    assert!(Chunker::new(10).chunk(&texts).is_empty());
}

#[test]
fn test_chunk_shouldCoverEveryIndexInOrder() {
    let texts = ["one", "two", "three", "four", "five", "six"];
    let chunks = Chunker::new(8).chunk(&texts);

    let covered: Vec<usize> = chunks.iter().flat_map(|chunk| chunk.range.clone()).collect();
    assert_eq!(covered, (0..texts.len()).collect::<Vec<_>>());
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, i);
        assert!(chunk.char_count <= 8 || chunk.oversized);
    }
}

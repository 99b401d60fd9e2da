//! Backend output normalization.

use textsnap_core::TextBlock;

/// Join the text of every LINE block with `\n`, in backend order.
///
/// Blocks of any other kind are dropped. No sorting, no deduplication.
pub fn join_lines(blocks: &[TextBlock]) -> String {
    blocks
        .iter()
        .filter(|b| b.is_line())
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of LINE blocks in a backend response.
pub fn line_count(blocks: &[TextBlock]) -> usize {
    blocks.iter().filter(|b| b.is_line()).count()
}

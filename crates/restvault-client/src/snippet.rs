//! Context snippet extraction for plain-text search results.
//!
//! The simple-search endpoint reports absolute match spans into each
//! document body; this module turns them into bounded context windows.
//! Windows are clipped to the document (never negative, never past the end,
//! always on char boundaries), and windows that overlap or sit closer than
//! half the context length merge into one so results carry no duplicate
//! overlapping snippets. Emitted offsets are relative to the window text,
//! not the full file.

use restvault_core::models::SearchMatch;

/// Extract one context window per match span, merging nearby windows.
///
/// `context_length` is the number of characters kept on each side of a
/// match. Spans falling outside the document are discarded.
pub fn context_windows(
    text: &str,
    spans: &[(usize, usize)],
    context_length: usize,
) -> Vec<SearchMatch> {
    let mut spans: Vec<(usize, usize)> = spans
        .iter()
        .filter(|(start, end)| start < end && *end <= text.len())
        .map(|&(start, end)| {
            (
                floor_char_boundary(text, start),
                ceil_char_boundary(text, end),
            )
        })
        .collect();
    spans.sort_unstable();
    spans.dedup();

    // Group spans into merged windows first, then emit one match per span.
    let mut windows: Vec<(usize, usize, Vec<(usize, usize)>)> = Vec::new();
    for (start, end) in spans {
        let w_start = floor_char_boundary(text, start.saturating_sub(context_length));
        let w_end = ceil_char_boundary(text, end.saturating_add(context_length).min(text.len()));

        match windows.last_mut() {
            Some((_, cur_end, members))
                if w_start <= *cur_end
                    || w_start - *cur_end < context_length / 2 =>
            {
                *cur_end = (*cur_end).max(w_end);
                members.push((start, end));
            }
            _ => windows.push((w_start, w_end, vec![(start, end)])),
        }
    }

    let mut matches = Vec::new();
    for (w_start, w_end, members) in windows {
        let context = &text[w_start..w_end];
        for (start, end) in members {
            matches.push(SearchMatch {
                context: context.to_string(),
                start: start - w_start,
                end: end - w_start,
            });
        }
    }
    matches
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_matches_with_clipping() {
        // "XYZ" at 3..6 and 9..12, 3 chars of context each side
        let text = "abcXYZdefXYZghi";
        let matches = context_windows(text, &[(3, 6), (9, 12)], 3);

        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert!(m.end <= m.context.len());
            assert_eq!(&m.context[m.start..m.end], "XYZ");
        }
        // The two 3-char-radius windows overlap, so they share one context
        // clipped to the document bounds.
        assert_eq!(matches[0].context, text);
        assert_eq!(matches[0].context, matches[1].context);
        assert_eq!((matches[0].start, matches[0].end), (3, 6));
        assert_eq!((matches[1].start, matches[1].end), (9, 12));
    }

    #[test]
    fn test_distant_matches_keep_separate_windows() {
        let text = "abcXYZdefXYZghi";
        let matches = context_windows(text, &[(3, 6), (9, 12)], 1);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].context, "cXYZd");
        assert_eq!(matches[1].context, "fXYZg");
        assert_eq!(&matches[0].context[matches[0].start..matches[0].end], "XYZ");
        assert_eq!(&matches[1].context[matches[1].start..matches[1].end], "XYZ");
    }

    #[test]
    fn test_window_clips_at_document_start_and_end() {
        let text = "XYZ tail";
        let matches = context_windows(text, &[(0, 3)], 100);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].context, text);
        assert_eq!((matches[0].start, matches[0].end), (0, 3));
    }

    #[test]
    fn test_near_windows_merge_below_half_context_gap() {
        let text = "aaaXXXbbbbbbbbbbXXXccc";
        // spans 3..6 and 16..19, context 10: windows 0..16 and 6..22 overlap
        let merged = context_windows(text, &[(3, 6), (16, 19)], 10);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].context, merged[1].context);

        // context 2: windows 1..8 and 14..21, gap 6 >= 1, stay separate
        let separate = context_windows(text, &[(3, 6), (16, 19)], 2);
        assert_ne!(separate[0].context, separate[1].context);
    }

    #[test]
    fn test_multibyte_boundaries_are_respected() {
        let text = "héllo wörld wörld";
        let pos = text.find("wörld").unwrap();
        let matches = context_windows(text, &[(pos, pos + "wörld".len())], 3);
        assert_eq!(matches.len(), 1);
        // Slicing must not panic and the span must cover the match
        let m = &matches[0];
        assert_eq!(&m.context[m.start..m.end], "wörld");
    }

    #[test]
    fn test_huge_context_length_clips_to_the_document() {
        // A window radius near usize::MAX must not overflow past the span;
        // the window simply covers the whole document.
        let text = "abcXYZdef";
        let matches = context_windows(text, &[(3, 6)], usize::MAX);

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.context, text);
        assert!(m.end <= m.context.len());
        assert_eq!(&m.context[m.start..m.end], "XYZ");
    }

    #[test]
    fn test_out_of_range_spans_discarded() {
        let matches = context_windows("short", &[(2, 99), (4, 4)], 3);
        assert!(matches.is_empty());
    }
}

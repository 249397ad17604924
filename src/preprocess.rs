//! Text preprocessing for extracted policy documents.
//!
//! PDF extraction tends to produce duplicated glyph runs and ragged
//! whitespace; `clean` repairs those artifacts. For documents too large for
//! a provider's context budget, `extract_important_sections` selects the
//! paragraphs most likely to carry risk-relevant clauses.

use std::cmp::Reverse;

use tracing::debug;

/// Terms that mark a paragraph as worth forwarding to the analyst model.
const IMPORTANT_KEYWORDS: &[&str] = &[
    // Red flag indicators
    "room rent",
    "sub-limit",
    "sublimit",
    "co-pay",
    "copay",
    "co-payment",
    "waiting period",
    "pre-existing",
    "preexisting",
    "exclusion",
    "not covered",
    "not payable",
    "limitation",
    "cap",
    "maximum limit",
    "deductible",
    "proportionate",
    "proportional deduction",
    // Good feature indicators
    "no claim bonus",
    "ncb",
    "restoration",
    "reinstatement",
    "cashless",
    "network hospital",
    "day care",
    "domiciliary",
    "pre-hospitalization",
    "post-hospitalization",
    "ambulance",
    "health checkup",
    "wellness",
    "maternity",
    "newborn",
    // Coverage terms
    "sum insured",
    "coverage",
    "benefit",
    "claim",
    "premium",
    "hospitalization",
    "treatment",
    "surgery",
    "icu",
    "critical illness",
];

/// Characters of the original document always kept as the introduction block.
const INTRO_CHARS: usize = 1500;

/// A paragraph must carry more than this many characters to be scored.
const MIN_PARAGRAPH_CHARS: usize = 30;

/// Neighboring paragraphs shorter than this are pulled in as context.
const CONTEXT_NEIGHBOR_CHARS: usize = 200;

/// Repair common PDF-extraction artifacts.
///
/// Runs of 4+ identical characters collapse to one (duplicated glyphs),
/// runs of 2+ spaces collapse to one, and runs of 3+ newlines collapse to
/// two. Pure and idempotent: a second application changes nothing.
pub fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1usize;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }

        let keep = if run >= 4 {
            1
        } else if c == ' ' && run >= 2 {
            1
        } else if c == '\n' && run >= 3 {
            2
        } else {
            run
        };

        for _ in 0..keep {
            out.push(c);
        }
    }

    out
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Select the most risk-relevant subset of a large document.
///
/// Paragraphs are scored by how many of the domain keywords they mention.
/// The first 1500 characters are always kept verbatim as an introduction
/// block, since policies front-load their identity and overview. Scored
/// paragraphs are then appended greedily, highest score first (ties broken
/// by original document order), each with short neighboring paragraphs as
/// context, until `max_chars` is reached. The selection is lossy; it trades
/// completeness for fitting the provider's context window.
pub fn extract_important_sections(text: &str, max_chars: usize) -> String {
    let paragraphs: Vec<&str> = text.split('\n').collect();

    let mut scored: Vec<(usize, usize)> = Vec::new();
    for (idx, para) in paragraphs.iter().enumerate() {
        let lower = para.to_lowercase();
        let score = IMPORTANT_KEYWORDS
            .iter()
            .filter(|keyword| lower.contains(*keyword))
            .count();
        if score > 0 && para.trim().chars().count() > MIN_PARAGRAPH_CHARS {
            scored.push((score, idx));
        }
    }

    // Highest score first; equal scores keep original paragraph order.
    scored.sort_by_key(|&(score, idx)| (Reverse(score), idx));

    let intro = truncate_chars(text, INTRO_CHARS);
    let mut total_chars = intro.chars().count();
    let mut blocks = vec![format!("=== POLICY INTRODUCTION ===\n{}", intro)];

    let mut used = vec![false; paragraphs.len()];
    for &(_, idx) in &scored {
        if total_chars >= max_chars {
            break;
        }
        if used[idx] {
            continue;
        }

        let mut context = paragraphs[idx].to_string();
        if idx > 0 && paragraphs[idx - 1].chars().count() < CONTEXT_NEIGHBOR_CHARS {
            context = format!("{}\n{}", paragraphs[idx - 1], context);
        }
        if idx + 1 < paragraphs.len()
            && paragraphs[idx + 1].chars().count() < CONTEXT_NEIGHBOR_CHARS
        {
            context = format!("{}\n{}", context, paragraphs[idx + 1]);
        }

        total_chars += context.chars().count();
        blocks.push(context);

        used[idx] = true;
        if idx > 0 {
            used[idx - 1] = true;
        }
        if idx + 1 < paragraphs.len() {
            used[idx + 1] = true;
        }
    }

    let result = blocks.join("\n\n");
    debug!(
        input_chars = text.chars().count(),
        output_chars = result.chars().count().min(max_chars),
        scored_paragraphs = scored.len(),
        "smart extraction complete"
    );

    truncate_chars(&result, max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_duplicated_glyphs() {
        assert_eq!(clean("SSSSBBBBIIIII"), "SBI");
    }

    #[test]
    fn test_clean_preserves_short_runs() {
        // Three repeats are legitimate text ("www", "1999").
        assert_eq!(clean("www.example.com 1999"), "www.example.com 1999");
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean("a  b   c"), "a b c");
        assert_eq!(clean("a\n\nb"), "a\n\nb");
        assert_eq!(clean("a\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = [
            "SSSSBBBBIIIII",
            "room   rent\n\n\n\n\ncapped at ₹5000",
            "",
            "plain text with no artifacts",
            "tttttt    uuuu\n\n\nvvv",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "clean not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        let text = "₹₹₹₹₹";
        assert_eq!(truncate_chars(text, 3), "₹₹₹");
        assert_eq!(truncate_chars(text, 10), text);
    }

    #[test]
    fn test_extraction_never_exceeds_max_chars() {
        let text = "room rent capped at 1% of sum insured per day for every admission\n"
            .repeat(500);
        let result = extract_important_sections(&text, 4000);
        assert!(result.chars().count() <= 4000);
    }

    #[test]
    fn test_extraction_keeps_introduction_block() {
        let intro = "POLICY SCHEDULE: Star Health Family Optima, policy number 1234. "
            .repeat(40);
        let body = "waiting period of four years applies to pre-existing conditions\n"
            .repeat(100);
        let text = format!("{}\n{}", intro, body);
        assert!(text.chars().count() > 1500);

        let expected_intro: String = text.chars().take(1500).collect();
        let result = extract_important_sections(&text, 12000);
        assert!(result.starts_with("=== POLICY INTRODUCTION ===\n"));
        assert!(result.contains(&expected_intro));
    }

    #[test]
    fn test_extraction_tie_break_keeps_document_order() {
        // Two paragraphs with the same single-keyword score: the earlier
        // one must come out first.
        let filler = "x".repeat(1600);
        let text = format!(
            "{}\nfirst clause mentioning the waiting period applies here always\nsecond clause mentioning the waiting period applies here always",
            filler
        );
        let result = extract_important_sections(&text, 12000);
        let first = result.find("first clause").expect("first clause kept");
        let second = result.find("second clause").expect("second clause kept");
        assert!(first < second);
    }

    #[test]
    fn test_extraction_scores_only_substantial_paragraphs() {
        let filler = "y".repeat(1600);
        // Keyword present but the paragraph is too short to qualify.
        let text = format!("{}\nco-pay\nthis long paragraph describes the co-pay percentage due", filler);
        let result = extract_important_sections(&text, 12000);
        assert!(result.contains("describes the co-pay percentage"));
    }
}

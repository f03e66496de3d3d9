// Extractive summarization fallback: frequency-scored sentence selection,
// re-emitted in document order so the summary reads coherently.
use crate::text::{keyword_frequencies, split_sentences, tokenize, truncate_chars};

pub fn extractive_summary(text: &str, max_length: usize, min_keyword_length: usize) -> String {
    let sentences = split_sentences(text);

    // Two sentences or fewer: no useful compression possible.
    if sentences.len() <= 2 {
        return text.to_string();
    }

    let frequencies = keyword_frequencies(text, min_keyword_length);

    let mut scored: Vec<(usize, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(idx, sentence)| {
            let score = tokenize(sentence)
                .iter()
                .filter_map(|word| frequencies.get(word))
                .sum::<usize>();
            (idx, score)
        })
        .collect();

    // Sentences whose words never made the keyword table carry no signal.
    scored.retain(|&(_, score)| score > 0);

    let keep_count = 3.min(sentences.len() / 2);
    let mut selected: Vec<usize> = if scored.is_empty() {
        // Nothing scored; keep the leading sentences instead.
        (0..keep_count).collect()
    } else {
        // Stable sort: ties keep earlier sentences first.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.iter().take(keep_count).map(|&(idx, _)| idx).collect()
    };

    // Back to document order, never rank order.
    selected.sort_unstable();

    let summary = selected
        .iter()
        .map(|&idx| sentences[idx])
        .collect::<Vec<_>>()
        .join(" ");

    if summary.chars().count() > max_length {
        format!("{}...", truncate_chars(&summary, max_length))
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_KEYWORD_LENGTH: usize = 3;

    #[test]
    fn test_two_sentences_returned_unchanged() {
        let text = "First sentence here. Second sentence here.";
        assert_eq!(extractive_summary(text, 150, MIN_KEYWORD_LENGTH), text);
    }

    #[test]
    fn test_single_sentence_returned_unchanged() {
        let text = "Only one sentence.";
        assert_eq!(extractive_summary(text, 150, MIN_KEYWORD_LENGTH), text);
    }

    #[test]
    fn test_selected_count_matches_policy() {
        // Seven sentences, all scoring through the shared keyword, so the
        // selection fills the full min(3, 7 / 2) = 3 quota.
        let text = "Compilers parse programs. Compilers optimize programs. \
                    Compilers emit programs. Compilers check programs. \
                    Compilers link programs. Compilers load programs. \
                    Compilers profile programs.";
        let summary = extractive_summary(text, 500, MIN_KEYWORD_LENGTH);
        assert_eq!(split_sentences(&summary).len(), 3);
    }

    #[test]
    fn test_keyword_heavy_sentences_win_in_document_order() {
        // Six sentences; only the second and fifth contain keyword-table
        // words, the rest are built from words too short to rank.
        let text = "It is far too old. \
                    Neural networks drive modern translation systems. \
                    We go up a bit. \
                    The cat and dog nap. \
                    Neural networks also power modern search. \
                    He did not eat it.";
        let summary = extractive_summary(text, 300, MIN_KEYWORD_LENGTH);
        assert_eq!(
            summary,
            "Neural networks drive modern translation systems. \
             Neural networks also power modern search."
        );
    }

    #[test]
    fn test_selection_keeps_document_order() {
        let text = "Storage engines batch writes. A bird flew by. \
                    Storage engines compact segments. The sun rose. \
                    Storage engines cache reads. Clouds drifted past.";
        let summary = extractive_summary(text, 500, MIN_KEYWORD_LENGTH);
        let first = summary.find("batch").expect("first selected sentence missing");
        let second = summary.find("compact").expect("second selected sentence missing");
        let third = summary.find("cache").expect("third selected sentence missing");
        assert!(first < second && second < third);
    }

    #[test]
    fn test_truncation_appends_ellipsis() {
        let text = "Schedulers balance queues fairly. Schedulers preempt tasks quickly. \
                    Schedulers scan queues often. Schedulers park idle workers. \
                    Schedulers wake workers early. Schedulers trace queues closely.";
        let summary = extractive_summary(text, 40, MIN_KEYWORD_LENGTH);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 43);
    }

    #[test]
    fn test_all_short_words_fall_back_to_leading_sentences() {
        let text = "He is up. It is far. We go on. So be it. Do not go. All is one.";
        let summary = extractive_summary(text, 300, MIN_KEYWORD_LENGTH);
        assert_eq!(summary, "He is up. It is far. We go on.");
    }
}

//! Sentence segmentation on terminal punctuation.

const TERMINATORS: &[char] = &['。', '.', '！', '!', '？', '?', '\n'];

/// Split `text` into trimmed, non-empty sentences in source order.
///
/// A run of terminators counts as one boundary. Commas do not split, so a
/// clause list such as `服务员态度冷淡，上菜慢` stays one sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mixed_punctuation() {
        let sents = split_sentences("味道很好。服务一般！！价格呢？\n还会再来");
        assert_eq!(sents, vec!["味道很好", "服务一般", "价格呢", "还会再来"]);
    }

    #[test]
    fn test_commas_do_not_split() {
        assert_eq!(split_sentences("服务员态度冷淡，上菜慢"), vec!["服务员态度冷淡，上菜慢"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  \n\t 。。 ").is_empty());
    }

    #[test]
    fn test_western_terminators() {
        assert_eq!(split_sentences("Great food. Slow service!"), vec!["Great food", "Slow service"]);
    }
}

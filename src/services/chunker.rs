//! Paragraph-boundary text chunking with greedy word packing.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum chunk length in characters.
pub const MAX_CHUNK_CHARS: usize = 1000;

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\n").expect("blank-line pattern is valid")
});

/// Text chunker that splits documents on blank lines.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Longest chunk produced, except for a single oversized word
    max_chars: usize,
}

impl TextChunker {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn with_defaults() -> Self {
        Self::new(MAX_CHUNK_CHARS)
    }

    /// Split text into trimmed, non-empty chunks in source order.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();

        for paragraph in BLANK_LINE.split(text) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            if paragraph.chars().count() > self.max_chars {
                chunks.extend(self.pack_words(paragraph));
            } else {
                chunks.push(paragraph.to_string());
            }
        }

        chunks
    }

    /// Greedily pack whitespace-separated words into chunks of at most `max_chars`.
    fn pack_words(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();

            if current_len > 0 && current_len + word_len + 1 > self.max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_paragraphs() {
        let chunker = TextChunker::with_defaults();
        assert_eq!(chunker.split("Para1\n\nPara2"), vec!["Para1", "Para2"]);
    }

    #[test]
    fn test_blank_line_with_whitespace() {
        let chunker = TextChunker::with_defaults();
        let chunks = chunker.split("  first line\nstill first \n \t \n\n\nsecond\n");
        assert_eq!(chunks, vec!["first line\nstill first", "second"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        let chunker = TextChunker::with_defaults();
        assert!(chunker.split("").is_empty());
        assert!(chunker.split("\n\n   \n\n").is_empty());
    }

    #[test]
    fn test_long_paragraph_is_word_packed() {
        let chunker = TextChunker::new(20);
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let chunks = chunker.split(text);

        assert_eq!(
            chunks,
            vec!["alpha beta gamma", "delta epsilon zeta", "eta theta"]
        );
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_oversized_word_is_kept_whole() {
        let chunker = TextChunker::new(10);
        let long_word = "x".repeat(25);
        let text = format!("ab {long_word} cd ef");
        let chunks = chunker.split(&text);

        assert_eq!(chunks, vec!["ab".to_string(), long_word, "cd ef".to_string()]);
    }

    #[test]
    fn test_default_limit_respected() {
        let chunker = TextChunker::with_defaults();
        let text = "word ".repeat(700);
        let chunks = chunker.split(&text);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= MAX_CHUNK_CHARS));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let chunker = TextChunker::new(5);
        // Each word is 2 chars but 4 bytes.
        let chunks = chunker.split("éé éé éé");
        assert_eq!(chunks, vec!["éé éé", "éé"]);
    }

    #[test]
    fn test_deterministic() {
        let chunker = TextChunker::new(30);
        let text = "one two three four five six seven\n\neight nine ten eleven twelve thirteen";
        assert_eq!(chunker.split(text), chunker.split(text));
    }
}

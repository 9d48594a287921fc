#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Content,
    Separator,
}

/// Full-width punctuation and spacing, plus whitespace, ASCII punctuation and
/// the quote/dash/ellipsis run of General Punctuation.
pub fn is_separator(ch: char) -> bool {
    matches!(
        ch,
        '\u{3000}'..='\u{303f}'
            | '\u{ff00}'..='\u{ff0f}'
            | '\u{ff1a}'..='\u{ff20}'
            | '\u{ff3b}'..='\u{ff40}'
            | '\u{ff5b}'..='\u{ff65}'
            | '\u{2010}'..='\u{2027}'
    ) || ch.is_whitespace()
        || ch.is_ascii_punctuation()
}

pub fn classify(ch: char) -> CharClass {
    if is_separator(ch) {
        CharClass::Separator
    } else {
        CharClass::Content
    }
}

pub fn is_content(ch: char) -> bool {
    classify(ch) == CharClass::Content
}

/// Number of positions a learner can ever be asked about.
pub fn content_len(passage: &[char]) -> usize {
    passage.iter().filter(|&&ch| is_content(ch)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_width_punctuation_is_separator() {
        for ch in ['，', '。', '？', '！', '：', '；', '、', '《', '》', '「', '」', '\u{3000}'] {
            assert_eq!(classify(ch), CharClass::Separator, "{ch:?}");
        }
    }

    #[test]
    fn test_quotes_and_whitespace_are_separators() {
        for ch in ['“', '”', '‘', '’', '…', '—', ' ', '\n', ',', '.'] {
            assert!(is_separator(ch), "{ch:?}");
        }
    }

    #[test]
    fn test_ideographs_are_content() {
        for ch in ['学', '而', '时', '习', '之', '乎', 'a', '1'] {
            assert_eq!(classify(ch), CharClass::Content, "{ch:?}");
        }
    }

    #[test]
    fn test_content_len_skips_separators() {
        let passage: Vec<char> = "学而时习之，不亦说乎？".chars().collect();
        assert_eq!(content_len(&passage), 9);
        assert_eq!(content_len(&[]), 0);
    }
}

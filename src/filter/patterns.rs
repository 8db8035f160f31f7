//! Lexicons and pattern checks behind the admissibility filter.
//!
//! Short social-media fragments that look like noise often carry real
//! signal: repeated punctuation ("！！！"), numeric slang ("666", "520"),
//! pinyin abbreviations ("yyds"). These fixed dictionaries recognize those
//! before any model gets involved.

/// Expressive punctuation recognized in repeated runs.
const EXPRESSIVE_SYMBOLS: &[char] = &['，', '。', '？', '！', '～', '~', '…', '.', '!', '?'];

/// Numeric slang with a conventional reading.
const NUMERIC_SLANG: &[&str] = &[
    "233", "666", "555", "520", "1314", "88", "99", "111", "222", "333", "444", "777", "888",
    "999",
];

/// Single digits that carry meaning on their own.
const MEANINGFUL_DIGITS: &[char] = &['6', '9'];

/// Pinyin and internet abbreviations, matched case-insensitively as
/// substrings.
const ABBREVIATIONS: &[&str] = &[
    "awsl", "xswl", "yyds", "tql", "zqsg", "dbq", "bhys", "plxgg", "plxjj", "plmm", "pljj",
    "plgg", "xjj", "xgg", "nb", "gg", "mm", "dd", "jj",
];

/// Minimal stopword set for the lexical fallback.
const STOPWORDS: &[&str] = &[
    "的", "了", "是", "我", "你", "他", "她", "它", "们", "在", "和", "有", "都", "就", "不",
    "也", "这", "那", "啊", "吧", "吗", "呢", "a", "an", "the", "is", "are", "was", "of", "to",
    "and", "or", "in", "on", "at", "it", "i", "you",
];

/// Words that make a fragment meaningful regardless of token count.
const ALWAYS_MEANINGFUL: &[&str] = &[
    "好", "赞", "棒", "强", "美", "帅", "丑", "差", "烂", "哭", "笑", "爱", "恨", "good",
    "great", "bad", "love", "hate",
];

/// Fixed boilerplate: pure repost markers, quoted forwards, bare URLs.
pub fn is_boilerplate(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed == "转发微博" {
        return true;
    }
    if trimmed.starts_with("//@") {
        return true;
    }
    // A bare URL: scheme prefix and no interior whitespace.
    if (trimmed.starts_with("http://") || trimmed.starts_with("https://"))
        && !trimmed.chars().any(char::is_whitespace)
    {
        return true;
    }
    false
}

/// Length of the longest run of `target` in `text`.
fn longest_run(text: &str, target: char) -> usize {
    let mut best = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == target {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Longest run of characters all drawn from `class`.
fn longest_class_run(text: &str, class: &[char]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for c in text.chars() {
        if class.contains(&c) {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Repeated expressive punctuation: "！！", "？？？", "。。。", "...", "~~".
pub fn has_expressive_symbol_run(text: &str) -> bool {
    // Same CJK symbol repeated three or more times
    for &symbol in &['，', '。', '？', '！', '～', '…'] {
        if longest_run(text, symbol) >= 3 {
            return true;
        }
    }
    // Mixed CJK terminal punctuation, two or more in a row
    if longest_class_run(text, &['，', '。', '！', '？']) >= 2 {
        return true;
    }
    // ASCII equivalents
    if longest_run(text, '.') >= 3 {
        return true;
    }
    for &symbol in &['!', '?', '~'] {
        if longest_run(text, symbol) >= 2 {
            return true;
        }
    }
    false
}

/// Numeric slang token, embedded slang number, or a digit repeated >= 3
/// times ("666666", "5201314").
pub fn has_meaningful_number(text: &str) -> bool {
    let trimmed = text.trim();
    if NUMERIC_SLANG.contains(&trimmed) {
        return true;
    }
    if NUMERIC_SLANG.iter().any(|slang| trimmed.contains(slang)) {
        return true;
    }
    for digit in '0'..='9' {
        if longest_run(trimmed, digit) >= 3 {
            return true;
        }
    }
    false
}

/// Whitelisted abbreviation anywhere in the text, case-insensitive.
pub fn has_meaningful_abbreviation(text: &str) -> bool {
    let lower = text.to_lowercase();
    ABBREVIATIONS.iter().any(|abbr| lower.contains(abbr))
}

/// Whether a lone character is itself on one of the whitelists.
pub fn is_whitelisted_single_char(c: char) -> bool {
    EXPRESSIVE_SYMBOLS.contains(&c) || MEANINGFUL_DIGITS.contains(&c)
}

/// Tokenize for the lexical fallback: each CJK character is its own token,
/// ASCII alphanumeric runs form one token, everything else separates.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c.to_ascii_lowercase());
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            if is_cjk(c) {
                tokens.push(c.to_string());
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_cjk(c: char) -> bool {
    matches!(u32::from(c), 0x4E00..=0x9FFF | 0x3400..=0x4DBF)
}

/// Lexical heuristic used when the semantic classifier is unavailable:
/// at least two non-stopword tokens, or any token from the curated
/// always-meaningful dictionary.
pub fn is_meaningful_lexical(text: &str) -> bool {
    let tokens = tokenize(text);
    if tokens
        .iter()
        .any(|t| ALWAYS_MEANINGFUL.contains(&t.as_str()))
    {
        return true;
    }
    tokens
        .iter()
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .count()
        >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boilerplate_markers() {
        assert!(is_boilerplate("转发微博"));
        assert!(is_boilerplate("//@someone: 支持！"));
        assert!(is_boilerplate("https://example.com/p/123"));
        assert!(!is_boilerplate("看了 https://example.com 之后很感动"));
        assert!(!is_boilerplate("这个演技太差了"));
    }

    #[test]
    fn test_symbol_runs() {
        assert!(has_expressive_symbol_run("！！！"));
        assert!(has_expressive_symbol_run("？？"));
        assert!(has_expressive_symbol_run("..."));
        assert!(has_expressive_symbol_run("~~"));
        assert!(has_expressive_symbol_run("。。。"));
        assert!(!has_expressive_symbol_run("好。"));
        assert!(!has_expressive_symbol_run("ok."));
    }

    #[test]
    fn test_meaningful_numbers() {
        assert!(has_meaningful_number("666"));
        assert!(has_meaningful_number("666666"));
        assert!(has_meaningful_number("5201314"));
        assert!(has_meaningful_number("233"));
        assert!(!has_meaningful_number("12"));
        assert!(!has_meaningful_number("2024"));
    }

    #[test]
    fn test_abbreviations() {
        assert!(has_meaningful_abbreviation("yyds"));
        assert!(has_meaningful_abbreviation("YYDS!"));
        assert!(has_meaningful_abbreviation("姐姐tql"));
        assert!(!has_meaningful_abbreviation("hello"));
    }

    #[test]
    fn test_single_char_whitelist() {
        assert!(is_whitelisted_single_char('。'));
        assert!(is_whitelisted_single_char('6'));
        assert!(!is_whitelisted_single_char('x'));
        assert!(!is_whitelisted_single_char('5'));
    }

    #[test]
    fn test_tokenize_mixed_script() {
        let tokens = tokenize("新剧 is great 太棒");
        assert_eq!(
            tokens,
            vec!["新", "剧", "is", "great", "太", "棒"]
        );
    }

    #[test]
    fn test_lexical_fallback() {
        // Two non-stopword tokens
        assert!(is_meaningful_lexical("演技 在线"));
        // Curated dictionary hit
        assert!(is_meaningful_lexical("好"));
        // Only stopwords
        assert!(!is_meaningful_lexical("的 了 是"));
        assert!(!is_meaningful_lexical("the is"));
    }
}

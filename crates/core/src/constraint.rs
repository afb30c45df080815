use std::collections::BTreeSet;

use crate::domain::product::Category;

/// The one feature substring the pipeline currently recognizes, matched
/// against both the request text and product specs.
pub const NOISE_CANCEL_HINT: &str = "noise cancel";

/// Category, price-cap, and feature signals derived from the raw request
/// text, independently of whatever the advisor returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub category: Option<Category>,
    pub max_price: Option<u32>,
    pub feature_hints: BTreeSet<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ConstraintExtractor;

impl ConstraintExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Total and deterministic: the same text always yields the same
    /// constraint, and no input fails.
    pub fn extract(&self, text: &str) -> Constraint {
        let normalized_text = normalize_text(text);

        let category = infer_category(&normalized_text);
        let max_price = extract_max_price(&normalized_text);

        let mut feature_hints = BTreeSet::new();
        if normalized_text.contains(NOISE_CANCEL_HINT) {
            feature_hints.insert(NOISE_CANCEL_HINT.to_string());
        }

        Constraint { category, max_price, feature_hints }
    }
}

fn normalize_text(text: &str) -> String {
    text.to_ascii_lowercase()
}

/// First match wins. "headphone" is checked before "phone" so audio requests
/// never fall through to the Phone branch.
fn infer_category(normalized_text: &str) -> Option<Category> {
    const AUDIO_WORDS: [&str; 6] =
        ["headphone", "earphone", "airpod", "earbud", "headset", "audio"];

    if AUDIO_WORDS.iter().any(|word| normalized_text.contains(word)) {
        return Some(Category::Headphones);
    }
    if normalized_text.contains("tablet") {
        return Some(Category::Tablet);
    }
    if normalized_text.contains("phone") || normalized_text.contains("mobile") {
        return Some(Category::Phone);
    }
    if normalized_text.contains("laptop") {
        return Some(Category::Laptop);
    }
    if normalized_text.contains("watch") {
        return Some(Category::Smartwatch);
    }
    None
}

/// "under $N" / "below $N" with an optional dollar sign. An "under" amount
/// anywhere in the text wins over a "below" amount.
fn extract_max_price(normalized_text: &str) -> Option<u32> {
    let tokens = tokenize(normalized_text);
    price_after_keyword(&tokens, "under").or_else(|| price_after_keyword(&tokens, "below"))
}

fn price_after_keyword(tokens: &[String], keyword: &str) -> Option<u32> {
    tokens.windows(2).find_map(|window| {
        let [context, amount] = window else {
            return None;
        };
        if context == keyword {
            parse_price_token(amount)
        } else {
            None
        }
    })
}

fn parse_price_token(token: &str) -> Option<u32> {
    let unprefixed = token.strip_prefix('$').unwrap_or(token);
    let digits: String =
        unprefixed.chars().take_while(|character| character.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn tokenize(text: &str) -> Vec<String> {
    let mut sanitized = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_ascii_alphanumeric() || character == '$' {
            sanitized.push(character);
        } else {
            sanitized.push(' ');
        }
    }
    sanitized.split_whitespace().map(|token| token.to_string()).collect()
}

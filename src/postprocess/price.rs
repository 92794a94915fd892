//! Price text parsers for the two site variants.

use regex::Regex;
use std::sync::OnceLock;

/// Words that mark a quoted rent period ("per month", "на месец", ...).
const PERIOD_WORDS: [&str; 4] = ["month", "year", "месец", "година"];

/// Split a Rightmove-style price on `£` and collect every digit group.
///
/// Returns `(per_month, per_week)` from the first two groups, or `None` when
/// fewer than two groups exist.
///
/// ```
/// use estate_scraper::postprocess::price::parse_uk_price;
///
/// let parsed = parse_uk_price("£1,200 pcm £280 pw");
/// assert_eq!(parsed, Some(("1,200".to_string(), "280".to_string())));
/// ```
pub fn parse_uk_price(text: &str) -> Option<(String, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[1-9]\d{0,2}(?:,\d{3})*").unwrap());

    let amounts: Vec<&str> = text
        .split('£')
        .flat_map(|segment| re.find_iter(segment).map(|m| m.as_str()))
        .collect();

    match amounts.as_slice() {
        [month, week, ..] => Some((month.to_string(), week.to_string())),
        _ => None,
    }
}

/// Reduce a free-form price to a single number.
///
/// A quoted period returns the first number, a dash range returns the mean
/// of all numbers, anything else the first number if there is one. Digit
/// groups separated by single spaces form one number ("1 200" is 1200);
/// any other character between digits separates numbers.
pub fn parse_bg_price(text: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\d+(?: \d{3})*").unwrap());

    let lowered = text.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| match c {
            '–' | '—' => '-',
            c if c.is_ascii_digit() || c == '-' => c,
            _ => ' ',
        })
        .collect();

    let numbers: Vec<f64> = re
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().replace(' ', "").parse().ok())
        .collect();

    let first = numbers.first().copied();
    if PERIOD_WORDS.iter().any(|word| lowered.contains(word)) {
        return first;
    }
    if cleaned.contains('-') && numbers.len() > 1 {
        return Some(numbers.iter().sum::<f64>() / numbers.len() as f64);
    }
    first
}

/// Render a parsed amount the way it is stored: no trailing `.0`.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

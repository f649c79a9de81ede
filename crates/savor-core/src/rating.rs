//! Star-rating digits.
//!
//! Reviews and queries write ratings with ASCII or full-width digits
//! (`5星`, `５星`). Everything stored or compared is ASCII.

/// Value of an ASCII or full-width (U+FF10..U+FF19) decimal digit.
pub fn rating_digit(c: char) -> Option<u32> {
    match c {
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => c.to_digit(10),
    }
}

/// Replace full-width digits with their ASCII form, leaving other text as is.
pub fn normalize_rating(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => rating_digit(c)
                .and_then(|d| char::from_digit(d, 10))
                .unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Numeric rating, if the trimmed text is a whole number in either digit form.
pub fn parse_rating(text: &str) -> Option<i64> {
    normalize_rating(text.trim()).parse().ok()
}

/// Placeholder ISBN for books without a detail page or without an ISBN on it.
pub const UNAVAILABLE: &str = "Unavailable";

const PREFIXES: [&str; 2] = ["978", "979"];
const WINDOW: usize = 26;
const ISBN_LEN: usize = 13;

/// Find an ISBN-13 candidate in free page text.
///
/// "978" is always tried before "979", regardless of which occurs first.
/// From the match, a 26-character window is taken, hyphens are dropped and
/// the first 13 characters are kept. No checksum validation.
pub fn locate(text: &str) -> String {
    PREFIXES
        .iter()
        .find_map(|prefix| text.find(prefix))
        .map(|pos| {
            text[pos..]
                .chars()
                .take(WINDOW)
                .filter(|c| *c != '-')
                .take(ISBN_LEN)
                .collect()
        })
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

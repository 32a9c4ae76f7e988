//! UK postcode normalisation and outcode extraction.

use regex::Regex;
use std::sync::OnceLock;

fn postcode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z]{1,2}[0-9][A-Z0-9]?)([0-9][A-Z]{2})$").expect("static postcode regex")
    })
}

/// Normalise a user-typed postcode to "OUTCODE INCODE".
///
/// Returns `None` when the input does not have the shape of a UK postcode.
pub fn normalize_postcode(input: &str) -> Option<String> {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    // Girobank's historic code is the one postcode outside the regular grammar
    if compact == "GIR0AA" {
        return Some("GIR 0AA".to_string());
    }

    let caps = postcode_regex().captures(&compact)?;
    Some(format!("{} {}", &caps[1], &caps[2]))
}

/// Outcode of a postcode: the part before the space.
///
/// ONS exports pad PCD8 with extra spaces ("AB1  0AA"); unspaced input falls
/// back to dropping the three-character incode.
pub fn outcode_of(postcode: &str) -> Option<&str> {
    let trimmed = postcode.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains(char::is_whitespace) {
        return trimmed.split_whitespace().next();
    }

    if trimmed.len() > 3 && trimmed.is_ascii() {
        Some(&trimmed[..trimmed.len() - 3])
    } else {
        Some(trimmed)
    }
}

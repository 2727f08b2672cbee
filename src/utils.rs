// src/utils.rs
use anyhow::Result;
use std::str::FromStr;

/// Split a comma-separated value, dropping blank entries.
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Parse `"a,b,c"` into typed values. `None` or a blank string is an empty list.
pub fn parse_list<T>(raw: Option<&str>) -> Result<Vec<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => split_list(raw).map(T::from_str).collect(),
    }
}

/// Truncate for one-line terminal output.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

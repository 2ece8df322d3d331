//! Tweet-body field extraction for the tool lanes.
//!
//! Tool tweets carry their parameters inline ("amount 1.5", "target token
//! mint <mint>"); these helpers pull the value following a marker.

/// The text after `marker`, up to the end of the line.
pub fn field_after(text: &str, marker: &str) -> Option<String> {
    let (_, rest) = text.split_once(marker)?;
    let value = rest.trim_start().lines().next()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// The single whitespace-delimited token after `marker`.
pub fn word_after(text: &str, marker: &str) -> Option<String> {
    let (_, rest) = text.split_once(marker)?;
    rest.split_whitespace().next().map(str::to_string)
}

/// Comma-separated values after `marker` (rest of the text).
pub fn list_after(text: &str, marker: &str) -> Option<Vec<String>> {
    let (_, rest) = text.split_once(marker)?;
    let items: Vec<String> = rest
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_after_stops_at_newline() {
        let text = "swap request\namount 1.5\nslippage 0.3";
        assert_eq!(field_after(text, "amount").as_deref(), Some("1.5"));
        assert_eq!(field_after(text, "slippage").as_deref(), Some("0.3"));
    }

    #[test]
    fn test_field_after_missing_marker() {
        assert_eq!(field_after("no fields here", "amount"), None);
    }

    #[test]
    fn test_word_after_takes_single_token() {
        let text = "target token mint So11111111111111111111111111111111111111112 please";
        assert_eq!(
            word_after(text, "target token mint").as_deref(),
            Some("So11111111111111111111111111111111111111112")
        );
    }

    #[test]
    fn test_list_after_splits_and_trims() {
        let text = "send to the following users: addr1, addr2 ,addr3";
        assert_eq!(
            list_after(text, "to the following users:"),
            Some(vec![
                "addr1".to_string(),
                "addr2".to_string(),
                "addr3".to_string()
            ])
        );
    }

    #[test]
    fn test_list_after_empty_tail() {
        assert_eq!(list_after("to the following users: ", "to the following users:"), None);
    }
}

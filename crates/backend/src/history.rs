use crate::session::Exchange;

/// Sentinel rendered when a session has no prior exchanges.
pub const NO_HISTORY: &str = "No previous conversation.";

/// Render exchanges into the prompt fragment the answering model sees.
///
/// Each exchange becomes two labeled lines followed by a blank line, in
/// chronological order.
pub fn render_history(exchanges: &[Exchange]) -> String {
    if exchanges.is_empty() {
        return NO_HISTORY.to_string();
    }

    let mut text = String::new();
    for exchange in exchanges {
        text.push_str(&format!(
            "User: {}\nAssistant: {}\n\n",
            exchange.user, exchange.assistant
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_renders_sentinel() {
        assert_eq!(render_history(&[]), NO_HISTORY);
    }

    #[test]
    fn single_exchange_format() {
        let exchanges = vec![Exchange::new("u", "a")];
        assert_eq!(render_history(&exchanges), "User: u\nAssistant: a\n\n");
    }

    #[test]
    fn exchanges_render_in_order() {
        let exchanges = vec![
            Exchange::new("What is a fever?", "A raised body temperature."),
            Exchange::new("Is 37C a fever?", "No, 37C is within the normal range."),
        ];

        let text = render_history(&exchanges);
        let first = text.find("What is a fever?").unwrap();
        let second = text.find("Is 37C a fever?").unwrap();
        assert!(first < second);
        assert!(text.ends_with("\n\n"));
    }
}

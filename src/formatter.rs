/// Result of one formatting cycle.
///
/// `into_text` recovers the plain-string contract expected by editor
/// integrations: the formatted text, or an empty string meaning "keep the
/// original content unchanged".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    Formatted(String),
    Failed,
}

impl FormatOutcome {
    pub fn into_text(self) -> String {
        match self {
            FormatOutcome::Formatted(text) => text,
            FormatOutcome::Failed => String::new(),
        }
    }

    pub fn is_formatted(&self) -> bool {
        matches!(self, FormatOutcome::Formatted(_))
    }
}

/// The capability shared by the formatting strategies.
///
/// `file_identifier` is informational only; it shows up in log lines and is
/// never passed to the formatter.
pub trait Formatter {
    fn format(&self, content: &str, file_identifier: &str) -> FormatOutcome;

    fn format_text(&self, content: &str, file_identifier: &str) -> String {
        self.format(content, file_identifier).into_text()
    }

    /// Lifecycle hook for strategies that hold a long-lived process.
    fn dispose(&mut self) {}
}

/// Installed when no working formatter executable is available.
#[derive(Debug, Default)]
pub struct NullFormatter;

impl Formatter for NullFormatter {
    fn format(&self, _content: &str, file_identifier: &str) -> FormatOutcome {
        log::debug!("NullFormatter::format: skipping {}", file_identifier);
        FormatOutcome::Failed
    }
}

#[cfg(test)]
mod test_formatter {
    use super::*;

    #[test]
    fn failed_outcome_yields_an_empty_string() {
        assert_eq!(FormatOutcome::Failed.into_text(), "")
    }

    #[test]
    fn formatted_outcome_yields_the_text_verbatim() {
        assert_eq!(
            FormatOutcome::Formatted("class C { }\n".to_string()).into_text(),
            "class C { }\n"
        )
    }

    #[test]
    fn null_formatter_always_fails() {
        let outcome = NullFormatter.format("class C{}", "C.cs");
        assert_eq!(outcome, FormatOutcome::Failed)
    }
}

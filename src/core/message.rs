//! Message rendering
//!
//! A log call carries its payload in one of two explicit forms:
//!
//! - [`Message::Format`]: a template with arguments, built by `format_args!`
//!   (or the `*f!` macros). Rendered as `"[LABEL] "` followed by the
//!   formatted template.
//! - [`Message::Values`]: a list of values, built by the `values!` macro.
//!   Rendered as the `[LABEL]` token and every value's `Display` text joined
//!   by single spaces, terminated by a newline. Placeholders inside the values
//!   are never interpreted.

use super::severity::Severity;
use std::fmt::{self, Display, Write};

/// Payload of a single log call
#[derive(Clone, Copy)]
pub enum Message<'a> {
    /// Template plus arguments
    Format(fmt::Arguments<'a>),
    /// Arbitrary values joined by spaces
    Values(&'a [&'a dyn Display]),
}

impl<'a> Message<'a> {
    pub fn values(values: &'a [&'a dyn Display]) -> Self {
        Message::Values(values)
    }

    /// Render the full message for `severity`, including the `[LABEL]` tag
    pub fn render(&self, severity: Severity) -> String {
        let mut out = String::with_capacity(64);
        match self {
            Message::Format(args) => {
                let _ = write!(out, "[{}] {}", severity.label(), args);
            }
            Message::Values(values) => {
                let _ = write!(out, "[{}]", severity.label());
                for value in values.iter() {
                    let _ = write!(out, " {}", value);
                }
                out.push('\n');
            }
        }
        out
    }

    /// Render only the caller-supplied text, without the severity tag or the
    /// trailing newline of the values form
    pub fn text(&self) -> String {
        match self {
            Message::Format(args) => args.to_string(),
            Message::Values(values) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl<'a> From<fmt::Arguments<'a>> for Message<'a> {
    fn from(args: fmt::Arguments<'a>) -> Self {
        Message::Format(args)
    }
}

impl<'a> From<&'a [&'a dyn Display]> for Message<'a> {
    fn from(values: &'a [&'a dyn Display]) -> Self {
        Message::Values(values)
    }
}

impl<'a, const N: usize> From<&'a [&'a dyn Display; N]> for Message<'a> {
    fn from(values: &'a [&'a dyn Display; N]) -> Self {
        Message::Values(values)
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Format(args) => f.debug_tuple("Format").field(&args.to_string()).finish(),
            Message::Values(values) => f.debug_tuple("Values").field(&values.len()).finish(),
        }
    }
}

/// Render `message` at `severity`
pub fn render<'a>(severity: Severity, message: impl Into<Message<'a>>) -> String {
    message.into().render(severity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_form_substitutes_arguments() {
        assert_eq!(render(Severity::Info, format_args!("count={}", 5)), "[INFO] count=5");
        assert_eq!(
            render(Severity::Warn, format_args!("{} of {}", 3, 5)),
            "[WARN] 3 of 5"
        );
    }

    #[test]
    fn test_values_form_joins_with_newline() {
        let values: [&dyn Display; 1] = [&42];
        assert_eq!(render(Severity::Info, &values), "[INFO] 42\n");

        let values: [&dyn Display; 3] = [&"user", &7, &1.5];
        assert_eq!(render(Severity::Error, &values), "[ERROR] user 7 1.5\n");
    }

    #[test]
    fn test_values_form_keeps_placeholders() {
        let values: [&dyn Display; 2] = [&"count={}", &5];
        assert_eq!(render(Severity::Debug, &values), "[DEBUG] count={} 5\n");
    }

    #[test]
    fn test_text_strips_label() {
        assert_eq!(Message::from(format_args!("boom {}", 1)).text(), "boom 1");
        let values: [&dyn Display; 2] = [&"boom", &2];
        assert_eq!(Message::values(&values).text(), "boom 2");
    }
}

use garde::{Report, Validate};
use std::fmt;

/// Attribute name for errors that belong to the record as a whole.
pub const BASE: &str = "base";

/// Field-level validation messages, rendered as "<Attribute> <message>".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: Vec<(&'static str, String)>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs garde over `input` and keeps one message per failing attribute.
    ///
    /// `fields` lists `(attribute, checked value)` in display order. An empty value
    /// reports "can't be blank"; any other failure reports "is invalid".
    pub fn validate<T>(input: &T, fields: &[(&'static str, &str)]) -> Self
    where
        T: Validate,
        T::Context: Default,
    {
        match input.validate() {
            Ok(()) => Self::new(),
            Err(report) => Self::from_report(&report, fields),
        }
    }

    fn from_report(report: &Report, fields: &[(&'static str, &str)]) -> Self {
        let failing: Vec<String> = report.iter().map(|(path, _)| path.to_string()).collect();

        let mut errors = Self::new();
        for &(attribute, value) in fields {
            if !failing.iter().any(|path| path == attribute) {
                continue;
            }
            if value.is_empty() {
                errors.add(attribute, "can't be blank");
            } else {
                errors.add(attribute, "is invalid");
            }
        }
        errors
    }

    pub fn add(&mut self, attribute: &'static str, message: impl Into<String>) {
        self.entries.push((attribute, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn on(&self, attribute: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(attr, _)| *attr == attribute)
            .map(|(_, msg)| msg.as_str())
            .collect()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(attr, msg)| {
                if *attr == BASE {
                    msg.clone()
                } else {
                    format!("{} {}", humanize(attr), msg)
                }
            })
            .collect()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

/// `display_name` -> `Display name`
fn humanize(attribute: &str) -> String {
    let spaced = attribute.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Contact {
        #[garde(length(min = 1), email)]
        email: String,
        #[garde(length(min = 1))]
        display_name: String,
    }

    fn check(email: &str, display_name: &str) -> Errors {
        let contact = Contact {
            email: email.to_string(),
            display_name: display_name.to_string(),
        };
        Errors::validate(
            &contact,
            &[
                ("email", contact.email.as_str()),
                ("display_name", contact.display_name.as_str()),
            ],
        )
    }

    #[test]
    fn full_messages_humanize_attribute_names() {
        let mut errors = Errors::new();
        errors.add("email", "can't be blank");
        errors.add("display_name", "can't be blank");
        errors.add(BASE, "Something went wrong");

        assert_eq!(
            errors.full_messages(),
            vec![
                "Email can't be blank",
                "Display name can't be blank",
                "Something went wrong",
            ]
        );
        assert_eq!(errors.on("email"), vec!["can't be blank"]);
        assert!(errors.on("payee_name").is_empty());
    }

    #[test]
    fn blank_wins_over_invalid() {
        let errors = check("", "");
        assert_eq!(
            errors.full_messages(),
            vec!["Email can't be blank", "Display name can't be blank"]
        );
    }

    #[test]
    fn malformed_email_is_invalid() {
        assert_eq!(check("root", "Root").full_messages(), vec!["Email is invalid"]);
        assert_eq!(check("foo bar@example.com", "Root").full_messages(), vec!["Email is invalid"]);
        assert!(check("root@casa.com", "Root").is_empty());
    }
}

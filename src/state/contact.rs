// Contact form: per-field rules, inline errors, and a simulated send.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| match Regex::new(EMAIL_PATTERN) {
    Ok(re) => Some(re),
    Err(e) => {
        tracing::error!(error = %e, "Email pattern failed to compile");
        None
    }
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

#[derive(Debug, Clone, Copy, Default)]
struct FieldRules {
    required: bool,
    min_len: Option<usize>,
    max_len: Option<usize>,
    email: bool,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Subject,
        ContactField::Message,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContactField::Name => "Name",
            ContactField::Email => "Email",
            ContactField::Subject => "Subject",
            ContactField::Message => "Message",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn rules(self) -> FieldRules {
        match self {
            ContactField::Name => FieldRules {
                required: true,
                min_len: Some(2),
                max_len: Some(50),
                ..FieldRules::default()
            },
            ContactField::Email => FieldRules {
                required: true,
                email: true,
                ..FieldRules::default()
            },
            ContactField::Subject => FieldRules {
                required: true,
                ..FieldRules::default()
            },
            ContactField::Message => FieldRules {
                required: true,
                min_len: Some(10),
                max_len: Some(1000),
                ..FieldRules::default()
            },
        }
    }
}

/// Check `value` against the rules for `field`.
///
/// Returns the message to show next to the field, or `None` when the value
/// is acceptable. Surrounding whitespace is ignored and lengths count
/// characters, not bytes.
pub fn validate_field(field: ContactField, value: &str) -> Option<String> {
    let rules = field.rules();
    let value = value.trim();

    if value.is_empty() {
        return rules
            .required
            .then(|| "This field is required".to_string());
    }

    let len = value.chars().count();
    if let Some(min) = rules.min_len.filter(|min| len < *min) {
        return Some(format!("Must be at least {} characters", min));
    }
    if let Some(max) = rules.max_len.filter(|max| len > *max) {
        return Some(format!("Must be no more than {} characters", max));
    }
    if rules.email && !EMAIL.as_ref().is_some_and(|re| re.is_match(value)) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

/// A validated message, trimmed and ready to hand off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ContactForm {
    values: [String; 4],
    errors: [Option<String>; 4],
    /// Focused row. One past the last field is the Send button.
    focus: usize,
    /// The focused field takes keystrokes.
    pub editing: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: ContactField) -> &str {
        &self.values[field.index()]
    }

    pub fn error(&self, field: ContactField) -> Option<&str> {
        self.errors[field.index()].as_deref()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Option::is_some)
    }

    /// `None` while the Send button has focus.
    pub fn focused(&self) -> Option<ContactField> {
        ContactField::ALL.get(self.focus).copied()
    }

    pub fn send_focused(&self) -> bool {
        self.focused().is_none()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1).min(ContactField::ALL.len());
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    /// Begin typing into the focused field. False on the Send button.
    pub fn start_editing(&mut self) -> bool {
        self.editing = self.focused().is_some();
        self.editing
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.focused().filter(|_| self.editing) {
            self.values[field.index()].push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.focused().filter(|_| self.editing) {
            self.values[field.index()].pop();
        }
    }

    /// Leave the field and validate what was typed.
    pub fn finish_editing(&mut self) {
        self.editing = false;
        if let Some(field) = self.focused() {
            self.errors[field.index()] = validate_field(field, self.value(field));
        }
    }

    /// Validate every field. On failure focus moves to the first bad one.
    pub fn validate_all(&mut self) -> bool {
        for field in ContactField::ALL {
            self.errors[field.index()] = validate_field(field, self.value(field));
        }
        match self.errors.iter().position(Option::is_some) {
            Some(first) => {
                self.focus = first;
                false
            }
            None => true,
        }
    }

    /// Validate and, if everything passes, take the values and clear the form.
    pub fn submit(&mut self) -> Option<ContactSubmission> {
        self.editing = false;
        if !self.validate_all() {
            return None;
        }
        let trimmed = |field: ContactField| self.value(field).trim().to_string();
        let submission = ContactSubmission {
            name: trimmed(ContactField::Name),
            email: trimmed(ContactField::Email),
            subject: trimmed(ContactField::Subject),
            message: trimmed(ContactField::Message),
        };
        self.reset();
        Some(submission)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//! # Field validation: pure, stateless input checks.
//!
//! [`FieldKind`] enumerates the form fields the application collects and
//! carries their validation contract: a maximum length, an allowed character
//! set for incremental editing, and a full-match pattern. [`FieldKind::validate`]
//! returns a [`ValidationResult`] with a stable error code; mapping codes to
//! on-screen text is the host's concern.
//!
//! No concurrency, no state: every function is a pure check over its input.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Compiled full-match patterns, keyed by field kind.
static PATTERNS: LazyLock<HashMap<FieldKind, Regex>> = LazyLock::new(|| {
    FieldKind::all()
        .iter()
        .filter_map(|kind| {
            let anchored = format!("^(?:{})$", kind.pattern());
            Regex::new(&anchored).ok().map(|re| (*kind, re))
        })
        .collect()
});

/// Outcome of validating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the input satisfies the field's contract.
    pub is_valid: bool,
    /// Stable error code when invalid (e.g. `"invalid_email"`).
    pub error: Option<&'static str>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn fail(code: &'static str) -> Self {
        Self {
            is_valid: false,
            error: Some(code),
        }
    }
}

/// Form field kinds with their validation contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Email address.
    Email,
    /// Account password.
    Password,
    /// Mobile phone number.
    Mobile,
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Referral code.
    ReferralCode,
    /// Monetary amount.
    Amount,
    /// National identity card number.
    NationalId,
}

impl FieldKind {
    /// All field kinds.
    pub fn all() -> &'static [FieldKind] {
        &[
            FieldKind::Email,
            FieldKind::Password,
            FieldKind::Mobile,
            FieldKind::FirstName,
            FieldKind::LastName,
            FieldKind::ReferralCode,
            FieldKind::Amount,
            FieldKind::NationalId,
        ]
    }

    /// Maximum accepted length for incremental editing.
    pub fn max_limit(&self) -> usize {
        match self {
            FieldKind::Mobile => 10,
            FieldKind::FirstName | FieldKind::LastName => 25,
            FieldKind::Password => 15,
            FieldKind::ReferralCode => 30,
            FieldKind::NationalId => 9,
            _ => 200,
        }
    }

    /// Characters accepted during incremental editing; empty means
    /// unrestricted.
    pub fn allowed_characters(&self) -> &'static str {
        match self {
            FieldKind::Email => {
                "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&'*+-/=?^_`{|}~;@."
            }
            FieldKind::Mobile | FieldKind::NationalId => "0123456789",
            FieldKind::Amount => "0123456789.",
            _ => "",
        }
    }

    /// Full-match pattern for the completed input.
    pub fn pattern(&self) -> &'static str {
        match self {
            FieldKind::Email => r"[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,4}",
            FieldKind::FirstName | FieldKind::LastName => "[A-Za-z]{2,25}",
            FieldKind::Password => "[a-zA-Z0-9!@#$%^&*]{8,15}",
            FieldKind::Mobile => "[0-9]{9,12}",
            FieldKind::ReferralCode => r"\w{0,20}",
            FieldKind::Amount => r"\d+(\.\d{1,2})?",
            FieldKind::NationalId => "[0-9]{9}",
        }
    }

    /// Validates a completed input against this field's contract.
    pub fn validate(&self, input: &str) -> ValidationResult {
        match self {
            FieldKind::Email => self.require_then_match(input, "please_enter_email", "invalid_email"),
            FieldKind::Mobile => {
                self.require_then_match(input, "please_enter_mobile", "invalid_mobile")
            }
            FieldKind::FirstName => {
                self.require_then_match(input, "please_enter_first_name", "invalid_first_name")
            }
            FieldKind::LastName => {
                self.require_then_match(input, "please_enter_last_name", "invalid_last_name")
            }
            FieldKind::NationalId => {
                self.require_then_match(input, "please_enter_national_id", "invalid_national_id")
            }
            FieldKind::Password => validate_password(input),
            FieldKind::ReferralCode => {
                if input.chars().count() <= 20 {
                    ValidationResult::ok()
                } else {
                    ValidationResult::fail("invalid_referral_code")
                }
            }
            FieldKind::Amount => validate_amount(input),
        }
    }

    /// True when the full input matches this field's pattern.
    pub fn matches_pattern(&self, input: &str) -> bool {
        PATTERNS.get(self).is_some_and(|re| re.is_match(input))
    }

    /// Incremental-editing gate: whether appending `addition` to `current`
    /// stays within the length limit and the allowed character set.
    pub fn allows_insertion(&self, current: &str, addition: &str) -> bool {
        if current.chars().count() + addition.chars().count() > self.max_limit() {
            return false;
        }
        let allowed = self.allowed_characters();
        if allowed.is_empty() {
            return true;
        }
        addition.chars().all(|c| allowed.contains(c))
    }

    fn require_then_match(
        &self,
        input: &str,
        empty_code: &'static str,
        invalid_code: &'static str,
    ) -> ValidationResult {
        if input.is_empty() {
            return ValidationResult::fail(empty_code);
        }
        if !self.matches_pattern(input) {
            return ValidationResult::fail(invalid_code);
        }
        ValidationResult::ok()
    }
}

fn validate_password(input: &str) -> ValidationResult {
    if input.is_empty() {
        return ValidationResult::fail("please_enter_password");
    }
    let len = input.chars().count();
    if !(8..=25).contains(&len) {
        return ValidationResult::fail("password_out_of_range");
    }
    if !FieldKind::Password.matches_pattern(input) {
        return ValidationResult::fail("invalid_password");
    }
    ValidationResult::ok()
}

fn validate_amount(input: &str) -> ValidationResult {
    if input.is_empty() {
        return ValidationResult::fail("please_enter_amount");
    }
    match input.parse::<f64>() {
        Ok(v) if v > 0.0 => ValidationResult::ok(),
        _ => ValidationResult::fail("invalid_amount"),
    }
}

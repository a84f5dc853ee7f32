use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9\-]{1,31}$").expect("username regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?)*$")
        .expect("email regex")
});

fn password_is_strong(password: &str) -> bool {
    if password.len() < 8 || !password.chars().all(|c| (' '..='~').contains(&c)) {
        return false;
    }
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Field-level checks for registration. Collected, not fail-fast, so the
/// client gets the full list in one round trip.
pub fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
    displayname: Option<&str>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !USERNAME_RE.is_match(username) {
        errors.push(FieldError::new(
            "username",
            "Username must be at most 31 characters and contain only alphanumeric characters and dashes.",
        ));
    }
    if !password_is_strong(password) {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters, contain only ASCII characters, and contain at least one uppercase letter, lowercase letter, number, and special character.",
        ));
    }
    if email.len() > 255 || !EMAIL_RE.is_match(email) {
        errors.push(FieldError::new("email", "Email is either too long or not valid."));
    }
    if let Some(displayname) = displayname {
        if displayname.len() > 63 {
            errors.push(FieldError::new(
                "displayname",
                "Display name cannot be more than 63 characters.",
            ));
        }
    }

    errors
}

/// Field-level checks shared by event creation and patching.
pub fn validate_event_fields(displayname: Option<&str>, description: Option<&str>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(displayname) = displayname {
        if displayname.is_empty() {
            errors.push(FieldError::new("displayname", "You must enter a display name."));
        } else if displayname.len() > 255 {
            errors.push(FieldError::new(
                "displayname",
                "Display name must be less than 256 characters long.",
            ));
        }
    }
    if let Some(description) = description {
        if description.len() > 10000 {
            errors.push(FieldError::new(
                "description",
                "Description must be at most 10000 characters long.",
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_registration_has_no_errors() {
        let errors = validate_registration("jane-doe", "Sup3r$ecret", "jane@example.com", Some("Jane"));
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_collects_all_failures_at_once() {
        let errors = validate_registration("bad name!", "weak", "not-an-email", None);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "password", "email"]);
    }

    #[test]
    fn test_password_rules() {
        assert!(password_is_strong("Sup3r$ecret"));
        assert!(!password_is_strong("Sh0rt$!"));
        assert!(!password_is_strong("alllower3$"));
        assert!(!password_is_strong("NoDigits$$"));
        assert!(!password_is_strong("NoSpecial33"));
        assert!(!password_is_strong("Ünïcödé3$aa"));
    }

    #[test]
    fn test_event_displayname_required_and_bounded() {
        assert_eq!(validate_event_fields(Some(""), None)[0].field, "displayname");
        let long = "x".repeat(256);
        assert_eq!(validate_event_fields(Some(&long), None)[0].field, "displayname");
        assert!(validate_event_fields(Some("Board games"), None).is_empty());
    }

    #[test]
    fn test_event_description_bounded() {
        let long = "x".repeat(10001);
        assert_eq!(validate_event_fields(Some("ok"), Some(&long))[0].field, "description");
    }
}

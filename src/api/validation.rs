use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::ApiError;
use super::types::{ContactRequest, EventPayload, JoinRequest, LoginRequest, RegisterRequest};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Optional leading `+`, 7-15 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]?[0-9]{7,15}$").expect("valid phone regex"));

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collects every failing rule instead of stopping at the first, so the
/// client gets the full picture in one 400 response.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, format!("{field} is required"));
        }
        self
    }

    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min || len > max {
            self.fail(
                field,
                format!("{field} must be between {min} and {max} characters"),
            );
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !EMAIL_RE.is_match(value) {
            self.fail(field, "Valid email is required");
        }
        self
    }

    pub fn phone(&mut self, field: &str, value: &str) -> &mut Self {
        if !PHONE_RE.is_match(value) {
            self.fail(field, "Valid phone number is required");
        }
        self
    }

    /// Study year, 1 through 4.
    pub fn year(&mut self, field: &str, value: Option<i32>) -> &mut Self {
        match value {
            Some(1..=4) => {}
            _ => self.fail(field, "Year must be between 1 and 4"),
        }
        self
    }

    pub fn datetime(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_iso8601(value) {
            self.fail(field, "Valid date/time is required");
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: i32) -> &mut Self {
        if value <= 0 {
            self.fail(field, format!("{field} must be a positive integer"));
        }
        self
    }

    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> &mut Self {
        if !allowed.contains(&value) {
            self.fail(
                field,
                format!("{field} must be one of: {}", allowed.join(", ")),
            );
        }
        self
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ValidationFailed(self.errors))
        }
    }
}

fn is_iso8601(value: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(value).is_ok()
        || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
}

// ============================================================================
// Per-endpoint rule sets
// ============================================================================

pub fn validate_join(req: &JoinRequest) -> Result<(), ApiError> {
    let mut v = Validator::new();
    v.required("fullName", &req.full_name)
        .length("fullName", &req.full_name, 2, 100)
        .email("email", &req.email)
        .required("phone", &req.phone)
        .phone("phone", &req.phone)
        .required("department", &req.department)
        .year("year", req.year);
    v.finish()
}

pub fn validate_contact(req: &ContactRequest) -> Result<(), ApiError> {
    let mut v = Validator::new();
    v.required("name", &req.name)
        .length("name", &req.name, 2, 100)
        .email("email", &req.email)
        .required("subject", &req.subject)
        .length("subject", &req.subject, 5, 200)
        .required("message", &req.message)
        .length("message", &req.message, 10, 2000);
    v.finish()
}

pub fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut v = Validator::new();
    v.required("name", &req.name).email("email", &req.email);

    if let Some(phone) = &req.phone {
        v.phone("phone", phone);
    }
    if req.year.is_some() {
        v.year("year", req.year);
    }

    v.finish()
}

pub fn validate_event(req: &EventPayload) -> Result<(), ApiError> {
    let mut v = Validator::new();
    v.required("name", &req.name)
        .required("schedule", &req.schedule)
        .datetime("schedule", &req.schedule)
        .required("location", &req.location);

    if let Some(max) = req.max_participants {
        v.positive("maxParticipants", max);
    }

    v.finish()
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    let mut v = Validator::new();
    v.required("username", &req.username)
        .required("password", &req.password);
    v.finish()
}

pub fn validate_member_status(status: &str) -> Result<(), ApiError> {
    let mut v = Validator::new();
    v.one_of("status", status, &["approved", "rejected", "pending"]);
    v.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join_request() -> JoinRequest {
        JoinRequest {
            full_name: "Alice Lee".to_string(),
            email: "alice@example.edu".to_string(),
            phone: "+19995550123".to_string(),
            department: "CSE".to_string(),
            year: Some(2),
            experience: None,
            motivation: None,
        }
    }

    #[test]
    fn test_valid_join_passes() {
        assert!(validate_join(&join_request()).is_ok());
    }

    #[test]
    fn test_join_collects_all_failures() {
        let req = JoinRequest {
            full_name: String::new(),
            email: "not-an-email".to_string(),
            phone: "abc".to_string(),
            department: String::new(),
            year: Some(7),
            experience: None,
            motivation: None,
        };

        let Err(ApiError::ValidationFailed(errors)) = validate_join(&req) else {
            panic!("expected validation failure");
        };

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"fullName"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"phone"));
        assert!(fields.contains(&"department"));
        assert!(fields.contains(&"year"));
    }

    #[test]
    fn test_phone_rule() {
        let mut ok = Validator::new();
        ok.phone("phone", "+19995550123");
        assert!(ok.finish().is_ok());

        let mut bare_digits = Validator::new();
        bare_digits.phone("phone", "9489634752");
        assert!(bare_digits.finish().is_ok());

        let mut too_short = Validator::new();
        too_short.phone("phone", "+12345");
        assert!(too_short.finish().is_err());

        let mut letters = Validator::new();
        letters.phone("phone", "phone-number");
        assert!(letters.finish().is_err());
    }

    #[test]
    fn test_year_range() {
        for year in 1..=4 {
            let mut v = Validator::new();
            v.year("year", Some(year));
            assert!(v.finish().is_ok());
        }

        for year in [Some(0), Some(5), Some(-1), None] {
            let mut v = Validator::new();
            v.year("year", year);
            assert!(v.finish().is_err());
        }
    }

    #[test]
    fn test_datetime_formats() {
        for value in [
            "2025-08-20T18:00:00Z",
            "2025-08-20T18:00:00+05:30",
            "2025-08-20T18:00:00",
            "2025-08-20 18:00:00",
        ] {
            assert!(is_iso8601(value), "expected {value} to parse");
        }

        assert!(!is_iso8601("next wednesday"));
        assert!(!is_iso8601("2025-13-40 99:99:99"));
    }

    #[test]
    fn test_contact_length_bounds() {
        let req = ContactRequest {
            name: "Al".to_string(),
            email: "al@example.org".to_string(),
            subject: "Hi".to_string(),
            message: "Too short".to_string(),
        };

        let Err(ApiError::ValidationFailed(errors)) = validate_contact(&req) else {
            panic!("expected validation failure");
        };

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"subject"));
        assert!(fields.contains(&"message"));
        assert!(!fields.contains(&"name"));
    }

    #[test]
    fn test_member_status_vocabulary() {
        assert!(validate_member_status("approved").is_ok());
        assert!(validate_member_status("rejected").is_ok());
        assert!(validate_member_status("pending").is_ok());
        assert!(validate_member_status("banned").is_err());
        assert!(validate_member_status("").is_err());
    }

    #[test]
    fn test_registration_optional_fields() {
        let minimal = RegisterRequest {
            event_id: Some(1),
            name: "Bob".to_string(),
            email: "bob@example.org".to_string(),
            phone: None,
            department: None,
            year: None,
        };
        assert!(validate_registration(&minimal).is_ok());

        let bad_phone = RegisterRequest {
            phone: Some("nope".to_string()),
            ..minimal
        };
        assert!(validate_registration(&bad_phone).is_err());
    }
}

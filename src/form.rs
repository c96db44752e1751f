// Form-level invalid-set and submission gate

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::errors::{SubmitError, UnknownField, ValidationFailures};
use crate::field::FieldValidator;

/// Owns the per-field controllers and the set of currently-invalid field keys.
///
/// The invalid-set is mutated only from the transition callbacks the form
/// installs on its fields; a key is present iff that field's most recent
/// evaluation failed at least one rule. Submission is gated on the set being
/// empty.
pub struct Form {
    // insertion order preserved for display
    fields: Vec<FieldValidator>,
    invalid: Arc<Mutex<HashSet<String>>>,
}

impl Form {
    /// Create an empty form
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            invalid: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Register a field.
    ///
    /// The field's transition listener is wired to this form's invalid-set,
    /// and its initial validity seeds the set immediately, so `can_submit`
    /// is correct before any interaction.
    pub fn add_field(&mut self, mut field: FieldValidator) {
        let invalid = Arc::clone(&self.invalid);
        field.subscribe(Arc::new(move |is_valid, key| {
            apply_transition(&invalid, is_valid, key);
        }));
        apply_transition(&self.invalid, field.is_valid(), field.key());
        self.fields.push(field);
    }

    /// Route a value change to the owning field
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.key() == key)
            .ok_or_else(|| UnknownField(key.to_string()))?;
        field.on_value_change(value);
        Ok(())
    }

    /// Look up a field by key
    pub fn field(&self, key: &str) -> Option<&FieldValidator> {
        self.fields.iter().find(|f| f.key() == key)
    }

    /// True iff every field is currently valid
    pub fn can_submit(&self) -> bool {
        self.invalid.lock().unwrap().is_empty()
    }

    /// Currently-invalid field keys, in field declaration order
    pub fn invalid_fields(&self) -> Vec<String> {
        let set = self.invalid.lock().unwrap();
        self.fields
            .iter()
            .filter(|f| set.contains(f.key()))
            .map(|f| f.key().to_string())
            .collect()
    }

    /// Current first-failure per field, for display or JSON rendering
    pub fn failures(&self) -> ValidationFailures {
        ValidationFailures::new(self.fields.iter().filter_map(|f| f.failure().cloned()).collect())
    }

    /// Submission gate: returns the field values snapshot when every field is
    /// valid, and the invalid keys otherwise.
    pub fn submit(&self) -> Result<HashMap<String, String>, SubmitError> {
        if self.can_submit() {
            Ok(self
                .fields
                .iter()
                .map(|f| (f.key().to_string(), f.value().to_string()))
                .collect())
        } else {
            let fields = self.invalid_fields();
            debug!(invalid = ?fields, "submission blocked");
            Err(SubmitError { fields })
        }
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

/// Single mutation entry point for the invalid-set
fn apply_transition(invalid: &Mutex<HashSet<String>>, is_valid: bool, key: &str) {
    let mut set = invalid.lock().unwrap();
    if is_valid {
        set.remove(key);
    } else {
        set.insert(key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    fn required_field(key: &str) -> FieldValidator {
        FieldValidator::new(key, "", vec![Rule::required("required")])
    }

    #[test]
    fn test_empty_form_can_submit() {
        let form = Form::new();
        assert!(form.can_submit());
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_initial_values_seed_invalid_set() {
        let mut form = Form::new();
        form.add_field(required_field("first_name"));
        form.add_field(FieldValidator::new(
            "nickname",
            "ada",
            vec![Rule::required("required")],
        ));

        assert!(!form.can_submit());
        assert_eq!(form.invalid_fields(), vec!["first_name".to_string()]);
    }

    #[test]
    fn test_gate_opens_only_when_all_fields_valid() {
        let mut form = Form::new();
        form.add_field(required_field("first_name"));
        form.add_field(required_field("last_name"));
        assert!(!form.can_submit());

        form.set_value("first_name", "Ada").unwrap();
        assert!(!form.can_submit());

        form.set_value("last_name", "Lovelace").unwrap();
        assert!(form.can_submit());
    }

    #[test]
    fn test_invalid_set_tracks_latest_evaluation() {
        let mut form = Form::new();
        form.add_field(required_field("name"));

        form.set_value("name", "Ada").unwrap();
        assert!(form.invalid_fields().is_empty());

        form.set_value("name", "  ").unwrap();
        assert_eq!(form.invalid_fields(), vec!["name".to_string()]);

        form.set_value("name", "Ada").unwrap();
        assert!(form.invalid_fields().is_empty());
    }

    #[test]
    fn test_set_value_unknown_key() {
        let mut form = Form::new();
        form.add_field(required_field("name"));

        let err = form.set_value("email", "a@b.co").unwrap_err();
        assert_eq!(err.to_string(), "unknown field `email`");
    }

    #[test]
    fn test_submit_returns_values_snapshot() {
        let mut form = Form::new();
        form.add_field(FieldValidator::new(
            "email",
            "a@b.co",
            vec![Rule::required("required"), Rule::email("invalid")],
        ));
        form.add_field(FieldValidator::new("note", "hi", vec![]));

        let values = form.submit().unwrap();
        assert_eq!(values.get("email").map(String::as_str), Some("a@b.co"));
        assert_eq!(values.get("note").map(String::as_str), Some("hi"));
    }

    #[test]
    fn test_blocked_submit_lists_invalid_fields() {
        let mut form = Form::new();
        form.add_field(required_field("first_name"));
        form.add_field(required_field("last_name"));
        form.set_value("first_name", "Ada").unwrap();

        let err = form.submit().unwrap_err();
        assert_eq!(err.fields, vec!["last_name".to_string()]);
    }

    #[test]
    fn test_failures_report_first_failure_per_field() {
        let mut form = Form::new();
        form.add_field(FieldValidator::new(
            "email",
            "bad",
            vec![
                Rule::required("Email is required"),
                Rule::email("Email is invalid"),
            ],
        ));
        form.add_field(FieldValidator::new("note", "", vec![]));

        let failures = form.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures.for_field("email").map(|f| f.message.as_str()),
            Some("Email is invalid")
        );

        let json = failures.to_json();
        assert_eq!(json["failures"][0]["rule"], "regexp");
    }
}

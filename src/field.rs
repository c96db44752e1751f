// Per-field validation controller

use std::sync::Arc;

use tracing::debug;

use crate::errors::ValidationFailure;
use crate::rules::Rule;

/// Subscriber invoked on validity transitions: `(is_valid, field_key)`
pub type ValidationListener = Arc<dyn Fn(bool, &str) + Send + Sync>;

/// Owns one field's value and its ordered rule list.
///
/// Every value change re-evaluates all rules and recomputes validity; the
/// listener is invoked exactly once per validity flip (valid to invalid or
/// back), never on a change that leaves validity unchanged. A field with no
/// rules is always valid.
pub struct FieldValidator {
    key: String,
    value: String,
    rules: Vec<Rule>,
    is_valid: bool,
    failure: Option<ValidationFailure>,
    listener: Option<ValidationListener>,
}

impl FieldValidator {
    /// Create a controller for a field.
    ///
    /// Validity is computed from the initial value immediately, so the
    /// state is correct before any user interaction.
    pub fn new(key: impl Into<String>, initial_value: impl Into<String>, rules: Vec<Rule>) -> Self {
        let key = key.into();
        let value = initial_value.into();
        let failure = first_failure(&key, &value, &rules);
        let is_valid = failure.is_none();
        Self {
            key,
            value,
            rules,
            is_valid,
            failure,
            listener: None,
        }
    }

    /// Field key, unique within its form
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Current aggregate validity (all rules pass)
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// First failing rule's failure, if any, for inline display
    pub fn failure(&self) -> Option<&ValidationFailure> {
        self.failure.as_ref()
    }

    /// Attach the transition subscriber. At most one listener per field;
    /// subscribing again replaces the previous listener.
    pub fn subscribe(&mut self, listener: ValidationListener) {
        self.listener = Some(listener);
    }

    /// Handle a value change: store the value, re-evaluate all rules, and
    /// notify the listener iff aggregate validity flipped.
    pub fn on_value_change(&mut self, new_value: impl Into<String>) {
        self.value = new_value.into();
        self.failure = first_failure(&self.key, &self.value, &self.rules);

        let new_is_valid = self.failure.is_none();
        if new_is_valid != self.is_valid {
            self.is_valid = new_is_valid;
            debug!(field = %self.key, valid = new_is_valid, "validity transition");
            if let Some(listener) = &self.listener {
                listener(new_is_valid, &self.key);
            }
        }
    }
}

/// A field is valid iff every rule passes; the first failure in declaration
/// order supplies the surfaced message.
fn first_failure(field: &str, value: &str, rules: &[Rule]) -> Option<ValidationFailure> {
    rules.iter().find_map(|rule| rule.evaluate(value, field).err())
}

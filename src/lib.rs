//! Declarative field validation with transition-aware form gating
//!
//! Provides a per-field validation engine for registration-style forms:
//! each field owns an ordered list of rules, re-validates on every value
//! change, and notifies the parent form only when its aggregate validity
//! flips. The form tracks the set of currently-invalid field keys and gates
//! submission on that set being empty.
//!
//! # Examples
//!
//! ## A single field
//!
//! ```
//! use formgate::{FieldValidator, Rule};
//!
//! let mut email = FieldValidator::new(
//!     "email",
//!     "",
//!     vec![
//!         Rule::required("Email is required"),
//!         Rule::email("Email is invalid"),
//!     ],
//! );
//!
//! assert!(!email.is_valid());
//! assert_eq!(email.failure().unwrap().message, "Email is required");
//!
//! email.on_value_change("a@b.co");
//! assert!(email.is_valid());
//! ```
//!
//! ## A form with a submission gate
//!
//! ```
//! use formgate::{FieldValidator, Form, Rule};
//!
//! let mut form = Form::new();
//! form.add_field(FieldValidator::new(
//!     "password",
//!     "",
//!     vec![
//!         Rule::required("Password is required"),
//!         Rule::contains_digit("Password must contain a digit"),
//!         Rule::min(6, "Password must be at least 6 characters"),
//!     ],
//! ));
//!
//! assert!(!form.can_submit());
//!
//! form.set_value("password", "abc123").unwrap();
//! assert!(form.can_submit());
//! let values = form.submit().unwrap();
//! assert_eq!(values["password"], "abc123");
//! ```
//!
//! ## Declarative rule descriptors
//!
//! ```
//! use formgate::{compile_rules, RuleDescriptor};
//!
//! let descriptors: Vec<RuleDescriptor> = serde_json::from_str(r#"[
//!     { "rule": "required", "message": "Last name is required" },
//!     { "rule": "min", "value": 2, "message": "Last name must be at least 2 characters" },
//!     { "rule": "max", "value": 40, "message": "Last name must be at most 40 characters" }
//! ]"#).unwrap();
//!
//! let rules = compile_rules(&descriptors).unwrap();
//! assert_eq!(rules.len(), 3);
//! ```

mod errors;
mod field;
mod form;
mod rules;

pub use errors::*;
pub use field::*;
pub use form::*;
pub use rules::*;

use crate::utils::error::{JailError, Result};
use std::fmt;

/// One failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

pub type Check = std::result::Result<(), Violation>;

/// Outcome of validating one record: pass when no violation was collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    violations: Vec<Violation>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, outcome: Check) -> &mut Self {
        if let Err(violation) = outcome {
            self.violations.push(violation);
        }
        self
    }

    /// Records a violation when the value is absent, otherwise hands it back
    /// for further checks.
    pub fn require<'a, T>(&mut self, field: &str, value: &'a Option<T>) -> Option<&'a T> {
        match validate_required(field, value) {
            Ok(inner) => Some(inner),
            Err(violation) => {
                self.violations.push(violation);
                None
            }
        }
    }

    /// Folds a nested record's outcome in, prefixing its field names.
    pub fn nested(&mut self, prefix: &str, index: usize, inner: Validation) -> &mut Self {
        for violation in inner.violations {
            self.violations.push(Violation {
                field: format!("{}[{}].{}", prefix, index, violation.field),
                reason: violation.reason,
            });
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Turns a failed validation into a configuration error.
    pub fn into_result(self) -> Result<()> {
        match self.violations.first() {
            None => Ok(()),
            Some(first) => Err(JailError::Config {
                field: first.field.clone(),
                message: self.summary(),
            }),
        }
    }

    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub trait Validate {
    fn validate(&self) -> Validation;

    fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }
}

pub fn validate_required<'a, T>(
    field_name: &str,
    value: &'a Option<T>,
) -> std::result::Result<&'a T, Violation> {
    value
        .as_ref()
        .ok_or_else(|| Violation::new(field_name, "is required"))
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Check {
    if value.trim().is_empty() {
        return Err(Violation::new(
            field_name,
            "cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Length is counted in characters, not bytes.
pub fn validate_length(field_name: &str, value: &str, min: usize, max: usize) -> Check {
    let length = value.chars().count();
    if length < min || length > max {
        return Err(Violation::new(
            field_name,
            format!(
                "length {} is outside {}..={} characters",
                length, min, max
            ),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Check {
    if value < min || value > max {
        return Err(Violation::new(
            field_name,
            format!("value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Check {
    if path.trim().is_empty() {
        return Err(Violation::new(field_name, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(Violation::new(field_name, "Path contains null bytes"));
    }

    Ok(())
}

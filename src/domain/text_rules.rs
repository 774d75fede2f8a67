//! Rule checks shared by the text primitives.
//!
//! Lengths are counted in Unicode scalar values, not bytes.

use super::errors::{PrimitiveKind, ValidationError, Violation};

pub(crate) fn check_length(
    kind: PrimitiveKind,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual == 0 {
        return Err(ValidationError::new(kind, value, Violation::Empty));
    }
    if actual < min {
        return Err(ValidationError::new(
            kind,
            value,
            Violation::TooShort { min, actual },
        ));
    }
    if actual > max {
        return Err(ValidationError::new(
            kind,
            value,
            Violation::TooLong { max, actual },
        ));
    }
    Ok(())
}

pub(crate) fn check_no_control(kind: PrimitiveKind, value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_control) {
        return Err(ValidationError::new(
            kind,
            value,
            Violation::ControlCharacter,
        ));
    }
    Ok(())
}

/// Every character must satisfy `allowed`; the first offender is reported.
pub(crate) fn check_charset(
    kind: PrimitiveKind,
    value: &str,
    allowed: impl Fn(char) -> bool,
) -> Result<(), ValidationError> {
    match value.chars().find(|c| !allowed(*c)) {
        Some(c) => Err(ValidationError::new(
            kind,
            value,
            Violation::DisallowedCharacter(c),
        )),
        None => Ok(()),
    }
}

/// No separator at either end and no two separators in a row.
pub(crate) fn check_separators(
    kind: PrimitiveKind,
    value: &str,
    is_separator: impl Fn(char) -> bool,
) -> Result<(), ValidationError> {
    let first = value.chars().next();
    let last = value.chars().next_back();
    if first.is_some_and(&is_separator) || last.is_some_and(&is_separator) {
        return Err(ValidationError::new(kind, value, Violation::EdgeSeparator));
    }

    let mut previous_was_separator = false;
    for c in value.chars() {
        let sep = is_separator(c);
        if sep && previous_was_separator {
            return Err(ValidationError::new(
                kind,
                value,
                Violation::ConsecutiveSeparators,
            ));
        }
        previous_was_separator = sep;
    }
    Ok(())
}

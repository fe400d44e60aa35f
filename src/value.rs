//! # Value Classes
//!
//! This module defines the [`Value`] type used throughout an optimization
//! specification to constrain a single byte of CPU, flag, or memory state.
//!
//! A value is one of four classes:
//!
//! - **Exact** - the byte must hold this exact value
//! - **Any** - the byte is unconstrained (a wildcard)
//! - **Same** - the byte must equal its value at execution start (output only)
//! - **Equ** - the byte must equal whatever the original code block produces
//!   for this input (output only)
//!
//! The literal grammar accepted by [`Value::parse`]:
//!
//! - Hexadecimal: `0xNN`, `$NN`, `NNh`
//! - Binary: `0bNNNNNNNN`, `%NNNNNNNN`
//! - Decimal: `NN`
//! - Wildcards: `?`, `??`, `ANY`, or any numeric literal with `?` in place
//!   of digits (e.g. `$1?`)
//! - Keywords: `SAME`, `EQU` (rejected in input positions)

use crate::error::SpecError;

/// The position a value literal appears in, which decides whether the
/// preservation keywords are admissible.
///
/// `SAME` and `EQU` constrain the *final* state relative to the initial
/// state or the reference execution; they are meaningless as input
/// constraints and [`Value::parse`] rejects them there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueContext {
    /// The literal constrains initial state (registers, flags, or an input
    /// memory region).
    Input,

    /// The literal constrains final state.
    Output,
}

/// A single byte constraint in an optimization specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// The byte must hold exactly this value.
    Exact(u8),

    /// The byte is unconstrained.
    Any,

    /// The byte must equal its initial value (output positions only).
    Same,

    /// The byte must equal the value the original code block produces for
    /// the same input (output positions only).
    Equ,
}

impl Value {
    /// Creates an `Exact` value.
    pub fn exact(value: u8) -> Self {
        Value::Exact(value)
    }

    /// Creates an `Any` value.
    pub fn any() -> Self {
        Value::Any
    }

    /// Creates a `Same` value.
    pub fn same() -> Self {
        Value::Same
    }

    /// Creates an `Equ` value.
    pub fn equ() -> Self {
        Value::Equ
    }

    /// Returns true if this value places no constraint on the byte.
    pub fn is_wildcard_like(&self) -> bool {
        matches!(self, Value::Any)
    }

    /// Parses a value literal in the grammar described in the module
    /// documentation.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidValue`] when `SAME`/`EQU` appears in an
    /// input context, when a numeric literal overflows a byte, or when the
    /// token is otherwise unparseable.
    ///
    /// # Examples
    ///
    /// ```
    /// use opt6502::{Value, ValueContext};
    ///
    /// assert_eq!(Value::parse("$42", ValueContext::Input).unwrap(), Value::Exact(0x42));
    /// assert_eq!(Value::parse("??", ValueContext::Input).unwrap(), Value::Any);
    /// assert_eq!(Value::parse("$1?", ValueContext::Input).unwrap(), Value::Any);
    /// assert_eq!(Value::parse("SAME", ValueContext::Output).unwrap(), Value::Same);
    /// assert!(Value::parse("SAME", ValueContext::Input).is_err());
    /// ```
    pub fn parse(text: &str, context: ValueContext) -> Result<Self, SpecError> {
        let trimmed = text.trim();

        match trimmed {
            "?" | "??" | "ANY" => return Ok(Value::Any),
            "SAME" => {
                return match context {
                    ValueContext::Output => Ok(Value::Same),
                    ValueContext::Input => Err(invalid(trimmed, "SAME is only valid in outputs")),
                }
            }
            "EQU" => {
                return match context {
                    ValueContext::Output => Ok(Value::Equ),
                    ValueContext::Input => Err(invalid(trimmed, "EQU is only valid in outputs")),
                }
            }
            "" => return Err(invalid(text, "empty value")),
            _ => {}
        }

        let (digits, radix) = split_radix(trimmed)?;

        if digits.is_empty() {
            return Err(invalid(trimmed, "no digits"));
        }

        // A `?` standing in for any digit promotes the whole token to ANY,
        // as long as the remaining characters are valid for the radix.
        if digits.contains('?') {
            if digits
                .chars()
                .all(|c| c == '?' || c.is_digit(radix))
            {
                return Ok(Value::Any);
            }
            return Err(invalid(trimmed, "malformed wildcard digits"));
        }

        let parsed = u32::from_str_radix(digits, radix)
            .map_err(|_| invalid(trimmed, "not a number"))?;
        if parsed > 0xFF {
            return Err(invalid(trimmed, "does not fit in a byte"));
        }
        Ok(Value::Exact(parsed as u8))
    }
}

/// Strips the radix marker from a numeric literal and returns the digit
/// portion together with the radix.
fn split_radix(text: &str) -> Result<(&str, u32), SpecError> {
    if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return Ok((rest, 16));
    }
    if let Some(rest) = text.strip_prefix('$') {
        return Ok((rest, 16));
    }
    if let Some(rest) = text.strip_suffix('h').or_else(|| text.strip_suffix('H')) {
        return Ok((rest, 16));
    }
    if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        return Ok((rest, 2));
    }
    if let Some(rest) = text.strip_prefix('%') {
        return Ok((rest, 2));
    }
    Ok((text, 10))
}

fn invalid(text: &str, reason: &str) -> SpecError {
    SpecError::InvalidValue {
        text: text.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        for text in ["0x2A", "$2A", "2Ah"] {
            assert_eq!(
                Value::parse(text, ValueContext::Input).unwrap(),
                Value::Exact(0x2A),
                "failed for {text}"
            );
        }
    }

    #[test]
    fn test_parse_binary_and_decimal() {
        assert_eq!(
            Value::parse("0b1010", ValueContext::Input).unwrap(),
            Value::Exact(10)
        );
        assert_eq!(
            Value::parse("%11111111", ValueContext::Input).unwrap(),
            Value::Exact(0xFF)
        );
        assert_eq!(
            Value::parse("200", ValueContext::Input).unwrap(),
            Value::Exact(200)
        );
    }

    #[test]
    fn test_wildcard_digit_promotes_to_any() {
        assert_eq!(Value::parse("$?F", ValueContext::Input).unwrap(), Value::Any);
        assert_eq!(Value::parse("0x1?", ValueContext::Input).unwrap(), Value::Any);
        assert_eq!(Value::parse("%1?10", ValueContext::Input).unwrap(), Value::Any);
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(Value::parse("256", ValueContext::Input).is_err());
        assert!(Value::parse("$100", ValueContext::Input).is_err());
    }

    #[test]
    fn test_keywords_rejected_in_input() {
        assert!(Value::parse("SAME", ValueContext::Input).is_err());
        assert!(Value::parse("EQU", ValueContext::Input).is_err());
        assert_eq!(
            Value::parse("EQU", ValueContext::Output).unwrap(),
            Value::Equ
        );
    }

    #[test]
    fn test_is_wildcard_like() {
        assert!(Value::Any.is_wildcard_like());
        assert!(!Value::Exact(0).is_wildcard_like());
        assert!(!Value::Same.is_wildcard_like());
        assert!(!Value::Equ.is_wildcard_like());
    }
}

//! Key edit form
//!
//! The form holds raw text so the host can bind it to input widgets; it is
//! only validated on confirm.

use keyline_animation::Easing;
use std::str::FromStr;

use crate::error::EditorError;
use crate::track::Key;

#[derive(Clone, Debug, PartialEq)]
pub struct KeyEditForm {
    pub value: String,
    pub time: String,
    /// Canonical easing name, e.g. `Cubic.EaseOut`
    pub easing: String,
    /// Surface position the form was opened from
    pub anchor: (f64, f64),
}

/// Validated form contents
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyEdit {
    pub value: f64,
    pub time: f64,
    pub easing: Easing,
}

impl KeyEditForm {
    pub fn for_key(key: &Key, anchor: (f64, f64)) -> Self {
        Self {
            value: key.value.to_string(),
            time: key.time.to_string(),
            easing: key.easing.name().to_string(),
            anchor,
        }
    }

    pub fn parse(&self) -> Result<KeyEdit, EditorError> {
        Ok(KeyEdit {
            value: parse_number("value", &self.value)?,
            time: parse_number("time", &self.time)?,
            easing: Easing::from_str(self.easing.trim())?,
        })
    }
}

fn parse_number(field: &'static str, input: &str) -> Result<f64, EditorError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EditorError::InvalidNumber {
            field,
            input: input.to_string(),
        })
}

//! Animatable property values
//!
//! Targets expose named numeric properties through [`Animatable`]. A value is
//! either a plain number or a length carrying a declared unit; the unit seen
//! when an animation starts is preserved when interpolated values are written
//! back.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Units a length value may carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
    Vw,
    Vh,
    Deg,
}

impl LengthUnit {
    const ALL: [LengthUnit; 7] = [
        LengthUnit::Px,
        LengthUnit::Em,
        LengthUnit::Rem,
        LengthUnit::Percent,
        LengthUnit::Vw,
        LengthUnit::Vh,
        LengthUnit::Deg,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Em => "em",
            LengthUnit::Rem => "rem",
            LengthUnit::Percent => "%",
            LengthUnit::Vw => "vw",
            LengthUnit::Vh => "vh",
            LengthUnit::Deg => "deg",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<LengthUnit> {
        Self::ALL.into_iter().find(|u| u.suffix() == suffix)
    }
}

/// The shape of a property value, independent of its magnitude
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueKind {
    #[default]
    Number,
    Length(LengthUnit),
}

impl ValueKind {
    /// Build a value of this kind
    pub fn with_value(self, value: f64) -> PropertyValue {
        match self {
            ValueKind::Number => PropertyValue::Number(value),
            ValueKind::Length(unit) => PropertyValue::Length { value, unit },
        }
    }
}

/// A numeric property value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    Length { value: f64, unit: LengthUnit },
}

impl PropertyValue {
    pub fn px(value: f64) -> Self {
        PropertyValue::Length {
            value,
            unit: LengthUnit::Px,
        }
    }

    /// Magnitude without unit
    pub fn as_f64(&self) -> f64 {
        match *self {
            PropertyValue::Number(v) => v,
            PropertyValue::Length { value, .. } => value,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match *self {
            PropertyValue::Number(_) => ValueKind::Number,
            PropertyValue::Length { unit, .. } => ValueKind::Length(unit),
        }
    }

    /// Parse textual values such as `"12"`, `"-3.5"` or `"40px"`.
    pub fn parse(text: &str) -> Result<Self, AnimationError> {
        let text = text.trim();
        let split = text
            .find(|c: char| c.is_ascii_alphabetic() || c == '%')
            .unwrap_or(text.len());
        let (number, suffix) = text.split_at(split);
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| AnimationError::InvalidValue(text.to_string()))?;

        if suffix.is_empty() {
            return Ok(PropertyValue::Number(value));
        }
        LengthUnit::from_suffix(suffix)
            .map(|unit| PropertyValue::Length { value, unit })
            .ok_or_else(|| AnimationError::InvalidValue(text.to_string()))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(v) => write!(f, "{}", v),
            PropertyValue::Length { value, unit } => write!(f, "{}{}", value, unit.suffix()),
        }
    }
}

/// An object whose numeric properties can be read and written by name
pub trait Animatable: Send {
    /// Current value of `name`; `None` when the property does not exist
    fn get_property(&self, name: &str) -> Option<PropertyValue>;

    fn set_property(&mut self, name: &str, value: PropertyValue);
}

/// Ordered property map, the stock [`Animatable`] target
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    values: IndexMap<String, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a property
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set a property from text such as `"40px"`; the bag is unchanged on error
    pub fn insert_text(
        &mut self,
        name: impl Into<String>,
        text: &str,
    ) -> Result<(), AnimationError> {
        let value = PropertyValue::parse(text)?;
        self.values.insert(name.into(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<PropertyValue> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Animatable for PropertyBag {
    fn get_property(&self, name: &str) -> Option<PropertyValue> {
        self.get(name)
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) {
        self.values.insert(name.to_string(), value);
    }
}

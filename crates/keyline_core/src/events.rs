//! Event types
//!
//! Pointer events as delivered by the host, already translated into the
//! coordinate space of the drawing surface.

/// Event type identifier
pub type EventType = u32;

/// Event types understood by the editor
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    /// Press and release without leaving the surface
    pub const CLICK: EventType = 8;
    pub const DOUBLE_CLICK: EventType = 9;
    pub const RESIZE: EventType = 40;
}

/// A host event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Pointer { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
}

impl Event {
    /// Pointer event at surface position `(x, y)`
    pub fn pointer(event_type: EventType, x: f32, y: f32) -> Self {
        Self {
            event_type,
            data: EventData::Pointer { x, y },
        }
    }

    pub fn resize(width: f32, height: f32) -> Self {
        Self {
            event_type: event_types::RESIZE,
            data: EventData::Resize { width, height },
        }
    }

    /// Pointer position, if this is a pointer event
    pub fn position(&self) -> Option<(f32, f32)> {
        match self.data {
            EventData::Pointer { x, y } => Some((x, y)),
            EventData::Resize { .. } => None,
        }
    }
}

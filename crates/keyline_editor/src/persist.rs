//! Saved key data and view settings
//!
//! Keys are stored per timeline under `keyline.data.<name>` as a JSON object
//! mapping property track ids to their key lists. Two view settings are
//! stored alongside as plain numbers.

use std::collections::BTreeMap;

use keyline_animation::Easing;
use keyline_core::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EditorError;
use crate::track::{Track, Tracks};

pub const DATA_KEY_PREFIX: &str = "keyline.data.";
pub const PANEL_HEIGHT_KEY: &str = "keyline.settings.panelHeight";
pub const TIME_SCALE_KEY: &str = "keyline.settings.timeScale";

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct SavedKey {
    pub time: f64,
    pub value: f64,
    pub easing: Easing,
}

/// Track id → keys
pub type SavedTracks = BTreeMap<String, Vec<SavedKey>>;

/// Result of reading saved key data
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    NoSavedState,
    Loaded { tracks: usize },
}

/// Saved view settings; `None` when absent or unreadable
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SavedSettings {
    pub panel_height: Option<f64>,
    pub time_scale: Option<f64>,
}

pub fn data_key(timeline_name: &str) -> String {
    format!("{DATA_KEY_PREFIX}{timeline_name}")
}

/// Snapshot every property track's keys
pub fn collect(tracks: &Tracks) -> SavedTracks {
    tracks
        .iter()
        .filter_map(|(id, track)| match track {
            Track::Property(p) => Some((id, p)),
            Track::Object(_) => None,
        })
        .map(|(id, p)| {
            let keys = tracks
                .keys_of(id)
                .map(|(_, k)| SavedKey {
                    time: k.time,
                    value: k.value,
                    easing: k.easing,
                })
                .collect();
            (p.id.clone(), keys)
        })
        .collect()
}

pub fn encode(data: &SavedTracks) -> Result<String, EditorError> {
    Ok(serde_json::to_string(data)?)
}

pub fn decode(text: &str) -> Result<SavedTracks, EditorError> {
    Ok(serde_json::from_str(text)?)
}

/// Read saved key data for `timeline_name`
///
/// Missing or blank data and data that fails to parse all mean there is no
/// saved state; the latter is logged.
pub fn read_tracks(store: &impl KeyValueStore, timeline_name: &str) -> Option<SavedTracks> {
    let key = data_key(timeline_name);
    let text = store.get(&key).filter(|t| !t.trim().is_empty())?;
    match decode(&text) {
        Ok(data) => Some(data),
        Err(err) => {
            warn!(key = %key, %err, "ignoring corrupt saved key data");
            None
        }
    }
}

pub fn write_tracks(
    store: &mut impl KeyValueStore,
    timeline_name: &str,
    data: &SavedTracks,
) -> Result<(), EditorError> {
    store.set(&data_key(timeline_name), encode(data)?)?;
    Ok(())
}

pub fn read_settings(store: &impl KeyValueStore) -> SavedSettings {
    SavedSettings {
        panel_height: read_number(store, PANEL_HEIGHT_KEY),
        time_scale: read_number(store, TIME_SCALE_KEY),
    }
}

fn read_number(store: &impl KeyValueStore, key: &str) -> Option<f64> {
    let text = store.get(key)?;
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(key, value = %text, "ignoring unreadable setting");
            None
        }
    }
}

pub fn write_settings(
    store: &mut impl KeyValueStore,
    panel_height: f64,
    time_scale: f64,
) -> Result<(), EditorError> {
    store.set(PANEL_HEIGHT_KEY, panel_height.to_string())?;
    store.set(TIME_SCALE_KEY, time_scale.to_string())?;
    Ok(())
}

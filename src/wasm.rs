//! Browser bindings
//!
//! The page passes a seed (and optionally a JSON config) and gets back either
//! the serialized track or a flat vertex buffer ready for upload.

use wasm_bindgen::prelude::*;

use crate::config::TrackConfig;
use crate::mesh::track_vertices;
use crate::track::{Track, generate};

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    // A second init (module reloaded by the page) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Track Forge ready");
}

fn build(seed: &str, config_json: Option<String>) -> Result<Track, JsValue> {
    let config = match config_json {
        Some(json) => {
            TrackConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        None => TrackConfig::default(),
    };
    Ok(generate(seed, &config))
}

/// Generate a track and return it as JSON
#[wasm_bindgen]
pub fn generate_track_json(seed: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let track = build(seed, config_json)?;
    track.to_json().map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Generate a track and return its interleaved vertex buffer
///
/// Ten floats per vertex: position (3), normal (3), color (4).
#[wasm_bindgen]
pub fn generate_track_vertices(
    seed: &str,
    config_json: Option<String>,
) -> Result<Vec<f32>, JsValue> {
    let track = build(seed, config_json)?;
    let vertices = track_vertices(&track);
    Ok(bytemuck::cast_slice(&vertices).to_vec())
}

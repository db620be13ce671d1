//! WASM bindings for booking-engine.
//!
//! Exposes the conflict check to the JavaScript web server and client via
//! `wasm-bindgen`. All complex types cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/booking-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```

use booking_engine::{ConflictResolver, DayBounds, Interval, LocalRequest, OverlapRule};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly input for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for `checkAndSuggest`.
#[derive(Deserialize)]
struct CheckInput {
    requested: Interval,
    #[serde(default)]
    existing: Vec<Interval>,
    bounds: DayBounds,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn resolver(overlap: &str) -> Result<ConflictResolver, JsValue> {
    let rule: OverlapRule = overlap.parse().map_err(js_err)?;
    Ok(ConflictResolver::with_rule(rule))
}

/// Re-check intervals that arrived through deserialization.
fn validated(interval: Interval) -> Result<Interval, JsValue> {
    let checked = Interval::try_new(interval.low, interval.high).map_err(js_err)?;
    Ok(match interval.owner {
        Some(owner) => checked.with_owner(owner),
        None => checked,
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Check a requested interval against a day's bookings.
///
/// `request_json` is `{"requested": {low, high}, "existing": [{low, high,
/// owner?}], "bounds": {day_start, day_end}}` in epoch milliseconds.
/// `overlap` is `"closed"` or `"half-open"`. Returns the decision as JSON:
/// `{"status": "free"}` or `{"status": "conflict", "conflicts": [...],
/// "suggestions": [...]}`.
#[wasm_bindgen(js_name = "checkAndSuggest")]
pub fn check_and_suggest(request_json: &str, overlap: &str) -> Result<String, JsValue> {
    let resolver = resolver(overlap)?;
    let input: CheckInput = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request JSON: {}", e)))?;

    let requested = validated(input.requested)?;
    let existing = input
        .existing
        .into_iter()
        .map(validated)
        .collect::<Result<Vec<_>, _>>()?;
    let bounds = DayBounds::try_new(input.bounds.day_start, input.bounds.day_end).map_err(js_err)?;

    to_json(&resolver.check_and_suggest(&requested, &existing, &bounds))
}

/// Check a wall-clock request (`date`, `start_time`, `end_time`, `timezone`,
/// `bookings`) and return suggestions as `HH:MM` times.
#[wasm_bindgen(js_name = "checkLocal")]
pub fn check_local(request_json: &str, overlap: &str) -> Result<String, JsValue> {
    let resolver = resolver(overlap)?;
    let request: LocalRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request JSON: {}", e)))?;

    to_json(&request.check(&resolver).map_err(js_err)?)
}

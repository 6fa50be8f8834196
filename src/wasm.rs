//! WASM bindings for the circuit solver.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { simulate } from 'circuit_solver';
//!
//! await init();
//!
//! const netlist = `
//!   V1 in 0 SIN(0 1 50)
//!   R1 in out 1k
//!   C1 out 0 1u
//! `;
//!
//! const results = JSON.parse(simulate(netlist, 0.05));
//! plot(results.time, results.C1.v);
//! ```

use wasm_bindgen::prelude::*;

use crate::dsl;
use crate::DEFAULT_STEPS;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Simulate a netlist up to `t_end` seconds and return the JSON results.
///
/// Uses `dt = t_end / 1000`, like the command-line tool.
#[wasm_bindgen]
pub fn simulate(netlist: &str, t_end: f64) -> Result<String, JsValue> {
    let circuit = dsl::load(netlist).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let results = circuit
        .run_transient(t_end, t_end / DEFAULT_STEPS as f64)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    results
        .to_json(false)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

//! WebAssembly bindings for the Blockrelic scoring engine.
//!
//! This module exposes a session to JavaScript through wasm-bindgen.
//! Everything crosses the boundary as JSON strings.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::SessionAction;
#[cfg(feature = "wasm")]
use crate::engine::Engine;
#[cfg(feature = "wasm")]
use crate::relic::RelicType;
#[cfg(feature = "wasm")]
use crate::rng::SeededRandom;
#[cfg(feature = "wasm")]
use crate::session::Session;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed session wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmSession {
    engine: Engine,
    session: Session,
    rng: SeededRandom,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmSession {
    /// Create a new session; without a seed the lucky rolls use entropy
    #[wasm_bindgen(constructor)]
    pub fn new(
        hands_per_round: u32,
        discards_per_round: u32,
        deck_size: u32,
        seed: Option<u64>,
    ) -> WasmSession {
        WasmSession {
            engine: Engine::standard(),
            session: Session::new(hands_per_round, discards_per_round, deck_size),
            rng: seed.map_or_else(SeededRandom::from_entropy, SeededRandom::new),
        }
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: SessionAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        match self.session.apply(&self.engine, action, &mut self.rng) {
            Ok(events) => {
                Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
            }
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }

    /// Get the whole session as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.session).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get board state as JSON (for rendering)
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        serde_json::to_string(&self.session.board).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get owned relics in display order with their states
    #[wasm_bindgen(js_name = getRelics)]
    pub fn get_relics(&self) -> String {
        serde_json::to_string(&self.session.inventory).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get display metadata for every relic in the catalog
    #[wasm_bindgen(js_name = getCatalog)]
    pub fn get_catalog(&self) -> String {
        let catalog: Vec<(RelicType, crate::relic::RelicDefinition)> = self
            .engine
            .registry()
            .iter()
            .map(|m| (m.relic_type(), m.definition()))
            .collect();
        serde_json::to_string(&catalog).unwrap_or_else(|_| "[]".to_string())
    }

    /// Check if the current round has run out of hands
    #[wasm_bindgen(js_name = isRoundOver)]
    pub fn is_round_over(&self) -> bool {
        self.session.is_round_over()
    }

    /// Bonus pieces waiting to be played with `PlaceBonusPiece`
    #[wasm_bindgen(js_name = bonusPieces)]
    pub fn bonus_pieces(&self) -> u32 {
        self.session.bonus_pieces
    }
}

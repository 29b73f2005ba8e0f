//! WASM surface tests. Run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Object, Reflect};
use othello::api;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn field(value: &JsValue, name: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(name)).expect("field must exist")
}

#[wasm_bindgen_test]
fn wasm_ready_reports_true() {
    assert!(api::wasm_ready());
}

#[wasm_bindgen_test]
fn new_game_returns_start_state() {
    let state = api::new_game(2, false, JsValue::UNDEFINED).unwrap();

    assert_eq!(field(&state, "current_player").as_f64(), Some(1.0));
    assert_eq!(field(&state, "black_count").as_f64(), Some(2.0));
    assert_eq!(field(&state, "score").as_f64(), Some(0.0));

    let moves = Array::from(&api::get_legal_moves().unwrap());
    assert_eq!(moves.length(), 4);
}

#[wasm_bindgen_test]
fn place_and_ai_reply() {
    api::new_game(1, false, JsValue::UNDEFINED).unwrap();

    let state = api::place(2, 3).unwrap();
    assert_eq!(field(&state, "score").as_f64(), Some(3.0));

    let reply = api::ai_move().unwrap();
    let state = field(&reply, "state");
    assert_eq!(field(&state, "current_player").as_f64(), Some(1.0));
    assert!(api::get_result().unwrap().is_undefined() || api::get_result().unwrap().is_null());
}

#[wasm_bindgen_test]
fn illegal_place_is_rejected_with_message() {
    api::new_game(1, false, JsValue::UNDEFINED).unwrap();

    let err = api::place(0, 0).unwrap_err();
    assert_eq!(err.as_string().as_deref(), Some("invalid move (0,0): flips no discs"));
}

#[wasm_bindgen_test]
fn custom_weights_are_accepted() {
    let weights = Object::new();
    Reflect::set(&weights, &JsValue::from_str("corner_diff"), &JsValue::from_f64(40.0)).unwrap();

    assert!(api::new_game(2, true, weights.into()).is_ok());
    assert!(api::ai_move().is_ok());
}

#[wasm_bindgen_test]
fn overflowing_weights_are_refused() {
    let weights = Object::new();
    Reflect::set(&weights, &JsValue::from_str("piece_diff"), &JsValue::from_f64(2e9)).unwrap();
    Reflect::set(&weights, &JsValue::from_str("corner_diff"), &JsValue::from_f64(2e9)).unwrap();

    let err = api::new_game(1, true, weights.into()).unwrap_err();
    assert!(err.as_string().unwrap().starts_with("invalid evaluation config"));
}

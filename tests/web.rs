//! Binding surface checks; run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use echoes_rs::{feedback_table, keyboard_layout, parse_melody_musicxml, tutorial_melody, Tutor};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn keyboard_has_seventeen_keys() {
    let keys = js_sys::Array::from(&keyboard_layout().unwrap());
    assert_eq!(keys.length(), 17);
}

#[wasm_bindgen_test]
fn melody_and_feedback_tables_encode() {
    let melody = tutorial_melody().unwrap();
    let notes = js_sys::Reflect::get(&melody, &JsValue::from_str("notes")).unwrap();
    assert_eq!(js_sys::Array::from(&notes).length(), 35);

    let table = js_sys::Array::from(&feedback_table().unwrap());
    assert_eq!(table.length(), 5);
}

#[wasm_bindgen_test]
fn malformed_musicxml_is_an_error() {
    assert!(parse_melody_musicxml("<score-partwise><part>", 4).is_err());
}

#[wasm_bindgen_test]
fn tutor_runs_without_callbacks() {
    let callbacks = js_sys::Object::new();
    let mut tutor = Tutor::new(callbacks.into(), JsValue::UNDEFINED).unwrap();
    assert_eq!(tutor.stage(), None);
    tutor.start(0.0);
    assert_eq!(tutor.stage().as_deref(), Some("intro"));
    assert!(!tutor.choose("learn"));
    assert!(!tutor.choose("dance"));
    tutor.tick(60_000.0);
    assert_eq!(tutor.choices(), vec!["accept".to_string()]);
    assert!(tutor.choose("accept"));
    tutor.press("C");
    assert_eq!(tutor.mistakes(), 0);
}

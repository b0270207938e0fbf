//! Conversions shared by the bindings.

use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

pub(crate) fn js_error(context: &str, err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{}: {:#}", context, err))
}

// Browser tests, run with `wasm-pack test --headless --firefox crates/gameframe-web`.
#![cfg(target_arch = "wasm32")]

use std::collections::BTreeMap;

use gameframe::UserId;
use gameframe_web::{
    convert, frame_is_fullscreen, frame_mount, frame_scale, frame_state, frame_toggle_fullscreen,
    frame_unmount,
};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn host(id: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document.create_element("div").unwrap();
    div.set_id(id);
    document.body().unwrap().append_child(&div).unwrap();
    div
}

fn inline_styles(element: &web_sys::Element) -> BTreeMap<String, String> {
    let style = element.dyn_ref::<web_sys::HtmlElement>().unwrap().style();
    (0..style.length())
        .map(|i| {
            let name = style.item(i);
            let value = style.get_property_value(&name).unwrap();
            (name, value)
        })
        .collect()
}

#[wasm_bindgen_test]
fn converts_user_ids() {
    assert_eq!(convert::user_id(&JsValue::from_f64(42.0)), Some(UserId::Numeric(42)));
    assert_eq!(convert::user_id(&JsValue::from_str("abc")), Some(UserId::from("abc")));
    assert_eq!(convert::user_id(&JsValue::from_str("")), None);
    assert_eq!(convert::user_id(&JsValue::NULL), None);
}

#[wasm_bindgen_test]
fn json_survives_the_js_boundary() {
    let value = json!({ "type": "AUTH", "token": 7 });
    let js = convert::to_js(&value).unwrap();
    assert_eq!(convert::to_json(&js), value);
}

#[wasm_bindgen_test]
fn mount_then_unmount_restores_the_page() {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();
    body.style().set_property("overflow", "auto").unwrap();
    let parent = host("gameframe-host");

    frame_mount("gameframe-host", JsValue::from_f64(123.0), None).unwrap();
    assert_eq!(frame_state(), "await_ready");
    assert!(frame_scale() > 0.0 && frame_scale() <= 1.0);
    assert_eq!(body.style().get_property_value("overflow").unwrap(), "hidden");

    let iframe = parent.query_selector("iframe").unwrap().unwrap();
    assert!(iframe.get_attribute("src").unwrap().ends_with("/GAME2/index.html?uid=123"));

    frame_unmount();
    assert_eq!(frame_state(), "unmounted");
    assert_eq!(parent.child_element_count(), 0);
    assert_eq!(body.style().get_property_value("overflow").unwrap(), "auto");
    parent.remove();
}

#[wasm_bindgen_test]
fn rejects_bad_config() {
    host("gameframe-bad");
    let err = frame_mount("gameframe-bad", JsValue::from_f64(1.0), Some("{\"native_width\":0}".into()));
    assert!(err.is_err());
    assert_eq!(frame_state(), "unmounted");
}

#[wasm_bindgen_test]
fn css_fullscreen_toggle_twice_restores_styles() {
    let parent = host("gameframe-fullscreen");
    frame_mount(
        "gameframe-fullscreen",
        JsValue::from_f64(5.0),
        Some(r#"{"fullscreen_strategy":"css_fallback"}"#.into()),
    )
    .unwrap();

    let root = parent.first_element_child().unwrap();
    let wrapper = parent.query_selector("iframe").unwrap().unwrap().parent_element().unwrap();
    let container = wrapper.parent_element().unwrap();
    let before = [inline_styles(&root), inline_styles(&container), inline_styles(&wrapper)];

    frame_toggle_fullscreen();
    assert!(frame_is_fullscreen());
    assert_eq!(inline_styles(&root).get("position").map(String::as_str), Some("fixed"));

    frame_toggle_fullscreen();
    assert!(!frame_is_fullscreen());
    let after = [inline_styles(&root), inline_styles(&container), inline_styles(&wrapper)];
    assert_eq!(after, before);

    frame_unmount();
    parent.remove();
}

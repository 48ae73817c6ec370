#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};

use js_sys::{Array, Object, Reflect, WeakMap};
use rclass_core::logging::{info, warn};
use rclass_core::{
    Bindings, BreakpointConfig, BreakpointTable, ConfigError, WatcherHandle, WatcherOptions,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, Window};

use crate::dom::{DomTarget, ResizeListener, WindowResize};
use crate::error::BindError;

type DomBindings = Bindings<u32, DomTarget, ResizeListener>;

thread_local! {
    static BINDINGS: RefCell<DomBindings> = RefCell::new(DomBindings::new());
    static NEXT_KEY: Cell<u32> = const { Cell::new(1) };
    // Keyed by object identity: copies of a bound node get their own key, and
    // removed nodes can be collected.
    static ELEMENT_KEYS: WeakMap = WeakMap::new();
    static PAGE_DEFAULTS: RefCell<Option<BreakpointConfig>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Bind a breakpoint watcher to every element matched by `target`.
///
/// `target` is a CSS selector, an `HTMLElement`, or `window`. `options` is an
/// object (or JSON string) whose `breakpoints` map replaces the defaults.
/// Binding an element again replaces its previous watcher. Returns an array of
/// [`RClassHandle`].
#[wasm_bindgen]
pub fn bind(target: JsValue, options: Option<JsValue>) -> Result<Array, JsValue> {
    let handles = bind_handles(&target, options.as_ref()).map_err(to_js)?;
    Ok(handles.into_iter().map(JsValue::from).collect())
}

/// Dispose every watcher created by [`bind`].
#[wasm_bindgen(js_name = unbindAll)]
pub fn unbind_all() {
    BINDINGS.with(|bindings| bindings.borrow_mut().clear());
}

/// Replace the breakpoints used by later binds that pass no `breakpoints`.
///
/// `null` or `undefined` restores the built-in tiers. Existing watchers keep
/// their tables.
#[wasm_bindgen(js_name = setDefaults)]
pub fn set_defaults(breakpoints: JsValue) -> Result<(), JsValue> {
    set_default_breakpoints(&breakpoints).map_err(to_js)
}

/// The breakpoints used when `bind` gets none, as `{name: px}`.
#[wasm_bindgen]
pub fn defaults() -> Object {
    let config = PAGE_DEFAULTS
        .with(|defaults| defaults.borrow().clone())
        .unwrap_or_else(BreakpointConfig::defaults);
    let object = Object::new();
    for (name, threshold) in config.iter() {
        let set = Reflect::set(&object, &JsValue::from_str(name), &JsValue::from(threshold));
        if let Err(err) = set {
            warn!(name, error = ?err, "failed to export default breakpoint");
        }
    }
    object
}

/// Rust-side [`set_defaults`] with a typed error.
pub fn set_default_breakpoints(breakpoints: &JsValue) -> Result<(), BindError> {
    let config = if breakpoints.is_undefined() || breakpoints.is_null() {
        None
    } else {
        let config = parse_breakpoint_value(breakpoints)?;
        BreakpointTable::build(&config)?;
        Some(config)
    };
    info!(custom = config.is_some(), "default breakpoints updated");
    PAGE_DEFAULTS.with(|defaults| *defaults.borrow_mut() = config);
    Ok(())
}

/// JS-facing handle for one bound element.
///
/// Holds only the registry key, so a handle that outlives its watcher simply
/// reports itself unbound.
#[wasm_bindgen]
pub struct RClassHandle {
    key: u32,
}

#[wasm_bindgen]
impl RClassHandle {
    #[wasm_bindgen(getter)]
    pub fn key(&self) -> u32 {
        self.key
    }

    /// Re-measure now. Returns whether the class changed.
    pub fn evaluate(&self) -> bool {
        with_handle(self.key, WatcherHandle::evaluate).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = activeBreakpoint)]
    pub fn active_breakpoint(&self) -> Option<String> {
        with_handle(self.key, WatcherHandle::active_breakpoint).flatten()
    }

    #[wasm_bindgen(js_name = currentWidth)]
    pub fn current_width(&self) -> Option<f64> {
        with_handle(self.key, WatcherHandle::current_width)
    }

    #[wasm_bindgen(js_name = isBound)]
    pub fn is_bound(&self) -> bool {
        BINDINGS.with(|bindings| bindings.borrow().contains(&self.key))
    }

    /// Swap in a new breakpoint table; the current one stays on error.
    pub fn rebind(&self, options: Option<JsValue>) -> Result<(), JsValue> {
        let options = parse_options(options.as_ref()).map_err(to_js)?;
        let result = with_handle(self.key, |handle| handle.rebind(&options))
            .ok_or_else(|| JsValue::from_str("handle is no longer bound"))?;
        result.map_err(|e| to_js(BindError::Config(e)))
    }

    /// Unsubscribe and remove the class. Returns `false` if already disposed.
    pub fn dispose(&self) -> bool {
        BINDINGS.with(|bindings| bindings.borrow_mut().unbind(&self.key))
    }

    /// Drain recorded class swaps as JSONL strings.
    #[wasm_bindgen(js_name = drainTransitionsJsonl)]
    pub fn drain_transitions_jsonl(&self, run_id: &str) -> Array {
        let lines = with_handle(self.key, |handle| handle.drain_transition_jsonl(run_id))
            .unwrap_or_default();
        lines.iter().map(|line| JsValue::from_str(line)).collect()
    }
}

fn with_handle<T>(
    key: u32,
    f: impl FnOnce(&WatcherHandle<DomTarget, ResizeListener>) -> T,
) -> Option<T> {
    BINDINGS.with(|bindings| bindings.borrow().get(&key).map(f))
}

fn to_js(err: BindError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Rust-side [`bind`]: same semantics, typed handles and errors.
pub fn bind_handles(
    target: &JsValue,
    options: Option<&JsValue>,
) -> Result<Vec<RClassHandle>, BindError> {
    let window = web_sys::window().ok_or(BindError::NoWindow)?;
    let options = parse_options(options)?;
    // Validate once so a bad config binds nothing rather than failing midway.
    options.build_table()?;
    let targets = resolve_targets(&window, target)?;
    let source = WindowResize::new(window);

    let handles = BINDINGS.with(|bindings| -> Result<Vec<RClassHandle>, BindError> {
        let mut bindings = bindings.borrow_mut();
        let mut handles = Vec::with_capacity(targets.len());
        for target in targets {
            let key = element_key(target.class_host());
            bindings.bind(key, target, &source, &options)?;
            handles.push(RClassHandle { key });
        }
        Ok(handles)
    })?;
    info!(count = handles.len(), "bound breakpoint watchers");
    Ok(handles)
}

fn resolve_targets(window: &Window, target: &JsValue) -> Result<Vec<DomTarget>, BindError> {
    if let Some(selector) = target.as_string() {
        let document = window.document().ok_or(BindError::NoDocument)?;
        let nodes =
            document
                .query_selector_all(&selector)
                .map_err(|err| BindError::InvalidSelector {
                    selector: selector.clone(),
                    reason: describe_js_error(&err),
                })?;
        let targets: Vec<DomTarget> = (0..nodes.length())
            .filter_map(|idx| nodes.item(idx))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(DomTarget::Element)
            .collect();
        if targets.is_empty() {
            return Err(BindError::NoMatch { selector });
        }
        return Ok(targets);
    }

    if target.is_instance_of::<Window>() {
        let root = window
            .document()
            .and_then(|document| document.document_element())
            .ok_or(BindError::NoDocument)?;
        return Ok(vec![DomTarget::Window {
            window: window.clone(),
            root,
        }]);
    }

    if let Some(element) = target.dyn_ref::<HtmlElement>() {
        if !element.is_connected() {
            return Err(BindError::Detached);
        }
        return Ok(vec![DomTarget::Element(element.clone())]);
    }

    Err(BindError::InvalidTarget)
}

/// Stable key for `element`, assigned on first bind.
fn element_key(element: &Element) -> u32 {
    let object = element.unchecked_ref::<Object>();
    ELEMENT_KEYS.with(|keys| {
        if let Some(key) = keys.get(object).as_f64() {
            return key as u32;
        }
        let key = NEXT_KEY.with(|next| {
            let key = next.get();
            next.set(key.wrapping_add(1).max(1));
            key
        });
        keys.set(object, &JsValue::from(key));
        key
    })
}

fn parse_options(options: Option<&JsValue>) -> Result<WatcherOptions, BindError> {
    let options = parse_explicit_options(options)?;
    Ok(PAGE_DEFAULTS.with(|defaults| match defaults.borrow().as_ref() {
        Some(fallback) => options.or_breakpoints(fallback),
        None => options,
    }))
}

fn parse_explicit_options(options: Option<&JsValue>) -> Result<WatcherOptions, BindError> {
    let Some(options) = options.filter(|o| !o.is_undefined() && !o.is_null()) else {
        return Ok(WatcherOptions::default());
    };
    if let Some(json) = options.as_string() {
        return Ok(WatcherOptions::from_json_str(&json)?);
    }
    if !options.is_object() {
        return Err(BindError::InvalidOptions(
            "expected an object or a JSON string".to_owned(),
        ));
    }

    let breakpoints = Reflect::get(options, &JsValue::from_str("breakpoints"))
        .map_err(|err| BindError::InvalidOptions(describe_js_error(&err)))?;
    if breakpoints.is_undefined() || breakpoints.is_null() {
        return Ok(WatcherOptions::default());
    }
    Ok(WatcherOptions::with_breakpoints(parse_breakpoint_value(
        &breakpoints,
    )?))
}

fn parse_breakpoint_value(breakpoints: &JsValue) -> Result<BreakpointConfig, BindError> {
    if !breakpoints.is_object() {
        return Err(BindError::InvalidOptions(
            "breakpoints must be an object of name to pixel width".to_owned(),
        ));
    }
    Ok(parse_breakpoints(breakpoints.unchecked_ref::<Object>())?)
}

/// Read `{name: px}` in property order.
fn parse_breakpoints(object: &Object) -> Result<BreakpointConfig, ConfigError> {
    let mut config = BreakpointConfig::new();
    for entry in Object::entries(object).iter() {
        let pair: Array = entry.unchecked_into();
        let Some(name) = pair.get(0).as_string() else {
            continue;
        };
        let threshold = pair
            .get(1)
            .as_f64()
            .ok_or_else(|| ConfigError::NonNumericThreshold { name: name.clone() })?;
        config.insert(name, threshold);
    }
    Ok(config)
}

fn describe_js_error(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "unknown error".to_owned())
}

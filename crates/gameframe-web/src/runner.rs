use gameframe::core::fullscreen::emulated_styles;
use gameframe::core::style::scroll_lock;
use gameframe::{
    game_url, DeviceProfile, FrameChannel, FrameConfig, FrameLayout, FullscreenCommand,
    FullscreenController, FullscreenMode, HostMessage, RotatePrompt, Session, SessionAction,
    SessionEvent, Size, StyleGuard, UserId, ViewportEvent,
};
use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::{Interval, Timeout};
use js_sys::{Array, Function};
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, HtmlElement, MessageEvent, OrientationLockType, Window};

use crate::convert;
use crate::dom::{ElementStyle, FrameDom};
use crate::with_runner;

/// A JS callback to invoke once the runner is no longer borrowed,
/// so callers may re-enter the exports (e.g. unmount from a results handler).
pub struct PendingCall {
    function: Function,
    args: Array,
}

impl PendingCall {
    pub fn invoke(self) {
        if let Err(err) = self.function.apply(&JsValue::NULL, &self.args) {
            log::error!("gameframe: callback threw: {:?}", err);
        }
    }
}

/// Owns everything one mounted frame needs.
///
/// Exported as free functions from `lib.rs` because event closures must
/// reach it through the thread-local slot rather than by reference.
/// Field order is drop order: subscriptions go first, then the style
/// guards restore the page, then the elements are removed.
pub struct FrameRunner {
    _listeners: Vec<EventListener>,
    _settle: Option<Timeout>,
    _ready_poll: Option<Interval>,
    _pending_frame: Option<AnimationFrame>,
    emulation: Option<StyleGuard<ElementStyle>>,
    _scroll_locks: Vec<StyleGuard<ElementStyle>>,
    dom: FrameDom,

    config: FrameConfig,
    window: Window,
    document: Document,
    channel: FrameChannel<JsValue>,
    user_agent: String,
    profile: DeviceProfile,
    rotate: RotatePrompt,
    fullscreen: FullscreenController,
    layout: Option<FrameLayout>,
    results_callback: Option<Function>,
    event_callback: Option<Function>,
    outbox: Vec<PendingCall>,
}

impl FrameRunner {
    /// Build the element tree under `parent` and lock page scrolling.
    /// Call [`FrameRunner::subscribe`] once the runner is reachable.
    pub fn mount(
        window: Window,
        parent: &Element,
        user_id: UserId,
        config: FrameConfig,
    ) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("gameframe: no document"))?;

        let src = game_url(&config.game_base_url, &user_id);
        let dom = FrameDom::build(&document, parent, &config, &user_id, &src)?;

        let mut scroll_locks = Vec::new();
        if let Some(body) = document.body() {
            scroll_locks.push(StyleGuard::acquire(ElementStyle::of(&body), &scroll_lock()));
        }
        if let Some(html) = document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            scroll_locks.push(StyleGuard::acquire(ElementStyle::of(&html), &scroll_lock()));
        }

        let session = Session::new(user_id, config.retry_policy());
        let mut channel = FrameChannel::new(session, config.explicit_origin().map(str::to_string));
        // The iframe is in the document, so its browsing context exists.
        match dom.iframe.content_window() {
            Some(frame_window) => channel.attach(frame_window.into(), js_sys::Date::now()),
            None => log::warn!("gameframe: frame window not available yet; attaching on load"),
        }

        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let fullscreen = FullscreenController::new(config.fullscreen_strategy);

        log::info!("gameframe: mounted {}", src);

        Ok(Self {
            _listeners: Vec::new(),
            _settle: None,
            _ready_poll: None,
            _pending_frame: None,
            emulation: None,
            _scroll_locks: scroll_locks,
            dom,
            config,
            window,
            document,
            channel,
            user_agent,
            profile: DeviceProfile::desktop(),
            rotate: RotatePrompt::new(),
            fullscreen,
            layout: None,
            results_callback: None,
            event_callback: None,
            outbox: Vec::new(),
        })
    }

    /// Register every window, document and element subscription.
    pub fn subscribe(&mut self) {
        let mut listeners = vec![
            EventListener::new(&self.window, "message", |event| {
                if let Some(event) = event.dyn_ref::<MessageEvent>() {
                    with_runner(|r| r.on_message(event));
                }
            }),
            EventListener::new(&self.window, "resize", |_| {
                with_runner(|r| r.on_viewport(ViewportEvent::Resized));
            }),
            EventListener::new(&self.window, "orientationchange", |_| {
                with_runner(|r| r.on_viewport(ViewportEvent::OrientationChanged));
            }),
            EventListener::new(&self.document, "fullscreenchange", |_| {
                with_runner(|r| r.on_fullscreen_change());
            }),
            EventListener::new(&self.document, "fullscreenerror", |_| {
                with_runner(|r| r.on_fullscreen_error());
            }),
            EventListener::new(&self.dom.iframe, "load", |_| {
                with_runner(|r| r.on_viewport(ViewportEvent::FrameLoaded));
            }),
        ];
        if let Some(button) = &self.dom.fullscreen_button {
            listeners.push(EventListener::new(button, "click", |_| {
                with_runner(|r| r.toggle_fullscreen());
            }));
        }
        if let Some(button) = &self.dom.lock_button {
            listeners.push(EventListener::new(button, "click", |_| {
                with_runner(|r| r.enter_fullscreen_and_lock());
            }));
        }
        if let Some(button) = &self.dom.dismiss_button {
            listeners.push(EventListener::new(button, "click", |_| {
                with_runner(|r| r.dismiss_rotate());
            }));
        }
        self._listeners = listeners;

        if self.config.ready_timeout_ms.is_some() {
            self._ready_poll = Some(Interval::new(self.config.poll_interval_ms, || {
                with_runner(|r| r.poll_ready());
            }));
        }

        self.on_viewport(ViewportEvent::Mounted);
    }

    // ---- Accessors ----

    pub fn state(&self) -> &'static str {
        self.channel.state().as_str()
    }

    pub fn scale(&self) -> f64 {
        self.layout.map(|l| l.scale).unwrap_or(0.0)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    pub fn set_results_callback(&mut self, callback: Option<Function>) {
        self.results_callback = callback;
    }

    pub fn set_event_callback(&mut self, callback: Option<Function>) {
        self.event_callback = callback;
    }

    /// Callbacks queued while handling the last event.
    pub fn take_pending(&mut self) -> Vec<PendingCall> {
        std::mem::take(&mut self.outbox)
    }

    // ---- Messaging ----

    fn on_message(&mut self, event: &MessageEvent) {
        let source: JsValue = event.source().map(JsValue::from).unwrap_or(JsValue::NULL);
        let origin = event.origin();
        if !self.channel.accepts(&source, &origin) {
            return;
        }
        let data = convert::to_json(&event.data());
        let actions = self.channel.receive(&source, &origin, &data);
        self.perform(actions);
    }

    fn poll_ready(&mut self) {
        let actions = self.channel.poll(js_sys::Date::now());
        self.perform(actions);
    }

    fn perform(&mut self, actions: Vec<SessionAction>) {
        for action in actions {
            match action {
                SessionAction::Send(message) => self.post(&message),
                SessionAction::Notify(event) => self.relay(event),
            }
        }
    }

    /// Fire-and-forget post into the game frame.
    fn post(&self, message: &HostMessage) {
        let Some(frame_window) = self.dom.iframe.content_window() else {
            log::warn!("gameframe: frame window unavailable, message dropped");
            return;
        };
        let result = message
            .to_value()
            .map_err(|err| JsValue::from_str(&err.to_string()))
            .and_then(|value| convert::to_js(&value))
            .and_then(|js| frame_window.post_message(&js, &self.config.target_origin));
        match result {
            Ok(()) => log::info!("gameframe: sent AUTH to game"),
            Err(err) => log::error!("gameframe: post failed: {:?}", err),
        }
    }

    fn relay(&mut self, event: SessionEvent) {
        let (kind, detail) = match &event {
            SessionEvent::Acknowledged { id, token } => {
                ("auth_ack", json!({ "id": id, "token": token }))
            }
            SessionEvent::GameData(data) => ("game_data", data.clone()),
            SessionEvent::Partial(results) | SessionEvent::Completed(results) => {
                let payload = serde_json::to_value(results).unwrap_or_default();
                if let Some(callback) = self.results_callback.clone() {
                    self.queue(callback, &[
                        convert::to_js(&payload).unwrap_or(JsValue::NULL),
                        JsValue::from_bool(results.is_partial),
                    ]);
                }
                let kind = if results.is_partial { "partial" } else { "complete" };
                (kind, payload)
            }
            SessionEvent::Stalled => ("stalled", json!({ "state": self.state() })),
        };
        self.emit(kind, &detail);
    }

    fn emit(&mut self, kind: &str, detail: &serde_json::Value) {
        if let Some(callback) = self.event_callback.clone() {
            let detail = convert::to_js(detail).unwrap_or(JsValue::NULL);
            self.queue(callback, &[JsValue::from_str(kind), detail]);
        }
    }

    fn queue(&mut self, function: Function, args: &[JsValue]) {
        let args = args.iter().collect::<Array>();
        self.outbox.push(PendingCall { function, args });
    }

    // ---- Viewport ----

    fn on_viewport(&mut self, event: ViewportEvent) {
        if event == ViewportEvent::FrameLoaded {
            self.on_frame_loaded();
            return;
        }
        if event.reclassifies() {
            let window = self.window_size();
            self.profile = DeviceProfile::classify(&self.user_agent, window, self.config.mobile_detection);
            self.rotate.observe(&self.profile);
        }
        self.relayout();
        if event.needs_settle() {
            self.schedule_settle();
        }
    }

    fn on_frame_loaded(&mut self) {
        if !self.channel.is_attached() {
            if let Some(frame_window) = self.dom.iframe.content_window() {
                self.channel.attach(frame_window.into(), js_sys::Date::now());
            }
        }
        let actions = self.channel.frame_loaded(js_sys::Date::now());
        self.perform(actions);

        // Re-measure once the game's first frame is painted.
        self._pending_frame = Some(request_animation_frame(|_| {
            with_runner(|r| r.relayout());
        }));
    }

    fn schedule_settle(&mut self) {
        self._settle = Some(Timeout::new(self.config.settle_delay_ms, || {
            with_runner(|r| r.on_viewport(ViewportEvent::Settled));
        }));
    }

    fn window_size(&self) -> Size {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(width, height)
    }

    fn relayout(&mut self) {
        let window = self.window_size();
        if !window.is_valid() {
            log::debug!("gameframe: window has no size yet, skipping layout");
            return;
        }
        let parent_width = self.dom.parent_width().unwrap_or(window.width);
        let layout = FrameLayout::compute(&self.config, window, parent_width, &self.profile);
        self.dom.apply_layout(&layout);

        let fullscreen = self.fullscreen.is_fullscreen();
        if let Some(guard) = &self.emulation {
            guard.update(&emulated_styles(window));
        }
        self.dom.set_fullscreen(fullscreen);
        self.dom.set_overlay_visible(self.rotate.visible(&self.profile, fullscreen));

        if self.layout != Some(layout) {
            log::debug!("gameframe: scale {:.3}", layout.scale);
            self.layout = Some(layout);
        }
    }

    // ---- Fullscreen ----

    pub fn toggle_fullscreen(&mut self) {
        let supported = self.document.fullscreen_enabled();
        if let Some(command) = self.fullscreen.toggle(supported) {
            self.apply_fullscreen(command);
        }
    }

    /// Fullscreen, then landscape lock once the platform confirms it.
    pub fn enter_fullscreen_and_lock(&mut self) {
        let supported = self.document.fullscreen_enabled();
        if let Some(command) = self.fullscreen.enter_and_lock(supported) {
            self.apply_fullscreen(command);
        }
    }

    fn apply_fullscreen(&mut self, command: FullscreenCommand) {
        match command {
            FullscreenCommand::RequestNative => {
                if let Err(err) = self.dom.root.request_fullscreen() {
                    log::warn!("gameframe: fullscreen request failed: {:?}", err);
                    self.on_fullscreen_error();
                }
            }
            FullscreenCommand::ExitNative => self.document.exit_fullscreen(),
            FullscreenCommand::EnterEmulated => {
                let styles = emulated_styles(self.window_size());
                self.emulation = Some(StyleGuard::acquire(ElementStyle::of(&self.dom.root), &styles));
                self.emit("fullscreen", &json!({ "active": true, "emulated": true }));
                self.on_viewport(ViewportEvent::FullscreenChanged);
            }
            FullscreenCommand::ExitEmulated => {
                self.emulation = None;
                self.emit("fullscreen", &json!({ "active": false, "emulated": true }));
                self.on_viewport(ViewportEvent::FullscreenChanged);
            }
            FullscreenCommand::LockLandscape => self.lock_landscape(),
        }
    }

    /// Fire-and-forget; most desktop browsers and iOS reject the lock.
    fn lock_landscape(&self) {
        let promise = match self
            .window
            .screen()
            .and_then(|screen| screen.orientation().lock(OrientationLockType::Landscape))
        {
            Ok(promise) => promise,
            Err(err) => {
                log::warn!("gameframe: orientation lock unavailable: {:?}", err);
                return;
            }
        };
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => log::info!("gameframe: orientation locked to landscape"),
                Err(err) => log::warn!("gameframe: orientation lock refused: {:?}", err),
            }
        });
    }

    fn on_fullscreen_change(&mut self) {
        let active = self.document.fullscreen_element().is_some();
        let command = self.fullscreen.native_changed(active);
        self.emit("fullscreen", &json!({ "active": active, "emulated": false }));
        match command {
            // Tearing down the emulation re-runs the layout itself.
            Some(FullscreenCommand::ExitEmulated) => self.apply_fullscreen(FullscreenCommand::ExitEmulated),
            Some(command) => {
                self.apply_fullscreen(command);
                self.on_viewport(ViewportEvent::FullscreenChanged);
            }
            None => self.on_viewport(ViewportEvent::FullscreenChanged),
        }
    }

    fn on_fullscreen_error(&mut self) {
        if let Some(command) = self.fullscreen.native_rejected() {
            self.apply_fullscreen(command);
        }
    }

    pub fn dismiss_rotate(&mut self) {
        self.rotate.dismiss();
        self.relayout();
    }
}

impl Drop for FrameRunner {
    fn drop(&mut self) {
        self.channel.detach();
        if self.fullscreen.mode() == FullscreenMode::Native {
            self.document.exit_fullscreen();
        }
        log::info!("gameframe: unmounted");
    }
}

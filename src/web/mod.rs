//! Browser host
//!
//! Binds a session to three stacked canvases, forwards DOM input into the
//! session's queue and ticks it from `requestAnimationFrame`. JavaScript gets
//! a [`DemoHandle`] back and calls `stop()` to tear everything down.

pub mod canvas;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, KeyboardEvent, MouseEvent, Window};

use crate::config::GameConfig;
use crate::error::HostError;
use crate::game::constants::input::PAUSE_KEY;
use crate::game::input::{InputEvent, KeyBindings};
use crate::game::input_queue::InputSender;
use crate::game::session::{GameSession, LoopState};

use self::canvas::CanvasSink;

impl From<HostError> for JsValue {
    fn from(err: HostError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Session plus the sink it draws on
struct Demo {
    session: GameSession,
    sink: CanvasSink,
}

impl Demo {
    fn tick(&mut self, now_ms: f64) -> LoopState {
        self.session.tick(now_ms, &mut self.sink).state
    }
}

/// A registered DOM listener, kept so it can be removed again
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach<F>(target: EventTarget, event: &'static str, handler: F) -> Result<Self, HostError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| HostError::Listener {
                event,
                reason: format!("{:?}", e),
            })?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }

    fn detach(self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            warn!("Failed to remove '{}' listener: {:?}", self.event, e);
        }
    }
}

fn forward(sender: &InputSender, event: InputEvent) {
    if let Err(e) = sender.try_send(event) {
        warn!("Dropped input event: {}", e);
    }
}

fn attach_listeners(
    window: &Window,
    document: &Document,
    sink: &CanvasSink,
    sender: &InputSender,
    bindings: KeyBindings,
) -> Result<Vec<Listener>, HostError> {
    let doc_target: &EventTarget = document.as_ref();
    let canvas_target: &EventTarget = sink.pointer_canvas().as_ref();
    let window_target: &EventTarget = window.as_ref();

    let mut listeners = Vec::with_capacity(6);

    let tx = sender.clone();
    listeners.push(Listener::attach(doc_target.clone(), "keydown", move |event| {
        if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
            let key = key_event.key();
            // Keep arrow keys from scrolling the page
            if bindings.direction_of(&key).is_some() || key.eq_ignore_ascii_case(PAUSE_KEY) {
                event.prevent_default();
            }
            forward(&tx, InputEvent::KeyDown { key });
        }
    })?);

    let tx = sender.clone();
    listeners.push(Listener::attach(doc_target.clone(), "keyup", move |event| {
        if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
            forward(&tx, InputEvent::KeyUp { key: key_event.key() });
        }
    })?);

    let tx = sender.clone();
    listeners.push(Listener::attach(canvas_target.clone(), "mousedown", move |event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            forward(&tx, InputEvent::MouseDown { button: mouse.button() });
        }
    })?);

    let tx = sender.clone();
    listeners.push(Listener::attach(canvas_target.clone(), "mouseup", move |event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            forward(&tx, InputEvent::MouseUp { button: mouse.button() });
        }
    })?);

    let tx = sender.clone();
    listeners.push(Listener::attach(canvas_target.clone(), "mousemove", move |event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            forward(
                &tx,
                InputEvent::MouseMove {
                    x: mouse.offset_x() as f32,
                    y: mouse.offset_y() as f32,
                },
            );
        }
    })?);

    // Keys released while unfocused never reach us
    let tx = sender.clone();
    listeners.push(Listener::attach(window_target.clone(), "blur", move |_| {
        forward(&tx, InputEvent::Blur);
    })?);

    Ok(listeners)
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` callback
struct FrameLoop {
    window: Window,
    callback: FrameCallback,
    /// Id of the frame requested but not yet run
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn spawn(window: &Window, demo: Rc<RefCell<Demo>>) -> Result<Self, HostError> {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let next = callback.clone();
        let next_pending = pending.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            next_pending.set(None);
            if demo.borrow_mut().tick(ts) == LoopState::Stopped {
                return;
            }
            if let Some(cb) = next.borrow().as_ref() {
                match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => next_pending.set(Some(id)),
                    Err(e) => warn!("Failed to schedule next frame: {:?}", e),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let id = match callback.borrow().as_ref() {
            Some(cb) => window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .map_err(|e| HostError::AnimationFrame(format!("{:?}", e)))?,
            None => return Err(HostError::AnimationFrame("callback missing".to_string())),
        };
        pending.set(Some(id));

        Ok(Self {
            window: window.clone(),
            callback,
            pending,
        })
    }

    /// Cancel the pending frame and release the callback
    fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                warn!("Failed to cancel animation frame: {:?}", e);
            }
        }
        self.callback.borrow_mut().take();
    }
}

/// Running demo, returned to JavaScript
#[wasm_bindgen]
pub struct DemoHandle {
    demo: Rc<RefCell<Demo>>,
    listeners: Vec<Listener>,
    frames: FrameLoop,
}

#[wasm_bindgen]
impl DemoHandle {
    /// Stop the session, cancel the animation loop and remove all listeners
    pub fn stop(&mut self) {
        self.demo.borrow_mut().session.stop();
        self.frames.cancel();
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
    }

    #[wasm_bindgen(js_name = isStopped)]
    pub fn is_stopped(&self) -> bool {
        self.demo.borrow().session.state() == LoopState::Stopped
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> bool {
        self.demo.borrow().session.state() == LoopState::Paused
    }
}

impl Drop for DemoHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start the demo on the default 10x10 grid
#[wasm_bindgen]
pub fn start() -> Result<DemoHandle, JsValue> {
    launch(GameConfig::default())
}

/// Start the demo on a `cols` x `rows` grid with the player centred
#[wasm_bindgen(js_name = startWithGrid)]
pub fn start_with_grid(cols: u32, rows: u32) -> Result<DemoHandle, JsValue> {
    launch(GameConfig::default().with_grid(cols, rows))
}

fn launch(config: GameConfig) -> Result<DemoHandle, JsValue> {
    #[cfg(feature = "panic_hook")]
    console_error_panic_hook::set_once();
    // tracing forwards to `log` when no subscriber is set; errs if a previous start installed it
    let _ = console_log::init_with_level(log::Level::Info);

    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let document = window.document().ok_or(HostError::NoDocument)?;
    let sink = CanvasSink::acquire(&document, config.grid())?;

    let session = GameSession::new(&config);
    let listeners = attach_listeners(
        &window,
        &document,
        &sink,
        &session.input_sender(),
        config.key_layout.bindings(),
    )?;

    let demo = Rc::new(RefCell::new(Demo { session, sink }));
    let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
    {
        let mut guard = demo.borrow_mut();
        let Demo { session, sink } = &mut *guard;
        session.start(now, sink);
    }

    let frames = match FrameLoop::spawn(&window, demo.clone()) {
        Ok(frames) => frames,
        Err(e) => {
            for listener in listeners {
                listener.detach();
            }
            return Err(e.into());
        }
    };

    info!("Demo started on a {}x{} grid", config.grid_cols, config.grid_rows);
    Ok(DemoHandle {
        demo,
        listeners,
        frames,
    })
}

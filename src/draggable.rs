//! Draggable panels
//!
//! [`attach`] turns a scene element into a floating panel that can be moved
//! by pressing on its handle and dragging. The panel is clamped to the
//! viewport on every move, and when a storage key is given its position is
//! restored on attach and saved when a drag ends.
//!
//! Each attachment runs a two-state machine:
//!
//! ```text
//!            pointer-down on handle
//!   Idle  ─────────────────────────────▶  Dragging
//!    ▲                                       │ pointer-move: reposition
//!    └───────────────────────────────────────┘
//!      pointer-up | pointer-cancel | lost capture
//! ```
//!
//! Window-level move/up/cancel listeners and the handle's lost-capture
//! listener exist only while Dragging. Leaving Dragging removes them.
//!
//! Nothing here ever fails visibly: a missing panel or handle leaves the
//! attachment inert, bad saved data is ignored, and store faults are logged
//! and dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::geometry::{PanelPosition, Point};
use crate::pointer::{PointerEvent, PointerEventKind, PointerId};
use crate::scene::{
    CursorStyle, ElementId, ListenerId, ListenerTarget, PositionMode, Scene, TouchAction,
    UserSelect,
};
use crate::store::PositionStore;

/// Where a panel lands when nothing placed it explicitly
pub const DEFAULT_ORIGIN: PanelPosition = PanelPosition {
    left: 24.0,
    top: 24.0,
};

/// Store shared by every attachment
pub type SharedStore = Rc<dyn PositionStore>;

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DragOptions {
    /// Selector for the descendant that starts drags; the whole panel if `None`
    pub handle: Option<String>,
    /// Key under which the position is saved and restored
    pub storage_key: Option<String>,
    /// Offset applied when the panel has no explicit left/top
    pub default_origin: PanelPosition,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            handle: None,
            storage_key: None,
            default_origin: DEFAULT_ORIGIN,
        }
    }
}

impl DragOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle(mut self, selector: impl Into<String>) -> Self {
        self.handle = Some(selector.into());
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    pub fn with_default_origin(mut self, origin: PanelPosition) -> Self {
        self.default_origin = origin;
        self
    }
}

// ============================================================================
// State
// ============================================================================

/// Handle styling as it was before attach, restored on detach
#[derive(Debug, Clone, PartialEq)]
struct HandleStyle {
    cursor: Option<CursorStyle>,
    user_select: Option<UserSelect>,
    touch_action: Option<TouchAction>,
}

/// Baseline of one press-to-release cycle
#[derive(Debug)]
struct DragSession {
    pointer: PointerId,
    start_pointer: Point,
    start_panel: PanelPosition,
    listeners: [ListenerId; 4],
}

#[derive(Debug)]
enum DragState {
    Idle,
    Dragging(DragSession),
}

struct Attachment {
    panel: ElementId,
    handle: ElementId,
    storage_key: Option<String>,
    store: SharedStore,
    state: DragState,
}

type SharedAttachment = Rc<RefCell<Attachment>>;

// ============================================================================
// Attach / detach
// ============================================================================

/// Make `panel` draggable.
///
/// Returns an inert handle (no listeners, no style changes) if the panel is
/// not in the scene or the handle selector matches nothing.
pub fn attach(
    scene: &mut Scene,
    panel: ElementId,
    options: &DragOptions,
    store: SharedStore,
) -> DetachHandle {
    if !scene.contains(panel) {
        tracing::debug!(?panel, "panel not in scene, drag not attached");
        return DetachHandle::inert();
    }

    let handle = match &options.handle {
        Some(selector) => match scene.query_selector(panel, selector) {
            Some(handle) => handle,
            None => {
                tracing::debug!(?panel, %selector, "drag handle not found, drag not attached");
                return DetachHandle::inert();
            }
        },
        None => panel,
    };

    prepare_panel(scene, panel, options.default_origin);
    let saved_style = mark_handle(scene, handle);

    if let Some(key) = &options.storage_key {
        restore_position(scene, panel, key, store.as_ref());
    }

    let attachment = Rc::new(RefCell::new(Attachment {
        panel,
        handle,
        storage_key: options.storage_key.clone(),
        store,
        state: DragState::Idle,
    }));

    let down_listener = {
        let attachment = Rc::clone(&attachment);
        scene.add_listener(
            ListenerTarget::Element(handle),
            PointerEventKind::Down,
            Rc::new(move |scene, event| on_pointer_down(scene, &attachment, event)),
        )
    };

    tracing::debug!(?panel, ?handle, key = ?options.storage_key, "drag attached");

    DetachHandle {
        live: Some(Live {
            attachment,
            down_listener,
            saved_style,
        }),
    }
}

struct Live {
    attachment: SharedAttachment,
    down_listener: ListenerId,
    saved_style: HandleStyle,
}

/// Undo token returned by [`attach`].
///
/// Must be passed back with [`DetachHandle::detach`]; dropping it leaves the
/// listeners registered on the scene.
#[must_use = "dropping a DetachHandle leaves the panel's listeners registered"]
pub struct DetachHandle {
    live: Option<Live>,
}

impl DetachHandle {
    /// A handle for an attachment that never happened
    pub fn inert() -> Self {
        Self { live: None }
    }

    pub fn is_attached(&self) -> bool {
        self.live.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.live.as_ref().is_some_and(|live| {
            matches!(live.attachment.borrow().state, DragState::Dragging(_))
        })
    }

    pub fn panel(&self) -> Option<ElementId> {
        self.live.as_ref().map(|live| live.attachment.borrow().panel)
    }

    pub fn handle(&self) -> Option<ElementId> {
        self.live.as_ref().map(|live| live.attachment.borrow().handle)
    }

    /// Remove every listener, release capture and restore handle styling.
    ///
    /// Safe mid-drag. The panel stays where it is and nothing is saved.
    pub fn detach(mut self, scene: &mut Scene) {
        let Some(live) = self.live.take() else {
            return;
        };

        scene.remove_listener(live.down_listener);

        let (handle, session) = {
            let mut attachment = live.attachment.borrow_mut();
            let session = match std::mem::replace(&mut attachment.state, DragState::Idle) {
                DragState::Dragging(session) => Some(session),
                DragState::Idle => None,
            };
            (attachment.handle, session)
        };

        if let Some(session) = session {
            tracing::debug!(?handle, "detaching mid-drag");
            unsubscribe(scene, &session);
            scene.release_pointer_capture(handle, session.pointer);
        }

        if let Some(style) = scene.style_mut(handle) {
            style.cursor = live.saved_style.cursor;
            style.user_select = live.saved_style.user_select;
            style.touch_action = live.saved_style.touch_action;
        }
    }
}

impl fmt::Debug for DetachHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetachHandle")
            .field("panel", &self.panel())
            .field("handle", &self.handle())
            .field("dragging", &self.is_dragging())
            .finish()
    }
}

// ============================================================================
// Re-attachment on dependency change
// ============================================================================

/// Keeps one panel attachment in sync with its inputs.
///
/// Call [`bind`](Self::bind) whenever the panel or options may have changed.
/// If they did, the previous attachment is detached before the new one is
/// made, so listeners are never duplicated. Binding `None` first and the
/// element later attaches as soon as it exists.
pub struct DraggableBinding {
    store: SharedStore,
    inputs: Option<(Option<ElementId>, DragOptions)>,
    current: Option<DetachHandle>,
}

impl DraggableBinding {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            inputs: None,
            current: None,
        }
    }

    /// Returns whether the panel is attached afterwards
    pub fn bind(&mut self, scene: &mut Scene, panel: Option<ElementId>, options: DragOptions) -> bool {
        let inputs = (panel, options);
        if self.inputs.as_ref() == Some(&inputs) {
            return self.is_attached();
        }

        self.unbind(scene);
        if let Some(panel) = inputs.0 {
            self.current = Some(attach(scene, panel, &inputs.1, Rc::clone(&self.store)));
        }
        self.inputs = Some(inputs);
        self.is_attached()
    }

    /// Detach and forget the current inputs
    pub fn unbind(&mut self, scene: &mut Scene) {
        if let Some(handle) = self.current.take() {
            handle.detach(scene);
        }
        self.inputs = None;
    }

    pub fn is_attached(&self) -> bool {
        self.current.as_ref().is_some_and(DetachHandle::is_attached)
    }

    pub fn current(&self) -> Option<&DetachHandle> {
        self.current.as_ref()
    }
}

// ============================================================================
// Setup helpers
// ============================================================================

fn prepare_panel(scene: &mut Scene, panel: ElementId, origin: PanelPosition) {
    let Some(style) = scene.style_mut(panel) else {
        return;
    };
    let origin = if origin.is_finite() {
        origin
    } else {
        tracing::warn!(?origin, "non-finite default origin, using {:?}", DEFAULT_ORIGIN);
        DEFAULT_ORIGIN
    };
    style.position = PositionMode::Fixed;
    style.left.get_or_insert(origin.left);
    style.top.get_or_insert(origin.top);
    style.will_change_position = true;
}

fn mark_handle(scene: &mut Scene, handle: ElementId) -> HandleStyle {
    let Some(style) = scene.style_mut(handle) else {
        return HandleStyle {
            cursor: None,
            user_select: None,
            touch_action: None,
        };
    };
    let saved = HandleStyle {
        cursor: style.cursor,
        user_select: style.user_select,
        touch_action: style.touch_action,
    };
    style.cursor = Some(CursorStyle::Move);
    style.user_select = Some(UserSelect::None);
    style.touch_action = Some(TouchAction::None);
    saved
}

/// Parse a saved position. Anything but an object with two finite numbers
/// is rejected.
pub fn parse_saved_position(raw: &str) -> Option<PanelPosition> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value::<PanelPosition>(value)
        .ok()
        .filter(PanelPosition::is_finite)
}

fn restore_position(scene: &mut Scene, panel: ElementId, key: &str, store: &dyn PositionStore) {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(key, "Failed to read saved panel position: {:#}", e);
            return;
        }
    };
    let Some(saved) = parse_saved_position(&raw) else {
        tracing::debug!(key, %raw, "ignoring malformed saved panel position");
        return;
    };
    let Some(rect) = scene.bounding_rect(panel) else {
        return;
    };
    let position = saved.clamped(rect.size(), scene.viewport());
    apply_position(scene, panel, position);
}

fn save_position(scene: &Scene, panel: ElementId, key: &str, store: &dyn PositionStore) {
    let Some(rect) = scene.bounding_rect(panel) else {
        return;
    };
    let position = PanelPosition::from(rect.origin());
    let result = serde_json::to_string(&position)
        .map_err(anyhow::Error::from)
        .and_then(|json| store.set(key, &json));
    if let Err(e) = result {
        tracing::warn!(key, "Failed to save panel position: {:#}", e);
    }
}

fn apply_position(scene: &mut Scene, panel: ElementId, position: PanelPosition) {
    if let Some(style) = scene.style_mut(panel) {
        style.left = Some(position.left);
        style.top = Some(position.top);
    }
}

// ============================================================================
// Drag protocol
// ============================================================================

fn on_pointer_down(scene: &mut Scene, attachment: &SharedAttachment, event: &PointerEvent) {
    let (panel, handle) = {
        let att = attachment.borrow();
        if let DragState::Dragging(session) = &att.state {
            tracing::debug!(
                active = ?session.pointer,
                pointer = ?event.pointer_id,
                "ignoring pointer-down during an active drag"
            );
            return;
        }
        (att.panel, att.handle)
    };

    let Some(rect) = scene.bounding_rect(panel) else {
        return;
    };

    scene.set_pointer_capture(handle, event.pointer_id);
    let listeners = subscribe(scene, attachment, handle);

    tracing::debug!(?panel, pointer = ?event.pointer_id, "drag started");
    attachment.borrow_mut().state = DragState::Dragging(DragSession {
        pointer: event.pointer_id,
        start_pointer: event.client,
        start_panel: PanelPosition::from(rect.origin()),
        listeners,
    });
}

fn on_pointer_move(scene: &mut Scene, attachment: &SharedAttachment, event: &PointerEvent) {
    let (panel, proposed) = {
        let att = attachment.borrow();
        let DragState::Dragging(session) = &att.state else {
            return;
        };
        if session.pointer != event.pointer_id {
            return;
        }
        let (dx, dy) = event.client.delta_from(session.start_pointer);
        (att.panel, session.start_panel.offset(dx, dy))
    };

    let Some(rect) = scene.bounding_rect(panel) else {
        return;
    };
    let position = proposed.clamped(rect.size(), scene.viewport());
    apply_position(scene, panel, position);
}

/// Shared by pointer-up, pointer-cancel and lost capture. Only the first
/// signal for a session does anything.
fn on_pointer_end(scene: &mut Scene, attachment: &SharedAttachment, event: &PointerEvent) {
    let (session, panel, handle, key, store) = {
        let mut att = attachment.borrow_mut();
        match &att.state {
            DragState::Dragging(session) if session.pointer == event.pointer_id => {}
            _ => return,
        }
        let DragState::Dragging(session) = std::mem::replace(&mut att.state, DragState::Idle)
        else {
            return;
        };
        (
            session,
            att.panel,
            att.handle,
            att.storage_key.clone(),
            Rc::clone(&att.store),
        )
    };

    unsubscribe(scene, &session);
    scene.release_pointer_capture(handle, session.pointer);
    tracing::debug!(?panel, reason = ?event.kind, "drag ended");

    if let Some(key) = key {
        save_position(scene, panel, &key, store.as_ref());
    }
}

/// Listeners that live exactly as long as one drag session.
///
/// The lost-capture listener is removed with the others when the session
/// ends, so each press installs a fresh one and none is ever left armed.
fn subscribe(scene: &mut Scene, attachment: &SharedAttachment, handle: ElementId) -> [ListenerId; 4] {
    let on_move = {
        let attachment = Rc::clone(attachment);
        scene.add_listener(
            ListenerTarget::Window,
            PointerEventKind::Move,
            Rc::new(move |scene, event| on_pointer_move(scene, &attachment, event)),
        )
    };
    let on_up = {
        let attachment = Rc::clone(attachment);
        scene.add_listener(
            ListenerTarget::Window,
            PointerEventKind::Up,
            Rc::new(move |scene, event| on_pointer_end(scene, &attachment, event)),
        )
    };
    let on_cancel = {
        let attachment = Rc::clone(attachment);
        scene.add_listener(
            ListenerTarget::Window,
            PointerEventKind::Cancel,
            Rc::new(move |scene, event| on_pointer_end(scene, &attachment, event)),
        )
    };
    let on_lost = {
        let attachment = Rc::clone(attachment);
        scene.add_listener(
            ListenerTarget::Element(handle),
            PointerEventKind::LostCapture,
            Rc::new(move |scene, event| on_pointer_end(scene, &attachment, event)),
        )
    };
    [on_move, on_up, on_cancel, on_lost]
}

fn unsubscribe(scene: &mut Scene, session: &DragSession) {
    for id in session.listeners {
        scene.remove_listener(id);
    }
}

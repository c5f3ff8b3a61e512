//! Scene - the host rendering layer that panels live in
//!
//! A scene is a small retained element tree with inline styles, a viewport,
//! and a pointer event system modelled on the browser's:
//! - Elements are hit-tested in paint order (last painted wins, children over parents)
//! - Listeners are registered on an element or on the window and receive
//!   events bubbling from the target element up to the window
//! - Pointer capture routes every event of one pointer to a single element
//!   until it is released; losing capture delivers `LostCapture`
//!
//! Dispatch is synchronous. Anything raised while a dispatch is running
//! (for example a `LostCapture` caused by a handler releasing capture) is
//! queued and delivered once the current handler returns, so handlers are
//! never re-entered.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use crate::geometry::{Point, Rect, Size};
use crate::pointer::{PointerEvent, PointerEventKind, PointerId};

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Unique identifier for a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

// ============================================================================
// Styles
// ============================================================================

/// How an element's origin is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionMode {
    /// Laid out at `offset` relative to its parent
    #[default]
    Static,
    /// Placed at `left`/`top` relative to the viewport
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Pointer,
    Text,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSelect {
    Auto,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Auto,
    None,
}

/// Inline style of an element. `None` means "not set".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub position: PositionMode,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub cursor: Option<CursorStyle>,
    pub user_select: Option<UserSelect>,
    pub touch_action: Option<TouchAction>,
    /// Hint that left/top are about to change frequently
    pub will_change_position: bool,
    /// Fill color (0xAARRGGBB)
    pub background: Option<u32>,
}

// ============================================================================
// Elements
// ============================================================================

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub dom_id: Option<String>,
    pub classes: Vec<String>,
    pub size: Size,
    /// Offset from the parent's origin (or the viewport for roots) when static
    pub offset: Point,
    pub style: Style,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            dom_id: None,
            classes: Vec::new(),
            size: Size::default(),
            offset: Point::default(),
            style: Style::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.dom_id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.offset = Point::new(x, y);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

// ============================================================================
// Selectors
// ============================================================================

/// A single simple selector: `.class`, `#id` or `tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Class(String),
    Id(String),
    Tag(String),
}

impl Selector {
    /// Parse a simple selector. Compound or malformed selectors yield `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(rest) = input.strip_prefix('.') {
            is_ident(rest).then(|| Selector::Class(rest.to_string()))
        } else if let Some(rest) = input.strip_prefix('#') {
            is_ident(rest).then(|| Selector::Id(rest.to_string()))
        } else {
            is_ident(input).then(|| Selector::Tag(input.to_string()))
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Class(class) => element.has_class(class),
            Selector::Id(id) => element.dom_id.as_deref() == Some(id.as_str()),
            Selector::Tag(tag) => element.tag == *tag,
        }
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ============================================================================
// Listeners
// ============================================================================

/// Where a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Element(ElementId),
    Window,
}

/// Event callback. Receives the scene so it can restyle elements, manage
/// capture and (un)register listeners.
pub type PointerHandler = Rc<dyn Fn(&mut Scene, &PointerEvent)>;

struct Listener {
    target: ListenerTarget,
    kind: PointerEventKind,
    handler: PointerHandler,
}

enum Route {
    /// Captured element, or whatever is under the pointer
    HitTest,
    /// A specific element (lost-capture notifications)
    Element(ElementId),
}

struct Pending {
    event: PointerEvent,
    route: Route,
}

// ============================================================================
// Scene
// ============================================================================

pub struct Scene {
    elements: HashMap<ElementId, Element>,
    /// Root elements in paint order (last is topmost)
    roots: Vec<ElementId>,
    viewport: Size,
    listeners: BTreeMap<ListenerId, Listener>,
    captures: HashMap<PointerId, ElementId>,
    last_positions: HashMap<PointerId, Point>,
    pending: VecDeque<Pending>,
    dispatching: bool,
    next_element_id: u64,
    next_listener_id: u64,
}

impl Scene {
    pub fn new(viewport: Size) -> Self {
        Self {
            elements: HashMap::new(),
            roots: Vec::new(),
            viewport,
            listeners: BTreeMap::new(),
            captures: HashMap::new(),
            last_positions: HashMap::new(),
            pending: VecDeque::new(),
            dispatching: false,
            next_element_id: 1,
            next_listener_id: 1,
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    // ------------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------------

    /// Add a top-level element, painted above existing ones
    pub fn add_root(&mut self, mut element: Element) -> ElementId {
        let id = self.alloc_element_id();
        element.parent = None;
        element.children.clear();
        self.elements.insert(id, element);
        self.roots.push(id);
        id
    }

    /// Add a child element. Returns `None` if the parent does not exist.
    pub fn add_child(&mut self, parent: ElementId, mut element: Element) -> Option<ElementId> {
        if !self.elements.contains_key(&parent) {
            return None;
        }
        let id = self.alloc_element_id();
        element.parent = Some(parent);
        element.children.clear();
        self.elements.insert(id, element);
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.push(id);
        }
        Some(id)
    }

    /// Remove an element and its subtree.
    ///
    /// Listeners registered on removed elements are dropped and any pointer
    /// capture they held ends silently. Window listeners are left alone.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let Some(element) = self.elements.get(&id) else {
            return false;
        };
        match element.parent {
            Some(parent) => {
                if let Some(parent) = self.elements.get_mut(&parent) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut removed = Vec::new();
        self.collect_subtree(id, &mut removed);
        for gone in &removed {
            self.elements.remove(gone);
        }
        self.listeners.retain(|_, l| match l.target {
            ListenerTarget::Element(el) => !removed.contains(&el),
            ListenerTarget::Window => true,
        });
        self.captures.retain(|_, el| !removed.contains(el));
        true
    }

    /// Move a root element (or the root containing `id`) to the top of the paint order
    pub fn raise(&mut self, id: ElementId) {
        let Some(root) = self.root_of(id) else { return };
        self.roots.retain(|r| *r != root);
        self.roots.push(root);
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.elements.get(&id).map(|e| &e.style)
    }

    pub fn style_mut(&mut self, id: ElementId) -> Option<&mut Style> {
        self.elements.get_mut(&id).map(|e| &mut e.style)
    }

    pub fn root_of(&self, id: ElementId) -> Option<ElementId> {
        let mut current = self.elements.get(&id).map(|_| id)?;
        while let Some(parent) = self.elements.get(&current).and_then(|e| e.parent) {
            current = parent;
        }
        Some(current)
    }

    /// Every element in paint order (parents before their children)
    pub fn paint_order(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.elements.len());
        for root in &self.roots {
            self.collect_subtree(*root, &mut out);
        }
        out
    }

    /// First descendant of `root` (not `root` itself) matching `selector`,
    /// in document order.
    pub fn query_selector(&self, root: ElementId, selector: &str) -> Option<ElementId> {
        let selector = Selector::parse(selector)?;
        let element = self.elements.get(&root)?;
        let mut stack: Vec<ElementId> = element.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(el) = self.elements.get(&id) else {
                continue;
            };
            if selector.matches(el) {
                return Some(id);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        None
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// On-screen rectangle of an element
    pub fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        let element = self.elements.get(&id)?;
        let origin = match element.style.position {
            PositionMode::Fixed => Point::new(
                element.style.left.unwrap_or(0.0),
                element.style.top.unwrap_or(0.0),
            ),
            PositionMode::Static => match element.parent {
                Some(parent) => {
                    let parent = self.bounding_rect(parent)?;
                    Point::new(parent.x + element.offset.x, parent.y + element.offset.y)
                }
                None => element.offset,
            },
        };
        Some(Rect::from_origin_size(origin, element.size))
    }

    /// Topmost, deepest element under `pt`
    pub fn hit_test(&self, pt: Point) -> Option<ElementId> {
        self.roots
            .iter()
            .rev()
            .find_map(|root| self.hit_test_from(*root, pt))
    }

    fn hit_test_from(&self, id: ElementId, pt: Point) -> Option<ElementId> {
        let element = self.elements.get(&id)?;
        if let Some(hit) = element
            .children
            .iter()
            .rev()
            .find_map(|child| self.hit_test_from(*child, pt))
        {
            return Some(hit);
        }
        self.bounding_rect(id)
            .filter(|rect| rect.contains(pt))
            .map(|_| id)
    }

    /// Cursor shown at `pt`: the nearest explicit cursor on the hit element or its ancestors
    pub fn cursor_at(&self, pt: Point) -> Option<CursorStyle> {
        let mut current = self.hit_test(pt);
        while let Some(id) = current {
            let element = self.elements.get(&id)?;
            if let Some(cursor) = element.style.cursor {
                return Some(cursor);
            }
            current = element.parent;
        }
        None
    }

    // ------------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------------

    pub fn add_listener(
        &mut self,
        target: ListenerTarget,
        kind: PointerEventKind,
        handler: PointerHandler,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.insert(
            id,
            Listener {
                target,
                kind,
                handler,
            },
        );
        id
    }

    /// Returns whether the listener was still registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_count_for(&self, target: ListenerTarget) -> usize {
        self.listeners
            .values()
            .filter(|l| l.target == target)
            .count()
    }

    // ------------------------------------------------------------------------
    // Pointer capture
    // ------------------------------------------------------------------------

    /// Route all further events of `pointer` to `element`.
    ///
    /// If another element held capture for this pointer it receives `LostCapture`.
    pub fn set_pointer_capture(&mut self, element: ElementId, pointer: PointerId) -> bool {
        if !self.elements.contains_key(&element) {
            return false;
        }
        if let Some(previous) = self.captures.insert(pointer, element) {
            if previous != element {
                self.queue_lost_capture(previous, pointer);
                self.drain();
            }
        }
        true
    }

    /// Release capture held by `element`. No-op if it does not hold it.
    pub fn release_pointer_capture(&mut self, element: ElementId, pointer: PointerId) -> bool {
        if self.captures.get(&pointer) != Some(&element) {
            return false;
        }
        self.captures.remove(&pointer);
        self.queue_lost_capture(element, pointer);
        self.drain();
        true
    }

    pub fn has_pointer_capture(&self, element: ElementId, pointer: PointerId) -> bool {
        self.captures.get(&pointer) == Some(&element)
    }

    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }

    fn queue_lost_capture(&mut self, element: ElementId, pointer: PointerId) {
        let client = self
            .last_positions
            .get(&pointer)
            .copied()
            .unwrap_or_default();
        self.pending.push_back(Pending {
            event: PointerEvent {
                pointer_id: pointer,
                kind: PointerEventKind::LostCapture,
                client,
            },
            route: Route::Element(element),
        });
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Deliver a pointer event from the platform
    pub fn dispatch(&mut self, event: PointerEvent) {
        self.pending.push_back(Pending {
            event,
            route: Route::HitTest,
        });
        self.drain();
    }

    fn drain(&mut self) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        while let Some(pending) = self.pending.pop_front() {
            self.deliver(pending);
        }
        self.dispatching = false;
    }

    fn deliver(&mut self, pending: Pending) {
        let event = pending.event;
        if event.kind != PointerEventKind::LostCapture {
            self.last_positions.insert(event.pointer_id, event.client);
        }

        let target = match pending.route {
            Route::Element(id) => self.elements.contains_key(&id).then_some(id),
            Route::HitTest => self
                .captures
                .get(&event.pointer_id)
                .copied()
                .or_else(|| self.hit_test(event.client)),
        };

        let mut path = Vec::new();
        let mut current = target;
        while let Some(id) = current {
            path.push(ListenerTarget::Element(id));
            current = self.elements.get(&id).and_then(|e| e.parent);
        }
        path.push(ListenerTarget::Window);

        let handlers: Vec<(ListenerId, PointerHandler)> = path
            .iter()
            .flat_map(|t| {
                self.listeners
                    .iter()
                    .filter(move |(_, l)| l.target == *t && l.kind == event.kind)
                    .map(|(id, l)| (*id, Rc::clone(&l.handler)))
            })
            .collect();

        for (id, handler) in handlers {
            // Earlier handlers may have removed this one
            if !self.listeners.contains_key(&id) {
                continue;
            }
            handler(self, &event);
        }

        if event.kind.ends_press() {
            if let Some(owner) = self.captures.remove(&event.pointer_id) {
                self.queue_lost_capture(owner, event.pointer_id);
            }
            self.last_positions.remove(&event.pointer_id);
        }
    }

    fn alloc_element_id(&mut self) -> ElementId {
        let id = ElementId(self.next_element_id);
        self.next_element_id += 1;
        id
    }

    fn collect_subtree(&self, id: ElementId, out: &mut Vec<ElementId>) {
        let Some(element) = self.elements.get(&id) else {
            return;
        };
        out.push(id);
        for child in &element.children {
            self.collect_subtree(*child, out);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Size::new(1024.0, 768.0))
    }
}

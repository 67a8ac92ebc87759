use std::fmt;
use std::sync::Arc;

/// Maximum number of live subscriptions the bus can hold.
///
/// The registry is a fixed-capacity, insertion-ordered array: registration
/// beyond this limit is silently dropped. Capacity is deliberately small so
/// that registration, removal and dispatch stay allocation-free linear scans.
pub const MAX_SUBSCRIPTIONS: usize = 32;

/// Discriminator for the event variants, readable without interpreting the
/// rest of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Keyboard,
    Mouse,
    Window,
}

/// Whether a key transitioned up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A discrete input or window-state occurrence.
///
/// Every variant carries a `timestamp` in monotonic milliseconds since engine
/// start; the counter wraps at `u32::MAX`, which is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key changed state. `keycode` is the platform-raw scancode.
    Keyboard {
        timestamp: u32,
        keycode: i32,
        state: KeyState,
    },
    /// A mouse button was pressed at window-relative coordinates.
    Mouse {
        timestamp: u32,
        x: i32,
        y: i32,
        button: MouseButton,
    },
    /// The window client area changed size.
    Window {
        timestamp: u32,
        width: i32,
        height: i32,
    },
}

impl Event {
    /// Returns the dispatch discriminator for this event.
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Keyboard { .. } => EventKind::Keyboard,
            Event::Mouse { .. } => EventKind::Mouse,
            Event::Window { .. } => EventKind::Window,
        }
    }

    /// Returns the event timestamp in milliseconds since engine start.
    #[inline]
    pub fn timestamp(&self) -> u32 {
        match self {
            Event::Keyboard { timestamp, .. }
            | Event::Mouse { timestamp, .. }
            | Event::Window { timestamp, .. } => *timestamp,
        }
    }
}

/// A consumer of dispatched events.
///
/// Handlers are registered against one [`EventKind`] and invoked, in
/// registration order, for every dispatched event of that kind. The bus holds
/// a shared reference to the handler but never owns it; dropping the bus (or
/// shutting it down) leaves the handler alive.
pub trait EventHandler {
    fn handle(&self, event: &Event);
}

/// A registered `(kind, handler)` pairing.
struct Subscription {
    kind: EventKind,
    handler: Arc<dyn EventHandler>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("handler", &Arc::as_ptr(&self.handler))
            .finish()
    }
}

/// Handler identity is the allocation the `Arc` points at, independent of the
/// vtable the fat pointer happens to carry.
fn same_handler(a: &Arc<dyn EventHandler>, b: &Arc<dyn EventHandler>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const u8, Arc::as_ptr(b) as *const u8)
}

/// Typed publish/subscribe registry decoupling event producers (the platform
/// input layer) from consumers (application logic).
///
/// Storage is a fixed-capacity, insertion-ordered array with an explicit live
/// count; all operations are O(n) linear scans over at most
/// [`MAX_SUBSCRIPTIONS`] entries. The bus is single-threaded: registration,
/// dispatch and shutdown must all happen on the driving thread. Handlers must
/// not mutate the bus during dispatch; the `&self`/`&mut self` split on the
/// operations enforces this statically in safe code.
pub struct EventBus {
    subscriptions: [Option<Subscription>; MAX_SUBSCRIPTIONS],
    count: usize,
    initialized: bool,
}

impl EventBus {
    /// Creates an empty, uninitialized bus. [`EventBus::init`] must be called
    /// before any registration or dispatch takes effect.
    pub fn new() -> Self {
        Self {
            subscriptions: std::array::from_fn(|_| None),
            count: 0,
            initialized: false,
        }
    }

    /// (Re)initializes the subscription storage.
    ///
    /// Initializing a bus that is already initialized is a programmer error:
    /// debug builds assert, release builds silently reset the registry.
    ///
    /// ## Returns
    /// `true` on success. A `false` return must be treated as fatal by the
    /// caller; the in-process registry itself cannot fail to come up.
    pub fn init(&mut self) -> bool {
        debug_assert!(
            !self.initialized,
            "EventBus::init called on an already-initialized bus"
        );
        self.clear();
        self.initialized = true;
        log::info!("Event system initialized ({MAX_SUBSCRIPTIONS} subscription slots).");
        true
    }

    /// Clears all subscriptions and marks the bus uninitialized.
    ///
    /// Idempotent: shutting down a bus that was never initialized (or was
    /// already shut down) is a no-op.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.clear();
        self.initialized = false;
        log::info!("Event system shut down.");
    }

    /// Adds a subscription for `kind`.
    ///
    /// Fire-and-forget: registering on an uninitialized bus, registering a
    /// `(kind, handler)` pair that is already present, or registering beyond
    /// capacity are all silent no-ops. Callers that need certainty must track
    /// registration success externally.
    pub fn register_callback(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        if !self.initialized {
            return;
        }
        if self.position(kind, &handler).is_some() {
            log::trace!("Handler already registered for {kind:?}, ignoring.");
            return;
        }
        if self.count >= MAX_SUBSCRIPTIONS {
            log::trace!("Subscription registry full, dropping registration for {kind:?}.");
            return;
        }
        self.subscriptions[self.count] = Some(Subscription { kind, handler });
        self.count += 1;
    }

    /// Removes the first subscription matching `(kind, handler)`.
    ///
    /// Removal compacts the remaining entries left, preserving their relative
    /// order. Unregistering an absent pair, or unregistering on an
    /// uninitialized bus, is a silent no-op.
    pub fn unregister_callback(&mut self, kind: EventKind, handler: &Arc<dyn EventHandler>) {
        if !self.initialized {
            return;
        }
        let Some(index) = self.position(kind, handler) else {
            return;
        };
        for slot in index..self.count - 1 {
            self.subscriptions[slot] = self.subscriptions[slot + 1].take();
        }
        self.subscriptions[self.count - 1] = None;
        self.count -= 1;
    }

    /// Fans `event` out to every handler subscribed to its kind, in
    /// registration order. No-op when the bus is uninitialized.
    pub fn dispatch(&self, event: &Event) {
        if !self.initialized {
            return;
        }
        let kind = event.kind();
        for subscription in self.subscriptions[..self.count].iter().flatten() {
            if subscription.kind == kind {
                subscription.handler.handle(event);
            }
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn position(&self, kind: EventKind, handler: &Arc<dyn EventHandler>) -> Option<usize> {
        self.subscriptions[..self.count]
            .iter()
            .flatten()
            .position(|s| s.kind == kind && same_handler(&s.handler, handler))
    }

    fn clear(&mut self) {
        for slot in self.subscriptions.iter_mut() {
            *slot = None;
        }
        self.count = 0;
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("count", &self.count)
            .field("initialized", &self.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every event it observes, for asserting on fan-out behavior.
    struct Recorder {
        seen: Mutex<Vec<Event>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<Event> {
            self.seen.lock().expect("recorder lock poisoned").clone()
        }
    }

    impl EventHandler for Recorder {
        fn handle(&self, event: &Event) {
            self.seen.lock().expect("recorder lock poisoned").push(*event);
        }
    }

    fn as_handler(recorder: &Arc<Recorder>) -> Arc<dyn EventHandler> {
        recorder.clone()
    }

    fn initialized_bus() -> EventBus {
        let mut bus = EventBus::new();
        assert!(bus.init(), "Init should succeed");
        bus
    }

    fn key_event(keycode: i32) -> Event {
        Event::Keyboard {
            timestamp: 7,
            keycode,
            state: KeyState::Down,
        }
    }

    #[test]
    fn kind_is_readable_without_payload_knowledge() {
        let events = [
            key_event(3),
            Event::Mouse {
                timestamp: 1,
                x: 10,
                y: 20,
                button: MouseButton::Left,
            },
            Event::Window {
                timestamp: 2,
                width: 800,
                height: 600,
            },
        ];
        let kinds: Vec<EventKind> = events.iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Keyboard, EventKind::Mouse, EventKind::Window]
        );
        assert_eq!(events[1].timestamp(), 1);
    }

    #[test]
    fn register_is_a_no_op_before_init() {
        let mut bus = EventBus::new();
        let recorder = Recorder::new();
        bus.register_callback(EventKind::Keyboard, as_handler(&recorder));
        assert!(bus.is_empty());
        bus.dispatch(&key_event(1));
        assert!(recorder.seen().is_empty());
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut bus = initialized_bus();
        let recorder = Recorder::new();
        for _ in 0..5 {
            bus.register_callback(EventKind::Keyboard, as_handler(&recorder));
        }
        assert_eq!(bus.len(), 1);

        bus.dispatch(&key_event(9));
        assert_eq!(recorder.seen().len(), 1, "fan-out must hit the handler once");
    }

    #[test]
    fn same_handler_may_subscribe_to_distinct_kinds() {
        let mut bus = initialized_bus();
        let recorder = Recorder::new();
        bus.register_callback(EventKind::Keyboard, as_handler(&recorder));
        bus.register_callback(EventKind::Window, as_handler(&recorder));
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn capacity_ceiling_drops_excess_registrations() {
        let mut bus = initialized_bus();
        let recorders: Vec<Arc<Recorder>> =
            (0..MAX_SUBSCRIPTIONS + 3).map(|_| Recorder::new()).collect();
        for recorder in &recorders {
            bus.register_callback(EventKind::Mouse, as_handler(recorder));
        }
        assert_eq!(bus.len(), MAX_SUBSCRIPTIONS);

        let click = Event::Mouse {
            timestamp: 0,
            x: 1,
            y: 2,
            button: MouseButton::Middle,
        };
        bus.dispatch(&click);
        for recorder in recorders.iter().take(MAX_SUBSCRIPTIONS) {
            assert_eq!(recorder.seen(), vec![click]);
        }
        for recorder in recorders.iter().skip(MAX_SUBSCRIPTIONS) {
            assert!(recorder.seen().is_empty(), "overflow handlers must stay out");
        }
    }

    /// Appends its tag to a shared journal, so invocation order is visible.
    struct Tagged {
        tag: &'static str,
        journal: Arc<Mutex<Vec<&'static str>>>,
    }

    impl EventHandler for Tagged {
        fn handle(&self, _event: &Event) {
            self.journal
                .lock()
                .expect("journal lock poisoned")
                .push(self.tag);
        }
    }

    fn tagged(tag: &'static str, journal: &Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn EventHandler> {
        Arc::new(Tagged {
            tag,
            journal: journal.clone(),
        })
    }

    #[test]
    fn removal_preserves_order_of_remaining_subscriptions() {
        let mut bus = initialized_bus();
        let journal = Arc::new(Mutex::new(Vec::new()));
        let a = tagged("a", &journal);
        let b = tagged("b", &journal);
        let c = tagged("c", &journal);
        bus.register_callback(EventKind::Keyboard, a.clone());
        bus.register_callback(EventKind::Keyboard, b.clone());
        bus.register_callback(EventKind::Keyboard, c.clone());

        bus.unregister_callback(EventKind::Keyboard, &b);
        assert_eq!(bus.len(), 2);

        bus.dispatch(&key_event(5));
        assert_eq!(*journal.lock().expect("journal lock poisoned"), vec!["a", "c"]);
    }

    #[test]
    fn dispatch_runs_handlers_in_registration_order() {
        let mut bus = initialized_bus();
        let journal = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            bus.register_callback(EventKind::Window, tagged(tag, &journal));
        }

        bus.dispatch(&Event::Window {
            timestamp: 0,
            width: 100,
            height: 100,
        });
        assert_eq!(
            *journal.lock().expect("journal lock poisoned"),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn unregister_of_absent_pair_is_ignored() {
        let mut bus = initialized_bus();
        let registered = Recorder::new();
        let stranger = Recorder::new();
        bus.register_callback(EventKind::Window, as_handler(&registered));

        bus.unregister_callback(EventKind::Window, &as_handler(&stranger));
        // Same handler, wrong kind: also absent.
        bus.unregister_callback(EventKind::Keyboard, &as_handler(&registered));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn dispatch_reaches_only_matching_kind() {
        let mut bus = initialized_bus();
        let keyboard = Recorder::new();
        let mouse = Recorder::new();
        let window = Recorder::new();
        bus.register_callback(EventKind::Keyboard, as_handler(&keyboard));
        bus.register_callback(EventKind::Mouse, as_handler(&mouse));
        bus.register_callback(EventKind::Window, as_handler(&window));

        let resize = Event::Window {
            timestamp: 3,
            width: 640,
            height: 480,
        };
        bus.dispatch(&resize);

        assert!(keyboard.seen().is_empty());
        assert!(mouse.seen().is_empty());
        assert_eq!(window.seen(), vec![resize]);
    }

    #[test]
    fn keyboard_subscription_round_trip() {
        let mut bus = initialized_bus();
        let recorder = Recorder::new();
        bus.register_callback(EventKind::Keyboard, as_handler(&recorder));

        let pressed = Event::Keyboard {
            timestamp: 120,
            keycode: 41,
            state: KeyState::Down,
        };
        bus.dispatch(&pressed);
        assert_eq!(recorder.seen(), vec![pressed]);

        bus.unregister_callback(EventKind::Keyboard, &as_handler(&recorder));
        bus.dispatch(&pressed);
        assert_eq!(recorder.seen().len(), 1, "unregistered handler must not fire");
    }

    #[test]
    fn window_fan_out_hits_every_subscriber_once_in_order() {
        let mut bus = initialized_bus();
        let first = Recorder::new();
        let second = Recorder::new();
        bus.register_callback(EventKind::Window, as_handler(&first));
        bus.register_callback(EventKind::Window, as_handler(&second));

        let resize = Event::Window {
            timestamp: 88,
            width: 1920,
            height: 1044,
        };
        bus.dispatch(&resize);

        assert_eq!(first.seen(), vec![resize]);
        assert_eq!(second.seen(), vec![resize]);
    }

    #[test]
    fn shutdown_clears_and_is_idempotent() {
        let mut bus = initialized_bus();
        let recorder = Recorder::new();
        bus.register_callback(EventKind::Mouse, as_handler(&recorder));
        assert_eq!(bus.len(), 1);

        bus.shutdown();
        assert!(!bus.is_initialized());
        assert!(bus.is_empty());

        // Shutting down again (and shutting down a fresh bus) must not fail.
        bus.shutdown();
        EventBus::new().shutdown();
        assert!(!bus.is_initialized());

        bus.dispatch(&key_event(2));
        assert!(recorder.seen().is_empty());
    }

    #[test]
    fn init_after_shutdown_starts_from_empty_storage() {
        let mut bus = initialized_bus();
        let recorder = Recorder::new();
        bus.register_callback(EventKind::Keyboard, as_handler(&recorder));
        bus.shutdown();

        assert!(bus.init());
        assert!(bus.is_empty(), "init must clear storage");
        bus.dispatch(&key_event(4));
        assert!(recorder.seen().is_empty());
    }
}

#![forbid(unsafe_code)]

//! Overlay lifecycle coordinator.
//!
//! An [`Overlay`] owns the open/closed state of one floating panel (menu,
//! dropdown, picker) and everything that must happen around it: evicting
//! whichever overlay was open before, placing the panel through the
//! [`PositionSolver`], attaching dismissal and re-solve listeners, moving
//! focus in and back out, and locking page scroll for modal panels. On
//! narrow viewports the panel becomes a [`DrawerController`] bottom sheet.
//!
//! # State Machine
//!
//! ```text
//!   Closed ──open──▶ Open ──close / outside / Escape / evicted / stale──▶ Closed
//!                     │
//!                     └─drawer dismissed──▶ Closing ──slide-out done──▶ Closed
//! ```
//!
//! `Closing` only exists for the drawer variant, which animates out after a
//! user dismissal. Listeners are detached on entering `Closing`; every
//! other effect (focus return, scroll restore, registry release) happens on
//! reaching `Closed`. Forced closes (eviction, explicit, unmount) skip the
//! animation.
//!
//! # Invariants
//!
//! 1. At most one overlay per registry is not `Closed`.
//! 2. An evicted overlay has detached its listeners before the new one
//!    attaches any.
//! 3. A `Closed` overlay holds no listeners, no scroll lock and no pending
//!    timers; late events and ticks are no-ops.
//! 4. Re-solving with unchanged inputs produces no `Placed` notice.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Anchor gone | Trigger removed while open | Close with `StaleAnchor` |
//! | Bad size | Negative or non-finite estimate/measurement | Reject open, or close with `PreconditionViolation` |
//! | Panel larger than viewport | Severe constraint | Solver clamps; content clips |
//! | Dropped while open | Caller forgot `unmount` | Registry slot freed on drop |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use flyout_core::event::{Event, KeyEvent, PointerEvent, PointerKind};
use flyout_core::geometry::{AnchorRect, Size};
use flyout_core::scroll_lock::ScrollLock;
use flyout_core::timer::PhaseTimer;
use flyout_layout::{Placement, PositionSolver, PreferredSide, SolveInput};
use flyout_widgets::{DrawerConfigError, DrawerController, DrawerEvent, DrawerPhase, DrawerState};

use crate::config::OverlayConfig;
use crate::focus::FocusScope;
use crate::host::{AnchorRef, ElementId, Host, Listeners, OverlayId};
use crate::registry::ActiveOverlayRegistry;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// What a call site asks for when opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenRequest {
    pub anchor: AnchorRef,
    /// Size guess used until the panel is measured.
    pub estimate: Size,
    pub preferred_side: PreferredSide,
}

impl OpenRequest {
    /// Open against `anchor` with a size estimate and start alignment.
    #[must_use]
    pub fn new(anchor: impl Into<AnchorRef>, estimate: Size) -> Self {
        Self {
            anchor: anchor.into(),
            estimate,
            preferred_side: PreferredSide::default(),
        }
    }

    /// Set the horizontal alignment preference.
    #[must_use]
    pub fn with_preferred_side(mut self, side: PreferredSide) -> Self {
        self.preferred_side = side;
        self
    }
}

/// Lifecycle state of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
    /// Drawer sliding out after a user dismissal.
    Closing,
}

/// Why an overlay closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The call site called `close`.
    Explicit,
    /// Pointer down outside trigger and panel (or on the drawer backdrop).
    OutsidePointer,
    /// Escape key.
    Escape,
    /// Another overlay in the same registry opened.
    Evicted,
    /// The trigger disappeared while open.
    StaleAnchor,
    /// The caller supplied an unusable size.
    PreconditionViolation,
    /// The pointer left trigger and panel for longer than the hover delay.
    HoverLeave,
    /// The drawer was dragged below its close threshold.
    DrawerDismissed,
    /// The owning component went away.
    Unmounted,
}

impl CloseReason {
    /// Closed by a user gesture (as opposed to the program).
    #[must_use]
    pub const fn is_dismissal(self) -> bool {
        matches!(
            self,
            Self::OutsidePointer | Self::Escape | Self::HoverLeave | Self::DrawerDismissed
        )
    }

    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::OutsidePointer => "outside_pointer",
            Self::Escape => "escape",
            Self::Evicted => "evicted",
            Self::StaleAnchor => "stale_anchor",
            Self::PreconditionViolation => "precondition_violation",
            Self::HoverLeave => "hover_leave",
            Self::DrawerDismissed => "drawer_dismissed",
            Self::Unmounted => "unmounted",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound notification for the renderer / call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayNotice {
    /// The overlay opened (floating or drawer).
    Opened,
    /// The floating panel has a new placement.
    Placed(Placement),
    /// The drawer changed phase or height.
    Drawer(DrawerEvent),
    /// The overlay is fully closed.
    Closed(CloseReason),
}

/// Errors from [`Overlay`] operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayError {
    /// Size estimate negative or non-finite.
    InvalidEstimate(Size),
    /// The anchor element could not be found.
    StaleAnchor(ElementId),
    /// The operation needs an open overlay.
    NotOpen,
    /// The drawer configuration contradicts itself.
    InvalidConfig(DrawerConfigError),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEstimate(size) => write!(
                f,
                "size estimate must be finite and non-negative (got {}x{})",
                size.width, size.height
            ),
            Self::StaleAnchor(id) => write!(f, "anchor element {} is not on the page", id.0),
            Self::NotOpen => write!(f, "overlay is not open"),
            Self::InvalidConfig(err) => write!(f, "invalid overlay config: {err}"),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DrawerConfigError> for OverlayError {
    fn from(err: DrawerConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Floating {
    input: SolveInput,
    placement: Placement,
    measured: Option<Size>,
    scroll_lock: ScrollLock,
    hover: PhaseTimer<()>,
}

impl Floating {
    fn panel_size(&self) -> Size {
        self.measured.unwrap_or(self.input.estimate)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let panel = self.placement.panel_rect(&self.input.viewport, self.panel_size());
        self.input.anchor.to_rect().contains(x, y) || panel.contains(x, y)
    }
}

#[derive(Debug, Clone)]
enum Surface {
    Floating(Floating),
    Drawer(DrawerController),
}

#[derive(Debug, Clone)]
struct Session {
    request: OpenRequest,
    listeners: Listeners,
    focus: FocusScope,
    surface: Surface,
    /// Set while a dismissed drawer slides out.
    pending_close: Option<CloseReason>,
}

#[derive(Debug)]
struct OverlayInner {
    config: OverlayConfig,
    solver: PositionSolver,
    /// Closed drawer built from the validated config; cloned per open.
    drawer: DrawerController,
    state: OverlayState,
    session: Option<Session>,
}

type OpenedHook = Box<dyn FnMut(OverlayId)>;
type ClosedHook = Box<dyn FnMut(OverlayId, CloseReason)>;

#[derive(Default)]
struct Hooks {
    on_opened: Option<OpenedHook>,
    on_closed: Option<ClosedHook>,
    on_dismiss: Option<ClosedHook>,
}

/// Shared half of an [`Overlay`], reachable from the registry for eviction.
pub(crate) struct Shared {
    id: OverlayId,
    registry: Rc<ActiveOverlayRegistry>,
    inner: RefCell<OverlayInner>,
    hooks: RefCell<Hooks>,
}

/// What an event handler decided while the state was borrowed.
#[derive(Default)]
struct Step {
    notices: Vec<OverlayNotice>,
    close: Option<CloseReason>,
}

impl Step {
    fn notices(notices: Vec<OverlayNotice>) -> Self {
        Self {
            notices,
            close: None,
        }
    }

    fn close(reason: CloseReason) -> Self {
        Self {
            notices: Vec::new(),
            close: Some(reason),
        }
    }
}

impl Shared {
    fn resolve_anchor(host: &dyn Host, anchor: &AnchorRef) -> Option<AnchorRect> {
        match anchor {
            AnchorRef::Element(id) => host.anchor_rect(*id),
            AnchorRef::Fixed(rect) => Some(*rect),
        }
    }

    /// Every path to `Closed` ends here.
    fn finish(&self, host: &mut dyn Host, reason: CloseReason) -> Vec<OverlayNotice> {
        match self.teardown(host, reason) {
            Some((reason, notices)) => {
                self.fire_close_hooks(reason);
                notices
            }
            None => Vec::new(),
        }
    }

    /// Close the session without running hooks.
    ///
    /// A drawer already sliding out keeps the reason it was dismissed with,
    /// so the returned reason may differ from `reason`.
    fn teardown(
        &self,
        host: &mut dyn Host,
        reason: CloseReason,
    ) -> Option<(CloseReason, Vec<OverlayNotice>)> {
        let (reason, mut notices) = {
            let mut inner = self.inner.borrow_mut();
            let session = inner.session.take()?;
            let reason = session.pending_close.unwrap_or(reason);
            inner.state = OverlayState::Closed;

            if !session.listeners.is_empty() {
                host.detach(self.id, session.listeners);
            }
            let mut notices = Vec::new();
            match session.surface {
                Surface::Floating(mut floating) => {
                    floating.scroll_lock.release(host);
                }
                Surface::Drawer(mut drawer) => {
                    notices.extend(
                        drawer
                            .close_now(host)
                            .into_iter()
                            .map(OverlayNotice::Drawer),
                    );
                }
            }
            session.focus.restore(host);
            (reason, notices)
        };
        self.registry.release(self.id);
        tracing::debug!(
            overlay_id = self.id.get(),
            reason = reason.as_str(),
            "overlay closed"
        );
        notices.push(OverlayNotice::Closed(reason));
        Some((reason, notices))
    }

    fn fire_close_hooks(&self, reason: CloseReason) {
        if reason.is_dismissal() {
            self.fire_dismiss(reason);
        }
        self.fire_closed(reason);
    }

    fn fire_opened(&self) {
        let hook = self.hooks.borrow_mut().on_opened.take();
        if let Some(mut hook) = hook {
            hook(self.id);
            let mut hooks = self.hooks.borrow_mut();
            if hooks.on_opened.is_none() {
                hooks.on_opened = Some(hook);
            }
        }
    }

    fn fire_closed(&self, reason: CloseReason) {
        let hook = self.hooks.borrow_mut().on_closed.take();
        if let Some(mut hook) = hook {
            hook(self.id, reason);
            let mut hooks = self.hooks.borrow_mut();
            if hooks.on_closed.is_none() {
                hooks.on_closed = Some(hook);
            }
        }
    }

    fn fire_dismiss(&self, reason: CloseReason) {
        let hook = self.hooks.borrow_mut().on_dismiss.take();
        if let Some(mut hook) = hook {
            hook(self.id, reason);
            let mut hooks = self.hooks.borrow_mut();
            if hooks.on_dismiss.is_none() {
                hooks.on_dismiss = Some(hook);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// Lifecycle coordinator for one overlay instance.
///
/// Methods take `&self`: opening one overlay must be able to close another
/// through the shared registry.
pub struct Overlay {
    shared: Rc<Shared>,
}

impl Overlay {
    /// Create a closed overlay in `registry`.
    ///
    /// Fails when the drawer configuration does not validate; no id is
    /// allocated in that case.
    pub fn new(
        registry: &Rc<ActiveOverlayRegistry>,
        config: OverlayConfig,
    ) -> Result<Self, OverlayError> {
        let drawer = DrawerController::new(config.drawer, 0.0)?;
        let shared = Shared {
            id: registry.allocate(),
            registry: Rc::clone(registry),
            inner: RefCell::new(OverlayInner {
                config,
                solver: PositionSolver::new(config.solver),
                drawer,
                state: OverlayState::Closed,
                session: None,
            }),
            hooks: RefCell::new(Hooks::default()),
        };
        Ok(Self {
            shared: Rc::new(shared),
        })
    }

    /// Registry-assigned id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.shared.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.shared.inner.borrow().state
    }

    /// Open or sliding out.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() != OverlayState::Closed
    }

    /// The configuration this overlay was created with.
    #[must_use]
    pub fn config(&self) -> OverlayConfig {
        self.shared.inner.borrow().config
    }

    /// Current floating placement (`None` when closed or in drawer mode).
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        match &self.shared.inner.borrow().session.as_ref()?.surface {
            Surface::Floating(floating) => Some(floating.placement),
            Surface::Drawer(_) => None,
        }
    }

    /// Current drawer state (`None` when closed or floating).
    #[must_use]
    pub fn drawer(&self) -> Option<DrawerState> {
        match &self.shared.inner.borrow().session.as_ref()?.surface {
            Surface::Drawer(drawer) => Some(*drawer.state()),
            Surface::Floating(_) => None,
        }
    }

    /// Listeners currently held.
    #[must_use]
    pub fn listeners(&self) -> Listeners {
        self.shared
            .inner
            .borrow()
            .session
            .as_ref()
            .map_or(Listeners::empty(), |s| s.listeners)
    }

    /// Number of listeners currently held.
    #[must_use]
    pub fn listener_count(&self) -> u32 {
        self.listeners().count()
    }

    /// When the host should deliver the next [`Event::Tick`], if anything
    /// is pending (hover close, drawer phase change).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let inner = self.shared.inner.borrow();
        match &inner.session.as_ref()?.surface {
            Surface::Floating(floating) => floating.hover.deadline(),
            Surface::Drawer(drawer) => drawer.next_deadline(),
        }
    }

    /// Called after every successful open.
    pub fn on_opened(&self, hook: impl FnMut(OverlayId) + 'static) {
        self.shared.hooks.borrow_mut().on_opened = Some(Box::new(hook));
    }

    /// Called on every close, whatever the reason.
    pub fn on_closed(&self, hook: impl FnMut(OverlayId, CloseReason) + 'static) {
        self.shared.hooks.borrow_mut().on_closed = Some(Box::new(hook));
    }

    /// Called before `on_closed` when the user dismissed the overlay.
    pub fn on_dismiss(&self, hook: impl FnMut(OverlayId, CloseReason) + 'static) {
        self.shared.hooks.borrow_mut().on_dismiss = Some(Box::new(hook));
    }

    /// Open the overlay, closing whichever overlay held the registry slot.
    ///
    /// Opening an already open overlay re-targets it: the request is
    /// replaced and the panel re-placed without another eviction.
    pub fn open(
        &self,
        host: &mut dyn Host,
        request: OpenRequest,
        now: Instant,
    ) -> Result<Vec<OverlayNotice>, OverlayError> {
        let id = self.id();
        let _span = tracing::debug_span!("overlay_open", overlay_id = id.get()).entered();

        if !request.estimate.is_valid() {
            tracing::warn!(
                overlay_id = id.get(),
                width = request.estimate.width,
                height = request.estimate.height,
                "rejected invalid size estimate"
            );
            self.shared.finish(host, CloseReason::PreconditionViolation);
            return Err(OverlayError::InvalidEstimate(request.estimate));
        }
        let anchor = match request.anchor {
            AnchorRef::Fixed(rect) => rect,
            AnchorRef::Element(element) => match host.anchor_rect(element) {
                Some(rect) => rect,
                None => {
                    tracing::debug!(overlay_id = id.get(), element = element.0, "anchor not found");
                    self.shared.finish(host, CloseReason::StaleAnchor);
                    return Err(OverlayError::StaleAnchor(element));
                }
            },
        };

        match self.state() {
            OverlayState::Open => return Ok(self.retarget(host, request, anchor)),
            OverlayState::Closing => {
                self.shared.finish(host, CloseReason::Explicit);
            }
            OverlayState::Closed => {}
        }

        // The evicted overlay's hooks run only once this session is in
        // place, so a hook that re-opens it evicts this one in turn.
        let evicted = self.shared.registry.displace(id).and_then(|previous| {
            tracing::debug!(
                overlay_id = id.get(),
                evicted = previous.id.get(),
                "evicting active overlay"
            );
            let (reason, _) = previous.teardown(host, CloseReason::Evicted)?;
            Some((previous, reason))
        });
        self.shared.registry.claim(id, Rc::downgrade(&self.shared));

        let mut notices = vec![OverlayNotice::Opened];
        {
            let mut inner = self.shared.inner.borrow_mut();
            let config = inner.config;
            let viewport = host.viewport();

            let mut listeners = Listeners::RESIZE;
            if config.close_on_escape {
                listeners |= Listeners::ESCAPE_KEY;
            }
            if config.close_on_outside {
                listeners |= Listeners::OUTSIDE_POINTER;
            }
            if config.traps_focus() {
                listeners |= Listeners::FOCUS_TRAP;
            }

            let surface = if config.is_narrow(viewport.width) {
                listeners |= Listeners::DRAWER_GESTURE;
                let mut drawer = inner.drawer.clone();
                drawer.set_viewport_height(viewport.height);
                notices.extend(drawer.open(now, host).into_iter().map(OverlayNotice::Drawer));
                Surface::Drawer(drawer)
            } else {
                listeners |= Listeners::SCROLL_CAPTURE;
                if config.hover_close_delay.is_some() {
                    listeners |= Listeners::HOVER_INTENT;
                }
                let mut scroll_lock = ScrollLock::new();
                if config.modal {
                    scroll_lock.engage(host);
                }
                let input = inner
                    .solver
                    .input(anchor, viewport, request.estimate)
                    .with_preferred_side(request.preferred_side);
                let placement = inner.solver.solve(&input);
                notices.push(OverlayNotice::Placed(placement));
                Surface::Floating(Floating {
                    input,
                    placement,
                    measured: None,
                    scroll_lock,
                    hover: PhaseTimer::new(),
                })
            };

            host.attach(id, listeners);
            let focus = FocusScope::enter(host, id, config.traps_focus());

            tracing::debug!(
                overlay_id = id.get(),
                drawer = matches!(surface, Surface::Drawer(_)),
                listeners = listeners.count(),
                "overlay opened"
            );
            inner.session = Some(Session {
                request,
                listeners,
                focus,
                surface,
                pending_close: None,
            });
            inner.state = OverlayState::Open;
        }
        if let Some((previous, reason)) = evicted {
            previous.fire_close_hooks(reason);
        }
        if self.is_open() {
            self.shared.fire_opened();
        }
        Ok(notices)
    }

    fn retarget(
        &self,
        host: &mut dyn Host,
        request: OpenRequest,
        anchor: AnchorRect,
    ) -> Vec<OverlayNotice> {
        let mut inner = self.shared.inner.borrow_mut();
        let OverlayInner {
            solver, session, ..
        } = &mut *inner;
        let Some(session) = session.as_mut() else {
            return Vec::new();
        };
        session.request = request;
        match &mut session.surface {
            Surface::Floating(floating) => {
                floating.measured = None;
                floating.input = solver
                    .input(anchor, host.viewport(), request.estimate)
                    .with_preferred_side(request.preferred_side);
                floating.placement = solver.solve(&floating.input);
                vec![OverlayNotice::Placed(floating.placement)]
            }
            Surface::Drawer(_) => Vec::new(),
        }
    }

    /// Close now, skipping any slide-out.
    pub fn close(&self, host: &mut dyn Host) -> Result<Vec<OverlayNotice>, OverlayError> {
        if self.state() == OverlayState::Closed {
            return Err(OverlayError::NotOpen);
        }
        Ok(self.shared.finish(host, CloseReason::Explicit))
    }

    /// Tear down on component unmount. A no-op when already closed.
    pub fn unmount(&self, host: &mut dyn Host) -> Vec<OverlayNotice> {
        self.shared.finish(host, CloseReason::Unmounted)
    }

    /// Feed one environment event. Everything the overlay reacts to after
    /// opening (dismissal, re-solve, measurement, focus cycling, drawer
    /// drags, timers) arrives here.
    pub fn dispatch(&self, host: &mut dyn Host, event: Event, now: Instant) -> Vec<OverlayNotice> {
        let step = {
            let mut inner = self.shared.inner.borrow_mut();
            let id = self.shared.id;
            let OverlayInner {
                solver,
                state,
                session,
                config,
                ..
            } = &mut *inner;
            let Some(session) = session.as_mut() else {
                return Vec::new();
            };
            match *state {
                OverlayState::Closed => return Vec::new(),
                OverlayState::Closing => Self::closing_step(host, session, event, now),
                OverlayState::Open => {
                    let mut step = Self::open_step(host, id, config, solver, session, event, now);
                    if step.close.is_none() {
                        if let Some(reason) = session.pending_close {
                            // The drawer was dismissed and is sliding out.
                            host.detach(id, session.listeners);
                            session.listeners = Listeners::empty();
                            *state = OverlayState::Closing;
                            tracing::debug!(
                                overlay_id = id.get(),
                                reason = reason.as_str(),
                                "drawer dismissed"
                            );
                            // A zero close duration finishes right away.
                            step.close = Self::drawer_settled(session);
                        }
                    }
                    step
                }
            }
        };

        let mut notices = step.notices;
        if let Some(reason) = step.close {
            notices.extend(self.shared.finish(host, reason));
        }
        notices
    }

    fn closing_step(
        host: &mut dyn Host,
        session: &mut Session,
        event: Event,
        now: Instant,
    ) -> Step {
        let Event::Tick = event else {
            return Step::default();
        };
        let Surface::Drawer(drawer) = &mut session.surface else {
            return Step::default();
        };
        let notices = drawer
            .tick(now, host)
            .into_iter()
            .map(OverlayNotice::Drawer)
            .collect();
        Step {
            notices,
            close: Self::drawer_settled(session),
        }
    }

    fn drawer_settled(session: &Session) -> Option<CloseReason> {
        match &session.surface {
            Surface::Drawer(drawer) if drawer.phase() == DrawerPhase::Closed => {
                session.pending_close
            }
            _ => None,
        }
    }

    fn open_step(
        host: &mut dyn Host,
        id: OverlayId,
        config: &OverlayConfig,
        solver: &PositionSolver,
        session: &mut Session,
        event: Event,
        now: Instant,
    ) -> Step {
        let listeners = session.listeners;
        match event {
            Event::Key(key) => Self::key_step(host, id, session, key, now),
            Event::Pointer(pointer) => Self::pointer_step(config, session, pointer, now),
            Event::Resize { .. } if listeners.contains(Listeners::RESIZE) => {
                if let Surface::Drawer(drawer) = &mut session.surface {
                    drawer.set_viewport_height(host.viewport().height);
                    return Step::default();
                }
                Self::resolve_step(host, solver, session)
            }
            Event::Scroll(_) if listeners.contains(Listeners::SCROLL_CAPTURE) => {
                Self::resolve_step(host, solver, session)
            }
            Event::Measured { width, height } => {
                let Surface::Floating(floating) = &mut session.surface else {
                    return Step::default();
                };
                let measured = Size::new(width, height);
                if !measured.is_valid() {
                    tracing::warn!(overlay_id = id.get(), width, height, "invalid measurement");
                    return Step::close(CloseReason::PreconditionViolation);
                }
                let refinement = solver.refine(&floating.input, &floating.placement, measured);
                floating.measured = Some(measured);
                floating.input = floating.input.with_estimate(measured);
                tracing::trace!(
                    overlay_id = id.get(),
                    corrected = refinement.corrected,
                    open_upward = refinement.placement.open_upward,
                    "placement refined"
                );
                if !refinement.corrected {
                    return Step::default();
                }
                floating.placement = refinement.placement;
                Step::notices(vec![OverlayNotice::Placed(refinement.placement)])
            }
            Event::Tick => match &mut session.surface {
                Surface::Floating(floating) => match floating.hover.poll(now) {
                    Some(()) => Step::close(CloseReason::HoverLeave),
                    None => Step::default(),
                },
                Surface::Drawer(drawer) => Step::notices(
                    drawer
                        .tick(now, host)
                        .into_iter()
                        .map(OverlayNotice::Drawer)
                        .collect(),
                ),
            },
            Event::Resize { .. } | Event::Scroll(_) => Step::default(),
        }
    }

    fn key_step(
        host: &mut dyn Host,
        id: OverlayId,
        session: &mut Session,
        key: KeyEvent,
        now: Instant,
    ) -> Step {
        let listeners = session.listeners;
        if key.is_cancel() && listeners.contains(Listeners::ESCAPE_KEY) {
            return match &mut session.surface {
                Surface::Floating(_) => Step::close(CloseReason::Escape),
                Surface::Drawer(drawer) => {
                    let events = drawer.handle_key(key, now);
                    Self::drawer_step(&mut session.pending_close, events, CloseReason::Escape)
                }
            };
        }
        if let Some(forward) = key.tab_direction() {
            if listeners.contains(Listeners::FOCUS_TRAP) {
                session.focus.cycle(host, id, forward);
            }
        }
        Step::default()
    }

    fn pointer_step(
        config: &OverlayConfig,
        session: &mut Session,
        pointer: PointerEvent,
        now: Instant,
    ) -> Step {
        let listeners = session.listeners;
        match &mut session.surface {
            Surface::Floating(floating) => {
                let inside = floating.contains(pointer.x, pointer.y);
                match pointer.kind {
                    PointerKind::Down
                        if !inside && listeners.contains(Listeners::OUTSIDE_POINTER) =>
                    {
                        Step::close(CloseReason::OutsidePointer)
                    }
                    PointerKind::Move if listeners.contains(Listeners::HOVER_INTENT) => {
                        if inside {
                            floating.hover.cancel();
                        } else if !floating.hover.is_pending() {
                            if let Some(delay) = config.hover_close_delay {
                                floating.hover.schedule(now, delay, ());
                            }
                        }
                        Step::default()
                    }
                    _ => Step::default(),
                }
            }
            Surface::Drawer(drawer) => {
                let on_backdrop = pointer.y < drawer.sheet_top();
                if pointer.kind == PointerKind::Down
                    && on_backdrop
                    && !drawer.is_dragging()
                    && listeners.contains(Listeners::OUTSIDE_POINTER)
                {
                    let events = drawer.backdrop_tap(now);
                    return Self::drawer_step(
                        &mut session.pending_close,
                        events,
                        CloseReason::OutsidePointer,
                    );
                }
                if !listeners.contains(Listeners::DRAWER_GESTURE) {
                    return Step::default();
                }
                let events = drawer.handle_pointer(pointer, now);
                Self::drawer_step(
                    &mut session.pending_close,
                    events,
                    CloseReason::DrawerDismissed,
                )
            }
        }
    }

    /// Wrap drawer events; a `Dismissed` marks the session as closing.
    fn drawer_step(
        pending: &mut Option<CloseReason>,
        events: Vec<DrawerEvent>,
        reason: CloseReason,
    ) -> Step {
        if events.contains(&DrawerEvent::Dismissed) {
            *pending = Some(reason);
        }
        Step::notices(events.into_iter().map(OverlayNotice::Drawer).collect())
    }

    fn resolve_step(host: &mut dyn Host, solver: &PositionSolver, session: &mut Session) -> Step {
        let Surface::Floating(floating) = &mut session.surface else {
            return Step::default();
        };
        let Some(anchor) = Shared::resolve_anchor(host, &session.request.anchor) else {
            return Step::close(CloseReason::StaleAnchor);
        };
        floating.input = solver
            .input(anchor, host.viewport(), floating.panel_size())
            .with_preferred_side(session.request.preferred_side);
        let placement = solver.solve(&floating.input);
        if placement == floating.placement {
            return Step::default();
        }
        floating.placement = placement;
        Step::notices(vec![OverlayNotice::Placed(placement)])
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        if self.shared.registry.release(self.shared.id) {
            tracing::debug!(overlay_id = self.shared.id.get(), "overlay dropped while open");
        }
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.id())
            .field("state", &self.state())
            .finish()
    }
}

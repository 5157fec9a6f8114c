#![forbid(unsafe_code)]

//! Drag-resizable bottom sheet.
//!
//! On narrow viewports a floating panel is replaced by a drawer docked to
//! the bottom edge. Its height is a percentage of the viewport height and
//! the user resizes it by dragging the handle.
//!
//! # Lifecycle
//!
//! `Closed → Opening → Open → Closing → Closed`. Opening and closing are
//! delayed phase transitions driven by a [`PhaseTimer`]; opening takes longer
//! than closing. An orthogonal `dragging` flag may only be set while `Open`.
//!
//! # Drag contract
//!
//! - `drag_start(y)` records the pointer origin and the current height.
//! - `drag_move(y)` sets `height = clamp(baseline + (origin - y) * 100 / vh)`
//!   immediately, with no transition (the sheet tracks the finger).
//! - `drag_end()` dismisses below the close threshold, otherwise snaps:
//!   below `snap_low` to `min_height`, above `snap_high` to `max_height`,
//!   and leaves the comfortable middle alone.
//!
//! # Invariants
//!
//! 1. Moves without a preceding `drag_start` are ignored.
//! 2. While dragging, the height stays in `[drag_floor, max_height]`.
//! 3. After a non-dismissing release the height is in `[min_height, max_height]`.
//! 4. Closing cancels any pending phase timer; a stale timer never fires.
//! 5. The page scroll lock is held from `open` until the sheet is fully closed.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Zero viewport height | Host not laid out yet | Drag moves ignored |
//! | Pointer cancel mid-drag | Platform aborted the touch | Height restored to baseline |
//! | Close during opening | User tapped the backdrop early | Opening timer cancelled |

use std::fmt;
use std::time::{Duration, Instant};

use flyout_core::env::{env_f32, env_millis};
use flyout_core::event::{KeyEvent, PointerEvent, PointerKind};
use flyout_core::geometry::clamp;
use flyout_core::scroll_lock::{PageScroll, ScrollLock};
use flyout_core::timer::PhaseTimer;

const ENV_MIN_HEIGHT: &str = "FLYOUT_DRAWER_MIN_HEIGHT";
const ENV_MAX_HEIGHT: &str = "FLYOUT_DRAWER_MAX_HEIGHT";
const ENV_CLOSE_THRESHOLD: &str = "FLYOUT_DRAWER_CLOSE_THRESHOLD";
const ENV_DEFAULT_HEIGHT: &str = "FLYOUT_DRAWER_DEFAULT_HEIGHT";
const ENV_SNAP_LOW: &str = "FLYOUT_DRAWER_SNAP_LOW";
const ENV_SNAP_HIGH: &str = "FLYOUT_DRAWER_SNAP_HIGH";
const ENV_DRAG_FLOOR: &str = "FLYOUT_DRAWER_DRAG_FLOOR";
const ENV_OPEN_MS: &str = "FLYOUT_DRAWER_OPEN_MS";
const ENV_CLOSE_MS: &str = "FLYOUT_DRAWER_CLOSE_MS";

// ---------------------------------------------------------------------------
// DrawerConfig
// ---------------------------------------------------------------------------

/// Drawer sizing and timing, all heights in percent of viewport height.
///
/// The snap and close thresholds are empirical UI constants; override them
/// freely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerConfig {
    /// Smallest resting height (default: 30).
    pub min_height: f32,
    /// Largest height (default: 100).
    pub max_height: f32,
    /// Releasing below this dismisses the drawer (default: 20).
    pub close_threshold: f32,
    /// Height on every fresh open (default: 70).
    pub default_height: f32,
    /// Releasing below this snaps to `min_height` (default: 40).
    pub snap_low: f32,
    /// Releasing above this snaps to `max_height` (default: 90).
    pub snap_high: f32,
    /// Lowest height reachable mid-drag (default: 0). Must sit below
    /// `close_threshold` for drag-to-dismiss to be possible.
    pub drag_floor: f32,
    /// Slide-in duration (default: 300ms).
    pub open_duration: Duration,
    /// Slide-out duration (default: 200ms). Shorter than opening.
    pub close_duration: Duration,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            min_height: 30.0,
            max_height: 100.0,
            close_threshold: 20.0,
            default_height: 70.0,
            snap_low: 40.0,
            snap_high: 90.0,
            drag_floor: 0.0,
            open_duration: Duration::from_millis(300),
            close_duration: Duration::from_millis(200),
        }
    }
}

impl DrawerConfig {
    /// Set the resting height bounds.
    #[must_use]
    pub fn with_bounds(mut self, min_height: f32, max_height: f32) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    /// Set the dismissal threshold.
    #[must_use]
    pub fn with_close_threshold(mut self, threshold: f32) -> Self {
        self.close_threshold = threshold;
        self
    }

    /// Set the height used on open.
    #[must_use]
    pub fn with_default_height(mut self, height: f32) -> Self {
        self.default_height = height;
        self
    }

    /// Set the snap thresholds.
    #[must_use]
    pub fn with_snap(mut self, low: f32, high: f32) -> Self {
        self.snap_low = low;
        self.snap_high = high;
        self
    }

    /// Set the lowest height reachable while dragging.
    #[must_use]
    pub fn with_drag_floor(mut self, floor: f32) -> Self {
        self.drag_floor = floor;
        self
    }

    /// Set the open/close transition durations.
    #[must_use]
    pub fn with_durations(mut self, open: Duration, close: Duration) -> Self {
        self.open_duration = open;
        self.close_duration = close;
        self
    }

    /// Defaults overridden by `FLYOUT_DRAWER_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom lookup (for tests).
    ///
    /// An override set that fails [`validate`](Self::validate) is discarded
    /// as a whole and the defaults are used instead.
    #[must_use]
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = env_f32(&get_env, ENV_MIN_HEIGHT) {
            config.min_height = v;
        }
        if let Some(v) = env_f32(&get_env, ENV_MAX_HEIGHT) {
            config.max_height = v;
        }
        if let Some(v) = env_f32(&get_env, ENV_CLOSE_THRESHOLD) {
            config.close_threshold = v;
        }
        if let Some(v) = env_f32(&get_env, ENV_DEFAULT_HEIGHT) {
            config.default_height = v;
        }
        if let Some(v) = env_f32(&get_env, ENV_SNAP_LOW) {
            config.snap_low = v;
        }
        if let Some(v) = env_f32(&get_env, ENV_SNAP_HIGH) {
            config.snap_high = v;
        }
        if let Some(v) = env_f32(&get_env, ENV_DRAG_FLOOR) {
            config.drag_floor = v;
        }
        if let Some(v) = env_millis(&get_env, ENV_OPEN_MS) {
            config.open_duration = v;
        }
        if let Some(v) = env_millis(&get_env, ENV_CLOSE_MS) {
            config.close_duration = v;
        }
        match config.validate() {
            Ok(()) => config,
            Err(err) => {
                flyout_core::warn!(error = %err, "ignoring FLYOUT_DRAWER_* overrides");
                Self::default()
            }
        }
    }

    /// Check the configuration for contradictions.
    pub fn validate(&self) -> Result<(), DrawerConfigError> {
        if self.min_height > self.max_height {
            return Err(DrawerConfigError::InvertedBounds {
                min: self.min_height,
                max: self.max_height,
            });
        }
        if self.default_height < self.min_height || self.default_height > self.max_height {
            return Err(DrawerConfigError::DefaultOutOfRange {
                default: self.default_height,
                min: self.min_height,
                max: self.max_height,
            });
        }
        if self.snap_low > self.snap_high {
            return Err(DrawerConfigError::InvertedSnap {
                low: self.snap_low,
                high: self.snap_high,
            });
        }
        if self.open_duration <= self.close_duration {
            return Err(DrawerConfigError::SymmetricTiming {
                open: self.open_duration,
                close: self.close_duration,
            });
        }
        Ok(())
    }
}

/// Rejected [`DrawerConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawerConfigError {
    /// `min_height > max_height`.
    InvertedBounds { min: f32, max: f32 },
    /// `default_height` outside `[min_height, max_height]`.
    DefaultOutOfRange { default: f32, min: f32, max: f32 },
    /// `snap_low > snap_high`.
    InvertedSnap { low: f32, high: f32 },
    /// Opening must take longer than closing.
    SymmetricTiming { open: Duration, close: Duration },
}

impl fmt::Display for DrawerConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedBounds { min, max } => {
                write!(f, "drawer min height {min}% exceeds max height {max}%")
            }
            Self::DefaultOutOfRange { default, min, max } => write!(
                f,
                "drawer default height {default}% outside [{min}%, {max}%]"
            ),
            Self::InvertedSnap { low, high } => {
                write!(f, "drawer snap-low {low}% exceeds snap-high {high}%")
            }
            Self::SymmetricTiming { open, close } => write!(
                f,
                "drawer open duration {open:?} must exceed close duration {close:?}"
            ),
        }
    }
}

impl std::error::Error for DrawerConfigError {}

// ---------------------------------------------------------------------------
// DrawerState
// ---------------------------------------------------------------------------

/// Drawer lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawerPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Where an active drag started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOrigin {
    /// Pointer Y at `drag_start`.
    pub pointer_y: f32,
    /// Height at `drag_start`.
    pub baseline: f32,
}

/// Observable drawer state. Reset to defaults whenever the drawer fully closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerState {
    pub height_fraction: f32,
    pub phase: DrawerPhase,
    pub dragging: bool,
    pub drag_origin: Option<DragOrigin>,
}

impl DrawerState {
    fn closed(config: &DrawerConfig) -> Self {
        Self {
            height_fraction: config.default_height,
            phase: DrawerPhase::Closed,
            dragging: false,
            drag_origin: None,
        }
    }
}

/// Something the renderer or coordinator should react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawerEvent {
    /// The lifecycle phase changed.
    PhaseChanged { from: DrawerPhase, to: DrawerPhase },
    /// The height changed (drag or snap).
    HeightChanged(f32),
    /// The user dismissed the drawer (drag past threshold, backdrop, Escape).
    Dismissed,
}

// ---------------------------------------------------------------------------
// DrawerController
// ---------------------------------------------------------------------------

/// State machine for one drawer instance.
#[derive(Debug, Clone)]
pub struct DrawerController {
    config: DrawerConfig,
    state: DrawerState,
    timer: PhaseTimer<DrawerPhase>,
    scroll_lock: ScrollLock,
    viewport_height: f32,
}

impl DrawerController {
    /// Create a closed drawer for a viewport of the given height.
    ///
    /// Fails when `config` does not pass [`DrawerConfig::validate`].
    pub fn new(config: DrawerConfig, viewport_height: f32) -> Result<Self, DrawerConfigError> {
        config.validate()?;
        Ok(Self {
            state: DrawerState::closed(&config),
            config,
            timer: PhaseTimer::new(),
            scroll_lock: ScrollLock::new(),
            viewport_height,
        })
    }

    /// Current state snapshot.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &DrawerState {
        &self.state
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> DrawerPhase {
        self.state.phase
    }

    /// Current height in percent of viewport height.
    #[inline]
    #[must_use]
    pub fn height_fraction(&self) -> f32 {
        self.state.height_fraction
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    /// Whether the page scroll lock is held.
    #[must_use]
    pub fn holds_scroll_lock(&self) -> bool {
        self.scroll_lock.is_engaged()
    }

    /// When the pending phase transition is due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Track viewport resizes; drag deltas are relative to this height.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    /// Height in pixels for the current viewport.
    #[must_use]
    pub fn height_px(&self) -> f32 {
        self.viewport_height * self.state.height_fraction / 100.0
    }

    /// Top edge of the sheet in viewport coordinates. Pointer downs above
    /// it land on the backdrop.
    #[must_use]
    pub fn sheet_top(&self) -> f32 {
        self.viewport_height - self.height_px()
    }

    /// Vertical translation of the sheet in percent of its own height:
    /// 100 when parked off-screen (closed or closing), 0 when on-screen.
    #[must_use]
    pub fn translate_percent(&self) -> f32 {
        match self.state.phase {
            DrawerPhase::Closed | DrawerPhase::Closing => 100.0,
            DrawerPhase::Opening | DrawerPhase::Open => 0.0,
        }
    }

    /// Duration the renderer should animate the current change over.
    ///
    /// `None` while dragging (the sheet must track the pointer with zero lag)
    /// and while settled.
    #[must_use]
    pub fn transition_duration(&self) -> Option<Duration> {
        if self.state.dragging {
            return None;
        }
        match self.state.phase {
            DrawerPhase::Opening => Some(self.config.open_duration),
            DrawerPhase::Closing => Some(self.config.close_duration),
            DrawerPhase::Open | DrawerPhase::Closed => None,
        }
    }

    /// Begin opening. Locks page scroll on a fresh open.
    pub fn open<P: PageScroll + ?Sized>(
        &mut self,
        now: Instant,
        page: &mut P,
    ) -> Vec<DrawerEvent> {
        let from = self.state.phase;
        match from {
            DrawerPhase::Opening | DrawerPhase::Open => return Vec::new(),
            DrawerPhase::Closed => {
                self.state = DrawerState::closed(&self.config);
                self.scroll_lock.engage(page);
            }
            // Re-opened mid-slide-out: keep the current height.
            DrawerPhase::Closing => {}
        }
        self.timer
            .schedule(now, self.config.open_duration, DrawerPhase::Open);
        self.set_phase(DrawerPhase::Opening)
    }

    /// Begin closing. Cancels any drag and any pending open transition.
    pub fn close(&mut self, now: Instant) -> Vec<DrawerEvent> {
        match self.state.phase {
            DrawerPhase::Closed | DrawerPhase::Closing => return Vec::new(),
            DrawerPhase::Opening | DrawerPhase::Open => {}
        }
        self.state.dragging = false;
        self.state.drag_origin = None;
        self.timer.cancel();
        self.timer
            .schedule(now, self.config.close_duration, DrawerPhase::Closed);
        self.set_phase(DrawerPhase::Closing)
    }

    /// Close immediately, skipping the slide-out (unmount, eviction).
    pub fn close_now<P: PageScroll + ?Sized>(&mut self, page: &mut P) -> Vec<DrawerEvent> {
        if self.state.phase == DrawerPhase::Closed {
            return Vec::new();
        }
        self.timer.cancel();
        self.finish_close(page)
    }

    /// Fire the pending phase transition if it is due.
    pub fn tick<P: PageScroll + ?Sized>(
        &mut self,
        now: Instant,
        page: &mut P,
    ) -> Vec<DrawerEvent> {
        match self.timer.poll(now) {
            Some(next) => self.apply_timer(next, page),
            None => Vec::new(),
        }
    }

    /// Record the drag origin. Ignored unless the drawer is open.
    pub fn drag_start(&mut self, pointer_y: f32) -> bool {
        if self.state.phase != DrawerPhase::Open || self.state.dragging {
            return false;
        }
        self.state.dragging = true;
        self.state.drag_origin = Some(DragOrigin {
            pointer_y,
            baseline: self.state.height_fraction,
        });
        flyout_core::trace!(
            pointer_y,
            baseline = self.state.height_fraction,
            "drawer drag start"
        );
        true
    }

    /// Track the pointer. Dragging up grows the drawer.
    pub fn drag_move(&mut self, pointer_y: f32) -> Option<DrawerEvent> {
        let origin = self.state.drag_origin.filter(|_| self.state.dragging)?;
        if !(self.viewport_height > 0.0) {
            return None;
        }
        let delta = (origin.pointer_y - pointer_y) * 100.0 / self.viewport_height;
        let floor = self.config.drag_floor.min(self.config.max_height);
        let height = clamp(origin.baseline + delta, floor, self.config.max_height);
        if height == self.state.height_fraction {
            return None;
        }
        self.state.height_fraction = height;
        Some(DrawerEvent::HeightChanged(height))
    }

    /// Release: dismiss below the close threshold, otherwise snap.
    pub fn drag_end(&mut self, now: Instant) -> Vec<DrawerEvent> {
        if !self.state.dragging {
            return Vec::new();
        }
        self.state.dragging = false;
        self.state.drag_origin = None;

        let height = self.state.height_fraction;
        if height < self.config.close_threshold {
            flyout_core::debug!(height_fraction = height, "drawer dragged past close threshold");
            let mut events = vec![DrawerEvent::Dismissed];
            events.extend(self.close(now));
            return events;
        }

        let snapped = clamp(self.snap(height), self.config.min_height, self.config.max_height);
        if snapped == height {
            return Vec::new();
        }
        self.state.height_fraction = snapped;
        flyout_core::trace!(from = height, to = snapped, "drawer snapped");
        vec![DrawerEvent::HeightChanged(snapped)]
    }

    /// Abort the drag and restore the height it started from.
    pub fn drag_cancel(&mut self) -> Option<DrawerEvent> {
        let origin = self.state.drag_origin.take()?;
        self.state.dragging = false;
        if origin.baseline == self.state.height_fraction {
            return None;
        }
        self.state.height_fraction = origin.baseline;
        Some(DrawerEvent::HeightChanged(origin.baseline))
    }

    /// Adapt a pointer (mouse, touch, or pen) event to the drag contract.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> Vec<DrawerEvent> {
        match event.kind {
            PointerKind::Down => {
                self.drag_start(event.y);
                Vec::new()
            }
            PointerKind::Move => self.drag_move(event.y).into_iter().collect(),
            PointerKind::Up => self.drag_end(now),
            PointerKind::Cancel => self.drag_cancel().into_iter().collect(),
        }
    }

    /// Escape closes the drawer.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<DrawerEvent> {
        if !key.is_cancel() {
            return Vec::new();
        }
        self.dismiss(now)
    }

    /// A tap on the scrim behind the sheet closes it.
    pub fn backdrop_tap(&mut self, now: Instant) -> Vec<DrawerEvent> {
        self.dismiss(now)
    }

    fn dismiss(&mut self, now: Instant) -> Vec<DrawerEvent> {
        let closing = self.close(now);
        if closing.is_empty() {
            return closing;
        }
        let mut events = vec![DrawerEvent::Dismissed];
        events.extend(closing);
        events
    }

    fn snap(&self, height: f32) -> f32 {
        if height < self.config.snap_low {
            self.config.min_height
        } else if height > self.config.snap_high {
            self.config.max_height
        } else {
            height
        }
    }

    fn apply_timer<P: PageScroll + ?Sized>(
        &mut self,
        next: DrawerPhase,
        page: &mut P,
    ) -> Vec<DrawerEvent> {
        match (self.state.phase, next) {
            (DrawerPhase::Opening, DrawerPhase::Open) => self.set_phase(DrawerPhase::Open),
            (DrawerPhase::Closing, DrawerPhase::Closed) => self.finish_close(page),
            // A transition scheduled for a phase we already left.
            _ => Vec::new(),
        }
    }

    fn finish_close<P: PageScroll + ?Sized>(&mut self, page: &mut P) -> Vec<DrawerEvent> {
        self.scroll_lock.release(page);
        let from = self.state.phase;
        self.state = DrawerState::closed(&self.config);
        flyout_core::debug!(?from, "drawer closed");
        vec![DrawerEvent::PhaseChanged {
            from,
            to: DrawerPhase::Closed,
        }]
    }

    fn set_phase(&mut self, to: DrawerPhase) -> Vec<DrawerEvent> {
        let from = self.state.phase;
        if from == to {
            return Vec::new();
        }
        self.state.phase = to;
        flyout_core::trace!(?from, ?to, "drawer phase");
        vec![DrawerEvent::PhaseChanged { from, to }]
    }
}

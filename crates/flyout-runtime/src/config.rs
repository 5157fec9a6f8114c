#![forbid(unsafe_code)]

//! Per-overlay behavior configuration.

use std::time::Duration;

use flyout_core::env::{env_bool, env_f32, env_millis};
use flyout_layout::SolverConfig;
use flyout_widgets::{DrawerConfig, DrawerConfigError};

const ENV_NARROW_BREAKPOINT: &str = "FLYOUT_NARROW_BREAKPOINT";
const ENV_CLOSE_ON_ESCAPE: &str = "FLYOUT_CLOSE_ON_ESCAPE";
const ENV_CLOSE_ON_OUTSIDE: &str = "FLYOUT_CLOSE_ON_OUTSIDE";
const ENV_HOVER_CLOSE_MS: &str = "FLYOUT_HOVER_CLOSE_MS";

/// How an overlay behaves while open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    /// Page-blocking: locks page scroll and traps focus (default: false).
    pub modal: bool,
    /// Wrap Tab inside the panel without blocking the page (default: false).
    pub trap_focus: bool,
    /// Viewports narrower than this open the drawer instead (default: 768).
    pub narrow_breakpoint: f32,
    /// Escape closes (default: true).
    pub close_on_escape: bool,
    /// Pointer down outside trigger and panel closes (default: true).
    pub close_on_outside: bool,
    /// Close this long after the pointer leaves trigger and panel.
    /// `None` disables hover intent (default).
    pub hover_close_delay: Option<Duration>,
    /// Floating panel placement.
    pub solver: SolverConfig,
    /// Narrow-viewport drawer.
    pub drawer: DrawerConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            modal: false,
            trap_focus: false,
            narrow_breakpoint: 768.0,
            close_on_escape: true,
            close_on_outside: true,
            hover_close_delay: None,
            solver: SolverConfig::default(),
            drawer: DrawerConfig::default(),
        }
    }
}

impl OverlayConfig {
    /// Page-blocking overlay (dialogs, full pickers).
    #[must_use]
    pub fn modal() -> Self {
        Self::default().with_modal(true)
    }

    /// Set modal mode.
    #[must_use]
    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// Set focus trapping for non-modal overlays.
    #[must_use]
    pub fn with_trap_focus(mut self, trap: bool) -> Self {
        self.trap_focus = trap;
        self
    }

    /// Set the drawer breakpoint. Use `0.0` to never open a drawer.
    #[must_use]
    pub fn with_narrow_breakpoint(mut self, width: f32) -> Self {
        self.narrow_breakpoint = width;
        self
    }

    /// Set whether Escape closes.
    #[must_use]
    pub fn with_close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }

    /// Set whether an outside pointer down closes.
    #[must_use]
    pub fn with_close_on_outside(mut self, enabled: bool) -> Self {
        self.close_on_outside = enabled;
        self
    }

    /// Enable hover-intent closing (sidebar hover menus).
    #[must_use]
    pub fn with_hover_close_delay(mut self, delay: Duration) -> Self {
        self.hover_close_delay = Some(delay);
        self
    }

    /// Set the solver configuration.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Set the drawer configuration.
    #[must_use]
    pub fn with_drawer(mut self, drawer: DrawerConfig) -> Self {
        self.drawer = drawer;
        self
    }

    /// Whether Tab wraps inside the panel.
    #[must_use]
    pub const fn traps_focus(&self) -> bool {
        self.modal || self.trap_focus
    }

    /// Whether a viewport of `width` gets the drawer.
    #[must_use]
    pub fn is_narrow(&self, width: f32) -> bool {
        width < self.narrow_breakpoint
    }

    /// Defaults overridden by `FLYOUT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            solver: SolverConfig::from_env_with(&get_env),
            drawer: DrawerConfig::from_env_with(&get_env),
            ..Self::default()
        };
        if let Some(v) = env_f32(&get_env, ENV_NARROW_BREAKPOINT) {
            config.narrow_breakpoint = v;
        }
        if let Some(v) = env_bool(&get_env, ENV_CLOSE_ON_ESCAPE) {
            config.close_on_escape = v;
        }
        if let Some(v) = env_bool(&get_env, ENV_CLOSE_ON_OUTSIDE) {
            config.close_on_outside = v;
        }
        if let Some(v) = env_millis(&get_env, ENV_HOVER_CLOSE_MS) {
            config.hover_close_delay = Some(v);
        }
        config
    }

    /// Check the nested drawer configuration.
    pub fn validate(&self) -> Result<(), DrawerConfigError> {
        self.drawer.validate()
    }
}

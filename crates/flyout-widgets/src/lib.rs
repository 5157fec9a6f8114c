#![forbid(unsafe_code)]

//! Overlay widgets for flyout.
//!
//! Currently the [`drawer`] bottom sheet, which replaces floating panels on
//! narrow viewports and is resized by dragging.

pub mod drawer;

pub use drawer::{
    DragOrigin, DrawerConfig, DrawerConfigError, DrawerController, DrawerEvent, DrawerPhase,
    DrawerState,
};

//! egui overlay

pub mod debug_panel;

pub use debug_panel::{DebugPanel, PanelAction, PanelStats};

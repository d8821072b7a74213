//! Drawing session management module
//!
//! This module contains:
//! - Message types for pointer input and overlay notifications
//! - The drawing session state machine
//! - The tool manager arbitrating sessions and viewer navigation
//! - Keyboard shortcuts

pub mod manager;
pub mod messages;
pub mod shortcuts;
pub mod state;

pub use manager::ToolManager;
pub use messages::{FinishOutcome, FinishReport, OverlayEvent, PointerKind, PointerMsg};
pub use shortcuts::{Command, Key};
pub use state::{Draft, DrawingSession, SessionState, Step};

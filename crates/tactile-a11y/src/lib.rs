//! Tactile Accessibility
//!
//! Accessibility directives for the tactile document host.
//!
//! Features:
//! - Focus management: auto-focus, focus traps, skip links
//! - Keyboard navigation with named keys and combinations
//! - Screen reader announcements via live regions
//! - ARIA attribute shorthands
//! - Conditional removal from keyboard and screen reader flow
//! - Date picker focus assistance

pub mod announce;
pub mod aria;
pub mod binding;
pub mod date_picker;
pub mod focus;
pub mod helpers;
pub mod keyboard;
pub mod registry;
pub mod skip;
pub mod skip_link;
pub mod trap_focus;

pub use announce::{announce, AnnounceDirective, Priority};
pub use aria::AriaDirective;
pub use binding::{Binding, Handler, Value};
pub use date_picker::DatePickerDirective;
pub use focus::FocusDirective;
pub use keyboard::KeyboardDirective;
pub use registry::{install, Directive, DirectiveRegistry, DirectiveState};
pub use skip::SkipDirective;
pub use skip_link::SkipLinkDirective;
pub use trap_focus::TrapFocusDirective;

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Unknown directive: {0}")]
    UnknownDirective(String),

    #[error("Directive already mounted on this element: {0}")]
    AlreadyMounted(String),

    #[error("Directive not mounted on this element: {0}")]
    NotMounted(String),
}

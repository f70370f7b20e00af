//! Application core for the manga/comic typesetting tool.
//!
//! Wires the font discovery engine to the rest of the tool: notification
//! bus, user preferences, project page navigation, per-page text, and the
//! pattern image library. The windowing shell consumes [`App`] and
//! subscribes to the bus; nothing here draws pixels.

pub mod app;
pub mod bus;
pub mod error;
pub mod pages;
pub mod patterns;
pub mod preference;
pub mod textlist;

pub use crate::app::App;
pub use crate::bus::{Bus, Notice};
pub use crate::error::{CoreError, CoreResult};
pub use crate::pages::{PageInfo, Project};
pub use crate::patterns::PatternLibrary;
pub use crate::preference::{Preference, Publication};
pub use crate::textlist::TextList;

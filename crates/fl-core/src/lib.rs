//! Core domain logic for focusline.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: window-focus records pulled from the activity service
//! - Classification: display names and categories for applications
//! - Timeline: collapsing raw events into activity blocks
//! - Summary: category, app and hourly breakdowns of a batch

pub mod app_name;
pub mod category;
mod event;
pub mod summary;
mod timeline;

pub use app_name::clean_app_name;
pub use category::{Category, UnknownCategory, categorize};
pub use event::{EventData, RawEvent};
pub use timeline::{
    ActivityBlock, AppClassifier, DefaultClassifier, IGNORE_DURATION_THRESHOLD,
    MERGE_GAP_THRESHOLD, MIN_BLOCK_DURATION, SYSTEM_APPS, aggregate,
};

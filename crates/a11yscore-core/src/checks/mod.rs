//! Heuristic checks run against the rendered page.
//!
//! Each check is independent and queries the page only through
//! [`PageDriver`](crate::browser::driver::PageDriver).

pub mod contrast;
pub mod image_alt;
pub mod model;
pub mod popup;
pub mod responsive;

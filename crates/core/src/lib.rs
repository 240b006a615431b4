//! # Flowdesk Core
//!
//! Core types shared by every Flowdesk crate.
//!
//! ## Key Components
//!
//! - **Identifiers**: [`CellId`], the opaque id carried by nodes and edges
//! - **Geometry**: [`Point`], [`Size`] and [`Rect`] in scene coordinates
//!
//! ## Usage
//!
//! ```rust
//! use flowdesk_core::{CellId, Point, Size, Rect};
//!
//! let id = CellId::node(1);
//! assert_eq!(id.as_str(), "n1");
//!
//! let rect = Rect::new(Point::new(10.0, 10.0), Size::new(120.0, 60.0));
//! assert_eq!(rect.center(), Point::new(70.0, 40.0));
//! ```

pub mod geometry;
pub mod id;

pub use geometry::{Point, Rect, Size};
pub use id::{CellId, CellIdError};

/// Common prelude for Flowdesk crates
pub mod prelude {
    pub use super::{CellId, CellIdError, Point, Rect, Size};
}

//! Drag to reorder rows of a sectioned list.
//!
//! [`CellsDragger`] attaches to a [`ListView`], turns pointer input into row moves and asks an
//! optional [`CellsDraggerDelegate`] whether each move is allowed. The moves are reported back so
//! the data they describe can be updated with [`utils::move_row`].
//!
//! [`TableView`] hosts the dragger in an egui ui, [`SectionedList`] is a headless list with fixed
//! row geometry.

pub use delegate::{CellsDraggerDelegate, DelegateFns};
pub use dragger::{CellsDragger, DragEvent, DragIndices, DragResponse, DragStatus, DraggerConfig};
pub use index_path::IndexPath;
pub use list_view::{ListView, RowLayout, SectionedList};
pub use ui::{DraggableRow, Handle, TableView};

mod delegate;
mod dragger;
mod index_path;
mod list_view;
mod ui;

pub mod utils;

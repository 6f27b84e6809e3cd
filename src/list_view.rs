use egui::{Pos2, Rect, Vec2};
use std::cell::RefCell;
use std::rc::Rc;

use crate::utils::move_row;
use crate::IndexPath;

/// The host list a [`CellsDragger`](crate::CellsDragger) is attached to.
///
/// The host owns hit-testing and rendering. The dragger only asks which row sits under a point,
/// tells the host when a row is lifted, moved or dropped, and installs/removes its observer.
pub trait ListView {
    fn number_of_sections(&self) -> usize;

    fn number_of_rows(&self, section: usize) -> usize;

    /// Row under `point`, or `None` if the point lies outside every row.
    fn index_path_at(&self, point: Pos2) -> Option<IndexPath>;

    /// The dragged row moved from `from` to `to`; the host should re-render it.
    fn move_row(&mut self, from: IndexPath, to: IndexPath);

    fn begin_dragging_row(&mut self, _index_path: IndexPath) {}

    fn end_dragging_row(&mut self, _index_path: IndexPath) {}

    /// Called once when the dragger attaches.
    fn install_drag_observer(&mut self) {}

    /// Called once when the dragger detaches. Must restore the interaction state the list had
    /// before [`ListView::install_drag_observer`].
    fn remove_drag_observer(&mut self) {}
}

impl<L: ListView + ?Sized> ListView for &mut L {
    fn number_of_sections(&self) -> usize {
        (**self).number_of_sections()
    }

    fn number_of_rows(&self, section: usize) -> usize {
        (**self).number_of_rows(section)
    }

    fn index_path_at(&self, point: Pos2) -> Option<IndexPath> {
        (**self).index_path_at(point)
    }

    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        (**self).move_row(from, to)
    }

    fn begin_dragging_row(&mut self, index_path: IndexPath) {
        (**self).begin_dragging_row(index_path)
    }

    fn end_dragging_row(&mut self, index_path: IndexPath) {
        (**self).end_dragging_row(index_path)
    }

    fn install_drag_observer(&mut self) {
        (**self).install_drag_observer()
    }

    fn remove_drag_observer(&mut self) {
        (**self).remove_drag_observer()
    }
}

impl<L: ListView + ?Sized> ListView for Rc<RefCell<L>> {
    fn number_of_sections(&self) -> usize {
        self.borrow().number_of_sections()
    }

    fn number_of_rows(&self, section: usize) -> usize {
        self.borrow().number_of_rows(section)
    }

    fn index_path_at(&self, point: Pos2) -> Option<IndexPath> {
        self.borrow().index_path_at(point)
    }

    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        self.borrow_mut().move_row(from, to)
    }

    fn begin_dragging_row(&mut self, index_path: IndexPath) {
        self.borrow_mut().begin_dragging_row(index_path)
    }

    fn end_dragging_row(&mut self, index_path: IndexPath) {
        self.borrow_mut().end_dragging_row(index_path)
    }

    fn install_drag_observer(&mut self) {
        self.borrow_mut().install_drag_observer()
    }

    fn remove_drag_observer(&mut self) {
        self.borrow_mut().remove_drag_observer()
    }
}

/// Row rectangles of a laid out list, in display order.
///
/// Empty sections can register a single drop slot for row 0 so rows can be dragged into them.
#[derive(Clone, Debug, Default)]
pub struct RowLayout {
    rows: Vec<(IndexPath, Rect)>,
    row_counts: Vec<usize>,
}

impl RowLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new section holding `row_count` rows. Rows pushed afterwards belong to it.
    pub fn push_section(&mut self, row_count: usize) {
        self.row_counts.push(row_count);
    }

    pub fn push_row(&mut self, index_path: IndexPath, rect: Rect) {
        self.rows.push((index_path, rect));
    }

    pub fn section_count(&self) -> usize {
        self.row_counts.len()
    }

    pub fn row_count(&self, section: usize) -> usize {
        self.row_counts.get(section).copied().unwrap_or(0)
    }

    pub fn rect(&self, index_path: IndexPath) -> Option<Rect> {
        self.rows
            .iter()
            .find(|(path, _)| *path == index_path)
            .map(|(_, rect)| *rect)
    }

    /// First row whose rect contains `point`. Rows never overlap in practice, so the first match
    /// is the only one.
    pub fn hit_test(&self, point: Pos2) -> Option<IndexPath> {
        self.rows
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(path, _)| *path)
    }
}

/// A headless list view with fixed row geometry that owns its rows.
///
/// Sections are stacked top to bottom, each starting with a header of `header_height` followed by
/// one slot of `row_height` per row. Empty sections keep one slot so rows can be dropped into them.
#[derive(Clone, Debug)]
pub struct SectionedList<T> {
    sections: Vec<Vec<T>>,
    origin: Pos2,
    width: f32,
    row_height: f32,
    header_height: f32,
    observing: bool,
    lifted: Option<IndexPath>,
}

impl<T> SectionedList<T> {
    pub fn new(sections: Vec<Vec<T>>) -> Self {
        Self {
            sections,
            origin: Pos2::ZERO,
            width: 320.0,
            row_height: 44.0,
            header_height: 0.0,
            observing: false,
            lifted: None,
        }
    }

    /// Single-section list.
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self::new(vec![rows])
    }

    pub fn origin(mut self, origin: Pos2) -> Self {
        self.origin = origin;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn header_height(mut self, header_height: f32) -> Self {
        self.header_height = header_height;
        self
    }

    pub fn sections(&self) -> &[Vec<T>] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Vec<T>> {
        self.sections
    }

    pub fn get(&self, index_path: IndexPath) -> Option<&T> {
        self.sections.get(index_path.section)?.get(index_path.row)
    }

    /// Whether a dragger currently observes this list.
    pub fn is_observed(&self) -> bool {
        self.observing
    }

    /// The row currently lifted by a drag, if any.
    pub fn lifted_row(&self) -> Option<IndexPath> {
        self.lifted
    }

    /// Rects of every row slot as currently laid out.
    pub fn layout(&self) -> RowLayout {
        let mut layout = RowLayout::new();
        let mut top = self.origin.y;
        for (section, rows) in self.sections.iter().enumerate() {
            layout.push_section(rows.len());
            top += self.header_height;
            for row in 0..rows.len().max(1) {
                let min = Pos2::new(self.origin.x, top);
                let rect = Rect::from_min_size(min, Vec2::new(self.width, self.row_height));
                layout.push_row(IndexPath::new(section, row), rect);
                top += self.row_height;
            }
        }
        layout
    }

    /// Center point of a row slot, handy for feeding pointer positions.
    pub fn center_of(&self, index_path: IndexPath) -> Option<Pos2> {
        self.layout().rect(index_path).map(|rect| rect.center())
    }
}

impl<T> ListView for SectionedList<T> {
    fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    fn number_of_rows(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Vec::len)
    }

    fn index_path_at(&self, point: Pos2) -> Option<IndexPath> {
        self.layout().hit_test(point)
    }

    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        move_row(&mut self.sections, from, to);
        if self.lifted == Some(from) {
            self.lifted = Some(to);
        }
    }

    fn begin_dragging_row(&mut self, index_path: IndexPath) {
        self.lifted = Some(index_path);
    }

    fn end_dragging_row(&mut self, _index_path: IndexPath) {
        self.lifted = None;
    }

    fn install_drag_observer(&mut self) {
        self.observing = true;
    }

    fn remove_drag_observer(&mut self) {
        self.observing = false;
        self.lifted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_rows_under_headers() {
        let list = SectionedList::new(vec![vec!['a', 'b'], vec![], vec!['c']])
            .origin(Pos2::new(10.0, 0.0))
            .row_height(20.0)
            .header_height(5.0);
        let layout = list.layout();

        assert_eq!(layout.section_count(), 3);
        assert_eq!(layout.row_count(1), 0);
        assert_eq!(layout.rect(IndexPath::new(0, 0)).map(|r| r.top()), Some(5.0));
        assert_eq!(layout.rect(IndexPath::new(0, 1)).map(|r| r.top()), Some(25.0));
        // empty section keeps a drop slot
        assert_eq!(layout.rect(IndexPath::new(1, 0)).map(|r| r.top()), Some(50.0));
        assert_eq!(layout.rect(IndexPath::new(2, 0)).map(|r| r.top()), Some(75.0));
    }

    #[test]
    fn hit_tests_rows_only() {
        let list = SectionedList::from_rows(vec!['a', 'b', 'c']).row_height(10.0);
        assert_eq!(list.index_path_at(Pos2::new(5.0, 15.0)), Some(IndexPath::row(1)));
        assert_eq!(list.index_path_at(Pos2::new(5.0, 35.0)), None);
        assert_eq!(list.index_path_at(Pos2::new(-5.0, 5.0)), None);
    }

    #[test]
    fn headers_are_not_rows() {
        let list = SectionedList::from_rows(vec!['a']).header_height(10.0).row_height(10.0);
        assert_eq!(list.index_path_at(Pos2::new(1.0, 5.0)), None);
        assert_eq!(list.index_path_at(Pos2::new(1.0, 15.0)), Some(IndexPath::row(0)));
    }

    #[test]
    fn forwards_through_shared_handle() {
        let shared = Rc::new(RefCell::new(SectionedList::from_rows(vec![1, 2, 3])));
        let mut handle = shared.clone();
        handle.install_drag_observer();
        handle.move_row(IndexPath::row(0), IndexPath::row(2));
        assert!(shared.borrow().is_observed());
        assert_eq!(shared.borrow().sections(), &[vec![2, 3, 1]]);
    }
}

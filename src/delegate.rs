use crate::IndexPath;

/// Receives permission queries and lifecycle notifications from a
/// [`CellsDragger`](crate::CellsDragger).
///
/// Every method is optional. Permission queries default to allowing the move, notifications
/// default to doing nothing. The dragger only keeps a weak reference to its delegate, so a
/// delegate that has been dropped is treated the same as no delegate at all.
///
/// The dragger is mutably borrowed while it calls into the delegate; callbacks cannot reach back
/// into it. Delegates that need to record state use interior mutability.
///
/// Callbacks do not say which dragger they come from, so give each dragger its own delegate
/// instance.
pub trait CellsDraggerDelegate {
    /// Whether a drag may begin on the row at `index_path`.
    fn can_move_row_at(&self, _index_path: IndexPath) -> bool {
        true
    }

    /// Whether the dragged row may move from `from` to `to`. Refusing keeps the drag alive.
    fn can_move_row(&self, _from: IndexPath, _to: IndexPath) -> bool {
        true
    }

    fn will_move_row(&self, _from: IndexPath, _to: IndexPath) {}

    fn did_move_row(&self, _from: IndexPath, _to: IndexPath) {}

    fn will_begin_dragging_row(&self, _index_path: IndexPath) {}

    fn did_begin_dragging_row(&self, _index_path: IndexPath) {}

    fn will_end_dragging_row(&self, _index_path: IndexPath) {}

    fn did_end_dragging_row(&self, _index_path: IndexPath) {}
}

type Predicate = Box<dyn Fn(IndexPath) -> bool>;
type MovePredicate = Box<dyn Fn(IndexPath, IndexPath) -> bool>;
type Notify = Box<dyn Fn(IndexPath)>;
type MoveNotify = Box<dyn Fn(IndexPath, IndexPath)>;

/// A delegate assembled from closures. Each slot is independent; unset slots behave like the
/// [`CellsDraggerDelegate`] defaults.
///
/// ```
/// use cells_dragger::{CellsDraggerDelegate, DelegateFns, IndexPath};
///
/// let delegate = DelegateFns::new().on_can_move_row_at(|path| path.row != 0);
/// assert!(!delegate.can_move_row_at(IndexPath::row(0)));
/// assert!(delegate.can_move_row(IndexPath::row(1), IndexPath::row(0)));
/// ```
#[derive(Default)]
pub struct DelegateFns {
    can_move_row_at: Option<Predicate>,
    can_move_row: Option<MovePredicate>,
    will_move_row: Option<MoveNotify>,
    did_move_row: Option<MoveNotify>,
    will_begin: Option<Notify>,
    did_begin: Option<Notify>,
    will_end: Option<Notify>,
    did_end: Option<Notify>,
}

impl DelegateFns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_can_move_row_at(mut self, f: impl Fn(IndexPath) -> bool + 'static) -> Self {
        self.can_move_row_at = Some(Box::new(f));
        self
    }

    pub fn on_can_move_row(mut self, f: impl Fn(IndexPath, IndexPath) -> bool + 'static) -> Self {
        self.can_move_row = Some(Box::new(f));
        self
    }

    pub fn on_will_move_row(mut self, f: impl Fn(IndexPath, IndexPath) + 'static) -> Self {
        self.will_move_row = Some(Box::new(f));
        self
    }

    pub fn on_did_move_row(mut self, f: impl Fn(IndexPath, IndexPath) + 'static) -> Self {
        self.did_move_row = Some(Box::new(f));
        self
    }

    pub fn on_will_begin_dragging(mut self, f: impl Fn(IndexPath) + 'static) -> Self {
        self.will_begin = Some(Box::new(f));
        self
    }

    pub fn on_did_begin_dragging(mut self, f: impl Fn(IndexPath) + 'static) -> Self {
        self.did_begin = Some(Box::new(f));
        self
    }

    pub fn on_will_end_dragging(mut self, f: impl Fn(IndexPath) + 'static) -> Self {
        self.will_end = Some(Box::new(f));
        self
    }

    pub fn on_did_end_dragging(mut self, f: impl Fn(IndexPath) + 'static) -> Self {
        self.did_end = Some(Box::new(f));
        self
    }
}

impl CellsDraggerDelegate for DelegateFns {
    fn can_move_row_at(&self, index_path: IndexPath) -> bool {
        self.can_move_row_at.as_ref().map_or(true, |f| f(index_path))
    }

    fn can_move_row(&self, from: IndexPath, to: IndexPath) -> bool {
        self.can_move_row.as_ref().map_or(true, |f| f(from, to))
    }

    fn will_move_row(&self, from: IndexPath, to: IndexPath) {
        if let Some(f) = &self.will_move_row {
            f(from, to);
        }
    }

    fn did_move_row(&self, from: IndexPath, to: IndexPath) {
        if let Some(f) = &self.did_move_row {
            f(from, to);
        }
    }

    fn will_begin_dragging_row(&self, index_path: IndexPath) {
        if let Some(f) = &self.will_begin {
            f(index_path);
        }
    }

    fn did_begin_dragging_row(&self, index_path: IndexPath) {
        if let Some(f) = &self.did_begin {
            f(index_path);
        }
    }

    fn will_end_dragging_row(&self, index_path: IndexPath) {
        if let Some(f) = &self.will_end {
            f(index_path);
        }
    }

    fn did_end_dragging_row(&self, index_path: IndexPath) {
        if let Some(f) = &self.did_end {
            f(index_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Empty;
    impl CellsDraggerDelegate for Empty {}

    #[test]
    fn defaults_are_permissive() {
        let d = Empty;
        assert!(d.can_move_row_at(IndexPath::row(0)));
        assert!(d.can_move_row(IndexPath::row(0), IndexPath::row(1)));

        let fns = DelegateFns::new();
        assert!(fns.can_move_row_at(IndexPath::row(0)));
        assert!(fns.can_move_row(IndexPath::row(0), IndexPath::row(1)));
        // unset notifications are no-ops
        fns.did_move_row(IndexPath::row(0), IndexPath::row(1));
    }

    #[test]
    fn slots_are_independent() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let fns = DelegateFns::new()
            .on_can_move_row(|from, to| from.section == to.section)
            .on_did_move_row(move |from, to| sink.borrow_mut().push((from, to)));

        assert!(fns.can_move_row_at(IndexPath::new(3, 3)));
        assert!(!fns.can_move_row(IndexPath::new(0, 0), IndexPath::new(1, 0)));
        fns.will_move_row(IndexPath::row(0), IndexPath::row(1));
        fns.did_move_row(IndexPath::row(0), IndexPath::row(1));
        assert_eq!(*seen.borrow(), vec![(IndexPath::row(0), IndexPath::row(1))]);
    }
}

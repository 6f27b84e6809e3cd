use std::cell::RefCell;
use std::rc::Rc;

use cells_dragger::utils::{move_item, move_row};
use cells_dragger::{
    CellsDragger, CellsDraggerDelegate, DragEvent, DragStatus, IndexPath, SectionedList,
};
use proptest::prelude::*;

/// Refuses moves whose rows sum to a multiple of `modulus`. A modulus of 0 allows everything.
struct Refusing {
    modulus: usize,
    log: RefCell<Vec<&'static str>>,
}

impl Refusing {
    fn new(modulus: usize) -> Self {
        Self {
            modulus,
            log: RefCell::new(Vec::new()),
        }
    }

    fn allows(&self, from: usize, to: usize) -> bool {
        self.modulus == 0 || (from + to) % self.modulus != 0
    }
}

impl CellsDraggerDelegate for Refusing {
    fn can_move_row(&self, from: IndexPath, to: IndexPath) -> bool {
        self.allows(from.row, to.row)
    }

    fn will_move_row(&self, _from: IndexPath, _to: IndexPath) {
        self.log.borrow_mut().push("will_move");
    }

    fn did_move_row(&self, _from: IndexPath, _to: IndexPath) {
        self.log.borrow_mut().push("did_move");
    }

    fn will_begin_dragging_row(&self, _index_path: IndexPath) {
        self.log.borrow_mut().push("will_begin");
    }

    fn did_begin_dragging_row(&self, _index_path: IndexPath) {
        self.log.borrow_mut().push("did_begin");
    }

    fn will_end_dragging_row(&self, _index_path: IndexPath) {
        self.log.borrow_mut().push("will_end");
    }

    fn did_end_dragging_row(&self, _index_path: IndexPath) {
        self.log.borrow_mut().push("did_end");
    }
}

fn drag_strategy() -> impl Strategy<Value = (usize, usize, Vec<usize>, usize)> {
    (2usize..8).prop_flat_map(|len| {
        (
            Just(len),
            0..len,
            prop::collection::vec(0..len, 0..12),
            0usize..5,
        )
    })
}

proptest! {
    #[test]
    fn release_commits_last_allowed_candidate((len, start, targets, modulus) in drag_strategy()) {
        let original: Vec<usize> = (0..len).collect();
        let mut list = SectionedList::from_rows(original.clone());
        let centers: Vec<_> = (0..len)
            .map(|row| list.center_of(IndexPath::row(row)).expect("row exists"))
            .collect();
        let delegate = Rc::new(Refusing::new(modulus));

        let mut mirror = vec![original.clone()];
        let mut expected = start;
        let mut dragger = CellsDragger::with_delegate(&mut list, &delegate);

        let began = dragger.handle_event(DragEvent::Pressed(centers[start]));
        prop_assert!(matches!(began.status, DragStatus::CurrentDrag(_)));
        for target in targets {
            if target != expected && delegate.allows(expected, target) {
                expected = target;
            }
            let response = dragger.handle_event(DragEvent::Moved(centers[target]));
            for m in response.moves {
                move_row(&mut mirror, m.source, m.target);
            }
        }
        let done = dragger.handle_event(DragEvent::Released(None));
        drop(dragger);

        match done.status {
            DragStatus::Completed(indices) => {
                prop_assert_eq!(indices.source, IndexPath::row(start));
                prop_assert_eq!(indices.target, IndexPath::row(expected));
            }
            other => prop_assert!(false, "unexpected status {:?}", other),
        }

        let mut reordered = original;
        move_item(&mut reordered, start, expected);
        prop_assert_eq!(&list.sections()[0], &reordered);
        prop_assert_eq!(&mirror[0], &reordered);
    }

    #[test]
    fn cancel_restores_pre_drag_order((len, start, targets, modulus) in drag_strategy()) {
        let original: Vec<usize> = (0..len).collect();
        let mut list = SectionedList::from_rows(original.clone());
        let centers: Vec<_> = (0..len)
            .map(|row| list.center_of(IndexPath::row(row)).expect("row exists"))
            .collect();
        let delegate = Rc::new(Refusing::new(modulus));

        let mut dragger = CellsDragger::with_delegate(&mut list, &delegate);
        dragger.handle_event(DragEvent::Pressed(centers[start]));
        for target in targets {
            dragger.handle_event(DragEvent::Moved(centers[target]));
        }
        let cancelled = dragger.handle_event(DragEvent::Cancelled);
        prop_assert!(matches!(cancelled.status, DragStatus::Cancelled(_)));
        prop_assert!(!dragger.is_dragging());
        drop(dragger);

        prop_assert_eq!(&list.sections()[0], &original);
    }

    #[test]
    fn callbacks_follow_drag_lifecycle((len, start, targets, modulus) in drag_strategy()) {
        let mut list = SectionedList::from_rows((0..len).collect::<Vec<_>>());
        let centers: Vec<_> = (0..len)
            .map(|row| list.center_of(IndexPath::row(row)).expect("row exists"))
            .collect();
        let delegate = Rc::new(Refusing::new(modulus));

        let mut dragger = CellsDragger::with_delegate(&mut list, &delegate);
        dragger.handle_event(DragEvent::Pressed(centers[start]));
        for target in targets {
            dragger.handle_event(DragEvent::Moved(centers[target]));
        }
        dragger.handle_event(DragEvent::Released(None));
        drop(dragger);

        let log = delegate.log.borrow();
        prop_assert!(log.len() >= 4);
        prop_assert_eq!(&log[..2], &["will_begin", "did_begin"]);
        prop_assert_eq!(&log[log.len() - 2..], &["will_end", "did_end"]);
        for pair in log[2..log.len() - 2].chunks(2) {
            prop_assert_eq!(pair, &["will_move", "did_move"]);
        }
    }
}

#[test]
fn detach_mid_drag_across_sections_restores_order() {
    let mut list = SectionedList::new(vec![vec!['a', 'b'], vec!['c', 'd']]).header_height(20.0);
    let from = list.center_of(IndexPath::new(0, 0)).expect("row exists");
    let to = list.center_of(IndexPath::new(1, 1)).expect("row exists");

    let mut dragger = CellsDragger::new(&mut list);
    dragger.handle_event(DragEvent::Pressed(from));
    let moved = dragger.handle_event(DragEvent::Moved(to));
    assert_eq!(moved.moves.len(), 1);
    assert!(dragger.remove_from_current_list_view().is_some());
    drop(dragger);

    assert_eq!(list.sections(), &[vec!['a', 'b'], vec!['c', 'd']]);
    assert!(!list.is_observed());
}

use egui::Pos2;
use std::rc::{Rc, Weak};

use crate::{CellsDraggerDelegate, IndexPath, ListView};

/// Source and target of a drag. `source` is where the dragged row started, `target` is where it
/// currently sits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DragIndices {
    pub source: IndexPath,
    pub target: IndexPath,
}

/// Input delivered by the host, one per pointer event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    Pressed(Pos2),
    Moved(Pos2),
    /// Pointer released. `None` when the host no longer has a pointer position.
    Released(Option<Pos2>),
    /// The gesture was interrupted by the system.
    Cancelled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragStatus {
    #[default]
    NoDrag,
    CurrentDrag(DragIndices),
    /// The drag finished with the row at `target`.
    Completed(DragIndices),
    /// The drag was cancelled and the row is back at `source`.
    Cancelled(DragIndices),
}

/// What happened while handling one [`DragEvent`].
///
/// `moves` holds every move applied to the list, in order, as `(from, to)` pairs where `to` is the
/// final position of the row. Apply them to your data with [`move_row`](crate::utils::move_row).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragResponse {
    pub status: DragStatus,
    pub moves: Vec<DragIndices>,
}

impl DragResponse {
    fn from_status(status: DragStatus) -> Self {
        Self {
            status,
            moves: Vec::new(),
        }
    }

    /// Appends the moves of a later response and takes over its status.
    pub fn merge(&mut self, later: DragResponse) {
        self.moves.extend(later.moves);
        self.status = later.status;
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DraggerConfig {
    /// Whether rows may be dragged into a different section.
    pub allow_cross_section: bool,
    /// Whether the Escape key cancels a drag in the egui adapter.
    pub cancel_on_escape: bool,
}

impl Default for DraggerConfig {
    fn default() -> Self {
        Self {
            allow_cross_section: true,
            cancel_on_escape: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct DragSession {
    origin: IndexPath,
    candidate: IndexPath,
}

impl DragSession {
    fn indices(&self) -> DragIndices {
        DragIndices {
            source: self.origin,
            target: self.candidate,
        }
    }
}

/// Lets the user reorder rows of a [`ListView`] by dragging them.
///
/// The dragger turns [`DragEvent`]s into row moves. Every move is checked with the delegate,
/// applied to the list view and reported back through [`DragResponse::moves`]. Only one drag can
/// be active at a time; presses during a drag are ignored.
///
/// The delegate is held weakly. It must stay alive for as long as it wants callbacks; once dropped
/// the dragger behaves as if no delegate was set.
///
/// # Example
/// ```
/// use cells_dragger::{CellsDragger, DragEvent, IndexPath, SectionedList};
///
/// let mut list = SectionedList::from_rows(vec!['a', 'b', 'c', 'd']);
/// let start = list.center_of(IndexPath::row(0)).unwrap();
/// let end = list.center_of(IndexPath::row(2)).unwrap();
///
/// let mut dragger = CellsDragger::new(&mut list);
/// dragger.handle_event(DragEvent::Pressed(start));
/// dragger.handle_event(DragEvent::Moved(end));
/// dragger.handle_event(DragEvent::Released(Some(end)));
/// drop(dragger);
///
/// assert_eq!(list.sections(), &[vec!['b', 'c', 'a', 'd']]);
/// ```
pub struct CellsDragger<V: ListView> {
    list_view: Option<V>,
    delegate: Option<Weak<dyn CellsDraggerDelegate>>,
    config: DraggerConfig,
    session: Option<DragSession>,
}

impl<V: ListView> CellsDragger<V> {
    pub fn new(mut list_view: V) -> Self {
        list_view.install_drag_observer();
        Self {
            list_view: Some(list_view),
            delegate: None,
            config: DraggerConfig::default(),
            session: None,
        }
    }

    pub fn with_delegate<D: CellsDraggerDelegate + 'static>(list_view: V, delegate: &Rc<D>) -> Self {
        let mut dragger = Self::new(list_view);
        dragger.set_delegate(delegate);
        dragger
    }

    pub fn with_config(mut self, config: DraggerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DraggerConfig {
        &self.config
    }

    pub fn set_delegate<D: CellsDraggerDelegate + 'static>(&mut self, delegate: &Rc<D>) {
        let weak: Weak<D> = Rc::downgrade(delegate);
        self.delegate = Some(weak);
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    pub fn list_view(&self) -> Option<&V> {
        self.list_view.as_ref()
    }

    pub fn list_view_mut(&mut self) -> Option<&mut V> {
        self.list_view.as_mut()
    }

    pub fn is_attached(&self) -> bool {
        self.list_view.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Origin and current position of the row being dragged.
    pub fn drag_indices(&self) -> Option<DragIndices> {
        self.session.map(|session| session.indices())
    }

    /// Attaches to `list_view`. If the dragger is already attached nothing changes and
    /// `list_view` is handed back untouched.
    pub fn attach(&mut self, mut list_view: V) -> Option<V> {
        if self.list_view.is_some() {
            log::debug!("cells dragger already attached, ignoring attach");
            return Some(list_view);
        }

        list_view.install_drag_observer();
        self.list_view = Some(list_view);
        None
    }

    /// Detaches from the current list view and hands it back. A drag in progress is cancelled
    /// first, which moves the dragged row back to where it started. Does nothing if detached.
    pub fn remove_from_current_list_view(&mut self) -> Option<V> {
        if self.session.is_some() {
            self.cancel();
        }

        let mut list_view = self.list_view.take()?;
        list_view.remove_drag_observer();
        Some(list_view)
    }

    pub fn handle_event(&mut self, event: DragEvent) -> DragResponse {
        match event {
            DragEvent::Pressed(point) => self.press(point),
            DragEvent::Moved(point) => {
                let mut response = DragResponse::default();
                self.drag_to(point, &mut response);
                response
            }
            DragEvent::Released(point) => self.release(point),
            DragEvent::Cancelled => self.cancel(),
        }
    }

    fn delegate(&self) -> Option<Rc<dyn CellsDraggerDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    fn current_status(&self) -> DragStatus {
        match self.session {
            Some(session) => DragStatus::CurrentDrag(session.indices()),
            None => DragStatus::NoDrag,
        }
    }

    fn press(&mut self, point: Pos2) -> DragResponse {
        if let Some(session) = self.session {
            log::debug!("drag already active at {}, ignoring press", session.candidate);
            return DragResponse::from_status(self.current_status());
        }
        let index_path = match self.list_view.as_ref().and_then(|v| v.index_path_at(point)) {
            Some(index_path) => index_path,
            None => return DragResponse::default(),
        };

        let delegate = self.delegate();
        if let Some(delegate) = &delegate {
            if !delegate.can_move_row_at(index_path) {
                log::debug!("delegate refused drag at {}", index_path);
                return DragResponse::default();
            }
            delegate.will_begin_dragging_row(index_path);
        }

        let session = DragSession {
            origin: index_path,
            candidate: index_path,
        };
        self.session = Some(session);
        if let Some(list_view) = &mut self.list_view {
            list_view.begin_dragging_row(index_path);
        }
        log::debug!("began dragging row {}", index_path);

        if let Some(delegate) = &delegate {
            delegate.did_begin_dragging_row(index_path);
        }
        DragResponse::from_status(DragStatus::CurrentDrag(session.indices()))
    }

    /// Moves the dragged row under `point` if the target is valid and allowed.
    fn drag_to(&mut self, point: Pos2, response: &mut DragResponse) {
        let (session, list_view) = match (self.session, &self.list_view) {
            (Some(session), Some(list_view)) => (session, list_view),
            _ => {
                response.status = self.current_status();
                return;
            }
        };
        response.status = DragStatus::CurrentDrag(session.indices());

        // outside every row the row stays at its last valid position
        let target = match list_view.index_path_at(point) {
            Some(target) if target != session.candidate => target,
            _ => return,
        };
        if !self.is_valid_target(list_view, session.candidate, target) {
            log::debug!("ignoring invalid move target {}", target);
            return;
        }
        if let Some(delegate) = self.delegate() {
            if !delegate.can_move_row(session.candidate, target) {
                log::debug!("delegate refused move {} -> {}", session.candidate, target);
                return;
            }
        }

        self.apply_move(session.candidate, target, response);
    }

    fn is_valid_target(&self, list_view: &V, from: IndexPath, to: IndexPath) -> bool {
        if to.section >= list_view.number_of_sections() {
            return false;
        }
        let rows = list_view.number_of_rows(to.section);
        if from.section == to.section {
            to.row < rows
        } else {
            // moving in grows the section by one
            self.config.allow_cross_section && to.row <= rows
        }
    }

    fn apply_move(&mut self, from: IndexPath, to: IndexPath, response: &mut DragResponse) {
        let delegate = self.delegate();
        if let Some(delegate) = &delegate {
            delegate.will_move_row(from, to);
        }

        if let Some(list_view) = &mut self.list_view {
            list_view.move_row(from, to);
        }
        if let Some(session) = &mut self.session {
            session.candidate = to;
        }
        log::trace!("moved row {} -> {}", from, to);
        response.moves.push(DragIndices {
            source: from,
            target: to,
        });
        if let Some(session) = self.session {
            response.status = DragStatus::CurrentDrag(session.indices());
        }

        if let Some(delegate) = &delegate {
            delegate.did_move_row(from, to);
        }
    }

    fn release(&mut self, point: Option<Pos2>) -> DragResponse {
        let mut response = DragResponse::default();
        if self.session.is_none() {
            return response;
        }
        if let Some(point) = point {
            self.drag_to(point, &mut response);
        }

        let indices = self.end_session();
        log::debug!("finished dragging row {} -> {}", indices.source, indices.target);
        response.status = DragStatus::Completed(indices);
        response
    }

    fn cancel(&mut self) -> DragResponse {
        let mut response = DragResponse::default();
        let session = match self.session {
            Some(session) => session,
            None => return response,
        };

        // uncommitted moves are undone without asking the delegate
        if session.candidate != session.origin {
            self.apply_move(session.candidate, session.origin, &mut response);
        }

        let indices = self.end_session();
        log::debug!("cancelled dragging row {}", indices.source);
        response.status = DragStatus::Cancelled(indices);
        response
    }

    /// Fires the end callbacks and clears the session. Callers check there is a session.
    fn end_session(&mut self) -> DragIndices {
        let indices = self.session.map(|s| s.indices()).unwrap_or_default();
        let delegate = self.delegate();
        if let Some(delegate) = &delegate {
            delegate.will_end_dragging_row(indices.target);
        }

        if let Some(list_view) = &mut self.list_view {
            list_view.end_dragging_row(indices.target);
        }
        self.session = None;

        if let Some(delegate) = &delegate {
            delegate.did_end_dragging_row(indices.target);
        }
        indices
    }
}

impl<V: ListView> Drop for CellsDragger<V> {
    fn drop(&mut self) {
        self.remove_from_current_list_view();
    }
}

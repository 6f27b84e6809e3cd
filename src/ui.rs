use egui::{self, CursorIcon, Id, Key, Order, Pos2, Rect, Sense, Ui, Vec2};
use epaint::Shape;
use std::hash::Hash;

use crate::{CellsDragger, DragEvent, DragResponse, IndexPath, ListView, RowLayout};

pub trait DraggableRow {
    fn id(&self) -> Id;
}

impl<T: Hash> DraggableRow for T {
    fn id(&self) -> Id {
        Id::new(self)
    }
}

/// A [`ListView`] backed by the rows egui laid out in the latest frame.
#[derive(Default)]
pub struct TableView {
    layout: RowLayout,
    /// Pointer position relative to the origin of the dragged row when dragging began
    grab_offset: Option<Vec2>,
    /// Set by a [`Handle`] when a drag starts on it this frame
    pressed_at: Option<Pos2>,
    observing: bool,
    ctx: Option<egui::Context>,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }
}

impl ListView for TableView {
    fn number_of_sections(&self) -> usize {
        self.layout.section_count()
    }

    fn number_of_rows(&self, section: usize) -> usize {
        self.layout.row_count(section)
    }

    fn index_path_at(&self, point: Pos2) -> Option<IndexPath> {
        self.layout.hit_test(point)
    }

    fn move_row(&mut self, _from: IndexPath, _to: IndexPath) {
        // the rows are drawn from the caller's data, which changes after this frame
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }

    fn install_drag_observer(&mut self) {
        self.observing = true;
    }

    fn remove_drag_observer(&mut self) {
        self.observing = false;
        self.grab_offset = None;
        self.pressed_at = None;
    }
}

/// [Handle::ui] is used to draw the drag handle
pub struct Handle<'a> {
    view: Option<&'a mut TableView>,
}

/// The part of the row ui thats draggable. Accessible by the user with the `item_ui` parameter of [`CellsDragger::ui`]
impl<'a> Handle<'a> {
    pub fn ui<T: DraggableRow>(self, ui: &mut Ui, item: &T, contents: impl FnOnce(&mut Ui)) {
        let view = match self.view {
            Some(view) if view.observing => view,
            // placeholder or detached: no draggable stuff
            _ => {
                contents(ui);
                return;
            }
        };

        let added_contents = ui.scope(contents);
        let dragable_response = ui.interact(added_contents.response.rect, item.id(), Sense::drag());

        if dragable_response.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }

        // remember where the row was grabbed so it floats under the pointer at the same offset
        if dragable_response.drag_started() {
            if let Some(pointer_pos) = dragable_response.interact_pointer_pos() {
                let top_left = added_contents.response.rect.min;
                view.grab_offset = Some(top_left - pointer_pos);
                view.pressed_at = Some(pointer_pos);
            }
        }
    }
}

/// Drawing rows with egui.
///
/// `item_ui` draws one row. Its arguments are:
/// - a mutable reference to the ui
/// - a [`Handle`] that can be used to draw the draggable part of the row
/// - the [`IndexPath`] of the row
/// - a reference to the row item
///
/// Apply [`DragResponse::moves`] to your data after every frame.
///
/// # Example
/// ```no_run
/// use cells_dragger::{utils::move_row, CellsDragger, TableView};
/// use eframe::egui::{CentralPanel, Context};
///
/// struct ReorderApp {
///     sections: Vec<Vec<String>>,
///     dragger: CellsDragger<TableView>,
/// }
///
/// impl eframe::App for ReorderApp {
///     fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
///         CentralPanel::default().show(ctx, |ui| {
///             let response = self.dragger.ui(ui, &self.sections, |ui, handle, _path, item: &String| {
///                 ui.horizontal(|ui| {
///                     handle.ui(ui, item, |ui| {
///                         ui.label("grab");
///                     });
///                     ui.label(item.as_str());
///                 });
///             });
///             for m in response.moves {
///                 move_row(&mut self.sections, m.source, m.target);
///             }
///         });
///     }
/// }
///
/// fn main() -> Result<(), eframe::Error> {
///     let sections = vec![
///         vec!["a".to_owned(), "b".to_owned()],
///         vec!["c".to_owned()],
///     ];
///     eframe::run_native(
///         "Reorder",
///         eframe::NativeOptions::default(),
///         Box::new(|_| {
///             Box::new(ReorderApp {
///                 sections,
///                 dragger: CellsDragger::new(TableView::new()),
///             })
///         }),
///     )
/// }
/// ```
impl CellsDragger<TableView> {
    pub fn ui<T, S>(
        &mut self,
        ui: &mut Ui,
        sections: &[S],
        mut item_ui: impl FnMut(&mut Ui, Handle, IndexPath, &T),
    ) -> DragResponse
    where
        T: DraggableRow,
        S: AsRef<[T]>,
    {
        let dragging = self.drag_indices().map(|indices| indices.target);
        let view = match self.list_view_mut() {
            Some(view) => view,
            None => {
                draw_rows_plain(ui, sections, &mut item_ui);
                return DragResponse::default();
            }
        };
        view.ctx = Some(ui.ctx().clone());

        let mut layout = RowLayout::new();
        draw_list(ui, dragging.is_some(), |ui| {
            for (section, rows) in sections.iter().enumerate() {
                let rows = rows.as_ref();
                if section > 0 {
                    ui.separator();
                }
                layout.push_section(rows.len());

                if rows.is_empty() {
                    // reserve a slot so rows can be dropped into empty sections
                    let size = Vec2::new(ui.available_width(), ui.spacing().interact_size.y);
                    let (_id, rect) = ui.allocate_space(size);
                    layout.push_row(IndexPath::new(section, 0), rect);
                }

                for (row, item) in rows.iter().enumerate() {
                    let path = IndexPath::new(section, row);
                    let rect = draw_item(ui, view, dragging == Some(path), item.id(), |ui, handle| {
                        item_ui(ui, handle, path, item)
                    });
                    layout.push_row(path, rect);
                }
            }
        });
        view.layout = layout;
        let pressed_at = view.pressed_at.take();

        let (pointer_pos, released, escape) = ui.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.any_released(),
                i.key_pressed(Key::Escape),
            )
        });

        let mut response = DragResponse::default();
        if let Some(pos) = pressed_at {
            response.merge(self.handle_event(DragEvent::Pressed(pos)));
        }
        if self.is_dragging() {
            let event = if escape && self.config().cancel_on_escape {
                DragEvent::Cancelled
            } else if released {
                DragEvent::Released(pointer_pos)
            } else if let Some(pos) = pointer_pos {
                DragEvent::Moved(pos)
            } else {
                return response;
            };
            response.merge(self.handle_event(event));
        }
        response
    }

    /// [`CellsDragger::ui`] for a list with a single section.
    pub fn list_ui<T: DraggableRow>(
        &mut self,
        ui: &mut Ui,
        items: &[T],
        mut item_ui: impl FnMut(&mut Ui, Handle, usize, &T),
    ) -> DragResponse {
        self.ui(ui, &[items], |ui, handle, path, item| {
            item_ui(ui, handle, path.row, item)
        })
    }
}

fn draw_rows_plain<T, S: AsRef<[T]>>(
    ui: &mut Ui,
    sections: &[S],
    item_ui: &mut impl FnMut(&mut Ui, Handle, IndexPath, &T),
) {
    for (section, rows) in sections.iter().enumerate() {
        if section > 0 {
            ui.separator();
        }
        for (row, item) in rows.as_ref().iter().enumerate() {
            item_ui(ui, Handle { view: None }, IndexPath::new(section, row), item);
        }
    }
}

/// Draw the widget for a row using `item_body` either inline with the list or hovering depending
/// on if its being dragged, then returns the rect it occupies in the list. A dragged row floats at
/// the pointer and a disabled placeholder keeps its place in the list.
fn draw_item(
    ui: &mut Ui,
    view: &mut TableView,
    is_being_dragged: bool,
    id: Id,
    mut item_body: impl FnMut(&mut Ui, Handle),
) -> Rect {
    if !is_being_dragged {
        let scope = ui.scope(|ui| item_body(ui, Handle { view: Some(&mut *view) }));
        return scope.response.rect;
    }

    ui.ctx().set_cursor_icon(CursorIcon::Grabbing);

    let pointer_pos = ui
        .ctx()
        .pointer_interact_pos()
        .unwrap_or(ui.next_widget_position());
    let offset = view.grab_offset.unwrap_or_default();

    // the floating copy is not interactable; the drag is tracked from pointer input instead
    egui::Area::new(id.with("cells_dragger_floating"))
        .order(Order::Tooltip)
        .interactable(false)
        .fixed_pos(pointer_pos + offset)
        .show(ui.ctx(), |ui| item_body(ui, Handle { view: None }));

    let scope = ui.scope(|ui| {
        ui.add_enabled_ui(false, |ui| item_body(ui, Handle { view: None }));
    });
    scope.response.rect
}

/// Draw the list body on a background that lights up while a row is dragged over it.
fn draw_list(ui: &mut Ui, is_drop_target: bool, list_body: impl FnOnce(&mut Ui)) -> egui::Response {
    let margin = Vec2::splat(4.0);

    let outer_rect_bounds = ui.available_rect_before_wrap();
    let inner_rect = outer_rect_bounds.shrink2(margin);
    let where_to_put_background = ui.painter().add(Shape::Noop);

    let mut content_ui = ui.child_ui(inner_rect, *ui.layout());

    list_body(&mut content_ui);
    let outer_rect = Rect::from_min_max(outer_rect_bounds.min, content_ui.min_rect().max + margin);
    let (rect, response) = ui.allocate_at_least(outer_rect.size(), Sense::hover());

    let style = if is_drop_target && response.hovered() {
        ui.visuals().widgets.active
    } else {
        ui.visuals().widgets.inactive
    };

    ui.painter().set(
        where_to_put_background,
        Shape::Vec(vec![
            Shape::rect_filled(rect, style.rounding, style.bg_fill),
            Shape::rect_stroke(rect, style.rounding, style.bg_stroke),
        ]),
    );

    response
}

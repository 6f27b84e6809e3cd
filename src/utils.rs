use crate::IndexPath;

/// Removes the value at `from` and reinserts it so that it ends up at index `to`. Does nothing if
/// `from` is equal to `to` or if either index is outside the vec bounds.
///
/// This is the same convention [`DragResponse::moves`](crate::DragResponse::moves) reports in:
/// moving `0 -> 2` in `[a, b, c, d]` gives `[b, c, a, d]`.
pub fn move_item<T>(vec: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= vec.len() || to >= vec.len() {
        return;
    }

    let item = vec.remove(from);
    vec.insert(to, item);
}

/// Moves a row between (or within) sections. `to.row` may equal the length of a different target
/// section, which appends to it. Out of range paths are ignored.
pub fn move_row<T>(sections: &mut [Vec<T>], from: IndexPath, to: IndexPath) {
    if from.section == to.section {
        if let Some(rows) = sections.get_mut(from.section) {
            move_item(rows, from.row, to.row);
        }
        return;
    }

    let target_len = match sections.get(to.section) {
        Some(rows) => rows.len(),
        None => return,
    };
    let source_ok = sections
        .get(from.section)
        .map_or(false, |rows| from.row < rows.len());
    if !source_ok || to.row > target_len {
        return;
    }

    let item = sections[from.section].remove(from.row);
    sections[to.section].insert(to.row, item);
}

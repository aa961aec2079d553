//! Deterministic chain layout used once the attempt ceiling is reached.
//!
//! Minimum-size rooms sit on a regular lattice whose pitch leaves exactly the
//! padding gap between neighbors. Rooms are listed in serpentine order (left to
//! right on even rows, right to left on odd rows) so consecutive rooms always
//! share a row or a column and a straight corridor joins them.

use crate::config::GeneratorConfig;

use super::model::RoomRect;

/// Distance between the top-left corners of neighboring lattice rooms.
fn lattice_step(config: &GeneratorConfig) -> usize {
    config.min_room_size + 2 * config.room_padding
}

/// Lattice slots along one axis of `extent` tiles, border excluded.
fn slots_along(config: &GeneratorConfig, extent: usize) -> usize {
    let side = config.min_room_size;
    match extent.checked_sub(2 + side) {
        Some(free) => free / lattice_step(config) + 1,
        None => 0,
    }
}

/// How many lattice rooms a `width` x `height` floor holds.
pub(crate) fn fallback_capacity(config: &GeneratorConfig, width: usize, height: usize) -> usize {
    slots_along(config, width) * slots_along(config, height)
}

/// The first `max(min_rooms, 3)` lattice rooms in serpentine order. Returns
/// fewer rooms only when the floor cannot hold them, which configuration
/// validation rules out.
pub(super) fn chain_layout(config: &GeneratorConfig, width: usize, height: usize) -> Vec<RoomRect> {
    let columns = slots_along(config, width);
    let rows = slots_along(config, height);
    let step = lattice_step(config);
    let side = config.min_room_size;

    (0..rows)
        .flat_map(|row| {
            (0..columns).map(move |slot| {
                let column = if row % 2 == 0 { slot } else { columns - 1 - slot };
                RoomRect { x: 1 + column * step, y: 1 + row * step, width: side, height: side }
            })
        })
        .take(config.effective_min_rooms())
        .collect()
}

//! Clear commands applied to the feature group.
//!
//! `clear` empties the group outright; every other command removes the
//! layers its kind predicate selects (see `Command::selects`) and leaves the
//! rest untouched, styles included.

use crate::layers::FeatureGroup;
use geodraw_core::model::Layer;
use geodraw_core::protocol::Command;

/// Apply `command` to `group`, returning the removed layers in group order.
pub fn apply_command(group: &mut FeatureGroup, command: Command) -> Vec<Layer> {
    match command {
        Command::Clear => group.clear_layers(),
        Command::Unknown => Vec::new(),
        cmd => group.remove_where(|layer| cmd.selects(layer.kind())),
    }
}

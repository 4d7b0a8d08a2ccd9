//! Draw surface: the controller between the map's drawing toolbar and the
//! widget model.
//!
//! - **Map → host**: created/edited/deleted interactions update the live
//!   `FeatureGroup` and are announced as `draw:*` notifications.
//! - **Host → map**: `data` replacements reload the group verbatim, and clear
//!   commands filter it by shape kind and write the result back to `data`.
//!
//! The surface moves through `Uninitialized → Active → Detached`. Channel
//! subscriptions are held only while active and are released on teardown or
//! when the surface is dropped.

use crate::commands::apply_command;
use crate::error::SurfaceError;
use crate::host::{Channel, DrawHost};
use crate::layers::FeatureGroup;
use geodraw_core::config::{DrawControlOptions, DrawModel};
use geodraw_core::id::LayerId;
use geodraw_core::model::{LayerEdit, LayerSpec};
use geodraw_core::protocol::{Command, Notification};
use geodraw_core::summary::ShapeSummary;
use serde_json::Value;
use smallvec::SmallVec;

/// Lifecycle phase. There is no way back to `Active` once detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Active,
    Detached,
}

/// When the surface writes the group back to `data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Only after clear commands; interactions leave `data` stale.
    #[default]
    CommandsOnly,
    /// After clear commands and after every interaction event.
    EveryMutation,
}

/// Owns the live feature group and mediates between the map and the model.
pub struct DrawSurface<H: DrawHost> {
    /// Map engine and widget transport.
    host: H,
    /// Current lifecycle phase.
    phase: Phase,
    /// The drawn layers, in insertion order.
    group: FeatureGroup,
    /// Channels currently listened to; empty unless active.
    subscriptions: SmallVec<[Channel; 5]>,
    /// When interactions write back to `data`.
    sync_policy: SyncPolicy,
    /// Options the toolbar was installed with.
    control: Option<DrawControlOptions>,
}

impl<H: DrawHost> DrawSurface<H> {
    /// Create an uninitialized surface over `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            phase: Phase::Uninitialized,
            group: FeatureGroup::new(),
            subscriptions: SmallVec::new(),
            sync_policy: SyncPolicy::default(),
            control: None,
        }
    }

    /// Builder: choose when interactions synchronize back.
    pub fn with_sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Active synchronize-back policy.
    pub fn sync_policy(&self) -> SyncPolicy {
        self.sync_policy
    }

    /// Read-only view of the live feature group.
    pub fn layers(&self) -> &FeatureGroup {
        &self.group
    }

    /// Toolbar options installed by `initialize`, if it has run.
    pub fn control_options(&self) -> Option<&DrawControlOptions> {
        self.control.as_ref()
    }

    /// Channels currently subscribed, in subscription order.
    pub fn subscriptions(&self) -> &[Channel] {
        &self.subscriptions
    }

    /// The host, for inspection.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably (e.g. to drain buffered effects).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Attach an empty feature group, install the toolbar built from
    /// `config`, and subscribe to every channel.
    pub fn initialize(&mut self, config: &DrawModel) -> Result<(), SurfaceError> {
        if self.phase != Phase::Uninitialized {
            return Err(SurfaceError::AlreadyInitialized(self.phase));
        }

        self.group = FeatureGroup::new();
        self.host.add_feature_group();

        let options = config.toolbar_options();
        log::debug!(
            "installing draw control at {} with tools {:?}",
            options.position,
            options.draw.enabled_kinds()
        );
        self.host.install_control(&options);
        self.control = Some(options);

        for channel in Channel::ALL {
            self.host.subscribe(channel);
            self.subscriptions.push(channel);
        }

        self.phase = Phase::Active;
        log::info!("draw surface active");
        Ok(())
    }

    /// Unsubscribe every channel and detach the feature group from the map.
    pub fn teardown(&mut self) -> Result<(), SurfaceError> {
        match self.phase {
            Phase::Active => {
                self.detach();
                Ok(())
            }
            Phase::Uninitialized => Err(SurfaceError::NotInitialized),
            Phase::Detached => Err(SurfaceError::Detached),
        }
    }

    fn detach(&mut self) {
        self.host.remove_feature_group();
        for channel in self.subscriptions.drain(..) {
            self.host.unsubscribe(channel);
        }
        self.phase = Phase::Detached;
        log::info!("draw surface detached");
    }

    fn ensure_listening(&self, channel: Channel) -> Result<(), SurfaceError> {
        match self.phase {
            Phase::Active if self.subscriptions.contains(&channel) => Ok(()),
            Phase::Active | Phase::Detached => {
                log::warn!("rejecting {} on a detached draw surface", channel.name());
                Err(SurfaceError::Detached)
            }
            Phase::Uninitialized => Err(SurfaceError::NotInitialized),
        }
    }

    // ─── Map → host ──────────────────────────────────────────────────────

    /// A shape was drawn. Announces its summary, then adds it to the group.
    pub fn on_created(&mut self, spec: LayerSpec) -> Result<LayerId, SurfaceError> {
        self.ensure_listening(Channel::Created)?;

        let layer = spec.into_layer();
        let id = layer.id;
        self.host.send(Notification::Created {
            geo_json: ShapeSummary::of(&layer.shape),
        });
        self.host.layer_added(&layer);
        self.group.add_layer(layer);
        log::debug!("created layer {id}");

        self.sync_after_interaction();
        Ok(id)
    }

    /// Shapes were edited in place. Applies the new geometry and announces
    /// each edited layer as a full feature. Edits of unknown layers or that
    /// change a layer's kind are skipped. Returns the number applied.
    pub fn on_edited(&mut self, edits: Vec<LayerEdit>) -> Result<usize, SurfaceError> {
        self.ensure_listening(Channel::Edited)?;

        let mut applied = 0;
        for edit in edits {
            let Some(layer) = self.group.get_mut(edit.id) else {
                log::warn!("edited layer {} is not in the feature group", edit.id);
                continue;
            };
            if edit.shape.kind() != layer.kind() {
                log::warn!(
                    "edit of layer {} changes its kind from {} to {}; skipped",
                    edit.id,
                    layer.kind().name(),
                    edit.shape.kind().name()
                );
                continue;
            }
            layer.shape = edit.shape;
            if let Some(style) = edit.style {
                layer.style = style;
            }
            let feature = layer.to_feature();
            self.host.send(Notification::Edited { geo_json: feature });
            applied += 1;
        }

        self.sync_after_interaction();
        Ok(applied)
    }

    /// Shapes were deleted with the toolbar. Removes them and announces each
    /// one's summary. Returns the number removed.
    pub fn on_deleted(&mut self, ids: &[LayerId]) -> Result<usize, SurfaceError> {
        self.ensure_listening(Channel::Deleted)?;

        let mut removed = 0;
        for &id in ids {
            let Some(layer) = self.group.remove_layer(id) else {
                log::warn!("deleted layer {id} is not in the feature group");
                continue;
            };
            self.host.layer_removed(id);
            self.host.send(Notification::Deleted {
                geo_json: ShapeSummary::of(&layer.shape),
            });
            removed += 1;
        }

        self.sync_after_interaction();
        Ok(removed)
    }

    // ─── Host → map ──────────────────────────────────────────────────────

    /// `data` changed on the model: drop every layer and load the new
    /// features in order. Returns the number of layers loaded.
    pub fn replace_data(&mut self, data: &Value) -> Result<usize, SurfaceError> {
        self.ensure_listening(Channel::DataChange)?;

        for layer in self.group.clear_layers() {
            self.host.layer_removed(layer.id);
        }
        let added = match self.group.add_data(data) {
            Ok((added, skipped)) => {
                for e in skipped {
                    log::warn!("skipping feature: {e}");
                }
                added
            }
            Err(e) => {
                log::warn!("ignoring data: {e}");
                0
            }
        };
        for layer in &self.group {
            self.host.layer_added(layer);
        }
        log::debug!("reloaded {added} layers from data");
        Ok(added)
    }

    /// A custom message from the host. Unrecognized messages remove nothing
    /// but still write the group back to `data`.
    pub fn handle_message(&mut self, content: &Value) -> Result<usize, SurfaceError> {
        self.ensure_listening(Channel::CustomMessage)?;
        self.run_command(Command::parse(content))
    }

    /// Apply a clear command, then write the group back to `data`. Returns
    /// the number of layers removed.
    pub fn handle_command(&mut self, command: Command) -> Result<usize, SurfaceError> {
        self.ensure_listening(Channel::CustomMessage)?;
        self.run_command(command)
    }

    fn run_command(&mut self, command: Command) -> Result<usize, SurfaceError> {
        let removed = apply_command(&mut self.group, command);
        for layer in &removed {
            self.host.layer_removed(layer.id);
        }
        log::debug!("{command:?} removed {} layers", removed.len());
        self.sync_back();
        Ok(removed.len())
    }

    /// Serialize the whole group and store it as `data`.
    pub fn sync_back(&mut self) {
        let data = self.group.to_data();
        self.host.save_data(data);
    }

    fn sync_after_interaction(&mut self) {
        if self.sync_policy == SyncPolicy::EveryMutation {
            self.sync_back();
        }
    }
}

impl<H: DrawHost> Drop for DrawSurface<H> {
    fn drop(&mut self) {
        if self.phase == Phase::Active {
            self.detach();
        }
    }
}

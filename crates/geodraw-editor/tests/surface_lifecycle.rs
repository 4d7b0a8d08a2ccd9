//! Integration tests: draw surface lifecycle (initialize, teardown, drop).

mod common;

use common::*;
use geodraw_core::config::DrawModel;
use geodraw_core::protocol::Command;
use geodraw_editor::host::Channel;
use geodraw_editor::surface::{DrawSurface, Phase};
use geodraw_editor::SurfaceError;
use pretty_assertions::assert_eq;
use serde_json::json;

// ─── Initialize ─────────────────────────────────────────────────────────

#[test]
fn initialize_attaches_group_installs_control_and_subscribes() {
    let model = DrawModel::from_json(
        r#"{ "circle": { "shapeOptions": {} }, "rectangle": { "shapeOptions": {} }, "edit": false }"#,
    )
    .unwrap();
    let mut surface = DrawSurface::new(RecordingHost::default());
    assert_eq!(surface.phase(), Phase::Uninitialized);

    surface.initialize(&model).unwrap();

    assert_eq!(surface.phase(), Phase::Active);
    assert!(surface.layers().is_empty());
    let host = surface.host();
    assert!(host.group_attached);
    assert_eq!(host.subscribed, Channel::ALL.to_vec());
    let installed = host.installed.as_ref().unwrap();
    assert_eq!(installed.draw.enabled_kinds(), vec!["circle", "rectangle"]);
    assert!(!installed.edit.edit);
    assert!(installed.edit.remove);
    assert_eq!(surface.control_options(), Some(installed));
}

#[test]
fn circlemarker_tool_is_never_installed() {
    let model = DrawModel::from_json(r#"{ "circlemarker": { "radius": 5 } }"#).unwrap();
    let mut surface = DrawSurface::new(RecordingHost::default());
    surface.initialize(&model).unwrap();

    let installed = surface.host().installed.as_ref().unwrap();
    assert!(installed.draw.circlemarker.is_none());
    assert!(installed.draw.enabled_kinds().is_empty());
}

#[test]
fn initialize_ignores_existing_data() {
    let model = DrawModel::from_json(
        r#"{ "data": [{ "type": "Feature", "geometry": { "type": "Point", "coordinates": [0, 0] }, "properties": {} }] }"#,
    )
    .unwrap();
    let mut surface = DrawSurface::new(RecordingHost::default());
    surface.initialize(&model).unwrap();
    assert!(surface.layers().is_empty());
}

#[test]
fn initialize_twice_is_rejected() {
    let mut surface = active_surface();
    assert_eq!(
        surface.initialize(&DrawModel::default()),
        Err(SurfaceError::AlreadyInitialized(Phase::Active))
    );
    assert_eq!(surface.host().subscribed.len(), 5);
}

#[test]
fn events_before_initialize_are_rejected() {
    let mut surface = DrawSurface::new(RecordingHost::default());
    assert_eq!(
        surface.handle_command(Command::Clear),
        Err(SurfaceError::NotInitialized)
    );
    assert_eq!(
        surface.on_created(marker_spec(0.0, 0.0)),
        Err(SurfaceError::NotInitialized)
    );
    assert!(surface.host().saves.is_empty());
}

// ─── Teardown ───────────────────────────────────────────────────────────

#[test]
fn teardown_releases_every_subscription_and_the_group() {
    let mut surface = active_surface();
    surface.on_created(circle_spec()).unwrap();
    surface.teardown().unwrap();

    assert_eq!(surface.phase(), Phase::Detached);
    assert!(surface.subscriptions().is_empty());
    let host = surface.host();
    assert!(host.subscribed.is_empty());
    assert!(!host.group_attached);
    assert!(host.rendered.is_empty());
}

#[test]
fn commands_after_teardown_are_rejected() {
    let mut surface = active_surface();
    surface.teardown().unwrap();

    assert_eq!(
        surface.handle_message(&json!({ "msg": "clear" })),
        Err(SurfaceError::Detached)
    );
    assert_eq!(
        surface.replace_data(&json!([])),
        Err(SurfaceError::Detached)
    );
    assert_eq!(surface.on_deleted(&[]), Err(SurfaceError::Detached));
    assert!(surface.host().saves.is_empty());
    assert!(surface.host().sent.is_empty());
}

#[test]
fn second_teardown_is_an_error() {
    let mut surface = active_surface();
    surface.teardown().unwrap();
    assert_eq!(surface.teardown(), Err(SurfaceError::Detached));
}

#[test]
fn no_reactivation_after_teardown() {
    let mut surface = active_surface();
    surface.teardown().unwrap();
    assert_eq!(
        surface.initialize(&DrawModel::default()),
        Err(SurfaceError::AlreadyInitialized(Phase::Detached))
    );
}

// ─── Drop ───────────────────────────────────────────────────────────────

/// Host whose unsubscribe calls are observable after the surface is gone.
mod shared {
    use geodraw_core::config::DrawControlOptions;
    use geodraw_core::protocol::Notification;
    use geodraw_editor::host::{Channel, DrawHost};
    use serde_json::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    pub struct Log {
        pub subscribed: Vec<Channel>,
        pub attached: bool,
    }

    pub struct SharedHost(pub Rc<RefCell<Log>>);

    impl DrawHost for SharedHost {
        fn add_feature_group(&mut self) {
            self.0.borrow_mut().attached = true;
        }
        fn remove_feature_group(&mut self) {
            self.0.borrow_mut().attached = false;
        }
        fn install_control(&mut self, _options: &DrawControlOptions) {}
        fn subscribe(&mut self, channel: Channel) {
            self.0.borrow_mut().subscribed.push(channel);
        }
        fn unsubscribe(&mut self, channel: Channel) {
            self.0.borrow_mut().subscribed.retain(|c| *c != channel);
        }
        fn send(&mut self, _notification: Notification) {}
        fn save_data(&mut self, _data: Vec<Value>) {}
    }
}

#[test]
fn dropping_an_active_surface_unsubscribes() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let log = Rc::new(RefCell::new(shared::Log::default()));
    {
        let mut surface = DrawSurface::new(shared::SharedHost(Rc::clone(&log)));
        surface.initialize(&DrawModel::default()).unwrap();
        assert_eq!(log.borrow().subscribed.len(), 5);
        assert!(log.borrow().attached);
    }
    assert!(log.borrow().subscribed.is_empty());
    assert!(!log.borrow().attached);
}

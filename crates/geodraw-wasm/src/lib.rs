//! WASM bridge for geodraw. Exposes the draw surface to the notebook widget.
//!
//! Compiled via `wasm-pack build --target web`. The widget view forwards map
//! events and model changes as JSON strings, then drains the buffered map
//! operations, outbound messages and `data` after each call.

mod host;
mod logger;

pub use host::{BufferedHost, MapOp};

use geodraw_core::config::DrawModel;
use geodraw_core::id::LayerId;
use geodraw_core::model::{LayerEdit, LayerSpec};
use geodraw_editor::surface::{DrawSurface, Phase, SyncPolicy};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Installs the panic hook and console logger when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

/// Raise or lower console log verbosity: `error`, `warn`, `info`, `debug`
/// or `trace`.
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = level
        .parse::<log::LevelFilter>()
        .map_err(|_| js_error(format!("unknown log level {level:?}")))?;
    logger::init(filter);
    Ok(())
}

/// The draw control behind one widget view.
#[wasm_bindgen]
pub struct DrawControl {
    surface: DrawSurface<BufferedHost>,
}

#[wasm_bindgen]
impl DrawControl {
    /// Build and initialize a control from the widget model state.
    /// `syncEveryMutation` writes `data` back after interactions too.
    #[wasm_bindgen(constructor)]
    pub fn new(model_json: &str, sync_every_mutation: Option<bool>) -> Result<DrawControl, JsValue> {
        let model = DrawModel::from_json(model_json).map_err(js_error)?;
        let policy = if sync_every_mutation.unwrap_or(false) {
            SyncPolicy::EveryMutation
        } else {
            SyncPolicy::CommandsOnly
        };
        let mut surface = DrawSurface::new(BufferedHost::default()).with_sync_policy(policy);
        surface.initialize(&model).map_err(js_error)?;
        Ok(Self { surface })
    }

    /// Options the drawing toolbar was built with, as JSON.
    #[wasm_bindgen(js_name = controlOptions)]
    pub fn control_options(&self) -> Result<String, JsValue> {
        to_json(&self.surface.control_options())
    }

    /// `true` until `teardown()`.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.surface.phase() == Phase::Active
    }

    #[wasm_bindgen(js_name = layerCount)]
    pub fn layer_count(&self) -> usize {
        self.surface.layers().len()
    }

    /// A shape was drawn: `{"shape": {...}, "style": {...}}`. Returns the
    /// stamp the page must use for this layer from now on.
    #[wasm_bindgen(js_name = onCreated)]
    pub fn on_created(&mut self, layer_json: &str) -> Result<u32, JsValue> {
        let spec: LayerSpec = serde_json::from_str(layer_json).map_err(js_error)?;
        let id = self.surface.on_created(spec).map_err(js_error)?;
        Ok(id.get())
    }

    /// Shapes were edited: `[{"id": n, "shape": {...}, "style"?: {...}}]`.
    #[wasm_bindgen(js_name = onEdited)]
    pub fn on_edited(&mut self, edits_json: &str) -> Result<usize, JsValue> {
        let edits: Vec<LayerEdit> = serde_json::from_str(edits_json).map_err(js_error)?;
        self.surface.on_edited(edits).map_err(js_error)
    }

    /// Shapes were deleted: `[id, ...]`.
    #[wasm_bindgen(js_name = onDeleted)]
    pub fn on_deleted(&mut self, ids_json: &str) -> Result<usize, JsValue> {
        let ids: Vec<LayerId> = serde_json::from_str(ids_json).map_err(js_error)?;
        self.surface.on_deleted(&ids).map_err(js_error)
    }

    /// The model's `data` changed from the host side.
    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&mut self, data_json: &str) -> Result<usize, JsValue> {
        let data: Value = serde_json::from_str(data_json).map_err(js_error)?;
        self.surface.replace_data(&data).map_err(js_error)
    }

    /// A custom message arrived from the host, e.g. `{"msg": "clear"}`.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&mut self, content_json: &str) -> Result<usize, JsValue> {
        let content: Value = serde_json::from_str(content_json).unwrap_or_else(|e| {
            log::debug!("custom message is not JSON: {e}");
            Value::Null
        });
        self.surface.handle_message(&content).map_err(js_error)
    }

    /// Detach from the map and stop listening.
    pub fn teardown(&mut self) -> Result<(), JsValue> {
        self.surface.teardown().map_err(js_error)
    }

    /// Pending outbound messages as a JSON array.
    #[wasm_bindgen(js_name = takeMessages)]
    pub fn take_messages(&mut self) -> Result<String, JsValue> {
        to_json(&self.surface.host_mut().take_messages())
    }

    /// Pending map operations as a JSON array.
    #[wasm_bindgen(js_name = takeMapOps)]
    pub fn take_map_ops(&mut self) -> Result<String, JsValue> {
        to_json(&self.surface.host_mut().take_map_ops())
    }

    /// Synchronized `data` to store on the model, if any since the last call.
    #[wasm_bindgen(js_name = takeData)]
    pub fn take_data(&mut self) -> Result<Option<String>, JsValue> {
        self.surface
            .host_mut()
            .take_data()
            .map(|data| to_json(&data))
            .transpose()
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

fn js_error(e: impl ToString) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

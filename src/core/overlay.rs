//! Annotation overlay
//!
//! Embeds in a host that owns a [`Viewer`] and a [`Surface`]. The host
//! forwards pointer and key events, calls [`Overlay::viewer_drawn`] after
//! every viewer repaint, and listens for [`OverlayEvent`]s.

use anyhow::Context;

use crate::annotations::edit::EditController;
use crate::annotations::handlers;
use crate::config::{OverlayConfig, Tool};
use crate::domain::{Annotation, ShapeId, ShapeRecord};
use crate::render::RenderPipeline;
use crate::render::surface::Surface;
use crate::session::manager::ToolManager;
use crate::session::messages::{FinishReport, OverlayEvent, PointerMsg};
use crate::session::shortcuts::{self, Command, Key};
use crate::session::state::SessionState;
use crate::viewer::Viewer;

pub type EventCallback = Box<dyn FnMut(&OverlayEvent)>;

pub struct Overlay<V: Viewer, S: Surface> {
    pub(crate) config: OverlayConfig,
    pub(crate) viewer: Option<V>,
    pub(crate) pipeline: Option<RenderPipeline<S>>,
    /// Finalized shapes in creation order
    pub(crate) annotations: Vec<Annotation>,
    next_id: u64,
    pub(crate) tools: ToolManager,
    pub(crate) edit: EditController,
    listeners: Vec<EventCallback>,
    pending: Vec<OverlayEvent>,
}

impl<V: Viewer, S: Surface> Default for Overlay<V, S> {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl<V: Viewer, S: Surface> Overlay<V, S> {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            viewer: None,
            pipeline: None,
            annotations: Vec::new(),
            next_id: 1,
            tools: ToolManager::new(),
            edit: EditController::new(),
            listeners: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Attach the drawing surface; its current content becomes the picture
    /// under the overlay once a baseline is captured
    pub fn set_surface(&mut self, surface: S) {
        self.pipeline = Some(RenderPipeline::new(surface));
        self.render();
    }

    pub fn set_viewer(&mut self, viewer: V) {
        self.viewer = Some(viewer);
        self.tools.reset_navigation();
        self.sync_navigation();
        self.render();
    }

    pub fn viewer(&self) -> Option<&V> {
        self.viewer.as_ref()
    }

    /// Mutable viewer access. Call [`Self::viewer_drawn`] after changing
    /// what the viewer shows.
    pub fn viewer_mut(&mut self) -> Option<&mut V> {
        self.viewer.as_mut()
    }

    pub fn surface(&self) -> Option<&S> {
        self.pipeline.as_ref().map(RenderPipeline::surface)
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.pipeline.as_mut().map(RenderPipeline::surface_mut)
    }

    /// Start a drawing session, aborting any running one
    pub fn set_tool(&mut self, tool: Tool) {
        if let Some(target) = self.edit.reset() {
            handlers::release_editability(self, target);
            // an interrupted drag keeps the anchor where it was left
            if target.dragging {
                self.pending.push(OverlayEvent::ShapeEdited {
                    shape: target.shape,
                    plane: target.plane,
                });
            }
        }
        if let Some(report) = self.tools.begin(tool) {
            self.pending.push(OverlayEvent::SessionFinished(report));
        }
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.ensure_baseline();
        }
        self.sync_navigation();
        self.render();
        self.flush_events();
    }

    /// Start a drawing session from a host tool id ("rectangle", "polygon")
    pub fn set_tool_id(&mut self, id: &str) -> anyhow::Result<()> {
        let tool = id.parse::<Tool>().context("Failed to activate tool")?;
        self.set_tool(tool);
        Ok(())
    }

    /// Abort the running session, restoring viewer navigation
    pub fn unset_tool(&mut self) {
        if let Some(report) = self.tools.abort() {
            self.pending.push(OverlayEvent::SessionFinished(report));
            self.sync_navigation();
            self.render();
        }
        self.flush_events();
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.tools.active_tool()
    }

    pub fn session_state(&self) -> Option<SessionState> {
        self.tools.session().map(|session| session.state())
    }

    /// Register a completion subscriber, called whenever a session ends
    pub fn on_finish(&mut self, callback: impl FnMut(&FinishReport) + 'static) {
        self.tools.subscribe(Box::new(callback));
    }

    /// Register a listener for every overlay notification
    pub fn on_event(&mut self, callback: impl FnMut(&OverlayEvent) + 'static) {
        self.listeners.push(Box::new(callback));
    }

    pub fn handle_pointer(&mut self, msg: PointerMsg) {
        handlers::handle_pointer(self, msg);
        self.sync_navigation();
        self.flush_events();
    }

    pub fn handle_key(&mut self, key: Key) {
        let Some(command) = shortcuts::handle_key_event(key, self.tools.is_active()) else {
            return;
        };
        log::debug!("Key {key:?} -> {command:?}");
        match command {
            Command::UnsetTool => self.unset_tool(),
            Command::SetTool(tool) => self.set_tool(tool),
            Command::ClearCurrentSlice => {
                self.clear_current_slice();
            }
        }
    }

    /// The viewer repainted: recapture the baseline and redraw on top of it.
    /// A hovered or dragged shape that left the view is released.
    pub fn viewer_drawn(&mut self) {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };
        pipeline.capture_baseline();
        self.render();
        handlers::refresh_edit(self);
        self.sync_navigation();
        self.flush_events();
    }

    /// Redraw every visible shape plus the live edit or draft state
    pub fn render(&mut self) {
        handlers::redraw_scene(self);
    }

    /// Finalized shapes in creation order
    pub fn shapes(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_any_editable(&self) -> bool {
        self.tools.is_any_editable()
    }

    pub fn is_editable(&self, shape: ShapeId) -> bool {
        self.tools.is_editable(shape)
    }

    /// Append finalized shapes from records. Unknown types and invalid
    /// geometry are skipped. Returns the number loaded.
    pub fn load_objects(&mut self, records: &[ShapeRecord]) -> usize {
        let mut loaded = 0;
        for record in records {
            match record.to_annotation(ShapeId(self.next_id)) {
                Some(annotation) => {
                    self.next_id += 1;
                    self.annotations.push(annotation);
                    loaded += 1;
                }
                None => log::warn!(
                    "Skipping {} record on {} with {} points",
                    record.kind,
                    record.plane,
                    record.points.len()
                ),
            }
        }
        log::info!("Loaded {loaded} of {} shape records", records.len());
        self.render();
        loaded
    }

    /// Plain records for every finalized shape, in collection order
    pub fn get_objects(&self) -> Vec<ShapeRecord> {
        self.annotations
            .iter()
            .filter_map(Annotation::to_record)
            .collect()
    }

    /// Load records from a JSON array; malformed entries are skipped
    pub fn load_objects_json(&mut self, json: &str) -> anyhow::Result<usize> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(json).context("Shape document is not a JSON array")?;
        let records: Vec<ShapeRecord> = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("Skipping malformed shape record {index}: {err}");
                    None
                }
            })
            .collect();
        Ok(self.load_objects(&records))
    }

    pub fn objects_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.get_objects()).context("Failed to serialize shapes")
    }

    /// Remove every shape shown on its plane's current slice. Does nothing
    /// while a drawing session is active.
    pub fn clear_current_slice(&mut self) -> usize {
        if self.tools.is_active() {
            log::debug!("Not clearing shapes during a drawing session");
            return 0;
        }
        let Some(viewer) = self.viewer.as_ref() else {
            return 0;
        };
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.annotations)
            .into_iter()
            .partition(|a| a.is_on_slice(viewer.current_slice(a.plane)));
        self.annotations = kept;

        for annotation in &removed {
            self.edit.forget(annotation.id);
            self.tools.forget(annotation.id);
        }
        let count = removed.len();
        if count > 0 {
            log::info!("Cleared {count} shapes on current slices");
            self.pending.push(OverlayEvent::ShapesCleared { count });
        }
        self.sync_navigation();
        self.render();
        self.flush_events();
        count
    }

    pub(crate) fn allocate_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn push_event(&mut self, event: OverlayEvent) {
        self.pending.push(event);
    }

    /// Navigation stays off while drawing or while any anchor is editable
    fn sync_navigation(&mut self) {
        let suspend =
            self.tools.is_active() || self.tools.is_any_editable() || self.edit.is_dragging();
        if let Some(viewer) = self.viewer.as_mut() {
            self.tools.sync_navigation(viewer, suspend);
        }
    }

    fn flush_events(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            for listener in &mut self.listeners {
                listener(&event);
            }
        }
    }
}

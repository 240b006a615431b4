//! One editing session.

use std::sync::Arc;

use flowdesk_config::{EditorConfig, ExportFormat};
use flowdesk_core::{CellId, Point};
use flowdesk_export::{
    BackgroundFill, BackgroundImage, BackgroundSpec, CanvasSize, ImageEncoding, ImagePlacement, rasterize,
};
use flowdesk_flow::{
    AttrValue, AttributePath, ContextAction, ContextMenu, Controller, EdgeKind, Graph, Mode, NodeKind, Outcome,
    SerializedGraph, Target, ValidationIssue, snapshot, validate,
};
use flowdesk_storage::{AutoSaveStats, AutoSaver, DirectoryStore, SnapshotStore};

use crate::error::EditorResult;

/// Owns everything one open document needs: the graph with its history, the
/// interaction controller, the store, the autosave task and the uploaded
/// background image.
///
/// Every method that may change the graph hands the new snapshot to the
/// autosave task when the revision moved.
pub struct EditorSession {
    config: EditorConfig,
    graph: Graph,
    controller: Controller,
    store: Arc<dyn SnapshotStore>,
    autosave: Option<AutoSaver>,
    background: Option<BackgroundImage>,
    placement: ImagePlacement,
    scheduled_revision: u64,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("key", &self.config.storage.key)
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("revision", &self.graph.revision())
            .field("autosave", &self.autosave.is_some())
            .field("background", &self.background.as_ref().map(BackgroundImage::format))
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Empty session over `store`.
    ///
    /// The autosave task needs a tokio runtime; without one the session
    /// runs with autosave off.
    pub fn new(config: EditorConfig, store: Arc<dyn SnapshotStore>) -> EditorResult<Self> {
        config.validate()?;
        let autosave = if config.autosave.enabled {
            if tokio::runtime::Handle::try_current().is_ok() {
                Some(AutoSaver::spawn(
                    Arc::clone(&store),
                    config.storage.key.clone(),
                    config.autosave.quiet(),
                ))
            } else {
                tracing::warn!("no tokio runtime, autosave disabled");
                None
            }
        } else {
            None
        };
        Ok(Self {
            graph: Graph::with_history_limit(config.history.limit),
            controller: Controller::new(config.controller_options()),
            store,
            autosave,
            background: None,
            placement: ImagePlacement::default(),
            scheduled_revision: 0,
            config,
        })
    }

    /// Session over `store`, starting from the snapshot saved under the
    /// configured key if there is one.
    pub async fn open(config: EditorConfig, store: Arc<dyn SnapshotStore>) -> EditorResult<Self> {
        let mut session = Self::new(config, store)?;
        if let Some(saved) = session.store.load(session.storage_key()).await? {
            session.graph = saved.into_graph(session.config.history.limit)?;
            session.scheduled_revision = session.graph.revision();
            tracing::info!(
                key = %session.storage_key(),
                nodes = session.graph.node_count(),
                edges = session.graph.edge_count(),
                "session opened from store"
            );
        } else {
            tracing::info!(key = %session.storage_key(), "session opened empty");
        }
        Ok(session)
    }

    /// Session over a [`DirectoryStore`] at `config.storage.dir`.
    pub async fn open_directory(config: EditorConfig) -> EditorResult<Self> {
        let store = Arc::new(DirectoryStore::new(config.storage.dir.clone()));
        Self::open(config, store).await
    }

    // ---- accessors --------------------------------------------------------

    /// The configuration the session was opened with.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Storage key of the document.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.config.storage.key
    }

    /// The graph, read only.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Current placement mode.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        self.controller.mode()
    }

    /// Autosave counters; `None` when autosave is off.
    #[must_use]
    pub fn autosave_stats(&self) -> Option<AutoSaveStats> {
        self.autosave.as_ref().map(AutoSaver::stats)
    }

    /// The uploaded background image.
    #[must_use]
    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    // ---- mutation ---------------------------------------------------------

    /// Run `f` against the graph and controller, then schedule an autosave
    /// if the graph changed.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Graph, &mut Controller) -> R) -> R {
        let result = f(&mut self.graph, &mut self.controller);
        self.graph_changed();
        result
    }

    /// Arm node placement.
    pub fn begin_node_placement(&mut self, kind: NodeKind) {
        self.controller.begin_node_placement(kind);
    }

    /// Arm edge creation.
    pub fn begin_edge(&mut self, kind: EdgeKind) {
        self.controller.begin_edge(kind);
    }

    /// Leave any placement mode.
    pub fn cancel(&mut self) -> bool {
        self.controller.cancel()
    }

    /// Pointer click.
    pub fn click(&mut self, target: Target) -> Outcome {
        self.edit(|graph, controller| controller.click(graph, target))
    }

    /// Keyboard shortcut such as `ctrl+z`.
    pub fn key(&mut self, combo: &str) -> Outcome {
        self.edit(|graph, controller| controller.key(graph, combo))
    }

    /// Open the context menu on `id`.
    pub fn context_click(&mut self, id: &CellId) -> Option<ContextMenu> {
        self.controller.context_click(&mut self.graph, id)
    }

    /// Run a context-menu entry.
    pub fn context_action(&mut self, id: &CellId, action: ContextAction) -> Outcome {
        self.edit(|graph, controller| controller.context_action(graph, id, action))
    }

    /// Start dragging `node`.
    pub fn drag_start(&mut self, node: &CellId, pointer: Point) -> bool {
        self.edit(|graph, controller| controller.drag_start(graph, node, pointer))
    }

    /// Move the dragged node.
    pub fn drag_move(&mut self, pointer: Point) -> bool {
        self.edit(|graph, controller| controller.drag_move(graph, pointer))
    }

    /// Drop the dragged node.
    pub fn drag_end(&mut self) -> bool {
        self.edit(|graph, controller| controller.drag_end(graph))
    }

    /// Write a property from the editor panel.
    pub fn edit_property(&mut self, id: &CellId, path: AttributePath, value: impl Into<AttrValue>) -> bool {
        self.edit(|graph, controller| controller.edit_property(graph, id, path, value))
    }

    /// Place a node directly.
    pub fn add_node(&mut self, kind: NodeKind, position: Point) -> CellId {
        self.edit(|graph, _| graph.add_node(kind, position))
    }

    /// Connect two nodes directly.
    pub fn add_edge(&mut self, source: &CellId, target: &CellId, kind: EdgeKind) -> EditorResult<CellId> {
        Ok(self.edit(|graph, _| graph.add_edge(source, target, kind))?)
    }

    /// Undo the last mutation.
    pub fn undo(&mut self) -> bool {
        self.edit(|graph, _| graph.undo())
    }

    /// Redo the last undone mutation.
    pub fn redo(&mut self) -> bool {
        self.edit(|graph, _| graph.redo())
    }

    fn graph_changed(&mut self) {
        let revision = self.graph.revision();
        if revision == self.scheduled_revision {
            return;
        }
        self.scheduled_revision = revision;
        if let Some(saver) = &self.autosave
            && let Err(e) = saver.schedule(self.graph.to_snapshot())
        {
            tracing::warn!(key = %self.config.storage.key, error = %e, "autosave not scheduled");
        }
    }

    // ---- documents --------------------------------------------------------

    /// Structural problems of the current graph.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate(&self.graph)
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SerializedGraph {
        self.graph.to_snapshot()
    }

    /// The graph as snapshot JSON.
    pub fn export_json(&self) -> EditorResult<String> {
        Ok(snapshot::to_json(&self.graph)?)
    }

    /// Replace the graph with a JSON snapshot. The replacement is one undo
    /// step; on error nothing changes.
    pub fn import_json(&mut self, json: &str) -> EditorResult<()> {
        let parsed = snapshot::parse_json(json)?;
        self.controller.cancel();
        self.graph.replace_with_snapshot(parsed)?;
        self.graph_changed();
        Ok(())
    }

    /// Write the current graph to the store now.
    pub async fn save(&self) -> EditorResult<()> {
        self.store.save(self.storage_key(), &self.graph.to_snapshot()).await?;
        tracing::info!(key = %self.storage_key(), revision = self.graph.revision(), "session saved");
        Ok(())
    }

    /// Replace the graph with what the store holds. `Ok(false)` when the key
    /// is empty; the replacement is one undo step and any pending autosave
    /// of the old graph is dropped.
    pub async fn reload(&mut self) -> EditorResult<bool> {
        let Some(saved) = self.store.load(self.storage_key()).await? else {
            return Ok(false);
        };
        self.controller.cancel();
        self.graph.replace_with_snapshot(saved)?;
        self.scheduled_revision = self.graph.revision();
        // the store already matches the graph; edits made before the reload
        // must not overwrite it
        if let Some(saver) = &self.autosave
            && let Err(e) = saver.discard()
        {
            tracing::warn!(key = %self.config.storage.key, error = %e, "pending autosave not dropped");
        }
        Ok(true)
    }

    /// Write a pending autosave immediately. `Ok(false)` when nothing was
    /// pending or autosave is off.
    pub async fn flush_autosave(&self) -> EditorResult<bool> {
        match &self.autosave {
            Some(saver) => Ok(saver.flush().await?),
            None => Ok(false),
        }
    }

    // ---- background and export -------------------------------------------

    /// Accept an uploaded background image. Anything but PNG or JPEG is
    /// rejected and the current background is kept.
    pub fn set_background(&mut self, bytes: impl Into<Arc<[u8]>>, mime: &str) -> EditorResult<()> {
        let image = BackgroundImage::from_upload(bytes, mime)?;
        tracing::info!(format = ?image.format(), size = image.bytes().len(), "background image set");
        self.background = Some(image);
        Ok(())
    }

    /// Where the background image is drawn.
    pub fn set_background_placement(&mut self, placement: ImagePlacement) {
        self.placement = placement;
    }

    /// Drop the background image.
    pub fn clear_background(&mut self) -> bool {
        self.background.take().is_some()
    }

    /// Background of the configured export color plus the uploaded image.
    #[must_use]
    pub fn background_spec(&self, fill: Option<BackgroundFill>) -> BackgroundSpec {
        let fill = fill.unwrap_or_else(|| BackgroundFill::Solid {
            color: self.config.export.background.clone(),
        });
        let spec = BackgroundSpec {
            fill,
            ..BackgroundSpec::default()
        };
        match &self.background {
            Some(image) => spec.with_image(image.clone(), self.placement),
            None => spec,
        }
    }

    /// Encoding configured in `export.format` / `export.quality`.
    #[must_use]
    pub fn configured_encoding(&self) -> ImageEncoding {
        match self.config.export.format {
            ExportFormat::Png => ImageEncoding::Png,
            ExportFormat::Jpeg => ImageEncoding::Jpeg {
                quality: self.config.export.quality,
            },
        }
    }

    /// Render with the configured canvas, background and encoding.
    pub async fn export(&self) -> EditorResult<Vec<u8>> {
        let size = CanvasSize::new(self.config.canvas.width, self.config.canvas.height)?;
        self.export_with(size, &self.background_spec(None), self.configured_encoding())
            .await
    }

    /// Render with explicit settings.
    pub async fn export_with(
        &self,
        size: CanvasSize,
        background: &BackgroundSpec,
        encoding: ImageEncoding,
    ) -> EditorResult<Vec<u8>> {
        let image = rasterize(&self.graph, size, background).await?;
        Ok(image.encode(encoding)?)
    }

    // ---- lifecycle --------------------------------------------------------

    /// End the session: a pending autosave is discarded and the background
    /// image released.
    pub async fn close(mut self) {
        self.background = None;
        if let Some(saver) = self.autosave.take() {
            saver.shutdown().await;
        }
        tracing::info!(key = %self.config.storage.key, "session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn manual_config() -> EditorConfig {
        let mut config = EditorConfig::default();
        config.autosave.enabled = false;
        config
    }

    #[test]
    fn new_outside_a_runtime_runs_without_autosave() {
        let session = EditorSession::new(EditorConfig::default(), Arc::new(MemoryStore::new())).unwrap();
        assert!(session.autosave_stats().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = manual_config();
        config.export.quality = 0;
        assert!(EditorSession::new(config, Arc::new(MemoryStore::new())).is_err());
    }

    #[test]
    fn placement_through_the_session() {
        let mut session = EditorSession::new(manual_config(), Arc::new(MemoryStore::new())).unwrap();
        session.begin_node_placement(NodeKind::Start);
        assert_eq!(session.mode(), &Mode::PlacingNode(NodeKind::Start));
        let outcome = session.click(Target::Blank(Point::new(200.0, 100.0)));
        let Outcome::NodePlaced(id) = outcome else {
            panic!("expected a placed node, got {outcome:?}");
        };
        assert_eq!(session.graph().node(&id).unwrap().center(), Point::new(200.0, 100.0));
        assert_eq!(session.mode(), &Mode::Idle);
    }

    #[test]
    fn failed_import_keeps_the_graph() {
        let mut session = EditorSession::new(manual_config(), Arc::new(MemoryStore::new())).unwrap();
        session.add_node(NodeKind::Task, Point::ZERO);
        assert!(session.import_json("{ not json").is_err());
        assert_eq!(session.graph().node_count(), 1);
    }

    #[test]
    fn import_is_undoable() {
        let mut source = EditorSession::new(manual_config(), Arc::new(MemoryStore::new())).unwrap();
        let a = source.add_node(NodeKind::Start, Point::ZERO);
        let b = source.add_node(NodeKind::End, Point::new(0.0, 200.0));
        source.add_edge(&a, &b, EdgeKind::Default).unwrap();
        let json = source.export_json().unwrap();

        let mut target = EditorSession::new(manual_config(), Arc::new(MemoryStore::new())).unwrap();
        target.import_json(&json).unwrap();
        assert_eq!(target.snapshot(), source.snapshot());
        assert!(target.validate().is_empty());
        assert!(target.undo());
        assert!(target.graph().is_empty());
    }

    #[test]
    fn rejected_upload_keeps_the_previous_background() {
        let mut session = EditorSession::new(manual_config(), Arc::new(MemoryStore::new())).unwrap();
        let gif = b"GIF89a\x01\x00\x01\x00".to_vec();
        assert!(session.set_background(gif, "image/gif").is_err());
        assert!(session.background().is_none());
        assert!(!session.clear_background());
    }

    #[test]
    fn configured_encoding_follows_the_export_section() {
        let mut config = manual_config();
        config.export.format = ExportFormat::Jpeg;
        config.export.quality = 70;
        let session = EditorSession::new(config, Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(session.configured_encoding(), ImageEncoding::Jpeg { quality: 70 });
        assert_eq!(
            session.background_spec(None).fill,
            BackgroundFill::Solid {
                color: "#ffffff".to_string()
            }
        );
    }
}

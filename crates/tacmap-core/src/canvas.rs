//! Board state and pointer interaction.

use crate::config::BoardConfig;
use crate::coords::{ViewportQuery, map_pointer};
use crate::input::PointerEvent;
use crate::items::{ItemError, ItemId, ItemKind, ItemStore, ItemStyle, ItemTarget, MapItem, RemoveOutcome};
use crate::maps::{MapKey, MapRegistry, default_registry};
use crate::project::ProjectState;
use crate::shapes::{DrawElement, GeometryParams, SerializableColor, ShapeId, ShapeStore};
use crate::tools::{Session, StrokeSettings, ToolKind, ToolManager};
use crate::zoom::Zoom;
use kurbo::{Point, Size};
use thiserror::Error;

/// Errors reported to the user by board actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error("Text cannot be empty")]
    EmptyText,
    #[error("No text input is pending")]
    NoPendingText,
    #[error("Select a map first")]
    NoActiveMap,
    #[error("Unknown map: {0}")]
    UnknownMap(MapKey),
}

pub type BoardResult<T> = Result<T, BoardError>;

/// What a pointer event did to the board.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// Nothing changed.
    Nothing,
    ShapeStarted(ShapeId),
    ShapeExtended(ShapeId),
    DragStarted(ItemId),
    ItemMoved(ItemId),
    EraseStarted,
    Erased { shapes: Vec<ShapeId>, items: Vec<ItemId> },
    /// The host should show a text input; answer with
    /// [`MapBoard::confirm_text`] or [`MapBoard::cancel_text`].
    TextPromptRequested(Point),
    SessionEnded,
}

/// The whole interactive state of the map annotation board.
#[derive(Debug, Clone)]
pub struct MapBoard {
    config: BoardConfig,
    registry: MapRegistry,
    project_name: String,
    active_map: Option<MapKey>,
    shapes: ShapeStore,
    items: ItemStore,
    tools: ToolManager,
    zoom: Zoom,
}

impl Default for MapBoard {
    fn default() -> Self {
        Self::new(BoardConfig::default(), default_registry())
    }
}

impl MapBoard {
    pub fn new(config: BoardConfig, registry: MapRegistry) -> Self {
        let stroke = StrokeSettings {
            color: config.default_color,
            width: config.default_stroke_width,
        };
        Self {
            items: ItemStore::new(config.max_items),
            tools: ToolManager::new(stroke),
            zoom: Zoom::new(config.min_zoom, config.max_zoom, config.zoom_step),
            registry,
            project_name: String::new(),
            active_map: None,
            shapes: ShapeStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn registry(&self) -> &MapRegistry {
        &self.registry
    }

    pub fn geometry_params(&self) -> GeometryParams {
        GeometryParams::from(&self.config)
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
    }

    // --- Maps ---

    pub fn active_map(&self) -> Option<&MapKey> {
        self.active_map.as_ref()
    }

    /// Switch the active map. An empty key deselects.
    pub fn select_map(&mut self, key: &str) -> BoardResult<()> {
        let key = MapKey::from(key);
        if key.is_empty() {
            self.active_map = None;
        } else if self.registry.contains(&key) {
            log::debug!("Active map: {}", key);
            self.active_map = Some(key);
        } else {
            return Err(BoardError::UnknownMap(key));
        }
        self.tools.set_tool(self.tools.current_tool);
        Ok(())
    }

    /// Image reference of the active map's background.
    pub fn background(&self) -> Option<&str> {
        self.registry.image(self.active_map.as_ref()?)
    }

    // --- Tools and stroke ---

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    pub fn session(&self) -> &Session {
        &self.tools.session
    }

    pub fn stroke(&self) -> StrokeSettings {
        self.tools.stroke
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.tools.stroke.color = color;
    }

    /// Ignored unless `width` is positive and finite.
    pub fn set_stroke_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.tools.stroke.width = width;
        } else {
            log::warn!("Ignoring stroke width {}", width);
        }
    }

    // --- Zoom ---

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn set_zoom(&mut self, factor: f64) {
        self.zoom.set(factor);
    }

    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.zoom.reset();
    }

    /// Eraser radius after zoom compensation.
    pub fn eraser_threshold(&self) -> f64 {
        self.zoom.compensate(self.config.eraser_radius)
    }

    // --- Pointer handling ---

    /// Route a pointer event. `Up` may come from outside the canvas.
    pub fn handle_pointer(&mut self, viewport: &impl ViewportQuery, event: PointerEvent) -> InteractionOutcome {
        match event {
            PointerEvent::Down { position, .. } => match map_pointer(viewport, position) {
                Some(point) => self.pointer_down(point),
                None => InteractionOutcome::Nothing,
            },
            PointerEvent::Move { position, .. } => match map_pointer(viewport, position) {
                Some(point) => self.pointer_move(point),
                None => InteractionOutcome::Nothing,
            },
            PointerEvent::Up { .. } => self.pointer_up(),
        }
    }

    /// Press at `point` (percentage space).
    pub fn pointer_down(&mut self, point: Point) -> InteractionOutcome {
        let Some(map) = self.active_map.clone() else {
            return InteractionOutcome::Nothing;
        };
        if matches!(self.tools.session, Session::AwaitingText { .. }) {
            return InteractionOutcome::Nothing;
        }
        // A release we never saw.
        self.tools.end_gesture();

        match self.tools.current_tool {
            ToolKind::Select => {
                let surface = Size::new(self.config.canvas_width, self.config.canvas_height);
                let slop = self.zoom.compensate(self.config.item_hit_radius);
                let hit = self
                    .items
                    .item_at(&map, point, surface, slop)
                    .and_then(|item| Some((item, self.items.get(item)?.position(&map)?)));
                match hit {
                    Some((item, position)) => {
                        let grab = position - point;
                        self.tools.begin(Session::Dragging { map, item, grab });
                        InteractionOutcome::DragStarted(item)
                    }
                    None => InteractionOutcome::Nothing,
                }
            }
            ToolKind::Text => {
                self.tools.begin(Session::AwaitingText { map, origin: point });
                InteractionOutcome::TextPromptRequested(point)
            }
            ToolKind::Eraser => {
                self.tools.begin(Session::Erasing { map });
                InteractionOutcome::EraseStarted
            }
            tool => {
                let Some(kind) = tool.draw_kind() else {
                    return InteractionOutcome::Nothing;
                };
                let stroke = self.tools.stroke;
                match self.shapes.begin_shape(&map, kind, point, stroke.color, stroke.width) {
                    Some(shape) => {
                        self.tools.begin(Session::Drawing { map, shape });
                        InteractionOutcome::ShapeStarted(shape)
                    }
                    None => InteractionOutcome::Nothing,
                }
            }
        }
    }

    /// Move to `point` (percentage space).
    pub fn pointer_move(&mut self, point: Point) -> InteractionOutcome {
        match &self.tools.session {
            Session::Drawing { map, shape } => {
                if self.shapes.extend_shape(map, *shape, point) {
                    InteractionOutcome::ShapeExtended(*shape)
                } else {
                    InteractionOutcome::Nothing
                }
            }
            Session::Dragging { map, item, grab } => {
                let target = point + *grab;
                let target = Point::new(target.x.clamp(0.0, 100.0), target.y.clamp(0.0, 100.0));
                if self.items.move_item(*item, map, target) {
                    InteractionOutcome::ItemMoved(*item)
                } else {
                    InteractionOutcome::Nothing
                }
            }
            Session::Erasing { map } => {
                let threshold = self.zoom.compensate(self.config.eraser_radius);
                let shapes = self.shapes.erase_at(map, point, threshold);
                let items = self.items.erase_near(map, point, threshold);
                if shapes.is_empty() && items.is_empty() {
                    InteractionOutcome::Nothing
                } else {
                    InteractionOutcome::Erased { shapes, items }
                }
            }
            Session::Idle | Session::AwaitingText { .. } => InteractionOutcome::Nothing,
        }
    }

    /// Release. Ends whatever gesture is active.
    pub fn pointer_up(&mut self) -> InteractionOutcome {
        if self.tools.end_gesture().is_idle() {
            InteractionOutcome::Nothing
        } else {
            InteractionOutcome::SessionEnded
        }
    }

    // --- Text prompt ---

    pub fn is_awaiting_text(&self) -> bool {
        matches!(self.tools.session, Session::AwaitingText { .. })
    }

    /// Place the typed text where the prompt was opened.
    ///
    /// Blank text closes the prompt without drawing anything.
    pub fn confirm_text(&mut self, text: &str) -> BoardResult<ShapeId> {
        let (map, origin) = self.tools.take_text_prompt().ok_or(BoardError::NoPendingText)?;
        if text.trim().is_empty() {
            return Err(BoardError::EmptyText);
        }
        let stroke = self.tools.stroke;
        let element = DrawElement::text(origin, text.to_string(), stroke.color, stroke.width);
        self.shapes.push(&map, element).ok_or(BoardError::NoActiveMap)
    }

    /// Close the prompt. Returns whether one was open.
    pub fn cancel_text(&mut self) -> bool {
        self.tools.take_text_prompt().is_some()
    }

    // --- Drawings ---

    /// Drawn elements on the active map.
    pub fn shapes(&self) -> &[DrawElement] {
        match &self.active_map {
            Some(map) => self.shapes.shapes(map),
            None => &[],
        }
    }

    pub fn shape_store(&self) -> &ShapeStore {
        &self.shapes
    }

    /// Remove every drawing on the active map.
    pub fn clear_map(&mut self) -> usize {
        let Some(map) = &self.active_map else {
            return 0;
        };
        let removed = self.shapes.clear_map(map);
        log::info!("Cleared {} drawing(s) on {}", removed, map);
        removed
    }

    // --- Items ---

    pub fn item_store(&self) -> &ItemStore {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&MapItem> {
        self.items.get(id)
    }

    pub fn add_item(
        &mut self,
        kind: ItemKind,
        content: impl Into<String>,
        style: ItemStyle,
        target: ItemTarget,
    ) -> BoardResult<ItemId> {
        let maps: Vec<MapKey> = match target {
            ItemTarget::Map(map) if self.registry.contains(&map) => vec![map],
            ItemTarget::Map(map) if map.is_empty() => return Err(BoardError::NoActiveMap),
            ItemTarget::Map(map) => return Err(BoardError::UnknownMap(map)),
            ItemTarget::AllMaps => self.registry.keys().cloned().collect(),
        };
        Ok(self.items.add(kind, content.into(), style, maps)?)
    }

    pub fn add_label(&mut self, text: impl Into<String>, target: ItemTarget) -> BoardResult<ItemId> {
        self.add_item(ItemKind::Label, text, ItemStyle::default(), target)
    }

    /// Add a logo from an image data URI or reference.
    pub fn add_logo(&mut self, image: impl Into<String>, target: ItemTarget) -> BoardResult<ItemId> {
        self.add_item(ItemKind::Logo, image, ItemStyle::default(), target)
    }

    pub fn style_item(&mut self, id: ItemId, style: ItemStyle) -> BoardResult<()> {
        Ok(self.items.set_style(id, style)?)
    }

    pub fn rename_item(&mut self, id: ItemId, content: &str) -> BoardResult<()> {
        Ok(self.items.rename(id, content)?)
    }

    pub fn delete_item_everywhere(&mut self, id: ItemId) -> bool {
        self.items.remove_everywhere(id)
    }

    /// Take an item off the active map.
    pub fn remove_item_from_map(&mut self, id: ItemId) -> RemoveOutcome {
        match &self.active_map {
            Some(map) => self.items.remove_from_map(id, map),
            None => RemoveOutcome::NotPresent,
        }
    }

    /// Bring an item from another map onto the active one.
    pub fn import_item(&mut self, id: ItemId) -> bool {
        match &self.active_map {
            Some(map) => self.items.import_to_map(id, map),
            None => false,
        }
    }

    pub fn move_item(&mut self, id: ItemId, position: Point) -> bool {
        match &self.active_map {
            Some(map) => self.items.move_item(id, map, position),
            None => false,
        }
    }

    pub fn reset_item_position(&mut self, id: ItemId) -> bool {
        match &self.active_map {
            Some(map) => self.items.reset_position(id, map),
            None => false,
        }
    }

    /// Items placed on the active map.
    pub fn items_visible(&self) -> Vec<&MapItem> {
        match &self.active_map {
            Some(map) => self.items.visible_on(map).collect(),
            None => Vec::new(),
        }
    }

    /// Items that could be imported onto the active map.
    pub fn items_importable(&self) -> Vec<&MapItem> {
        match &self.active_map {
            Some(map) => self.items.importable_to(map).collect(),
            None => Vec::new(),
        }
    }

    /// Label items on the active map.
    pub fn visible_label_count(&self) -> usize {
        self.active_map
            .as_ref()
            .map(|map| self.items.label_count_on(map))
            .unwrap_or(0)
    }

    // --- Persistence ---

    pub fn snapshot_state(&self) -> ProjectState {
        ProjectState {
            name: self.project_name.clone(),
            active_map: self.active_map.clone(),
            drawings: self.shapes.by_map().clone(),
            items: self.items.items().to_vec(),
        }
    }

    /// Replace everything with a loaded project.
    pub fn restore_state(&mut self, state: ProjectState) {
        let active_map = state.active_map.filter(|map| {
            let known = self.registry.contains(map);
            if !known {
                log::warn!("Loaded project refers to unknown map {}", map);
            }
            known
        });
        self.project_name = state.name;
        self.active_map = active_map;
        self.shapes = ShapeStore::from_map(state.drawings);
        self.items.replace_all(state.items);
        self.tools.set_tool(self.tools.current_tool);
        log::info!(
            "Restored project '{}': {} drawing(s), {} item(s)",
            self.project_name,
            self.shapes.len(),
            self.items.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::DEFAULT_ITEM_POSITION;
    use crate::shapes::DrawKind;
    use kurbo::Rect;

    fn board_on(map: &str) -> MapBoard {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut board = MapBoard::default();
        board.select_map(map).unwrap();
        board
    }

    fn alpine() -> MapKey {
        MapKey::from("Alpine")
    }

    #[test]
    fn test_no_map_is_a_no_op() {
        let mut board = MapBoard::default();
        board.set_tool(ToolKind::Line);
        assert_eq!(board.pointer_down(Point::new(10.0, 10.0)), InteractionOutcome::Nothing);
        assert_eq!(board.pointer_move(Point::new(20.0, 20.0)), InteractionOutcome::Nothing);
        assert_eq!(board.pointer_up(), InteractionOutcome::Nothing);
        assert!(board.shape_store().is_empty());
        assert_eq!(board.clear_map(), 0);
        assert!(board.items_visible().is_empty());
    }

    #[test]
    fn test_unknown_map_rejected() {
        let mut board = board_on("Alpine");
        assert_eq!(board.select_map("Atlantis"), Err(BoardError::UnknownMap("Atlantis".into())));
        assert_eq!(board.active_map(), Some(&alpine()));
        board.select_map("").unwrap();
        assert!(board.active_map().is_none());
    }

    #[test]
    fn test_draw_line_gesture() {
        let mut board = board_on("Bermuda");
        board.set_tool(ToolKind::Line);
        let InteractionOutcome::ShapeStarted(id) = board.pointer_down(Point::new(10.0, 10.0)) else {
            panic!("expected a shape");
        };
        board.pointer_move(Point::new(15.0, 12.0));
        assert_eq!(board.pointer_move(Point::new(30.0, 40.0)), InteractionOutcome::ShapeExtended(id));
        assert_eq!(board.pointer_up(), InteractionOutcome::SessionEnded);
        // Moves after release do nothing.
        assert_eq!(board.pointer_move(Point::new(90.0, 90.0)), InteractionOutcome::Nothing);

        let line = &board.shapes()[0];
        assert_eq!(line.kind, DrawKind::Line);
        assert!((line.w - 20.0).abs() < 1e-9);
        assert!((line.h - 30.0).abs() < 1e-9);
        assert_eq!(line.color, board.config().default_color);
    }

    #[test]
    fn test_handle_pointer_maps_client_coordinates() {
        let mut board = board_on("Solara");
        board.set_tool(ToolKind::Freehand);
        let rect = Rect::new(0.0, 0.0, 800.0, 450.0);
        board.handle_pointer(&rect, PointerEvent::down(80.0, 45.0));
        board.handle_pointer(&rect, PointerEvent::moved(900.0, 90.0).into_touch());
        board.handle_pointer(&rect, PointerEvent::up());
        let pen = &board.shapes()[0];
        assert_eq!(pen.points, vec![Point::new(10.0, 10.0), Point::new(100.0, 20.0)]);
    }

    #[test]
    fn test_drag_then_import() {
        let mut board = board_on("Alpine");
        let id = board.add_label("Team Alpha", ItemTarget::Map(alpine())).unwrap();

        board.set_tool(ToolKind::Select);
        assert_eq!(board.pointer_down(DEFAULT_ITEM_POSITION), InteractionOutcome::DragStarted(id));
        assert_eq!(board.pointer_move(Point::new(20.0, 30.0)), InteractionOutcome::ItemMoved(id));
        board.pointer_up();

        board.select_map("Bermuda").unwrap();
        assert!(board.import_item(id));

        let positions = &board.item(id).unwrap().positions;
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[&alpine()], Point::new(20.0, 30.0));
        assert_eq!(positions[&MapKey::from("Bermuda")], DEFAULT_ITEM_POSITION);
    }

    #[test]
    fn test_press_on_label_edge_starts_drag() {
        let mut board = board_on("Alpine");
        let id = board.add_label("Team Alpha", ItemTarget::Map(alpine())).unwrap();
        board.set_tool(ToolKind::Select);
        assert_eq!(board.pointer_down(Point::new(53.8, 50.0)), InteractionOutcome::DragStarted(id));
        board.pointer_up();
        assert_eq!(board.pointer_down(Point::new(60.0, 50.0)), InteractionOutcome::Nothing);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut board = board_on("Alpine");
        let id = board.add_label("Team Alpha", ItemTarget::Map(alpine())).unwrap();
        board.set_tool(ToolKind::Select);
        board.pointer_down(Point::new(53.0, 51.0));
        assert_eq!(board.pointer_move(Point::new(53.0, 51.0)), InteractionOutcome::ItemMoved(id));
        assert_eq!(board.item(id).unwrap().position(&alpine()), Some(DEFAULT_ITEM_POSITION));

        board.pointer_move(Point::new(63.0, 61.0));
        assert_eq!(board.item(id).unwrap().position(&alpine()), Some(Point::new(60.0, 60.0)));

        // The item stays on the canvas when the grab would push it off.
        board.pointer_move(Point::new(100.0, 100.0));
        assert_eq!(board.item(id).unwrap().position(&alpine()), Some(Point::new(97.0, 99.0)));
        board.pointer_move(Point::new(1.0, 0.0));
        assert_eq!(board.item(id).unwrap().position(&alpine()), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_draw_tools_never_drag_items() {
        let mut board = board_on("Alpine");
        let id = board.add_label("A", ItemTarget::Map(alpine())).unwrap();
        board.set_tool(ToolKind::Rect);
        board.pointer_down(DEFAULT_ITEM_POSITION);
        board.pointer_move(Point::new(70.0, 70.0));
        board.pointer_up();
        assert_eq!(board.item(id).unwrap().position(&alpine()), Some(DEFAULT_ITEM_POSITION));
        assert_eq!(board.shapes().len(), 1);
    }

    #[test]
    fn test_eraser_deletes_whole_freehand() {
        let mut board = board_on("Kalahari");
        board.set_tool(ToolKind::Freehand);
        let samples = [(10.0, 10.0), (20.0, 10.0), (30.0, 10.0), (40.0, 10.0), (50.0, 10.0)];
        board.pointer_down(Point::new(samples[0].0, samples[0].1));
        for (x, y) in &samples[1..] {
            board.pointer_move(Point::new(*x, *y));
        }
        board.pointer_up();
        assert_eq!(board.shapes()[0].points.len(), 5);

        board.set_tool(ToolKind::Eraser);
        assert_eq!(board.pointer_down(Point::new(0.0, 90.0)), InteractionOutcome::EraseStarted);
        let outcome = board.pointer_move(Point::new(30.0, 10.5));
        assert!(matches!(outcome, InteractionOutcome::Erased { ref shapes, .. } if shapes.len() == 1));
        assert!(board.shapes().is_empty());
    }

    #[test]
    fn test_eraser_threshold_follows_zoom() {
        let mut board = board_on("Alpine");
        board.set_zoom(2.0);
        assert!((board.eraser_threshold() - 1.5).abs() < 1e-9);

        board.set_tool(ToolKind::Rect);
        board.pointer_down(Point::new(20.0, 20.0));
        board.pointer_up();

        board.set_tool(ToolKind::Eraser);
        board.pointer_down(Point::new(0.0, 0.0));
        // 2 units away: outside 1.5, inside 3.
        assert_eq!(board.pointer_move(Point::new(22.0, 20.0)), InteractionOutcome::Nothing);
        assert_eq!(board.shapes().len(), 1);
        assert!(matches!(board.pointer_move(Point::new(21.0, 20.0)), InteractionOutcome::Erased { .. }));
        assert!(board.shapes().is_empty());
    }

    #[test]
    fn test_eraser_removes_items_on_current_map_only() {
        let mut board = board_on("Alpine");
        let id = board.add_label("A", ItemTarget::AllMaps).unwrap();
        board.set_tool(ToolKind::Eraser);
        board.pointer_down(Point::ZERO);
        let outcome = board.pointer_move(DEFAULT_ITEM_POSITION);
        assert_eq!(outcome, InteractionOutcome::Erased { shapes: vec![], items: vec![id] });
        let item = board.item(id).unwrap();
        assert!(!item.is_visible_on(&alpine()));
        assert!(item.is_visible_on(&"Bermuda".into()));
    }

    #[test]
    fn test_text_prompt_flow() {
        let mut board = board_on("Purgatory");
        board.set_tool(ToolKind::Text);
        let at = Point::new(40.0, 60.0);
        assert_eq!(board.pointer_down(at), InteractionOutcome::TextPromptRequested(at));
        board.pointer_up();
        assert!(board.is_awaiting_text());

        let id = board.confirm_text("Rotate north").unwrap();
        let text = &board.shapes()[0];
        assert_eq!(text.id, id);
        assert_eq!(text.kind, DrawKind::Text);
        assert_eq!(text.origin(), at);
        assert_eq!(text.text.as_deref(), Some("Rotate north"));
        assert_eq!(board.confirm_text("again"), Err(BoardError::NoPendingText));
    }

    #[test]
    fn test_blank_or_cancelled_text_draws_nothing() {
        let mut board = board_on("Purgatory");
        board.set_tool(ToolKind::Text);
        board.pointer_down(Point::new(5.0, 5.0));
        assert_eq!(board.confirm_text("   "), Err(BoardError::EmptyText));
        board.pointer_down(Point::new(5.0, 5.0));
        assert!(board.cancel_text());
        assert!(!board.cancel_text());
        assert!(board.shapes().is_empty());
    }

    #[test]
    fn test_item_cap_reports_limit() {
        let mut board = board_on("Alpine");
        for i in 0..board.config().max_items {
            board.add_label(format!("Team {i}"), ItemTarget::Map(alpine())).unwrap();
        }
        let err = board.add_label("One more", ItemTarget::Map(alpine())).unwrap_err();
        assert_eq!(err, BoardError::Item(ItemError::LimitReached(25)));
        assert_eq!(err.to_string(), "Item limit reached: at most 25 items can be placed");
        assert_eq!(board.item_store().len(), 25);
    }

    #[test]
    fn test_add_to_all_maps() {
        let mut board = board_on("Alpine");
        let id = board.add_logo("data:image/png;base64,AAAA", ItemTarget::AllMaps).unwrap();
        assert_eq!(board.item(id).unwrap().positions.len(), board.registry().len());
        assert!(board.items_importable().is_empty());
    }

    #[test]
    fn test_remove_from_map_and_reset() {
        let mut board = board_on("Alpine");
        let id = board.add_label("A", ItemTarget::Map(alpine())).unwrap();
        assert!(board.move_item(id, Point::new(1.0, 2.0)));
        assert!(board.reset_item_position(id));
        assert_eq!(board.item(id).unwrap().position(&alpine()), Some(DEFAULT_ITEM_POSITION));
        assert_eq!(board.remove_item_from_map(id), RemoveOutcome::Purged);
        assert!(board.item(id).is_none());
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut board = board_on("Alpine");
        board.set_project_name("Scrims");
        board.set_tool(ToolKind::Arrow);
        board.pointer_down(Point::new(10.0, 10.0));
        board.pointer_move(Point::new(30.0, 35.0));
        board.pointer_up();
        board.add_label("A", ItemTarget::AllMaps).unwrap();

        let state = board.snapshot_state();
        let mut other = MapBoard::default();
        other.restore_state(ProjectState::from_json(&state.to_json().unwrap()).unwrap());
        assert_eq!(other.snapshot_state(), state);
        assert_eq!(other.project_name(), "Scrims");
    }

    #[test]
    fn test_switching_map_ends_session() {
        let mut board = board_on("Alpine");
        board.set_tool(ToolKind::Freehand);
        board.pointer_down(Point::new(10.0, 10.0));
        board.select_map("Bermuda").unwrap();
        assert!(board.session().is_idle());
        assert_eq!(board.pointer_move(Point::new(20.0, 20.0)), InteractionOutcome::Nothing);
    }
}

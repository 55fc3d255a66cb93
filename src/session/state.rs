use std::fmt;
use std::path::Path;

use eframe::egui;

use super::assignment::{Assignment, AssignTarget, LoadReport, ordered};
use super::readout::{ReadoutTable, VoxelReadout};
use super::{Result, SessionError};
use crate::compose::{Compositor, FramePair};
use crate::config::ViewerConfig;
use crate::formats::{ArrayReader, DefaultReader};
use crate::model::{
    Colormap, ItemInfo, Layer, LogitsItem, ModelError, Palette, SegmentationItem, VolumeItem,
};
use crate::viewport::{PointerButton, ViewportController, VoxelPosition, WheelAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogitsSide {
    Left,
    Right,
}

impl LogitsSide {
    pub const ALL: [LogitsSide; 2] = [LogitsSide::Left, LogitsSide::Right];

    fn index(self) -> usize {
        match self {
            LogitsSide::Left => 0,
            LogitsSide::Right => 1,
        }
    }

    fn other(self) -> Self {
        match self {
            LogitsSide::Left => LogitsSide::Right,
            LogitsSide::Right => LogitsSide::Left,
        }
    }
}

/// Keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    PreviousSlice,
    NextSlice,
    PreviousClass,
    NextClass,
}

/// Owns every loaded item plus the slice, class, cursor and viewport state,
/// and applies UI events to them one at a time.
///
/// `generation` increases on every change that alters the rendered frames.
pub struct InteractionSession {
    config: ViewerConfig,
    palette: Palette,
    reader: Box<dyn ArrayReader>,
    volume: Option<VolumeItem>,
    segmentation: Option<SegmentationItem>,
    logits: [Option<LogitsItem>; 2],
    slice: usize,
    current_class: usize,
    cursor: VoxelPosition,
    logits_visible: bool,
    logits_opacity: f32,
    colormap: Colormap,
    viewport: ViewportController,
    generation: u64,
}

impl fmt::Debug for InteractionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionSession")
            .field("volume", &self.volume.as_ref().map(|item| item.name().to_string()))
            .field(
                "segmentation",
                &self.segmentation.as_ref().map(|item| item.name().to_string()),
            )
            .field(
                "logits",
                &self
                    .logits
                    .iter()
                    .map(|item| item.as_ref().map(|item| item.name().to_string()))
                    .collect::<Vec<_>>(),
            )
            .field("slice", &self.slice)
            .field("current_class", &self.current_class)
            .field("cursor", &self.cursor)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Default for InteractionSession {
    fn default() -> Self {
        Self::new(ViewerConfig::default(), DefaultReader)
    }
}

impl InteractionSession {
    pub fn new(config: ViewerConfig, reader: impl ArrayReader + 'static) -> Self {
        Self {
            palette: Palette::default(),
            reader: Box::new(reader),
            volume: None,
            segmentation: None,
            logits: [None, None],
            slice: 0,
            current_class: 0,
            cursor: VoxelPosition::default(),
            logits_visible: true,
            logits_opacity: config.logits_opacity,
            colormap: config.colormap,
            viewport: ViewportController::new(config.zoom),
            generation: 0,
            config,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn volume(&self) -> Option<&VolumeItem> {
        self.volume.as_ref()
    }

    pub fn segmentation(&self) -> Option<&SegmentationItem> {
        self.segmentation.as_ref()
    }

    pub fn logits(&self, side: LogitsSide) -> Option<&LogitsItem> {
        self.logits[side.index()].as_ref()
    }

    pub fn has_logits(&self) -> bool {
        self.logits.iter().any(Option::is_some)
    }

    pub fn slice(&self) -> usize {
        self.slice
    }

    pub fn current_class(&self) -> usize {
        self.current_class
    }

    pub fn cursor(&self) -> VoxelPosition {
        self.cursor
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    pub fn logits_opacity(&self) -> f32 {
        self.logits_opacity
    }

    pub fn logits_visible(&self) -> bool {
        self.logits_visible
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    /// Classes selectable right now: the smaller logits class count, or the
    /// configured count before any logits are loaded.
    pub fn num_classes(&self) -> usize {
        self.logits
            .iter()
            .flatten()
            .map(LogitsItem::num_classes)
            .min()
            .unwrap_or(self.config.num_classes)
    }

    fn require_volume(&self, operation: &'static str) -> Result<&VolumeItem> {
        self.volume.as_ref().ok_or(SessionError::NotReady(operation))
    }

    // ---- loading ----

    pub fn load_volume(&mut self, path: &Path) -> Result<()> {
        let raw = self
            .reader
            .read_volume(path)
            .map_err(|source| SessionError::Unloadable {
                path: path.to_path_buf(),
                source,
            })?;
        let item = VolumeItem::with_window(raw, ItemInfo::from_path(path), self.config.window)?;
        self.install_volume(item);
        Ok(())
    }

    pub fn load_dummy(&mut self, shape: [usize; 3]) -> Result<()> {
        let item = VolumeItem::from_dummy(shape)?;
        self.install_volume(item);
        Ok(())
    }

    /// Replaces the volume, keeps overlays of the same shape and drops the
    /// rest. The last slice becomes active.
    pub fn install_volume(&mut self, item: VolumeItem) {
        let shape = item.shape();
        log::info!("loaded volume {} with shape {:?}", item.name(), shape);

        if self
            .segmentation
            .as_ref()
            .is_some_and(|segmentation| segmentation.shape() != shape)
        {
            if let Some(dropped) = self.segmentation.take() {
                log::warn!(
                    "dropping segmentation {}: shape {:?} no longer matches",
                    dropped.name(),
                    dropped.shape()
                );
            }
        }
        for slot in &mut self.logits {
            if slot.as_ref().is_some_and(|logits| logits.shape() != shape) {
                if let Some(dropped) = slot.take() {
                    log::warn!(
                        "dropping logits {}: shape {:?} no longer matches",
                        dropped.name(),
                        dropped.shape()
                    );
                }
            }
        }

        self.slice = item.depth().saturating_sub(1);
        self.viewport
            .set_image_size(Some([item.height(), item.width()]));
        self.volume = Some(item);
        self.clamp_cursor();
        if self.current_class >= self.num_classes() {
            self.current_class = 0;
        }
        self.touch();
    }

    pub fn load_segmentation(&mut self, path: &Path) -> Result<()> {
        let shape = self.require_volume("loading a segmentation")?.shape();
        let labels = self
            .reader
            .read_volume(path)
            .map_err(|source| SessionError::Unloadable {
                path: path.to_path_buf(),
                source,
            })?;
        let mut item =
            SegmentationItem::load(labels, ItemInfo::from_path(path), shape, &self.palette)?;
        item.set_opacity(self.config.segmentation_opacity);
        self.install_segmentation(item);
        Ok(())
    }

    pub fn install_segmentation(&mut self, item: SegmentationItem) {
        log::info!(
            "loaded segmentation {} with {} classes",
            item.name(),
            item.num_classes()
        );
        self.segmentation = Some(item);
        self.touch();
    }

    pub fn load_logits(&mut self, path: &Path, side: LogitsSide) -> Result<()> {
        let shape = self.require_volume("loading logits")?.shape();
        let raw = self
            .reader
            .read_logits(path)
            .map_err(|source| SessionError::Unloadable {
                path: path.to_path_buf(),
                source,
            })?;
        let item = LogitsItem::load(
            raw,
            ItemInfo::from_path(path),
            shape,
            self.colormap,
            &self.palette,
        )?;
        self.install_logits(item, side)
    }

    /// Places `item` on `side`, and on the other side too while that one is
    /// empty. The current class is then re-applied to both sides, falling
    /// back to class 0 when the new file has fewer classes.
    pub fn install_logits(&mut self, mut item: LogitsItem, side: LogitsSide) -> Result<()> {
        log::info!(
            "loaded logits {} ({} classes) on the {:?} side",
            item.name(),
            item.num_classes(),
            side
        );
        item.set_visible(self.logits_visible);
        if item.colormap() != self.colormap {
            item.set_colormap(self.colormap);
        }
        let other = side.other().index();
        if self.logits[other].is_none() {
            self.logits[other] = Some(item.clone());
        }
        self.logits[side.index()] = Some(item);

        if self.current_class >= self.num_classes() {
            self.current_class = 0;
        }
        self.apply_class(self.current_class)?;
        self.touch();
        Ok(())
    }

    /// Loads in priority order (volume, segmentation, left, right). A failed
    /// load is reported and the remaining ones still run.
    pub fn apply_assignments(&mut self, assignments: Vec<Assignment>) -> Vec<LoadReport> {
        ordered(assignments)
            .into_iter()
            .map(|assignment| {
                let path = assignment.path.as_path();
                let result = match assignment.target {
                    AssignTarget::Volume => self.load_volume(path),
                    AssignTarget::Segmentation => self.load_segmentation(path),
                    AssignTarget::LogitsLeft => self.load_logits(path, LogitsSide::Left),
                    AssignTarget::LogitsRight => self.load_logits(path, LogitsSide::Right),
                };
                if let Err(error) = &result {
                    log::warn!("{}: {error}", assignment.path.display());
                }
                LoadReport { assignment, result }
            })
            .collect()
    }

    // ---- slice and class navigation ----

    /// Clamps into `[0, depth - 1]` and returns the slice now active.
    pub fn set_slice(&mut self, slice: usize) -> Result<usize> {
        let depth = self.require_volume("changing slice")?.depth();
        let slice = slice.min(depth.saturating_sub(1));
        if slice != self.slice {
            self.slice = slice;
            self.touch();
        }
        Ok(slice)
    }

    pub fn step_slice(&mut self, delta: i32) -> Result<usize> {
        let target = if delta < 0 {
            self.slice.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.slice.saturating_add(delta as usize)
        };
        self.set_slice(target)
    }

    pub fn set_class(&mut self, class: usize) -> Result<()> {
        let count = self.num_classes();
        if class >= count {
            log::debug!("rejected class {class}, {count} available");
            return Err(ModelError::ClassOutOfRange { class, count }.into());
        }
        self.apply_class(class)?;
        self.touch();
        Ok(())
    }

    fn apply_class(&mut self, class: usize) -> Result<()> {
        for logits in self.logits.iter_mut().flatten() {
            logits.set_class(class)?;
        }
        self.current_class = class;
        Ok(())
    }

    pub fn previous_class(&mut self) -> Result<()> {
        if self.current_class == 0 {
            return Ok(());
        }
        self.set_class(self.current_class - 1)
    }

    pub fn next_class(&mut self) -> Result<()> {
        if self.current_class + 1 >= self.num_classes() {
            return Ok(());
        }
        self.set_class(self.current_class + 1)
    }

    pub fn handle_key(&mut self, command: KeyCommand) -> Result<()> {
        match command {
            KeyCommand::PreviousSlice => self.step_slice(-1).map(|_| ()),
            KeyCommand::NextSlice => self.step_slice(1).map(|_| ()),
            KeyCommand::PreviousClass => self.previous_class(),
            KeyCommand::NextClass => self.next_class(),
        }
    }

    // ---- controls ----

    pub fn set_window_min(&mut self, min: i32) -> Result<()> {
        let volume = self.volume.as_mut().ok_or(SessionError::NotReady("windowing"))?;
        volume.set_window_min(min).inspect_err(|error| {
            log::debug!("rejected window change: {error}");
        })?;
        self.touch();
        Ok(())
    }

    pub fn set_window_max(&mut self, max: i32) -> Result<()> {
        let volume = self.volume.as_mut().ok_or(SessionError::NotReady("windowing"))?;
        volume.set_window_max(max).inspect_err(|error| {
            log::debug!("rejected window change: {error}");
        })?;
        self.touch();
        Ok(())
    }

    pub fn set_window(&mut self, min: i32, max: i32) -> Result<()> {
        let volume = self.volume.as_mut().ok_or(SessionError::NotReady("windowing"))?;
        volume.set_window(min, max).inspect_err(|error| {
            log::debug!("rejected window change: {error}");
        })?;
        self.touch();
        Ok(())
    }

    pub fn set_segmentation_opacity(&mut self, opacity: f32) -> Result<()> {
        let segmentation = self
            .segmentation
            .as_mut()
            .ok_or(SessionError::MissingLayer("segmentation"))?;
        segmentation.set_opacity(opacity);
        self.touch();
        Ok(())
    }

    pub fn set_segmentation_visible(&mut self, visible: bool) -> Result<()> {
        let segmentation = self
            .segmentation
            .as_mut()
            .ok_or(SessionError::MissingLayer("segmentation"))?;
        segmentation.set_visible(visible);
        self.touch();
        Ok(())
    }

    /// Shared by both sides.
    pub fn set_logits_opacity(&mut self, opacity: f32) {
        if !opacity.is_finite() {
            return;
        }
        self.logits_opacity = opacity.clamp(0.0, 1.0);
        self.touch();
    }

    /// Shared by both sides, and applied to logits loaded later.
    pub fn set_logits_visible(&mut self, visible: bool) {
        self.logits_visible = visible;
        for logits in self.logits.iter_mut().flatten() {
            logits.set_visible(visible);
        }
        self.touch();
    }

    pub fn set_threshold_low(&mut self, side: LogitsSide, low: i32) -> Result<()> {
        let logits = self.logits[side.index()]
            .as_mut()
            .ok_or(SessionError::MissingLayer("logits"))?;
        logits.set_threshold_low(low).inspect_err(|error| {
            log::debug!("rejected {side:?} threshold change: {error}");
        })?;
        self.touch();
        Ok(())
    }

    pub fn set_threshold_high(&mut self, side: LogitsSide, high: i32) -> Result<()> {
        let logits = self.logits[side.index()]
            .as_mut()
            .ok_or(SessionError::MissingLayer("logits"))?;
        logits.set_threshold_high(high).inspect_err(|error| {
            log::debug!("rejected {side:?} threshold change: {error}");
        })?;
        self.touch();
        Ok(())
    }

    /// Recolors every class of both sides.
    pub fn set_colormap(&mut self, colormap: Colormap) {
        if colormap == self.colormap {
            return;
        }
        self.colormap = colormap;
        for logits in self.logits.iter_mut().flatten() {
            logits.set_colormap(colormap);
        }
        self.touch();
    }

    // ---- pointer ----

    pub fn pointer_down(&mut self, button: PointerButton, position: egui::Pos2) {
        self.viewport.pointer_down(button, position);
    }

    pub fn pointer_up(&mut self) {
        self.viewport.pointer_up();
    }

    /// Pans while dragging and moves the readout cursor.
    pub fn pointer_move(&mut self, position: egui::Pos2) -> Option<VoxelPosition> {
        let voxel = self.viewport.pointer_move(position)?;
        self.cursor = voxel;
        Some(voxel)
    }

    pub fn wheel(&mut self, delta: f32, zoom_modifier: bool, anchor: egui::Pos2) -> WheelAction {
        let action = self.viewport.wheel(delta, zoom_modifier, anchor);
        if let WheelAction::SliceStep(step) = action {
            if let Err(error) = self.step_slice(step) {
                log::debug!("wheel ignored: {error}");
            }
        }
        action
    }

    fn clamp_cursor(&mut self) {
        if let Some(volume) = &self.volume {
            self.cursor.row = self.cursor.row.min(volume.height().saturating_sub(1));
            self.cursor.col = self.cursor.col.min(volume.width().saturating_sub(1));
        }
    }

    // ---- output ----

    /// Composites the active slice. Without a volume this is `NotReady`.
    pub fn render(&self) -> Result<FramePair> {
        let volume = self.require_volume("rendering")?;
        Compositor::new(volume)
            .with_segmentation(self.segmentation.as_ref())
            .with_logits(
                self.logits(LogitsSide::Left),
                self.logits(LogitsSide::Right),
                self.logits_opacity,
            )
            .render(self.slice)
            .ok_or(SessionError::NotReady("rendering"))
    }

    pub fn readout(&self) -> Option<VoxelReadout> {
        let volume = self.volume.as_ref()?;
        let (depth, row, col) = (self.slice, self.cursor.row, self.cursor.col);
        let side_values = |side: LogitsSide| {
            self.logits(side)
                .and_then(|logits| logits.class_values(depth, row, col))
        };
        Some(VoxelReadout {
            depth,
            row,
            col,
            intensity: volume.intensity(depth, row, col)?,
            label: self
                .segmentation
                .as_ref()
                .and_then(|segmentation| segmentation.label(depth, row, col)),
            left: side_values(LogitsSide::Left),
            right: side_values(LogitsSide::Right),
        })
    }

    pub fn readout_table(&self) -> ReadoutTable {
        match self.readout() {
            Some(readout) => ReadoutTable::from_readout(&readout, self.config.num_classes),
            None => ReadoutTable::zeros(self.config.num_classes),
        }
    }
}

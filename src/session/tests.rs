use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eframe::egui::pos2;
use ndarray::{Array3, Array4, ArrayD};

use super::{
    AssignTarget, Assignment, CellTone, InteractionSession, KeyCommand, LogitsSide, ReadoutColumn,
    ReadoutTable, SessionError, VoxelReadout,
};
use crate::config::ViewerConfig;
use crate::formats::{IoError, LogitsReader, VolumeReader};
use crate::model::{Colormap, Layer, LoadOutcome, ModelError, PALETTE, Window};
use crate::viewport::{PointerButton, WheelAction};

/// Serves arrays registered by path; anything else is unreadable.
#[derive(Default)]
struct MemoryReader {
    volumes: HashMap<PathBuf, Array3<i32>>,
    logits: HashMap<PathBuf, ArrayD<f32>>,
}

impl MemoryReader {
    fn volume(mut self, path: &str, data: Array3<i32>) -> Self {
        self.volumes.insert(PathBuf::from(path), data);
        self
    }

    fn logits(mut self, path: &str, data: Array4<f32>) -> Self {
        self.logits.insert(PathBuf::from(path), data.into_dyn());
        self
    }
}

impl VolumeReader for MemoryReader {
    fn read_volume(&self, path: &Path) -> crate::formats::Result<Array3<i32>> {
        self.volumes
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))
    }
}

impl LogitsReader for MemoryReader {
    fn read_logits(&self, path: &Path) -> crate::formats::Result<ArrayD<f32>> {
        self.logits
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))
    }
}

fn ramp_logits(classes: usize, shape: (usize, usize, usize), scale: f32) -> Array4<f32> {
    Array4::from_shape_fn((classes, shape.0, shape.1, shape.2), |(c, _, r, col)| {
        (c as f32 + 1.0) * scale * (r * shape.2 + col) as f32
    })
}

fn session(reader: MemoryReader) -> InteractionSession {
    InteractionSession::new(ViewerConfig::default(), reader)
}

fn standard_reader() -> MemoryReader {
    let mut labels = Array3::<i32>::zeros((10, 4, 4));
    labels[(9, 0, 0)] = 1;
    labels[(9, 2, 3)] = 2;
    MemoryReader::default()
        .volume("ct.nii.gz", Array3::from_elem((10, 4, 4), 100))
        .volume("seg.nii.gz", labels)
        .volume("small.nii.gz", Array3::zeros((2, 4, 4)))
        .logits("a.npy", ramp_logits(3, (10, 4, 4), 1.0))
        .logits("b.npy", ramp_logits(2, (10, 4, 4), -1.0))
}

#[test]
fn render_before_volume_is_silent_not_ready() {
    let session = session(MemoryReader::default());
    let error = session.render().unwrap_err();
    assert!(error.is_silent());
    assert!(session.readout().is_none());
    assert_eq!(session.readout_table().len(), 19);
}

#[test]
fn windowed_volume_renders_uniform_gray() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    assert_eq!(session.slice(), 9);
    session.set_window(50, 150).expect("window");
    session.set_slice(0).expect("slice");

    let frame = session.render().expect("frame");
    assert_eq!(frame.slice, 0);
    assert!(frame.is_symmetric());
    assert!(frame.left.pixels().all(|pixel| pixel.0 == [127, 127, 127]));
}

#[test]
fn rejected_window_is_a_control_rejection() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    let generation = session.generation();
    let error = session.set_window_min(400).unwrap_err();
    assert!(error.is_control_rejection());
    assert!(!error.is_silent());
    assert_eq!(session.generation(), generation);
    assert_eq!(
        session.volume().map(|volume| volume.window()),
        Some(Window { min: -1200, max: 400 })
    );
}

#[test]
fn unreadable_file_keeps_previous_volume() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    let error = session.load_volume(Path::new("missing.nii.gz")).unwrap_err();
    assert!(matches!(error, SessionError::Unloadable { .. }));
    assert_eq!(session.volume().map(|volume| volume.name()), Some("ct.nii.gz"));
}

#[test]
fn overlays_require_a_volume() {
    let mut session = session(standard_reader());
    assert!(
        session
            .load_segmentation(Path::new("seg.nii.gz"))
            .unwrap_err()
            .is_silent()
    );
    assert!(
        session
            .load_logits(Path::new("a.npy"), LogitsSide::Left)
            .unwrap_err()
            .is_silent()
    );
}

#[test]
fn mismatched_segmentation_is_reported() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("small.nii.gz")).expect("volume");
    let error = session.load_segmentation(Path::new("seg.nii.gz")).unwrap_err();
    assert!(error.is_shape_mismatch());
    assert!(session.segmentation().is_none());
}

#[test]
fn segmentation_blend_at_half_opacity() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    session.set_window(50, 150).expect("window");
    session.load_segmentation(Path::new("seg.nii.gz")).expect("segmentation");
    session.set_segmentation_opacity(0.5).expect("opacity");

    let frame = session.render().expect("frame");
    let blend = |color: [u8; 3]| {
        color.map(|channel| ((0.5 * 127.0 / 255.0 + 0.5 * f32::from(channel) / 255.0) * 255.0).round() as u8)
    };
    assert_eq!(frame.left.get_pixel(0, 0).0, blend(PALETTE[1]));
    assert_eq!(frame.left.get_pixel(3, 2).0, blend(PALETTE[2]));
    assert_eq!(frame.left.get_pixel(1, 1).0, [127, 127, 127]);

    session.set_segmentation_visible(false).expect("visibility");
    assert!(
        session
            .render()
            .expect("frame")
            .left
            .pixels()
            .all(|pixel| pixel.0 == [127, 127, 127])
    );
}

#[test]
fn first_logits_fill_both_sides() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    session
        .load_logits(Path::new("a.npy"), LogitsSide::Right)
        .expect("logits");
    let left = session.logits(LogitsSide::Left).expect("left");
    let right = session.logits(LogitsSide::Right).expect("right");
    assert_eq!(left.name(), "a.npy");
    assert_eq!(right.name(), "a.npy");
    assert_eq!(left.outcome(), LoadOutcome::Clean);

    session
        .load_logits(Path::new("b.npy"), LogitsSide::Left)
        .expect("logits");
    assert_eq!(session.logits(LogitsSide::Left).map(|item| item.name()), Some("b.npy"));
    assert_eq!(session.logits(LogitsSide::Right).map(|item| item.name()), Some("a.npy"));
    assert_eq!(session.num_classes(), 2);
}

#[test]
fn class_is_reapplied_and_reset_when_out_of_range() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    session
        .load_logits(Path::new("a.npy"), LogitsSide::Left)
        .expect("logits");
    session.set_class(2).expect("class 2");
    assert_eq!(session.logits(LogitsSide::Right).map(|item| item.current_class()), Some(2));

    session
        .load_logits(Path::new("b.npy"), LogitsSide::Right)
        .expect("logits");
    assert_eq!(session.current_class(), 0);
    for side in LogitsSide::ALL {
        assert_eq!(session.logits(side).map(|item| item.current_class()), Some(0));
    }
    assert!(matches!(
        session.set_class(2),
        Err(SessionError::Model(ModelError::ClassOutOfRange { class: 2, count: 2 }))
    ));
}

#[test]
fn keys_navigate_slices_and_classes_with_clamping() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    session
        .load_logits(Path::new("a.npy"), LogitsSide::Left)
        .expect("logits");

    session.handle_key(KeyCommand::NextSlice).expect("next slice");
    assert_eq!(session.slice(), 9);
    session.handle_key(KeyCommand::PreviousSlice).expect("previous slice");
    assert_eq!(session.slice(), 8);

    session.handle_key(KeyCommand::PreviousClass).expect("previous class");
    assert_eq!(session.current_class(), 0);
    for _ in 0..5 {
        session.handle_key(KeyCommand::NextClass).expect("next class");
    }
    assert_eq!(session.current_class(), 2);
}

#[test]
fn disjoint_bands_split_left_and_right() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    session.set_window(50, 150).expect("window");
    session
        .load_logits(Path::new("a.npy"), LogitsSide::Left)
        .expect("left");
    session
        .load_logits(Path::new("a.npy"), LogitsSide::Right)
        .expect("right");
    // class 0 values are 0..=15 by pixel index
    session.set_threshold_high(LogitsSide::Left, 5).expect("left high");
    session.set_threshold_low(LogitsSide::Right, 10).expect("right low");
    let rejected = session.set_threshold_low(LogitsSide::Left, 5).unwrap_err();
    assert!(rejected.is_control_rejection());

    let frame = session.render().expect("frame");
    for row in 0..4u32 {
        for col in 0..4u32 {
            let value = row * 4 + col;
            let in_left = value <= 5;
            let in_right = value >= 10;
            let differs = frame.left.get_pixel(col, row) != frame.right.get_pixel(col, row);
            assert_eq!(differs, in_left != in_right, "pixel ({row}, {col})");
        }
    }

    session.set_logits_visible(false);
    assert!(session.render().expect("frame").is_symmetric());
}

#[test]
fn colormap_and_visibility_apply_to_both_sides() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    session.set_logits_visible(false);
    session
        .load_logits(Path::new("a.npy"), LogitsSide::Left)
        .expect("logits");
    session.set_colormap(Colormap::Discrete);
    for side in LogitsSide::ALL {
        let logits = session.logits(side).expect("logits");
        assert!(!logits.visible());
        assert_eq!(logits.colormap(), Colormap::Discrete);
    }
}

#[test]
fn new_volume_drops_mismatched_overlays() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    session.load_segmentation(Path::new("seg.nii.gz")).expect("segmentation");
    session
        .load_logits(Path::new("a.npy"), LogitsSide::Left)
        .expect("logits");

    session.load_volume(Path::new("ct.nii.gz")).expect("same shape");
    assert!(session.segmentation().is_some());
    assert!(session.has_logits());

    session.load_volume(Path::new("small.nii.gz")).expect("new shape");
    assert!(session.segmentation().is_none());
    assert!(!session.has_logits());
    assert_eq!(session.slice(), 1);
}

#[test]
fn assignments_run_in_priority_order_and_continue_after_failure() {
    let mut session = session(standard_reader());
    let reports = session.apply_assignments(vec![
        Assignment::new("b.npy", AssignTarget::LogitsRight),
        Assignment::new("missing.npy", AssignTarget::LogitsLeft),
        Assignment::new("seg.nii.gz", AssignTarget::Segmentation),
        Assignment::new("ct.nii.gz", AssignTarget::Volume),
    ]);
    let order = reports
        .iter()
        .map(|report| report.assignment.target)
        .collect::<Vec<_>>();
    assert_eq!(
        order,
        vec![
            AssignTarget::Volume,
            AssignTarget::Segmentation,
            AssignTarget::LogitsLeft,
            AssignTarget::LogitsRight,
        ]
    );
    assert!(reports[0].result.is_ok());
    assert!(reports[1].result.is_ok());
    assert!(matches!(reports[2].result, Err(SessionError::Unloadable { .. })));
    assert!(reports[3].result.is_ok());
    assert_eq!(session.logits(LogitsSide::Left).map(|item| item.name()), Some("b.npy"));
}

#[test]
fn wheel_and_pointer_drive_slice_and_cursor() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    assert_eq!(session.wheel(-1.0, false, pos2(0.0, 0.0)), WheelAction::SliceStep(-1));
    assert_eq!(session.slice(), 8);
    session.wheel(1.0, false, pos2(0.0, 0.0));
    session.wheel(1.0, false, pos2(0.0, 0.0));
    assert_eq!(session.slice(), 9);

    // initial scale 2: canvas (5, 3) is voxel row 1, col 2
    let voxel = session.pointer_move(pos2(5.0, 3.0)).expect("voxel");
    assert_eq!((voxel.row, voxel.col), (1, 2));
    session.pointer_down(PointerButton::Primary, pos2(5.0, 3.0));
    session.pointer_move(pos2(7.0, 3.0));
    session.pointer_up();
    assert_eq!(session.viewport().transform(crate::viewport::Canvas::Right).origin, pos2(2.0, 0.0));
}

#[test]
fn readout_reports_voxel_values() {
    let mut session = session(standard_reader());
    session.load_volume(Path::new("ct.nii.gz")).expect("volume");
    session.load_segmentation(Path::new("seg.nii.gz")).expect("segmentation");
    session
        .load_logits(Path::new("a.npy"), LogitsSide::Left)
        .expect("logits");
    session.pointer_move(pos2(7.0, 5.0));

    let readout = session.readout().expect("readout");
    assert_eq!((readout.depth, readout.row, readout.col), (9, 2, 3));
    assert_eq!(readout.intensity, 100);
    assert_eq!(readout.label, Some(2));
    assert_eq!(readout.left, Some(vec![11.0, 22.0, 33.0]));
    assert_eq!(readout.status_line(), "(2, 3, 9) 100    cls: 2");

    let table = session.readout_table();
    assert_eq!(table.len(), 3);
    assert_eq!(table.tone(2, ReadoutColumn::Left), CellTone::Highlight);
    assert_eq!(table.tone(0, ReadoutColumn::Left), CellTone::Background);
}

#[test]
fn all_zero_table_uses_background_everywhere() {
    let readout = VoxelReadout {
        depth: 0,
        row: 0,
        col: 0,
        intensity: 0,
        label: None,
        left: Some(vec![0.0, 0.0]),
        right: Some(vec![0.0, 0.0]),
    };
    let table = ReadoutTable::from_readout(&readout, 19);
    assert_eq!(table.len(), 2);
    assert!(table.is_all_zero());
    assert_eq!(table.tone(0, ReadoutColumn::Right), CellTone::Background);
    assert_eq!(table.tone(0, ReadoutColumn::Right).color(), [0x20, 0x20, 0x20]);
    assert_eq!(readout.status_line(), "(0, 0, 0) 0    cls: ");

    let mixed = ReadoutTable::from_readout(
        &VoxelReadout {
            left: Some(vec![-1.0, 1.0]),
            right: None,
            ..readout
        },
        19,
    );
    assert_eq!(mixed.tone(1, ReadoutColumn::Left), CellTone::Highlight);
    assert_eq!(mixed.tone(0, ReadoutColumn::Right), CellTone::Highlight);
    assert_eq!(ReadoutTable::format_value(0.12345), "0.123");
}

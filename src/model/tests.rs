use ndarray::{Array3, Array4, Array5, ArrayD, IxDyn};

use super::*;

fn info(name: &str) -> ItemInfo {
    ItemInfo::in_memory(name)
}

#[test]
fn window_normalization_truncates_to_eight_bits() {
    let raw = Array3::from_elem((10, 4, 4), 100);
    let volume = VolumeItem::with_window(raw, info("ct"), Window::new(50, 150).expect("window"))
        .expect("volume");
    assert!(volume.normalized().iter().all(|&value| value == 127));
    assert_eq!(Window::new(50, 150).expect("window").normalize(-10), 0);
    assert_eq!(Window::new(50, 150).expect("window").normalize(500), 255);
}

#[test]
fn gradient_volume_matches_reference_normalization() {
    let raw = Array3::from_shape_fn((3, 4, 5), |(d, r, c)| (d * 20 + r * 5 + c) as i32 * 7 - 150);
    let mut volume = VolumeItem::load(raw.clone(), info("ct")).expect("volume");
    volume.set_window(-100, 200).expect("window");

    for depth in 0..3 {
        let slice = volume.normalized_slice(depth).expect("slice");
        for ((row, col), &value) in slice.indexed_iter() {
            let t = ((f64::from(raw[(depth, row, col)]) + 100.0) / 300.0).clamp(0.0, 1.0);
            assert_eq!(value, (t * 255.0) as u8, "voxel ({depth}, {row}, {col})");
        }
    }
    assert_eq!(volume.normalized()[(0, 0, 0)], 0);
    assert_eq!(volume.normalized()[(0, 2, 4)], 40);
    assert_eq!(volume.normalized()[(2, 3, 4)], 255);
}

#[test]
fn rejected_window_keeps_previous_state() {
    let raw = Array3::from_shape_fn((2, 3, 3), |(d, r, c)| (d * 9 + r * 3 + c) as i32 * 100 - 1000);
    let mut volume = VolumeItem::load(raw, info("ct")).expect("volume");
    let before = volume.normalized().clone();

    assert!(matches!(
        volume.set_window_min(400),
        Err(ModelError::InvalidWindow { .. })
    ));
    assert!(volume.set_window_max(-1200).is_err());
    assert!(volume.set_window(500, 600).is_err());
    assert_eq!(volume.window(), DEFAULT_WINDOW);
    assert_eq!(volume.normalized(), &before);

    volume.set_window_max(0).expect("narrower window");
    assert_eq!(volume.window(), Window { min: -1200, max: 0 });
    assert_eq!(volume.intensity(1, 2, 2), Some(700));
    assert_eq!(volume.normalized()[(1, 2, 2)], 255);
}

#[test]
fn dummy_volume_is_all_zero() {
    let volume = VolumeItem::from_dummy([3, 5, 7]).expect("dummy");
    assert_eq!(volume.shape(), [3, 5, 7]);
    assert_eq!(volume.name(), "dummy_data");
    assert!(VolumeItem::from_dummy([0, 5, 7]).is_err());
}

#[test]
fn segmentation_requires_matching_shape_and_palette() {
    let palette = Palette::default();
    let labels = Array3::<i32>::zeros((2, 4, 4));
    let err = SegmentationItem::load(labels, info("seg"), [2, 4, 5], &palette).unwrap_err();
    assert!(matches!(err, ModelError::ShapeMismatch { layer: "segmentation", .. }));

    let labels = Array3::from_elem((2, 4, 4), 3);
    let small = Palette::from_class_colors([[1, 2, 3], [4, 5, 6]]).expect("palette");
    let err = SegmentationItem::load(labels.clone(), info("seg"), [2, 4, 4], &small).unwrap_err();
    assert_eq!(
        err,
        ModelError::InsufficientPalette {
            classes: 3,
            entries: 3
        }
    );

    let mut negative = labels.clone();
    negative[(0, 0, 0)] = -1;
    assert!(SegmentationItem::load(negative, info("seg"), [2, 4, 4], &palette).is_err());

    let segmentation = SegmentationItem::load(labels, info("seg"), [2, 4, 4], &palette)
        .expect("segmentation");
    assert_eq!(segmentation.num_classes(), 3);
    let rgb = segmentation.rgb_slice(1).expect("slice");
    assert_eq!(
        [rgb[(0, 0, 0)], rgb[(0, 0, 1)], rgb[(0, 0, 2)]],
        PALETTE[3]
    );
}

#[test]
fn background_label_stays_black() {
    let mut labels = Array3::<i32>::zeros((1, 2, 2));
    labels[(0, 1, 1)] = 1;
    let segmentation =
        SegmentationItem::load(labels, info("seg"), [1, 2, 2], &Palette::default()).expect("seg");
    let rgb = segmentation.rgb();
    assert_eq!([rgb[(0, 0, 0, 0)], rgb[(0, 0, 0, 1)], rgb[(0, 0, 0, 2)]], BACKGROUND);
    assert_eq!([rgb[(0, 1, 1, 0)], rgb[(0, 1, 1, 1)], rgb[(0, 1, 1, 2)]], PALETTE[1]);
}

#[test]
fn opacity_is_clamped() {
    let mut segmentation = SegmentationItem::load(
        Array3::zeros((1, 1, 1)),
        info("seg"),
        [1, 1, 1],
        &Palette::default(),
    )
    .expect("seg");
    assert_eq!(segmentation.opacity(), DEFAULT_SEGMENTATION_OPACITY);
    segmentation.set_opacity(1.7);
    assert_eq!(segmentation.opacity(), 1.0);
    segmentation.set_opacity(f32::NAN);
    assert_eq!(segmentation.opacity(), 1.0);
}

#[test]
fn class_selection_resets_threshold_to_class_range() {
    let mut data = Array4::<f32>::zeros((2, 1, 2, 2));
    data[(0, 0, 0, 0)] = -3.2;
    data[(0, 0, 1, 1)] = 4.5;
    data[(1, 0, 0, 1)] = 10.0;
    let mut logits = LogitsItem::load(
        data.into_dyn(),
        info("logits"),
        [1, 2, 2],
        Colormap::Jet,
        &Palette::default(),
    )
    .expect("logits");

    assert_eq!(logits.value_range(), ThresholdBand { low: -5, high: 6 });
    assert_eq!(logits.band(), logits.value_range());

    logits.set_threshold_low(0).expect("low");
    logits.set_class(1).expect("class 1");
    assert_eq!(logits.value_range(), ThresholdBand { low: -1, high: 11 });
    assert_eq!(logits.band(), ThresholdBand { low: -1, high: 11 });

    assert_eq!(
        logits.set_class(2),
        Err(ModelError::ClassOutOfRange { class: 2, count: 2 })
    );
    assert_eq!(logits.current_class(), 1);
}

#[test]
fn extreme_logits_keep_an_ordered_threshold_range() {
    let data = Array4::from_shape_vec((1, 1, 1, 2), vec![-1e10_f32, 1e10]).expect("shape");
    let logits = LogitsItem::load(
        data.into_dyn(),
        info("logits"),
        [1, 1, 2],
        Colormap::Jet,
        &Palette::default(),
    )
    .expect("logits");

    let range = logits.value_range();
    assert!(range.low < range.high);
    assert_eq!(range, ThresholdBand { low: i32::MIN, high: i32::MAX });
    assert_eq!(logits.band(), range);

    let positive = Array4::from_elem((1, 1, 1, 1), 5e9_f32);
    let logits = LogitsItem::load(
        positive.into_dyn(),
        info("logits"),
        [1, 1, 1],
        Colormap::Jet,
        &Palette::default(),
    )
    .expect("logits");
    assert_eq!(
        logits.value_range(),
        ThresholdBand { low: i32::MAX - 1, high: i32::MAX }
    );
}

#[test]
fn threshold_setters_keep_band_ordered() {
    let data = Array4::<f32>::from_elem((1, 1, 2, 2), 2.0);
    let mut logits = LogitsItem::load(
        data.into_dyn(),
        info("logits"),
        [1, 2, 2],
        Colormap::Jet,
        &Palette::default(),
    )
    .expect("logits");
    assert_eq!(logits.band(), ThresholdBand { low: 1, high: 3 });
    assert!(logits.set_threshold_low(3).is_err());
    assert!(logits.set_threshold_high(1).is_err());
    assert_eq!(logits.band(), ThresholdBand { low: 1, high: 3 });
    logits.set_threshold_high(2).expect("high");
    assert!(logits.band().contains(2.0));
    assert!(!logits.band().contains(2.5));
}

#[test]
fn batch_axis_is_squeezed() {
    let data = Array5::<f32>::zeros((1, 3, 2, 4, 5));
    let logits = LogitsItem::load(
        data.into_dyn(),
        info("logits"),
        [2, 4, 5],
        Colormap::Jet,
        &Palette::default(),
    )
    .expect("logits");
    assert_eq!(logits.num_classes(), 3);
    assert_eq!(logits.outcome(), LoadOutcome::Clean);

    let batched = Array5::<f32>::zeros((2, 3, 2, 4, 5));
    let err = LogitsItem::load(
        batched.into_dyn(),
        info("logits"),
        [2, 4, 5],
        Colormap::Jet,
        &Palette::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::UnsupportedRank { ndim: 5, .. }));

    let flat = ArrayD::<f32>::zeros(IxDyn(&[2, 4, 5]));
    assert!(
        LogitsItem::load(flat, info("logits"), [2, 4, 5], Colormap::Jet, &Palette::default())
            .is_err()
    );
}

#[test]
fn transposed_spatial_axes_are_recovered() {
    let data = Array4::from_shape_fn((1, 2, 5, 4), |(_, d, x, y)| (d * 100 + x * 10 + y) as f32);
    let logits = LogitsItem::load(
        data.into_dyn(),
        info("logits"),
        [2, 4, 5],
        Colormap::Jet,
        &Palette::default(),
    )
    .expect("logits");
    assert_eq!(logits.outcome(), LoadOutcome::AxesSwapped);
    assert_eq!(logits.shape(), [2, 4, 5]);
    assert_eq!(logits.class_values(1, 3, 2), Some(vec![123.0]));

    let wrong = Array4::<f32>::zeros((1, 2, 3, 3));
    let err = LogitsItem::load(
        wrong.into_dyn(),
        info("logits"),
        [2, 4, 5],
        Colormap::Jet,
        &Palette::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::ShapeMismatch { layer: "logits", .. }));
}

#[test]
fn discrete_colormap_wraps_class_ids() {
    let palette = Palette::from_class_colors([[10, 0, 0], [0, 20, 0], [0, 0, 30]]).expect("palette");
    let mut data = Array4::<f32>::zeros((1, 1, 1, 4));
    data[(0, 0, 0, 1)] = 1.9;
    data[(0, 0, 0, 2)] = 3.0;
    data[(0, 0, 0, 3)] = -1.0;
    let mut logits = LogitsItem::load(data.into_dyn(), info("logits"), [1, 1, 4], Colormap::Jet, &palette)
        .expect("logits");
    logits.set_colormap(Colormap::Discrete);
    let rgb = logits.rgb_slice(0).expect("slice");
    let color = |col: usize| [rgb[(0, col, 0)], rgb[(0, col, 1)], rgb[(0, col, 2)]];
    assert_eq!(color(0), [10, 0, 0]);
    assert_eq!(color(1), [0, 20, 0]);
    assert_eq!(color(2), [10, 0, 0]);
    assert_eq!(color(3), [0, 0, 30]);
}

#[test]
fn jet_endpoints() {
    assert_eq!(jet(0.0), [0, 0, 128]);
    assert_eq!(jet(1.0), [128, 0, 0]);
    assert_eq!(jet(0.5), [128, 255, 128]);
}

#[test]
fn item_names_come_from_the_path() {
    let info = ItemInfo::from_path(std::path::Path::new("/data/case_01/logits.npy"));
    assert_eq!(info.name, "logits.npy");
    assert_eq!(info.second_name, "case_01/logits.npy");
}

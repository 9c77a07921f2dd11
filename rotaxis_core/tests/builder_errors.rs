use rotaxis_core::error::BuildError;
use rotaxis_core::mocks::Recorder;
use rotaxis_core::{AdjustCfg, Adjuster, AdjusterBuilder, ReferencePoint};
use rstest::rstest;

fn two_points() -> Vec<ReferencePoint> {
    vec![
        ReferencePoint::unnamed([0.0, 0.0]),
        ReferencePoint::unnamed([0.0, 50.0]),
    ]
}

fn full(rec: &Recorder) -> AdjusterBuilder {
    Adjuster::builder()
        .with_probe(rec.probe())
        .with_steppers(rec.steppers())
        .with_toolhead(rec.toolhead())
        .with_responder(rec.responder())
}

fn expect_build_error(builder: AdjusterBuilder) -> BuildError {
    let err = builder.try_build().expect_err("build should fail");
    err.downcast_ref::<BuildError>()
        .cloned()
        .unwrap_or_else(|| panic!("expected BuildError, got: {err:?}"))
}

#[rstest]
fn builder_missing_probe_yields_typed_build_error() {
    let rec = Recorder::new();
    let b = Adjuster::builder()
        .with_steppers(rec.steppers())
        .with_toolhead(rec.toolhead())
        .with_responder(rec.responder())
        .with_points(two_points());
    assert_eq!(expect_build_error(b), BuildError::MissingProbe);
}

#[rstest]
fn builder_missing_toolhead_yields_typed_build_error() {
    let rec = Recorder::new();
    let b = Adjuster::builder()
        .with_probe(rec.probe())
        .with_steppers(rec.steppers())
        .with_responder(rec.responder())
        .with_points(two_points());
    assert_eq!(expect_build_error(b), BuildError::MissingToolhead);
}

#[rstest]
fn builder_missing_points_yields_typed_build_error() {
    let rec = Recorder::new();
    assert_eq!(expect_build_error(full(&rec)), BuildError::MissingPoints);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
fn builder_rejects_wrong_point_count(#[case] n: usize) {
    let rec = Recorder::new();
    let points = (0..n)
        .map(|i| ReferencePoint::unnamed([0.0, i as f64 * 10.0]))
        .collect();
    let b = full(&rec).with_points(points);
    assert_eq!(expect_build_error(b), BuildError::PointCount(n));
    assert!(rec.probe_points().is_empty());
}

#[rstest]
#[case::zero_limit(AdjustCfg { max_correction_deg: 0.0, ..AdjustCfg::default() })]
#[case::limit_at_fold(AdjustCfg { max_correction_deg: 90.0, ..AdjustCfg::default() })]
#[case::nan_speed(AdjustCfg { move_speed: f64::NAN, ..AdjustCfg::default() })]
#[case::empty_stepper(AdjustCfg { stepper: " ".into(), ..AdjustCfg::default() })]
#[case::digit_axis(AdjustCfg { axis: '4', ..AdjustCfg::default() })]
fn builder_rejects_invalid_config(#[case] cfg: AdjustCfg) {
    let rec = Recorder::new();
    let b = full(&rec).with_points(two_points()).with_config(cfg);
    assert!(matches!(
        expect_build_error(b),
        BuildError::InvalidConfig(_)
    ));
}

#[test]
fn builder_rejects_non_finite_point() {
    let rec = Recorder::new();
    let b = full(&rec).with_points(vec![
        ReferencePoint::unnamed([0.0, f64::INFINITY]),
        ReferencePoint::unnamed([0.0, 0.0]),
    ]);
    assert!(matches!(
        expect_build_error(b),
        BuildError::InvalidConfig(_)
    ));
}

#[test]
fn apply_config_takes_points_and_settings_from_file() {
    let cfg = rotaxis_config::load_toml(
        r#"
[rot_axis_adjust]
pos1 = [100.0, 20.0]
pos2 = [100.0, 180.0]
pos2_name = "rear"
max_correction_deg = 2.0
"#,
    )
    .unwrap();
    let rec = Recorder::new();
    let adj = full(&rec)
        .apply_config(&cfg)
        .unwrap()
        .try_build()
        .unwrap();
    assert_eq!(adj.reference_points()[0].name(), "pos at 100.000,20.000");
    assert_eq!(adj.reference_points()[1].name(), "rear");
    assert_eq!(adj.config().max_correction_deg, 2.0);
    assert_eq!(adj.config().move_speed, 5.0);
    assert_eq!(rec.probe_points(), vec![[100.0, 20.0], [100.0, 180.0]]);
}

#[test]
fn apply_config_surfaces_point_count_error() {
    let cfg = rotaxis_config::load_toml("[rot_axis_adjust]\npos1 = [0.0, 0.0]\n").unwrap();
    let Err(err) = Adjuster::builder().apply_config(&cfg) else {
        panic!("only one point configured");
    };
    assert!(err.downcast_ref::<rotaxis_config::ConfigError>().is_some());
}

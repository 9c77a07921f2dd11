use rotaxis_config::{ConfigError, load_file, load_toml};
use rstest::rstest;

const VALID: &str = r#"
[rot_axis_adjust]
pos1 = [100.0, 20.0]
pos1_name = "front"
pos2 = [100, 180]
"#;

#[test]
fn accepts_two_positions_with_defaults() {
    let cfg = load_toml(VALID).expect("parse TOML");
    cfg.validate().expect("valid config should pass");

    let adj = &cfg.rot_axis_adjust;
    assert_eq!(adj.stepper, "stepper_a");
    assert_eq!(adj.axis, "A");
    assert_eq!(adj.max_correction_deg, 3.0);
    assert_eq!(adj.move_speed, 5.0);

    let points = adj.positions().expect("two positions");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].coord, [100.0, 20.0]);
    assert_eq!(points[0].name, "front");
    // integers are widened; missing name is synthesized
    assert_eq!(points[1].coord, [100.0, 180.0]);
    assert_eq!(points[1].name, "pos at 100.000,180.000");

    assert_eq!(cfg.probe.horizontal_move_z, 5.0);
    assert_eq!(cfg.probe.lift_speed(), cfg.probe.speed);
}

#[rstest]
#[case::none("", 0)]
#[case::one("pos1 = [1.0, 2.0]", 1)]
#[case::three("pos1 = [1.0, 2.0]\npos2 = [1.0, 4.0]\npos3 = [1.0, 6.0]", 3)]
fn rejects_wrong_position_count(#[case] body: &str, #[case] found: usize) {
    let toml = format!("[rot_axis_adjust]\n{body}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("count must be exactly two");
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::PointCount { expected: 2, found: f }) => assert_eq!(*f, found),
        other => panic!("expected PointCount, got: {other:?}"),
    }
}

#[test]
fn scan_stops_at_first_gap() {
    // pos3 is never reached because pos2 is missing
    let toml = r#"
[rot_axis_adjust]
pos1 = [0.0, 0.0]
pos3 = [0.0, 10.0]
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.rot_axis_adjust.positions().expect_err("only one position");
    assert_eq!(
        err,
        ConfigError::PointCount {
            expected: 2,
            found: 1
        }
    );
}

#[rstest]
#[case("pos2 = [1.0]")]
#[case("pos2 = [1.0, 2.0, 3.0]")]
#[case("pos2 = \"1.0, 2.0\"")]
#[case("pos2 = [1.0, \"y\"]")]
#[case("pos2 = [1.0, nan]")]
fn rejects_malformed_position(#[case] line: &str) {
    let toml = format!("[rot_axis_adjust]\npos1 = [0.0, 0.0]\n{line}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("malformed pos2");
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::InvalidPosition {
            key: "pos2".to_string()
        })
    );
}

#[test]
fn rejects_non_string_name() {
    let toml = format!("{VALID}pos2_name = 5\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("name must be a string");
    assert!(format!("{err}").contains("pos2_name must be a string"));
}

#[test]
fn rejects_unknown_option() {
    let toml = format!("{VALID}max_corection_deg = 2.0\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("typo should be caught");
    assert!(format!("{err}").contains("unknown option 'max_corection_deg'"));
}

#[rstest]
#[case("max_correction_deg = 0.0", "max_correction_deg must be > 0")]
#[case("max_correction_deg = 120.0", "max_correction_deg must be < 90")]
#[case("move_speed = -1.0", "move_speed must be > 0")]
#[case("axis = \"AB\"", "axis must be a single letter")]
#[case("stepper = \"\"", "stepper must not be empty")]
fn rejects_bad_adjust_scalars(#[case] line: &str, #[case] needle: &str) {
    let toml = format!("{VALID}{line}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("scalar out of range");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[rstest]
#[case("[probe]\nspeed = 0.0", "probe.speed must be > 0")]
#[case("[probe]\nlift_speed = -5.0", "probe.lift_speed must be > 0")]
#[case("[logging]\nrotation = \"weekly\"", "logging.rotation")]
fn rejects_bad_ambient_sections(#[case] section: &str, #[case] needle: &str) {
    let toml = format!("{VALID}\n{section}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("section value out of range");
    assert!(format!("{err}").contains(needle));
}

#[test]
fn missing_adjust_section_fails_to_parse() {
    assert!(load_toml("[probe]\nspeed = 10.0\n").is_err());
}

#[test]
fn load_file_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rotaxis.toml");
    std::fs::write(&path, VALID).unwrap();
    let cfg = load_file(&path).expect("valid file");
    assert_eq!(cfg.rot_axis_adjust.positions().unwrap().len(), 2);

    std::fs::write(&path, "[rot_axis_adjust]\npos1 = [0.0, 0.0]\n").unwrap();
    let err = load_file(&path).expect_err("one position");
    assert!(err.downcast_ref::<ConfigError>().is_some());
}

#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse, position scan and validation must reject bad input without panicking.
    let Ok(cfg) = rotaxis_config::load_toml(data) else {
        return;
    };
    let _ = cfg.rot_axis_adjust.unknown_keys().count();
    if let Ok(points) = cfg.rot_axis_adjust.positions() {
        assert_eq!(points.len(), rotaxis_config::REQUIRED_POSITIONS);
        assert!(points.iter().all(|p| p.coord.iter().all(|v| v.is_finite())));
    }
    let _ = cfg.validate();
});

use std::fs;

use beam_roots::beam_types::{BeamType, ALL_BEAM_TYPES};
use beam_roots::numeric::Workspace;
use beam_roots::root_finding::cache::{default_cache_dir, BestRootsCache, CacheError};
use tempfile::TempDir;

// lower than the defaults to keep the tests fast
const MAX_MODE: u32 = 2;
const DIGITS: usize = 15;

fn cache() -> (TempDir, BestRootsCache) {
    let dir = tempfile::tempdir().unwrap();
    // point at a subdirectory that does not exist yet, so regeneration has
    // to create it
    let cache = BestRootsCache::new(dir.path().join("best-roots"));
    (dir, cache)
}

#[test]
fn lookup_before_regeneration_is_unavailable() {
    let (_dir, cache) = cache();
    let err = cache
        .best_root(BeamType::SimplySupported, MAX_MODE, DIGITS)
        .unwrap_err();
    assert!(matches!(err, CacheError::Unavailable { .. }));
}

#[test]
fn mode_zero_is_invalid() {
    let (_dir, cache) = cache();
    cache.regenerate(MAX_MODE, DIGITS).unwrap();

    let err = cache
        .best_root(BeamType::SimplySupported, 0, DIGITS)
        .unwrap_err();
    assert!(matches!(err, CacheError::InvalidMode { mode: 0 }));
}

#[test]
fn mode_past_the_regenerated_range_is_not_found() {
    let (_dir, cache) = cache();
    cache.regenerate(MAX_MODE, DIGITS).unwrap();

    let err = cache
        .best_root(BeamType::SimplySupported, MAX_MODE + 1, DIGITS)
        .unwrap_err();
    assert!(matches!(err, CacheError::ModeNotFound { mode } if mode == MAX_MODE + 1));
}

#[test]
fn different_precisions_do_not_share_a_cache_key() {
    let (_dir, cache) = cache();
    cache.regenerate(MAX_MODE, DIGITS).unwrap();

    let err = cache
        .best_root(BeamType::SimplySupported, MAX_MODE, DIGITS + 1)
        .unwrap_err();
    assert!(matches!(err, CacheError::Unavailable { .. }));
}

#[test]
fn each_precision_gets_its_own_file_and_entries() {
    let (_dir, cache) = cache();
    cache.regenerate(MAX_MODE, DIGITS).unwrap();
    cache.regenerate(MAX_MODE, DIGITS + 1).unwrap();

    assert_ne!(cache.cache_file_path(DIGITS), cache.cache_file_path(DIGITS + 1));
    assert!(cache.cache_file_path(DIGITS).exists());
    assert!(cache.cache_file_path(DIGITS + 1).exists());

    cache
        .best_root(BeamType::SimplySupported, MAX_MODE, DIGITS)
        .unwrap();
    cache
        .best_root(BeamType::SimplySupported, MAX_MODE, DIGITS + 1)
        .unwrap();
}

#[test]
fn cached_lookups_are_idempotent() {
    let (_dir, cache) = cache();
    cache.regenerate(MAX_MODE, DIGITS).unwrap();

    let first = cache
        .best_root(BeamType::SimplySupported, MAX_MODE, DIGITS)
        .unwrap();
    let second = cache
        .best_root(BeamType::SimplySupported, MAX_MODE, DIGITS)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn regeneration_invalidates_the_in_memory_layer() {
    let (_dir, cache) = cache();
    cache.regenerate(MAX_MODE, DIGITS).unwrap();

    // prime the in-memory layer, then prove mode 3 is absent
    cache
        .best_root(BeamType::SimplySupported, MAX_MODE, DIGITS)
        .unwrap();
    let err = cache
        .best_root(BeamType::SimplySupported, MAX_MODE + 1, DIGITS)
        .unwrap_err();
    assert!(matches!(err, CacheError::ModeNotFound { .. }));

    // a wider regeneration must be visible without rebuilding the cache
    cache.regenerate(MAX_MODE + 1, DIGITS).unwrap();
    cache
        .best_root(BeamType::SimplySupported, MAX_MODE + 1, DIGITS)
        .unwrap();
}

#[test]
fn mode_lists_are_ascending_for_every_beam_type() {
    let (_dir, cache) = cache();
    let max_mode = 3;
    cache.regenerate(max_mode, DIGITS).unwrap();

    for beam_type in ALL_BEAM_TYPES {
        let mut previous = None;
        for mode in 1..=max_mode {
            let result = cache.best_root(beam_type, mode, DIGITS).unwrap();
            if let Some(previous) = &previous {
                assert!(
                    previous < result.root(),
                    "{beam_type}: roots must ascend with the mode"
                );
            }
            previous = Some(result.root().clone());
        }
    }
}

#[test]
fn missing_beam_type_in_the_file_is_reported() {
    let (_dir, cache) = cache();
    let digits = 21;

    fs::create_dir_all(cache.disk_cache_dir()).unwrap();
    fs::write(
        cache.cache_file_path(digits),
        r#"{
            "decimal_precision": 21,
            "max_mode": 1,
            "best_roots": {
                "1": [{ "root": "3.141592653589793", "residual": "0.000000000000001" }]
            }
        }"#,
    )
    .unwrap();

    cache.best_root(BeamType::SimplySupported, 1, digits).unwrap();

    let err = cache
        .best_root(BeamType::ClampedClamped, 1, digits)
        .unwrap_err();
    assert!(matches!(
        err,
        CacheError::BeamTypeNotFound { beam_type: BeamType::ClampedClamped }
    ));
}

#[test]
fn precision_mismatch_inside_the_file_is_reported() {
    let (_dir, cache) = cache();
    let digits = 22;

    fs::create_dir_all(cache.disk_cache_dir()).unwrap();
    fs::write(
        cache.cache_file_path(digits),
        r#"{ "decimal_precision": 23, "max_mode": 1, "best_roots": {} }"#,
    )
    .unwrap();

    let err = cache
        .best_root(BeamType::SimplySupported, 1, digits)
        .unwrap_err();
    assert!(matches!(
        err,
        CacheError::PrecisionMismatch { found: 23, expected: 22, .. }
    ));
}

#[test]
fn garbage_in_the_file_is_malformed() {
    let (_dir, cache) = cache();
    let digits = 23;

    fs::create_dir_all(cache.disk_cache_dir()).unwrap();
    fs::write(cache.cache_file_path(digits), "not json at all").unwrap();

    let err = cache
        .best_root(BeamType::SimplySupported, 1, digits)
        .unwrap_err();
    assert!(matches!(err, CacheError::Malformed { .. }));
}

#[test]
fn unparsable_numbers_in_the_file_are_reported() {
    let (_dir, cache) = cache();
    let digits = 24;

    fs::create_dir_all(cache.disk_cache_dir()).unwrap();
    fs::write(
        cache.cache_file_path(digits),
        r#"{
            "decimal_precision": 24,
            "max_mode": 1,
            "best_roots": {
                "1": [{ "root": "definitely not a number", "residual": null }]
            }
        }"#,
    )
    .unwrap();

    let err = cache
        .best_root(BeamType::SimplySupported, 1, digits)
        .unwrap_err();
    assert!(matches!(err, CacheError::Unparsable { .. }));
}

#[test]
fn end_to_end_simply_supported_roots_are_pi_multiples() {
    let (_dir, cache) = cache();
    let digits = 30;
    cache.regenerate(5, digits).unwrap();

    let mut ws = Workspace::new(digits).unwrap();
    let p = ws.bits();
    let rm = ws.rounding();
    let tolerance = ws.from_f64(1e-20);

    let mode_1 = cache.best_root(BeamType::SimplySupported, 1, digits).unwrap();
    let pi = ws.pi();
    assert!(mode_1.root().sub(&pi, p, rm).abs() < tolerance, "mode 1: {}", mode_1.root());

    let mode_5 = cache.best_root(BeamType::SimplySupported, 5, digits).unwrap();
    let five_pi = ws.pi().mul(&ws.from_f64(5.0), p, rm);
    assert!(
        mode_5.root().sub(&five_pi, p, rm).abs() < tolerance,
        "mode 5: {}",
        mode_5.root()
    );
}

#[test]
fn end_to_end_free_free_has_undefined_then_converged_modes() {
    let (_dir, cache) = cache();
    let digits = 30;
    cache.regenerate(3, digits).unwrap();

    let ws = Workspace::new(digits).unwrap();

    let mode_1 = cache.best_root(BeamType::FreeFree, 1, digits).unwrap();
    assert!(mode_1.is_undefined());
    assert!(mode_1.root().is_zero());

    let mode_2 = cache.best_root(BeamType::FreeFree, 2, digits).unwrap();
    assert!(mode_2.is_undefined());
    assert_eq!(*mode_2.root(), ws.one());

    let mode_3 = cache.best_root(BeamType::FreeFree, 3, digits).unwrap();
    assert!(!mode_3.is_undefined());
    assert!(*mode_3.residual() < ws.from_f64(1e-16));
}

#[test]
fn default_cache_dir_is_a_dot_directory() {
    let dir = default_cache_dir();
    assert!(dir.ends_with(".beam-roots"));
}

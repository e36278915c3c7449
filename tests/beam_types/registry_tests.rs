use beam_roots::beam_types::{BeamType, BeamTypeError, ALL_BEAM_TYPES};

#[test]
fn ids_are_1_through_6_in_registration_order() {
    let ids: Vec<u8> = ALL_BEAM_TYPES.iter().map(|beam| beam.id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn from_id_roundtrips() {
    for beam_type in ALL_BEAM_TYPES {
        assert_eq!(BeamType::from_id(beam_type.id()).unwrap(), beam_type);
    }
}

#[test]
fn coercion_from_u8_and_u32() {
    assert_eq!(BeamType::try_from(1_u8).unwrap(), BeamType::SimplySupported);
    assert_eq!(BeamType::try_from(6_u32).unwrap(), BeamType::FreeFree);
}

#[test]
fn invalid_ids_are_rejected() {
    for id in [0_u8, 7, 200] {
        let err = BeamType::from_id(id).unwrap_err();
        assert!(matches!(err, BeamTypeError::UnknownId { id: got } if got == u32::from(id)));
    }

    let err = BeamType::try_from(1_000_000_u32).unwrap_err();
    assert!(matches!(err, BeamTypeError::UnknownId { id: 1_000_000 }));
}

#[test]
fn display_includes_name_and_id() {
    assert_eq!(BeamType::SimplySupported.to_string(), "simply supported (id=1)");
    assert_eq!(BeamType::FreeFree.to_string(), "free free (id=6)");
}

#[test]
fn excluded_modes_match_the_rigid_body_modes() {
    assert_eq!(BeamType::SimplySupported.excluded_modes(), &[] as &[u32]);
    assert_eq!(BeamType::ClampedClamped.excluded_modes(), &[] as &[u32]);
    assert_eq!(BeamType::ClampedFree.excluded_modes(), &[] as &[u32]);
    assert_eq!(BeamType::ClampedSimplySupported.excluded_modes(), &[] as &[u32]);
    assert_eq!(BeamType::SimplySupportedFree.excluded_modes(), [1_u32].as_slice());
    assert_eq!(BeamType::FreeFree.excluded_modes(), [1_u32, 2].as_slice());

    assert!(BeamType::FreeFree.is_mode_excluded(2));
    assert!(!BeamType::FreeFree.is_mode_excluded(3));
}

#[test]
fn shared_equations_render_identically() {
    // free free reuses the clamped clamped equation, simply supported free
    // reuses the clamped simply supported one
    assert_eq!(
        BeamType::FreeFree.characteristic_equation_str(),
        BeamType::ClampedClamped.characteristic_equation_str()
    );
    assert_eq!(
        BeamType::SimplySupportedFree.characteristic_equation_str(),
        BeamType::ClampedSimplySupported.characteristic_equation_str()
    );
    assert_eq!(
        BeamType::SimplySupported.characteristic_equation_str(),
        "sin(mu_m) = 0"
    );
}

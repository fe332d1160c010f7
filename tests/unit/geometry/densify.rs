use super::*;

fn street() -> Vec<LatLng> {
    vec![
        LatLng::new(33.9580, -83.3830),
        LatLng::new(33.9585, -83.3822),
        LatLng::new(33.9585, -83.3822),
        LatLng::new(33.9601, -83.3790),
    ]
}

#[test]
fn empty_and_single_point_inputs() {
    assert!(densify(&[], 2.0).is_empty());
    let p = LatLng::new(1.0, 2.0);
    assert_eq!(densify(&[p], 2.0), vec![p]);
}

#[test]
fn endpoints_and_original_vertices_are_preserved() {
    let input = street();
    let out = densify(&input, 2.0);
    assert!(out.len() > input.len());
    assert_eq!(out.first(), input.first());
    assert_eq!(out.last(), input.last());

    let mut cursor = 0;
    for v in &input {
        let found = out[cursor..].iter().position(|p| p == v).unwrap();
        cursor += found;
    }
}

#[test]
fn gaps_do_not_exceed_per_step_distance() {
    let input = street();
    let target = 5.0;
    let out = densify(&input, target);
    for pair in input.windows(2) {
        let d = distance_m(pair[0], pair[1]);
        let steps = ((d / target).floor() as usize).max(1);
        let per_step = d / steps as f64;
        let start = out.iter().position(|p| *p == pair[0]).unwrap();
        let end = start + steps;
        for w in out[start..=end].windows(2) {
            assert!(distance_m(w[0], w[1]) <= per_step * (1.0 + 1e-5));
        }
    }
}

#[test]
fn zero_length_segment_adds_no_points() {
    let p = LatLng::new(10.0, 10.0);
    assert_eq!(densify(&[p, p], 2.0), vec![p, p]);
}

#[test]
fn invalid_target_disables_subdivision() {
    let input = street();
    assert_eq!(densify(&input, 0.0), input);
    assert_eq!(densify(&input, f64::NAN), input);
}

#[test]
fn haversine_matches_known_distance() {
    // One degree of latitude is ~111.2 km on the mean-radius sphere.
    let d = distance_m(LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0));
    assert!((d - 111_195.0).abs() < 100.0);
}

#[test]
fn tiny_target_is_capped_per_pair() {
    let a = LatLng::new(0.0, 0.0);
    let b = LatLng::new(1.0, 0.0);
    let out = densify(&[a, b], 1e-6);
    assert_eq!(out.len(), MAX_STEPS_PER_PAIR + 1);
    assert_eq!(out.last(), Some(&b));
}

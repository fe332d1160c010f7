use super::*;
use crate::{
    foundation::settings::EngineSettings,
    layers::{definition::LayerDefinition, source::MemoryFetcher},
    surface::recording::RecordingSurface,
};

fn seg(n: usize, offset: f64) -> LineSegment {
    (0..n).map(|i| LatLng::new(offset, i as f64)).collect()
}

#[test]
fn cutoff_walks_segment_boundaries() {
    let segments = vec![seg(5, 0.0), seg(3, 1.0), seg(4, 2.0)];
    let lens: Vec<usize> = reveal(&segments, 7).iter().map(|s| s.len()).collect();
    assert_eq!(lens, vec![5, 2]);
    assert_eq!(reveal(&segments, 12).len(), 3);
    assert!(reveal(&segments, 0).is_empty());
    let lens: Vec<usize> = reveal(&segments, 8).iter().map(|s| s.len()).collect();
    assert_eq!(lens, vec![5, 3]);
}

#[test]
fn divisor_scales_progress() {
    assert_eq!(effective_progress(0.5, 2.0), effective_progress(0.25, 1.0));
    assert_eq!(effective_progress(0.5, 0.0), 0.5);
    assert_eq!(effective_progress(0.9, 0.5), 1.0);
    assert_eq!(effective_progress(f64::NAN, 1.0), 0.0);
    assert_eq!(effective_progress(-1.0, 1.0), 0.0);
    assert_eq!(reveal_count(0.5, 2.0, 100), reveal_count(0.25, 1.0, 100));
}

#[test]
fn reveal_count_is_monotonic_and_complete() {
    let total = 12;
    let mut prev = 0;
    for i in 0..=100 {
        let n = reveal_count(i as f64 / 100.0, 1.0, total);
        assert!(n >= prev);
        prev = n;
    }
    assert_eq!(reveal_count(1.0, 1.0, total), total);
    assert_eq!(reveal_count(0.0, 1.0, total), 0);
}

const LINES: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{},
   "geometry":{"type":"MultiLineString","coordinates":[[[0,0],[0,0]],[[1,1],[1,1]]]}}
]}"#;

fn registry() -> LayerRegistry {
    let fetcher = MemoryFetcher::new().with("line.geojson", LINES).unwrap();
    let mut street = LayerDefinition::new("street", "line.geojson");
    street.line = true;
    let mut boundary = LayerDefinition::new("boundaryline", "line.geojson");
    boundary.line = true;
    boundary.draw_speed = Some(2.0);
    futures::executor::block_on(LayerRegistry::load_all(
        vec![street, boundary],
        &fetcher,
        &EngineSettings::default(),
    ))
}

#[test]
fn entering_steps_keeps_one_route_attached() {
    let reg = registry();
    let mut surface = RecordingSurface::new();
    let mut anim = RouteAnimator::new();

    anim.enter_step(Some("street"), &reg, &mut surface);
    assert!(surface.is_attached("street#route"));
    assert_eq!(surface.last_path("street#route"), Some(&[][..]));

    anim.enter_step(Some("boundaryline"), &reg, &mut surface);
    assert!(!surface.is_attached("street#route"));
    assert!(surface.is_attached("boundaryline#route"));
    assert_eq!(anim.active(), Some("boundaryline"));

    anim.enter_step(None, &reg, &mut surface);
    assert_eq!(surface.attached().count(), 0);
    assert_eq!(anim.active(), None);
}

#[test]
fn update_and_reset_write_the_route_path() {
    let reg = registry();
    let mut surface = RecordingSurface::new();
    let mut anim = RouteAnimator::new();
    anim.enter_step(Some("street"), &reg, &mut surface);

    anim.update(1.0, "street", &reg, &mut surface);
    assert_eq!(surface.last_path("street#route"), Some(&[2, 2][..]));
    anim.update(0.75, "street", &reg, &mut surface);
    assert_eq!(surface.last_path("street#route"), Some(&[2, 1][..]));
    anim.reset("street", &reg, &mut surface);
    assert_eq!(surface.last_path("street#route"), Some(&[][..]));

    // Divisor 2: full progress reveals half.
    anim.update(1.0, "boundaryline", &reg, &mut surface);
    assert_eq!(surface.last_path("boundaryline#route"), Some(&[2][..]));
}

#[test]
fn consecutive_steps_on_same_route_keep_drawn_path() {
    let reg = registry();
    let mut surface = RecordingSurface::new();
    let mut anim = RouteAnimator::new();
    anim.enter_step(Some("street"), &reg, &mut surface);
    anim.update(1.0, "street", &reg, &mut surface);
    surface.take_calls();

    anim.enter_step(Some("street"), &reg, &mut surface);
    assert!(surface.calls().is_empty());
    assert!(surface.is_attached("street#route"));
    assert_eq!(anim.active(), Some("street"));

    // Switching away and back starts from an empty path.
    anim.enter_step(Some("boundaryline"), &reg, &mut surface);
    anim.enter_step(Some("street"), &reg, &mut surface);
    assert_eq!(surface.last_path("street#route"), Some(&[][..]));
}

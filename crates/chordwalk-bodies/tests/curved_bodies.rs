use chordwalk_bodies::{Ball, BallPolytope, HPolytope, Spectrahedron};
use chordwalk_core::{
    ConvexBody, CoordinateOracle, FacetCache, Halfspace, Membership, Point, ReflectiveOracle,
    SemidefiniteOracle,
};
use nalgebra::DMatrix;

#[test]
fn ball_chord_solves_the_quadratic() {
    let ball = Ball::centered(2, 2.0).unwrap();
    let p = Point::from_vec(vec![1.0, 0.0]);
    let chord = ball.line_intersect(&p, &Point::from_vec(vec![1.0, 0.0]));
    assert!((chord.forward - 1.0).abs() < 1e-12);
    assert!((chord.backward + 3.0).abs() < 1e-12);

    let coord = ball.coord_chord(&p, 0);
    assert!((coord.forward - 1.0).abs() < 1e-12);
    assert!((coord.backward + 3.0).abs() < 1e-12);

    assert!(Ball::centered(2, 0.0).is_err());
}

#[test]
fn ball_reflection_reverses_radial_motion() {
    let ball = Ball::centered(2, 1.0).unwrap();
    let mut v = Point::from_vec(vec![1.0, 0.0]);
    let boundary = Point::from_vec(vec![1.0, 0.0]);
    ball.compute_reflection(&mut v, &boundary, 0);
    assert!((v.coord(0) + 1.0).abs() < 1e-12);
    assert!(v.coord(1).abs() < 1e-12);
}

#[test]
fn ball_polytope_takes_the_tighter_boundary() {
    let body = BallPolytope::new(HPolytope::cube(2, 1.0), Ball::centered(2, 1.2).unwrap()).unwrap();
    let origin = Point::new(2);
    let diagonal = Point::from_vec(vec![1.0, 1.0]);
    let chord = body.line_intersect(&origin, &diagonal);
    let expected = 1.2 / 2f64.sqrt();
    assert!((chord.forward - expected).abs() < 1e-12);
    assert!((chord.backward + expected).abs() < 1e-12);

    let mut cache = FacetCache::new(0);
    let hit = body.line_positive_intersect(&origin, &diagonal, &mut cache, None);
    assert_eq!(hit.facet, body.num_hyperplanes());
    let axis = Point::from_vec(vec![1.0, 0.0]);
    let hit = body.line_positive_intersect(&origin, &axis, &mut cache, None);
    assert_eq!(hit.facet, 0);
    assert!((hit.distance - 1.0).abs() < 1e-12);

    let mut slacks = vec![0.0; body.num_hyperplanes()];
    let coord = body.line_intersect_coord(&Point::from_vec(vec![0.0, 0.9]), 0, &mut slacks);
    let expected = (1.44f64 - 0.81).sqrt();
    assert!((coord.forward - expected).abs() < 1e-12);

    assert_eq!(body.is_in(&Point::from_vec(vec![0.95, 0.95])), Membership::Exterior);
    assert!(BallPolytope::new(HPolytope::cube(3, 1.0), Ball::centered(2, 1.0).unwrap()).is_err());
}

#[test]
fn spectrahedral_ball_agrees_with_euclidean_ball() {
    let lmi = Spectrahedron::unit_ball(3);
    let ball = Ball::centered(3, 1.0).unwrap();
    let p = Point::from_vec(vec![0.1, -0.2, 0.3]);
    let v = Point::from_vec(vec![0.5, 0.5, -0.7]);

    let expected = ball.line_intersect(&p, &v);
    let chord = lmi.boundary_oracle(&p, &v, None);
    assert!((chord.forward - expected.forward).abs() < 1e-9);
    assert!((chord.backward - expected.backward).abs() < 1e-9);
    assert_eq!(lmi.line_intersect(&p, &v), chord);

    assert!(lmi.is_in(&p).is_interior());
    assert_eq!(lmi.is_in(&Point::from_vec(vec![1.0, 1.0, 0.0])), Membership::Exterior);
}

#[test]
fn extra_halfspace_clips_the_semidefinite_chord() {
    let lmi = Spectrahedron::unit_ball(2);
    let p = Point::new(2);
    let v = Point::from_vec(vec![1.0, 0.0]);
    let cut = Halfspace::new(Point::from_vec(vec![1.0, 0.0]), 0.25);
    let chord = lmi.boundary_oracle(&p, &v, Some(&cut));
    assert!((chord.forward - 0.25).abs() < 1e-12);
    assert!((chord.backward + 1.0).abs() < 1e-9);
}

#[test]
fn malformed_pencils_are_rejected() {
    let err = Spectrahedron::new(DMatrix::identity(2, 2), vec![DMatrix::zeros(3, 3)]).unwrap_err();
    assert_eq!(err.info().code, "lmi-shape");
    let err = Spectrahedron::new(DMatrix::identity(2, 2), Vec::new()).unwrap_err();
    assert_eq!(err.info().code, "lmi-empty");
}

fn constraint_count<B: CoordinateOracle + ReflectiveOracle>(body: &B) -> usize {
    body.num_hyperplanes()
}

#[test]
fn hyperplane_count_is_shared_by_every_capability() {
    let cube = HPolytope::cube(3, 1.0);
    assert_eq!(constraint_count(&cube), 6);

    let clipped = BallPolytope::new(cube.clone(), Ball::centered(3, 1.2).unwrap()).unwrap();
    assert_eq!(constraint_count(&clipped), 6);

    let ball = Ball::centered(3, 1.0).unwrap();
    assert_eq!(ball.num_hyperplanes(), 0);
    let mut cache = FacetCache::new(ball.num_hyperplanes());
    let hit = ball.line_positive_intersect(
        &Point::new(3),
        &Point::from_vec(vec![0.0, 0.0, 1.0]),
        &mut cache,
        None,
    );
    assert_eq!(hit.facet, ball.num_hyperplanes());
    assert_eq!(Spectrahedron::unit_ball(2).num_hyperplanes(), 0);
}

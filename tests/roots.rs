use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use rootfind::{
    domains::float::Complex,
    poly::{
        analytic::{cubic, quadratic},
        Polynomial, RootSettings,
    },
    utils::DEFAULT_EPSILON,
};

fn sorted(mut r: Vec<f64>) -> Vec<f64> {
    r.sort_by(|a, b| a.total_cmp(b));
    r
}

#[test]
fn roots_match_closed_form() {
    let p = Polynomial::from_real(&[1., -6., 11., -6.]);

    let numerical = sorted(p.real_roots());
    let analytic = sorted(cubic(1., -6., 11., -6., DEFAULT_EPSILON).into_vec());

    assert_eq!(numerical.len(), 3);
    assert_eq!(analytic.len(), 3);
    for (n, a) in numerical.iter().zip(&analytic) {
        assert!((n - a).abs() < 1e-7, "{:?} vs {:?}", numerical, analytic);
    }
}

#[test]
fn deflation_by_found_roots() {
    let p = Polynomial::from_real(&[1., -3., 2.]);
    let settings = RootSettings::default();

    let mut rest = p.clone();
    for r in p.roots_with(&settings) {
        let (q, rem, _) = rest.factor_division(r, settings.epsilon);
        assert!(rem.norm() < 1e-8);
        rest = q;
    }
    assert_eq!(rest.order(), 0);
    assert!((rest.coefficients()[0] - Complex::new(1., 0.)).norm() < 1e-8);
}

#[test]
fn random_quadratics() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(3);

    for _ in 0..100 {
        let x1: f64 = rng.gen_range(-10.0..10.0);
        let x2: f64 = rng.gen_range(-10.0..10.0);
        let a: f64 = rng.gen_range(0.5..4.0);
        if (x1 - x2).abs() < 0.1 {
            continue;
        }

        // a (x - x1)(x - x2)
        let (b, c) = (-a * (x1 + x2), a * x1 * x2);

        let expected = sorted(vec![x1, x2]);
        let r = sorted(quadratic(a, b, c, DEFAULT_EPSILON).into_vec());
        assert_eq!(r.len(), 2);
        for (x, y) in r.iter().zip(&expected) {
            assert!((x - y).abs() < 1e-9 * (1. + y.abs()), "{:?} vs {:?}", r, expected);
        }

        let p = Polynomial::from_real(&[a, b, c]);
        let settings = RootSettings {
            max_iterations: 100,
            ..Default::default()
        };
        for z in p.roots_with(&settings) {
            assert!(p.evaluate(&z).norm() < 1e-6 * a * (1. + z.norm_squared()));
        }
    }
}

#[test]
fn bernstein_roots() {
    // control points of (t - 1/4)(t - 3/4) on [0, 1]
    let p = Polynomial::from_bernstein_real(&[0.1875, -0.3125, 0.1875]);
    let r = sorted(p.real_roots());
    assert_eq!(r.len(), 2);
    assert!((r[0] - 0.25).abs() < 1e-8);
    assert!((r[1] - 0.75).abs() < 1e-8);
}

#[test]
fn default_settings() {
    let settings = RootSettings::default();
    assert_eq!(settings.epsilon, 1e-8);
    assert_eq!(settings.max_iterations, 25);
}

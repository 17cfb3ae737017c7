use rootfind::{
    domains::float::Complex,
    solve::{
        broyden::{Broyden, BroydenSettings},
        newton::{Newton, NewtonSettings},
        SolveError,
    },
    tensors::matrix::Matrix,
};

/// The intersection of the unit circle with the parabola `y = x^2`.
fn circle_parabola(x: &[f64]) -> Vec<f64> {
    vec![x[0] * x[0] + x[1] * x[1] - 1., x[1] - x[0] * x[0]]
}

fn circle_parabola_jacobian(x: &[f64]) -> Matrix<f64> {
    Matrix::from_linear(vec![2. * x[0], 2. * x[1], -2. * x[0], 1.], 2, 2).unwrap()
}

#[test]
fn newton_and_broyden_agree() {
    let newton = Newton::default()
        .find_root(circle_parabola, circle_parabola_jacobian, &[0.8, 0.6])
        .unwrap();
    let broyden = Broyden::default()
        .find_root(circle_parabola, &[0.8, 0.6])
        .unwrap();

    // y^2 + y - 1 = 0
    let y = (5f64.sqrt() - 1.) / 2.;
    let x = y.sqrt();

    for r in [&newton, &broyden] {
        assert!((r[0] - x).abs() < 1e-7, "{:?}", r);
        assert!((r[1] - y).abs() < 1e-7, "{:?}", r);
    }
}

#[test]
fn newton_partial_solution() {
    let newton = Newton::new(NewtonSettings {
        epsilon: 1e-8,
        max_iterations: 2,
    });

    let e = newton
        .find_root(circle_parabola, circle_parabola_jacobian, &[3., 3.])
        .unwrap_err();

    let partial = e.partial_solution().unwrap().to_vec();
    assert_eq!(partial.len(), 2);

    // the partial solution can be used to continue
    let r = Newton::default()
        .find_root(circle_parabola, circle_parabola_jacobian, &partial)
        .unwrap();
    assert!(circle_parabola(&r).iter().all(|v| v.abs() < 1e-8));
}

#[test]
fn newton_complex_system() {
    // z^2 + 1 = 0 and w = z * z
    let r = Newton::default()
        .find_root(
            |x: &[Complex<f64>]| vec![x[0] * x[0] + x[0].one(), x[1] - x[0] * x[0]],
            |x: &[Complex<f64>]| {
                let two = Complex::new(2., 0.);
                Matrix::from_linear(vec![x[0] * two, x[0].zero(), -x[0] * two, x[0].one()], 2, 2)
                    .unwrap()
            },
            &[Complex::new(0.1, 2.), Complex::new(0., 0.)],
        )
        .unwrap();

    assert!((r[0] - Complex::new(0., 1.)).norm() < 1e-10);
    assert!((r[1] - Complex::new(-1., 0.)).norm() < 1e-10);
}

#[test]
fn broyden_iteration_budget() {
    let settings = BroydenSettings {
        max_iterations: 3,
        ..Default::default()
    };

    let r = Broyden::new(settings).find_root(circle_parabola, &[20., -30.]);
    assert_eq!(r, Err(SolveError::NonConvergence { iterations: 3 }));
    assert!(Broyden::new(settings)
        .try_find_root(circle_parabola, &[20., -30.])
        .is_none());
}

#[test]
fn newton_constant_zero_jacobian() {
    let mut jacobian_evaluations = 0;
    let r = Newton::default().find_root(
        circle_parabola,
        |_: &[f64]| {
            jacobian_evaluations += 1;
            Matrix::new(2, 2)
        },
        &[0.8, 0.6],
    );
    assert_eq!(r, Err(SolveError::ZeroDeterminant { iteration: 0 }));
    assert_eq!(jacobian_evaluations, 1);
}

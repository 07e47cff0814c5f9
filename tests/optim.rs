use evalclassifier::layers::Param;
use evalclassifier::math::Matrix;
use evalclassifier::optim::{CategoricalCrossEntropy, Loss, Optimizer, RMSprop};

#[test]
fn rmsprop_first_step_matches_closed_form() {
    let mut p = Param::new(Matrix::from_vec(1, 3, vec![1.0, -2.0, 0.5]));
    p.grad = Matrix::from_vec(1, 3, vec![0.2, -0.4, 0.0]);
    let mut opt = RMSprop::default();
    assert_eq!(opt.lr(), 0.001);
    opt.step(&mut [&mut p]);

    for (i, (&before, &g)) in [1.0f32, -2.0, 0.5]
        .iter()
        .zip(&[0.2f32, -0.4, 0.0])
        .enumerate()
    {
        let v = 0.1 * g * g;
        let expected = before - 0.001 * g / (v.sqrt() + 1e-7);
        assert!((p.value.data[i] - expected).abs() < 1e-6, "index {i}");
    }
    // A nonzero gradient moves the weight by about lr / sqrt(1 - rho).
    assert!((p.value.data[0] - (1.0 - 0.001 / 0.1f32.sqrt())).abs() < 1e-5);
}

#[test]
fn rmsprop_keeps_state_per_parameter() {
    let mut a = Param::new(Matrix::from_vec(1, 1, vec![0.0]));
    let mut b = Param::new(Matrix::from_vec(1, 2, vec![0.0, 0.0]));
    let mut opt = RMSprop::default();
    for _ in 0..3 {
        a.grad = Matrix::from_vec(1, 1, vec![1.0]);
        b.grad = Matrix::from_vec(1, 2, vec![-1.0, 0.0]);
        opt.step(&mut [&mut a, &mut b]);
    }
    assert!(a.value.data[0] < 0.0);
    assert!((a.value.data[0] + b.value.data[0]).abs() < 1e-7);
    assert_eq!(b.value.data[1], 0.0);
}

#[test]
fn cross_entropy_loss_and_gradient() {
    let ce = CategoricalCrossEntropy::new();
    let pred = Matrix::from_vec(2, 2, vec![0.5, 0.5, 0.25, 0.75]);
    let target = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]);
    let expected = -(0.5f32.ln() + 0.75f32.ln()) / 2.0;
    assert!((ce.loss(&pred, &target) - expected).abs() < 1e-6);
    let grad = ce.grad(&pred, &target);
    assert!((grad.get(0, 0) + 1.0).abs() < 1e-6);
    assert_eq!(grad.get(0, 1), 0.0);
    assert!((grad.get(1, 1) + 1.0 / 1.5).abs() < 1e-6);
}

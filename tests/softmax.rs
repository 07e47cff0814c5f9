use evalclassifier::config::NUM_CLASS;
use evalclassifier::layers::{Layer, Softmax};
use evalclassifier::math::Matrix;
use evalclassifier::models::build_classifier;
use evalclassifier::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn classifier_probabilities_sum_to_one() {
    let window = 16;
    let model = build_classifier(window, Some(11)).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let n = 9;
    let data: Vec<f32> = (0..n * 2 * window).map(|_| rng.gen_range(-3.0..3.0)).collect();
    let x = Tensor::new(data, vec![n, 2, window, 1]).unwrap();
    let probs = model.predict(&x, 4).unwrap();
    assert_eq!((probs.rows, probs.cols), (n, NUM_CLASS));
    for r in 0..probs.rows {
        let sum: f32 = probs.row(r).iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "row {r} sums to {sum}");
        assert!(probs.row(r).iter().all(|p| (0.0..=1.0).contains(p)));
    }
}

#[test]
fn softmax_backward_sums_to_zero() {
    let mut layer = Softmax::new();
    let x = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, -1.0, 0.0, 4.0]);
    let probs = layer.forward_train(&x).unwrap();
    let grad = layer.backward(&Matrix::from_vec(2, 3, vec![0.3, -1.0, 0.2, 1.0, 0.0, 0.0]));
    for r in 0..2 {
        let s: f32 = grad.row(r).iter().sum();
        assert!(s.abs() < 1e-6);
        let p: f32 = probs.row(r).iter().sum();
        assert!((p - 1.0).abs() < 1e-6);
    }
}

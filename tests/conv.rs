use evalclassifier::layers::{Conv2d, ConvError, Dropout, Layer, MaxPool2d, Padding, Shape};
use evalclassifier::math::Matrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn ones_conv(input: Shape, filters: usize, padding: Padding) -> Conv2d {
    let mut rng = StdRng::seed_from_u64(0);
    let mut conv = Conv2d::new(input, filters, 3, 1, padding, &mut rng).unwrap();
    conv.w.value.data.iter_mut().for_each(|w| *w = 1.0);
    conv
}

#[test]
fn conv_same_padding_keeps_height_and_width() {
    let input = Shape::new(1, 2, 8);
    let conv = ones_conv(input, 4, Padding::Same);
    assert_eq!(conv.output_shape(input), Shape::new(4, 2, 8));
    let x = Matrix::from_vec(3, 16, vec![0.5; 48]);
    let out = conv.forward(&x).unwrap();
    assert_eq!((out.rows, out.cols), (3, 4 * 16));
}

#[test]
fn conv_same_padding_sums_neighbourhood() {
    // 2x3 input of ones: corners see 4 values, middle column sees 6.
    let input = Shape::new(1, 2, 3);
    let conv = ones_conv(input, 1, Padding::Same);
    let x = Matrix::from_vec(1, 6, vec![1.0; 6]);
    let out = conv.forward(&x).unwrap();
    assert_eq!(out.data, vec![4.0, 6.0, 4.0, 4.0, 6.0, 4.0]);
}

#[test]
fn conv_forward_errors_on_feature_mismatch() {
    let mut conv = ones_conv(Shape::new(1, 2, 4), 2, Padding::Same);
    let x = Matrix::from_vec(1, 7, vec![0.0; 7]);
    assert!(matches!(
        conv.forward_local(&x),
        Err(ConvError::InputSize { features: 7, expected: 8 })
    ));
}

#[test]
fn conv_valid_rejects_oversized_kernel() {
    let mut rng = StdRng::seed_from_u64(1);
    let res = Conv2d::new(Shape::new(1, 2, 8), 1, 3, 1, Padding::Valid, &mut rng);
    assert!(matches!(res, Err(ConvError::KernelTooLarge { .. })));
    let res = Conv2d::new(Shape::new(1, 2, 8), 1, 3, 0, Padding::Same, &mut rng);
    assert!(matches!(res, Err(ConvError::ZeroStride)));
}

#[test]
fn conv_weights_start_small_with_zero_bias() {
    let mut rng = StdRng::seed_from_u64(2);
    let conv = Conv2d::new(Shape::new(1, 2, 8), 8, 3, 1, Padding::Same, &mut rng).unwrap();
    assert!(conv.w.value.data.iter().all(|w| w.abs() <= 0.05));
    assert!(conv.b.value.data.iter().all(|&b| b == 0.0));
}

#[test]
fn conv_backward_accumulates_bias_gradient() {
    let input = Shape::new(1, 2, 3);
    let mut conv = ones_conv(input, 1, Padding::Same);
    let x = Matrix::from_vec(1, 6, vec![1.0; 6]);
    conv.forward_local(&x).unwrap();
    let grad = conv.backward_local(&Matrix::from_vec(1, 6, vec![1.0; 6]));
    assert_eq!(conv.b.grad.data, vec![6.0]);
    // With all-ones weights the input gradient equals the forward response.
    assert_eq!(grad.data, vec![4.0, 6.0, 4.0, 4.0, 6.0, 4.0]);
}

#[test]
fn max_pool_backward_routes_to_argmax() {
    let input = Shape::new(1, 2, 4);
    let mut pool = MaxPool2d::new(input, 2, 2);
    assert_eq!(pool.output_shape(input), Shape::new(1, 1, 2));
    let x = Matrix::from_vec(1, 8, vec![1.0, 5.0, 2.0, 0.0, 3.0, 4.0, 9.0, 1.0]);
    let out = pool.forward_train(&x).unwrap();
    assert_eq!(out.data, vec![5.0, 9.0]);
    let grad = pool.backward(&Matrix::from_vec(1, 2, vec![1.0, 2.0]));
    assert_eq!(grad.data, vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0]);
}

#[test]
fn dropout_is_identity_at_inference() {
    let mut drop = Dropout::new(0.5, StdRng::seed_from_u64(3));
    let x = Matrix::from_vec(2, 4, (0..8).map(|v| v as f32).collect());
    assert_eq!(drop.forward(&x).unwrap(), x);
    let train = drop.forward_train(&x).unwrap();
    for (t, v) in train.data.iter().zip(&x.data) {
        assert!(*t == 0.0 || (*t - v * 2.0).abs() < 1e-6);
    }
}

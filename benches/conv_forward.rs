use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evalclassifier::config::{BATCH_SIZE, WINDOW_SIZE};
use evalclassifier::layers::{Conv2d, Layer, Padding, Shape};
use evalclassifier::math::Matrix;
use evalclassifier::models::build_classifier;
use evalclassifier::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bench_conv_forward(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let input = Shape::new(8, 2, WINDOW_SIZE);
    let mut conv = Conv2d::new(input, 16, 3, 1, Padding::Same, &mut rng).unwrap();
    let data: Vec<f32> = (0..BATCH_SIZE * input.len())
        .map(|_| rng.gen_range(-1.0..1.0))
        .collect();
    let x = Matrix::from_vec(BATCH_SIZE, input.len(), data);

    c.bench_function("conv2d_forward_batch", |b| {
        b.iter(|| black_box(conv.forward(black_box(&x)).unwrap()));
    });

    c.bench_function("conv2d_forward_backward_batch", |b| {
        b.iter(|| {
            let out = conv.forward_train(black_box(&x)).unwrap();
            black_box(conv.backward(&out));
        });
    });

    let model = build_classifier(WINDOW_SIZE, Some(0)).unwrap();
    let samples: Vec<f32> = (0..BATCH_SIZE * 2 * WINDOW_SIZE)
        .map(|_| rng.gen_range(-1.0..1.0))
        .collect();
    let batch = Tensor::new(samples, vec![BATCH_SIZE, 2, WINDOW_SIZE, 1]).unwrap();
    c.bench_function("classifier_predict_batch", |b| {
        b.iter(|| black_box(model.predict(black_box(&batch), BATCH_SIZE).unwrap()));
    });
}

criterion_group!(benches, bench_conv_forward);
criterion_main!(benches);

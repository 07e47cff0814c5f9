use crate::config::NUM_CLASS;
use crate::error::{Error, Result};
use crate::layers::{
    Conv2d, Dropout, Flatten, Layer, Linear, MaxPool2d, Padding, ReLU, Shape, Softmax,
};
use crate::model::Model;
use crate::models::Sequential;
use crate::optim::{CategoricalCrossEntropy, RMSprop};
use crate::rng::rng_from_seed;

/// Build the real/fake classifier for `[2, window_size, 1]` samples.
///
/// Two 3x3 same-padded convolutions (8 then 16 filters) feed a 2x2 max pool,
/// dropout, a 16 unit hidden layer and a softmax over [`NUM_CLASS`] outputs.
/// The returned model is compiled with categorical cross-entropy and RMSprop
/// but untrained.
pub fn build_classifier(window_size: usize, seed: Option<u64>) -> Result<Model> {
    if window_size < 2 {
        return Err(Error::Config(format!(
            "window size {window_size} is too small to pool"
        )));
    }
    let mut rng = rng_from_seed(seed, 0);

    let input = Shape::new(1, 2, window_size);
    let mut net = Sequential::new(input);

    let conv_a = Conv2d::new(input, 8, 3, 1, Padding::Same, &mut rng)?;
    let shape = conv_a.output_shape(input);
    net.add_layer(Box::new(conv_a));
    net.add_layer(Box::new(ReLU::new()));

    let conv_b = Conv2d::new(shape, 16, 3, 1, Padding::Same, &mut rng)?;
    let shape = conv_b.output_shape(shape);
    net.add_layer(Box::new(conv_b));
    net.add_layer(Box::new(ReLU::new()));

    let pool = MaxPool2d::new(shape, 2, 2);
    net.add_layer(Box::new(pool));
    net.add_layer(Box::new(Dropout::new(0.25, rng_from_seed(seed, 1))));
    net.add_layer(Box::new(Flatten::new()));

    let flat = net.output_shape().len();
    net.add_layer(Box::new(Linear::new(flat, 16, &mut rng)));
    net.add_layer(Box::new(ReLU::new()));
    net.add_layer(Box::new(Dropout::new(0.5, rng_from_seed(seed, 2))));
    net.add_layer(Box::new(Linear::new(16, NUM_CLASS, &mut rng)));
    net.add_layer(Box::new(Softmax::new()));

    let mut model = Model::new(net, vec![2, window_size, 1], rng_from_seed(seed, 3));
    model.compile(RMSprop::default(), CategoricalCrossEntropy::new());
    Ok(model)
}

pub mod conv;
pub mod dropout;
pub mod flatten;
pub mod layer;
pub mod linear;
pub mod pooling;
pub mod relu;
pub mod softmax;

pub use conv::{Conv2d, ConvError, Padding};
pub use dropout::Dropout;
pub use flatten::Flatten;
pub use layer::{Layer, Param, Shape};
pub use linear::Linear;
pub use pooling::MaxPool2d;
pub use relu::ReLU;
pub use softmax::Softmax;

mod linearizer;

pub use linearizer::TextLinearizer;

pub mod mnist;

pub use mnist::{normalize_pixel, one_hot, Sample, SampleReader};

mod data_sink;
mod data_source;
mod fft;
mod pass_through;
mod sum;

pub use data_sink::{DataSink, DataSinkSource};
pub use data_source::{DataSource, MAX_CHUNK};
pub use fft::{magnitude_spectrum, FftBlock};
pub use pass_through::PassThroughBlock;
pub use sum::SumBlock;

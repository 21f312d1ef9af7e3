pub(crate) mod png_stream;
pub mod pnm;
pub mod probe;
pub mod region;
pub mod source;

pub use probe::{probe, probe_with_format};
pub use region::{DecodeRequest, DecodeStats, RegionDecoder};
pub use source::{FileSource, ImageSource, MemorySource, SourceHandle};

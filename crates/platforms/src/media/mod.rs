pub mod catalog;
pub mod episode;
pub mod stream_descriptor;

pub use catalog::{CatalogEntry, MediaFormat, ReleaseStatus, Title};
pub use episode::EpisodeRecord;
pub use hls::TimingWindow;
pub use stream_descriptor::{QualityVariant, StreamDescriptor, StreamDescriptorBuilder, Thumbnail};

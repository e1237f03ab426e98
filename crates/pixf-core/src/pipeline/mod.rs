//! Image extraction pipeline components.
//!
//! - **hash**: BLAKE3 content digests for dedup identity
//! - **decode**: Sniff and decode raw blobs into RGBA
//! - **encode**: Lossless PNG / WebP encoders and the format registry
//! - **dedup**: First-seen-wins filtering by digest
//! - **buffer**: Reusable encode buffers
//! - **pool**: Bounded encode + write worker pool
//! - **persist**: Deterministic `image_%04d.<ext>` output files
//! - **processor**: Orchestrates the full pipeline

pub mod buffer;
pub mod decode;
pub mod dedup;
pub mod encode;
pub mod hash;
pub mod persist;
pub mod pool;
pub mod processor;

// Re-exports for convenient access
pub use buffer::{BufferPool, PooledBuffer};
pub use decode::ImageDecoder;
pub use dedup::{Deduplicated, Deduplicator};
pub use encode::{Encoder, EncoderRegistry, OutputMode};
pub use hash::{ContentHasher, Digest};
pub use persist::Persister;
pub use pool::{EncodePool, EncodeTask};
pub use processor::ImageExtractor;

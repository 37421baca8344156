pub mod pinecone;
pub mod store;

pub use pinecone::PineconeStore;
pub use store::{QueryMatch, StoredVector, VectorClient, VectorStore, DEFAULT_BATCH_SIZE};

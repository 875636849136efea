mod insert;
pub use insert::{Insertion, insert_short_term};

pub mod recency;

mod records;
pub use records::{Candidate, FinalChunk, MemoryBucket, RecordFields};

mod rerank;
pub use rerank::{RankedCandidate, RerankParams, into_final_chunks, rerank};

mod search;
pub use search::{SearchParams, search};

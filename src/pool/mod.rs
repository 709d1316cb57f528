// src/pool/mod.rs
// =============================================================================
// Thread pool used to run independent tasks (one per search query).
//
// Submodules:
// - work_queue: the pool itself (execute / finish / shutdown)
// =============================================================================

mod work_queue;

pub use work_queue::WorkQueue;

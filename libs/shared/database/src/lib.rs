pub mod memory;
pub mod store;
pub mod supabase;

pub use memory::MemoryStore;
pub use store::{
    collections, DeleteResult, Document, DocumentStore, Filter, InsertOutcome, InsertResult,
    StoreError, UpdateResult, ID_FIELD,
};
pub use supabase::SupabaseClient;

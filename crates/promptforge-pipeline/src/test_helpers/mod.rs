//! In-memory fakes for pipeline tests: a scripted completion client, an
//! in-memory storage backend, and an in-memory submission store.

pub mod mock_client;
pub mod mock_storage;
pub mod mock_store;

pub use mock_client::MockCompletionClient;
pub use mock_storage::MockStorage;
pub use mock_store::InMemorySubmissionStore;

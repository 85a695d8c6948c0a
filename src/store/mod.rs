mod local;
mod remote;
mod sync;

pub use local::LocalCache;
pub use remote::{MemoryRemote, RemoteError, RemoteRecord, RemoteStore, SignedOutRemote};
pub use sync::{SyncEngine, SyncOutcome};

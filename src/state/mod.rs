mod alert_state;
mod object_store;

pub use alert_state::AlertStateStore;
pub use object_store::{FsObjectStore, ObjectStore};

//! Key-value persistence for course documents and progress
//!
//! Everything the learner produces lives under a few string keys holding
//! JSON text. There is no locking: two processes writing the same key race and the
//! last write wins.

pub mod file;
pub mod memory;

use anyhow::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the processed document exactly as the API returned it
pub const COURSE_DATA_KEY: &str = "courseData";

/// Key holding the progress overlay
pub const COURSE_PROGRESS_KEY: &str = "courseProgress";

/// Key holding the title chosen at upload time, if any
pub const COURSE_TITLE_KEY: &str = "courseTitle";

/// String-keyed store of JSON text
pub trait KeyValueStore {
    /// Read a value, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing whatever was there
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

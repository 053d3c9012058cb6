//! Identity — clients for the remote account/session service.
//!
//! DESIGN
//! ======
//! The session store only sees the `IdentityClient` trait. `AppwriteClient`
//! talks to a hosted Appwrite project over REST; `MemoryIdentity` keeps
//! accounts in process for offline runs and tests.

pub mod appwrite;
pub mod config;
pub mod memory;
pub mod types;

pub use appwrite::AppwriteClient;
pub use memory::MemoryIdentity;
pub use types::{CURRENT_SESSION, IdentityClient, IdentityError, Session, UserId};

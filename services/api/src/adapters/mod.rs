pub mod fixtures;
pub mod memory;
pub mod session_file;
pub mod token;

pub use fixtures::{FixtureDnaMatcher, FixtureSpeciesClassifier};
pub use memory::InMemoryStore;
pub use session_file::FileSessionStorage;
pub use token::{TokenError, TokenService};

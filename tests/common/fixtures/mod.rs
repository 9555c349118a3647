mod documents;

// Re-export test fixtures
pub use documents::*;

pub mod candidate;
pub mod lenient;
pub mod profile;
pub mod requirements;
pub mod score;

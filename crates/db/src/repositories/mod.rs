//! Repositories: all SQL for each table lives in one place.

mod audio_repo;
mod story_repo;

pub use audio_repo::AudioRepo;
pub use story_repo::StoryRepo;

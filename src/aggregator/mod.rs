pub mod categorizer;
pub mod changelog_generator;
pub mod changelog_writer;
pub mod commit_analyzer;
pub mod release_fetcher;

pub use changelog_generator::{ChangelogGenerator, ReleaseNotes};
pub use changelog_writer::ChangelogWriter;
pub use release_fetcher::ReleaseAggregator;

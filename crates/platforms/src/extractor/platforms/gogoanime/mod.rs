mod builder;

pub use builder::GogoAnime;

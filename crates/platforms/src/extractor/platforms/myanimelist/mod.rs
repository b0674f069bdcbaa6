mod builder;

pub use builder::MyAnimeList;

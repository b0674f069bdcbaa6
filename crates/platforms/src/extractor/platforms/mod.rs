pub mod anilist;
pub mod gogoanime;
pub mod gogocdn;
pub mod myanimelist;

pub mod album;
pub mod artist;
pub mod page;
pub mod playlist;
pub mod track;
pub mod youtube;

pub mod archive;
pub mod export;
pub mod wav;

pub mod audio;
pub mod inference;
pub mod observability;

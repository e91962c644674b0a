//! Respiratory sound classification: decodes an uploaded recording, turns it
//! into a normalized log-mel tensor and asks a pretrained classifier which
//! condition it most likely reflects.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

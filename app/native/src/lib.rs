//! wallflip - random wallpaper rotation from a user-chosen folder.
//!
//! The library lists a folder, picks an image uniformly at random, decodes it
//! and applies it as the desktop wallpaper. A small scheduler repeats that on
//! an interval, and the folder choice is persisted between runs.

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod folder;
pub mod platform;
pub mod schema;
pub mod wallpaper;
pub mod worker;

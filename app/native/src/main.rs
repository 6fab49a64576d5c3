#![allow(clippy::multiple_crate_versions)]

//! wallflip - change the desktop wallpaper to a random image from a folder.

fn main() {
    if let Err(err) = wallflip_lib::cli::run() {
        eprintln!("wallflip: {err}");
        std::process::exit(1);
    }
}

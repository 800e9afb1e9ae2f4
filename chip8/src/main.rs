use std::path::PathBuf;

mod keymap;
mod run;

fn main() {
    env_logger::init();

    let rom: PathBuf = std::env::args()
        .nth(1)
        .expect("expected ROM file path but got no arguments")
        .into();
    run::run(rom);
}

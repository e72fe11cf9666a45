use std::process::exit;

use arcade::config::Settings;
use arcade::pong_game::PongGame;
use arcade::{game, logging};

fn main() {
    // The game loop takes care of restoring the terminal before returning
    if let Err(err) = try_main() {
        log::error!("pong exited with error: {}", err);
        eprintln!("pong: {}", err);
        exit(1);
    }
}

fn try_main() -> arcade::Result<()> {
    let settings = Settings::from_env()?;
    logging::init(&settings)?;

    let mut game = PongGame::new();
    game::run(&mut game, &settings)
}

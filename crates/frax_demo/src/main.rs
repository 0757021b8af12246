//! Frax demo game.
//!
//! Usage: `frax_demo [config.json] [player.png] [mascot.gif]`
//!
//! Every argument is optional. Without a config the window opens at the
//! default size; without textures the sprites are drawn as flat squares.

mod collector;

use std::path::Path;

use anyhow::Context as _;
use frax::{load_config_from_path, Frax, FraxConfig, Key, SceneLoop};

use collector::Collector;

fn load_config(path: Option<&str>) -> anyhow::Result<FraxConfig> {
    match path {
        Some(path) => load_config_from_path(Path::new(path))
            .with_context(|| format!("Could not use config '{path}'")),
        None => Ok(FraxConfig {
            title: "Frax Demo".to_string(),
            ..FraxConfig::default()
        }),
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    frax::init_logging(config.log_filter.as_deref());

    let mut frax = Frax::init(&config)?;
    if config.exit_key.is_none() {
        frax.set_exit_key(Some(Key::Escape));
    }

    let mut game = Collector::new(
        &mut frax,
        config.background,
        args.get(1).map(String::as_str),
        args.get(2).map(String::as_str),
    )?;
    let code = game.run(&mut frax)?;
    log::info!("Final score: {}", game.score());

    drop(game);
    frax.close();

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

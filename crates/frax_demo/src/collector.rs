//! "Collector": steer the blue square with WASD, pick up coins, dodge the
//! red squares drifting in from off-screen.

use std::time::Duration;

use frax::{
    colors_equal, AnimatedSprite, Camera2D, Canvas, Color, Frax, Key, Rect, Scene,
    SceneLoop, Sprite, Vec2,
};

const PLAYER_SIZE: f32 = 40.0;
const PLAYER_SPEED: f32 = 320.0;
const COIN_SIZE: f32 = 16.0;
const COIN_COUNT: usize = 8;
const ENEMY_SIZE: f32 = 28.0;
const ENEMY_SPEED: f32 = 90.0;
const ENEMY_SPAWN_EVERY: f32 = 1.5;
const SPAWN_MARGIN: f32 = 32.0;
const HIT_FLASH: f32 = 0.3;
const PLAYER_COLOR: Color = Color::BLUE;
const STARTING_LIVES: u32 = 3;
pub const WINNING_SCORE: u32 = 25;

/// Exit codes handed back from `run`.
pub const EXIT_WON: i32 = 0;
pub const EXIT_LOST: i32 = 1;

/// Coin payload stored in the sprite's user data slot.
struct CoinValue(u32);

pub struct Collector {
    scene: Scene,
    camera: Camera2D,
    player: Sprite,
    mascot: Option<AnimatedSprite>,
    coins: Vec<Sprite>,
    enemies: Vec<Sprite>,
    spawn_timer: f32,
    flash_timer: f32,
    score: u32,
    lives: u32,
    #[cfg(feature = "gui")]
    stats_window: frax::GuiWindow,
}

impl Collector {
    pub fn new(
        frax: &mut Frax,
        background: Color,
        player_texture: Option<&str>,
        mascot_animation: Option<&str>,
    ) -> anyhow::Result<Self> {
        let camera = frax.screen_camera();
        let start = Rect::new(0.0, 0.0, PLAYER_SIZE, PLAYER_SIZE);

        let mut player = Sprite::from_rect(start, PLAYER_COLOR)?;
        player.set_center(camera.target);
        if let Some(path) = player_texture {
            // A missing texture is not fatal; the player stays a flat square.
            if let Err(err) = player.set_texture(frax.textures_mut(), path) {
                log::error!("{err}");
            } else {
                player.tint = Color::WHITE;
            }
        }

        let mascot = match mascot_animation {
            Some(path) => match AnimatedSprite::new(
                Rect::new(16.0, 16.0, 64.0, 64.0),
                frax.textures_mut(),
                path,
                Duration::from_millis(100),
            ) {
                Ok(mascot) => Some(mascot),
                Err(err) => {
                    log::error!("{err}");
                    None
                }
            },
            None => None,
        };

        let mut coins = Vec::with_capacity(COIN_COUNT);
        for i in 0..COIN_COUNT {
            let mut coin = Sprite::with_tint(0.0, 0.0, COIN_SIZE, COIN_SIZE, Color::YELLOW)?;
            coin.set_center(frax.random_position_inside(&camera));
            coin.set_data(CoinValue(if i % 4 == 0 { 3 } else { 1 }));
            if coin.data_ref::<CoinValue>().is_some_and(|v| v.0 > 1) {
                coin.tint = Color::ORANGE;
            }
            coins.push(coin);
        }

        #[cfg(feature = "gui")]
        let stats_window = {
            let mut window = frax::GuiWindow::new(Rect::new(20.0, 20.0, 220.0, 150.0), "Stats");
            window.show();
            window
        };

        Ok(Self {
            scene: Scene::new(background),
            camera,
            player,
            mascot,
            coins,
            enemies: Vec::new(),
            spawn_timer: 0.0,
            flash_timer: 0.0,
            score: 0,
            lives: STARTING_LIVES,
            #[cfg(feature = "gui")]
            stats_window,
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn collect_coins(&mut self, frax: &Frax) {
        for coin in &mut self.coins {
            if !self.player.is_colliding(coin) {
                continue;
            }
            self.score += coin.data_ref::<CoinValue>().map_or(1, |v| v.0);
            coin.set_center(frax.random_position_inside(&self.camera));
        }
    }

    fn move_enemies(&mut self, dt: f32) {
        let target = self.player.center();
        for enemy in &mut self.enemies {
            let heading = (target - enemy.center()).normalize_or_zero();
            let next = enemy.center() + heading * ENEMY_SPEED * dt;
            enemy.set_center(next);
            enemy.rotation = (enemy.rotation + 180.0 * dt) % 360.0;
        }
    }

    fn check_hits(&mut self) {
        let before = self.enemies.len();
        let player = &self.player;
        self.enemies.retain(|enemy| !player.is_colliding(enemy));
        let hits = (before - self.enemies.len()) as u32;
        if hits == 0 {
            return;
        }

        self.lives = self.lives.saturating_sub(hits);
        self.flash_timer = HIT_FLASH;
        if !self.player.is_textured() {
            self.player.tint = Color::RED;
        }
        log::info!("Hit! {} lives left", self.lives);
    }

    fn keep_player_on_screen(&mut self, screen: Vec2) {
        let size = self.player.size();
        let clamped = self
            .player
            .position()
            .clamp(Vec2::ZERO, (screen - size).max(Vec2::ZERO));
        self.player.set_position(clamped);
    }
}

impl SceneLoop<Frax> for Collector {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn update(&mut self, frax: &mut Frax, dt: f32) -> anyhow::Result<()> {
        self.camera = frax.screen_camera();

        if frax.input().is_just_pressed(Key::Q) {
            log::info!("Quit with score {}", self.score);
            self.scene.close(EXIT_WON);
            return Ok(());
        }

        #[cfg(feature = "gui")]
        {
            if frax.input().is_just_pressed(Key::F1) {
                self.stats_window.toggle();
            }
            self.stats_window.update(frax.input());
        }

        frax.wasd_movement(&mut self.player, PLAYER_SPEED * dt);
        self.keep_player_on_screen(frax.screen_size());

        self.spawn_timer += dt;
        if self.spawn_timer >= ENEMY_SPAWN_EVERY {
            self.spawn_timer -= ENEMY_SPAWN_EVERY;
            let mut enemy = Sprite::with_tint(0.0, 0.0, ENEMY_SIZE, ENEMY_SIZE, Color::RED)?;
            enemy.set_center(frax.random_position_outside(&self.camera, SPAWN_MARGIN));
            self.enemies.push(enemy);
        }

        self.move_enemies(dt);
        self.collect_coins(frax);
        self.check_hits();

        if self.flash_timer > 0.0 {
            self.flash_timer -= dt;
            if self.flash_timer <= 0.0 && colors_equal(self.player.tint, Color::RED) {
                self.player.tint = PLAYER_COLOR;
            }
        }

        if let Some(mascot) = &mut self.mascot {
            mascot.advance(Duration::from_secs_f32(dt.max(0.0)));
        }

        if self.lives == 0 {
            log::info!("Game over with score {}", self.score);
            self.scene.close(EXIT_LOST);
        } else if self.score >= WINNING_SCORE {
            log::info!("You win with score {}", self.score);
            self.scene.close(EXIT_WON);
        }
        Ok(())
    }

    fn draw(&mut self, frax: &mut Frax) -> anyhow::Result<()> {
        for coin in &self.coins {
            coin.draw(frax);
        }
        for enemy in &self.enemies {
            enemy.draw(frax);
        }
        self.player.draw(frax);
        if let Some(mascot) = &self.mascot {
            mascot.draw(frax);
        }

        // Lives as small squares along the top edge.
        let screen = frax.screen_size();
        for i in 0..self.lives {
            let x = screen.x - 24.0 * (i + 1) as f32;
            frax.draw_rectangle(Rect::new(x, 8.0, 16.0, 16.0), PLAYER_COLOR);
        }

        #[cfg(feature = "gui")]
        {
            let stats = frax.frame_stats();
            let fps = frax.fps();
            let (score, lives, enemies) = (self.score, self.lives, self.enemies.len());
            self.stats_window.draw(frax.gui(), |ui, _origin| {
                ui.label(format!("Score: {score} / {WINNING_SCORE}"));
                ui.label(format!("Lives: {lives}"));
                ui.label(format!("Enemies: {enemies}"));
                ui.separator();
                ui.label(format!("FPS: {fps:.1}"));
                ui.label(format!("Quads: {}  Draw calls: {}", stats.quads, stats.draw_calls));
            });
        }

        Ok(())
    }
}

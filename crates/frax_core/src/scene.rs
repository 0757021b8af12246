//! Scene run-loop.
//!
//! `Scene` holds the loop state (background, running/closed, exit code);
//! `SceneLoop` is the capability a game type implements to plug its own
//! update/draw hooks into the frame loop:
//!
//!   1. poll the close condition (own flag OR the window's close signal)
//!   2. `update(dt)`
//!   3. begin frame, clear to the background color, `draw()`, end frame
//!
//! A close requested during a frame takes effect at the next check, so the
//! current frame is always drawn and presented.

use crate::backend::Backend;
use crate::color::Color;

pub const DEFAULT_BACKGROUND: Color = Color::BLACK;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneStatus {
    Running,
    /// Terminal.
    Closed,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    status: SceneStatus,
    exit_code: i32,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            status: SceneStatus::Running,
            exit_code: 0,
        }
    }

    /// Request the loop to stop after the current frame, returning `exit_code`.
    pub fn close(&mut self, exit_code: i32) {
        if self.status == SceneStatus::Running {
            log::debug!("Scene closing with code {exit_code}");
        }
        self.status = SceneStatus::Closed;
        self.exit_code = exit_code;
    }

    pub fn is_running(&self) -> bool {
        self.status == SceneStatus::Running
    }

    pub fn status(&self) -> SceneStatus {
        self.status
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    fn mark_closed(&mut self) {
        self.status = SceneStatus::Closed;
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND)
    }
}

/// A game state driven by [`SceneLoop::run`]. Only `scene`/`scene_mut` are
/// required; every hook defaults to a no-op.
pub trait SceneLoop<B: Backend> {
    fn scene(&self) -> &Scene;

    fn scene_mut(&mut self) -> &mut Scene;

    fn update(&mut self, _backend: &mut B, _dt: f32) -> anyhow::Result<()> {
        Ok(())
    }

    fn draw(&mut self, _canvas: &mut B) -> anyhow::Result<()> {
        Ok(())
    }

    fn should_close(&self, backend: &mut B) -> bool {
        !self.scene().is_running() || backend.window_should_close()
    }

    /// Run frames until closed and return the exit code.
    ///
    /// Hook errors abort the loop and are returned as-is; the failing frame
    /// is not presented.
    fn run(&mut self, backend: &mut B) -> anyhow::Result<i32> {
        while !self.should_close(backend) {
            let dt = backend.frame_time();
            self.update(backend, dt)?;

            backend.begin_drawing();
            let background = self.scene().background;
            backend.clear_background(background);
            self.draw(backend)?;
            backend.end_drawing();
        }

        let scene = self.scene_mut();
        scene.mark_closed();
        log::info!("Scene finished with code {}", scene.exit_code());
        Ok(scene.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Canvas;
    use crate::geometry::Rect;
    use crate::testing::{DrawOp, FrameEvent, MockBackend};

    struct Countdown {
        scene: Scene,
        close_on_frame: u32,
        code: i32,
        updates: u32,
        draws: u32,
    }

    impl Countdown {
        fn new(close_on_frame: u32, code: i32) -> Self {
            Self {
                scene: Scene::new(Color::RAYWHITE),
                close_on_frame,
                code,
                updates: 0,
                draws: 0,
            }
        }
    }

    impl SceneLoop<MockBackend> for Countdown {
        fn scene(&self) -> &Scene {
            &self.scene
        }

        fn scene_mut(&mut self) -> &mut Scene {
            &mut self.scene
        }

        fn update(&mut self, _backend: &mut MockBackend, dt: f32) -> anyhow::Result<()> {
            assert!(dt > 0.0);
            self.updates += 1;
            if self.updates == self.close_on_frame {
                self.scene.close(self.code);
            }
            Ok(())
        }

        fn draw(&mut self, canvas: &mut MockBackend) -> anyhow::Result<()> {
            self.draws += 1;
            canvas.draw_rectangle(Rect::new(0.0, 0.0, 1.0, 1.0), Color::RED);
            Ok(())
        }
    }

    #[test]
    fn close_in_update_finishes_the_frame_then_returns_code() {
        let mut backend = MockBackend::default();
        let mut game = Countdown::new(5, 7);

        let code = game.run(&mut backend).expect("loop runs");

        assert_eq!(code, 7);
        assert_eq!(game.updates, 5);
        assert_eq!(game.draws, 5);
        assert_eq!(backend.frames_presented, 5);
        assert!(!game.scene.is_running());
        assert_eq!(game.scene.status(), SceneStatus::Closed);
    }

    #[test]
    fn frame_order_is_update_clear_draw_present() {
        let mut backend = MockBackend::default();
        let mut game = Countdown::new(1, 0);
        game.run(&mut backend).expect("loop runs");

        assert_eq!(
            backend.events,
            vec![
                FrameEvent::Begin,
                FrameEvent::Draw(DrawOp::Clear(Color::RAYWHITE)),
                FrameEvent::Draw(DrawOp::Rectangle {
                    rect: Rect::new(0.0, 0.0, 1.0, 1.0),
                    color: Color::RED,
                }),
                FrameEvent::End,
            ]
        );
    }

    #[test]
    fn window_close_signal_stops_the_loop() {
        let mut backend = MockBackend::closing_after(3);
        let mut game = Countdown::new(u32::MAX, 9);

        let code = game.run(&mut backend).expect("loop runs");

        assert_eq!(code, 0, "exit code untouched by the window signal");
        assert_eq!(backend.frames_presented, 3);
        assert_eq!(game.scene.status(), SceneStatus::Closed);
    }

    #[test]
    fn already_closed_scene_runs_no_frames() {
        let mut backend = MockBackend::default();
        let mut game = Countdown::new(1, 0);
        game.scene.close(3);

        assert_eq!(game.run(&mut backend).expect("loop runs"), 3);
        assert_eq!(backend.frames_presented, 0);
        assert_eq!(backend.close_polls, 0, "own flag short-circuits the poll");
    }

    #[test]
    fn hook_errors_propagate_out_of_run() {
        struct Failing {
            scene: Scene,
        }

        impl SceneLoop<MockBackend> for Failing {
            fn scene(&self) -> &Scene {
                &self.scene
            }

            fn scene_mut(&mut self) -> &mut Scene {
                &mut self.scene
            }

            fn draw(&mut self, _canvas: &mut MockBackend) -> anyhow::Result<()> {
                anyhow::bail!("sprite sheet exploded")
            }
        }

        let mut backend = MockBackend::default();
        let mut game = Failing {
            scene: Scene::default(),
        };
        let err = game.run(&mut backend).expect_err("draw fails");
        assert!(err.to_string().contains("sprite sheet exploded"));
        assert_eq!(backend.frames_presented, 0);
    }

    #[test]
    fn default_scene_uses_default_background() {
        let scene = Scene::default();
        assert_eq!(scene.background, DEFAULT_BACKGROUND);
        assert!(scene.is_running());
        assert_eq!(scene.exit_code(), 0);
    }

    #[test]
    fn default_hooks_only_clear() {
        struct Empty(Scene);

        impl SceneLoop<MockBackend> for Empty {
            fn scene(&self) -> &Scene {
                &self.0
            }

            fn scene_mut(&mut self) -> &mut Scene {
                &mut self.0
            }
        }

        let mut backend = MockBackend::closing_after(2);
        let mut empty = Empty(Scene::new(Color::BLUE));
        empty.run(&mut backend).expect("loop runs");

        let draws: Vec<_> = backend.draws().cloned().collect();
        assert_eq!(draws, vec![DrawOp::Clear(Color::BLUE); 2]);
    }
}

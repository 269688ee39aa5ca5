//! Terminal host for the wireframe renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Vector3;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use wire3d_core::{Scene, SurfaceError};

pub mod demo;
pub mod surface;

pub use demo::{demo_scene, DemoPath};
pub use surface::TerminalSurface;

/// Scale that fits the demo grid into a typical terminal
pub const TERMINAL_SCALE: f32 = 16.0;

const CONTROLS_HINT: &str = "W/S=Z Arrows=XY P=Autopilot Q=Quit";

/// Observer step per key press, in world units
const KEY_STEP: f32 = 0.1;

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Move(Vector3<f32>),
    ToggleAutopilot,
}

/// Map a key to an action
pub fn key_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('w') => Action::Move(Vector3::new(0.0, 0.0, KEY_STEP)),
        KeyCode::Char('s') => Action::Move(Vector3::new(0.0, 0.0, -KEY_STEP)),
        KeyCode::Left => Action::Move(Vector3::new(-KEY_STEP, 0.0, 0.0)),
        KeyCode::Right => Action::Move(Vector3::new(KEY_STEP, 0.0, 0.0)),
        KeyCode::Up => Action::Move(Vector3::new(0.0, -KEY_STEP, 0.0)),
        KeyCode::Down => Action::Move(Vector3::new(0.0, KEY_STEP, 0.0)),
        KeyCode::Char('p') => Action::ToggleAutopilot,
        _ => return None,
    };
    Some(action)
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    scene: Scene,
    surface: TerminalSurface,
    path: DemoPath,
    autopilot: bool,
    pending: Vector3<f32>,
    running: bool,
    frame_interval: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> Result<Self, SurfaceError> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            frame_interval: scene.config().frame_interval(),
            scene,
            surface: TerminalSurface::new(width as usize, height as usize),
            path: DemoPath::default(),
            autopilot: true,
            pending: Vector3::zeros(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<(), SurfaceError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<(), SurfaceError> {
        info!(interval_ms = self.frame_interval.as_millis() as u64, "starting frame loop");

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            let (width, height) = terminal::size()?;
            self.surface.resize(width as usize, height as usize);

            self.update()?;
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_interval {
                std::thread::sleep(self.frame_interval - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("frame loop stopped");
        Ok(())
    }

    fn handle_input(&mut self) -> Result<(), SurfaceError> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match key_action(code) {
                Some(Action::Quit) => self.running = false,
                Some(Action::Move(delta)) => self.pending += delta,
                Some(Action::ToggleAutopilot) => {
                    self.autopilot = !self.autopilot;
                    debug!(autopilot = self.autopilot, "autopilot toggled");
                }
                None => {}
            }
        }
        Ok(())
    }

    fn update(&mut self) -> Result<(), SurfaceError> {
        let pending = std::mem::replace(&mut self.pending, Vector3::zeros());
        let path = self.autopilot.then_some(self.path);

        self.scene.tick_with(&mut self.surface, |scene| {
            if let Some(path) = path {
                path.advance(scene);
            }
            if pending != Vector3::zeros() {
                scene.translate_observer(pending);
            }
        })?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.surface.rasterize();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.surface.draw(&mut stdout)?;

        // Draw UI overlay
        let observer = self.scene.observer().position;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Wire3D | FPS: {:.1} | Observer: ({:.2}, {:.2}, {:.2}) | {}",
                self.fps, observer.x, observer.y, observer.z, CONTROLS_HINT
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

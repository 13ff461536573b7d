//! Snowfall particle field.
//!
//! Positions use the browser's units: `x` is a percentage of the viewport
//! width and `y` is pixels from the top. One `step` is one animation frame.

use rand::Rng;
use serde::Serialize;

use crate::config::SnowConfig;

/// Flakes start this far above the viewport
const SPAWN_Y: f64 = -10.0;
const SPAWN_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snowflake {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub wind: f64,
    pub size: f64,
    pub opacity: f64,
}

impl Snowflake {
    fn spawn<R: Rng>(config: &SnowConfig, rng: &mut R) -> Self {
        Self {
            x: rng.gen::<f64>() * 100.0,
            y: SPAWN_Y,
            speed: between(rng, config.min_speed, config.max_speed),
            wind: (rng.gen::<f64>() - 0.5) * config.wind,
            size: between(rng, config.min_size, config.max_size),
            opacity: rng.gen::<f64>() * 0.6 + 0.4,
        }
    }

    fn is_off_screen(&self, viewport_height: f64) -> bool {
        self.y > viewport_height || self.x < -5.0 || self.x > 105.0
    }
}

// Tolerates min == max, unlike gen_range
fn between<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.gen::<f64>() * (max - min) + min
}

pub struct SnowField {
    config: SnowConfig,
    viewport_height: f64,
    flakes: Vec<Snowflake>,
    running: bool,
}

impl SnowField {
    /// Seed half the maximum number of flakes at random heights. The field
    /// starts stopped.
    pub fn new<R: Rng>(config: SnowConfig, viewport_height: f64, rng: &mut R) -> Self {
        let flakes = (0..config.flake_limit() / 2)
            .map(|_| {
                let mut flake = Snowflake::spawn(&config, rng);
                flake.y = rng.gen::<f64>() * viewport_height;
                flake
            })
            .collect();

        Self {
            config,
            viewport_height,
            flakes,
            running: false,
        }
    }

    /// Advance one frame. Returns false when the field is stopped.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> bool {
        if !self.running {
            return false;
        }

        let height = self.viewport_height;
        for flake in &mut self.flakes {
            flake.y += flake.speed;
            flake.x += flake.wind;
        }
        self.flakes.retain(|flake| !flake.is_off_screen(height));

        if self.flakes.len() < self.config.flake_limit() && rng.gen::<f64>() < SPAWN_CHANCE {
            self.flakes.push(Snowflake::spawn(&self.config, rng));
        }
        true
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Follow document visibility: hidden stops, visible restarts
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.start();
        } else {
            self.stop();
        }
    }

    /// New viewport height; flakes past the right edge are pulled back to it
    pub fn resize(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
        for flake in &mut self.flakes {
            if flake.x > 100.0 {
                flake.x = 100.0;
            }
        }
    }

    /// Start, then advance `frames` frames
    pub fn run_frames<R: Rng>(&mut self, frames: usize, rng: &mut R) {
        self.start();
        for _ in 0..frames {
            self.step(rng);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn config(&self) -> &SnowConfig {
        &self.config
    }
}

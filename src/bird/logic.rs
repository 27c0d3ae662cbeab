//! Bird physics and animation.

use super::types::Bird;
use crate::core::constants::DIVE_FRAME_TILT;
use crate::core::BirdConfig;

/// Outcome of one physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdStep {
    /// Vertical movement applied this tick, bias included.
    pub displacement: f64,
    /// The nose-dive rotation was applied this tick.
    pub dive_step: bool,
}

/// Kinematic displacement `v·t + ½·a·t²`, clamped to `±terminal_velocity`.
pub fn displacement(velocity: f64, ticks: u32, gravity: f64, terminal_velocity: f64) -> f64 {
    let t = ticks as f64;
    let d = velocity * t + 0.5 * gravity * t * t;
    d.clamp(-terminal_velocity, terminal_velocity)
}

impl Bird {
    /// Flap: upward velocity, restart the tick counter, remember where the
    /// jump started.
    pub fn jump(&mut self, config: &BirdConfig) {
        self.velocity = config.jump_velocity;
        self.tick_count = 0;
        self.height = self.y;
    }

    /// Advance one tick of motion and tilt.
    pub fn advance_tick(&mut self, config: &BirdConfig) -> BirdStep {
        self.tick_count += 1;

        let mut d = displacement(
            self.velocity,
            self.tick_count,
            config.gravity,
            config.terminal_velocity,
        );
        if d < 0.0 {
            d -= config.upward_bias;
        }
        self.y += d;

        let mut dive_step = false;
        if d < 0.0 || self.y < self.height + config.tilt_hold_distance {
            if self.tilt < config.max_tilt {
                self.tilt = config.max_tilt;
            }
        } else if self.tilt > config.min_tilt {
            self.tilt = (self.tilt - config.rotation_step).max(config.min_tilt);
            dive_step = true;
        }

        BirdStep {
            displacement: d,
            dive_step,
        }
    }

    /// Advance the flap cycle (0, 1, 2, 1, 0 with `animation_ticks` per frame).
    /// A nose-diving bird holds frame 0 and resumes mid-cycle on the next flap.
    pub fn animate(&mut self, config: &BirdConfig) {
        let t = config.animation_ticks;
        self.img_count += 1;

        self.frame = if self.img_count <= t {
            0
        } else if self.img_count <= t * 2 {
            1
        } else if self.img_count <= t * 3 {
            2
        } else if self.img_count <= t * 4 {
            1
        } else {
            self.img_count = 0;
            0
        };

        if self.tilt <= DIVE_FRAME_TILT {
            self.frame = 0;
            self.img_count = t * 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BirdConfig {
        BirdConfig::default()
    }

    #[test]
    fn test_displacement_from_rest() {
        assert!((displacement(0.0, 1, 3.0, 16.0) - 1.5).abs() < 1e-9);
        assert!((displacement(0.0, 2, 3.0, 16.0) - 6.0).abs() < 1e-9);
        assert!((displacement(0.0, 3, 3.0, 16.0) - 13.5).abs() < 1e-9);
        // Capped from the fourth tick on
        assert!((displacement(0.0, 4, 3.0, 16.0) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_displacement_clamps_upward() {
        assert!((displacement(-40.0, 1, 3.0, 16.0) + 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_jump_resets_counter_and_height() {
        let cfg = config();
        let mut bird = Bird::new(230.0, 300.0);
        for _ in 0..7 {
            bird.advance_tick(&cfg);
        }
        let y = bird.y;
        bird.jump(&cfg);
        assert_eq!(bird.tick_count, 0);
        assert!((bird.height - y).abs() < f64::EPSILON);
        assert!((bird.velocity - cfg.jump_velocity).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jump_moves_up_with_bias() {
        let cfg = config();
        let mut bird = Bird::new(230.0, 300.0);
        bird.jump(&cfg);
        let step = bird.advance_tick(&cfg);
        // -10.5 + 1.5 = -9, then the 2 unit bias
        assert!((step.displacement + 11.0).abs() < 1e-9);
        assert!((bird.y - 289.0).abs() < 1e-9);
        assert!((bird.tilt - cfg.max_tilt).abs() < f64::EPSILON);
    }

    #[test]
    fn test_falls_to_floor_in_fixed_ticks() {
        // Spawned at 350 with no input, the sprite bottom (y + 48 - 10)
        // reaches the floor at 700 on tick 22.
        let cfg = config();
        let mut bird = Bird::spawn(&cfg);
        let mut ticks = 0;
        while bird.y + 48.0 - 10.0 < 700.0 {
            bird.advance_tick(&cfg);
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(ticks, 22);
        assert!((bird.y - 675.0).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_holds_until_below_jump_height() {
        let cfg = config();
        let mut bird = Bird::new(230.0, 300.0);
        // Falling from rest: 1.5, 6, 13.5, 16 ... stays within 50 for 4 ticks
        for _ in 0..4 {
            let step = bird.advance_tick(&cfg);
            assert!(!step.dive_step);
            assert!((bird.tilt - 25.0).abs() < f64::EPSILON);
        }
        let step = bird.advance_tick(&cfg);
        assert!(step.dive_step);
        assert!((bird.tilt - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tilt_stops_at_min() {
        let cfg = config();
        let mut bird = Bird::new(230.0, 0.0);
        let mut dives = 0;
        for _ in 0..40 {
            if bird.advance_tick(&cfg).dive_step {
                dives += 1;
            }
        }
        assert!((bird.tilt - cfg.min_tilt).abs() < f64::EPSILON);
        // 25 -> 5 -> -15 -> -35 -> -55 -> -75 -> -90
        assert_eq!(dives, 6);
    }

    #[test]
    fn test_animation_cycle() {
        let cfg = config();
        let mut bird = Bird::new(0.0, 0.0);
        let mut frames = Vec::new();
        for _ in 0..21 {
            bird.animate(&cfg);
            frames.push(bird.frame);
        }
        let expected: Vec<usize> = [0; 5]
            .iter()
            .chain([1; 5].iter())
            .chain([2; 5].iter())
            .chain([1; 5].iter())
            .chain([0; 1].iter())
            .copied()
            .collect();
        assert_eq!(frames, expected);
        assert_eq!(bird.img_count, 0);
    }

    #[test]
    fn test_animation_holds_first_frame_when_diving() {
        let cfg = config();
        let mut bird = Bird::new(0.0, 0.0);
        bird.tilt = -90.0;
        for _ in 0..12 {
            bird.animate(&cfg);
        }
        assert_eq!(bird.frame, 0);
        assert_eq!(bird.img_count, 10);

        // Pulling out of the dive resumes on the third frame
        bird.tilt = 25.0;
        bird.animate(&cfg);
        assert_eq!(bird.frame, 2);
    }
}

//! Optional TOML configuration for the headless runner.

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use pinpin_core::{Difficulty, ScreenSize};
use pinpin_system_matching::Config as MatchConfig;
use serde::Deserialize;

/// Complete runner configuration, every field falling back to design values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunConfig {
    pub(crate) board: BoardSection,
    #[serde(rename = "match")]
    pub(crate) matching: MatchSection,
}

/// `[board]` section: placement stage settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardSection {
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: u64,
    pub(crate) screen_width: f32,
    pub(crate) screen_height: f32,
    /// Largest distance, in pixels, the autoplayer misses its slot by on the first attempt.
    pub(crate) aim_jitter_px: f32,
    pub(crate) max_attempts: u32,
}

impl BoardSection {
    pub(crate) fn screen(&self) -> ScreenSize {
        ScreenSize::new(self.screen_width, self.screen_height)
    }
}

impl Default for BoardSection {
    fn default() -> Self {
        let screen = ScreenSize::default();
        Self {
            difficulty: Difficulty::Easy,
            seed: 1,
            screen_width: screen.width(),
            screen_height: screen.height(),
            aim_jitter_px: 60.0,
            max_attempts: 8,
        }
    }
}

/// `[match]` section: matching stage settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MatchSection {
    pub(crate) seed: u64,
    pub(crate) duration_secs: u64,
    pub(crate) frame_ms: u64,
    pub(crate) reaction_ms: u64,
    pub(crate) initial_lives: u32,
    pub(crate) initial_spawn_interval_ms: u64,
    pub(crate) min_spawn_interval_ms: u64,
    pub(crate) spawn_interval_step_ms: u64,
    pub(crate) match_reward: u32,
    pub(crate) min_fall_speed: f32,
    pub(crate) max_fall_speed: f32,
}

impl MatchSection {
    /// Engine configuration for the provided screen.
    pub(crate) fn engine_config(&self, screen: ScreenSize) -> MatchConfig {
        MatchConfig {
            initial_lives: self.initial_lives,
            initial_spawn_interval: Duration::from_millis(self.initial_spawn_interval_ms),
            min_spawn_interval: Duration::from_millis(self.min_spawn_interval_ms),
            spawn_interval_step: Duration::from_millis(self.spawn_interval_step_ms),
            match_reward: self.match_reward,
            min_fall_speed: self.min_fall_speed,
            max_fall_speed: self.max_fall_speed,
            screen,
            rng_seed: self.seed,
            ..MatchConfig::default()
        }
    }
}

impl Default for MatchSection {
    fn default() -> Self {
        let engine = MatchConfig::default();
        Self {
            seed: 7,
            duration_secs: 60,
            frame_ms: 16,
            reaction_ms: 900,
            initial_lives: engine.initial_lives,
            initial_spawn_interval_ms: millis(engine.initial_spawn_interval),
            min_spawn_interval_ms: millis(engine.min_spawn_interval),
            spawn_interval_step_ms: millis(engine.spawn_interval_step),
            match_reward: engine.match_reward,
            min_fall_speed: engine.min_fall_speed,
            max_fall_speed: engine.max_fall_speed,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Reads the configuration file, or returns defaults when no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
}

fn parse(contents: &str) -> Result<RunConfig> {
    let config: RunConfig =
        toml::from_str(contents).context("failed to parse config toml contents")?;
    config.validate()?;
    Ok(config)
}

impl RunConfig {
    fn validate(&self) -> Result<()> {
        let floats = [
            ("board.screen_width", self.board.screen_width),
            ("board.screen_height", self.board.screen_height),
            ("board.aim_jitter_px", self.board.aim_jitter_px),
            ("match.min_fall_speed", self.matching.min_fall_speed),
            ("match.max_fall_speed", self.matching.max_fall_speed),
        ];
        for (key, value) in floats {
            ensure!(value.is_finite(), "{key} must be finite, got {value}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_design_values() {
        let config = parse("").expect("config");
        assert_eq!(config, RunConfig::default());

        let engine = config.matching.engine_config(config.board.screen());
        assert_eq!(engine.initial_lives, 5);
        assert_eq!(engine.initial_spawn_interval, Duration::from_millis(2_000));
        assert_eq!(engine.min_spawn_interval, Duration::from_millis(500));
        assert_eq!(engine.match_reward, 10);
    }

    #[test]
    fn sections_override_individual_fields() {
        let config = parse(
            r#"
            [board]
            difficulty = "hard"
            seed = 99

            [match]
            initial_lives = 3
            min_spawn_interval_ms = 800
            "#,
        )
        .expect("config");

        assert_eq!(config.board.difficulty, Difficulty::Hard);
        assert_eq!(config.board.seed, 99);
        assert_eq!(config.board.screen_width, 1280.0);
        let engine = config.matching.engine_config(config.board.screen());
        assert_eq!(engine.initial_lives, 3);
        assert_eq!(engine.min_spawn_interval, Duration::from_millis(800));
        assert_eq!(engine.rng_seed, 7);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = parse("[board]\nlevel = 3\n").expect_err("unknown key must fail");
        assert!(format!("{error:#}").contains("level"));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let error = parse("[board]\naim_jitter_px = nan\n").expect_err("nan jitter must fail");
        assert!(format!("{error:#}").contains("board.aim_jitter_px"));

        let error = parse("[match]\nmax_fall_speed = inf\n").expect_err("infinite speed must fail");
        assert!(format!("{error:#}").contains("match.max_fall_speed"));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load(Some(Path::new("/definitely/not/here.toml"))).expect_err("must fail");
        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}

//! Game configuration resource.
//!
//! Manages simulation and character tuning loaded from an INI configuration
//! file. Provides defaults for safe startup and methods to load/save
//! configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! fixed_step = 0.02
//! max_steps_per_frame = 8
//!
//! [gravity]
//! magnitude = 9.81
//! direction = down
//! toggle = up
//!
//! [movement]
//! walk_speed = 3
//! run_speed = 6
//!
//! [jump]
//! min_height = 1
//! max_height = 3.5
//! end_gravity_multiplier = 0.8
//! cut_mode = one_shot
//! coyote_time = 0.1
//!
//! [ground_check]
//! height = 0.05
//! inset = 0.05
//! excluded_layers = player
//!
//! [obstacle_check]
//! distance = 0.1
//! height = 0.8
//! layers = obstacle
//!
//! [animation]
//! push_run_speed = 1.5
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use std::str::FromStr;

use crate::components::collisionlayer::LayerMask;
use crate::components::locomotion::{JumpCutMode, LocomotionConfig};
use crate::resources::gravity::{DEFAULT_GRAVITY_MAGNITUDE, GravityDirection};
use crate::resources::worldtime::{DEFAULT_FIXED_STEP, DEFAULT_MAX_STEPS_PER_FRAME};

const DEFAULT_PUSH_RUN_SPEED: f32 = 1.5;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Seconds per physics tick.
    pub fixed_step: f32,
    pub max_steps_per_frame: u32,
    pub gravity_magnitude: f32,
    /// Gravity direction at simulation start.
    pub gravity_direction: GravityDirection,
    /// Where the debug gravity toggle sends gravity.
    pub gravity_toggle: GravityDirection,
    /// Character tuning.
    pub locomotion: LocomotionConfig,
    /// Animation playback speed while running into an obstacle.
    pub push_run_speed: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_float(config: &Ini, section: &str, key: &str) -> Result<Option<f32>, String> {
    config
        .getfloat(section, key)
        .map(|v| v.map(|v| v as f32))
        .map_err(|e| format!("[{}] {}: {}", section, key, e))
}

fn get_parsed<T: FromStr<Err = String>>(
    config: &Ini,
    section: &str,
    key: &str,
) -> Result<Option<T>, String> {
    config
        .get(section, key)
        .map(|raw| raw.parse::<T>())
        .transpose()
        .map_err(|e| format!("[{}] {}: {}", section, key, e))
}

fn set_value(config: &mut Ini, section: &str, key: &str, value: impl ToString) {
    config.set(section, key, Some(value.to_string()));
}

fn layer_names(mask: LayerMask) -> String {
    if mask == LayerMask::ALL {
        return "all".to_string();
    }
    let named = [
        (LayerMask::DEFAULT, "default"),
        (LayerMask::GROUND, "ground"),
        (LayerMask::PLAYER, "player"),
        (LayerMask::OBSTACLE, "obstacle"),
    ];
    let names: Vec<&str> = named
        .iter()
        .filter(|(layer, _)| mask.contains(*layer))
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            fixed_step: DEFAULT_FIXED_STEP,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            gravity_magnitude: DEFAULT_GRAVITY_MAGNITUDE,
            gravity_direction: GravityDirection::Down,
            gravity_toggle: GravityDirection::Up,
            locomotion: LocomotionConfig::default(),
            push_run_speed: DEFAULT_PUSH_RUN_SPEED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or a value cannot be parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config)?;

        info!(
            "Loaded config: step={}s, gravity={} {}, walk={}, run={}, jump={}..{}",
            self.fixed_step,
            self.gravity_magnitude,
            self.gravity_direction,
            self.locomotion.walk_speed,
            self.locomotion.run_speed,
            self.locomotion.min_jump_height,
            self.locomotion.max_jump_height
        );

        Ok(())
    }

    /// Read configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config)
    }

    fn apply_ini(&mut self, config: &Ini) -> Result<(), String> {
        // [simulation] section
        if let Some(step) = get_float(config, "simulation", "fixed_step")? {
            self.fixed_step = step;
        }
        if let Some(max) = config
            .getuint("simulation", "max_steps_per_frame")
            .map_err(|e| format!("[simulation] max_steps_per_frame: {}", e))?
        {
            self.max_steps_per_frame = max as u32;
        }

        // [gravity] section
        if let Some(magnitude) = get_float(config, "gravity", "magnitude")? {
            self.gravity_magnitude = magnitude;
        }
        if let Some(direction) = get_parsed(config, "gravity", "direction")? {
            self.gravity_direction = direction;
        }
        if let Some(direction) = get_parsed(config, "gravity", "toggle")? {
            self.gravity_toggle = direction;
        }

        let loco = &mut self.locomotion;
        // [movement] section
        if let Some(v) = get_float(config, "movement", "walk_speed")? {
            loco.walk_speed = v;
        }
        if let Some(v) = get_float(config, "movement", "run_speed")? {
            loco.run_speed = v;
        }

        // [jump] section
        if let Some(v) = get_float(config, "jump", "min_height")? {
            loco.min_jump_height = v;
        }
        if let Some(v) = get_float(config, "jump", "max_height")? {
            loco.max_jump_height = v;
        }
        if let Some(v) = get_float(config, "jump", "end_gravity_multiplier")? {
            loco.jump_end_gravity_multiplier = v;
        }
        if let Some(mode) = get_parsed::<JumpCutMode>(config, "jump", "cut_mode")? {
            loco.jump_cut_mode = mode;
        }
        if let Some(v) = get_float(config, "jump", "coyote_time")? {
            loco.coyote_time = v;
        }

        // [ground_check] section
        if let Some(v) = get_float(config, "ground_check", "height")? {
            loco.ground_check_height = v;
        }
        if let Some(v) = get_float(config, "ground_check", "inset")? {
            loco.ground_check_inset = v;
        }
        if let Some(mask) = get_parsed(config, "ground_check", "excluded_layers")? {
            loco.excluded_ground_layers = mask;
        }

        // [obstacle_check] section
        if let Some(v) = get_float(config, "obstacle_check", "distance")? {
            loco.obstacle_check_distance = v;
        }
        if let Some(v) = get_float(config, "obstacle_check", "height")? {
            loco.obstacle_check_height = v;
        }
        if let Some(mask) = get_parsed(config, "obstacle_check", "layers")? {
            loco.obstacle_layers = mask;
        }

        // [animation] section
        if let Some(v) = get_float(config, "animation", "push_run_speed")? {
            self.push_run_speed = v;
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        let loco = &self.locomotion;

        set_value(&mut config, "simulation", "fixed_step", self.fixed_step);
        set_value(&mut config, "simulation", "max_steps_per_frame", self.max_steps_per_frame);

        set_value(&mut config, "gravity", "magnitude", self.gravity_magnitude);
        set_value(&mut config, "gravity", "direction", self.gravity_direction);
        set_value(&mut config, "gravity", "toggle", self.gravity_toggle);

        set_value(&mut config, "movement", "walk_speed", loco.walk_speed);
        set_value(&mut config, "movement", "run_speed", loco.run_speed);

        set_value(&mut config, "jump", "min_height", loco.min_jump_height);
        set_value(&mut config, "jump", "max_height", loco.max_jump_height);
        set_value(
            &mut config,
            "jump",
            "end_gravity_multiplier",
            loco.jump_end_gravity_multiplier,
        );
        let cut_mode = match loco.jump_cut_mode {
            JumpCutMode::OneShot => "one_shot",
            JumpCutMode::Decay => "decay",
        };
        set_value(&mut config, "jump", "cut_mode", cut_mode);
        set_value(&mut config, "jump", "coyote_time", loco.coyote_time);

        set_value(&mut config, "ground_check", "height", loco.ground_check_height);
        set_value(&mut config, "ground_check", "inset", loco.ground_check_inset);
        set_value(
            &mut config,
            "ground_check",
            "excluded_layers",
            layer_names(loco.excluded_ground_layers),
        );

        set_value(&mut config, "obstacle_check", "distance", loco.obstacle_check_distance);
        set_value(&mut config, "obstacle_check", "height", loco.obstacle_check_height);
        set_value(&mut config, "obstacle_check", "layers", layer_names(loco.obstacle_layers));

        set_value(&mut config, "animation", "push_run_speed", self.push_run_speed);

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Reject configurations the simulation cannot start with.
    pub fn validate(&self) -> Result<(), String> {
        if !self.fixed_step.is_finite() || self.fixed_step <= 0.0 {
            return Err(format!("fixed_step must be positive, got {}", self.fixed_step));
        }
        if self.max_steps_per_frame == 0 {
            return Err("max_steps_per_frame must be at least 1".to_string());
        }
        if !self.gravity_magnitude.is_finite() || self.gravity_magnitude <= 0.0 {
            return Err(format!(
                "gravity magnitude must be positive, got {}",
                self.gravity_magnitude
            ));
        }
        if !self.push_run_speed.is_finite() || self.push_run_speed <= 0.0 {
            return Err(format!(
                "push_run_speed must be positive, got {}",
                self.push_run_speed
            ));
        }
        self.locomotion.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.gravity_direction, GravityDirection::Down);
        assert_eq!(config.locomotion, LocomotionConfig::default());
    }

    #[test]
    fn load_from_str_overrides_given_keys_only() {
        let mut config = GameConfig::new();
        config
            .load_from_str(
                "[movement]\nrun_speed = 8\n\n[jump]\ncut_mode = decay\n\n[gravity]\ndirection = top\n\n[obstacle_check]\nlayers = obstacle, ground\n",
            )
            .unwrap();
        assert_eq!(config.locomotion.run_speed, 8.0);
        assert_eq!(config.locomotion.walk_speed, 3.0);
        assert_eq!(config.locomotion.jump_cut_mode, JumpCutMode::Decay);
        assert_eq!(config.gravity_direction, GravityDirection::Up);
        assert_eq!(
            config.locomotion.obstacle_layers,
            LayerMask::OBSTACLE | LayerMask::GROUND
        );
    }

    #[test]
    fn unparseable_values_are_errors() {
        let mut config = GameConfig::new();
        assert!(config.load_from_str("[gravity]\ndirection = sideways\n").is_err());
        let mut config = GameConfig::new();
        assert!(config.load_from_str("[movement]\nwalk_speed = fast\n").is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = GameConfig::new();
        config.gravity_magnitude = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::new();
        config.fixed_step = -0.02;
        assert!(config.validate().is_err());

        let mut config = GameConfig::new();
        config.locomotion.walk_speed = -3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = GameConfig::with_path("/nonexistent/flipfall/config.ini");
        assert!(config.load_from_file().is_err());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = std::env::temp_dir().join(format!(
            "flipfall_config_test_{}.ini",
            std::process::id()
        ));
        let mut config = GameConfig::with_path(&path);
        config.locomotion.run_speed = 7.5;
        config.locomotion.jump_cut_mode = JumpCutMode::Decay;
        config.gravity_direction = GravityDirection::Left;
        config.gravity_toggle = GravityDirection::Right;
        config.locomotion.excluded_ground_layers = LayerMask::PLAYER | LayerMask::OBSTACLE;
        config.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.locomotion, config.locomotion);
        assert_eq!(loaded.gravity_direction, GravityDirection::Left);
        assert_eq!(loaded.gravity_toggle, GravityDirection::Right);
    }
}

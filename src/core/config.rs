//=========================================================================
// Game Configuration
//=========================================================================
//
// Tunables shared by the runtime and the gameplay scenes.
//
// Defaults reproduce the shipped game: 60 ticks per second, a four minute
// match, a twenty second sparkler, a ten second win delay and twenty
// fireworks.
//
//=========================================================================

//=== GameConfig ==========================================================

/// Runtime and gameplay tunables.
///
/// # Examples
///
/// ```
/// use lantern_festival::core::config::GameConfig;
///
/// let config = GameConfig {
///     match_duration_secs: 120,
///     ..GameConfig::default()
/// };
/// assert_eq!(config.ms_at_tick(60), 1000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Logic ticks per second.
    pub tps: f64,
    /// Real seconds until the match is lost.
    pub match_duration_secs: u64,
    /// Interval between sparkler life steps.
    pub sparkler_step_ms: u64,
    /// Interval between spark flicker frames.
    pub flicker_step_ms: u64,
    /// Delay between reaching the destination and the firework show.
    pub win_delay_ms: u64,
    /// Length of the cutscene intro before dialogue can advance.
    pub cutscene_intro_ms: u64,
    /// Fade decrement per tick during screen transitions.
    pub fade_step: f32,
    /// Number of fireworks in the finale.
    pub firework_count: usize,
    /// Seed for firework fuses, heights and colours.
    pub rng_seed: u64,
}

impl GameConfig {
    /// Scene clock reading after `tick` ticks, in milliseconds.
    pub fn ms_at_tick(&self, tick: u64) -> u64 {
        (tick as f64 * 1000.0 / self.tps).round() as u64
    }

    /// Duration of one tick in seconds.
    pub fn tick_secs(&self) -> f32 {
        (1.0 / self.tps) as f32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tps: 60.0,
            match_duration_secs: 240,
            sparkler_step_ms: 2000,
            flicker_step_ms: 185,
            win_delay_ms: 10_000,
            cutscene_intro_ms: 26_750,
            fade_step: 0.05,
            firework_count: 20,
            rng_seed: 0x5EED_F1E5,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//! Lucidity Controller
//!
//! A single continuous meter in [0, 100] drives the whole difficulty curve.
//! High lucidity is easy; low lucidity is the harder, better-paying nightmare.
//!
//! The controller is a pure feedback source: callers push events in
//! (`tick`, `gain_lucidity`, `lose_lucidity`) and read multipliers out. It
//! never looks at gameplay state.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::time::sanitize_delta;
use crate::game::enemy::EnemyKind;

/// Lower bound of the meter.
pub const MIN_LUCIDITY: f64 = 0.0;

/// Upper bound of the meter.
pub const MAX_LUCIDITY: f64 = 100.0;

/// Elite kills recover this much more than normal kills.
pub const ELITE_GAIN_FACTOR: f64 = 1.5;

/// Tuning for the lucidity meter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LucidityConfig {
    /// Starting lucidity
    pub initial: f64,
    /// Points lost per second of play
    pub decay_rate_per_second: f64,
    /// Fraction (of 100) recovered per normal kill
    pub recovery_rate: f64,
    /// Fraction (of 100) recovered per boss kill
    pub boss_recovery_rate: f64,
}

impl Default for LucidityConfig {
    fn default() -> Self {
        Self {
            initial: 50.0,
            decay_rate_per_second: 0.1,
            recovery_rate: 0.05,
            boss_recovery_rate: 0.3,
        }
    }
}

/// Coarse reading of the meter, for HUD text and effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LucidityBand {
    /// Above 75
    Lucid,
    /// Above 50
    Dreaming,
    /// Above 25
    Nightmare,
    /// 25 or below
    SevereNightmare,
}

impl LucidityBand {
    /// Band for a lucidity value.
    pub fn from_lucidity(lucidity: f64) -> Self {
        if lucidity > 75.0 {
            LucidityBand::Lucid
        } else if lucidity > 50.0 {
            LucidityBand::Dreaming
        } else if lucidity > 25.0 {
            LucidityBand::Nightmare
        } else {
            LucidityBand::SevereNightmare
        }
    }

    /// HUD colour as `#rrggbb`.
    pub fn color(self) -> &'static str {
        match self {
            LucidityBand::Lucid => "#00ff00",
            LucidityBand::Dreaming => "#ffff00",
            LucidityBand::Nightmare => "#ff8800",
            LucidityBand::SevereNightmare => "#ff0000",
        }
    }
}

impl fmt::Display for LucidityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LucidityBand::Lucid => "Lucid",
            LucidityBand::Dreaming => "Dreaming",
            LucidityBand::Nightmare => "Nightmare",
            LucidityBand::SevereNightmare => "Severe Nightmare",
        };
        f.write_str(label)
    }
}

/// Multipliers derived from lucidity. Pure function of the meter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyModifiers {
    /// [0.5, 2.0]
    pub difficulty: f64,
    /// [1.0, 1.5]
    pub enemy_speed: f64,
    /// [1.0, 1.8]
    pub enemy_damage: f64,
    /// [1.0, 1.5]
    pub reward: f64,
    /// [0, 100]
    pub glitch_intensity: f64,
    /// [0, 0.3]
    pub color_distortion: f64,
    /// [0, 0.5]
    pub audio_distortion: f64,
}

impl DifficultyModifiers {
    /// Derive every multiplier from a lucidity value.
    pub fn from_lucidity(lucidity: f64) -> Self {
        let normalized = clamp_lucidity(lucidity) / 100.0;
        let nightmare = 1.0 - normalized;

        Self {
            difficulty: 0.5 + nightmare * 1.5,
            enemy_speed: 1.0 + nightmare * 0.5,
            enemy_damage: 1.0 + nightmare * 0.8,
            reward: 1.0 + nightmare * 0.5,
            glitch_intensity: nightmare * 100.0,
            color_distortion: nightmare * 0.3,
            audio_distortion: nightmare * 0.5,
        }
    }
}

impl Default for DifficultyModifiers {
    /// Calm multipliers (full meter).
    fn default() -> Self {
        Self::from_lucidity(MAX_LUCIDITY)
    }
}

/// The lucidity meter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LucidityController {
    lucidity: f64,
    decay_rate_per_second: f64,
    recovery_rate: f64,
    boss_recovery_rate: f64,
    modifiers: DifficultyModifiers,
}

impl Default for LucidityController {
    fn default() -> Self {
        Self::new(&LucidityConfig::default())
    }
}

impl LucidityController {
    /// Create a controller from config.
    pub fn new(config: &LucidityConfig) -> Self {
        let lucidity = clamp_lucidity(config.initial);
        Self {
            lucidity,
            decay_rate_per_second: config.decay_rate_per_second,
            recovery_rate: config.recovery_rate,
            boss_recovery_rate: config.boss_recovery_rate,
            modifiers: DifficultyModifiers::from_lucidity(lucidity),
        }
    }

    /// Apply natural decay for one frame and refresh the multipliers.
    pub fn tick(&mut self, delta_ms: f64) {
        let delta = sanitize_delta(delta_ms);
        self.set(self.lucidity - self.decay_rate_per_second * delta / 1000.0);
    }

    /// Recover lucidity after a kill.
    ///
    /// Normal: `recovery_rate * 100`; elite: that times 1.5; boss: the flat
    /// `boss_recovery_rate * 100` instead.
    pub fn gain_lucidity(&mut self, kind: EnemyKind) -> f64 {
        let gain = match kind {
            EnemyKind::Normal => self.recovery_rate * 100.0,
            EnemyKind::Elite => self.recovery_rate * 100.0 * ELITE_GAIN_FACTOR,
            EnemyKind::Boss => self.boss_recovery_rate * 100.0,
        };
        let before = self.lucidity;
        self.set(self.lucidity + gain);
        self.lucidity - before
    }

    /// Lose a flat number of points (not scaled by time).
    ///
    /// Negative or non-finite amounts are ignored.
    pub fn lose_lucidity(&mut self, amount: f64) -> f64 {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let before = self.lucidity;
        self.set(self.lucidity - amount);
        before - self.lucidity
    }

    /// Set the meter directly (clamped). Debug hook.
    pub fn set_lucidity(&mut self, value: f64) {
        if value.is_finite() {
            self.set(value);
        }
    }

    fn set(&mut self, value: f64) {
        self.lucidity = clamp_lucidity(value);
        self.modifiers = DifficultyModifiers::from_lucidity(self.lucidity);
    }

    /// Current meter value.
    #[inline]
    pub fn lucidity(&self) -> f64 {
        self.lucidity
    }

    /// All derived multipliers.
    #[inline]
    pub fn multipliers(&self) -> &DifficultyModifiers {
        &self.modifiers
    }

    /// Overall difficulty multiplier.
    #[inline]
    pub fn difficulty_multiplier(&self) -> f64 {
        self.modifiers.difficulty
    }

    /// Enemy speed multiplier.
    #[inline]
    pub fn enemy_speed_multiplier(&self) -> f64 {
        self.modifiers.enemy_speed
    }

    /// Enemy damage multiplier.
    #[inline]
    pub fn enemy_damage_multiplier(&self) -> f64 {
        self.modifiers.enemy_damage
    }

    /// Reward multiplier.
    #[inline]
    pub fn reward_multiplier(&self) -> f64 {
        self.modifiers.reward
    }

    /// Glitch intensity for the renderer.
    #[inline]
    pub fn glitch_intensity(&self) -> f64 {
        self.modifiers.glitch_intensity
    }

    /// Coarse band.
    pub fn band(&self) -> LucidityBand {
        LucidityBand::from_lucidity(self.lucidity)
    }

    /// Above 75.
    pub fn is_lucid(&self) -> bool {
        self.lucidity > 75.0
    }

    /// Below 25.
    pub fn is_severe_nightmare(&self) -> bool {
        self.lucidity < 25.0
    }
}

fn clamp_lucidity(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_LUCIDITY;
    }
    value.clamp(MIN_LUCIDITY, MAX_LUCIDITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_defaults() {
        let lucidity = LucidityController::default();
        assert_eq!(lucidity.lucidity(), 50.0);
        assert!(approx(lucidity.difficulty_multiplier(), 1.25));
    }

    #[test]
    fn test_lose_then_recompute() {
        let mut lucidity = LucidityController::default();
        lucidity.lose_lucidity(10.0);
        assert_eq!(lucidity.lucidity(), 40.0);

        assert!(approx(lucidity.difficulty_multiplier(), 1.4));
        assert!(approx(lucidity.enemy_speed_multiplier(), 1.3));
        assert!(approx(lucidity.enemy_damage_multiplier(), 1.48));
        assert!(approx(lucidity.glitch_intensity(), 60.0));
    }

    #[test]
    fn test_elite_gain() {
        let mut lucidity = LucidityController::default();
        lucidity.set_lucidity(80.0);
        let gained = lucidity.gain_lucidity(EnemyKind::Elite);
        assert!(approx(gained, 7.5));
        assert!(approx(lucidity.lucidity(), 87.5));
    }

    #[test]
    fn test_normal_and_boss_gain() {
        let mut lucidity = LucidityController::default();
        lucidity.set_lucidity(10.0);
        lucidity.gain_lucidity(EnemyKind::Normal);
        assert!(approx(lucidity.lucidity(), 15.0));
        lucidity.gain_lucidity(EnemyKind::Boss);
        assert!(approx(lucidity.lucidity(), 45.0));
    }

    #[test]
    fn test_gain_clamps() {
        let mut lucidity = LucidityController::default();
        lucidity.set_lucidity(95.0);
        let gained = lucidity.gain_lucidity(EnemyKind::Boss);
        assert_eq!(lucidity.lucidity(), 100.0);
        assert!(approx(gained, 5.0));
    }

    #[test]
    fn test_tick_decay() {
        let mut lucidity = LucidityController::default();
        lucidity.tick(10_000.0);
        assert!(approx(lucidity.lucidity(), 49.0));
    }

    #[test]
    fn test_tick_floor() {
        let mut lucidity = LucidityController::default();
        lucidity.set_lucidity(0.05);
        lucidity.tick(1000.0);
        assert_eq!(lucidity.lucidity(), 0.0);
        assert!(approx(lucidity.difficulty_multiplier(), 2.0));
        assert!(approx(lucidity.glitch_intensity(), 100.0));
    }

    #[test]
    fn test_invalid_inputs_ignored() {
        let mut lucidity = LucidityController::default();
        lucidity.tick(f64::NAN);
        lucidity.tick(-5000.0);
        lucidity.lose_lucidity(-20.0);
        lucidity.lose_lucidity(f64::INFINITY);
        lucidity.set_lucidity(f64::NAN);
        assert_eq!(lucidity.lucidity(), 50.0);
    }

    #[test]
    fn test_multiplier_ranges() {
        let calm = DifficultyModifiers::from_lucidity(100.0);
        assert_eq!(calm.difficulty, 0.5);
        assert_eq!(calm.enemy_speed, 1.0);
        assert_eq!(calm.enemy_damage, 1.0);
        assert_eq!(calm.reward, 1.0);
        assert_eq!(calm.glitch_intensity, 0.0);

        let dread = DifficultyModifiers::from_lucidity(0.0);
        assert_eq!(dread.difficulty, 2.0);
        assert_eq!(dread.enemy_speed, 1.5);
        assert_eq!(dread.enemy_damage, 1.8);
        assert_eq!(dread.reward, 1.5);
        assert_eq!(dread.glitch_intensity, 100.0);
        assert!(approx(dread.color_distortion, 0.3));
        assert!(approx(dread.audio_distortion, 0.5));
    }

    #[test]
    fn test_bands() {
        assert_eq!(LucidityBand::from_lucidity(76.0), LucidityBand::Lucid);
        assert_eq!(LucidityBand::from_lucidity(75.0), LucidityBand::Dreaming);
        assert_eq!(LucidityBand::from_lucidity(50.0), LucidityBand::Nightmare);
        assert_eq!(LucidityBand::from_lucidity(25.0), LucidityBand::SevereNightmare);

        let mut lucidity = LucidityController::default();
        lucidity.set_lucidity(20.0);
        assert!(lucidity.is_severe_nightmare());
        assert!(!lucidity.is_lucid());
        assert_eq!(lucidity.band().color(), "#ff0000");
    }

    #[test]
    fn test_initial_clamped() {
        let config = LucidityConfig { initial: 250.0, ..LucidityConfig::default() };
        assert_eq!(LucidityController::new(&config).lucidity(), 100.0);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Tick(f64),
        Gain(EnemyKind),
        Lose(f64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0.0f64..100_000.0).prop_map(Op::Tick),
            prop_oneof![
                Just(EnemyKind::Normal),
                Just(EnemyKind::Elite),
                Just(EnemyKind::Boss),
            ]
            .prop_map(Op::Gain),
            (-50.0f64..150.0).prop_map(Op::Lose),
        ]
    }

    proptest! {
        #[test]
        fn prop_lucidity_always_clamped(ops in proptest::collection::vec(op_strategy(), 0..200)) {
            let mut lucidity = LucidityController::default();
            for op in ops {
                match op {
                    Op::Tick(ms) => lucidity.tick(ms),
                    Op::Gain(kind) => { lucidity.gain_lucidity(kind); }
                    Op::Lose(amount) => { lucidity.lose_lucidity(amount); }
                }
                let value = lucidity.lucidity();
                prop_assert!((0.0..=100.0).contains(&value));
                prop_assert_eq!(*lucidity.multipliers(), DifficultyModifiers::from_lucidity(value));
            }
        }
    }
}

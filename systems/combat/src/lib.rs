#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cooldown gate for the player's weapon.
//!
//! Two independent windows are tracked against the time of the last accepted
//! shot: the fire cooldown, which decides whether a new shot is accepted, and
//! the short hit window, which decides whether a fire press resolves hits.

/// Default seconds between accepted shots.
pub const DEFAULT_COOLDOWN: f64 = 2.2;

/// Seconds the firing image stays on screen after an accepted shot.
pub const SHOT_DISPLAY_DURATION: f32 = 0.15;

/// Seconds after an accepted shot during which a fire press resolves hits.
pub const HIT_WINDOW: f64 = 0.1;

/// Tracks the weapon cooldown and the firing display timer.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatController {
    cooldown: f64,
    last_shot_time: f64,
    shot_display_timer: f32,
}

impl Default for CombatController {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl CombatController {
    /// Creates a controller whose first shot is immediately available.
    ///
    /// Negative cooldowns are treated as zero.
    #[must_use]
    pub fn new(cooldown: f64) -> Self {
        let cooldown = cooldown.max(0.0);
        Self {
            cooldown,
            last_shot_time: -cooldown,
            shot_display_timer: 0.0,
        }
    }

    /// Attempts to fire at wall-clock time `now`.
    ///
    /// Returns `true` and restarts the cooldown when it has elapsed; otherwise
    /// leaves the state untouched and returns `false`.
    pub fn try_fire(&mut self, now: f64) -> bool {
        if now - self.last_shot_time < self.cooldown {
            return false;
        }
        self.last_shot_time = now;
        self.shot_display_timer = SHOT_DISPLAY_DURATION;
        true
    }

    /// Decays the firing display timer, never below zero.
    pub fn advance(&mut self, dt: f32) {
        self.shot_display_timer = (self.shot_display_timer - dt).max(0.0);
    }

    /// Reports whether a fire press at `now` falls inside the hit window.
    #[must_use]
    pub fn hit_window_open(&self, now: f64) -> bool {
        now - self.last_shot_time < HIT_WINDOW
    }

    /// Reports whether the firing image should be shown.
    #[must_use]
    pub fn is_displaying_shot(&self) -> bool {
        self.shot_display_timer > 0.0
    }

    /// Seconds the firing image remains visible.
    #[must_use]
    pub const fn shot_display_timer(&self) -> f32 {
        self.shot_display_timer
    }

    /// Wall-clock time of the last accepted shot.
    #[must_use]
    pub const fn last_shot_time(&self) -> f64 {
        self.last_shot_time
    }

    /// Configured seconds between accepted shots.
    #[must_use]
    pub const fn cooldown(&self) -> f64 {
        self.cooldown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_gates_consecutive_shots() {
        let mut combat = CombatController::new(2.2);

        assert!(combat.try_fire(0.0));
        assert!(!combat.try_fire(1.0));
        assert!(combat.try_fire(2.3));
    }

    #[test]
    fn press_exactly_one_cooldown_later_fires() {
        let mut combat = CombatController::new(2.2);

        assert!(combat.try_fire(0.0));
        assert!(combat.try_fire(2.2));
        assert!(!combat.try_fire(4.0));
        assert!(combat.try_fire(4.4));
    }

    #[test]
    fn rejected_shot_leaves_state_untouched() {
        let mut combat = CombatController::new(2.2);
        assert!(combat.try_fire(0.0));
        combat.advance(0.1);
        let before = combat.clone();

        assert!(!combat.try_fire(0.5));

        assert_eq!(combat, before);
    }

    #[test]
    fn first_shot_is_available_at_time_zero() {
        let combat = CombatController::default();

        assert_eq!(combat.last_shot_time(), -DEFAULT_COOLDOWN);
        assert!(!combat.is_displaying_shot());
        assert!(!combat.hit_window_open(0.0));
    }

    #[test]
    fn display_timer_decays_to_zero() {
        let mut combat = CombatController::new(1.0);
        assert!(combat.try_fire(3.0));
        assert_eq!(combat.shot_display_timer(), SHOT_DISPLAY_DURATION);

        combat.advance(0.1);
        assert!(combat.is_displaying_shot());

        combat.advance(0.1);
        assert!(!combat.is_displaying_shot());
        assert_eq!(combat.shot_display_timer(), 0.0);
    }

    #[test]
    fn hit_window_is_independent_of_cooldown() {
        let mut combat = CombatController::new(2.2);
        assert!(combat.try_fire(5.0));

        assert!(combat.hit_window_open(5.0));
        assert!(combat.hit_window_open(5.05));
        assert!(!combat.hit_window_open(5.25));
        assert!(!combat.try_fire(5.05));
    }

    #[test]
    fn zero_cooldown_accepts_every_press() {
        let mut combat = CombatController::new(-1.0);

        assert_eq!(combat.cooldown(), 0.0);
        assert!(combat.try_fire(0.0));
        assert!(combat.try_fire(0.0));
    }
}

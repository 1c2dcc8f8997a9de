//! Outbound signals: sound cues, gameplay events, HUD snapshots and the narrative log.
//!
//! The simulation never plays audio or draws; it queues events that the shell drains
//! once per frame.

use glam::Vec2;
use procgen::WeatherKind;

use crate::enemy::Archetype;
use crate::weather::WeatherPhase;

/// Sounds the audio layer should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Shoot,
    EnemyShoot,
    Hit,
    Blocked,
    Explosion,
    Kill,
    Hurt,
    Jump,
    Pickup,
    CorePickup,
    Alert,
    BossRoar,
    Summon,
    Burrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOverSummary {
    pub score: u64,
    pub cores_collected: u32,
    /// Credits salvaged from the cores held at death.
    pub salvage: u64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VictorySummary {
    pub score: u64,
    pub cores_collected: u32,
    pub bonus: u64,
}

/// Credits salvaged per core held when the player falls.
pub const SALVAGE_PER_CORE: u64 = 50;
pub const VICTORY_BASE_BONUS: u64 = 5000;
pub const VICTORY_CORE_BONUS: u64 = 500;

impl GameOverSummary {
    pub fn new(score: u64, cores_collected: u32, reason: impl Into<String>) -> Self {
        Self {
            score,
            cores_collected,
            salvage: SALVAGE_PER_CORE * cores_collected as u64,
            reason: reason.into(),
        }
    }
}

impl VictorySummary {
    pub fn new(score: u64, cores_collected: u32) -> Self {
        Self {
            score,
            cores_collected,
            bonus: VICTORY_BASE_BONUS + VICTORY_CORE_BONUS * cores_collected as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    /// An enemy noticed the player; the render layer pops a "!" here.
    AlertMarker { position: Vec2 },
    EnemyKilled {
        archetype: Archetype,
        elite: bool,
        position: Vec2,
    },
    CoreCollected { collected: u32, required: u32 },
    BossSpawned,
    WeatherChanged {
        kind: WeatherKind,
        phase: WeatherPhase,
    },
    GameOver(GameOverSummary),
    Victory(VictorySummary),
}

/// Ordered event queue drained by the shell.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTone {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionMessage {
    pub text: String,
    pub tone: MessageTone,
}

/// Narrative messages for the HUD log.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<MissionMessage>,
}

impl MessageLog {
    /// Oldest undrained messages beyond this are dropped.
    pub const MAX_PENDING: usize = 50;

    pub fn push(&mut self, text: impl Into<String>, tone: MessageTone) {
        self.messages.push(MissionMessage {
            text: text.into(),
            tone,
        });
        if self.messages.len() > Self::MAX_PENDING {
            self.messages.remove(0);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, MessageTone::Info);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(text, MessageTone::Success);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(text, MessageTone::Warning);
    }

    pub fn drain(&mut self) -> Vec<MissionMessage> {
        std::mem::take(&mut self.messages)
    }
}

/// Values the HUD draws each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub health: i32,
    pub max_health: i32,
    pub fuel: f32,
    pub max_fuel: f32,
    pub score: u64,
    pub cores_collected: u32,
    pub cores_required: u32,
    pub weapon_name: &'static str,
    pub objective: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossStatus {
    pub active: bool,
    pub hp: i32,
    pub max_hp: i32,
    pub name: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries_compute_rewards() {
        let over = GameOverSummary::new(1200, 3, "test");
        assert_eq!(over.salvage, 150);
        let win = VictorySummary::new(9000, 4);
        assert_eq!(win.bonus, 7000);
    }

    #[test]
    fn drain_empties_queue() {
        let mut q = EventQueue::default();
        q.sound(SoundCue::Jump);
        q.push(GameEvent::BossSpawned);
        assert_eq!(q.drain().len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn message_log_caps_pending() {
        let mut log = MessageLog::default();
        for i in 0..60 {
            log.info(format!("msg {}", i));
        }
        let drained = log.drain();
        assert_eq!(drained.len(), MessageLog::MAX_PENDING);
        assert_eq!(drained[0].text, "msg 10");
    }
}

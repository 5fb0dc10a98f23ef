//! Activation sensors.
//!
//! A press only becomes a drag once it has been held for the activation
//! delay without wandering further than the tolerance. Moving too far
//! early aborts activation; releasing early is a click.

use std::time::{Duration, Instant};

use filecards_core::config::drag::DragConfig;
use filecards_core::types::ItemId;

use crate::geometry::Point;

/// Input device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Mouse or pen.
    Pointer,
    /// Finger.
    Touch,
}

/// Delay and movement tolerance a press must satisfy to start a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationConstraint {
    /// How long the press must be held.
    pub delay: Duration,
    /// How far (px) the pointer may move while held.
    pub tolerance: f64,
}

impl ActivationConstraint {
    /// The configured constraint for `kind`.
    pub fn for_kind(config: &DragConfig, kind: SensorKind) -> Self {
        match kind {
            SensorKind::Pointer => Self {
                delay: Duration::from_millis(config.pointer_delay_ms),
                tolerance: config.pointer_tolerance_px,
            },
            SensorKind::Touch => Self {
                delay: Duration::from_millis(config.touch_delay_ms),
                tolerance: config.touch_tolerance_px,
            },
        }
    }
}

/// What an input event meant to the sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorSignal {
    /// Nothing pressed.
    Idle,
    /// A press is waiting out its activation delay.
    Pending,
    /// The press became a drag.
    Activated {
        /// Pressed item.
        item: ItemId,
        /// Where the press started.
        origin: Point,
    },
    /// The press moved past the tolerance before activating.
    Aborted {
        /// Pressed item.
        item: ItemId,
    },
    /// The press was released before activating.
    Click {
        /// Pressed item.
        item: ItemId,
    },
    /// An active drag moved.
    Moved(Point),
    /// An active drag was released.
    Released(Point),
}

#[derive(Debug, Clone)]
struct Press {
    item: ItemId,
    origin: Point,
    since: Instant,
    constraint: ActivationConstraint,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Pending(Press),
    Active,
}

/// Press-to-drag state machine shared by pointer and touch input.
#[derive(Debug, Clone)]
pub struct Sensor {
    pointer: ActivationConstraint,
    touch: ActivationConstraint,
    phase: Phase,
}

impl Sensor {
    /// Build both constraints from config.
    pub fn new(config: &DragConfig) -> Self {
        Self {
            pointer: ActivationConstraint::for_kind(config, SensorKind::Pointer),
            touch: ActivationConstraint::for_kind(config, SensorKind::Touch),
            phase: Phase::Idle,
        }
    }

    /// Whether a drag is active.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active)
    }

    /// Whether a press is waiting to activate.
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending(_))
    }

    /// Start tracking a press on `item`.
    pub fn press(&mut self, kind: SensorKind, item: ItemId, at: Point, now: Instant) -> SensorSignal {
        let constraint = match kind {
            SensorKind::Pointer => self.pointer,
            SensorKind::Touch => self.touch,
        };
        self.phase = Phase::Pending(Press {
            item,
            origin: at,
            since: now,
            constraint,
        });
        SensorSignal::Pending
    }

    /// Feed a movement event.
    pub fn motion(&mut self, at: Point, now: Instant) -> SensorSignal {
        match &self.phase {
            Phase::Idle => SensorSignal::Idle,
            Phase::Active => SensorSignal::Moved(at),
            Phase::Pending(press) => {
                if now.duration_since(press.since) >= press.constraint.delay {
                    self.activate()
                } else if press.origin.distance(&at) > press.constraint.tolerance {
                    let item = press.item.clone();
                    self.phase = Phase::Idle;
                    SensorSignal::Aborted { item }
                } else {
                    SensorSignal::Pending
                }
            }
        }
    }

    /// Activate a held press once its delay has elapsed, without movement.
    pub fn poll(&mut self, now: Instant) -> SensorSignal {
        match &self.phase {
            Phase::Idle => SensorSignal::Idle,
            Phase::Active => SensorSignal::Pending,
            Phase::Pending(press) if now.duration_since(press.since) >= press.constraint.delay => {
                self.activate()
            }
            Phase::Pending(_) => SensorSignal::Pending,
        }
    }

    /// Feed a release event.
    pub fn release(&mut self, at: Point, now: Instant) -> SensorSignal {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        match phase {
            Phase::Idle => SensorSignal::Idle,
            Phase::Active => SensorSignal::Released(at),
            Phase::Pending(press) => {
                // held past the delay but never activated: neither a click nor a drop
                if now.duration_since(press.since) >= press.constraint.delay {
                    SensorSignal::Aborted { item: press.item }
                } else {
                    SensorSignal::Click { item: press.item }
                }
            }
        }
    }

    /// Forget any press or drag.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    fn activate(&mut self) -> SensorSignal {
        match std::mem::replace(&mut self.phase, Phase::Active) {
            Phase::Pending(press) => SensorSignal::Activated {
                item: press.item,
                origin: press.origin,
            },
            other => {
                self.phase = other;
                SensorSignal::Idle
            }
        }
    }
}

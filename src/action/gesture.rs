// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ActionKind;

/// Pointer travel (px) below which a gesture counts as a tap.
pub const NEUTRAL_RADIUS: f64 = 50.0;
/// A tap held longer than this (ms) does nothing.
pub const LONG_PRESS_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// `angle` in degrees where 0 points up and values grow counter-clockwise.
    fn from_angle(angle: f64) -> Self {
        match angle {
            a if a < 45.0 => Self::Up,
            a if a < 135.0 => Self::Left,
            a if a < 225.0 => Self::Down,
            a if a < 315.0 => Self::Right,
            _ => Self::Up,
        }
    }

    pub const fn action(self) -> ActionKind {
        match self {
            Self::Up => ActionKind::Delete,
            Self::Left => ActionKind::NextGlobal,
            Self::Down => ActionKind::Switch,
            Self::Right => ActionKind::PreviousGlobal,
        }
    }
}

/// Pointer-down position and time, reclassified on every move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    x: f64,
    y: f64,
    started_ms: u64,
    over_blank: bool,
}

impl Gesture {
    pub fn begin(x: f64, y: f64, now_ms: u64, over_blank: bool) -> Self {
        Self { x, y, started_ms: now_ms, over_blank }
    }

    pub fn classify(&self, x: f64, y: f64, now_ms: u64) -> Option<ActionKind> {
        classify(x - self.x, y - self.y, now_ms.saturating_sub(self.started_ms), self.over_blank)
    }
}

/// Screen coordinates: `dy` grows downwards.
pub fn classify(dx: f64, dy: f64, elapsed_ms: u64, over_blank: bool) -> Option<ActionKind> {
    if dx.hypot(dy) < NEUTRAL_RADIUS {
        return if over_blank {
            Some(ActionKind::Switch)
        } else if elapsed_ms > LONG_PRESS_MS {
            None
        } else {
            Some(ActionKind::Interact)
        };
    }

    let angle = (180.0 + dx.atan2(dy).to_degrees()).rem_euclid(360.0);
    Some(Direction::from_angle(angle).action())
}

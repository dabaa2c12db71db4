//! Core types for the traffic light simulation

use std::fmt;

/// The signal state published by a traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Phase {
    /// Vehicles must wait
    #[default]
    Red = 0,
    /// Vehicles may cross
    Green = 1,
}

impl Phase {
    /// The phase that follows this one
    pub fn toggled(self) -> Phase {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(value: u8) -> Phase {
        if value == Phase::Green as u8 {
            Phase::Green
        } else {
            Phase::Red
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Red => write!(f, "red"),
            Phase::Green => write!(f, "green"),
        }
    }
}

/// Emitted by a light every time it completes a cycle and toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// The phase that was just published
    pub phase: Phase,
    /// Cycle duration that was drawn for this cycle
    pub cycle: std::time::Duration,
    /// Time actually measured between the cycle start and the toggle
    pub elapsed: std::time::Duration,
    /// 1-based count of toggles so far
    pub sequence: u64,
}

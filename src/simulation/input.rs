/// Turn impulse requested for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnDirection {
    Left,
    #[default]
    None,
    Right,
}

impl TurnDirection {
    pub fn signum(self) -> f64 {
        match self {
            TurnDirection::Left => -1.0,
            TurnDirection::None => 0.0,
            TurnDirection::Right => 1.0,
        }
    }

    /// Maps -1 / 0 / 1 (or any sign) onto a direction.
    pub fn from_sign(value: i32) -> Self {
        match value.signum() {
            -1 => TurnDirection::Left,
            1 => TurnDirection::Right,
            _ => TurnDirection::None,
        }
    }
}

/// Everything the input layer wants from one tick, collected before the step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputIntent {
    pub thrust_requested: bool,
    pub turn_direction: TurnDirection,
    pub toggle_pause: bool,
}

impl InputIntent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn thrust() -> Self {
        Self {
            thrust_requested: true,
            ..Self::default()
        }
    }

    pub fn turn(direction: TurnDirection) -> Self {
        Self {
            turn_direction: direction,
            ..Self::default()
        }
    }

    pub fn toggle_pause() -> Self {
        Self {
            toggle_pause: true,
            ..Self::default()
        }
    }

    pub fn with_thrust(mut self, thrust_requested: bool) -> Self {
        self.thrust_requested = thrust_requested;
        self
    }

    pub fn with_turn(mut self, direction: TurnDirection) -> Self {
        self.turn_direction = direction;
        self
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }
}

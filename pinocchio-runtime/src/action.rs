//  ACTION.rs
//    The environment's action vocabulary: a movement direction, with an
//    optional speed tier for presets that need moving-with-speed action
//    tuples.
//

use std::fmt;


/***** LIBRARY *****/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// The `(dx, dy)` this direction moves by, with `y` growing downward
    /// (row index), matching `Grid`'s row-major layout.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.label()) }
}

/// A moving-with-speed action tuple's speed tier. `Normal` carries no
/// penalty; `Fast`/`Slow` apply a shaping penalty each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Speed {
    Normal,
    Fast,
    Slow,
}

impl Speed {
    /// The reward shaping penalty for choosing this speed tier.
    pub fn penalty(self) -> f64 {
        match self {
            Speed::Normal => 0.0,
            Speed::Fast => -0.5,
            Speed::Slow => -1.0,
        }
    }

    fn label(self) -> Option<&'static str> {
        match self {
            Speed::Normal => None,
            Speed::Fast => Some("fast"),
            Speed::Slow => Some("slow"),
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "fast" => Some(Speed::Fast),
            "slow" => Some(Speed::Slow),
            _ => None,
        }
    }
}

/// One entry of an agent's action set: a direction, optionally paired
/// with a speed tier. The Q-table keys on the string label this type
/// serialises to/from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionSpec {
    pub direction: Direction,
    pub speed: Speed,
}

impl ActionSpec {
    pub fn plain(direction: Direction) -> Self { Self { direction, speed: Speed::Normal } }
    pub fn with_speed(direction: Direction, speed: Speed) -> Self { Self { direction, speed } }

    pub fn label(self) -> String {
        match self.speed.label() {
            Some(speed) => format!("{}:{speed}", self.direction),
            None => self.direction.to_string(),
        }
    }

    /// Parses a label produced by [`ActionSpec::label`]. An unrecognised
    /// label yields `None`; callers should validate upstream and
    /// otherwise leave position unchanged.
    pub fn parse(label: &str) -> Option<Self> {
        match label.split_once(':') {
            Some((dir, speed)) => Some(Self { direction: Direction::parse(dir)?, speed: Speed::parse(speed)? }),
            None => Some(Self::plain(Direction::parse(label)?)),
        }
    }
}


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_direction_round_trips() {
        let a = ActionSpec::plain(Direction::Right);
        assert_eq!(ActionSpec::parse(&a.label()), Some(a));
        assert_eq!(a.label(), "right");
    }

    #[test]
    fn speed_tuple_round_trips() {
        let a = ActionSpec::with_speed(Direction::Right, Speed::Fast);
        assert_eq!(a.label(), "right:fast");
        assert_eq!(ActionSpec::parse("right:fast"), Some(a));
    }

    #[test]
    fn unknown_action_label_parses_to_none() {
        assert_eq!(ActionSpec::parse("teleport"), None);
    }

    #[test]
    fn speed_penalties_match_spec() {
        assert_eq!(Speed::Fast.penalty(), -0.5);
        assert_eq!(Speed::Slow.penalty(), -1.0);
        assert_eq!(Speed::Normal.penalty(), 0.0);
    }
}

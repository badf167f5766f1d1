use serde::{Deserialize, Serialize};

/// Saturating clamp: below `min` yields `min`, above `max` yields `max`.
pub fn clamp(value: u32, min: u32, max: u32) -> u32 {
    value.max(min).min(max)
}

/// Stepper direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
}

/// Inclusive minute range. `max: None` is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: Option<u32>,
}

impl Bounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    pub fn clamp(&self, value: u32) -> u32 {
        clamp(value, self.min, self.max.unwrap_or(u32::MAX))
    }
}

/// Move `value` one `step` in `direction`, saturating at the bounds.
pub fn adjust(value: u32, direction: Direction, step: u32, bounds: Bounds) -> u32 {
    let next = match direction {
        Direction::Increase => value.saturating_add(step),
        Direction::Decrease => value.saturating_sub(step),
    };
    bounds.clamp(next)
}

/// What happens once a task countdown ends or is finished early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakFlow {
    /// Go straight into a break of the default length.
    Countdown,
    /// Offer a break first; the user may adjust its length or decline.
    Prompt,
}

/// Named presets of bounds, steps and break flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Classic,
    Stack,
}

impl Variant {
    pub fn limits(&self) -> Limits {
        match self {
            Variant::Classic => Limits {
                task: Bounds::new(1, 60),
                task_step: 1,
                break_bounds: Bounds::at_least(1),
                break_step: 1,
                break_default: 5,
                break_flow: BreakFlow::Countdown,
                consume_on_finish: false,
            },
            Variant::Stack => Limits {
                task: Bounds::new(5, 120),
                task_step: 5,
                break_bounds: Bounds::new(1, 30),
                break_step: 1,
                break_default: 5,
                break_flow: BreakFlow::Prompt,
                consume_on_finish: true,
            },
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Variant::Classic),
            "stack" => Ok(Variant::Stack),
            other => anyhow::bail!("unknown variant '{}' (expected classic or stack)", other),
        }
    }
}

/// Resolved numeric rules the widget runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub task: Bounds,
    pub task_step: u32,
    pub break_bounds: Bounds,
    pub break_step: u32,
    pub break_default: u32,
    pub break_flow: BreakFlow,
    /// Remove the task once its countdown ends or is finished early.
    pub consume_on_finish: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Variant::Stack.limits()
    }
}

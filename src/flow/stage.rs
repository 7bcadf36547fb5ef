use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Intro,
    Tutorial,
    Gate,
    Performance,
    End,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Intro => "intro",
            Stage::Tutorial => "tutorial",
            Stage::Gate => "gate",
            Stage::Performance => "performance",
            Stage::End => "end",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition: forward by
    /// one step, or one of the two loops back into the tutorial.
    pub fn can_enter(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Intro, Stage::Tutorial)
                | (Stage::Tutorial, Stage::Tutorial)
                | (Stage::Tutorial, Stage::Gate)
                | (Stage::Gate, Stage::Tutorial)
                | (Stage::Gate, Stage::Performance)
                | (Stage::Performance, Stage::End)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buttons the narration can put in front of the player.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Accept,
    Learn,
    Ready,
    NotReady,
}

impl Choice {
    pub fn id(self) -> &'static str {
        match self {
            Choice::Accept => "accept",
            Choice::Learn => "learn",
            Choice::Ready => "ready",
            Choice::NotReady => "not_ready",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Choice::Accept => "Yes!",
            Choice::Learn => "Learn a Song",
            Choice::Ready => "Yes! Let's do it!",
            Choice::NotReady => "No! Let's practice again!",
        }
    }
}

impl FromStr for Choice {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "accept" => Ok(Choice::Accept),
            "learn" => Ok(Choice::Learn),
            "ready" => Ok(Choice::Ready),
            "not_ready" => Ok(Choice::NotReady),
            other => Err(ContentError::UnknownChoice(other.to_string())),
        }
    }
}

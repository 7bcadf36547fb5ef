pub mod melodies;
pub mod scripts;

use serde::Serialize;

use crate::melody::Melody;
use melodies::{fur_elise, PERFORMANCE_REPEATS};

/// The melodies a run of the tutorial plays.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    pub tutorial: Melody,
    pub performance: Melody,
}

impl Lesson {
    pub fn from_melody(melody: Melody) -> Self {
        Lesson {
            performance: melody.repeated(PERFORMANCE_REPEATS),
            tutorial: melody,
        }
    }
}

impl Default for Lesson {
    fn default() -> Self {
        Lesson::from_melody(fur_elise())
    }
}

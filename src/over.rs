use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ball::Ball;

pub const BALLS_PER_OVER: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Over {
    /// Position of the over within the inning.
    pub index: usize,
    /// Names of the bowlers that bowled in this over, in order of appearance.
    pub bowlers: Vec<String>,
    pub balls: Vec<Ball>,
    pub start_score: String,
}
impl Over {
    pub fn new(index: usize, start_score: String) -> Self {
        Self {
            index,
            bowlers: vec![],
            balls: vec![],
            start_score,
        }
    }

    pub fn legal_balls(&self) -> usize {
        self.balls.iter().filter(|ball| ball.is_legal()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.legal_balls() >= BALLS_PER_OVER
    }

    /// A complete over by a single bowler, conceding nothing other than wides and no-balls.
    pub fn maiden(&self) -> bool {
        self.legal_balls() == BALLS_PER_OVER
            && self.bowlers.len() == 1
            && self
                .balls
                .iter()
                .all(|ball| ball.batting_runs == ball.bowling_extras())
    }

    pub fn score(&self) -> &str {
        self.balls
            .last()
            .map(|ball| ball.score.as_str())
            .unwrap_or(&self.start_score)
    }

    pub fn last_bowler(&self) -> Option<&str> {
        self.bowlers.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }
}

impl Display for Over {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let values: Vec<_> = self.balls.iter().map(|ball| ball.value.as_str()).collect();
        write!(f, "{}", values.join(" "))
    }
}

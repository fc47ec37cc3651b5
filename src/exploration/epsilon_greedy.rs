use log::debug;
use rand::Rng;

use crate::{check_interval, decay::Decay, LearningError};

use super::Choice;

/// Epsilon greedy exploration policy with a time-decaying epsilon threshold
///
/// Time advances one unit per call to [`EpsilonGreedy::advance`]. The current epsilon is
/// never allowed to rise and never drops below the schedule's floor, which must be positive
/// so exploration never vanishes entirely.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    schedule: D,
    epsilon: f32,
    t: u32,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    ///
    /// **Errors** if the initial value or floor of `schedule` lies outside `[0,1]`, or if the
    /// floor is not positive
    pub fn new(schedule: D) -> Result<Self, LearningError> {
        let epsilon = schedule.evaluate(0.0);
        let floor = schedule.floor();
        check_interval!(epsilon, 0.0, 1.0);
        check_interval!(floor, 0.0, 1.0);
        if floor <= 0.0 || floor > epsilon {
            return Err(LearningError::InvalidConfiguration(format!(
                "exploration floor must be positive and at most the initial rate: \
                 got floor {floor}, initial {epsilon}"
            )));
        }

        Ok(Self {
            schedule,
            epsilon,
            t: 0,
        })
    }

    /// The current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// The lowest rate the schedule will ever reach
    pub fn floor(&self) -> f32 {
        self.schedule.floor()
    }

    /// Number of times the schedule has been advanced
    pub fn t(&self) -> u32 {
        self.t
    }

    /// Invoke epsilon greedy policy at the current rate
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f32>() >= self.epsilon {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }

    /// Advance the schedule by one time step and return the new rate
    pub fn advance(&mut self) -> f32 {
        self.t += 1;
        let next = self.schedule.evaluate(self.t as f32);
        self.epsilon = next.min(self.epsilon).max(self.schedule.floor());
        debug!("exploration rate decayed to {:.4} (t = {})", self.epsilon, self.t);
        self.epsilon
    }
}

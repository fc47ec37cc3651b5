use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    algo::{Action, Situation},
    check_interval,
    decay::{self, Decay},
    env::Environment,
    state::StateAction,
    LearningError,
};

use super::{discounted_returns, Policy, PolicyConfig, ValueTable};

/// Configuration for the [`Brain`]
#[derive(Debug, Clone)]
pub struct BrainConfig<D: Decay> {
    /// Discount factor, must be in `[0,1]`
    ///
    /// **Default**: `0.78`
    pub gamma: f32,
    /// Configuration of the underlying [`Policy`]
    pub policy: PolicyConfig<D>,
    /// Seed for the random source driving exploration, or `None` to seed from entropy
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for BrainConfig<decay::Exponential> {
    fn default() -> Self {
        Self {
            gamma: 0.78,
            policy: PolicyConfig::default(),
            seed: None,
        }
    }
}

/// Outcome of a finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Number of actions taken
    pub steps: usize,
    /// Undiscounted sum of rewards
    pub total_reward: f32,
    /// Discounted return from the first step
    pub first_return: f32,
    /// Exploration rate after improvement
    pub exploration: f32,
}

/// Every-visit Monte-Carlo control agent
///
/// The brain records the trajectory of the running episode. Once the episode ends it folds the
/// discounted return of every step into a [`ValueTable`] of running means and asks the
/// [`Policy`] to improve greedily against it.
///
/// ### Generics
/// - `S` - The situation observed before each decision
/// - `A` - The closed set of actions
/// - `D` - The decay strategy of the exploration rate
#[derive(Debug)]
pub struct Brain<S: Situation, A: Action, D: Decay = decay::Exponential> {
    policy: Policy<S, A, D>,
    values: ValueTable<S, A>,
    history: Vec<(StateAction<S, A>, f32)>,
    gamma: f32,
    rng: StdRng,
    episodes: u32,
}

impl<S: Situation, A: Action, D: Decay> Brain<S, A, D> {
    /// Initialize a new `Brain`
    ///
    /// **Errors** with [`LearningError::InvalidConfiguration`] if `gamma` or the exploration
    /// schedule is out of range
    pub fn new(config: BrainConfig<D>) -> Result<Self, LearningError> {
        let gamma = config.gamma;
        check_interval!(gamma, 0.0, 1.0);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            policy: Policy::new(config.policy)?,
            values: ValueTable::new(),
            history: Vec::new(),
            gamma,
            rng,
            episodes: 0,
        })
    }

    /// Pick an action for `state` and append it to the trajectory with a reward of zero
    pub fn choose_action(&mut self, state: S, previous: A) -> A {
        let action = self.policy.get_action(&state, previous, &mut self.rng);
        self.history.push((StateAction::new(state, action), 0.0));
        action
    }

    /// Set the reward of the most recent step
    ///
    /// **Errors** with [`LearningError::InvalidState`] if no action was chosen in this episode
    pub fn attach_reward(&mut self, reward: f32) -> Result<(), LearningError> {
        let (_, last) = self.history.last_mut().ok_or_else(|| {
            LearningError::InvalidState("reward attached before any action was chosen".into())
        })?;
        *last = reward;
        Ok(())
    }

    /// Learn from the finished episode and start a fresh trajectory
    ///
    /// Every visit of a state-action pair contributes its discounted return to that pair's
    /// running mean. If the trajectory holds an invalid action, it is discarded without updating
    /// anything and the error is returned.
    pub fn end_episode(&mut self) -> Result<EpisodeSummary, LearningError> {
        let history = std::mem::take(&mut self.history);
        for (sa, _) in &history {
            ValueTable::<S, A>::validate(sa.action)?;
        }

        let rewards: Vec<f32> = history.iter().map(|(_, r)| *r).collect();
        let returns = discounted_returns(&rewards, self.gamma);
        for ((sa, _), &g) in history.iter().zip(&returns) {
            self.values.update(&sa.state, sa.action, g)?;
        }

        self.policy.improve(&self.values);
        self.episodes += 1;

        let summary = EpisodeSummary {
            steps: history.len(),
            total_reward: rewards.iter().sum(),
            first_return: returns.first().copied().unwrap_or(0.0),
            exploration: self.policy.exploration(),
        };
        debug!(
            "episode {} finished after {} steps, return {:.2}",
            self.episodes, summary.steps, summary.first_return
        );
        Ok(summary)
    }

    /// Drop the running trajectory without learning from it
    pub fn abort_episode(&mut self) {
        debug!("episode aborted after {} steps", self.history.len());
        self.history.clear();
    }

    /// Run one full episode in `env`, starting as if `initial` had been the previous action
    pub fn go<E>(&mut self, env: &mut E, initial: A) -> Result<EpisodeSummary, LearningError>
    where
        E: Environment<State = S, Action = A>,
    {
        self.abort_episode();
        let mut next_state = Some(env.reset());
        let mut previous = initial;
        while let Some(state) = next_state {
            let action = self.choose_action(state, previous);
            let (next, reward) = env.step(action);
            self.attach_reward(reward)?;
            next_state = next;
            previous = action;
        }

        self.end_episode()
    }

    pub fn policy(&self) -> &Policy<S, A, D> {
        &self.policy
    }

    pub fn value_table(&self) -> &ValueTable<S, A> {
        &self.values
    }

    /// The in-progress trajectory
    pub fn trajectory(&self) -> &[(StateAction<S, A>, f32)] {
        &self.history
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Number of completed episodes
    pub fn episodes(&self) -> u32 {
        self.episodes
    }
}

use std::collections::VecDeque;

use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};
use strum::VariantArray;

use crate::{
    env::{Environment, Report},
    state::{BlockedDirections, ComplexDirection, Direction, State},
    LearningError,
};

/// Cell coordinates `(x, y)`, with `y` growing downwards
pub type Pos = (i32, i32);

/// Configuration for the [`Pasture`]
#[derive(Debug, Clone)]
pub struct PastureConfig {
    /// Side length of the square grid
    ///
    /// **Default**: `16`
    pub size: i32,
    /// Steps after which an episode is cut off
    ///
    /// **Default**: `1000`
    pub max_steps: u32,
    /// Reward for catching a sheep
    ///
    /// **Default**: `50.0`
    pub catch_reward: f32,
    /// Reward for any other step
    ///
    /// **Default**: `-1.0`
    pub step_reward: f32,
    /// Reward for running into the queue, which ends the episode
    ///
    /// **Default**: `-300.0`
    pub collision_reward: f32,
    /// Seed for sheep placement, or `None` to seed from entropy
    pub seed: Option<u64>,
}

impl Default for PastureConfig {
    fn default() -> Self {
        Self {
            size: 16,
            max_steps: 1000,
            catch_reward: 50.0,
            step_reward: -1.0,
            collision_reward: -300.0,
            seed: None,
        }
    }
}

/// A square, wrap-around field where a shepherd chases sheep
///
/// Every caught sheep joins a queue that trails behind the shepherd like the body of a snake.
/// Walking into the queue ends the episode.
pub struct Pasture {
    config: PastureConfig,
    /// Shepherd at the front, queue behind
    body: VecDeque<Pos>,
    heading: Direction,
    sheep: Pos,
    steps: u32,
    done: bool,
    rng: StdRng,
    pub report: Report,
}

impl Pasture {
    /// Heading of the shepherd at the start of every episode
    pub const START_HEADING: Direction = Direction::Right;

    /// **Errors** with [`LearningError::InvalidConfiguration`] if the grid is smaller than 2x2
    /// or `max_steps` is zero
    pub fn new(config: PastureConfig) -> Result<Self, LearningError> {
        if config.size < 2 || config.max_steps == 0 {
            return Err(LearningError::InvalidConfiguration(format!(
                "pasture needs a size of at least 2 and a positive step limit: \
                 got size {}, max_steps {}",
                config.size, config.max_steps
            )));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut pasture = Self {
            config,
            body: VecDeque::new(),
            heading: Self::START_HEADING,
            sheep: (0, 0),
            steps: 0,
            done: false,
            rng,
            report: Report::new(vec!["score", "reward", "steps"]),
        };
        pasture.reset();
        Ok(pasture)
    }

    fn start(&self) -> Pos {
        (0, 5.min(self.config.size - 1))
    }

    pub fn shepherd(&self) -> Pos {
        self.body[0]
    }

    pub fn sheep(&self) -> Pos {
        self.sheep
    }

    /// Direction of the last move
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Number of sheep caught this episode
    pub fn score(&self) -> usize {
        self.body.len() - 1
    }

    fn wrap(&self, (x, y): Pos) -> Pos {
        let n = self.config.size;
        (x.rem_euclid(n), y.rem_euclid(n))
    }

    fn neighbour(&self, pos: Pos, dir: Direction) -> Pos {
        let (dx, dy) = dir.offset();
        self.wrap((pos.0 + dx, pos.1 + dy))
    }

    fn in_queue(&self, pos: Pos) -> bool {
        self.body.iter().skip(1).any(|&p| p == pos)
    }

    /// Whether moving onto `pos` would hit the queue
    ///
    /// The tail leaves its cell on the same step, so it never blocks.
    fn blocked(&self, pos: Pos) -> bool {
        self.body
            .iter()
            .skip(1)
            .take(self.score().saturating_sub(1))
            .any(|&p| p == pos)
    }

    /// Place a sheep on a random free cell, or return `false` if the field is full
    fn spawn_sheep(&mut self) -> bool {
        let n = self.config.size;
        let free = (0..n)
            .flat_map(|x| (0..n).map(move |y| (x, y)))
            .filter(|p| !self.body.contains(p))
            .choose(&mut self.rng);
        match free {
            Some(pos) => {
                self.sheep = pos;
                true
            }
            None => false,
        }
    }

    /// What the shepherd currently observes
    pub fn observe(&self) -> State {
        let (x, y) = self.shepherd();
        let sheep_direction = ComplexDirection::from_offset(self.sheep.0 - x, self.sheep.1 - y);
        let facing_queue: BlockedDirections = Direction::VARIANTS
            .iter()
            .copied()
            .filter(|&d| self.blocked(self.neighbour((x, y), d)))
            .collect();
        State::new(sheep_direction, facing_queue)
    }
}

impl Environment for Pasture {
    type State = State;
    type Action = Direction;

    fn is_active(&self) -> bool {
        !self.done
    }

    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f32) {
        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.steps += 1;
        self.heading = action;

        let head = self.neighbour(self.shepherd(), action);
        self.body.push_front(head);

        let mut reward = self.config.step_reward;
        if head == self.sheep {
            self.report.entry("score").and_modify(|x| *x += 1.0);
            reward = self.config.catch_reward;
            if !self.spawn_sheep() {
                self.done = true;
            }
        } else {
            self.body.pop_back();
        }

        if self.in_queue(head) {
            reward = self.config.collision_reward;
            self.done = true;
        }
        if self.steps >= self.config.max_steps {
            self.done = true;
        }

        self.report.entry("reward").and_modify(|x| *x += reward as f64);
        let next_state = (!self.done).then(|| self.observe());
        (next_state, reward)
    }

    fn reset(&mut self) -> Self::State {
        self.body = VecDeque::from([self.start()]);
        self.heading = Self::START_HEADING;
        self.steps = 0;
        self.done = false;
        self.spawn_sheep();
        self.observe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{Brain, BrainConfig, PolicyConfig};
    use crate::decay;

    fn pasture(size: i32) -> Pasture {
        Pasture::new(PastureConfig {
            size,
            seed: Some(3),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn rejects_tiny_fields() {
        assert!(Pasture::new(PastureConfig {
            size: 1,
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn moves_wrap_around() {
        let mut env = pasture(8);
        env.sheep = (4, 4);
        assert_eq!(env.shepherd(), (0, 5));

        env.step(Direction::Left);
        assert_eq!(env.shepherd(), (7, 5), "left edge wraps to the right");
        env.step(Direction::Down);
        env.step(Direction::Down);
        env.step(Direction::Down);
        assert_eq!(env.shepherd(), (7, 0), "bottom edge wraps to the top");
        assert_eq!(env.heading(), Direction::Down);
    }

    #[test]
    fn catching_grows_the_queue() {
        let mut env = pasture(8);
        env.sheep = (1, 5);
        let (next, reward) = env.step(Direction::Right);
        assert_eq!(reward, 50.0);
        assert_eq!(env.score(), 1);
        assert_ne!(env.sheep(), (1, 5), "a new sheep was placed");
        assert!(next.is_some());

        let sheep = env.sheep();
        let away = if sheep == (2, 5) { Direction::Down } else { Direction::Right };
        let (_, reward) = env.step(away);
        assert_eq!(reward, -1.0);
        assert_eq!(env.score(), 1, "queue length unchanged");
    }

    #[test]
    fn reversing_into_the_queue_ends_the_episode() {
        let mut env = pasture(8);
        env.sheep = (1, 5);
        env.step(Direction::Right);
        env.sheep = (2, 5);
        env.step(Direction::Right);
        env.sheep = (6, 6);
        assert_eq!(env.score(), 2);

        let state = env.observe();
        assert!(state.facing_queue.contains(Direction::Left), "queue is behind");
        let (next, reward) = env.step(Direction::Left);
        assert_eq!(next, None);
        assert_eq!(reward, -300.0);
        assert!(!env.is_active());

        let report = env.report.take();
        assert_eq!(report["score"], 2.0);
        assert_eq!(report["steps"], 3.0);
        assert_eq!(report["reward"], -200.0);
    }

    #[test]
    fn tail_never_blocks() {
        let mut env = pasture(8);
        env.sheep = (1, 5);
        env.step(Direction::Right);
        env.sheep = (6, 6);
        assert_eq!(env.score(), 1);

        assert!(
            env.observe().facing_queue.is_empty(),
            "a lone sheep moves away as the shepherd steps onto it"
        );
        let (next, reward) = env.step(Direction::Left);
        assert!(next.is_some());
        assert_eq!(reward, -1.0);
        assert_eq!(env.shepherd(), (0, 5));
    }

    #[test]
    fn episodes_start_with_the_same_heading() {
        let mut env = pasture(8);
        env.step(Direction::Up);
        assert_eq!(env.heading(), Direction::Up);
        env.reset();
        assert_eq!(env.heading(), Pasture::START_HEADING);
    }

    #[test]
    fn step_limit_ends_the_episode() {
        let mut env = Pasture::new(PastureConfig {
            size: 8,
            max_steps: 3,
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        env.sheep = (5, 0);
        assert!(env.step(Direction::Up).0.is_some());
        assert!(env.step(Direction::Up).0.is_some());
        assert!(env.step(Direction::Up).0.is_none());
    }

    #[test]
    fn observation_encodes_sheep_direction() {
        let mut env = pasture(8);
        env.sheep = (3, 2);
        assert_eq!(env.observe().sheep_direction, ComplexDirection::UpRight);
        env.sheep = (0, 7);
        assert_eq!(env.observe().sheep_direction, ComplexDirection::Down);
        assert!(env.observe().facing_queue.is_empty());
    }

    #[test]
    fn reset_restores_the_start() {
        let mut env = pasture(8);
        env.step(Direction::Up);
        let state = env.reset();
        assert_eq!(env.shepherd(), (0, 5));
        assert_eq!(env.score(), 0);
        assert!(env.is_active());
        assert_eq!(state, env.observe());
        assert_ne!(env.sheep(), env.shepherd());
    }

    #[test]
    fn brain_trains_in_the_pasture() {
        let mut env = Pasture::new(PastureConfig {
            size: 8,
            max_steps: 200,
            seed: Some(7),
            ..Default::default()
        })
        .unwrap();
        let mut brain = Brain::new(BrainConfig {
            gamma: 0.78,
            policy: PolicyConfig {
                exploration: decay::Exponential::new(0.05, 0.5, 0.05).unwrap(),
                forbid_reversal: false,
            },
            seed: Some(7),
        })
        .unwrap();

        for _ in 0..30 {
            let summary = brain.go(&mut env, Pasture::START_HEADING).unwrap();
            assert!(summary.steps >= 1 && summary.steps <= 200);
            assert!(!env.is_active(), "episode ran to termination");
        }

        assert_eq!(brain.episodes(), 30);
        assert!(!brain.policy().is_empty());
        assert!(brain.value_table().len() <= 144 * 4, "bounded by the situation space");
        assert!(brain.policy().exploration() < 0.5);
    }
}

use std::{error::Error, io};

use rand::{rngs::StdRng, SeedableRng};
use shepherd::{
    algo::{Brain, BrainConfig},
    env::Environment,
    explain::{Explainer, ExplainerConfig},
    gym::{Pasture, PastureConfig},
};

const NUM_EPISODES: u32 = 2000;

fn main() -> Result<(), Box<dyn Error>> {
    let mut env = Pasture::new(PastureConfig::default())?;
    let mut brain = Brain::new(BrainConfig::default())?;
    let mut explainer = Explainer::new(ExplainerConfig::default())?;

    let mut wtr = csv::Writer::from_writer(io::stdout());
    wtr.write_record(["episode", "steps", "score", "reward", "exploration"])?;

    for i in 0..NUM_EPISODES {
        let summary = brain.go(&mut env, Pasture::START_HEADING)?;
        let report = env.report.take();
        wtr.write_record(&[
            i.to_string(),
            summary.steps.to_string(),
            report["score"].to_string(),
            report["reward"].to_string(),
            format!("{:.4}", summary.exploration),
        ])?;
    }
    wtr.flush()?;

    // Walk a few steps with the trained brain and explain the last decision
    let mut state = env.reset();
    let mut previous = env.heading();
    let mut last = None;
    for _ in 0..20 {
        explainer.observe(state);
        let action = brain.choose_action(state, previous);
        last = Some((state, action, previous));
        let (next, reward) = env.step(action);
        brain.attach_reward(reward)?;
        previous = action;
        match next {
            Some(next) => state = next,
            None => break,
        }
    }
    brain.abort_episode();

    if let Some((state, action, previous)) = last {
        let mut rng = StdRng::seed_from_u64(0);
        let explanation = explainer.explain(&brain, &state, action, previous, &mut rng);
        eprintln!("{explanation}");
    }

    Ok(())
}

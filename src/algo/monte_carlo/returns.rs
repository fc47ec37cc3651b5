/// Discounted return from every step of an episode to its end
///
/// G<sub>i</sub> = Σ<sub>j=i</sub><sup>N-1</sup> r<sub>j</sub> γ<sup>j-i</sup>, accumulated backwards as
/// G<sub>i</sub> = r<sub>i</sub> + γ G<sub>i+1</sub> in a single pass.
pub fn discounted_returns(rewards: &[f32], gamma: f32) -> Vec<f32> {
    let mut returns = vec![0.0; rewards.len()];
    let mut g = 0.0;
    for (i, &r) in rewards.iter().enumerate().rev() {
        g = r + gamma * g;
        returns[i] = g;
    }
    returns
}

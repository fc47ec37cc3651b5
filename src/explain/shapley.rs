/// Exact Shapley values of a cooperative game with `n` players
///
/// `value` is called once per coalition with a membership mask of length `n` and must return
/// the coalition's worth. The result satisfies Σ φ<sub>i</sub> = v(all) - v(∅).
///
/// Cost is 2<sup>n</sup> evaluations, so `n` is expected to be a handful of features.
pub fn shapley_values<F>(n: usize, mut value: F) -> Vec<f32>
where
    F: FnMut(&[bool]) -> f32,
{
    assert!(n < usize::BITS as usize, "too many players for exact enumeration");

    let coalitions = 1usize << n;
    let mut mask = vec![false; n];
    let worth: Vec<f64> = (0..coalitions)
        .map(|bits| {
            for (i, m) in mask.iter_mut().enumerate() {
                *m = bits & (1 << i) != 0;
            }
            value(&mask) as f64
        })
        .collect();

    // weight(s) = s! (n - s - 1)! / n!
    let factorial = |k: usize| (1..=k).map(|x| x as f64).product::<f64>();
    let weights: Vec<f64> = (0..n)
        .map(|s| factorial(s) * factorial(n - s - 1) / factorial(n))
        .collect();

    (0..n)
        .map(|i| {
            let bit = 1 << i;
            (0..coalitions)
                .filter(|bits| bits & bit == 0)
                .map(|bits| {
                    let size = (bits as u64).count_ones() as usize;
                    weights[size] * (worth[bits | bit] - worth[bits])
                })
                .sum::<f64>() as f32
        })
        .collect()
}

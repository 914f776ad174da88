//! Greedy score for the best-first search. Lower is more promising.
//!
//! Not admissible: it only orders the queue.

/// Estimated moves left to turn `value` into `target`.
///
/// From zero the estimate is a coin-change split of `|target|` into 10s, 5s
/// and 1s. Otherwise it counts the doublings or halvings needed to bring
/// `|value|` within a factor of two of `|target|`, plus the remaining gap in
/// steps of ten.
pub fn score(target: f64, value: f64, precision: f64) -> u32 {
    let abs_target = target.abs();
    let abs_value = value.abs();
    let diff = (abs_target - abs_value).abs();
    if diff < precision || diff == 0.0 {
        return 0;
    }

    if value == 0.0 {
        let tens = (abs_target / 10.0).floor();
        let remainder = abs_target % 10.0;
        let fives = (remainder / 5.0).floor();
        let ones = (remainder % 5.0).ceil();
        return (tens + fives + ones) as u32;
    }

    let mut scaled = abs_value;
    let mut mult_steps = 0u32;
    let target_larger = abs_target > scaled;
    while (target_larger && scaled < abs_target / 2.0) || (!target_larger && scaled > abs_target * 2.0)
    {
        if target_larger {
            scaled *= 2.0;
        } else {
            scaled /= 2.0;
        }
        mult_steps += 1;
    }

    let add_steps = ((abs_target - scaled).abs() / 10.0).ceil();
    mult_steps.saturating_add(add_steps as u32)
}

/// Animated value of one item at `step` of a `step_count`-step run.
///
/// Step 0 is always zero and the last step is exactly `target`; intermediate
/// steps round the linear ramp half away from zero and never overshoot.
pub fn animated_value(target: f64, step_count: usize, step: usize) -> f64 {
    if step >= step_count {
        return target;
    }
    if step == 0 {
        return 0.0;
    }
    let ramp = target / step_count as f64 * step as f64;
    ramp.round().min(target)
}

pub fn snapshot_at(targets: &[f64], step_count: usize, step: usize) -> Vec<f64> {
    targets
        .iter()
        .map(|&target| animated_value(target, step_count, step))
        .collect()
}

/// Lazy sequence `state_0 ..= state_step_count` over a fixed target array.
#[derive(Debug, Clone)]
pub struct Snapshots<'a> {
    targets: &'a [f64],
    step_count: usize,
    next: usize,
}

pub fn animate(targets: &[f64], step_count: usize) -> Snapshots<'_> {
    Snapshots {
        targets,
        step_count,
        next: 0,
    }
}

impl Iterator for Snapshots<'_> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.step_count {
            return None;
        }
        let snapshot = snapshot_at(self.targets, self.step_count, self.next);
        self.next += 1;
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.step_count + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Snapshots<'_> {}

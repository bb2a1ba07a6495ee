use crate::animation::interpolate::snapshot_at;

/// One animation run over a frozen target array.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRun {
    id: u64,
    targets: Vec<f64>,
    values: Vec<f64>,
    step: usize,
    step_count: usize,
}

impl AnimationRun {
    pub fn new(id: u64, targets: Vec<f64>, step_count: usize) -> Self {
        let values = vec![0.0; targets.len()];
        Self {
            id,
            targets,
            values,
            step: 0,
            step_count,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_complete(&self) -> bool {
        self.step >= self.step_count
    }

    /// Moves one step towards the targets. Returns `false` once frozen.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.step += 1;
        self.values = snapshot_at(&self.targets, self.step_count, self.step);
        true
    }
}

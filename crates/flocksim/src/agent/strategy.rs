use crate::config::SteeringWeights;
use crate::geom::Pt2;

/// Everything a strategy may look at when picking a heading.
#[derive(Clone, Copy, Debug)]
pub struct HeadingInputs<'a> {
    /// Unit heading from the previous tick.
    pub current_heading: Pt2,
    /// Headings of the nearest neighbors, nearest first.
    pub neighbor_headings: &'a [Pt2],
    /// Vector from the agent to its current goal (not normalized).
    pub to_subgoal: Pt2,
    /// Unit vector away from the nearest obstacle, or zero when none is close.
    pub avoidance: Pt2,
    /// Random unit vector.
    pub perturbation: Pt2,
}

/// Mixes the inputs into a new heading. The controller normalizes the result
/// and keeps the old heading if it is zero or not finite.
pub trait HeadingStrategy {
    fn combine(&self, inputs: &HeadingInputs<'_>) -> Pt2;
}

impl<F> HeadingStrategy for F
where
    F: Fn(&HeadingInputs<'_>) -> Pt2,
{
    fn combine(&self, inputs: &HeadingInputs<'_>) -> Pt2 {
        self(inputs)
    }
}

/// Linear blend of inertia, alignment, goal pull, avoidance and noise.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedBlend {
    pub weights: SteeringWeights,
}

impl WeightedBlend {
    pub fn new(weights: SteeringWeights) -> Self {
        Self { weights }
    }
}

impl HeadingStrategy for WeightedBlend {
    fn combine(&self, inputs: &HeadingInputs<'_>) -> Pt2 {
        let w = &self.weights;
        let alignment = if inputs.neighbor_headings.is_empty() {
            Pt2::zeros()
        } else {
            inputs.neighbor_headings.iter().sum::<Pt2>() / inputs.neighbor_headings.len() as f64
        };
        let goal = inputs
            .to_subgoal
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Pt2::zeros);
        inputs.current_heading * w.inertia
            + alignment * w.alignment
            + goal * w.goal
            + inputs.avoidance * w.avoidance
            + inputs.perturbation * w.noise
    }
}

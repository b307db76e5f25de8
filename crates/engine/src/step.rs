use serde::{Deserialize, Serialize};

/// Opaque identifier for recipe steps.
pub type StepId = u64;

/// Span assigned to each step by the grid reset, in seconds.
pub const DEFAULT_STEP_SPAN_SECONDS: f64 = 5.0;

/// Description given to freshly appended steps until the author edits it.
pub const NEW_STEP_DESCRIPTION: &str = "New step";

/// One ordered unit of a recipe's instructions, bound to a window of the
/// instructional video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub description: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl Step {
    /// Returns the video window this step plays within.
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Half-open `[start, end)` interval of video playback, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

/// Ordered step collection owned by the editor.
///
/// Sequence position is the step order; ids are stable handles and carry no
/// ordering meaning. Editing operations never leave a populated list empty.
///
/// # Example
/// ```
/// use engine::{Step, StepList};
///
/// let mut steps = StepList::new(vec![Step {
///     id: 3,
///     description: "Whisk the batter".to_string(),
///     start_time: 0.0,
///     end_time: 8.0,
/// }]);
///
/// assert_eq!(steps.append_default(), 4);
/// assert_eq!(steps.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    /// Creates a list from steps already in display order.
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Step> {
        self.steps.get_mut(index)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the largest id in use, or zero for an empty list.
    pub fn max_id(&self) -> StepId {
        self.steps.iter().map(|step| step.id).max().unwrap_or(0)
    }

    /// Appends a placeholder step with id `max_id + 1` and returns the id.
    pub fn append_default(&mut self) -> StepId {
        let id = self.max_id() + 1;
        self.steps.push(Step {
            id,
            description: NEW_STEP_DESCRIPTION.to_string(),
            start_time: 0.0,
            end_time: DEFAULT_STEP_SPAN_SECONDS,
        });
        id
    }

    /// Removes the step at `index`.
    ///
    /// Refused when the removal would empty the list or when `index` is out
    /// of range; a populated recipe keeps at least one step.
    pub fn remove_at(&mut self, index: usize) -> Option<Step> {
        if self.steps.len() <= 1 || index >= self.steps.len() {
            return None;
        }
        Some(self.steps.remove(index))
    }

    /// Overwrites every window with a fixed grid: step `i` gets
    /// `[span * i, span * (i + 1))`. Prior manual edits are lost.
    pub fn reset_grid(&mut self, span: f64) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.start_time = span * index as f64;
            step.end_time = span * (index as f64 + 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_STEP_SPAN_SECONDS, Step, StepList};

    fn step(id: u64, start_time: f64, end_time: f64) -> Step {
        Step {
            id,
            description: format!("step {id}"),
            start_time,
            end_time,
        }
    }

    #[test]
    fn append_assigns_max_id_plus_one_even_for_sparse_ids() {
        let mut steps = StepList::new(vec![step(1, 0.0, 5.0), step(7, 5.0, 10.0), step(3, 10.0, 15.0)]);

        let id = steps.append_default();

        assert_eq!(id, 8);
        let appended = steps.get(3).expect("appended step exists");
        assert_eq!(appended.id, 8);
        assert_eq!(appended.start_time, 0.0);
        assert_eq!(appended.end_time, DEFAULT_STEP_SPAN_SECONDS);
    }

    #[test]
    fn append_to_empty_list_starts_at_one() {
        let mut steps = StepList::default();
        assert_eq!(steps.max_id(), 0);
        assert_eq!(steps.append_default(), 1);
    }

    #[test]
    fn remove_never_drops_the_last_step() {
        let mut steps = StepList::new(vec![step(1, 0.0, 5.0), step(2, 5.0, 10.0)]);

        assert!(steps.remove_at(0).is_some());
        assert!(steps.remove_at(0).is_none());
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn remove_out_of_range_is_refused() {
        let mut steps = StepList::new(vec![step(1, 0.0, 5.0), step(2, 5.0, 10.0)]);
        assert!(steps.remove_at(5).is_none());
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn reset_grid_lays_out_contiguous_spans() {
        let mut steps = StepList::new(vec![step(1, 2.0, 3.0), step(2, 9.0, 40.0), step(3, 0.5, 0.6)]);

        steps.reset_grid(DEFAULT_STEP_SPAN_SECONDS);

        for (index, step) in steps.steps().iter().enumerate() {
            assert_eq!(step.start_time, 5.0 * index as f64);
            assert_eq!(step.end_time, 5.0 * (index as f64 + 1.0));
        }
    }
}

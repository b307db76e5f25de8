use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::step::{Step, StepId};

/// Step record in the shape the recipe backend serves and accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStep {
    pub step_id: StepId,
    pub step_order: u32,
    pub step_description: String,
    pub video_start: f64,
    pub video_end: f64,
}

/// Maps backend step records into the editor's shape.
///
/// Pure, order-preserving, 1:1; the backend is trusted to deliver records in
/// display order.
///
/// # Example
/// ```
/// use engine::{RemoteStep, steps_from_remote};
///
/// let steps = steps_from_remote(vec![RemoteStep {
///     step_id: 1,
///     step_order: 1,
///     step_description: "a".to_string(),
///     video_start: 0.0,
///     video_end: 30.0,
/// }]);
///
/// assert_eq!(steps[0].id, 1);
/// assert_eq!(steps[0].end_time, 30.0);
/// ```
pub fn steps_from_remote(remote: Vec<RemoteStep>) -> Vec<Step> {
    remote
        .into_iter()
        .map(|record| Step {
            id: record.step_id,
            description: record.step_description,
            start_time: record.video_start,
            end_time: record.video_end,
        })
        .collect()
}

/// Decodes a backend JSON payload into editor steps.
pub fn steps_from_json(payload: &str) -> Result<Vec<Step>> {
    let remote: Vec<RemoteStep> =
        serde_json::from_str(payload).map_err(|source| EditorError::RemotePayload { source })?;
    Ok(steps_from_remote(remote))
}

/// Maps editor steps back into the backend shape for draft submission.
///
/// `step_order` is re-derived from sequence position, 1-based.
pub fn steps_to_remote(steps: &[Step]) -> Vec<RemoteStep> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| RemoteStep {
            step_id: step.id,
            step_order: index as u32 + 1,
            step_description: step.description.clone(),
            video_start: step.start_time,
            video_end: step.end_time,
        })
        .collect()
}

#[derive(Debug)]
pub(crate) struct FormState {
    pub(crate) boundary: String,
    pub(crate) stage: WritingStage,
    pub(crate) next_part_idx: usize,
}

impl FormState {
    pub(crate) fn new(boundary: String) -> FormState {
        FormState {
            boundary,
            stage: WritingStage::Start,
            next_part_idx: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WritingStage {
    /// Nothing has been written yet.
    Start,
    /// At least one part has been opened.
    WritingParts,
    /// The closing boundary has been written.
    Closed,
}

use serde::{Deserialize, Serialize};

/// One partial summary shown as a numbered list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletItem {
    /// 1-based position.
    pub ordinal: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Aggregate {
    pub final_summary: String,
    pub bullets: Vec<BulletItem>,
}

/// Join partial summaries into the final summary and a parallel bullet list.
///
/// No text is altered: partials are joined with a single space, in order.
pub fn aggregate(partials: &[String]) -> Aggregate {
    Aggregate {
        final_summary: partials.join(" "),
        bullets: partials
            .iter()
            .enumerate()
            .map(|(i, text)| BulletItem {
                ordinal: i + 1,
                text: text.clone(),
            })
            .collect(),
    }
}

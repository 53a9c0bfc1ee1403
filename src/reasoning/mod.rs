use crate::diagnostics::Diagnostics;
use crate::priority::ReasoningFlags;
use crate::subjects::model::StrategicState;

const LOW_CONFIDENCE: f64 = 0.4;
const STALLED_VELOCITY: f64 = 0.01;

/// One human-readable reason per subject. Rules are checked in order and the
/// first match wins.
pub fn explain(subject_name: &str, diagnostics: &Diagnostics, flags: &ReasoningFlags) -> String {
    let mode = diagnostics.strategic_mode;
    let mastery_pct = diagnostics.durable_mastery_score * 100.0;

    if flags.roi_warning {
        return format!(
            "Low return on investment: {:.0}h invested in {} with almost no measurable gain. \
             Consider changing your approach before adding more hours.",
            diagnostics.total_time_invested_hr, subject_name
        );
    }
    if flags.urgency_shock {
        return format!(
            "You raised the relevance of {} since the last cycle, so it jumps up the queue.",
            subject_name
        );
    }
    if diagnostics.mastery_confidence_score < LOW_CONFIDENCE {
        return format!(
            "Not enough recent practice data on {} to trust the mastery estimate. \
             More questions will sharpen the diagnosis.",
            subject_name
        );
    }
    if mode == StrategicState::Conquer && diagnostics.learning_velocity < STALLED_VELOCITY {
        return format!(
            "Progress on {} has stalled at {:.0}% mastery. Try a different kind of practice to break through.",
            subject_name, mastery_pct
        );
    }
    if mode == StrategicState::Cement {
        if let Some((topic, accuracy)) = diagnostics.weakest_topic() {
            return format!(
                "{} is nearly mastered; reinforce '{}' ({:.0}% accuracy) so it sticks.",
                subject_name, topic, accuracy * 100.0
            );
        }
    }

    match mode {
        StrategicState::Discovery if flags.discovery_boost_applied => format!(
            "{} is new: it gets a discovery boost so you can map out the material early.",
            subject_name
        ),
        StrategicState::Discovery => format!(
            "{} is still in discovery. Explore the basics when time allows.",
            subject_name
        ),
        StrategicState::Conquer => format!(
            "{} is at {:.0}% mastery. Push now to close the gap to the target.",
            subject_name, mastery_pct
        ),
        StrategicState::DeepWork => format!(
            "{} needs sustained deep work: mastery is {:.0}%.",
            subject_name, mastery_pct
        ),
        StrategicState::Maintain => format!(
            "{} is mastered and fresh. A short maintenance block keeps it that way.",
            subject_name
        ),
        StrategicState::Cement => format!("Keep {} on the schedule this cycle.", subject_name),
    }
}

//! Learner narrative generation
//!
//! Explains a predicted learner type in plain language, interpolating the
//! learner's own feature values and picking a suggestion from fixed score
//! thresholds.

use crate::features::field_value;
use crate::types::{FeatureName, LearnerType, RawFieldMap};

/// Fast learners below this submission rating get the cautionary message
pub const FAST_MIN_SUBMISSION_RATING: f64 = 2.0;

/// Fast learners below this exam score get the cautionary message
pub const FAST_MIN_EXAM_SCORE: f64 = 70.0;

/// Consistent learners at or above this exam score may qualify for the mentor track
pub const MENTOR_MIN_EXAM_SCORE: f64 = 85.0;

/// Consistent learners at or above this submission rating may qualify for the mentor track
pub const MENTOR_MIN_SUBMISSION_RATING: f64 = 4.0;

/// Feature values as they appear in the narrative
struct NarrativeValues {
    avg_study_duration: f64,
    avg_submission_rating: f64,
    avg_exam_score: f64,
    total_submissions: i64,
    total_tracking_events: i64,
    total_completed_modules: i64,
    days_since_last_active: i64,
}

impl NarrativeValues {
    fn from_fields(fields: &RawFieldMap) -> Self {
        // Counts are shown as whole numbers, truncated
        let count = |f: FeatureName| field_value(fields, f) as i64;
        Self {
            avg_study_duration: field_value(fields, FeatureName::AvgStudyDuration),
            avg_submission_rating: field_value(fields, FeatureName::AvgSubmissionRating),
            avg_exam_score: field_value(fields, FeatureName::AvgExamScore),
            total_submissions: count(FeatureName::TotalSubmissions),
            total_tracking_events: count(FeatureName::TotalTrackingEvents),
            total_completed_modules: count(FeatureName::TotalCompletedModules),
            days_since_last_active: count(FeatureName::DaysSinceLastActive),
        }
    }
}

/// Narrative generator for predicted learner types
pub struct NarrativeGenerator;

impl NarrativeGenerator {
    /// Explain why a learner received `label`.
    ///
    /// Missing or unparseable fields count as 0. Labels outside the known
    /// learner types get a generic sentence naming the label verbatim.
    pub fn explain(label: &str, fields: &RawFieldMap) -> String {
        let v = NarrativeValues::from_fields(fields);

        match LearnerType::from_label(label) {
            Some(LearnerType::Fast) => explain_fast(&v),
            Some(LearnerType::Consistent) => explain_consistent(&v),
            Some(LearnerType::Reflective) => explain_reflective(&v),
            _ => explain_generic(label),
        }
    }
}

/// Whether a fast learner's scores suggest speed is costing depth
fn speed_over_depth(v: &NarrativeValues) -> bool {
    v.avg_submission_rating < FAST_MIN_SUBMISSION_RATING || v.avg_exam_score < FAST_MIN_EXAM_SCORE
}

/// Whether a consistent learner is strong enough to mentor others
fn mentor_ready(v: &NarrativeValues) -> bool {
    v.avg_exam_score >= MENTOR_MIN_EXAM_SCORE
        && v.avg_submission_rating >= MENTOR_MIN_SUBMISSION_RATING
}

fn explain_fast(v: &NarrativeValues) -> String {
    let mut text = format!(
        "You are a **Fast Learner** because you work through sub-modules and tutorials \
         at a high pace (about **{}** sub-modules completed) with an average study \
         duration of about **{:.2} minutes** per session. You have interacted with the \
         platform a fair amount (**{}** activities) and submitted **{}** assignments or quizzes.",
        v.total_completed_modules,
        v.avg_study_duration,
        v.total_tracking_events,
        v.total_submissions,
    );

    if speed_over_depth(v) {
        text.push_str(&format!(
            " However, your average submission rating (**{:.2}**) and exam score \
             (**{:.2}**) are on the low side. Your speed may be sacrificing a deeper \
             understanding of the material.\n\n\
             **Suggestion:** Spend more time re-reading the material before moving on to \
             the next sub-module, and use review or extra practice exercises to strengthen \
             the concepts that still feel weak.",
            v.avg_submission_rating, v.avg_exam_score,
        ));
    } else {
        text.push_str(
            " Your pace is well-balanced with good results, both in submission ratings \
             and in exams.\n\n\
             **Suggestion:** Keep up this rhythm and challenge yourself with more complex \
             modules or projects, such as real-world case studies or harder assignments.",
        );
    }

    text
}

fn explain_consistent(v: &NarrativeValues) -> String {
    let mut text = format!(
        "You are a **Consistent Learner** because you study regularly and in a balanced \
         way. You have completed about **{}** sub-modules, made **{}** submissions and \
         logged about **{}** learning activities. Your average submission rating \
         (**{:.2}**) and exam score (**{:.2}**) show solid performance. You are also still \
         fairly active, with about **{} days** since your last activity.",
        v.total_completed_modules,
        v.total_submissions,
        v.total_tracking_events,
        v.avg_submission_rating,
        v.avg_exam_score,
        v.days_since_last_active,
    );

    if mentor_ready(v) {
        text.push_str(
            " This level of performance is very impressive.\n\n\
             **Suggestion:** Try taking on a small mentoring role, such as helping \
             classmates who are struggling or writing summaries of the material. Teaching \
             others is one of the best ways to deepen your own understanding.",
        );
    } else {
        text.push_str(
            " You already have a good balance between how often you study and how well \
             you understand the material.\n\n\
             **Suggestion:** Maintain your current pace. If a topic feels harder, revisit \
             the related sub-modules or look for additional resources such as official \
             documentation, videos or community discussions.",
        );
    }

    text
}

fn explain_reflective(v: &NarrativeValues) -> String {
    format!(
        "You are a **Reflective Learner** because your learning activity is not yet very \
         high, but you most likely spend more time reflecting and choosing material \
         carefully. So far you have completed about **{}** sub-modules, with **{}** \
         submissions and **{}** learning activities in total. A gap of about **{} days** \
         since your last activity also shows that your learning rhythm can still \
         improve.\n\n\
         This may mean you are still in an early exploration phase or need a little push \
         to be more active.\n\n\
         **Suggestion:** Pick the one topic or module that interests you most and focus \
         on exploring it deeply until it is finished. Afterwards, review what worked and \
         which parts are still confusing. If you get stuck, ask a mentor, a classmate or \
         a learning community so you are not studying alone.",
        v.total_completed_modules,
        v.total_submissions,
        v.total_tracking_events,
        v.days_since_last_active,
    )
}

fn explain_generic(label: &str) -> String {
    format!(
        "You were placed in the **{}** category based on a combination of activity \
         patterns such as study duration, number of platform interactions, submitted \
         assignments, completed sub-modules and average exam score.",
        label
    )
}

//! Built-in candidate list loaded into the registry at startup.
//!
//! These are marketplace emote ids known at release time. Whether each one is still
//! purchasable is decided by the validator on every refresh, not here.

use crate::models::{CandidateEntry, EmoteCategory};

const SEED_EMOTES: &[(&str, &str, EmoteCategory)] = &[
    ("3360686498", "Stadium", EmoteCategory::Gesture),
    ("3360689775", "Salute", EmoteCategory::Gesture),
    ("3360692915", "Tilt", EmoteCategory::Pose),
    ("3576686446", "Hello", EmoteCategory::Gesture),
    ("3576968026", "Shrug", EmoteCategory::Gesture),
    ("3576823880", "Point2", EmoteCategory::Gesture),
    ("3576717965", "Shy", EmoteCategory::Emotion),
    ("3576721660", "Robot", EmoteCategory::Dance),
    ("3576747102", "Around Town", EmoteCategory::Dance),
    ("3570535774", "Jumping Jacks", EmoteCategory::Action),
    ("3716633898", "Twirl", EmoteCategory::Dance),
    ("4555808220", "Keeping Time", EmoteCategory::Dance),
    ("4686925579", "Sleep", EmoteCategory::Funny),
    ("4841405708", "Happy", EmoteCategory::Emotion),
    ("4841407203", "Sad", EmoteCategory::Emotion),
    ("4940563117", "Cower", EmoteCategory::Funny),
    ("5104344710", "Hero Landing", EmoteCategory::Action),
    ("5915693819", "Applaud", EmoteCategory::Gesture),
    ("5917459365", "Floss Dance", EmoteCategory::Dance),
    ("5918726674", "Dolphin Dance", EmoteCategory::Dance),
];

/// Seed candidates in their fixed insertion order.
pub fn seed_candidates() -> Vec<CandidateEntry> {
    SEED_EMOTES
        .iter()
        .map(|(id, name, category)| CandidateEntry::new(*id, *name, *category))
        .collect()
}

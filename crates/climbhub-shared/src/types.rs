use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of an uploaded climbing video.
    VideoId
);
entity_id!(
    /// Identifier of a comment on a video.
    CommentId
);
entity_id!(
    /// Identifier of a climber profile.
    ProfileId
);
entity_id!(
    /// Identifier of an account. Used for like sets and save toggles.
    UserId
);
entity_id!(
    /// Identifier of a climbing gym.
    GymId
);

/// How the difficulty of a climb is graded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GradingSystem {
    /// The Hueco "V" scale (V0, V1, ...).
    #[serde(rename = "V-Grading")]
    VGrading,
    /// Japanese gym color grading (Pink, Green, Yellow, ...).
    #[serde(rename = "Japanese-Colored")]
    JapaneseColored,
}

/// Self-reported climber skill level, part of the profile preferences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Which video listing the backend should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoQuery {
    /// Every video, newest first (the main feed).
    All,
    /// Videos recorded at one gym.
    Gym(GymId),
    /// Videos uploaded by one profile.
    Profile(ProfileId),
    /// Preference-ranked listing for one user (the reels feed).
    Preferences(UserId),
}

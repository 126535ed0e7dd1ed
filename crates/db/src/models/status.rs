//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table. Seed order follows the
//! run lifecycle, so a larger id is always a later stage; the repositories
//! lean on that for monotonic transition guards.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Story generation run status. Doubles as the progress indicator
    /// observed by the polling endpoint.
    StoryStatus {
        Pending = 1,
        Transcribing = 2,
        GeneratingText = 3,
        GeneratingImages = 4,
        Composing = 5,
        Completed = 6,
        Failed = 7,
    }
}

define_status_enum! {
    /// Audio transcription status.
    TranscriptionStatus {
        Pending = 1,
        Processing = 2,
        Completed = 3,
        Failed = 4,
    }
}

impl StoryStatus {
    /// Whether this status ends the run (no further transitions allowed).
    pub fn is_terminal(self) -> bool {
        matches!(self, StoryStatus::Completed | StoryStatus::Failed)
    }

    /// Status name as seeded in `story_statuses`, used in API payloads.
    pub fn name(self) -> &'static str {
        match self {
            StoryStatus::Pending => "pending",
            StoryStatus::Transcribing => "transcribing",
            StoryStatus::GeneratingText => "generating_text",
            StoryStatus::GeneratingImages => "generating_images",
            StoryStatus::Composing => "composing",
            StoryStatus::Completed => "completed",
            StoryStatus::Failed => "failed",
        }
    }

    /// Map a raw status id back to the enum, if it is a known id.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(StoryStatus::Pending),
            2 => Some(StoryStatus::Transcribing),
            3 => Some(StoryStatus::GeneratingText),
            4 => Some(StoryStatus::GeneratingImages),
            5 => Some(StoryStatus::Composing),
            6 => Some(StoryStatus::Completed),
            7 => Some(StoryStatus::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_status_ids_match_seed_data() {
        assert_eq!(StoryStatus::Pending.id(), 1);
        assert_eq!(StoryStatus::Transcribing.id(), 2);
        assert_eq!(StoryStatus::GeneratingText.id(), 3);
        assert_eq!(StoryStatus::GeneratingImages.id(), 4);
        assert_eq!(StoryStatus::Composing.id(), 5);
        assert_eq!(StoryStatus::Completed.id(), 6);
        assert_eq!(StoryStatus::Failed.id(), 7);
    }

    #[test]
    fn transcription_status_ids_match_seed_data() {
        assert_eq!(TranscriptionStatus::Pending.id(), 1);
        assert_eq!(TranscriptionStatus::Processing.id(), 2);
        assert_eq!(TranscriptionStatus::Completed.id(), 3);
        assert_eq!(TranscriptionStatus::Failed.id(), 4);
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(StoryStatus::Completed.is_terminal());
        assert!(StoryStatus::Failed.is_terminal());
        assert!(!StoryStatus::Pending.is_terminal());
        assert!(!StoryStatus::Composing.is_terminal());
    }

    #[test]
    fn from_id_round_trips_all_statuses() {
        for id in 1..=7 {
            let status = StoryStatus::from_id(id).unwrap();
            assert_eq!(status.id(), id);
        }
        assert!(StoryStatus::from_id(0).is_none());
        assert!(StoryStatus::from_id(8).is_none());
    }
}

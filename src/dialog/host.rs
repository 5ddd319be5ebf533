use crate::library::PlaylistSummary;

/// Short-lived message shown by the host (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AddedToPlaylist { playlist: String, items: usize },
    PlaylistCreated { name: String },
    Failed { message: String },
}

impl Notice {
    pub fn is_success(&self) -> bool {
        !matches!(self, Notice::Failed { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Notice::AddedToPlaylist { playlist, items } if *items == 1 => {
                format!("Added to {playlist}")
            }
            Notice::AddedToPlaylist { playlist, items } => {
                format!("Added {items} items to {playlist}")
            }
            Notice::PlaylistCreated { name } => format!("Playlist \"{name}\" created"),
            Notice::Failed { message } => message.clone(),
        }
    }
}

/// Confirmation asked before appending something the playlist already has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePrompt {
    pub playlist: PlaylistSummary,
    pub duplicates: usize,
}

impl DuplicatePrompt {
    pub fn title(&self) -> &'static str {
        "Already in playlist"
    }

    pub fn message(&self) -> String {
        let times = if self.duplicates == 1 {
            "once".to_string()
        } else {
            format!("{} times", self.duplicates)
        };
        format!(
            "\"{}\" already contains this item {times}. Add it anyway?",
            self.playlist.name
        )
    }
}

/// Surface the dialogs use to talk to the user outside their own list.
pub trait DialogHost: Send + Sync {
    fn notify(&self, notice: Notice);

    /// Show the duplicate prompt. The answer comes back through
    /// `AppendDialog::confirm_duplicate` or `AppendDialog::cancel_duplicate`.
    fn prompt_duplicates(&self, prompt: DuplicatePrompt);

    /// Hide a prompt that is still visible when its dialog closes.
    fn dismiss_prompt(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::PlaylistId;

    #[test]
    fn prompt_message_counts_duplicates() {
        let prompt = DuplicatePrompt {
            playlist: PlaylistSummary {
                id: PlaylistId::new(3),
                name: "Road trip".to_string(),
                thumbnail_url: String::new(),
                stream_count: 4,
            },
            duplicates: 2,
        };
        assert_eq!(
            prompt.message(),
            "\"Road trip\" already contains this item 2 times. Add it anyway?"
        );
    }

    #[test]
    fn notice_wording() {
        let single = Notice::AddedToPlaylist {
            playlist: "Later".to_string(),
            items: 1,
        };
        assert_eq!(single.message(), "Added to Later");
        assert!(single.is_success());

        let failed = Notice::Failed {
            message: "Unable to add".to_string(),
        };
        assert!(!failed.is_success());
    }
}

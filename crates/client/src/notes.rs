//! The notes view's store.
//!
//! Edits land in memory through [`NotesStore::update_note`] and reach the
//! server only on [`NotesStore::save_note`]. Saving overwrites whatever the
//! server holds.

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::state::StoreState;
use crate::types::{ItemId, ItemPayload, Note, Session, NOTE_CONTENT_KEY, NOTE_TYPE};

/// Body of a freshly created note.
pub const EMPTY_NOTE_CONTENT: &str = "<p></p>";

pub struct NotesStore {
    api: ApiClient,
    state: StoreState<Note>,
}

impl NotesStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StoreState::new(),
        }
    }

    pub fn state(&self) -> &StoreState<Note> {
        &self.state
    }

    pub fn notes(&self) -> &[Note] {
        &self.state.items
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Load every note, newest first.
    pub async fn fetch_notes(&mut self, session: &Session) -> Result<&[Note], ClientError> {
        self.state.begin();
        let result = self.api.list_inbox_items(session, Some(NOTE_TYPE)).await;
        let items = self.state.finish(result)?;
        self.state.replace_all(items.iter().map(Note::from).collect());
        Ok(&self.state.items)
    }

    /// Refetch and return the newest note, if any.
    pub async fn latest_note(&mut self, session: &Session) -> Result<Option<Note>, ClientError> {
        let notes = self.fetch_notes(session).await?;
        Ok(notes.first().cloned())
    }

    pub async fn add_note(
        &mut self,
        session: &Session,
        title: &str,
        content: &str,
    ) -> Result<Note, ClientError> {
        let payload = ItemPayload {
            title: Some(title.to_string()),
            item_type: Some(NOTE_TYPE.to_string()),
            metadata: Some(serde_json::json!({ NOTE_CONTENT_KEY: content })),
            ..ItemPayload::default()
        };

        self.state.begin();
        let result = self.api.create_inbox_item(session, &payload).await;
        let item = self.state.finish(result)?;
        let note = Note::from(&item);
        self.state.prepend(note.clone());
        Ok(note)
    }

    /// Apply an edit to the cached note without talking to the server.
    pub fn update_note(
        &mut self,
        id: ItemId,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<&Note, ClientError> {
        let Some(note) = self.state.get_mut(id) else {
            let err = ClientError::NotLoaded(id);
            self.state.error = Some(err.to_string());
            return Err(err);
        };
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        let note = note.clone();
        self.state.upsert(note);
        self.state.get(id).ok_or(ClientError::NotLoaded(id))
    }

    /// Persist the cached copy of a note.
    pub async fn save_note(&mut self, session: &Session, id: ItemId) -> Result<Note, ClientError> {
        let Some(note) = self.state.get(id) else {
            return self.state.finish(Err(ClientError::NotLoaded(id)));
        };
        let payload = note.to_payload();

        self.state.begin();
        let result = self.api.update_inbox_item(session, id, &payload).await;
        let item = self.state.finish(result)?;
        let saved = Note::from(&item);
        self.state.upsert(saved.clone());
        Ok(saved)
    }

    /// The note the notes view should show: the newest one, or a new empty
    /// note when there are none yet.
    pub async fn open(&mut self, session: &Session) -> Result<Note, ClientError> {
        match self.latest_note(session).await? {
            Some(note) => Ok(note),
            None => self.add_note(session, "", EMPTY_NOTE_CONTENT).await,
        }
    }
}

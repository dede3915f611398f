use crate::app::model::SaveStatus;
use crate::app::{App, Message, Model, ToastLevel};
use crate::persist;

impl App {
    /// Run the side effects of a message that `update` has applied.
    ///
    /// Every document change is written to the store. A failed write keeps
    /// the in-memory document and reports the error.
    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        if !model.take_document_changed() {
            return;
        }
        match persist::save_state(self.store.as_mut(), &model.state) {
            Ok(()) => {
                model.save_status = SaveStatus::Saved;
            }
            Err(err) => {
                tracing::warn!(error = %err, ?msg, "failed to save document");
                model.save_status = SaveStatus::Failed;
                model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
            }
        }
    }
}

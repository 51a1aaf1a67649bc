use crate::error::AppError;
use crate::models::{checklist_for, Checklist, ChecklistProgress, FormSubmission, LeadershipAlert};
use property_proximity::{load_json, save_json, KeyValueStore};

pub const CHECKLIST_KEY_PREFIX: &str = "checklist-";
pub const FORM_KEY_PREFIX: &str = "form-";

pub fn checklist_key(category: &str) -> String {
    format!("{}{}", CHECKLIST_KEY_PREFIX, category)
}

pub fn leadership_suppress_key(category: &str) -> String {
    format!("{}-suppress-911-leadership", checklist_key(category))
}

pub fn form_key(form_id: &str) -> String {
    format!("{}{}", FORM_KEY_PREFIX, form_id)
}

/// Result of ticking or unticking one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub checked: bool,
    /// Open the leadership alert now
    pub prompt_leadership: bool,
}

/// Per-device checklist progress, form drafts and their resets
pub struct ChecklistService<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ChecklistService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn checklist(&self, category: &str) -> Checklist {
        checklist_for(category)
    }

    /// Saved checked state, padded with `false` or truncated to the current
    /// item count
    pub fn progress(&self, category: &str) -> ChecklistProgress {
        let total = self.checklist(category).items.len();
        let saved: Vec<bool> =
            load_json(&self.store, &checklist_key(category)).unwrap_or_default();

        let checked = if saved.len() == total {
            saved
        } else {
            (0..total).map(|i| saved.get(i).copied().unwrap_or(false)).collect()
        };
        ChecklistProgress { checked }
    }

    pub fn toggle(&self, category: &str, index: usize) -> Result<ToggleOutcome, AppError> {
        let checklist = self.checklist(category);
        let mut progress = self.progress(category);
        let Some(slot) = progress.checked.get_mut(index) else {
            return Err(AppError::Validation(format!(
                "Checklist '{}' has no item {}",
                category, index
            )));
        };
        *slot = !*slot;
        let checked = *slot;

        save_json(&self.store, &checklist_key(category), &progress.checked)?;

        let prompt_leadership = checked
            && checklist.items[index].triggers_leadership()
            && !self.is_leadership_prompt_suppressed(category);
        log::debug!(
            "Checklist '{}' item {} -> {} ({}/{})",
            category,
            index,
            checked,
            progress.done(),
            progress.total()
        );

        Ok(ToggleOutcome {
            checked,
            prompt_leadership,
        })
    }

    pub fn is_leadership_prompt_suppressed(&self, category: &str) -> bool {
        load_json(&self.store, &leadership_suppress_key(category)).unwrap_or(false)
    }

    /// Remembers "don't ask again" from a sent alert
    pub fn record_leadership_alert(
        &self,
        category: &str,
        alert: &LeadershipAlert,
    ) -> Result<(), AppError> {
        if alert.dont_ask_again {
            log::info!("Leadership prompt suppressed for '{}'", category);
            save_json(&self.store, &leadership_suppress_key(category), &true)?;
        }
        Ok(())
    }

    pub fn save_form_draft(&self, form_id: &str, form: &FormSubmission) -> Result<(), AppError> {
        save_json(&self.store, &form_key(form_id), form)?;
        Ok(())
    }

    pub fn load_form_draft(&self, form_id: &str) -> Option<FormSubmission> {
        load_json(&self.store, &form_key(form_id))
    }

    /// Forgets checked items; the leadership suppression stays
    pub fn clear_checklist(&self, category: &str) -> Result<(), AppError> {
        self.store.remove(&checklist_key(category))?;
        log::info!("Cleared checklist '{}'", category);
        Ok(())
    }

    pub fn clear_form(&self, form_id: &str) -> Result<(), AppError> {
        self.store.remove(&form_key(form_id))?;
        log::info!("Cleared form draft '{}'", form_id);
        Ok(())
    }

    /// Removes every checklist and form key, suppression flags included.
    /// Returns the number of keys removed.
    pub fn clear_app_storage(&self) -> Result<usize, AppError> {
        let mut removed = 0;
        for prefix in [CHECKLIST_KEY_PREFIX, FORM_KEY_PREFIX] {
            for key in self.store.keys_with_prefix(prefix)? {
                self.store.remove(&key)?;
                removed += 1;
            }
        }
        log::info!("Cleared {} saved checklist and form entries", removed);
        Ok(removed)
    }
}

use crate::config::ContactConfig;
use crate::services::submission::{ContactForm, Deliver};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug)]
struct Entry {
    form: Arc<ContactForm>,
    touched: Instant,
}

/// Contact forms held on behalf of visitors, keyed by session id.
#[derive(Clone, Debug)]
pub struct FormSessions {
    forms: Arc<DashMap<Uuid, Entry>>,
    delivery: Arc<dyn Deliver>,
    dismiss_after: Duration,
    ttl: Duration,
}

impl FormSessions {
    #[must_use]
    pub fn new(delivery: Arc<dyn Deliver>, config: &ContactConfig) -> Self {
        Self {
            forms: Arc::new(DashMap::new()),
            delivery,
            dismiss_after: Duration::from_secs(config.dismiss_after_secs),
            ttl: Duration::from_secs(config.session_ttl_secs),
        }
    }

    pub fn create(&self) -> (Uuid, Arc<ContactForm>) {
        let id = Uuid::new_v4();
        let form = Arc::new(ContactForm::new(Arc::clone(&self.delivery), self.dismiss_after));
        self.forms.insert(id, Entry { form: Arc::clone(&form), touched: Instant::now() });
        tracing::debug!(session.id = %id, "Contact form session created");
        (id, form)
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<ContactForm>> {
        self.forms.get_mut(&id).map(|mut entry| {
            entry.touched = Instant::now();
            Arc::clone(&entry.form)
        })
    }

    /// Ends a session. Returns `false` if it did not exist.
    pub fn remove(&self, id: Uuid) -> bool {
        self.forms.remove(&id).is_some_and(|(_, entry)| {
            entry.form.close();
            true
        })
    }

    /// Ends every session idle for longer than the configured TTL.
    pub fn sweep_idle(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.forms.retain(|_, entry| {
            let keep = now.duration_since(entry.touched) <= self.ttl;
            if !keep {
                entry.form.close();
                removed += 1;
            }
            keep
        });
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

/// A transient, user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub description: String,
    pub kind: ToastKind,
    /// Unix millis after which the toast is dropped by `expire`
    pub expires_at: i64,
}

/// Visible notifications plus a history of everything ever shown
#[derive(Debug, Clone)]
pub struct ToastQueue {
    visible: Vec<Toast>,
    history: Vec<Toast>,
    lifetime_millis: i64,
    next_id: u64,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ToastQueue {
    pub fn new(lifetime_secs: u64) -> Self {
        Self {
            visible: Vec::new(),
            history: Vec::new(),
            lifetime_millis: i64::try_from(lifetime_secs.saturating_mul(1000)).unwrap_or(i64::MAX),
            next_id: 1,
        }
    }

    pub fn push(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: ToastKind,
        now_millis: i64,
    ) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;

        let toast = Toast {
            id,
            title: title.into(),
            description: description.into(),
            kind,
            expires_at: now_millis.saturating_add(self.lifetime_millis),
        };
        self.history.push(toast.clone());
        self.visible.push(toast);
        id
    }

    pub fn remove(&mut self, id: ToastId) {
        self.visible.retain(|toast| toast.id != id);
    }

    /// Restart the timer of a visible toast, e.g. while it is hovered
    pub fn extend(&mut self, id: ToastId, now_millis: i64) {
        let lifetime = self.lifetime_millis;
        if let Some(toast) = self.visible.iter_mut().find(|toast| toast.id == id) {
            toast.expires_at = now_millis.saturating_add(lifetime);
        }
    }

    /// Drop every toast whose lifetime has passed
    pub fn expire(&mut self, now_millis: i64) {
        self.visible.retain(|toast| toast.expires_at > now_millis);
    }

    pub fn visible(&self) -> &[Toast] {
        &self.visible
    }

    pub fn history(&self) -> &[Toast] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn clear(&mut self) {
        self.visible.clear();
    }

    pub fn last(&self) -> Option<&Toast> {
        self.visible.last()
    }
}

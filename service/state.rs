use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use linknet::Session;

/// A session shared between request threads. Each one has its own lock so
/// requests for different sessions do not wait on each other.
pub type SharedSession = Arc<Mutex<Session>>;

/// Registry of live sessions keyed by their service id (`"S1"`, `"S2"`, ...).
pub struct ServiceState {
    sessions: HashMap<String, SharedSession>,
    next_id: usize,
}

impl ServiceState {
    pub fn new() -> Self {
        ServiceState { sessions: HashMap::new(), next_id: 1 }
    }

    /// Stores `session` under a fresh id and returns the id.
    pub fn insert(&mut self, session: Session) -> String {
        let id = format!("S{}", self.next_id);
        self.next_id += 1;
        self.sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// Shared state type, passed to every handler.
pub type SharedState = Arc<Mutex<ServiceState>>;

/// Locks `mutex`, recovering the data if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

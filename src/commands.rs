//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update:
//! notifications for collaborators, token re-rendering and focus requests.

use serde::Serialize;

use crate::presentation::TokenView;
use crate::projection::ChangeSnapshot;

/// Collaborator-facing events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum Notification {
    /// A settled snapshot that differs from the last delivered one
    Change(ChangeSnapshot),
    /// Domain feedback, e.g. typing while a token occupies the field
    InvalidInput(String),
    /// A line break was typed in a single-line editor
    InputComplete,
    /// Pending text was committed because the field lost focus
    BlurCommit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    Notify(Notification),
    /// Re-render the rich token chips
    RenderTokens(Vec<TokenView>),
    /// Give the host field focus
    Focus,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Collapse a list into the smallest equivalent command
    pub fn from_vec(mut cmds: Vec<Cmd>) -> Option<Cmd> {
        cmds.retain(|c| *c != Cmd::None);
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// Flatten nested batches, in order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }

    /// Notifications carried by this command, in order
    pub fn notifications(&self) -> Vec<&Notification> {
        match self {
            Cmd::Notify(n) => vec![n],
            Cmd::Batch(cmds) => cmds.iter().flat_map(Cmd::notifications).collect(),
            _ => Vec::new(),
        }
    }

    /// Hand every effect to the collaborator
    pub fn dispatch(self, collaborator: &mut dyn Collaborator) {
        for cmd in self.flatten() {
            match cmd {
                Cmd::Notify(Notification::Change(snapshot)) => collaborator.on_change(&snapshot),
                Cmd::Notify(Notification::InvalidInput(reason)) => {
                    collaborator.on_invalid_input(&reason)
                }
                Cmd::Notify(Notification::InputComplete) => collaborator.on_input_complete(),
                Cmd::Notify(Notification::BlurCommit) => collaborator.on_blur_commit(),
                Cmd::RenderTokens(views) => collaborator.render_tokens(&views),
                Cmd::Focus => collaborator.focus(),
                Cmd::None | Cmd::Batch(_) => {}
            }
        }
    }
}

/// The outside world as seen from the core
pub trait Collaborator {
    fn on_change(&mut self, snapshot: &ChangeSnapshot);

    fn on_invalid_input(&mut self, _reason: &str) {}

    fn on_input_complete(&mut self) {}

    fn on_blur_commit(&mut self) {}

    fn render_tokens(&mut self, _views: &[TokenView]) {}

    fn focus(&mut self) {}
}

/// Collaborator that records everything it receives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventLog {
    pub notifications: Vec<Notification>,
    pub renders: Vec<Vec<TokenView>>,
    pub focus_requests: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered snapshots, in order
    pub fn changes(&self) -> Vec<&ChangeSnapshot> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Change(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

impl Collaborator for EventLog {
    fn on_change(&mut self, snapshot: &ChangeSnapshot) {
        self.notifications
            .push(Notification::Change(snapshot.clone()));
    }

    fn on_invalid_input(&mut self, reason: &str) {
        self.notifications
            .push(Notification::InvalidInput(reason.to_string()));
    }

    fn on_input_complete(&mut self) {
        self.notifications.push(Notification::InputComplete);
    }

    fn on_blur_commit(&mut self) {
        self.notifications.push(Notification::BlurCommit);
    }

    fn render_tokens(&mut self, views: &[TokenView]) {
        self.renders.push(views.to_vec());
    }

    fn focus(&mut self) {
        self.focus_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_collapses() {
        assert_eq!(Cmd::from_vec(vec![]), None);
        assert_eq!(Cmd::from_vec(vec![Cmd::None, Cmd::Focus]), Some(Cmd::Focus));
        assert_eq!(
            Cmd::from_vec(vec![Cmd::Focus, Cmd::Focus]),
            Some(Cmd::Batch(vec![Cmd::Focus, Cmd::Focus]))
        );
    }

    #[test]
    fn test_dispatch_reaches_collaborator() {
        let cmd = Cmd::batch(vec![
            Cmd::Notify(Notification::Change(ChangeSnapshot::Empty)),
            Cmd::Batch(vec![Cmd::Notify(Notification::InputComplete), Cmd::Focus]),
        ]);
        let mut log = EventLog::new();
        cmd.dispatch(&mut log);

        assert_eq!(
            log.notifications,
            vec![
                Notification::Change(ChangeSnapshot::Empty),
                Notification::InputComplete
            ]
        );
        assert_eq!(log.focus_requests, 1);
    }

    #[test]
    fn test_notifications_walks_batches() {
        let cmd = Cmd::batch(vec![
            Cmd::Focus,
            Cmd::Batch(vec![Cmd::Notify(Notification::BlurCommit)]),
        ]);
        assert_eq!(cmd.notifications(), vec![&Notification::BlurCommit]);
    }
}

//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! normalization passes and tree transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=tree=debug,message=debug` - scoped filtering
//! - `RUST_LOG=tokenfield::normalize=trace` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/tokenfield/logs/tokenfield.log` with daily
//! rotation. File logging uses debug level by default for more verbose
//! troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{Document, NodeKind};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`) and goes to stderr so
/// it never mixes with replay output. File logging writes to
/// `~/.config/tokenfield/logs/tokenfield.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "tokenfield.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of the tree and caret for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    pub nodes: Vec<String>,
    pub selection: Option<String>,
}

impl TreeSnapshot {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            nodes: doc.children().iter().map(describe_node).collect(),
            selection: doc.selection().map(|s| {
                if s.is_collapsed() {
                    format!("{}:{}", s.head.node, s.head.offset)
                } else {
                    format!(
                        "{}:{}..{}:{}",
                        s.anchor.node, s.anchor.offset, s.head.node, s.head.offset
                    )
                }
            }),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &TreeSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.nodes != other.nodes {
            changes.push(format!(
                "[{}] → [{}]",
                self.nodes.join(" "),
                other.nodes.join(" ")
            ));
        }
        if self.selection != other.selection {
            changes.push(format!(
                "caret {} → {}",
                self.selection.as_deref().unwrap_or("none"),
                other.selection.as_deref().unwrap_or("none")
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn describe_node(node: &crate::model::Node) -> String {
    match &node.kind {
        NodeKind::Text(run) => format!("text{}{:?}", node.id, run.content),
        NodeKind::Token(token) => format!("token{}({:?})", node.id, token.display_text),
        NodeKind::Marker(_) => format!("marker{}", node.id),
        NodeKind::LineBreak => format!("br{}", node.id),
    }
}

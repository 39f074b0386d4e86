// src/tools/registry.rs

use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::Tool;
use crate::{
    blockchain::models::{CallEnvelope, ToolDescriptor, ToolError},
    telegram::{format, Notifier},
};

/// Ordered set of tools, and the one place where tool failures become data.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    notifier: Notifier,
}

impl ToolRegistry {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            tools: Vec::new(),
            notifier,
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> anyhow::Result<()> {
        if self.contains(tool.name()) {
            anyhow::bail!("Tool already registered: {}", tool.name());
        }
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Run a tool by exact name. Never fails: errors, unknown names and
    /// panics inside the tool all come back as `success: false` envelopes.
    /// The follow-up notification runs in its own task.
    pub async fn call(&self, name: &str, args: Value) -> CallEnvelope {
        let Some(tool) = self.get(name) else {
            warn!(tool = name, "Unknown tool requested");
            return CallEnvelope::failure(ToolError::NotFound(name.to_string()).to_string());
        };

        info!(tool = name, "Calling tool");
        let outcome = AssertUnwindSafe(tool.execute(args.clone()))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(data)) => {
                if let Some(summary) = format::summary(name, &args, &data) {
                    let notifier = self.notifier.clone();
                    tokio::spawn(async move { notifier.notify(&summary).await });
                }
                CallEnvelope::ok(data)
            }
            Ok(Err(e)) => {
                warn!(tool = name, error = %e, "Tool call failed");
                CallEnvelope::failure(e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(tool = name, panic = %message, "Tool panicked");
                CallEnvelope::failure(format!("Tool {} panicked: {}", name, message))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

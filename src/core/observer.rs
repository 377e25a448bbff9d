use crate::domain::ports::{LoadEvent, LoadObserver};
use std::sync::Mutex;

/// Forwards load diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_event(&self, event: &LoadEvent) {
        match event {
            LoadEvent::Fetched { source, bytes } => {
                tracing::debug!("Fetched {} bytes from {}", bytes, source);
            }
            LoadEvent::Decoded { sheets } => {
                tracing::debug!("Workbook sheets: {:?}", sheets);
            }
            LoadEvent::SheetMissing { domain, sheet } => {
                tracing::error!(domain = %domain, "Sheet {} not found", sheet);
            }
            LoadEvent::SheetEmpty { domain, sheet } => {
                tracing::error!(domain = %domain, "No data found in sheet {}", sheet);
            }
            LoadEvent::SheetColumns { sheet, columns } => {
                tracing::debug!("Sheet {} columns: {:?}", sheet, columns);
            }
            LoadEvent::DomainNormalized {
                domain,
                rows,
                clients,
            } => {
                tracing::info!(domain = %domain, rows, clients, "normalized");
            }
        }
    }
}

/// Keeps every event in memory; handy when embedding the loader.
#[derive(Debug, Default)]
pub struct MemoryObserver {
    events: Mutex<Vec<LoadEvent>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LoadEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl LoadObserver for MemoryObserver {
    fn on_event(&self, event: &LoadEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

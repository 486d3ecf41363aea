//! Per-pair log files
//!
//! [`PairLogLayer`] opens a log file next to the report whenever a `pair`
//! span is created and copies every event recorded inside that span into it.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Name of the span opened around each pair
pub const PAIR_SPAN: &str = "pair";

/// Default file name of the per-pair log
pub const DEFAULT_PAIR_LOG: &str = "mrs_generation_log.log";

/// Layer writing the events of each pair to `<report dir>/<file_name>`
#[derive(Debug, Clone)]
pub struct PairLogLayer {
    file_name: String,
}

impl PairLogLayer {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

struct PairLog(Mutex<File>);

#[derive(Default)]
struct Fields {
    message: String,
    values: Vec<(&'static str, String)>,
}

impl Fields {
    fn insert(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.values.push((field.name(), value));
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }
}

impl<S> Layer<S> for PairLogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if attrs.metadata().name() != PAIR_SPAN {
            return;
        }
        let mut fields = Fields::default();
        attrs.record(&mut fields);
        let Some(report) = fields.get("report") else {
            return;
        };

        let dir = Path::new(report).parent().unwrap_or_else(|| Path::new(""));
        let Ok(file) = File::create(dir.join(&self.file_name)) else {
            return;
        };
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(PairLog(Mutex::new(file)));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(scope) = ctx.event_scope(event) else {
            return;
        };
        for span in scope {
            let extensions = span.extensions();
            let Some(log) = extensions.get::<PairLog>() else {
                continue;
            };

            let mut fields = Fields::default();
            event.record(&mut fields);
            let mut line = format!("{} {}", event.metadata().level(), fields.message);
            for (name, value) in &fields.values {
                line.push_str(&format!(" {name}={value}"));
            }
            line.push('\n');

            if let Ok(mut file) = log.0.lock() {
                let _ = file.write_all(line.as_bytes());
            }
            return;
        }
    }
}

//! Components and helpers shared by the test modules.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::helpers::read;
use crate::*;

/// Ordered record of hook invocations
#[derive(Clone, Default)]
pub(super) struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub(super) fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub(super) fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(super) fn position(&self, event: &str) -> usize {
        self.events()
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("missing event {event}"))
    }

    pub(super) fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }
}

/// Graph node depending on other nodes by name
pub(super) struct Node {
    pub(super) label: String,
    pub(super) wants: Vec<String>,
    pub(super) deps: Vec<Shared<Node>>,
    pub(super) wired: bool,
    log: EventLog,
}

impl Node {
    pub(super) fn new(label: &str, wants: &[String], log: &EventLog) -> Self {
        Self {
            label: label.to_owned(),
            wants: wants.to_vec(),
            deps: Vec::new(),
            wired: false,
            log: log.clone(),
        }
    }
}

impl Component for Node {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        for want in &self.wants {
            descriptor
                .field("deps")
                .named(want.clone())
                .inject(|node: &mut Node, dep: Shared<Node>| node.deps.push(dep));
        }
        descriptor.on_wired(|node: &mut Node| {
            let ready = node.deps.iter().all(|dep| read(dep).wired);
            node.wired = true;
            let kind = if ready { "wired" } else { "premature" };
            node.log.record(format!("{kind}:{}", node.label));
        });
        descriptor.on_started(|node: &mut Node| {
            node.log.record(format!("started:{}", node.label));
        });
    }
}

/// Parse a graph description such as `"a>b,c b>c c"`: one token per node, in
/// registration order, with the names of its dependencies after `>`
pub(super) fn edges(spec: &str) -> Vec<(String, Vec<String>)> {
    spec.split_whitespace()
        .map(|token| match token.split_once('>') {
            Some((label, wants)) => (
                label.to_owned(),
                wants.split(',').map(str::to_owned).collect(),
            ),
            None => (token.to_owned(), Vec::new()),
        })
        .collect()
}

/// Register a graph of nodes, in the given order
pub(super) fn graph(
    spec: &str,
    log: &EventLog,
) -> (BringUpContext, HashMap<String, Shared<Node>>) {
    let mut context = BringUpContext::new();
    let mut nodes = HashMap::new();
    for (label, wants) in edges(spec) {
        let node = shared(Node::new(&label, &wants, log));
        context.register_named(node.clone(), label.clone()).unwrap();
        nodes.insert(label, node);
    }
    (context, nodes)
}

pub(super) trait Logger: Send + Sync {
    fn kind(&self) -> &'static str;
}

pub(super) trait Flush: Send + Sync {
    fn flush(&mut self);
}

#[derive(Default)]
pub(super) struct ConsoleLogger {
    pub(super) flushed: usize,
}

impl Logger for ConsoleLogger {
    fn kind(&self) -> &'static str {
        "console"
    }
}

impl Flush for ConsoleLogger {
    fn flush(&mut self) {
        self.flushed += 1;
    }
}

impl Component for ConsoleLogger {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        capabilities!(descriptor, dyn Logger, dyn Flush);
    }
}

#[derive(Default)]
pub(super) struct FileLogger;

impl Logger for FileLogger {
    fn kind(&self) -> &'static str {
        "file"
    }
}

impl Component for FileLogger {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        capabilities!(descriptor, dyn Logger);
    }
}

/// Depends on any single logger
#[derive(Default)]
pub(super) struct Service {
    pub(super) logger: Option<Shared<dyn Logger>>,
    pub(super) target: Option<&'static str>,
}

impl Component for Service {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        let field = descriptor.field("logger");
        let field = match self.target {
            Some(name) => field.named(name),
            None => field,
        };
        field.capability(|s: &mut Service, logger: Shared<dyn Logger>| s.logger = Some(logger));
    }
}

#[derive(Clone, Default)]
pub(super) struct Database {
    pub(super) url: String,
}

impl Component for Database {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        descriptor
            .field("url")
            .value("db.url", |db: &mut Database, url: String| db.url = url);
    }
}

/// Depends on a database by concrete type, or by name when a target is set
#[derive(Default)]
pub(super) struct Repository {
    pub(super) db: Option<Shared<Database>>,
    pub(super) snapshot: Option<Database>,
    pub(super) target: Option<&'static str>,
    pub(super) copy: bool,
}

impl Component for Repository {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        let field = descriptor.field("db");
        let field = match self.target {
            Some(name) => field.named(name),
            None => field,
        };
        if self.copy {
            field.copy(|r: &mut Repository, db: Database| r.snapshot = Some(db));
        } else {
            field.inject(|r: &mut Repository, db: Shared<Database>| r.db = Some(db));
        }
    }
}

/// A component with no bindings nor hooks
#[derive(Default)]
pub(super) struct Plain;

impl Component for Plain {}

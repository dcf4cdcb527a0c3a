use std::time::SystemTime;

use musubi::*;
use tracing_subscriber::EnvFilter;

// Define regular traits and implementor structs

trait Logger: Send + Sync {
    fn log(&self, content: &str);
}

#[derive(Default)]
struct LoggerImpl {
    prefix: String,
}

impl Logger for LoggerImpl {
    fn log(&self, content: &str) {
        println!("{}{}", self.prefix, content);
    }
}

impl Component for LoggerImpl {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        descriptor
            .field("prefix")
            .value("log.prefix", |l: &mut LoggerImpl, prefix: String| l.prefix = prefix);
        capabilities!(descriptor, dyn Logger);
    }
}

#[derive(Default)]
struct Clock {
    started: Option<SystemTime>,
}

impl Component for Clock {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        descriptor.on_wired(|c: &mut Clock| c.started = Some(SystemTime::now()));
    }
}

#[derive(Default)]
struct Server {
    port: u16,
    verbose: bool,
    logger: Option<Shared<dyn Logger>>,
    clock: Option<Shared<Clock>>,
}

impl Component for Server {
    fn describe(&self, descriptor: &mut Descriptor<Self>) {
        descriptor
            .field("port")
            .value("server.port", |s: &mut Server, port: u16| s.port = port);
        descriptor
            .field("verbose")
            .value("server.verbose", |s: &mut Server, verbose: bool| s.verbose = verbose);
        descriptor
            .field("logger")
            .capability(|s: &mut Server, logger: Shared<dyn Logger>| s.logger = Some(logger));
        descriptor
            .field("clock")
            .inject(|s: &mut Server, clock: Shared<Clock>| s.clock = Some(clock));
        descriptor.on_started(|s: &mut Server| {
            let (Some(logger), Some(clock)) = (&s.logger, &s.clock) else {
                return;
            };
            let started = clock.read().unwrap().started;
            let line = format!(
                "listening on {} (verbose: {}, clock since {:?})",
                s.port, s.verbose, started
            );
            logger.read().unwrap().log(&line);
        });
    }
}

const PROPERTIES: &str = "\
server.port=8080
server.verbose=t
log.prefix=[demo] ";

fn main() -> Result<(), WiringError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let server = shared(Server::default());

    let mut context = BringUpContext::new();
    context.load_properties(PROPERTIES)?;
    context.register_named(server.clone(), "server")?;
    context.register(shared(LoggerImpl::default()))?;
    context.register(shared(Clock::default()))?;

    let container = context.start()?;

    let logger_name = std::any::type_name::<LoggerImpl>();
    let logger: Shared<dyn Logger> = container.get_capability(logger_name)?;
    logger.read().unwrap().log(&format!("{} components wired", container.len()));
    assert_eq!(server.read().unwrap().port, 8080);

    Ok(())
}

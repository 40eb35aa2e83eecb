/// Default diagnostic name of the accumulator built by the autoloader.
pub const DEFAULT_PLUGIN_NAME: &str = "cmdload";

/// Registration sink the autoloader appends handlers to.
pub trait PluginSink<H> {
    fn register(&mut self, handler: H);

    /// Diagnostic name reported in the autoload summary, if the sink has one.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Named, ordered handler accumulator.
#[derive(Debug, Clone)]
pub struct Plugin<H> {
    name: String,
    handlers: Vec<H>,
}

impl<H> Default for Plugin<H> {
    fn default() -> Self {
        Self::new(DEFAULT_PLUGIN_NAME)
    }
}

impl<H> Plugin<H> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered handlers, in registration order.
    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn into_handlers(self) -> Vec<H> {
        self.handlers
    }
}

impl<H> PluginSink<H> for Plugin<H> {
    fn register(&mut self, handler: H) {
        self.handlers.push(handler);
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl<H> PluginSink<H> for Vec<H> {
    fn register(&mut self, handler: H) {
        self.push(handler);
    }
}

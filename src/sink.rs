/// Consumer of scan events, decoupled from how they are displayed or stored.
///
/// All methods may be called concurrently from different scan workers; an
/// implementation that needs ordered delivery (e.g. onto a single UI thread)
/// must serialize internally. The scanner guarantees `on_progress` fires
/// exactly once per completed probe and `on_finished` fires exactly once,
/// strictly after the last progress event of the scan.
pub trait ResultSink: Send + Sync {
    /// A TCP connect to `port` completed; the port accepts connections.
    fn on_open_port(&self, port: u16);

    /// `done` probes out of `total` have completed, counting failures and
    /// timeouts as well as successes.
    fn on_progress(&self, done: u64, total: u64);

    /// A probe failed with a reportable error (name resolution or connect).
    fn on_error(&self, message: &str);

    /// The scan is complete.
    fn on_finished(&self);
}

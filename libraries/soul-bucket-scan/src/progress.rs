use soul_remote::Locator;

/// Scan progress events
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Workers are up and discovery is starting
    Started { bucket: String, workers: usize },

    /// Listing finished
    Discovered { objects: usize },

    /// A track was decoded and published
    TrackDecoded { locator: Locator, worker: usize },

    /// An object failed to decode
    TrackFailed {
        locator: Locator,
        worker: usize,
        error: String,
    },

    /// Scan finished
    Completed { stats: ScanStats },
}

/// Scan statistics
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Objects matching the extension filter
    pub discovered: usize,

    /// Tracks published to the sink
    pub decoded: usize,

    /// Objects that failed, with the error message
    pub failures: Vec<(Locator, String)>,

    /// Tracks decoded by each worker, indexed by worker id
    pub per_worker: Vec<usize>,

    /// Whether the scan was cancelled before the queue drained
    pub cancelled: bool,
}

impl ScanStats {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Objects taken off the queue, decoded or not.
    pub fn processed(&self) -> usize {
        self.decoded + self.failures.len()
    }
}

//! Sink routing table
//!
//! Built once from two flags and immutable afterward. Each log call is a
//! constant-time array lookup with no allocation.

use lumber_encoding::Level;

use crate::{FileType, SinkId};

/// Flags that decide which sinks exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingOptions {
    /// Create a separate request sink; request calls are no-ops otherwise
    pub request_log: bool,

    /// Create one sink per level (debug, info, warn, error)
    pub levels_log: bool,
}

/// Fixed mapping from file type and level to sink
///
/// Only the sinks the options call for are registered, in file-type order,
/// so the general sink is always [`SinkId::GENERAL`].
///
/// # Example
///
/// ```
/// use lumber_encoding::Level;
/// use lumber_routing::{FileType, RoutingOptions, RoutingTable, SinkId};
///
/// let table = RoutingTable::new(RoutingOptions {
///     request_log: false,
///     levels_log: true,
/// });
///
/// // Panic shares the error sink
/// assert_eq!(table.route(Level::Panic), table.sink_id(FileType::Error).unwrap());
/// // No request sink was created
/// assert_eq!(table.route_request(), None);
/// assert_eq!(table.sink_count(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingTable {
    /// File type index to sink, `None` when that sink does not exist
    slots: [Option<SinkId>; FileType::COUNT],

    /// Registered file types, indexed by SinkId
    file_types: Vec<FileType>,

    options: RoutingOptions,
}

impl RoutingTable {
    /// Build the table, registering only the sinks `options` require
    #[must_use]
    pub fn new(options: RoutingOptions) -> Self {
        let mut table = Self {
            slots: [None; FileType::COUNT],
            file_types: Vec::with_capacity(FileType::COUNT),
            options,
        };

        table.register(FileType::General);
        if options.request_log {
            table.register(FileType::Request);
        }
        if options.levels_log {
            for ft in FileType::LEVELS {
                table.register(ft);
            }
        }

        table
    }

    fn register(&mut self, ft: FileType) {
        let id = SinkId::new(self.file_types.len() as u8);
        self.slots[ft.index() as usize] = Some(id);
        self.file_types.push(ft);
    }

    /// Sink for a non-request event at `level`
    ///
    /// Without level separation everything goes to the general sink. With it,
    /// each level has its own sink and panic/fatal alias to the error sink.
    #[inline]
    pub fn route(&self, level: Level) -> SinkId {
        if !self.options.levels_log {
            return SinkId::GENERAL;
        }
        self.sink_id(FileType::for_level(level))
            .unwrap_or(SinkId::GENERAL)
    }

    /// Sink for a raw level tag; unknown tags fall back to the general sink
    #[inline]
    pub fn route_tag(&self, tag: u8) -> SinkId {
        match Level::from_u8(tag) {
            Some(level) => self.route(level),
            None => SinkId::GENERAL,
        }
    }

    /// Request sink, or `None` when the request stream is disabled
    #[inline]
    pub fn route_request(&self) -> Option<SinkId> {
        self.sink_id(FileType::Request)
    }

    /// Sink registered for `ft`, if any
    #[inline]
    pub fn sink_id(&self, ft: FileType) -> Option<SinkId> {
        self.slots[ft.index() as usize]
    }

    /// File type of a registered sink
    #[inline]
    pub fn file_type(&self, id: SinkId) -> Option<FileType> {
        self.file_types.get(id.as_usize()).copied()
    }

    /// Registered file types, in SinkId order
    #[inline]
    pub fn file_types(&self) -> &[FileType] {
        &self.file_types
    }

    /// Iterate over `(SinkId, FileType)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (SinkId, FileType)> + '_ {
        self.file_types
            .iter()
            .enumerate()
            .map(|(i, ft)| (SinkId::new(i as u8), *ft))
    }

    #[inline]
    pub fn sink_count(&self) -> usize {
        self.file_types.len()
    }

    #[inline]
    pub fn options(&self) -> RoutingOptions {
        self.options
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new(RoutingOptions::default())
    }
}

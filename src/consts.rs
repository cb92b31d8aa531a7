pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains all configuration constants for the refresh system,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered events between the coordinator and a front end
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // REFRESH CONFIGURATION
    // =============================================================================

    /// Periodic refresh configuration
    pub mod refresh {
        use std::time::Duration;

        /// Period between automatic refresh cycles (seconds)
        pub const REFRESH_INTERVAL_SECS: u64 = 5 * 60; // 5 minutes

        /// Shortest refresh period accepted from flags or the config file (seconds)
        pub const MIN_REFRESH_INTERVAL_SECS: u64 = 5;

        /// Longest refresh period accepted from flags or the config file (seconds)
        pub const MAX_REFRESH_INTERVAL_SECS: u64 = 24 * 60 * 60; // 1 day

        /// Helper function to get the refresh interval
        pub const fn refresh_interval() -> Duration {
            Duration::from_secs(REFRESH_INTERVAL_SECS)
        }

        /// Helper function to get the longest refresh interval
        pub const fn max_refresh_interval() -> Duration {
            Duration::from_secs(MAX_REFRESH_INTERVAL_SECS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Outbound request configuration
    pub mod fetching {
        use std::time::Duration;

        /// Time allowed for a single source fetch before it counts as failed (seconds)
        pub const FETCH_TIMEOUT_SECS: u64 = 10;

        /// Longest fetch timeout accepted from flags or the config file (seconds)
        pub const MAX_FETCH_TIMEOUT_SECS: u64 = 10 * 60;

        /// Time allowed to establish a connection (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 5;

        /// Longest HTTP error body kept in an error message
        pub const MAX_ERROR_BODY_CHARS: usize = 200;

        /// Helper function to get the fetch timeout
        pub const fn fetch_timeout() -> Duration {
            Duration::from_secs(FETCH_TIMEOUT_SECS)
        }

        /// Helper function to get the connect timeout
        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }
    }
}

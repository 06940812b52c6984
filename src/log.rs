// Journalisation optionnelle (feature `logging`). Sans la feature, les
// arguments restent vérifiés mais rien n'est formaté.

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::debug!($($arg)*);
        #[cfg(not(feature = "logging"))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::info!($($arg)*);
        #[cfg(not(feature = "logging"))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::warn!($($arg)*);
        #[cfg(not(feature = "logging"))]
        let _ = format_args!($($arg)*);
    }};
}

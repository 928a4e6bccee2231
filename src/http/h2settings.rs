//! HTTP/2 connection parameters handed to the wire implementation.
//!
//! Anti-bot systems fingerprint the SETTINGS frame (which ids, which values,
//! in which order), the connection WINDOW_UPDATE and the priority attached to
//! each HEADERS frame. [`Http2Config`] carries all of them.

/// SETTINGS identifiers (RFC 9113 §6.5.2, RFC 8441).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingId {
    HeaderTableSize,
    EnablePush,
    MaxConcurrentStreams,
    InitialWindowSize,
    MaxFrameSize,
    MaxHeaderListSize,
    EnableConnectProtocol,
}

impl SettingId {
    /// Wire code of the setting.
    pub fn code(&self) -> u16 {
        match self {
            SettingId::HeaderTableSize => 0x1,
            SettingId::EnablePush => 0x2,
            SettingId::MaxConcurrentStreams => 0x3,
            SettingId::InitialWindowSize => 0x4,
            SettingId::MaxFrameSize => 0x5,
            SettingId::MaxHeaderListSize => 0x6,
            SettingId::EnableConnectProtocol => 0x8,
        }
    }
}

/// One SETTINGS entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub id: SettingId,
    pub val: u32,
}

impl Setting {
    pub const fn new(id: SettingId, val: u32) -> Self {
        Self { id, val }
    }
}

/// Priority attached to every HEADERS frame.
///
/// `weight` is the wire value; the effective weight is `weight + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityParam {
    pub stream_dep: u32,
    pub exclusive: bool,
    pub weight: u8,
}

/// Connection-level WINDOW_UPDATE increment used when none is configured.
pub const DEFAULT_CONNECTION_FLOW: u32 = 15_663_105;

/// Initial connection window every peer starts with (RFC 9113 §6.9.2).
pub const INITIAL_CONNECTION_WINDOW: u32 = 65_535;

/// HTTP/2 configuration owned by a base transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Http2Config {
    /// SETTINGS sent in the connection preface, in order. Empty means the
    /// wire implementation's own defaults.
    pub settings: Vec<Setting>,
    /// Largest header list accepted from the peer. `0` leaves the wire
    /// implementation's limit in place.
    pub max_header_list_size: u32,
    /// Stream-level initial window.
    pub initial_window_size: u32,
    /// HPACK dynamic table size.
    pub header_table_size: u32,
    /// Connection WINDOW_UPDATE increment sent after the preface.
    pub connection_flow: u32,
    /// Priority for request HEADERS frames; `None` sends no priority.
    pub header_priority: Option<PriorityParam>,
}

impl Default for Http2Config {
    fn default() -> Self {
        Self {
            settings: Vec::new(),
            max_header_list_size: 10 << 20,
            initial_window_size: 4 << 20,
            header_table_size: 4096,
            connection_flow: DEFAULT_CONNECTION_FLOW,
            header_priority: None,
        }
    }
}

impl Http2Config {
    /// Value of `id` in the SETTINGS list, if present.
    pub fn setting(&self, id: SettingId) -> Option<u32> {
        self.settings.iter().find(|s| s.id == id).map(|s| s.val)
    }

    /// Total connection receive window after the initial WINDOW_UPDATE.
    pub fn connection_window(&self) -> u32 {
        INITIAL_CONNECTION_WINDOW.saturating_add(self.connection_flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_codes() {
        assert_eq!(SettingId::HeaderTableSize.code(), 1);
        assert_eq!(SettingId::MaxHeaderListSize.code(), 6);
        assert_eq!(SettingId::EnableConnectProtocol.code(), 8);
    }

    #[test]
    fn test_default_connection_window() {
        let config = Http2Config::default();
        assert_eq!(config.connection_window(), 15_728_640);
    }

    #[test]
    fn test_setting_lookup() {
        let config = Http2Config {
            settings: vec![
                Setting::new(SettingId::HeaderTableSize, 65536),
                Setting::new(SettingId::EnablePush, 0),
            ],
            ..Default::default()
        };
        assert_eq!(config.setting(SettingId::EnablePush), Some(0));
        assert_eq!(config.setting(SettingId::MaxFrameSize), None);
    }
}

/// Settings of a [`Bridge`](crate::Bridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    max_frame_payload_len: usize,
    frame_channel_capacity: usize,
    allowed_origins: Vec<String>,
}

impl BridgeConfig {
    pub const DEFAULT_MAX_FRAME_PAYLOAD_LEN: usize = 64 * 1024;
    pub const DEFAULT_FRAME_CHANNEL_CAPACITY: usize = 16;

    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::new()
    }

    /// Largest WebSocket frame payload accepted from a peer.
    pub fn max_frame_payload_len(&self) -> usize {
        self.max_frame_payload_len
    }

    /// Frames buffered between the bridge and the application, per direction.
    pub fn frame_channel_capacity(&self) -> usize {
        self.frame_channel_capacity
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// `*` allows every origin.
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == "*" || allowed.eq_ignore_ascii_case(origin.trim()))
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_frame_payload_len: Self::DEFAULT_MAX_FRAME_PAYLOAD_LEN,
            frame_channel_capacity: Self::DEFAULT_FRAME_CHANNEL_CAPACITY,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn max_frame_payload_len(mut self, len: usize) -> Self {
        self.config.max_frame_payload_len = len;
        self
    }

    pub fn frame_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.frame_channel_capacity = capacity;
        self
    }

    /// Replaces the default `*` with an explicit list of origins.
    pub fn allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> BridgeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        let config = BridgeConfig::default();
        assert_eq!(config.max_frame_payload_len(), 65536);
        assert_eq!(config.frame_channel_capacity(), 16);
        assert!(config.allows_origin("https://anything.example"));

        let config = BridgeConfig::builder().max_frame_payload_len(1024).allowed_origins(["https://app.example"]).build();
        assert_eq!(config.max_frame_payload_len(), 1024);
        assert_eq!(config.frame_channel_capacity(), 16);
        assert!(config.allows_origin("HTTPS://APP.EXAMPLE"));
        assert!(!config.allows_origin("https://other.example"));
    }
}

//! Live streaming resources

use super::{VideoResource, VideoResourceType};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ingress points a live encoder can push to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngressKind {
    Primary,
    Backup,
}

impl IngressKind {
    /// All ingress kinds.
    pub const ALL: [IngressKind; 2] = [IngressKind::Primary, IngressKind::Backup];

    /// JSON field name for this kind.
    pub fn key(&self) -> &'static str {
        match self {
            IngressKind::Primary => "primary",
            IngressKind::Backup => "backup",
        }
    }

    /// Look up an ingress kind by its JSON field name.
    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "primary" => Ok(IngressKind::Primary),
            "backup" => Ok(IngressKind::Backup),
            other => Err(Error::UnknownKey {
                domain: "ingress",
                key: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for IngressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Stream keys paired with the ingress points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKeyKind {
    Primary,
    Backup,
}

impl StreamKeyKind {
    /// All stream key kinds.
    pub const ALL: [StreamKeyKind; 2] = [StreamKeyKind::Primary, StreamKeyKind::Backup];

    /// JSON field name for this kind.
    pub fn key(&self) -> &'static str {
        match self {
            StreamKeyKind::Primary => "primary",
            StreamKeyKind::Backup => "backup",
        }
    }

    /// Look up a stream key kind by its JSON field name.
    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "primary" => Ok(StreamKeyKind::Primary),
            "backup" => Ok(StreamKeyKind::Backup),
            other => Err(Error::UnknownKey {
                domain: "stream key",
                key: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for StreamKeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Egress protocols a client can read a live stream from.
///
/// Declaration order is the fixed connection priority: when a player attaches
/// to a resource it takes the first kind in [`EgressKind::ALL`] that has a
/// configured endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EgressKind {
    Hls,
    Dash,
    Mss,
    Cmaf,
    Mediastore,
}

impl EgressKind {
    /// All egress kinds in connection priority order.
    pub const ALL: [EgressKind; 5] = [
        EgressKind::Hls,
        EgressKind::Dash,
        EgressKind::Mss,
        EgressKind::Cmaf,
        EgressKind::Mediastore,
    ];

    /// JSON field name for this kind.
    pub fn key(&self) -> &'static str {
        match self {
            EgressKind::Hls => "hls",
            EgressKind::Dash => "dash",
            EgressKind::Mss => "mss",
            EgressKind::Cmaf => "cmaf",
            EgressKind::Mediastore => "mediastore",
        }
    }

    /// Look up an egress kind by its JSON field name.
    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "hls" => Ok(EgressKind::Hls),
            "dash" => Ok(EgressKind::Dash),
            "mss" => Ok(EgressKind::Mss),
            "cmaf" => Ok(EgressKind::Cmaf),
            "mediastore" => Ok(EgressKind::Mediastore),
            other => Err(Error::UnknownKey {
                domain: "egress",
                key: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for EgressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A live video resource: where encoders push and where clients read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveResource {
    identifier: String,
    ingress: HashMap<IngressKind, String>,
    stream_keys: HashMap<StreamKeyKind, String>,
    egress: HashMap<EgressKind, String>,
}

impl LiveResource {
    /// Create a new live resource.
    pub fn new(
        identifier: impl Into<String>,
        ingress: HashMap<IngressKind, String>,
        stream_keys: HashMap<StreamKeyKind, String>,
        egress: HashMap<EgressKind, String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            ingress,
            stream_keys,
            egress,
        }
    }

    /// Name this resource was configured under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Endpoint an encoder pushes the stream into, if configured.
    pub fn ingress_point(&self, kind: IngressKind) -> Option<&str> {
        self.ingress.get(&kind).map(String::as_str)
    }

    /// Stream key for an ingress point, if configured.
    pub fn stream_key(&self, kind: StreamKeyKind) -> Option<&str> {
        self.stream_keys.get(&kind).map(String::as_str)
    }

    /// Endpoint a client reads the stream from, if configured.
    pub fn egress_point(&self, kind: EgressKind) -> Option<&str> {
        self.egress.get(&kind).map(String::as_str)
    }

    /// First configured egress endpoint in priority order.
    pub fn preferred_egress(&self) -> Option<(EgressKind, &str)> {
        EgressKind::ALL
            .iter()
            .find_map(|kind| self.egress_point(*kind).map(|point| (*kind, point)))
    }

    pub(crate) fn ingress_map(&self) -> &HashMap<IngressKind, String> {
        &self.ingress
    }

    pub(crate) fn stream_key_map(&self) -> &HashMap<StreamKeyKind, String> {
        &self.stream_keys
    }

    pub(crate) fn egress_map(&self) -> &HashMap<EgressKind, String> {
        &self.egress
    }
}

impl VideoResource for LiveResource {
    fn identifier(&self) -> &str {
        self.identifier()
    }

    fn resource_type(&self) -> VideoResourceType {
        VideoResourceType::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn egress_only(pairs: &[(EgressKind, &str)]) -> LiveResource {
        let egress = pairs
            .iter()
            .map(|(kind, point)| (*kind, point.to_string()))
            .collect();
        LiveResource::new("ch1", HashMap::new(), HashMap::new(), egress)
    }

    #[test]
    fn test_from_key_round_trip() {
        for kind in EgressKind::ALL {
            assert_eq!(EgressKind::from_key(kind.key()).unwrap(), kind);
        }
        for kind in IngressKind::ALL {
            assert_eq!(IngressKind::from_key(kind.key()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_egress_key() {
        let err = EgressKind::from_key("rtmp").unwrap_err();
        assert!(matches!(err, Error::UnknownKey { domain: "egress", .. }));
    }

    #[test]
    fn test_missing_point_is_none() {
        let resource = egress_only(&[(EgressKind::Hls, "https://cdn/stream.m3u8")]);
        assert_eq!(resource.egress_point(EgressKind::Dash), None);
        assert_eq!(resource.ingress_point(IngressKind::Primary), None);
    }

    #[test]
    fn test_preferred_egress_priority_order() {
        let resource = egress_only(&[
            (EgressKind::Mediastore, "https://store/live"),
            (EgressKind::Dash, "https://cdn/live.mpd"),
        ]);
        let (kind, point) = resource.preferred_egress().unwrap();
        assert_eq!(kind, EgressKind::Dash);
        assert_eq!(point, "https://cdn/live.mpd");
    }

    #[test]
    fn test_preferred_egress_single_kind() {
        let resource = egress_only(&[(EgressKind::Cmaf, "x")]);
        assert_eq!(resource.preferred_egress(), Some((EgressKind::Cmaf, "x")));
    }

    #[test]
    fn test_preferred_egress_empty() {
        let resource = egress_only(&[]);
        assert_eq!(resource.preferred_egress(), None);
    }
}

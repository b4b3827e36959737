//! Logical layer identifiers and surface geometry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed video-playback slots the UI can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    Youtube1,
    Youtube2,
}

impl LayerId {
    /// Every layer, in stage order.
    pub const ALL: [LayerId; 2] = [LayerId::Youtube1, LayerId::Youtube2];

    /// Parse from the wire name (`youtube1`, `youtube2`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "youtube1" => Some(Self::Youtube1),
            "youtube2" => Some(Self::Youtube2),
            _ => None,
        }
    }

    /// Wire name used by the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube1 => "youtube1",
            Self::Youtube2 => "youtube2",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A layer as supplied by a caller.
///
/// Older UI code calls the player commands without any layer id; that is the
/// `Default` layer. Ids outside the closed set are kept verbatim so errors and
/// logs can name them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerRef {
    Default,
    Known(LayerId),
    Unknown(String),
}

impl LayerRef {
    /// Interpret an optional id from the bridge. Never fails.
    pub fn from_request(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Default,
            Some(id) => match LayerId::from_str(id) {
                Some(layer) => Self::Known(layer),
                None => Self::Unknown(id.to_string()),
            },
        }
    }

    pub fn layer_id(&self) -> Option<LayerId> {
        match self {
            Self::Known(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<LayerId> for LayerRef {
    fn from(id: LayerId) -> Self {
        Self::Known(id)
    }
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Known(id) => f.write_str(id.as_str()),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Position and size of a surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_ref_parsing() {
        assert_eq!(LayerRef::from_request(None), LayerRef::Default);
        assert_eq!(LayerRef::from_request(Some("")), LayerRef::Default);
        assert_eq!(
            LayerRef::from_request(Some("youtube2")),
            LayerRef::Known(LayerId::Youtube2)
        );
        assert_eq!(
            LayerRef::from_request(Some("youtube3")),
            LayerRef::Unknown("youtube3".to_string())
        );
    }

    #[test]
    fn test_layer_id_wire_names() {
        for id in LayerId::ALL {
            assert_eq!(LayerId::from_str(id.as_str()), Some(id));
        }
        let json = serde_json::to_string(&LayerId::Youtube1).unwrap();
        assert_eq!(json, "\"youtube1\"");
    }

    #[test]
    fn test_unknown_layer_display_keeps_raw_id() {
        assert_eq!(LayerRef::from_request(Some("stage")).to_string(), "stage");
        assert_eq!(LayerRef::Default.to_string(), "default");
    }
}

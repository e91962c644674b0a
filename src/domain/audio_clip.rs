use std::fmt;

const AUDIO_MEDIA_PREFIX: &str = "audio/";

/// An uploaded recording as received: raw encoded bytes plus the media type
/// the client declared for them.
#[derive(Debug, Clone)]
pub struct AudioClip {
    data: Vec<u8>,
    media_type: MediaType,
}

impl AudioClip {
    pub fn new(data: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            data,
            media_type: MediaType(media_type.into()),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType(String);

impl MediaType {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_audio(&self) -> bool {
        self.0
            .trim()
            .get(..AUDIO_MEDIA_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(AUDIO_MEDIA_PREFIX))
    }

    /// Subtype without parameters, e.g. `wav` for `audio/wav; rate=16000`.
    /// Used as a container hint for the decoder.
    pub fn subtype(&self) -> Option<&str> {
        let essence = self.0.split(';').next()?.trim();
        let (_, subtype) = essence.split_once('/')?;
        let subtype = subtype.trim();
        (!subtype.is_empty()).then_some(subtype)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

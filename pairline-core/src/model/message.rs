use bytes::Bytes;

/// One message carried over the data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMessage {
    Text(String),
    Binary(Bytes),
}

impl ChannelMessage {
    pub fn len(&self) -> usize {
        match self {
            ChannelMessage::Text(text) => text.len(),
            ChannelMessage::Binary(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ChannelMessage::Text(text) => Some(text),
            ChannelMessage::Binary(_) => None,
        }
    }
}

impl From<&str> for ChannelMessage {
    fn from(text: &str) -> Self {
        ChannelMessage::Text(text.to_owned())
    }
}

impl From<String> for ChannelMessage {
    fn from(text: String) -> Self {
        ChannelMessage::Text(text)
    }
}

impl From<Bytes> for ChannelMessage {
    fn from(data: Bytes) -> Self {
        ChannelMessage::Binary(data)
    }
}

impl From<Vec<u8>> for ChannelMessage {
    fn from(data: Vec<u8>) -> Self {
        ChannelMessage::Binary(Bytes::from(data))
    }
}

impl From<&[u8]> for ChannelMessage {
    fn from(data: &[u8]) -> Self {
        ChannelMessage::Binary(Bytes::copy_from_slice(data))
    }
}
